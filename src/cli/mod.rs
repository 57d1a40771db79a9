//! Command-line interface.

pub mod output;

use std::path::PathBuf;

use clap::Parser;

use crate::env::{self, SourceBatch};
use crate::error::{Error, Result};
use crate::exec;
use crate::resolvers::{self, ResolverChain};

/// Sigex - run a command with a composed, secret-resolved environment.
#[derive(Parser)]
#[command(
    name = "sigex",
    about = "Run a process with layered env files and tokenized secrets",
    long_about = "sigex composes an environment from the process environment, \
.env files, and -e literals (in that precedence order), resolves any \
sigex-secret-<platform>://... values through the configured secret \
backends, and replaces itself with the target command.",
    version
)]
pub struct Cli {
    /// .env file to layer over the process environment (repeatable, in order)
    #[arg(short = 'f', long = "env-file", value_name = "PATH")]
    pub env_files: Vec<PathBuf>,

    /// Environment variable to set last (repeatable, ex: -e FOO=bar)
    #[arg(short = 'e', long = "env-var", value_name = "KEY=value", value_parser = parse_env_var)]
    pub env_vars: Vec<(String, String)>,

    /// Leave secret tokens unresolved (no calls to secret backends)
    #[arg(long)]
    pub skip_secrets: bool,

    /// Print the composed environment instead of executing
    #[arg(long)]
    pub debug: bool,

    /// Verbose logging (or set SIGEX_LOG)
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute and its arguments
    #[arg(value_name = "COMMAND", trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

/// Parse a `-e KEY=value` literal.
fn parse_env_var(s: &str) -> std::result::Result<(String, String), String> {
    let err = || Error::InvalidEnvVar(s.to_string()).to_string();

    let (key, value) = s.split_once('=').ok_or_else(err)?;
    if key.is_empty() || !key.chars().enumerate().all(|(i, c)| {
        c == '_' || if i == 0 { c.is_ascii_alphabetic() } else { c.is_ascii_alphanumeric() }
    }) {
        return Err(err());
    }

    Ok((key.to_string(), value.to_string()))
}

/// Compose, resolve, and hand off.
///
/// On a successful handoff this function never returns; every other path
/// returns an error for `main` to report.
pub fn execute(cli: Cli) -> Result<()> {
    let mut batches = vec![SourceBatch::from_process_env()];
    for path in &cli.env_files {
        batches.push(SourceBatch::from_file(path)?);
    }

    let merged = env::merge(&batches, &cli.env_vars);

    let chain = ResolverChain::standard();
    let resolved = resolvers::resolve_all(&chain, &merged, cli.skip_secrets)?;

    if cli.debug {
        for (key, value) in &resolved {
            println!("{}={}", key, value);
        }
        return Ok(());
    }

    let name = cli.command.first().ok_or(Error::MissingCommand)?;
    let binary = exec::look_path(name)?;

    Err(exec::replace_process(&binary, &cli.command, &resolved))
}
