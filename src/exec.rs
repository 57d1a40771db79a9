//! Executable lookup and process replacement.
//!
//! The handoff is terminal: on success the target command takes over this
//! process and `replace_process` never returns. It only ever returns an
//! error, which means the replacement did not occur and the caller must
//! report it.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::env::EnvMap;
use crate::error::{Error, Result};

/// Resolve a bare command name to an executable path using the host's
/// search rules.
pub fn look_path(name: &str) -> Result<PathBuf> {
    which::which(name).map_err(|source| Error::CommandNotFound {
        name: name.to_string(),
        source,
    })
}

/// Replace the current process image with `binary`, passing `argv` as its
/// argument vector and `env` as its complete environment. Nothing is
/// inherited beyond what `env` contains.
#[cfg(unix)]
pub fn replace_process(binary: &Path, argv: &[String], env: &EnvMap) -> Error {
    use std::os::unix::process::CommandExt;

    let Some((arg0, args)) = argv.split_first() else {
        return Error::MissingCommand;
    };

    debug!(binary = %binary.display(), args = args.len(), "replacing process image");

    let mut cmd = std::process::Command::new(binary);
    cmd.arg0(arg0);
    cmd.args(args);
    cmd.env_clear();
    cmd.envs(env);

    // exec only returns on failure.
    Error::Exec(cmd.exec())
}

/// Windows has no exec(2); emulate the handoff by spawning the child with
/// the composed environment, waiting, and exiting with its status. Like
/// the Unix path, this returns only on failure.
#[cfg(not(unix))]
pub fn replace_process(binary: &Path, argv: &[String], env: &EnvMap) -> Error {
    let Some((_, args)) = argv.split_first() else {
        return Error::MissingCommand;
    };

    debug!(binary = %binary.display(), args = args.len(), "spawning child process");

    let mut cmd = std::process::Command::new(binary);
    cmd.args(args);
    cmd.env_clear();
    cmd.envs(env);

    match cmd.status() {
        Ok(status) => std::process::exit(status.code().unwrap_or(1)),
        Err(e) => Error::Exec(e),
    }
}
