//! Environment composition.
//!
//! Folds ordered batches of `KEY=value` lines from several sources into a
//! single map under a fixed precedence policy: process environment first
//! (lowest), then each `--env-file` in flag order, then each `--env-var`
//! literal (highest). Within a batch, later lines win for duplicate keys.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, trace};

use crate::error::Result;

/// The composed environment. Keys are unique; iteration order is sorted,
/// which keeps the `--debug` printout stable.
pub type EnvMap = BTreeMap<String, String>;

/// An ordered batch of raw `KEY=value` lines from one origin.
#[derive(Debug, Clone)]
pub struct SourceBatch {
    origin: String,
    lines: Vec<String>,
}

impl SourceBatch {
    /// Snapshot the live process environment as a batch.
    ///
    /// Entries whose name or value is not valid Unicode cannot be
    /// expressed as `KEY=value` text and are skipped, like any other
    /// malformed line.
    pub fn from_process_env() -> Self {
        let mut lines = Vec::new();
        for (key, value) in std::env::vars_os() {
            match (key.into_string(), value.into_string()) {
                (Ok(key), Ok(value)) => lines.push(format!("{}={}", key, value)),
                (key, _) => trace!(
                    key = %key.unwrap_or_else(|k| k.to_string_lossy().into_owned()),
                    "skipping non-Unicode environment entry"
                ),
            }
        }
        Self {
            origin: "process".to_string(),
            lines,
        }
    }

    /// Read a `.env` file as a batch. Unlike malformed lines, an unreadable
    /// file is an error: the caller asked for it by name.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        Ok(Self {
            origin: path.display().to_string(),
            lines: contents.lines().map(str::to_string).collect(),
        })
    }

    /// Build a batch from in-memory lines.
    pub fn from_lines(origin: &str, lines: Vec<String>) -> Self {
        Self {
            origin: origin.to_string(),
            lines,
        }
    }

    /// Origin label used in logs.
    pub fn origin(&self) -> &str {
        &self.origin
    }
}

/// Merge batches in precedence order, then apply CLI-literal overrides.
///
/// Parsing is permissive: blank lines, comments, and lines that do not
/// form a valid `KEY=value` assignment are dropped without error. Secrets
/// are not resolved here.
pub fn merge(batches: &[SourceBatch], overrides: &[(String, String)]) -> EnvMap {
    let mut map = EnvMap::new();

    for batch in batches {
        let before = map.len();
        for line in &batch.lines {
            if let Some((key, value)) = parse_line(line) {
                map.insert(key, value);
            }
        }
        debug!(
            origin = %batch.origin,
            lines = batch.lines.len(),
            new_entries = map.len() - before,
            "merged batch"
        );
    }

    for (key, value) in overrides {
        map.insert(key.clone(), value.clone());
    }

    map
}

/// Parse one `KEY=value` line.
///
/// Splits on the first `=` only, so values may themselves contain `=`
/// (base64 padding, URLs). Returns `None` for blank lines, comments, and
/// anything that fails the key grammar or has an empty value.
fn parse_line(line: &str) -> Option<(String, String)> {
    let line = line.trim();

    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = value.trim();

    if !is_valid_key(key) {
        trace!(key, "dropping line with invalid key");
        return None;
    }
    if value.is_empty() {
        trace!(key, "dropping line with empty value");
        return None;
    }

    Some((key.to_string(), value.to_string()))
}

/// Variable names must match `[A-Za-z_][A-Za-z0-9_]*`.
fn is_valid_key(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
