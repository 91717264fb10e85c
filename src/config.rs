//! Config file loading
//!
//! `nscb.conf` lives in the user config directory and is plain
//! `KEY=VALUE` text: each line either names a profile bound to a gamescope
//! flag string, or (with an `export ` prefix) an environment variable to
//! hand to the launched application. Blank lines, comments and lines
//! without `=` are skipped silently.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

use crate::constants::config::FILENAME;

/// Parsed contents of one `nscb.conf`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    /// Profile name → raw flag string (tokenized later with shell rules)
    pub profiles: HashMap<String, String>,
    /// Exported environment variables, in file order
    pub exports: Vec<(String, String)>,
}

impl ConfigFile {
    pub fn profile(&self, name: &str) -> Option<&str> {
        self.profiles.get(name).map(String::as_str)
    }
}

/// Locate the config file, honoring `XDG_CONFIG_HOME` then `~/.config`.
///
/// Returns `None` when no file exists; whether that is fatal depends on
/// whether the invocation asked for profiles.
pub fn find_config_file() -> Option<PathBuf> {
    let path = dirs::config_dir()?.join(FILENAME);
    if path.exists() { Some(path) } else { None }
}

/// Load and parse the config file at `path`.
pub fn load_config(path: &PathBuf) -> Result<ConfigFile> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config = parse_config(&contents);
    debug!(
        path = %path.display(),
        profiles = config.profiles.len(),
        exports = config.exports.len(),
        "Loaded config file"
    );
    Ok(config)
}

/// Parse `KEY=VALUE` / `export KEY=VALUE` lines.
///
/// One level of surrounding quotes is stripped from values so users can
/// write `fullscreen="-f -W 1920"`. A repeated key replaces the earlier
/// binding.
pub fn parse_config(contents: &str) -> ConfigFile {
    let mut config = ConfigFile::default();

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || !line.contains('=') {
            continue;
        }

        if let Some(export) = line.strip_prefix("export ") {
            if let Some((key, value)) = export.split_once('=') {
                let key = key.trim().to_string();
                let value = strip_quotes(value.trim()).to_string();
                match config.exports.iter_mut().find(|(k, _)| *k == key) {
                    Some(entry) => entry.1 = value,
                    None => config.exports.push((key, value)),
                }
            }
        } else if let Some((key, value)) = line.split_once('=') {
            config
                .profiles
                .insert(key.trim().to_string(), strip_quotes(value.trim()).to_string());
        }
    }

    config
}

fn strip_quotes(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
        .unwrap_or(value)
}
