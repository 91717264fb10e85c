//! Profile selection
//!
//! Extracts profile names from the raw argument vector (`-p NAME`,
//! `--profile NAME`, `--profile=NAME`, `--profiles=a,b,c`) and resolves
//! them against the loaded config into classified flag sets ready for
//! merging.

use anyhow::{Result, bail};
use tracing::debug;

use crate::args::{FlagSet, separate_flags_and_positionals, split_at_separator};
use crate::config::ConfigFile;

/// Split the argument vector into selected profile names and everything
/// else. Every profile selector token is consumed; the remainder is handed
/// to the merge engine untouched.
pub fn parse_profile_args(args: &[String]) -> Result<(Vec<String>, Vec<String>)> {
    let mut profiles = Vec::new();
    let mut rest = Vec::new();

    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];

        if let Some(list) = arg.strip_prefix("--profiles=") {
            profiles.extend(
                list.split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(str::to_string),
            );
            i += 1;
        } else if arg == "-p" || arg == "--profile" {
            match args.get(i + 1) {
                Some(name) => profiles.push(name.clone()),
                None => bail!("{arg} requires a profile name"),
            }
            i += 2;
        } else if let Some(name) = arg.strip_prefix("--profile=") {
            profiles.push(name.to_string());
            i += 1;
        } else {
            rest.push(arg.clone());
            i += 1;
        }
    }

    Ok((profiles, rest))
}

/// Resolve profile names to flag sets using the config's raw flag strings.
///
/// Profile values are tokenized with shell-word rules so quoted substrings
/// survive as single tokens. Anything a profile places after a `--` of its
/// own is discarded; the app command always comes from the invocation.
pub fn resolve_profiles(names: &[String], config: &ConfigFile) -> Result<Vec<FlagSet>> {
    let mut sets = Vec::with_capacity(names.len());

    for name in names {
        let Some(raw) = config.profile(name) else {
            bail!("profile '{name}' not found in config");
        };
        let Some(tokens) = shlex::split(raw) else {
            bail!("profile '{name}' has unbalanced quoting: {raw}");
        };
        debug!(profile = %name, tokens = ?tokens, "Resolved profile");
        let (gamescope_args, _app) = split_at_separator(&tokens);
        sets.push(separate_flags_and_positionals(&gamescope_args));
    }

    Ok(sets)
}
