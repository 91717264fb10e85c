//! Environment variable policy
//!
//! Reads everything the launcher takes from its own environment: pre/post
//! hook commands, the LD_PRELOAD wrapping override, and whether we are
//! already running inside a gamescope session.

use std::process::Command;
use tracing::debug;

use crate::constants::env;

/// Pre/post hook commands, new variable names preferred over the legacy
/// aliases, both trimmed. Unset or empty hooks come back as empty strings
/// and are dropped during command assembly.
pub fn pre_post_commands() -> (String, String) {
    let pre = pick_hook(
        std::env::var(env::PRE_CMD).ok(),
        std::env::var(env::PRE_CMD_LEGACY).ok(),
    );
    let post = pick_hook(
        std::env::var(env::POST_CMD).ok(),
        std::env::var(env::POST_CMD_LEGACY).ok(),
    );
    (pre, post)
}

fn pick_hook(new: Option<String>, legacy: Option<String>) -> String {
    new.filter(|v| !v.is_empty())
        .or(legacy)
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Current LD_PRELOAD value, `None` when unset or empty.
pub fn ld_preload() -> Option<String> {
    std::env::var(env::LD_PRELOAD).ok().filter(|v| !v.is_empty())
}

/// Whether LD_PRELOAD wrapping is disabled, either explicitly via
/// NSCB_DISABLE_LD_PRELOAD_WRAP or implicitly because faugus-launcher set
/// FAUGUS_LOG (it manages preloads itself).
pub fn preload_wrap_disabled() -> bool {
    if std::env::var(env::DISABLE_LD_PRELOAD_WRAP)
        .map(|v| is_truthy(&v))
        .unwrap_or(false)
    {
        debug!("LD_PRELOAD wrapping disabled via {}", env::DISABLE_LD_PRELOAD_WRAP);
        return true;
    }
    if std::env::var_os(env::FAUGUS_LOG).is_some() {
        debug!("LD_PRELOAD wrapping disabled, faugus-launcher detected");
        return true;
    }
    false
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Whether the current process already runs inside gamescope.
///
/// XDG_CURRENT_DESKTOP is authoritative when set; otherwise fall back to
/// scanning the process table.
pub fn is_gamescope_active() -> bool {
    if std::env::var(env::XDG_CURRENT_DESKTOP).as_deref() == Ok("gamescope") {
        return true;
    }

    match Command::new("ps").arg("ax").output() {
        Ok(output) => String::from_utf8_lossy(&output.stdout)
            .lines()
            .any(|line| line.contains("gamescope") && !line.contains("grep")),
        Err(e) => {
            debug!(error = %e, "ps ax failed, assuming gamescope inactive");
            false
        }
    }
}
