//! Command assembly
//!
//! Turns the merged gamescope flags, the app command, and the environment
//! policy into one shell command line. Four shapes exist, gated by whether
//! gamescope is already active and whether LD_PRELOAD wrapping applies:
//! when inactive, gamescope runs with the preload variable stripped from
//! its own environment while the app gets the original value restored;
//! when active, the wrapper is bypassed and the app runs directly. Config
//! exports ride in the same `env` prefix as the restored preload so the
//! app sees a single environment-setting wrapper.

use anyhow::{Context, Result};

use crate::constants::{bin::GAMESCOPE, flags::SEPARATOR};
use crate::environment;

/// Everything the assembler needs besides the argument lists.
#[derive(Debug, Clone, Default)]
pub struct CommandContext {
    /// Already running inside gamescope
    pub gamescope_active: bool,
    /// Current LD_PRELOAD value, `None` when unset or empty
    pub ld_preload: Option<String>,
    /// LD_PRELOAD wrapping disabled by override or launcher marker
    pub preload_wrap_disabled: bool,
    /// Environment variables exported from the config, in file order
    pub exports: Vec<(String, String)>,
    /// Hook run before the main command, empty when unset
    pub pre_cmd: String,
    /// Hook run after the main command, empty when unset
    pub post_cmd: String,
}

impl CommandContext {
    pub fn from_env(exports: Vec<(String, String)>) -> Self {
        let (pre_cmd, post_cmd) = environment::pre_post_commands();
        Self {
            gamescope_active: environment::is_gamescope_active(),
            ld_preload: environment::ld_preload(),
            preload_wrap_disabled: environment::preload_wrap_disabled(),
            exports,
            pre_cmd,
            post_cmd,
        }
    }

    /// LD_PRELOAD is set, non-empty, and wrapping is not disabled.
    fn handles_preload(&self) -> bool {
        self.ld_preload.is_some() && !self.preload_wrap_disabled
    }
}

/// Assemble the full shell command line.
///
/// `app_command` is `Some` when the invocation contained a `--` separator,
/// even if nothing followed it. Returns `Ok(None)` when there is nothing
/// at all to run (active session, no app, no exports, no hooks).
pub fn assemble(
    ctx: &CommandContext,
    gamescope_args: &[String],
    app_command: Option<&[String]>,
) -> Result<Option<String>> {
    let main = if ctx.gamescope_active {
        assemble_active(ctx, app_command)?
    } else {
        assemble_inactive(ctx, gamescope_args, app_command)?
    };

    let command = match main {
        Some(cmd) => join_sequence(&[ctx.pre_cmd.as_str(), cmd.as_str(), ctx.post_cmd.as_str()]),
        None => join_sequence(&[ctx.pre_cmd.as_str(), ctx.post_cmd.as_str()]),
    };

    Ok((!command.is_empty()).then_some(command))
}

/// Gamescope is not running: wrap the app command in gamescope.
fn assemble_inactive(
    ctx: &CommandContext,
    gamescope_args: &[String],
    app_command: Option<&[String]>,
) -> Result<Option<String>> {
    let gamescope_cmd = build_gamescope_command(ctx, gamescope_args)?;

    match app_command {
        Some(app) => {
            let app_cmd = build_app_command(ctx, app)?;
            Ok(Some(format!("{gamescope_cmd} {SEPARATOR} {app_cmd}")))
        }
        None => {
            // No app to prefix the exports onto; run them as a separate
            // no-op command so they still appear in the sequence.
            if ctx.exports.is_empty() {
                Ok(Some(gamescope_cmd))
            } else {
                let mut tokens = export_tokens(ctx);
                tokens.push("true".to_string());
                let export_cmd = shell_join(&tokens)?;
                Ok(Some(join_sequence(&[export_cmd.as_str(), gamescope_cmd.as_str()])))
            }
        }
    }
}

/// Gamescope is already active: bypass the wrapper entirely.
fn assemble_active(ctx: &CommandContext, app_command: Option<&[String]>) -> Result<Option<String>> {
    match app_command {
        Some(app) => Ok(Some(build_app_command(ctx, app)?)),
        None => {
            if ctx.exports.is_empty() {
                return Ok(None);
            }
            let mut tokens = export_tokens(ctx);
            tokens.push("true".to_string());
            Ok(Some(shell_join(&tokens)?))
        }
    }
}

/// The gamescope invocation itself, with LD_PRELOAD stripped from its own
/// process when preload handling applies.
fn build_gamescope_command(ctx: &CommandContext, gamescope_args: &[String]) -> Result<String> {
    let mut tokens: Vec<String> = Vec::new();
    if ctx.handles_preload() {
        tokens.extend(["env", "-u", "LD_PRELOAD"].map(String::from));
    }
    tokens.push(GAMESCOPE.to_string());
    tokens.extend(gamescope_args.iter().cloned());
    shell_join(&tokens)
}

/// The app invocation, with exports and the restored LD_PRELOAD value
/// merged into one `env` prefix.
fn build_app_command(ctx: &CommandContext, app: &[String]) -> Result<String> {
    let restore_preload = ctx.handles_preload();

    let mut tokens: Vec<String> = Vec::new();
    if restore_preload || !ctx.exports.is_empty() {
        tokens.extend(export_tokens(ctx));
        if restore_preload {
            let value = ctx.ld_preload.as_deref().unwrap_or_default();
            tokens.push(format!("LD_PRELOAD={value}"));
        }
    }
    tokens.extend(app.iter().cloned());
    shell_join(&tokens)
}

/// `env K=V ...` prefix tokens for the config exports.
fn export_tokens(ctx: &CommandContext) -> Vec<String> {
    let mut tokens = vec!["env".to_string()];
    tokens.extend(ctx.exports.iter().map(|(k, v)| format!("{k}={v}")));
    tokens
}

/// Join command parts with `; `, dropping empty parts so no stray
/// separator artifacts appear.
fn join_sequence(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("; ")
}

/// Quote every token so the shell sees each as a single literal word.
fn shell_join(tokens: &[String]) -> Result<String> {
    let mut quoted = Vec::with_capacity(tokens.len());
    for token in tokens {
        let q = shlex::try_quote(token)
            .with_context(|| format!("argument not representable in a shell command: {token:?}"))?;
        quoted.push(q.into_owned());
    }
    Ok(quoted.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_vec(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    fn ctx() -> CommandContext {
        CommandContext::default()
    }

    #[test]
    fn test_inactive_no_preload() {
        let cmd = assemble(&ctx(), &to_vec(&["-f", "-W", "1920"]), Some(&to_vec(&["/bin/game", "arg"])))
            .unwrap()
            .unwrap();
        assert_eq!(cmd, "gamescope -f -W 1920 -- /bin/game arg");
    }

    #[test]
    fn test_inactive_with_preload_strips_and_restores() {
        let mut ctx = ctx();
        ctx.ld_preload = Some("libX.so".to_string());
        let cmd = assemble(&ctx, &to_vec(&["-f"]), Some(&to_vec(&["/bin/game"])))
            .unwrap()
            .unwrap();
        assert_eq!(
            shlex::split(&cmd).unwrap(),
            to_vec(&[
                "env", "-u", "LD_PRELOAD", "gamescope", "-f", "--", "env",
                "LD_PRELOAD=libX.so", "/bin/game"
            ])
        );
    }

    #[test]
    fn test_preload_wrap_disabled() {
        let mut ctx = ctx();
        ctx.ld_preload = Some("libX.so".to_string());
        ctx.preload_wrap_disabled = true;
        let cmd = assemble(&ctx, &to_vec(&["-f"]), Some(&to_vec(&["/bin/game"])))
            .unwrap()
            .unwrap();
        assert_eq!(cmd, "gamescope -f -- /bin/game");
    }

    #[test]
    fn test_active_runs_app_directly() {
        let mut ctx = ctx();
        ctx.gamescope_active = true;
        let cmd = assemble(&ctx, &to_vec(&["-f"]), Some(&to_vec(&["/bin/game", "arg"])))
            .unwrap()
            .unwrap();
        assert_eq!(cmd, "/bin/game arg");
    }

    #[test]
    fn test_active_with_preload_still_restores() {
        let mut ctx = ctx();
        ctx.gamescope_active = true;
        ctx.ld_preload = Some("libX.so".to_string());
        let cmd = assemble(&ctx, &[], Some(&to_vec(&["/bin/game"])))
            .unwrap()
            .unwrap();
        assert_eq!(
            shlex::split(&cmd).unwrap(),
            to_vec(&["env", "LD_PRELOAD=libX.so", "/bin/game"])
        );
    }

    #[test]
    fn test_exports_share_the_env_prefix_with_preload() {
        let mut ctx = ctx();
        ctx.ld_preload = Some("libX.so".to_string());
        ctx.exports = vec![("MANGOHUD".to_string(), "1".to_string())];
        let cmd = assemble(&ctx, &[], Some(&to_vec(&["/bin/game"])))
            .unwrap()
            .unwrap();
        assert_eq!(
            shlex::split(&cmd).unwrap(),
            to_vec(&[
                "env", "-u", "LD_PRELOAD", "gamescope", "--", "env", "MANGOHUD=1",
                "LD_PRELOAD=libX.so", "/bin/game"
            ])
        );
    }

    #[test]
    fn test_hooks_wrap_the_main_command() {
        let mut ctx = ctx();
        ctx.pre_cmd = "setup".to_string();
        ctx.post_cmd = "teardown".to_string();
        let cmd = assemble(&ctx, &to_vec(&["-f"]), Some(&to_vec(&["/bin/game"])))
            .unwrap()
            .unwrap();
        assert_eq!(cmd, "setup; gamescope -f -- /bin/game; teardown");
    }

    #[test]
    fn test_empty_hooks_leave_no_separator_artifacts() {
        let mut ctx = ctx();
        ctx.post_cmd = "teardown".to_string();
        let cmd = assemble(&ctx, &[], Some(&to_vec(&["/bin/game"])))
            .unwrap()
            .unwrap();
        assert_eq!(cmd, "gamescope -- /bin/game; teardown");
        assert!(!cmd.contains(";;"));
    }

    #[test]
    fn test_inactive_no_separator_runs_gamescope_alone() {
        let cmd = assemble(&ctx(), &to_vec(&["-f"]), None).unwrap().unwrap();
        assert_eq!(cmd, "gamescope -f");
    }

    #[test]
    fn test_inactive_no_separator_with_exports() {
        let mut ctx = ctx();
        ctx.exports = vec![("MANGOHUD".to_string(), "1".to_string())];
        let cmd = assemble(&ctx, &to_vec(&["-f"]), None).unwrap().unwrap();
        let (exports, gamescope) = cmd.split_once("; ").unwrap();
        assert_eq!(
            shlex::split(exports).unwrap(),
            to_vec(&["env", "MANGOHUD=1", "true"])
        );
        assert_eq!(gamescope, "gamescope -f");
    }

    #[test]
    fn test_active_nothing_to_do() {
        let mut ctx = ctx();
        ctx.gamescope_active = true;
        assert_eq!(assemble(&ctx, &[], None).unwrap(), None);
    }

    #[test]
    fn test_active_hooks_only() {
        let mut ctx = ctx();
        ctx.gamescope_active = true;
        ctx.pre_cmd = "setup".to_string();
        ctx.post_cmd = "teardown".to_string();
        let cmd = assemble(&ctx, &[], None).unwrap().unwrap();
        assert_eq!(cmd, "setup; teardown");
    }

    #[test]
    fn test_crafted_arguments_survive_as_single_tokens() {
        let hostile = ["a b", "x;rm -rf", "$(pwd)", "`id`", "it's"];
        let app: Vec<String> = std::iter::once("/bin/game".to_string())
            .chain(hostile.iter().map(|s| s.to_string()))
            .collect();
        let cmd = assemble(&ctx(), &[], Some(&app)).unwrap().unwrap();

        // The app half (after "-- ") must split back into the same tokens.
        let app_text = cmd.split_once(" -- ").unwrap().1;
        let reparsed = shlex::split(app_text).unwrap();
        assert_eq!(reparsed, app);
    }

    #[test]
    fn test_export_values_quoted_into_single_tokens() {
        let mut ctx = ctx();
        ctx.exports = vec![("WINEDLLOVERRIDES".to_string(), "d3d11=n;b $x".to_string())];
        let cmd = assemble(&ctx, &[], Some(&to_vec(&["/bin/game"]))).unwrap().unwrap();
        let reparsed = shlex::split(&cmd).unwrap();
        assert_eq!(
            reparsed,
            to_vec(&["env", "WINEDLLOVERRIDES=d3d11=n;b $x", "/bin/game"])
        );
    }

    #[test]
    fn test_nul_byte_is_rejected() {
        let app = vec!["/bin/game".to_string(), "bad\0arg".to_string()];
        assert!(assemble(&ctx(), &[], Some(&app)).is_err());
    }
}
