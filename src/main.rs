#![forbid(unsafe_code)]

//! nscb - profile-based gamescope launcher
//!
//! Wraps gamescope invocations with named flag profiles from nscb.conf,
//! merges them with command-line overrides, and runs the result with the
//! app's environment handled (LD_PRELOAD isolation, config exports,
//! pre/post hooks).

mod args;
mod command;
mod config;
mod constants;
mod environment;
mod merge;
mod paths;
mod profiles;
mod runner;

use anyhow::{Result, bail};
use tracing::{Level as TraceLevel, debug, error};
use tracing_subscriber::FmtSubscriber;

use crate::args::{separate_flags_and_positionals, split_at_separator};
use crate::command::CommandContext;
use crate::constants::{bin, flags::SEPARATOR};

static USAGE_TEXT: &str = r#"nscb - profile-based gamescope launcher
Usage:
  nscb -p fullscreen -- /bin/mygame              # Single profile
  nscb --profiles=hd,hdr -- /bin/mygame          # Multiple profiles
  nscb -p hd -p hdr -- /bin/mygame               # Multiple profiles
  nscb -p hd -W 3840 -H 2160 -- /bin/mygame      # Profile with overrides

  Config file: $XDG_CONFIG_HOME/nscb.conf or $HOME/.config/nscb.conf
  Config format: KEY=VALUE (e.g. "fullscreen=-f"), export KEY=VALUE
  Hooks: NSCB_PRE_CMD=... / NSCB_POST_CMD=... environment variables
"#;

fn main() {
    // Parse log level from environment variable
    let log_level = match std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set up logging: {e}");
    }

    let argv: Vec<String> = std::env::args().skip(1).collect();
    match run(&argv) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("{e:#}");
            std::process::exit(1);
        }
    }
}

fn run(argv: &[String]) -> Result<i32> {
    if argv.is_empty() || argv.iter().any(|a| a == "--help") {
        println!("{USAGE_TEXT}");
        return Ok(0);
    }

    if !paths::executable_exists(bin::GAMESCOPE) {
        bail!("'{}' not found in PATH", bin::GAMESCOPE);
    }

    let (profile_names, rest) = profiles::parse_profile_args(argv)?;

    // Config is only consulted when profiles were requested; its exports
    // ride along with them.
    let mut exports = Vec::new();
    let profile_sets = if profile_names.is_empty() {
        Vec::new()
    } else {
        let Some(path) = config::find_config_file() else {
            bail!("could not find {}", constants::config::FILENAME);
        };
        let cfg = config::load_config(&path)?;
        exports = cfg.exports.clone();
        profiles::resolve_profiles(&profile_names, &cfg)?
    };

    let separator_present = rest.iter().any(|a| a == SEPARATOR);
    let (gamescope_args, app_args) = split_at_separator(&rest);
    let override_set = separate_flags_and_positionals(&gamescope_args);

    let merged = merge::merge_multiple(profile_sets, override_set).into_args();
    debug!(merged = ?merged, "Merged gamescope arguments");

    let ctx = CommandContext::from_env(exports);
    debug!(
        active = ctx.gamescope_active,
        preload = ?ctx.ld_preload,
        preload_wrap_disabled = ctx.preload_wrap_disabled,
        "Environment policy"
    );

    let app_command = separator_present.then_some(app_args.as_slice());
    let Some(cmd) = command::assemble(&ctx, &merged, app_command)? else {
        debug!("Nothing to execute");
        return Ok(0);
    };

    println!("Executing: {cmd}");
    runner::run(&cmd)
}
