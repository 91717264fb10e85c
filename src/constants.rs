//! Application-wide constants
//!
//! The gamescope flag table and conflict groups live here together with
//! every environment variable name the launcher reads, providing a single
//! source of truth for constant values.

/// Gamescope flag identity constants
pub mod flags {
    /// Short-form → long-form gamescope flag mapping.
    ///
    /// Long forms are the canonical identity used for equality during
    /// merging; any flag absent from this table is its own canonical form.
    pub const GAMESCOPE_FLAG_MAP: &[(&str, &str)] = &[
        ("-W", "--output-width"),
        ("-H", "--output-height"),
        ("-w", "--nested-width"),
        ("-h", "--nested-height"),
        ("-b", "--borderless"),
        ("-C", "--hide-cursor-delay"),
        ("-e", "--steam"),
        ("-f", "--fullscreen"),
        ("-F", "--filter"),
        ("-g", "--grab"),
        ("-o", "--nested-unfocused-refresh"),
        ("-O", "--prefer-output"),
        ("-r", "--nested-refresh"),
        ("-R", "--ready-fd"),
        ("-s", "--mouse-sensitivity"),
        ("-T", "--stats-path"),
        ("--sharpness", "--fsr-sharpness"),
    ];

    /// Groups of canonical flag names that are mutually exclusive.
    ///
    /// At most one group member survives a merge when the override side
    /// mentions any member of that group.
    pub const CONFLICT_GROUPS: &[&[&str]] = &[&["--fullscreen", "--borderless"]];

    /// Token separating gamescope arguments from the app command
    pub const SEPARATOR: &str = "--";
}

/// Environment variables the launcher reads
pub mod env {
    /// Hook command run before the assembled command
    pub const PRE_CMD: &str = "NSCB_PRE_CMD";

    /// Legacy alias for [`PRE_CMD`], consulted only when it is unset
    pub const PRE_CMD_LEGACY: &str = "NSCB_PRECMD";

    /// Hook command run after the assembled command
    pub const POST_CMD: &str = "NSCB_POST_CMD";

    /// Legacy alias for [`POST_CMD`], consulted only when it is unset
    pub const POST_CMD_LEGACY: &str = "NSCB_POSTCMD";

    /// Truthy values ("1", "true", "yes", "on") disable LD_PRELOAD wrapping
    pub const DISABLE_LD_PRELOAD_WRAP: &str = "NSCB_DISABLE_LD_PRELOAD_WRAP";

    /// Set by faugus-launcher; its mere presence disables LD_PRELOAD wrapping
    pub const FAUGUS_LOG: &str = "FAUGUS_LOG";

    /// The library-preload variable itself
    pub const LD_PRELOAD: &str = "LD_PRELOAD";

    /// Desktop identifier; equals "gamescope" inside a gamescope session
    pub const XDG_CURRENT_DESKTOP: &str = "XDG_CURRENT_DESKTOP";
}

/// Config file location constants
pub mod config {
    /// Config file name under the user config directory
    pub const FILENAME: &str = "nscb.conf";
}

/// External executables
pub mod bin {
    /// The wrapped compositor
    pub const GAMESCOPE: &str = "gamescope";
}
