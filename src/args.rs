//! Argument classification
//!
//! Splits a raw argument vector at the `--` separator and, within the
//! gamescope-bound half, separates flags (with an optional attached value)
//! from bare positional tokens. No validation happens here — unknown flags
//! are carried verbatim and only canonicalized for comparison during merge.

use crate::constants::flags::{GAMESCOPE_FLAG_MAP, SEPARATOR};

/// One gamescope-bound option: a name token and an optional attached value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flag {
    pub name: String,
    pub value: Option<String>,
}

impl Flag {
    pub fn new(name: &str, value: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            value: value.map(str::to_string),
        }
    }

    /// Long-form identity of this flag, used for equality during merging
    pub fn canonical(&self) -> &str {
        canonical(&self.name)
    }
}

/// An argument list classified into flags and positional tokens.
///
/// Both sequences keep their original relative order; every token of the
/// source list lands in exactly one of the two.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagSet {
    pub flags: Vec<Flag>,
    pub positionals: Vec<String>,
}

/// Map a flag name to its canonical long form.
///
/// Total over all strings: names absent from the table map to themselves.
pub fn canonical(name: &str) -> &str {
    GAMESCOPE_FLAG_MAP
        .iter()
        .find(|(short, _)| *short == name)
        .map(|(_, long)| *long)
        .unwrap_or(name)
}

/// Split arguments at the first `--` separator.
///
/// The separator itself belongs to neither half. Without a separator the
/// whole list is gamescope-bound and the app command is empty.
pub fn split_at_separator(args: &[String]) -> (Vec<String>, Vec<String>) {
    match args.iter().position(|a| a == SEPARATOR) {
        Some(idx) => (args[..idx].to_vec(), args[idx + 1..].to_vec()),
        None => (args.to_vec(), Vec::new()),
    }
}

/// Classify gamescope-bound arguments into flags and positionals.
///
/// A token starting with `-` is a flag name; when the next token does not
/// itself start with `-` it is consumed as that flag's value. Everything
/// else is a positional.
pub fn separate_flags_and_positionals(args: &[String]) -> FlagSet {
    let mut flags = Vec::new();
    let mut positionals = Vec::new();

    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];

        if !arg.starts_with('-') {
            positionals.push(arg.clone());
            i += 1;
            continue;
        }

        if i + 1 < args.len() && !args[i + 1].starts_with('-') {
            flags.push(Flag::new(arg, Some(args[i + 1].as_str())));
            i += 2;
        } else {
            flags.push(Flag::new(arg, None));
            i += 1;
        }
    }

    FlagSet { flags, positionals }
}

impl FlagSet {
    /// Flatten back into a flat token list: name, then value when present,
    /// then the positionals.
    pub fn into_args(self) -> Vec<String> {
        let mut out = Vec::new();
        for flag in self.flags {
            out.push(flag.name);
            if let Some(value) = flag.value {
                out.push(value);
            }
        }
        out.extend(self.positionals);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_vec(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_canonical_maps_short_to_long() {
        assert_eq!(canonical("-f"), "--fullscreen");
        assert_eq!(canonical("-W"), "--output-width");
        assert_eq!(canonical("--sharpness"), "--fsr-sharpness");
    }

    #[test]
    fn test_canonical_unknown_maps_to_itself() {
        assert_eq!(canonical("--hdr-enabled"), "--hdr-enabled");
        assert_eq!(canonical("-Z"), "-Z");
    }

    #[test]
    fn test_split_at_separator() {
        let (before, after) = split_at_separator(&to_vec(&["-f", "--", "game", "-opt"]));
        assert_eq!(before, to_vec(&["-f"]));
        assert_eq!(after, to_vec(&["game", "-opt"]));
    }

    #[test]
    fn test_split_without_separator() {
        let (before, after) = split_at_separator(&to_vec(&["-f", "-W", "1920"]));
        assert_eq!(before, to_vec(&["-f", "-W", "1920"]));
        assert!(after.is_empty());
    }

    #[test]
    fn test_split_keeps_only_first_separator() {
        let (before, after) = split_at_separator(&to_vec(&["--", "game", "--", "arg"]));
        assert!(before.is_empty());
        assert_eq!(after, to_vec(&["game", "--", "arg"]));
    }

    #[test]
    fn test_separate_flag_with_value() {
        let set = separate_flags_and_positionals(&to_vec(&["-W", "1920", "-f"]));
        assert_eq!(
            set.flags,
            vec![Flag::new("-W", Some("1920")), Flag::new("-f", None)]
        );
        assert!(set.positionals.is_empty());
    }

    #[test]
    fn test_separate_adjacent_flags_stay_valueless() {
        let set = separate_flags_and_positionals(&to_vec(&["-f", "-b"]));
        assert_eq!(set.flags, vec![Flag::new("-f", None), Flag::new("-b", None)]);
    }

    #[test]
    fn test_separate_positionals_preserve_order() {
        let set = separate_flags_and_positionals(&to_vec(&["one", "-f", "-W", "10", "two"]));
        assert_eq!(set.positionals, to_vec(&["one", "two"]));
        assert_eq!(
            set.flags,
            vec![Flag::new("-f", None), Flag::new("-W", Some("10"))]
        );
    }

    #[test]
    fn test_into_args_roundtrip() {
        let set = separate_flags_and_positionals(&to_vec(&["-f", "-W", "1920", "pos"]));
        assert_eq!(set.into_args(), to_vec(&["-f", "-W", "1920", "pos"]));
    }
}
