//! Argument merging
//!
//! Resolves a profile flag list against an override flag list: override
//! flags win on canonical-name equality, conflict-group members are
//! mutually exclusive, and everything else passes through in order. Chained
//! profiles fold left-to-right so later profiles patch earlier ones and the
//! user's explicit override always wins last.

use std::collections::HashSet;

use crate::args::{Flag, FlagSet};
use crate::constants::flags::CONFLICT_GROUPS;

/// Index of the conflict group a canonical name belongs to, if any.
///
/// A flag belongs to at most one group; groups resolve independently.
fn conflict_group(canon: &str) -> Option<usize> {
    CONFLICT_GROUPS.iter().position(|group| group.contains(&canon))
}

/// Keep only the last occurrence of each canonical name within one side.
///
/// Same-side duplicates are resolved before cross-side resolution; distinct
/// members of a conflict group have distinct canonical names and are not
/// touched here.
fn dedup_last_wins(flags: &[Flag]) -> Vec<Flag> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut kept: Vec<Flag> = Vec::new();
    for flag in flags.iter().rev() {
        if seen.insert(flag.canonical().to_string()) {
            kept.push(flag.clone());
        }
    }
    kept.reverse();
    kept
}

/// Merge a profile flag set with an override flag set.
///
/// The result reads as the profile's flags patched by the override's flags:
/// surviving profile flags first in their original order, then the override
/// flags in theirs, then profile positionals followed by override
/// positionals.
pub fn merge_arguments(base: &FlagSet, override_set: &FlagSet) -> FlagSet {
    let base_flags = dedup_last_wins(&base.flags);
    let override_flags = dedup_last_wins(&override_set.flags);

    // Canonical names and conflict groups claimed by the override side.
    let override_canons: HashSet<String> = override_flags
        .iter()
        .map(|f| f.canonical().to_string())
        .collect();
    let override_groups: HashSet<usize> = override_flags
        .iter()
        .filter_map(|f| conflict_group(f.canonical()))
        .collect();

    let mut flags = Vec::new();
    for flag in &base_flags {
        let canon = flag.canonical();
        let survives = match conflict_group(canon) {
            // An exclusive flag is dropped when the override mentions any
            // member of the same group, even a different one.
            Some(group) => !override_groups.contains(&group),
            None => !override_canons.contains(canon),
        };
        if survives {
            flags.push(flag.clone());
        }
    }
    flags.extend(override_flags);

    let mut positionals = base.positionals.clone();
    positionals.extend(override_set.positionals.iter().cloned());

    FlagSet { flags, positionals }
}

/// Fold an ordered list of profile flag sets and a final override into one.
///
/// Each step treats the accumulator as base and the next profile as
/// override, so later profiles win conflicts against earlier ones. An empty
/// profile list yields the override unchanged.
pub fn merge_multiple(profiles: Vec<FlagSet>, override_set: FlagSet) -> FlagSet {
    let mut iter = profiles.into_iter();
    let Some(first) = iter.next() else {
        return override_set;
    };
    let folded = iter.fold(first, |acc, profile| merge_arguments(&acc, &profile));
    merge_arguments(&folded, &override_set)
}
