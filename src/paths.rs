//! Path lookups

use std::os::unix::fs::PermissionsExt;

/// Check whether `name` resolves to an executable file on `$PATH`.
pub fn executable_exists(name: &str) -> bool {
    let Some(path) = std::env::var_os("PATH") else {
        return false;
    };

    for dir in std::env::split_paths(&path) {
        if dir.as_os_str().is_empty() {
            continue;
        }
        let candidate = dir.join(name);
        if let Ok(meta) = candidate.metadata()
            && meta.is_file()
            && meta.permissions().mode() & 0o111 != 0
        {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_sh() {
        assert!(executable_exists("sh"));
    }

    #[test]
    fn test_missing_executable() {
        assert!(!executable_exists("nscb-test-no-such-binary"));
    }
}
