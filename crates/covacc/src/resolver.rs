//! Package resolution
//!
//! Splits the raw positional arguments into packages and passthrough test
//! flags, and expands `/...` patterns through the toolchain's list command.

use crate::command::CommandBuilder;
use crate::config::AccConfig;
use crate::result::{AccError, AccResult};

/// Suffix marking a recursive package pattern
pub const WILDCARD_SUFFIX: &str = "/...";

/// Prefix of toolchain status lines mixed into the list output
pub const DIAGNOSTIC_PREFIX: &str = "go: ";

/// Separator that switches to passthrough without being forwarded
const SEPARATOR: &str = "--";

/// Packages to test and flags to forward to the test runner
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedArgs {
    /// Concrete packages, in input order after expansion
    pub packages: Vec<String>,
    /// Flags forwarded verbatim
    pub passthrough: Vec<String>,
}

/// Source of concrete package names for a wildcard pattern
pub trait PackageLister {
    /// Raw output of listing `pattern`
    fn list(&self, pattern: &str) -> AccResult<String>;
}

/// Lists packages by running the toolchain's list command
#[derive(Debug, Clone)]
pub struct GoList {
    command: String,
}

impl GoList {
    /// Lister running `command <pattern>`
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl PackageLister for GoList {
    fn list(&self, pattern: &str) -> AccResult<String> {
        let builder = CommandBuilder::new(&self.command).arg([pattern]);
        tracing::debug!(command = %builder, "listing packages");

        let output = builder
            .to_std()
            .output()
            .map_err(|e| AccError::spawn(builder.to_string(), e))?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        if !output.status.success() {
            return Err(AccError::ListPackages {
                pattern: pattern.to_string(),
                status: output.status,
                output: combined.trim().to_string(),
            });
        }
        Ok(combined)
    }
}

/// Whether `arg` is a recursive package pattern such as `./...`
#[must_use]
pub fn is_wildcard(arg: &str) -> bool {
    arg.len() > WILDCARD_SUFFIX.len() && arg.ends_with(WILDCARD_SUFFIX)
}

/// Split positional arguments into package arguments and passthrough flags.
///
/// The first token starting with `-` switches every following token to
/// passthrough. A leading `--` does the same but is not forwarded.
#[must_use]
pub fn classify_args(args: &[String]) -> (Vec<String>, Vec<String>) {
    let mut packages = Vec::new();
    let mut passthrough = Vec::new();
    let mut latched = false;

    for arg in args {
        if latched {
            passthrough.push(arg.clone());
        } else if arg == SEPARATOR {
            latched = true;
        } else if arg.starts_with('-') {
            latched = true;
            passthrough.push(arg.clone());
        } else {
            packages.push(arg.clone());
        }
    }

    (packages, passthrough)
}

/// Parse list output into package names.
///
/// Drops blank lines, toolchain diagnostics and every line containing one
/// of the `ignore` substrings.
#[must_use]
pub fn parse_package_list(output: &str, ignore: &[String]) -> Vec<String> {
    output
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .filter(|line| !line.starts_with(DIAGNOSTIC_PREFIX))
        .filter(|line| !ignore.iter().any(|needle| line.contains(needle.as_str())))
        .map(str::to_string)
        .collect()
}

/// Resolve the configured positional arguments.
///
/// Wildcard patterns are expanded in place; every other package argument is
/// kept as given. Duplicates are preserved.
pub fn resolve(config: &AccConfig, lister: &dyn PackageLister) -> AccResult<ResolvedArgs> {
    let (package_args, passthrough) = classify_args(&config.args);
    let mut packages = Vec::with_capacity(package_args.len());

    for arg in package_args {
        if is_wildcard(&arg) {
            let output = lister.list(&arg)?;
            let expanded = parse_package_list(&output, &config.ignore);
            tracing::debug!(pattern = %arg, count = expanded.len(), "expanded pattern");
            packages.extend(expanded);
        } else {
            packages.push(arg);
        }
    }

    Ok(ResolvedArgs {
        packages,
        passthrough,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    /// Lister answering from a fixed table
    struct FakeLister(HashMap<&'static str, &'static str>);

    impl PackageLister for FakeLister {
        fn list(&self, pattern: &str) -> AccResult<String> {
            self.0
                .get(pattern)
                .map(|s| (*s).to_string())
                .ok_or_else(|| AccError::Io(std::io::Error::other(format!("no {pattern}"))))
        }
    }

    mod classify_tests {
        use super::*;
        use proptest::prelude::*;

        #[test]
        fn test_latch_is_one_way() {
            let (packages, passthrough) = classify_args(&strings(&["pkg1", "-x", "pkg2"]));
            assert_eq!(packages, ["pkg1"]);
            assert_eq!(passthrough, ["-x", "pkg2"]);
        }

        #[test]
        fn test_separator_is_dropped() {
            let (packages, passthrough) =
                classify_args(&strings(&[".", "--", "-short", "-run", "TestX"]));
            assert_eq!(packages, ["."]);
            assert_eq!(passthrough, ["-short", "-run", "TestX"]);
        }

        #[test]
        fn test_separator_after_latch_is_forwarded() {
            let (_, passthrough) = classify_args(&strings(&["./a", "-args", "--", "x"]));
            assert_eq!(passthrough, ["-args", "--", "x"]);
        }

        #[test]
        fn test_no_flags() {
            let (packages, passthrough) = classify_args(&strings(&["./a", "./b", "./a"]));
            assert_eq!(packages, ["./a", "./b", "./a"]);
            assert!(passthrough.is_empty());
        }

        proptest! {
            #[test]
            fn prop_everything_after_first_flag_passes_through(
                args in prop::collection::vec(prop_oneof!["[a-z./]{1,8}", "-[a-z]{1,4}"], 0..12)
            ) {
                let first_flag = args.iter().position(|a| a.starts_with('-')).unwrap_or(args.len());
                let (packages, passthrough) = classify_args(&args);
                prop_assert_eq!(&packages[..], &args[..first_flag]);
                prop_assert_eq!(&passthrough[..], &args[first_flag..]);
            }
        }
    }

    mod wildcard_tests {
        use super::*;

        #[test]
        fn test_is_wildcard() {
            assert!(is_wildcard("./..."));
            assert!(is_wildcard("github.com/org/repo/..."));
            assert!(!is_wildcard("..."));
            assert!(!is_wildcard("/..."));
            assert!(!is_wildcard("./pkg"));
        }

        #[test]
        fn test_parse_drops_blank_and_diagnostic_lines() {
            let output = "go: downloading example.com/dep v1.0.0\n\
                          example.com/app\n\
                          \n\
                          example.com/app/store\n\
                          go: finding module for package x\n";
            assert_eq!(
                parse_package_list(output, &[]),
                ["example.com/app", "example.com/app/store"]
            );
        }

        #[test]
        fn test_parse_applies_ignore_substrings() {
            let output = "example.com/app\nexample.com/app/mocks\nexample.com/app/internal/fake\n";
            let ignore = strings(&["mocks", "fake"]);
            assert_eq!(parse_package_list(output, &ignore), ["example.com/app"]);
        }

        #[test]
        fn test_parse_handles_crlf() {
            assert_eq!(parse_package_list("a\r\nb\r\n", &[]), ["a", "b"]);
        }
    }

    mod resolve_tests {
        use super::*;

        fn lister() -> FakeLister {
            FakeLister(HashMap::from([
                ("./...", "go: warming cache\nex/a\nex/b\n\nex/b/mocks\n"),
                ("ex/b/...", "ex/b\nex/b/mocks\n"),
            ]))
        }

        #[test]
        fn test_expansion_in_place() {
            let config = AccConfig::new()
                .with_ignore(["mocks"])
                .with_args(["ex/first", "./...", "ex/last", "-v"]);
            let resolved = resolve(&config, &lister()).unwrap();
            assert_eq!(resolved.packages, ["ex/first", "ex/a", "ex/b", "ex/last"]);
            assert_eq!(resolved.passthrough, ["-v"]);
        }

        #[test]
        fn test_duplicates_across_patterns_are_kept() {
            let config = AccConfig::new().with_args(["./...", "ex/b/..."]);
            let resolved = resolve(&config, &lister()).unwrap();
            assert_eq!(
                resolved.packages,
                ["ex/a", "ex/b", "ex/b/mocks", "ex/b", "ex/b/mocks"]
            );
        }

        #[test]
        fn test_plain_packages_are_not_filtered() {
            let config = AccConfig::new()
                .with_ignore(["mocks"])
                .with_args(["ex/b/mocks"]);
            let resolved = resolve(&config, &lister()).unwrap();
            assert_eq!(resolved.packages, ["ex/b/mocks"]);
        }

        #[test]
        fn test_list_failure_propagates() {
            let config = AccConfig::new().with_args(["unknown/..."]);
            assert!(resolve(&config, &lister()).is_err());
        }

        #[test]
        fn test_flags_are_never_expanded() {
            let config = AccConfig::new().with_args(["-run", "./..."]);
            let resolved = resolve(&config, &lister()).unwrap();
            assert!(resolved.packages.is_empty());
            assert_eq!(resolved.passthrough, ["-run", "./..."]);
        }
    }

    #[cfg(unix)]
    mod go_list_tests {
        use super::*;
        use std::os::unix::fs::PermissionsExt;

        fn script(dir: &tempfile::TempDir, body: &str) -> String {
            let path = dir.path().join("fake-go");
            std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path.to_string_lossy().into_owned()
        }

        #[test]
        fn test_go_list_captures_both_streams() {
            let dir = tempfile::tempdir().unwrap();
            let go = script(&dir, "echo ex/a\necho 'go: note' >&2");
            let output = GoList::new(format!("{go} list")).list("./...").unwrap();
            assert!(output.contains("ex/a"));
            assert!(output.contains("go: note"));
        }

        #[test]
        fn test_go_list_nonzero_exit_is_error() {
            let dir = tempfile::tempdir().unwrap();
            let go = script(&dir, "echo 'malformed import path' >&2\nexit 1");
            let err = GoList::new(format!("{go} list")).list("bad/...").unwrap_err();
            assert!(matches!(err, AccError::ListPackages { .. }));
            assert!(err.to_string().contains("malformed import path"));
        }

        #[test]
        fn test_go_list_missing_binary() {
            let err = GoList::new("/nonexistent/covacc-go list")
                .list("./...")
                .unwrap_err();
            assert!(matches!(err, AccError::Spawn { .. }));
        }
    }
}
