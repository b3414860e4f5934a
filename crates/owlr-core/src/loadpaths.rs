//! Load-path enumeration via the Ruby toolchain.
//!
//! Invoked once per cache rebuild. The `bundle exec` call takes hundreds of
//! milliseconds to seconds, which is the whole reason the cache exists.

use crate::config::Config;
use crate::error::Error;
use std::path::PathBuf;
use std::process::Command;

/// Ruby expression evaluated through `rails runner` for Rails projects.
/// Asset paths are merged with Opal's own so sprockets-managed directories
/// resolve too.
const RAILS_EXPR: &str = "puts (Rails.configuration.respond_to?(:assets) ? \
(Rails.configuration.assets.paths + Opal.paths).uniq : Opal.paths); exit 0";

/// Ruby expression for plain bundler projects.
const PLAIN_EXPR: &str = "Bundler.require; puts Opal.paths; exit 0";

/// Source of the ordered load-path list.
///
/// The indirection keeps the cache store and resolver testable without a
/// Ruby toolchain on the machine.
pub trait LoadPathsSource {
    /// Enumerate the search roots, in the host toolchain's priority order.
    fn enumerate(&self) -> Result<Vec<String>, Error>;
}

/// Enumerates load paths by running `bundle exec` in the project root.
#[derive(Debug, Clone)]
pub struct BundlerEnumerator {
    root: PathBuf,
    rails_marker: PathBuf,
}

impl BundlerEnumerator {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            root: config.root.clone(),
            rails_marker: config.rails_marker(),
        }
    }

    /// Arguments after `bundle`, selected by the Rails marker file.
    fn invocation(&self) -> [&str; 4] {
        if self.rails_marker.exists() {
            ["exec", "rails", "runner", RAILS_EXPR]
        } else {
            ["exec", "ruby", "-e", PLAIN_EXPR]
        }
    }
}

impl LoadPathsSource for BundlerEnumerator {
    fn enumerate(&self) -> Result<Vec<String>, Error> {
        let args = self.invocation();
        let command = format!("bundle {} {}", args[0], args[1]);

        let output = Command::new("bundle")
            .args(args)
            .current_dir(&self.root)
            .output()
            .map_err(|source| Error::ExternalToolSpawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(Error::ExternalToolFailed {
                command,
                status: output.status,
            });
        }

        let stdout = String::from_utf8(output.stdout)
            .map_err(|_| Error::ExternalToolOutput { command })?;
        Ok(split_lines(&stdout))
    }
}

/// Split newline-separated output into lines, dropping the single trailing
/// empty line left by newline-terminated output. Lines are not otherwise
/// validated or deduplicated.
fn split_lines(output: &str) -> Vec<String> {
    let mut lines: Vec<String> = output.split('\n').map(str::to_owned).collect();
    if lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn test_split_lines_drops_single_trailing_empty() {
        assert_eq!(
            split_lines("/a\n/b\n"),
            vec!["/a".to_owned(), "/b".to_owned()]
        );
    }

    #[test]
    fn test_split_lines_keeps_interior_empty_lines() {
        assert_eq!(
            split_lines("/a\n\n/b\n"),
            vec!["/a".to_owned(), String::new(), "/b".to_owned()]
        );
    }

    #[test]
    fn test_split_lines_without_trailing_newline() {
        assert_eq!(split_lines("/a\n/b"), vec!["/a".to_owned(), "/b".to_owned()]);
    }

    #[test]
    fn test_split_lines_empty_output() {
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn test_invocation_selects_rails_form() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("bin")).unwrap();
        fs::write(dir.path().join("bin/rails"), "#!/usr/bin/env ruby").unwrap();

        let config = Config::new(dir.path().to_path_buf());
        let enumerator = BundlerEnumerator::new(&config);
        assert_eq!(enumerator.invocation()[1], "rails");
    }

    #[test]
    fn test_invocation_selects_plain_form() {
        let dir = tempdir().unwrap();
        let config = Config::new(dir.path().to_path_buf());
        let enumerator = BundlerEnumerator::new(&config);
        assert_eq!(enumerator.invocation()[1], "ruby");
    }

    #[test]
    fn test_enumerate_missing_bundler_is_spawn_error() {
        // Point the enumerator at a root where `bundle` cannot run by
        // shadowing PATH is fragile; instead rely on a root that exists and
        // accept either spawn failure or non-zero exit depending on the
        // machine.
        let dir = tempdir().unwrap();
        let config = Config::new(dir.path().to_path_buf());
        let enumerator = BundlerEnumerator {
            root: config.root.clone(),
            rails_marker: PathBuf::from("/nonexistent/bin/rails"),
        };
        let result = enumerator.enumerate();
        if let Err(err) = result {
            assert!(matches!(
                err,
                Error::ExternalToolSpawn { .. } | Error::ExternalToolFailed { .. }
            ));
        }
    }
}
