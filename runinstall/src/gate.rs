//! Activation gate: decides whether a working directory is intercepted.

use glob::{MatchOptions, Pattern};
use std::path::Path;
use tracing::warn;

/// Predicate deciding whether provisioning applies to a directory.
pub trait ActivationGate {
    fn should_intercept(&self, cwd: &Path) -> bool;
}

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Glob-based gate over the working directory and its ancestors.
///
/// `/work/*` activates for `/work/repo` and everything below it. With no
/// patterns configured every directory is intercepted; if patterns were
/// configured but none compiled, nothing is.
#[derive(Debug, Clone, Default)]
pub struct PathGate {
    patterns: Vec<Pattern>,
    configured: bool,
}

impl PathGate {
    /// Compile the configured patterns, skipping invalid ones.
    pub fn new(raw_patterns: &[String]) -> Self {
        let patterns = raw_patterns
            .iter()
            .filter_map(|raw| match Pattern::new(raw) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    warn!("Ignoring invalid match pattern {:?}: {}", raw, e);
                    None
                }
            })
            .collect();
        Self {
            patterns,
            configured: !raw_patterns.is_empty(),
        }
    }
}

impl ActivationGate for PathGate {
    fn should_intercept(&self, cwd: &Path) -> bool {
        if !self.configured {
            return true;
        }
        cwd.ancestors().any(|dir| {
            self.patterns
                .iter()
                .any(|p| p.matches_path_with(dir, MATCH_OPTIONS))
        })
    }
}
