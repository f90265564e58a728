//! Compiles and evaluates the ignore and file-inclusion regular expressions.

use regex::Regex;
use std::path::Path;

use super::error::{CoreError, PatternScope};

/// File pattern of the built-in default configuration and of a PATH override.
pub const MARKDOWN_FILE_PATTERN: &str = r"\.md$";

/// File pattern for a configured directory that leaves `file_pattern` unset.
pub const README_FILE_PATTERN: &str = r"(?i)^readme\.md$";

/// Directory names ignored by the built-in default configuration.
pub const DEFAULT_IGNORED_DIRS: &[&str] = &[
    // Version control
    ".git",
    ".svn",
    ".hg",
    // Dependencies
    "node_modules",
    "vendor",
    "bower_components",
    // Build outputs
    "build",
    "dist",
    "out",
    "target",
    // Frameworks
    ".next",
    ".nuxt",
    ".vuepress",
    // Caches
    ".cache",
    "__pycache__",
    ".pytest_cache",
    ".nyc_output",
    // IDEs
    ".vscode",
    ".idea",
    ".eclipse",
    // Python venvs
    "venv",
    "env",
    ".venv",
    ".virtualenv",
    // Coverage
    "coverage",
    "htmlcov",
    // Temp folders
    "tmp",
    "temp",
    ".tmp",
];

/// Builds the ignore pattern that matches a directory with this exact name
/// anywhere in a path, together with everything below it.
pub fn dir_name_pattern(name: &str) -> String {
    format!("(^|/){}(/|$)", regex::escape(name))
}

/// Compiles a single pattern, tagging a failure with where the pattern came from.
pub fn compile_pattern(pattern: &str, scope: PatternScope) -> Result<Regex, CoreError> {
    Regex::new(pattern).map_err(|source| CoreError::InvalidPattern {
        pattern: pattern.to_string(),
        scope,
        source,
    })
}

/// The compiled set of ignore patterns.
///
/// A path is ignored when any pattern matches it. The scanner uses this to
/// prune whole directories, so a match on a directory excludes its subtree.
#[derive(Debug, Clone, Default)]
pub struct PatternMatcher {
    patterns: Vec<Regex>,
}

impl PatternMatcher {
    /// Compiles every ignore pattern, failing on the first invalid one.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, CoreError> {
        let patterns = patterns
            .iter()
            .map(|p| compile_pattern(p.as_ref(), PatternScope::Ignore))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Returns true if any ignore pattern matches the full path.
    pub fn should_ignore(&self, path: &Path) -> bool {
        if self.patterns.is_empty() {
            return false;
        }
        let path_str = path_for_matching(path);
        self.patterns.iter().any(|re| re.is_match(&path_str))
    }

    /// The source text of each pattern, in configuration order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(Regex::as_str)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Patterns are written with `/` separators on every platform.
fn path_for_matching(path: &Path) -> String {
    let raw = path.to_string_lossy();
    if cfg!(windows) {
        raw.replace('\\', "/")
    } else {
        raw.into_owned()
    }
}
