pub mod settings;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::cache::{IndexFingerprint, SourceFingerprint};
use crate::core::error::{CoreError, PatternScope};
use crate::core::patterns::{
    compile_pattern, dir_name_pattern, PatternMatcher, DEFAULT_IGNORED_DIRS,
    MARKDOWN_FILE_PATTERN, README_FILE_PATTERN,
};
use crate::utils::paths::absolutize;

pub const DEFAULT_CONFIG_FILE: &str = "dimandocs.json";
pub const DEFAULT_PORT: u16 = 8090;
pub const DEFAULT_TITLE: &str = "Documentation Browser";
pub const DEFAULT_SOURCE_NAME: &str = "Documents";

/// One directory to scan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DirectoryConfig {
    pub path: PathBuf,
    pub name: String,
    /// Matched against file names only. Unset means README files only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_pattern: Option<String>,
}

impl DirectoryConfig {
    /// A directory that indexes every markdown file under `path`.
    pub fn markdown(path: impl Into<PathBuf>, name: &str) -> Self {
        Self {
            path: path.into(),
            name: name.to_string(),
            file_pattern: Some(MARKDOWN_FILE_PATTERN.to_string()),
        }
    }

    /// The configured pattern, with an empty string treated as unset.
    pub fn effective_file_pattern(&self) -> &str {
        match self.file_pattern.as_deref() {
            Some(p) if !p.is_empty() => p,
            _ => README_FILE_PATTERN,
        }
    }
}

/// The contents of a configuration file.
///
/// A file without `directories` indexes nothing; the other fields fall back
/// to the built-in values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub directories: Vec<DirectoryConfig>,
    #[serde(default = "default_port")]
    pub port: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_ignore_patterns")]
    pub ignore_patterns: Vec<String>,
}

fn default_port() -> String {
    DEFAULT_PORT.to_string()
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

fn default_ignore_patterns() -> Vec<String> {
    DEFAULT_IGNORED_DIRS
        .iter()
        .map(|name| dir_name_pattern(name))
        .collect()
}

impl Config {
    /// The configured port, or [`DEFAULT_PORT`] when it is absent or invalid.
    pub fn port_number(&self) -> u16 {
        self.port.trim().parse().unwrap_or(DEFAULT_PORT)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            directories: vec![DirectoryConfig::markdown("./", DEFAULT_SOURCE_NAME)],
            port: default_port(),
            title: default_title(),
            ignore_patterns: default_ignore_patterns(),
        }
    }
}

/// A configured directory with its file pattern compiled.
#[derive(Debug, Clone)]
pub struct SourceDirectory {
    pub path: PathBuf,
    pub name: String,
    pub file_pattern: Regex,
}

/// A [`Config`] whose patterns have all been compiled.
///
/// Building one is the fail-fast point for invalid regular expressions.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub title: String,
    pub port: u16,
    pub sources: Vec<SourceDirectory>,
    pub ignore: PatternMatcher,
}

impl ResolvedConfig {
    pub fn compile(config: &Config) -> Result<Self, CoreError> {
        let ignore = PatternMatcher::new(&config.ignore_patterns)?;

        let sources = config
            .directories
            .iter()
            .map(|dir| {
                let file_pattern = compile_pattern(
                    dir.effective_file_pattern(),
                    PatternScope::File(dir.path.clone()),
                )?;
                Ok(SourceDirectory {
                    path: dir.path.clone(),
                    name: dir.name.clone(),
                    file_pattern,
                })
            })
            .collect::<Result<Vec<_>, CoreError>>()?;

        Ok(Self {
            title: config.title.clone(),
            port: config.port_number(),
            sources,
            ignore,
        })
    }

    /// Describes what a scan with this configuration would index, with
    /// roots resolved against `working_dir`.
    pub fn fingerprint(&self, working_dir: &Path) -> IndexFingerprint {
        IndexFingerprint {
            sources: self
                .sources
                .iter()
                .map(|source| SourceFingerprint {
                    path: absolutize(working_dir, &source.path),
                    name: source.name.clone(),
                    file_pattern: source.file_pattern.as_str().to_string(),
                })
                .collect(),
            ignore_patterns: self.ignore.patterns().map(str::to_string).collect(),
        }
    }
}
