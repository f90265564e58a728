use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{Config, DirectoryConfig, DEFAULT_CONFIG_FILE, DEFAULT_SOURCE_NAME};
use crate::utils::paths::{absolutize, relative_path};

/// Loads the configuration file.
///
/// `None` (or the default file name) looks for `dimandocs.json` in the
/// working directory and silently falls back to the built-in default when it
/// does not exist. Any other file must exist and parse.
pub fn load_config(config_file: Option<&Path>, working_dir: &Path) -> Result<Config> {
    let is_default = config_file.map_or(true, |p| p == Path::new(DEFAULT_CONFIG_FILE));
    let config_path = match config_file {
        Some(path) => working_dir.join(path),
        None => working_dir.join(DEFAULT_CONFIG_FILE),
    };

    let raw = match fs::read_to_string(&config_path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound && is_default => {
            tracing::info!("No {} found, using default configuration", DEFAULT_CONFIG_FILE);
            return Ok(Config::default());
        }
        Err(e) => {
            return Err(e)
                .with_context(|| format!("Failed to read config file {}", config_path.display()));
        }
    };

    let config: Config = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse config file {}", config_path.display()))?;
    tracing::info!("Loaded config from {:?}", config_path);
    Ok(config)
}

/// Points the configuration at a PATH given on the command line.
///
/// A directory replaces the configured directories. A file replaces them
/// with its parent directory and is returned, as an absolute path, so the
/// browser can be opened on it.
pub fn apply_target_path(
    config: &mut Config,
    target: &Path,
    working_dir: &Path,
) -> Result<Option<PathBuf>> {
    let absolute = absolutize(working_dir, target);
    let metadata = fs::metadata(&absolute)
        .with_context(|| format!("Path does not exist: {}", target.display()))?;

    let (scan_dir, target_file) = if metadata.is_dir() {
        (absolute, None)
    } else {
        let parent = absolute
            .parent()
            .map(Path::to_path_buf)
            .with_context(|| format!("Path has no parent directory: {}", target.display()))?;
        (parent, Some(absolute))
    };

    config.directories = vec![DirectoryConfig::markdown(
        scan_root(&scan_dir, working_dir),
        DEFAULT_SOURCE_NAME,
    )];
    Ok(target_file)
}

/// Directories inside the working directory are walked through a relative
/// path so ignore patterns never see the working directory's ancestors.
fn scan_root(dir: &Path, working_dir: &Path) -> PathBuf {
    if dir.starts_with(working_dir) {
        Path::new(".").join(relative_path(working_dir, dir))
    } else {
        dir.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::patterns::MARKDOWN_FILE_PATTERN;
    use tempfile::TempDir;

    #[test]
    fn test_missing_default_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config(None, dir.path()).unwrap();
        assert_eq!(config, Config::default());

        let config = load_config(Some(Path::new(DEFAULT_CONFIG_FILE)), dir.path()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = load_config(Some(Path::new("custom.json")), dir.path()).unwrap_err();
        assert!(format!("{err:#}").contains("custom.json"));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "{ \"port\": ").unwrap();
        let err = load_config(None, dir.path()).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse config file"));
    }

    #[test]
    fn test_file_without_directories_indexes_nothing() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(DEFAULT_CONFIG_FILE), r#"{"title": "Empty"}"#).unwrap();

        let config = load_config(None, dir.path()).unwrap();

        assert!(config.directories.is_empty());
        assert_eq!(config.title, "Empty");
        assert_eq!(config.port_number(), 8090);
        assert_eq!(config.ignore_patterns, Config::default().ignore_patterns);
    }

    #[test]
    fn test_loads_file_and_fills_missing_fields() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("docs.json"),
            r#"{
                "directories": [
                    {"path": "./guides", "name": "Guides", "file_pattern": "\\.md$"},
                    {"path": "./services", "name": "Services"}
                ],
                "title": "Team Docs",
                "ignore_patterns": [".*/archive/.*"]
            }"#,
        )
        .unwrap();

        let config = load_config(Some(Path::new("docs.json")), dir.path()).unwrap();
        assert_eq!(config.title, "Team Docs");
        assert_eq!(config.port_number(), 8090);
        assert_eq!(config.directories.len(), 2);
        assert_eq!(config.directories[1].file_pattern, None);
        assert_eq!(config.ignore_patterns, vec![".*/archive/.*".to_string()]);
    }

    #[test]
    fn test_target_directory_replaces_directories() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("docs/api")).unwrap();
        let mut config = Config::default();
        config.directories.push(DirectoryConfig::markdown("./other", "Other"));

        let target = apply_target_path(&mut config, Path::new("docs/api"), dir.path()).unwrap();

        assert_eq!(target, None);
        assert_eq!(config.directories.len(), 1);
        assert_eq!(config.directories[0].path, PathBuf::from("./docs/api"));
        assert_eq!(config.directories[0].name, "Documents");
        assert_eq!(
            config.directories[0].file_pattern.as_deref(),
            Some(MARKDOWN_FILE_PATTERN)
        );
    }

    #[test]
    fn test_target_file_browses_its_directory() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("docs")).unwrap();
        fs::write(dir.path().join("docs/guide.md"), "# Guide").unwrap();
        let mut config = Config::default();

        let target =
            apply_target_path(&mut config, Path::new("./docs/guide.md"), dir.path()).unwrap();

        assert_eq!(target, Some(dir.path().join("docs").join("guide.md")));
        assert_eq!(config.directories[0].path, PathBuf::from("./docs"));
    }

    #[test]
    fn test_target_outside_working_dir_stays_absolute() {
        let outside = TempDir::new().unwrap();
        let working = TempDir::new().unwrap();
        let mut config = Config::default();

        apply_target_path(&mut config, outside.path(), working.path()).unwrap();

        assert_eq!(config.directories[0].path, outside.path());
    }

    #[test]
    fn test_missing_target_is_an_error() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        let err = apply_target_path(&mut config, Path::new("nope.md"), dir.path()).unwrap_err();
        assert!(err.to_string().contains("Path does not exist: nope.md"));
        assert_eq!(config, Config::default());
    }
}
