use regex::Regex;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::content_loader::read_text;
use super::{Content, CoreError, Document, PatternMatcher};
use crate::utils::paths::{absolutize, display_relative_dir, to_slash};

const TITLE_MARKER: &str = "# ";
const OVERVIEW_HEADING: &str = "## Overview";

/// Walks source directories and turns matching files into [`Document`]s.
pub struct DocumentScanner {
    working_dir: PathBuf,
}

impl DocumentScanner {
    /// `working_dir` is the directory display paths are made relative to.
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }

    /// Scans one source directory depth-first.
    ///
    /// A relative `root` is resolved against the working directory. Ignore
    /// patterns see each entry's path as it would be written from `root` as
    /// configured, and ignored directories are pruned, never entered. An
    /// error walking the root fails the whole scan; errors below it are
    /// logged and skipped.
    pub fn scan(
        &self,
        root: &Path,
        source_name: &str,
        file_pattern: &Regex,
        ignore: &PatternMatcher,
    ) -> Result<Vec<Document>, CoreError> {
        let walk_root = absolutize(&self.working_dir, root);
        let mut documents = Vec::new();

        let walker = WalkDir::new(&walk_root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| {
                !ignore.should_ignore(&as_configured(root, &walk_root, entry.path()))
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if err.depth() == 0 => {
                    return Err(CoreError::Walk {
                        path: root.to_path_buf(),
                        source: err,
                    });
                }
                Err(err) => {
                    tracing::warn!("Skipping unreadable entry under {}: {}", root.display(), err);
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                continue;
            }

            let file_name = entry.file_name().to_string_lossy();
            if !file_pattern.is_match(&file_name) {
                continue;
            }

            match self.process_file(entry.path(), &walk_root, source_name) {
                Ok(doc) => documents.push(doc),
                Err(e) => {
                    tracing::warn!("Failed to process file {}: {}", entry.path().display(), e);
                }
            }
        }

        tracing::info!(
            "Scanned {} ({}): {} documents",
            root.display(),
            source_name,
            documents.len()
        );
        Ok(documents)
    }

    fn process_file(
        &self,
        path: &Path,
        root: &Path,
        source_name: &str,
    ) -> Result<Document, CoreError> {
        let content = read_text(path)?;

        let rel = path.strip_prefix(root).unwrap_or(path);
        let rel_path = to_slash(rel);
        let dir_name = dir_name_for(rel);

        let containing_dir = path.parent().unwrap_or(path);
        let abs_path = display_relative_dir(&self.working_dir, containing_dir);

        let title = extract_title(&content).unwrap_or_else(|| dir_name.clone());
        let overview = extract_overview(&content);

        Ok(Document {
            title,
            path: path.to_path_buf(),
            content: Content::loaded(content),
            rel_path,
            dir_name,
            source_dir: root.to_path_buf(),
            source_name: source_name.to_string(),
            abs_path,
            overview,
        })
    }
}

/// Rewrites a walked path so it starts with the root as configured.
fn as_configured<'a>(root: &'a Path, walk_root: &Path, path: &'a Path) -> Cow<'a, Path> {
    match path.strip_prefix(walk_root) {
        Ok(rel) if rel.as_os_str().is_empty() => Cow::Borrowed(root),
        Ok(rel) => Cow::Owned(root.join(rel)),
        Err(_) => Cow::Borrowed(path),
    }
}

/// `<parent>/<file>` for nested files, just `<file>` at the root level.
fn dir_name_for(rel: &Path) -> String {
    let file_name = rel
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    match rel.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            format!("{}/{}", to_slash(parent), file_name)
        }
        _ => file_name,
    }
}

/// The text of the first line that starts with a level-1 heading marker.
pub fn extract_title(content: &str) -> Option<String> {
    content
        .lines()
        .find_map(|line| line.strip_prefix(TITLE_MARKER))
        .map(str::to_string)
}

/// The first paragraph after an `## Overview` heading, lines joined by spaces.
///
/// Blank lines right after the heading are skipped. Once a line has been
/// collected, the next blank line or heading ends the paragraph.
pub fn extract_overview(content: &str) -> String {
    let mut found_overview = false;
    let mut paragraph: Vec<&str> = Vec::new();

    for line in content.lines() {
        let trimmed = line.trim();

        if trimmed.starts_with(OVERVIEW_HEADING) {
            found_overview = true;
            continue;
        }
        if !found_overview {
            continue;
        }

        if trimmed.is_empty() {
            if paragraph.is_empty() {
                continue;
            }
            break;
        }
        if trimmed.starts_with('#') && !paragraph.is_empty() {
            break;
        }
        paragraph.push(trimmed);
    }

    paragraph.join(" ")
}
