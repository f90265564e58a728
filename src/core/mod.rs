pub mod cache;
pub mod content_loader;
pub mod error;
pub mod indexer;
pub mod patterns;
pub mod scanner;
pub mod search;

use serde::{Serialize, Serializer};
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

/// The full text of a document, filled at most once.
///
/// Documents restored from the cache start unloaded. The first reader to
/// read the file wins; a racing second value is dropped, and readers never
/// see a half-written string.
#[derive(Debug, Default, Clone)]
pub struct Content(OnceLock<String>);

impl Content {
    pub fn unloaded() -> Self {
        Self(OnceLock::new())
    }

    pub fn loaded(text: String) -> Self {
        Self(OnceLock::from(text))
    }

    pub fn is_loaded(&self) -> bool {
        self.0.get().is_some()
    }

    pub fn get(&self) -> Option<&str> {
        self.0.get().map(String::as_str)
    }

    /// The loaded text, or `""` while unloaded.
    pub fn text(&self) -> &str {
        self.get().unwrap_or("")
    }

    /// Stores the text if nothing was stored yet and returns the winning value.
    pub fn fill(&self, text: String) -> &str {
        // Losing the race is fine: both sides read the same file.
        let _ = self.0.set(text);
        self.text()
    }
}

impl PartialEq for Content {
    fn eq(&self, other: &Self) -> bool {
        self.get() == other.get()
    }
}

impl Serialize for Content {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.text())
    }
}

/// A markdown file found under one of the configured source directories.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Document {
    pub title: String,
    pub path: PathBuf,
    pub content: Content,
    /// Path relative to `source_dir` with `/` separators; the lookup key.
    pub rel_path: String,
    pub dir_name: String,
    pub source_dir: PathBuf,
    pub source_name: String,
    /// Containing directory relative to the working directory, rooted at `/`
    /// when it lies outside of it.
    pub abs_path: String,
    pub overview: String,
}

impl Document {
    /// Looks up the document by its path relative to the source root.
    pub fn matches_rel_path(&self, rel_path: &str) -> bool {
        self.rel_path == rel_path
    }
}

/// The shared, read-mostly list of every indexed document.
///
/// The list is fixed after startup; only each document's [`Content`]
/// changes, and that at most once. Cloning is cheap.
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    documents: Arc<[Document]>,
}

impl DocumentStore {
    pub fn new(documents: Vec<Document>) -> Self {
        Self {
            documents: documents.into(),
        }
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Position of the first document with this relative path. Paths can
    /// repeat across sources; the earlier source wins.
    pub fn index_of(&self, rel_path: &str) -> Option<usize> {
        self.documents.iter().position(|d| d.matches_rel_path(rel_path))
    }

    pub fn find_by_rel_path(&self, rel_path: &str) -> Option<&Document> {
        self.index_of(rel_path).map(|idx| &self.documents[idx])
    }

    /// True while at least one document still has unloaded content.
    pub fn needs_content_loading(&self) -> bool {
        self.documents.iter().any(|d| !d.content.is_loaded())
    }
}

pub use cache::{
    Cache, CacheData, CachedDocument, IndexFingerprint, SourceFingerprint, CACHE_FILE_NAME,
};
pub use content_loader::{ContentLoader, LoadReport};
pub use error::{CoreError, PatternScope};
pub use indexer::{DirectoryGroup, DirectoryTree, Indexer, TreeNode};
pub use patterns::PatternMatcher;
pub use scanner::DocumentScanner;
pub use search::SearchEngine;
