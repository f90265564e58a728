//! Persists a metadata-only snapshot of the document index.
//!
//! The snapshot lets a later run skip the directory walk and metadata
//! extraction. File content is never written; documents restored from the
//! cache start unloaded and are filled by the content loader.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::{Content, CoreError, Document};

pub const CACHE_FILE_NAME: &str = ".dimandocs-cache.json";

/// A [`Document`] without its content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedDocument {
    pub title: String,
    pub path: PathBuf,
    pub rel_path: String,
    pub dir_name: String,
    pub source_dir: PathBuf,
    pub source_name: String,
    pub abs_path: String,
    #[serde(default)]
    pub overview: String,
}

impl From<&Document> for CachedDocument {
    fn from(doc: &Document) -> Self {
        Self {
            title: doc.title.clone(),
            path: doc.path.clone(),
            rel_path: doc.rel_path.clone(),
            dir_name: doc.dir_name.clone(),
            source_dir: doc.source_dir.clone(),
            source_name: doc.source_name.clone(),
            abs_path: doc.abs_path.clone(),
            overview: doc.overview.clone(),
        }
    }
}

impl From<CachedDocument> for Document {
    fn from(cached: CachedDocument) -> Self {
        Self {
            title: cached.title,
            path: cached.path,
            content: Content::unloaded(),
            rel_path: cached.rel_path,
            dir_name: cached.dir_name,
            source_dir: cached.source_dir,
            source_name: cached.source_name,
            abs_path: cached.abs_path,
            overview: cached.overview,
        }
    }
}

/// One scanned directory as it was configured when the index was built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFingerprint {
    /// The root resolved against the working directory.
    pub path: PathBuf,
    pub name: String,
    pub file_pattern: String,
}

/// Everything in the configuration that decides which documents a scan
/// finds and how they are labelled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexFingerprint {
    pub sources: Vec<SourceFingerprint>,
    pub ignore_patterns: Vec<String>,
}

/// The on-disk cache format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheData {
    pub documents: Vec<CachedDocument>,
    pub version: String,
    /// Caches written before fingerprints existed read as empty and never
    /// match a configuration with directories.
    #[serde(default)]
    pub fingerprint: IndexFingerprint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
}

impl CacheData {
    pub fn into_documents(self) -> Vec<Document> {
        self.documents.into_iter().map(Document::from).collect()
    }
}

/// Reads and writes the cache file at a fixed location.
#[derive(Debug, Clone)]
pub struct Cache {
    path: PathBuf,
}

impl Cache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The cache under its well-known name inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(CACHE_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes every document except its content, tagged with `version` and
    /// the configuration the documents were scanned with.
    pub fn save(
        &self,
        docs: &[Document],
        version: &str,
        fingerprint: &IndexFingerprint,
    ) -> Result<(), CoreError> {
        let data = CacheData {
            documents: docs.iter().map(CachedDocument::from).collect(),
            version: version.to_string(),
            fingerprint: fingerprint.clone(),
            generated_at: Some(Utc::now()),
        };
        let json = serde_json::to_string_pretty(&data)?;
        fs::write(&self.path, json).map_err(|e| CoreError::Io(e, self.path.clone()))?;
        tracing::debug!("Wrote {} documents to {:?}", docs.len(), self.path);
        Ok(())
    }

    /// Reads and parses the raw snapshot.
    pub fn read(&self) -> Result<CacheData, CoreError> {
        let raw = fs::read_to_string(&self.path).map_err(|e| CoreError::Io(e, self.path.clone()))?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Restores the cached documents, all with unloaded content.
    pub fn load(&self) -> Result<Vec<Document>, CoreError> {
        self.read().map(CacheData::into_documents)
    }
}
