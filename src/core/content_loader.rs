//! Fills in document content that was not read at startup.
//!
//! Documents restored from the cache carry metadata only. Their text is read
//! either on demand, when a single document is viewed or searched, or in
//! bulk by a background task started once the server is up.

use rayon::prelude::*;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::task::JoinHandle;

use super::{CoreError, Document, DocumentStore};

/// Outcome of a bulk load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Documents whose content was read by this call.
    pub loaded: usize,
    /// Documents whose file could not be read; they stay unloaded.
    pub failed: usize,
}

/// Reads a file as text. Invalid UTF-8 is replaced rather than rejected.
pub fn read_text(path: &Path) -> Result<String, CoreError> {
    let bytes = fs::read(path).map_err(|e| CoreError::Io(e, path.to_path_buf()))?;
    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(e) => Ok(String::from_utf8_lossy(e.as_bytes()).into_owned()),
    }
}

/// A utility struct for loading document content.
///
/// This struct is stateless and provides methods as associated functions.
pub struct ContentLoader;

impl ContentLoader {
    /// Returns the document's content, reading it from disk first if needed.
    pub fn load_one(doc: &Document) -> Result<&str, CoreError> {
        if let Some(text) = doc.content.get() {
            return Ok(text);
        }
        let text = read_text(&doc.path)?;
        tracing::debug!("Loaded content for {}", doc.path.display());
        Ok(doc.content.fill(text))
    }

    /// Loads every unloaded document. Failures are logged and skipped.
    pub fn load_all(docs: &[Document]) -> LoadReport {
        let loaded = AtomicUsize::new(0);
        let failed = AtomicUsize::new(0);

        docs.par_iter()
            .filter(|doc| !doc.content.is_loaded())
            .for_each(|doc| match read_text(&doc.path) {
                Ok(text) => {
                    doc.content.fill(text);
                    loaded.fetch_add(1, Ordering::Relaxed);
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to read content for {}: {}",
                        doc.path.display(),
                        e
                    );
                    failed.fetch_add(1, Ordering::Relaxed);
                }
            });

        LoadReport {
            loaded: loaded.into_inner(),
            failed: failed.into_inner(),
        }
    }

    /// Starts a bulk load of the whole store on the blocking pool.
    ///
    /// The returned handle resolves to the load report. Callers that do not
    /// care about the outcome may drop it; the task still runs to completion.
    pub fn spawn_background(store: DocumentStore) -> JoinHandle<LoadReport> {
        tokio::task::spawn_blocking(move || {
            tracing::info!("Loading document contents in background...");
            let report = Self::load_all(store.documents());
            if report.failed > 0 {
                tracing::warn!(
                    "Background load finished with {} unreadable documents",
                    report.failed
                );
            }
            tracing::info!(
                "Finished loading contents for {} of {} documents",
                report.loaded,
                store.len()
            );
            report
        })
    }
}
