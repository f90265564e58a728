//! Provides case-insensitive substring search over indexed documents.

use rayon::prelude::*;

use super::Document;

/// A utility struct for searching document lists.
///
/// This struct is stateless and provides methods as associated functions.
pub struct SearchEngine;

impl SearchEngine {
    /// Returns every document whose title, content or overview contains the
    /// query, ignoring case. A blank query matches nothing.
    ///
    /// Unloaded content is treated as empty; callers that want content hits
    /// for cache-restored documents load them first.
    pub fn search<'a>(docs: &'a [Document], query: &str) -> Vec<&'a Document> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        docs.par_iter()
            .filter(|doc| Self::matches(doc, &needle))
            .collect()
    }

    /// `needle` must already be lowercase.
    fn matches(doc: &Document, needle: &str) -> bool {
        [doc.title.as_str(), doc.content.text(), doc.overview.as_str()]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}
