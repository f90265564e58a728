//! Property tests for directory pruning and tree construction.

use dimandocs::core::patterns::{dir_name_pattern, MARKDOWN_FILE_PATTERN};
use dimandocs::core::{Content, Document, DocumentScanner, Indexer, PatternMatcher};
use proptest::prelude::*;
use regex::Regex;
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

const IGNORED: [&str; 2] = ["node_modules", "build"];

/// Relative file paths such as `docs/build/a.md`, built from a small
/// alphabet so that ignored names show up at every depth.
fn rel_paths() -> impl Strategy<Value = BTreeSet<String>> {
    let dir = prop::sample::select(vec!["docs", "guide", "node_modules", "build", "api"]);
    let file = prop::sample::select(vec!["a.md", "b.md", "README.md", "notes.txt"]);
    let path = (prop::collection::vec(dir, 0..4), file).prop_map(|(dirs, file)| {
        let mut segments: Vec<&str> = dirs;
        segments.push(file);
        segments.join("/")
    });
    prop::collection::btree_set(path, 1..12)
}

fn has_ignored_segment(rel: &str) -> bool {
    rel.split('/').any(|segment| IGNORED.contains(&segment))
}

fn doc_for(rel: &str, source: &str) -> Document {
    Document {
        title: rel.to_string(),
        path: PathBuf::from("/src").join(source).join(rel),
        content: Content::unloaded(),
        rel_path: rel.to_string(),
        dir_name: rel.rsplit('/').next().unwrap_or(rel).to_string(),
        source_dir: PathBuf::from("/src").join(source),
        source_name: source.to_string(),
        abs_path: String::new(),
        overview: String::new(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_scan_never_returns_ignored_paths(paths in rel_paths()) {
        let dir = tempfile::tempdir().unwrap();
        for rel in &paths {
            let path = dir.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, "# Title\nBody").unwrap();
        }

        let patterns: Vec<String> = IGNORED.iter().map(|name| dir_name_pattern(name)).collect();
        let ignore = PatternMatcher::new(&patterns).unwrap();
        let file_pattern = Regex::new(MARKDOWN_FILE_PATTERN).unwrap();

        let docs = DocumentScanner::new(dir.path())
            .scan(dir.path(), "Docs", &file_pattern, &ignore)
            .unwrap();

        let found: Vec<String> = docs.iter().map(|d| d.rel_path.clone()).collect();
        let expected: BTreeSet<String> = paths
            .iter()
            .filter(|rel| rel.ends_with(".md") && !has_ignored_segment(rel))
            .cloned()
            .collect();

        for rel in &found {
            prop_assert!(!has_ignored_segment(rel), "ignored path {} was returned", rel);
        }
        // Exactly one document per eligible file.
        prop_assert_eq!(found.len(), expected.len());
        prop_assert_eq!(found.into_iter().collect::<BTreeSet<_>>(), expected);
    }

    #[test]
    fn test_tree_has_one_file_node_per_document(
        first in rel_paths(),
        second in rel_paths(),
    ) {
        let mut docs: Vec<Document> = first.iter().map(|rel| doc_for(rel, "One")).collect();
        docs.extend(second.iter().map(|rel| doc_for(rel, "Two")));

        let trees = Indexer::build_trees(&docs);

        prop_assert_eq!(trees.len(), 2);
        prop_assert_eq!(trees[0].root.file_count(), first.len());
        prop_assert_eq!(trees[1].root.file_count(), second.len());

        let again = Indexer::build_trees(&docs);
        prop_assert_eq!(
            serde_json::to_value(&trees).unwrap(),
            serde_json::to_value(&again).unwrap()
        );
    }
}
