//! Builds the display structures for the index page.
//!
//! Both views borrow from the document list and are rebuilt on every
//! request, so they never go stale with respect to loaded content.

use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

use super::Document;

/// Documents that share a source name.
#[derive(Debug, Clone, Serialize)]
pub struct DirectoryGroup<'a> {
    pub name: String,
    pub documents: Vec<&'a Document>,
}

/// A node in a source's directory tree.
#[derive(Debug, Clone, Serialize)]
pub struct TreeNode<'a> {
    pub name: String,
    /// Cumulative path from the source root, `/`-separated.
    pub path: String,
    pub is_file: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<&'a Document>,
    pub children: Vec<TreeNode<'a>>,
    pub is_open: bool,
}

impl<'a> TreeNode<'a> {
    fn root(name: &str) -> Self {
        Self {
            name: name.to_string(),
            path: String::new(),
            is_file: false,
            document: None,
            children: Vec::new(),
            is_open: true,
        }
    }

    /// Number of file nodes in this subtree.
    pub fn file_count(&self) -> usize {
        usize::from(self.is_file)
            + self.children.iter().map(TreeNode::file_count).sum::<usize>()
    }
}

/// One tree per source name.
#[derive(Debug, Clone, Serialize)]
pub struct DirectoryTree<'a> {
    pub name: String,
    pub root: TreeNode<'a>,
}

/// A utility struct for grouping documents and generating their trees.
///
/// This struct is stateless and provides methods as associated functions.
pub struct Indexer;

impl Indexer {
    /// Partitions documents by source name.
    ///
    /// Groups come out in first-seen order, but callers must not rely on it.
    pub fn group_by_directory(docs: &[Document]) -> Vec<DirectoryGroup<'_>> {
        let mut groups: Vec<DirectoryGroup<'_>> = Vec::new();
        let mut positions: HashMap<&str, usize> = HashMap::new();

        for doc in docs {
            let idx = *positions.entry(doc.source_name.as_str()).or_insert_with(|| {
                groups.push(DirectoryGroup {
                    name: doc.source_name.clone(),
                    documents: Vec::new(),
                });
                groups.len() - 1
            });
            groups[idx].documents.push(doc);
        }

        groups
    }

    /// Builds one tree per source name.
    ///
    /// Siblings keep the order in which documents first introduced them;
    /// nothing is sorted.
    pub fn build_trees(docs: &[Document]) -> Vec<DirectoryTree<'_>> {
        Self::group_by_directory(docs)
            .into_iter()
            .map(|group| {
                let mut root = TreeNode::root(&group.name);
                for doc in group.documents {
                    Self::insert_document(&mut root, doc);
                }
                DirectoryTree {
                    name: group.name,
                    root,
                }
            })
            .collect()
    }

    /// Inserts a document below `root`, reusing existing sibling nodes.
    fn insert_document<'a>(root: &mut TreeNode<'a>, doc: &'a Document) {
        let segments = Self::segments(doc);
        let Some(last) = segments.len().checked_sub(1) else {
            return;
        };

        let mut current = root;
        let mut current_path = String::new();

        for (i, segment) in segments.iter().enumerate() {
            if !current_path.is_empty() {
                current_path.push('/');
            }
            current_path.push_str(segment);

            let idx = match current.children.iter().position(|c| c.name == *segment) {
                Some(idx) => idx,
                None => {
                    let is_file = i == last;
                    current.children.push(TreeNode {
                        name: segment.clone(),
                        path: current_path.clone(),
                        is_file,
                        document: is_file.then_some(doc),
                        children: Vec::new(),
                        is_open: false,
                    });
                    current.children.len() - 1
                }
            };
            current = &mut current.children[idx];
        }
    }

    /// The document's path below its source directory, split into segments.
    fn segments(doc: &Document) -> Vec<String> {
        match doc.path.strip_prefix(&doc.source_dir) {
            Ok(rel) if rel != Path::new("") => rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect(),
            _ => doc
                .rel_path
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}
