//! HTML page assembly for the index and document views.

use std::fmt::Write as _;

use crate::core::{DirectoryGroup, DirectoryTree, Document, TreeNode};

const INDEX_TEMPLATE: &str = include_str!("../../assets/templates/index.html");
const DOCUMENT_TEMPLATE: &str = include_str!("../../assets/templates/document.html");

/// Escapes text for use in HTML element content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Builds the `/doc/...` URL for a relative path, percent-encoding each
/// segment.
pub fn doc_url(rel_path: &str) -> String {
    let mut url = String::from("/doc");
    for segment in rel_path.split('/') {
        url.push('/');
        for byte in segment.bytes() {
            match byte {
                b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                    url.push(byte as char)
                }
                _ => {
                    let _ = write!(url, "%{byte:02X}");
                }
            }
        }
    }
    url
}

/// Substitutes `{{key}}` placeholders in a single pass, so inserted values
/// are never scanned again. Values are inserted verbatim; unknown keys stay.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len() * 2);
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            rest = &rest[start..];
            break;
        };
        let key = &after[..end];
        match values.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + end + 4]),
        }
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    out
}

pub fn render_index(
    title: &str,
    trees: &[DirectoryTree<'_>],
    groups: &[DirectoryGroup<'_>],
    total: usize,
) -> String {
    let mut tree_html = String::new();
    for tree in trees {
        write_tree(&mut tree_html, tree);
    }

    let mut group_html = String::new();
    for group in groups {
        write_group(&mut group_html, group);
    }
    if groups.is_empty() {
        group_html.push_str("<p class=\"empty\">No documents found.</p>\n");
    }

    fill(
        INDEX_TEMPLATE,
        &[
            ("title", &escape_html(title)),
            ("total", &total.to_string()),
            ("trees", &tree_html),
            ("groups", &group_html),
        ],
    )
}

/// `body` is trusted HTML produced by the markdown renderer.
pub fn render_document(title: &str, doc: &Document, body: &str) -> String {
    fill(
        DOCUMENT_TEMPLATE,
        &[
            ("title", &escape_html(title)),
            ("doc_title", &escape_html(&doc.title)),
            ("source_name", &escape_html(&doc.source_name)),
            ("abs_path", &escape_html(&doc.abs_path)),
            ("dir_name", &escape_html(&doc.dir_name)),
            ("body", body),
        ],
    )
}

fn write_tree(out: &mut String, tree: &DirectoryTree<'_>) {
    let _ = writeln!(out, "<ul class=\"tree\">");
    write_node(out, &tree.root);
    let _ = writeln!(out, "</ul>");
}

fn write_node(out: &mut String, node: &TreeNode<'_>) {
    if node.is_file {
        match node.document {
            Some(doc) => {
                let _ = writeln!(
                    out,
                    "<li class=\"file\"><a href=\"{}\" title=\"{}\">{}</a></li>",
                    escape_html(&doc_url(&doc.rel_path)),
                    escape_html(&doc.title),
                    escape_html(&node.name),
                );
            }
            None => {
                let _ = writeln!(out, "<li class=\"file\">{}</li>", escape_html(&node.name));
            }
        }
        return;
    }

    let _ = writeln!(
        out,
        "<li class=\"dir\"><details{}><summary>{} <span class=\"file-count\">({})</span></summary>",
        if node.is_open { " open" } else { "" },
        escape_html(&node.name),
        node.file_count(),
    );
    let _ = writeln!(out, "<ul>");
    for child in &node.children {
        write_node(out, child);
    }
    let _ = writeln!(out, "</ul></details></li>");
}

fn write_group(out: &mut String, group: &DirectoryGroup<'_>) {
    let _ = writeln!(
        out,
        "<div class=\"group\"><h2>{} <span class=\"file-count\">({})</span></h2><ul>",
        escape_html(&group.name),
        group.documents.len(),
    );
    for doc in &group.documents {
        let _ = write!(
            out,
            "<li><a href=\"{}\">{}</a><span class=\"doc-location\">{}</span>",
            escape_html(&doc_url(&doc.rel_path)),
            escape_html(&doc.title),
            escape_html(&doc.abs_path),
        );
        if !doc.overview.is_empty() {
            let _ = write!(
                out,
                "<p class=\"doc-overview\">{}</p>",
                escape_html(&doc.overview)
            );
        }
        let _ = writeln!(out, "</li>");
    }
    let _ = writeln!(out, "</ul></div>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Content, Indexer};
    use std::path::PathBuf;

    fn doc(rel: &str, title: &str, overview: &str) -> Document {
        Document {
            title: title.to_string(),
            path: PathBuf::from("/docs").join(rel),
            content: Content::loaded(String::new()),
            rel_path: rel.to_string(),
            dir_name: rel.rsplit('/').next().unwrap_or(rel).to_string(),
            source_dir: PathBuf::from("/docs"),
            source_name: "Docs".to_string(),
            abs_path: "docs".to_string(),
            overview: overview.to_string(),
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_doc_url_encodes_segments() {
        assert_eq!(doc_url("guide/setup.md"), "/doc/guide/setup.md");
        assert_eq!(doc_url("my notes/ü.md"), "/doc/my%20notes/%C3%BC.md");
        assert_eq!(doc_url("a#b?.md"), "/doc/a%23b%3F.md");
    }

    #[test]
    fn test_index_lists_trees_and_groups() {
        let docs = vec![
            doc("README.md", "Readme", "Project intro."),
            doc("guide/setup.md", "Setup <Guide>", ""),
        ];
        let trees = Indexer::build_trees(&docs);
        let groups = Indexer::group_by_directory(&docs);

        let page = render_index("My Docs", &trees, &groups, docs.len());

        assert!(page.contains("<title>My Docs</title>"));
        assert!(page.contains("2 documents"));
        assert!(page.contains("<details open><summary>Docs"));
        assert!(page.contains(r#"<a href="/doc/guide/setup.md">Setup &lt;Guide&gt;</a>"#));
        assert!(page.contains("Project intro."));
        assert!(!page.contains("{{"));
    }

    #[test]
    fn test_fill_does_not_expand_inserted_values() {
        let page = fill(
            "<h1>{{title}}</h1>{{body}}{{other}} {{",
            &[("title", "{{body}}"), ("body", "B")],
        );
        assert_eq!(page, "<h1>{{body}}</h1>B{{other}} {{");
    }

    #[test]
    fn test_index_without_documents() {
        let page = render_index("Empty", &[], &[], 0);
        assert!(page.contains("No documents found."));
    }

    #[test]
    fn test_document_page_escapes_metadata_but_not_body() {
        let d = doc("a.md", "A & B", "");
        let page = render_document("<Site>", &d, "<h1 id=\"a\">A</h1>");
        assert!(page.contains("<title>A &amp; B - &lt;Site&gt;</title>"));
        assert!(page.contains("<h1 id=\"a\">A</h1>"));
        assert!(page.contains("a.md"));
        assert!(!page.contains("{{"));
    }
}
