//! Markdown to HTML conversion.

use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag};
use std::collections::HashMap;

/// Converts markdown text into an HTML fragment.
pub trait MarkdownRenderer: Send + Sync + 'static {
    fn render(&self, markdown: &str) -> String;
}

/// GitHub-flavored CommonMark with raw HTML passed through and an `id`
/// generated for every heading.
#[derive(Debug, Clone)]
pub struct CommonMarkRenderer {
    options: Options,
}

impl Default for CommonMarkRenderer {
    fn default() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_HEADING_ATTRIBUTES);
        Self { options }
    }
}

impl MarkdownRenderer for CommonMarkRenderer {
    fn render(&self, markdown: &str) -> String {
        let events: Vec<Event<'_>> = Parser::new_ext(markdown, self.options).collect();
        let events = with_heading_ids(events);

        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, events.into_iter());
        out
    }
}

/// Rewrites headings without an explicit `{#id}` into raw HTML carrying a
/// slug of their text. Repeated slugs get `-1`, `-2`, ... appended.
fn with_heading_ids(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::with_capacity(events.len());
    let mut iter = events.into_iter();

    while let Some(event) = iter.next() {
        let level = match &event {
            Event::Start(Tag::Heading(level, None, classes)) if classes.is_empty() => *level,
            _ => {
                out.push(event);
                continue;
            }
        };

        let mut inner = Vec::new();
        let mut text = String::new();
        for next in iter.by_ref() {
            match &next {
                Event::End(Tag::Heading(..)) => break,
                Event::Text(t) | Event::Code(t) => text.push_str(t),
                _ => {}
            }
            inner.push(next);
        }

        let slug = unique_slug(&text, &mut seen);
        out.push(Event::Html(CowStr::from(format!("<{level} id=\"{slug}\">"))));
        out.extend(inner);
        out.push(Event::Html(CowStr::from(format!("</{level}>\n"))));
    }

    out
}

fn unique_slug(text: &str, seen: &mut HashMap<String, usize>) -> String {
    let base = slugify(text);
    let count = seen.entry(base.clone()).or_insert(0);
    let slug = if *count == 0 {
        base
    } else {
        format!("{base}-{count}")
    };
    *count += 1;
    slug
}

fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for ch in text.trim().chars() {
        if ch.is_alphanumeric() {
            slug.extend(ch.to_lowercase());
        } else if (ch == ' ' || ch == '-' || ch == '_') && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "heading".to_string()
    } else {
        slug.to_string()
    }
}

/// Drops a leading YAML frontmatter block delimited by `---` lines.
///
/// Content without a closing delimiter is returned unchanged.
pub fn strip_frontmatter(content: &str) -> &str {
    let body = match content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))
    {
        Some(body) => body,
        None => return content,
    };

    let mut offset = 0;
    for line in body.split_inclusive('\n') {
        offset += line.len();
        if line.trim() == "---" {
            return &body[offset..];
        }
    }
    content
}
