//! Text helpers: URL slugs, tag slugs, plain-text excerpts and minimal HTML
//! escaping for stored content.

use std::sync::LazyLock;

use regex::Regex;

/// Maximum length (in characters) of a URL title slug.
pub const MAX_URL_TITLE_LEN: usize = 150;

/// Slug used when a title has no usable characters.
pub const FALLBACK_URL_TITLE: &str = "topic";

/// Default excerpt length for detail descriptions.
pub const DESCRIPTION_EXCERPT_LEN: usize = 240;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Generate a URL-safe slug from a title.
///
/// Lowercases, replaces every run of non-alphanumeric characters with a
/// single hyphen, trims hyphens and caps the length. Non-ASCII letters are
/// kept. Falls back to [`FALLBACK_URL_TITLE`] when nothing remains.
pub fn url_title(title: &str) -> String {
    let mut result = String::with_capacity(title.len());
    let mut prev_hyphen = false;
    for c in title.to_lowercase().chars() {
        if c.is_alphanumeric() {
            result.push(c);
            prev_hyphen = false;
        } else if !prev_hyphen {
            result.push('-');
            prev_hyphen = true;
        }
    }

    let trimmed: String = result
        .trim_matches('-')
        .chars()
        .take(MAX_URL_TITLE_LEN)
        .collect();
    let trimmed = trimmed.trim_end_matches('-');
    if trimmed.is_empty() {
        FALLBACK_URL_TITLE.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Normalise a tag name into its slug: trimmed, lowercased, inner spaces
/// replaced with hyphens.
pub fn tag_slug(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Plain-text excerpt of (possibly HTML) content, at most `limit` characters
/// followed by `...` when truncated.
pub fn excerpt(content: &str, limit: usize) -> String {
    let stripped = TAG_RE.replace_all(content, " ");
    let collapsed = WHITESPACE_RE.replace_all(stripped.trim(), " ");
    if collapsed.chars().count() <= limit {
        return collapsed.into_owned();
    }
    let mut out: String = collapsed.chars().take(limit).collect();
    out.push_str("...");
    out
}

/// Escape text for safe inclusion in HTML.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render raw content into the stored `parsed_text`: escaped paragraphs split
/// on blank lines. Markdown is not interpreted.
pub fn render_paragraphs(raw: &str) -> String {
    raw.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| format!("<p>{}</p>", escape_html(p).replace('\n', "<br>")))
        .collect::<Vec<_>>()
        .join("\n")
}
