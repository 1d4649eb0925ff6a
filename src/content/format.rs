//! Format parsing - metadata and body extraction per file type
//!
//! Every branch is total: malformed input degrades to empty metadata
//! with a best-effort body, logged but never propagated.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use super::{FileType, MarkdownRenderer, Metadata};

lazy_static! {
    static ref HTML_METADATA: Regex = Regex::new(r"(?s)<!--\s*METADATA\s*(.*?)\s*-->").unwrap();
}

/// Parsed pieces of one content file
#[derive(Debug, Clone)]
pub struct Parsed {
    pub metadata: Metadata,
    pub content: String,
    pub raw: String,
}

impl Parsed {
    fn degraded(raw: &str) -> Self {
        Self {
            metadata: Metadata::default(),
            content: raw.to_string(),
            raw: raw.to_string(),
        }
    }
}

/// Envelope shape of json/yaml content files: both fields optional
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Envelope {
    metadata: Metadata,
    content: String,
}

/// Turns raw file text into metadata plus body content
pub struct FormatParser {
    renderer: MarkdownRenderer,
}

impl FormatParser {
    pub fn new() -> Self {
        Self {
            renderer: MarkdownRenderer::new(),
        }
    }

    pub fn with_renderer(renderer: MarkdownRenderer) -> Self {
        Self { renderer }
    }

    /// Parse raw content according to its declared file type
    pub fn parse(&self, raw: &str, file_type: FileType) -> Parsed {
        match file_type {
            FileType::Json => match serde_json::from_str::<Envelope>(raw) {
                Ok(envelope) => Parsed {
                    metadata: envelope.metadata,
                    content: envelope.content,
                    raw: raw.to_string(),
                },
                Err(e) => {
                    tracing::warn!("Failed to parse JSON content: {}", e);
                    Parsed::degraded(raw)
                }
            },
            FileType::Yaml => match serde_yaml::from_str::<Envelope>(raw) {
                Ok(envelope) => Parsed {
                    metadata: envelope.metadata,
                    content: envelope.content,
                    raw: raw.to_string(),
                },
                Err(e) => {
                    tracing::warn!("Failed to parse YAML content: {}", e);
                    Parsed::degraded(raw)
                }
            },
            FileType::Markdown => {
                let (metadata, body) = split_front_matter(raw);
                Parsed {
                    metadata,
                    content: self.renderer.render(body),
                    raw: raw.to_string(),
                }
            }
            FileType::Html => parse_html(raw),
            FileType::Text => Parsed {
                metadata: Metadata::default(),
                content: raw.trim().to_string(),
                raw: raw.to_string(),
            },
        }
    }
}

impl Default for FormatParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Split leading YAML front matter from a markdown document.
///
/// Returns (metadata, body). Documents whose leading `---` block is not
/// actually a key/value header (markdown uses `---` as a rule too) come
/// back untouched with default metadata.
pub fn split_front_matter(input: &str) -> (Metadata, &str) {
    let content = input.trim_start();

    if !content.starts_with("---") {
        return (Metadata::default(), content);
    }

    let rest = content[3..].trim_start_matches(['\n', '\r']);
    let Some(end_pos) = rest.find("\n---") else {
        // No closing fence
        return (Metadata::default(), content);
    };

    let header = &rest[..end_pos];
    let body = rest[end_pos + 4..].trim_start_matches(['\n', '\r']);

    if header.trim().is_empty() {
        return (Metadata::default(), body);
    }

    if !looks_like_yaml(header) {
        return (Metadata::default(), content);
    }

    match serde_yaml::from_str::<Metadata>(header) {
        Ok(metadata) => (metadata, body),
        Err(e) => {
            tracing::warn!("Failed to parse front matter, treating as content: {}", e);
            (Metadata::default(), content)
        }
    }
}

/// A header qualifies as YAML when at least one line carries a plain
/// `key: value` pair whose key is a simple identifier and whose colon is
/// not part of a URL scheme.
fn looks_like_yaml(header: &str) -> bool {
    header.lines().any(|line| {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return false;
        }
        let Some(colon_pos) = trimmed.find(':') else {
            return false;
        };
        let key = &trimmed[..colon_pos];
        let is_valid_key = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
            && key != "http"
            && key != "https"
            && key != "ftp";
        if !is_valid_key {
            return false;
        }
        let after = &trimmed[colon_pos + 1..];
        after.is_empty() || after.starts_with(' ')
    })
}

/// Extract the `<!-- METADATA ... -->` comment from an HTML document
fn parse_html(raw: &str) -> Parsed {
    if let Some(caps) = HTML_METADATA.captures(raw) {
        match serde_yaml::from_str::<Metadata>(&caps[1]) {
            Ok(metadata) => {
                let content = HTML_METADATA.replace(raw, "").trim().to_string();
                return Parsed {
                    metadata,
                    content,
                    raw: raw.to_string(),
                };
            }
            Err(e) => {
                tracing::warn!("Failed to parse HTML metadata comment: {}", e);
            }
        }
    }
    Parsed {
        metadata: Metadata::default(),
        content: raw.trim().to_string(),
        raw: raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_envelope() {
        let parser = FormatParser::new();
        let raw = r#"{"metadata": {"title": "Links", "tags": ["social"]}, "content": "hello"}"#;
        let parsed = parser.parse(raw, FileType::Json);
        assert_eq!(parsed.metadata.title, Some("Links".to_string()));
        assert_eq!(parsed.metadata.tags, vec!["social"]);
        assert_eq!(parsed.content, "hello");
    }

    #[test]
    fn test_json_invalid_degrades_to_raw() {
        let parser = FormatParser::new();
        let raw = r#"{"metadata": {"#;
        let parsed = parser.parse(raw, FileType::Json);
        assert!(parsed.metadata.title.is_none());
        assert!(parsed.metadata.tags.is_empty());
        assert_eq!(parsed.content, raw);
    }

    #[test]
    fn test_yaml_envelope() {
        let parser = FormatParser::new();
        let raw = "metadata:\n  title: Resources\ncontent: some text\n";
        let parsed = parser.parse(raw, FileType::Yaml);
        assert_eq!(parsed.metadata.title, Some("Resources".to_string()));
        assert_eq!(parsed.content, "some text");
    }

    #[test]
    fn test_yaml_invalid_degrades_to_raw() {
        let parser = FormatParser::new();
        let raw = "just a scalar, not an envelope";
        let parsed = parser.parse(raw, FileType::Yaml);
        assert!(parsed.metadata.title.is_none());
        assert_eq!(parsed.content, raw);
    }

    #[test]
    fn test_markdown_front_matter() {
        let parser = FormatParser::new();
        let raw = "---\ntitle: Hello World\ndate: 2024-01-15\ntags:\n  - rust\n---\n\nBody text.\n";
        let parsed = parser.parse(raw, FileType::Markdown);
        assert_eq!(parsed.metadata.title, Some("Hello World".to_string()));
        assert_eq!(parsed.metadata.tags, vec!["rust"]);
        assert!(parsed.content.contains("<p>Body text.</p>"));
    }

    #[test]
    fn test_markdown_without_front_matter() {
        let parser = FormatParser::new();
        let parsed = parser.parse("Just a paragraph.", FileType::Markdown);
        assert!(parsed.metadata.title.is_none());
        assert!(parsed.content.contains("<p>Just a paragraph.</p>"));
    }

    #[test]
    fn test_markdown_separator_not_front_matter() {
        // --- used as a thematic break, not a header fence
        let raw = "\n---\n\nSome notes:\n- Item 1\n- Item 2\n\n---\nMore content.\n";
        let (metadata, body) = split_front_matter(raw);
        assert!(metadata.title.is_none());
        assert!(body.contains("Some notes"));
    }

    #[test]
    fn test_front_matter_url_colon_is_not_yaml() {
        let raw = "\n---\n\nSee https://example.com/path for details\n\n---\nMore.\n";
        let (metadata, body) = split_front_matter(raw);
        assert!(metadata.title.is_none());
        assert!(body.contains("https://example.com"));
    }

    #[test]
    fn test_html_metadata_comment() {
        let parser = FormatParser::new();
        let raw = "<!-- METADATA\ntitle: About\npublished: false\n-->\n<main>hi</main>\n";
        let parsed = parser.parse(raw, FileType::Html);
        assert_eq!(parsed.metadata.title, Some("About".to_string()));
        assert!(!parsed.metadata.published);
        assert_eq!(parsed.content, "<main>hi</main>");
    }

    #[test]
    fn test_html_without_metadata_comment() {
        let parser = FormatParser::new();
        let parsed = parser.parse("  <main>hi</main>  ", FileType::Html);
        assert!(parsed.metadata.title.is_none());
        assert_eq!(parsed.content, "<main>hi</main>");
    }

    #[test]
    fn test_text_is_trimmed() {
        let parser = FormatParser::new();
        let parsed = parser.parse("  plain notes\n", FileType::Text);
        assert!(parsed.metadata.title.is_none());
        assert_eq!(parsed.content, "plain notes");
    }

    #[test]
    fn test_every_type_is_total_on_garbage() {
        let parser = FormatParser::new();
        let garbage = "}{: ---\u{0000}%%%";
        for file_type in [
            FileType::Json,
            FileType::Yaml,
            FileType::Markdown,
            FileType::Html,
            FileType::Text,
        ] {
            let parsed = parser.parse(garbage, file_type);
            assert!(parsed.metadata.tags.is_empty());
        }
    }
}
