//! Content item and metadata models

use chrono::{DateTime, Local};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

use crate::helpers::date::parse_date_string;

/// Custom deserializer that handles both a single string and a list of strings
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value])
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                vec.push(item);
            }
            Ok(vec)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Metadata parsed from a content file's header.
///
/// Known fields are typed; anything else lands in `extra` in source order.
/// Callers read every field defensively - none of them is required.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    pub title: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
    #[serde(deserialize_with = "string_or_vec", default)]
    pub tags: Vec<String>,
    /// Items are published unless the header says otherwise
    #[serde(default = "default_published")]
    pub published: bool,

    /// Additional custom fields
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

fn default_published() -> bool {
    true
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            title: None,
            date: None,
            description: None,
            tags: Vec::new(),
            published: true,
            extra: IndexMap::new(),
        }
    }
}

impl Metadata {
    /// Parse the date field into a local DateTime
    pub fn parse_date(&self) -> Option<DateTime<Local>> {
        self.date.as_ref().and_then(|s| parse_date_string(s))
    }
}

/// One discovered content file, immutable after construction.
///
/// `slug` is the file stem and addresses the item within its category.
/// `content` holds rendered HTML for markdown sources and raw text for
/// everything else. `path` is kept for diagnostics only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    pub metadata: Metadata,
    pub slug: String,
    pub content: String,
    pub path: PathBuf,
}

/// Content file formats understood by the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Json,
    Yaml,
    Markdown,
    Html,
    Text,
}

impl FileType {
    /// Map a file extension to its format, `None` for unsupported ones
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(FileType::Json),
            "yaml" | "yml" => Some(FileType::Yaml),
            "md" | "mdx" => Some(FileType::Markdown),
            "html" => Some(FileType::Html),
            "txt" => Some(FileType::Text),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_accept_single_string() {
        let meta: Metadata = serde_yaml::from_str("title: Post\ntags: notes\n").unwrap();
        assert_eq!(meta.tags, vec!["notes"]);
    }

    #[test]
    fn test_tags_accept_list() {
        let meta: Metadata = serde_yaml::from_str("tags:\n  - go\n  - rust\n").unwrap();
        assert_eq!(meta.tags, vec!["go", "rust"]);
    }

    #[test]
    fn test_published_defaults_to_true() {
        let meta: Metadata = serde_yaml::from_str("title: Draftless\n").unwrap();
        assert!(meta.published);

        let meta: Metadata = serde_yaml::from_str("published: false\n").unwrap();
        assert!(!meta.published);
    }

    #[test]
    fn test_extra_fields_preserved() {
        let meta: Metadata =
            serde_yaml::from_str("title: T\nbanner: /img/banner.png\nweight: 3\n").unwrap();
        assert_eq!(
            meta.extra.get("banner"),
            Some(&serde_yaml::Value::String("/img/banner.png".into()))
        );
        assert!(meta.extra.contains_key("weight"));
    }

    #[test]
    fn test_file_type_from_extension() {
        assert_eq!(FileType::from_extension("md"), Some(FileType::Markdown));
        assert_eq!(FileType::from_extension("MDX"), Some(FileType::Markdown));
        assert_eq!(FileType::from_extension("yml"), Some(FileType::Yaml));
        assert_eq!(FileType::from_extension("rs"), None);
    }
}
