//! Pure query functions over a directory snapshot
//!
//! No I/O here: every function takes a snapshot slice and leaves it
//! untouched.

use chrono::Datelike;

use super::ContentItem;

/// Sort newest first by metadata date.
///
/// Items with a missing or unparsable date count as the epoch, which
/// places them after every dated item. Equal dates keep their original
/// relative order.
pub fn sort_by_date(items: &[ContentItem]) -> Vec<ContentItem> {
    let mut sorted: Vec<ContentItem> = items.to_vec();
    sorted.sort_by_key(|item| std::cmp::Reverse(timestamp(item)));
    sorted
}

fn timestamp(item: &ContentItem) -> i64 {
    item.metadata
        .parse_date()
        .map(|d| d.timestamp())
        .unwrap_or(0)
}

/// First item whose slug matches exactly
pub fn find_by_slug<'a>(items: &'a [ContentItem], slug: &str) -> Option<&'a ContentItem> {
    items.iter().find(|item| item.slug == slug)
}

/// Keep items whose date matches every specified calendar component,
/// read in the local timezone. Undated items never match an active
/// filter; with no components specified everything passes.
pub fn filter_by_date(
    items: &[ContentItem],
    year: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
) -> Vec<ContentItem> {
    if year.is_none() && month.is_none() && day.is_none() {
        return items.to_vec();
    }

    items
        .iter()
        .filter(|item| match item.metadata.parse_date() {
            Some(date) => {
                year.map_or(true, |y| date.year() == y)
                    && month.map_or(true, |m| date.month() == m)
                    && day.map_or(true, |d| date.day() == d)
            }
            None => false,
        })
        .cloned()
        .collect()
}

/// Keep items carrying every requested tag
pub fn filter_by_tags(items: &[ContentItem], tags: &[String]) -> Vec<ContentItem> {
    items
        .iter()
        .filter(|item| {
            tags.iter()
                .all(|wanted| item.metadata.tags.iter().any(|have| have == wanted))
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Metadata;
    use std::path::PathBuf;

    fn item(slug: &str, date: Option<&str>, tags: &[&str]) -> ContentItem {
        ContentItem {
            metadata: Metadata {
                title: Some(slug.to_string()),
                date: date.map(|d| d.to_string()),
                tags: tags.iter().map(|t| t.to_string()).collect(),
                ..Default::default()
            },
            slug: slug.to_string(),
            content: String::new(),
            path: PathBuf::from(format!("{}.md", slug)),
        }
    }

    #[test]
    fn test_sort_by_date_newest_first() {
        let items = vec![
            item("a", Some("2024-01-05"), &[]),
            item("b", Some("2024-03-01"), &[]),
        ];
        let sorted = sort_by_date(&items);
        let slugs: Vec<_> = sorted.iter().map(|i| i.slug.as_str()).collect();
        assert_eq!(slugs, vec!["b", "a"]);
    }

    #[test]
    fn test_sort_by_date_is_idempotent() {
        let items = vec![
            item("c", Some("2023-06-01"), &[]),
            item("a", Some("2024-01-05"), &[]),
            item("b", None, &[]),
        ];
        let once = sort_by_date(&items);
        let twice = sort_by_date(&once);
        let a: Vec<_> = once.iter().map(|i| i.slug.as_str()).collect();
        let b: Vec<_> = twice.iter().map(|i| i.slug.as_str()).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_undated_items_sort_last() {
        let items = vec![
            item("undated", None, &[]),
            item("old", Some("2001-01-01"), &[]),
            item("new", Some("2024-01-01"), &[]),
        ];
        let sorted = sort_by_date(&items);
        assert_eq!(sorted.last().unwrap().slug, "undated");
    }

    #[test]
    fn test_sort_stable_for_equal_dates() {
        let items = vec![
            item("first", Some("2024-01-05"), &[]),
            item("second", Some("2024-01-05"), &[]),
        ];
        let sorted = sort_by_date(&items);
        let slugs: Vec<_> = sorted.iter().map(|i| i.slug.as_str()).collect();
        assert_eq!(slugs, vec!["first", "second"]);
    }

    #[test]
    fn test_find_by_slug() {
        let items = vec![item("hello", None, &[])];
        assert!(find_by_slug(&items, "hello").is_some());
        assert!(find_by_slug(&items, "other").is_none());
    }

    #[test]
    fn test_find_by_slug_empty_snapshot() {
        assert!(find_by_slug(&[], "anything").is_none());
    }

    #[test]
    fn test_filter_by_date_components() {
        let items = vec![
            item("jan", Some("2024-01-05"), &[]),
            item("mar", Some("2024-03-01"), &[]),
            item("old", Some("2023-03-01"), &[]),
            item("undated", None, &[]),
        ];

        let year = filter_by_date(&items, Some(2024), None, None);
        let slugs: Vec<_> = year.iter().map(|i| i.slug.as_str()).collect();
        assert_eq!(slugs, vec!["jan", "mar"]);

        let march_2024 = filter_by_date(&items, Some(2024), Some(3), None);
        assert_eq!(march_2024.len(), 1);
        assert_eq!(march_2024[0].slug, "mar");

        assert!(filter_by_date(&items, Some(1999), None, None).is_empty());
    }

    #[test]
    fn test_filter_by_date_no_components_passes_all() {
        let items = vec![item("a", None, &[]), item("b", Some("2024-01-01"), &[])];
        assert_eq!(filter_by_date(&items, None, None, None).len(), 2);
    }

    #[test]
    fn test_filter_by_tags_requires_all() {
        let items = vec![
            item("both1", None, &["go", "rust"]),
            item("both2", None, &["rust", "go", "extra"]),
            item("go1", None, &["go"]),
            item("go2", None, &["go"]),
            item("go3", None, &["go"]),
        ];
        let wanted = vec!["go".to_string(), "rust".to_string()];
        let matched = filter_by_tags(&items, &wanted);
        let slugs: Vec<_> = matched.iter().map(|i| i.slug.as_str()).collect();
        assert_eq!(slugs, vec!["both1", "both2"]);
    }

    #[test]
    fn test_filter_by_tags_empty_request_matches_everything() {
        let items = vec![item("a", None, &["go"]), item("b", None, &[])];
        assert_eq!(filter_by_tags(&items, &[]).len(), 2);
    }
}
