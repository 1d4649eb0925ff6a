//! List content items, files, or tags for a category

use anyhow::Result;
use std::collections::HashMap;

use crate::content::query;
use crate::helpers::date::format_date;
use crate::Folio;

/// What the list command should print
#[derive(Debug, Clone, Copy)]
pub enum ListMode {
    Items,
    Files,
    Tags,
}

/// List a category's content
pub fn run(folio: &Folio, category: &str, mode: ListMode) -> Result<()> {
    let store = folio.store();

    match mode {
        ListMode::Items => {
            let items = query::sort_by_date(&store.list(category));
            println!("{} ({}):", category, items.len());
            for item in items {
                let date = item
                    .metadata
                    .parse_date()
                    .map(|d| format_date(&d, true))
                    .unwrap_or_else(|| "undated".to_string());
                let title = item.metadata.title.as_deref().unwrap_or(&item.slug);
                println!("  {} - {} [{}]", date, title, item.slug);
            }
        }
        ListMode::Files => {
            for file in store.walk_files(category) {
                println!("{}", file);
            }
        }
        ListMode::Tags => {
            let items = store.list(category);
            let mut tags: HashMap<String, usize> = HashMap::new();
            for item in &items {
                for tag in &item.metadata.tags {
                    *tags.entry(tag.clone()).or_insert(0) += 1;
                }
            }
            println!("Tags ({}):", tags.len());
            let mut tags: Vec<_> = tags.into_iter().collect();
            tags.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
            for (tag, count) in tags {
                println!("  {} ({})", tag, count);
            }
        }
    }

    Ok(())
}
