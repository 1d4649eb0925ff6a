//! Create a new content file

use anyhow::Result;
use std::fs;

use crate::Folio;

/// Scaffold a markdown content file in a category directory
pub fn run(folio: &Folio, category: &str, title: &str) -> Result<()> {
    let now = chrono::Local::now();

    let target_dir = folio.content_dir.join(category);
    fs::create_dir_all(&target_dir)?;

    let slug = slug::slugify(title);
    let file_path = target_dir.join(format!("{}.md", slug));

    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let content = format!(
        "---\ntitle: {}\ndate: {}\ntags: []\n---\n",
        title,
        now.format("%Y-%m-%d %H:%M:%S")
    );

    fs::write(&file_path, content)?;
    println!("Created: {:?}", file_path);

    Ok(())
}
