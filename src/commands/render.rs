//! Render a single content file through the pipeline

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::Folio;

/// Parse one file and emit its rendered content to stdout or a file
pub fn run(folio: &Folio, file: &Path, output: Option<&Path>) -> Result<()> {
    let path = if file.is_absolute() {
        file.to_path_buf()
    } else {
        folio.base_dir.join(file)
    };

    let parsed = folio.store().read_file(&path);

    match output {
        Some(out) => {
            fs::write(out, &parsed.content)?;
            println!("Wrote {:?}", out);
        }
        None => println!("{}", parsed.content),
    }

    Ok(())
}
