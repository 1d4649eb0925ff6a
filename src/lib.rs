//! folio-rs: content pipeline and JSON API for markdown-driven
//! personal sites
//!
//! This crate discovers content files under a per-category directory
//! tree, parses their front matter, renders markdown bodies to enhanced
//! HTML, and serves the resulting snapshots through pure query
//! functions and a small HTTP API.

pub mod commands;
pub mod config;
pub mod content;
pub mod helpers;
pub mod server;

use anyhow::Result;
use std::path::Path;

use content::{ContentStore, FormatParser, MarkdownRenderer};

/// The main Folio application
#[derive(Clone)]
pub struct Folio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Content root, one subdirectory per category
    pub content_dir: std::path::PathBuf,
    /// Static assets served next to the API
    pub public_dir: std::path::PathBuf,
}

impl Folio {
    /// Create a new Folio instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let content_dir = base_dir.join(&config.content_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Ok(Self {
            config,
            base_dir,
            content_dir,
            public_dir,
        })
    }

    /// Build a content store honoring the configured draft and
    /// highlighting policies
    pub fn store(&self) -> ContentStore {
        let renderer = MarkdownRenderer::with_options(self.config.highlight.auto_detect);
        ContentStore::with_parser(
            self.content_dir.clone(),
            self.config.include_unpublished,
            FormatParser::with_renderer(renderer),
        )
    }
}
