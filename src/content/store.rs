//! Content store - walks category directories, parses files, and
//! memoizes snapshots

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use walkdir::WalkDir;

use super::format::Parsed;
use super::{ContentItem, FileType, FormatParser, Metadata};

/// Loads content snapshots from a content root, one subdirectory per
/// category. Owns all filesystem access and parsing; the query layer
/// only ever sees the snapshots this store hands out.
pub struct ContentStore {
    content_root: PathBuf,
    include_unpublished: bool,
    parser: FormatParser,
}

impl ContentStore {
    /// Create a store over a content root
    pub fn new<P: Into<PathBuf>>(content_root: P, include_unpublished: bool) -> Self {
        Self::with_parser(content_root, include_unpublished, FormatParser::new())
    }

    /// Create a store with a custom format parser
    pub fn with_parser<P: Into<PathBuf>>(
        content_root: P,
        include_unpublished: bool,
        parser: FormatParser,
    ) -> Self {
        Self {
            content_root: content_root.into(),
            include_unpublished,
            parser,
        }
    }

    pub fn content_root(&self) -> &Path {
        &self.content_root
    }

    /// Build the snapshot for one category directory.
    ///
    /// Unsupported extensions are skipped silently; unreadable files
    /// degrade to empty items; a missing directory yields an empty
    /// snapshot. Items marked `published: false` are dropped unless the
    /// store was built with `include_unpublished`.
    pub fn list(&self, category: &str) -> Vec<ContentItem> {
        let dir = self.content_root.join(category);
        if !dir.is_dir() {
            tracing::debug!("Content directory missing or unreadable: {:?}", dir);
            return Vec::new();
        }

        let mut paths: Vec<PathBuf> = WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file() && is_supported(e.path()))
            .map(|e| e.path().to_path_buf())
            .collect();
        paths.sort();

        let mut items = Vec::new();
        for path in paths {
            let parsed = self.read_file(&path);

            if !parsed.metadata.published && !self.include_unpublished {
                tracing::debug!("Skipping unpublished item: {:?}", path);
                continue;
            }

            let slug = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default()
                .to_string();

            items.push(ContentItem {
                metadata: parsed.metadata,
                slug,
                content: parsed.content,
                path,
            });
        }

        items
    }

    /// Read and parse a single content file. An unreadable file comes
    /// back as empty metadata and content, logged.
    pub fn read_file(&self, path: &Path) -> Parsed {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("Failed to read {:?}: {}", path, e);
                return Parsed {
                    metadata: Metadata::default(),
                    content: String::new(),
                    raw: String::new(),
                };
            }
        };

        let file_type = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(FileType::from_extension)
            .unwrap_or(FileType::Text);

        self.parser.parse(&raw, file_type)
    }

    /// Recursively enumerate supported content files under a
    /// subdirectory of the content root, as sorted forward-slash
    /// relative paths. Used for path enumeration, not retrieval.
    pub fn walk_files(&self, subdir: &str) -> Vec<String> {
        let root = if subdir.is_empty() {
            self.content_root.clone()
        } else {
            self.content_root.join(subdir)
        };
        if !root.is_dir() {
            tracing::debug!("Walk root missing: {:?}", root);
            return Vec::new();
        }

        let mut files: Vec<String> = WalkDir::new(&root)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file() && is_supported(e.path()))
            .filter_map(|e| {
                e.path().strip_prefix(&root).ok().map(|rel| {
                    rel.components()
                        .map(|c| c.as_os_str().to_string_lossy())
                        .collect::<Vec<_>>()
                        .join("/")
                })
            })
            .collect();
        files.sort();
        files
    }
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(FileType::from_extension)
        .is_some()
}

/// Process-lifetime memoization of category snapshots.
///
/// Keyed strictly by category name, populate-on-miss, no eviction or
/// TTL. Owned by the composition root rather than hidden module state,
/// so tests and long-lived callers can `clear()` it. Concurrent misses
/// may compute the same snapshot twice; parsing is pure, so the last
/// write winning is wasted work, not a correctness hazard.
#[derive(Default)]
pub struct SnapshotCache {
    inner: Mutex<HashMap<String, Arc<Vec<ContentItem>>>>,
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the snapshot for a category, building it on first access
    pub fn get(&self, store: &ContentStore, category: &str) -> Arc<Vec<ContentItem>> {
        if let Some(snapshot) = self.lock().get(category) {
            return Arc::clone(snapshot);
        }

        // Built outside the lock; see type-level note on races
        let snapshot = Arc::new(store.list(category));
        self.lock()
            .insert(category.to_string(), Arc::clone(&snapshot));
        snapshot
    }

    /// Drop every cached snapshot, forcing re-reads on next access
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Arc<Vec<ContentItem>>>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}
