//! Document snapshots
//!
//! Saves and loads a [`Document`] as pretty-printed JSON together with a
//! small metadata header.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use stagehand_core::Document;

use crate::error::{Result, StageError};

const SNAPSHOT_VERSION: &str = "1.0";
const CREATOR: &str = concat!("stagehand ", env!("CARGO_PKG_VERSION"));

/// Snapshot file contents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveData {
    pub version: String,
    pub metadata: SaveMetadata,
    pub document: Document,
}

/// Metadata for snapshot files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveMetadata {
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    pub creator: String,
}

/// Tracks the snapshot a document was loaded from
#[derive(Debug, Default)]
pub struct FileManager {
    /// Current file path (None if never saved)
    current_file_path: Option<PathBuf>,
    /// Creation time of the current file, kept across saves
    created: Option<DateTime<Utc>>,
    is_modified: bool,
}

impl FileManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_file_path(&self) -> Option<&Path> {
        self.current_file_path.as_deref()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.is_modified
    }

    pub fn mark_modified(&mut self) {
        self.is_modified = true;
    }

    /// File name for display, with `*` when there are unsaved changes
    pub fn display_name(&self) -> String {
        let name = self
            .current_file_path
            .as_ref()
            .and_then(|path| path.file_name())
            .and_then(|name| name.to_str())
            .unwrap_or("Untitled");

        if self.is_modified {
            format!("{}*", name)
        } else {
            name.to_string()
        }
    }

    pub fn save_to_file(&mut self, file_path: &Path, document: &Document) -> Result<()> {
        let now = Utc::now();
        let created = match &self.current_file_path {
            Some(current) if current == file_path => self.created.unwrap_or(now),
            _ => now,
        };

        let save_data = SaveData {
            version: SNAPSHOT_VERSION.to_string(),
            metadata: SaveMetadata {
                created,
                modified: now,
                creator: CREATOR.to_string(),
            },
            document: document.clone(),
        };

        std::fs::write(file_path, serde_json::to_string_pretty(&save_data)?)?;
        debug!("Saved {} node(s) to {}", document.len(), file_path.display());

        self.current_file_path = Some(file_path.to_path_buf());
        self.created = Some(created);
        self.is_modified = false;
        Ok(())
    }

    pub fn load_from_file(&mut self, file_path: &Path) -> Result<Document> {
        let content = std::fs::read_to_string(file_path)?;
        let save_data: SaveData = serde_json::from_str(&content)?;

        if save_data.version != SNAPSHOT_VERSION {
            return Err(StageError::InvalidArgument(format!(
                "unsupported snapshot version '{}' in {}",
                save_data.version,
                file_path.display()
            )));
        }

        debug!(
            "Loaded {} node(s) from {}",
            save_data.document.len(),
            file_path.display()
        );
        self.current_file_path = Some(file_path.to_path_buf());
        self.created = Some(save_data.metadata.created);
        self.is_modified = false;
        Ok(save_data.document)
    }

    /// Mark the file modified if `document` differs from `original`, then
    /// save when there are unsaved changes. Returns whether a file was written.
    pub fn save_if_changed(
        &mut self,
        file_path: &Path,
        original: &Document,
        document: &Document,
    ) -> Result<bool> {
        if content_differs(original, document) {
            self.mark_modified();
        }
        if !self.is_modified {
            return Ok(false);
        }
        self.save_to_file(file_path, document)?;
        Ok(true)
    }

    /// Load the snapshot at `file_path`, or start a new document if the file
    /// does not exist yet. A new document counts as unmodified until the
    /// caller marks it.
    pub fn load_or_new(&mut self, file_path: &Path) -> Result<Document> {
        if file_path.exists() {
            self.load_from_file(file_path)
        } else {
            self.current_file_path = Some(file_path.to_path_buf());
            self.created = None;
            self.is_modified = false;
            Ok(Document::new())
        }
    }
}

fn content_differs(a: &Document, b: &Document) -> bool {
    a.len() != b.len()
        || a.default_node() != b.default_node()
        || a.load_policy() != b.load_policy()
        || a.nodes().zip(b.nodes()).any(|(x, y)| x != y)
}
