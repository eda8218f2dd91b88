//! Document persistence: a versioned JSON envelope around the scene.
//!
//! The on-disk format is the scene plus metadata under a `version` tag.
//! Unknown or missing optional fields deserialize to their defaults, so
//! documents written by older builds keep loading.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::scene::Scene;

pub const FORMAT_VERSION: &str = "1.0";

fn default_version() -> String {
    FORMAT_VERSION.to_string()
}

/// Descriptive fields carried alongside the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub name: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: String,
}

impl DocumentMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        DocumentMetadata {
            name: name.into(),
            created: now,
            modified: now,
            author: String::new(),
            description: String::new(),
        }
    }
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        DocumentMetadata::new("Untitled")
    }
}

/// The complete serialized document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub metadata: DocumentMetadata,
    pub scene: Scene,
}

impl SceneDocument {
    pub fn new(name: impl Into<String>, scene: Scene) -> Self {
        SceneDocument {
            version: FORMAT_VERSION.to_string(),
            metadata: DocumentMetadata::new(name),
            scene,
        }
    }

    /// Serializes to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize document")
    }

    /// Parses a document from JSON.
    pub fn from_json(json: &str) -> Result<SceneDocument> {
        serde_json::from_str(json).context("Failed to parse document JSON")
    }

    /// Writes the document to `path`, stamping the modified time.
    pub fn save_to_file(&mut self, path: &Path) -> Result<()> {
        self.metadata.modified = Utc::now();
        let json = self.to_json()?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write document to {}", path.display()))?;
        info!(path = %path.display(), objects = self.scene.len(), "document saved");
        Ok(())
    }

    /// Reads a document from `path`.
    pub fn load_from_file(path: &Path) -> Result<SceneDocument> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read document from {}", path.display()))?;
        let doc = SceneDocument::from_json(&json)?;
        info!(path = %path.display(), objects = doc.scene.len(), "document loaded");
        Ok(doc)
    }
}
