//! Pre-populated resource cache
//!
//! Everything is read up front, either from a manifest or inserted by hand.
//! Lookups during the game are synchronous and never touch the disk.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use super::AssetError;
use crate::ecs::SceneDesc;

/// Cached resource
#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    /// UTF-8 text: scenes, configuration, scripts
    Text(String),
    /// Raw bytes: images, sounds
    Bytes(Vec<u8>),
}

impl Resource {
    fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Bytes(_) => "binary",
        }
    }
}

/// Files to preload, relative to the manifest's directory
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Manifest {
    /// Loaded as text
    pub text: Vec<String>,
    /// Loaded as bytes
    pub binary: Vec<String>,
}

/// Keyed resource store
#[derive(Debug, Default)]
pub struct ResourceCache {
    resources: HashMap<String, Resource>,
}

impl ResourceCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a RON manifest and load every file it lists
    pub fn from_manifest(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let mut cache = Self::new();
        cache.load_manifest(path)?;
        Ok(cache)
    }

    /// Load every file listed in a RON manifest into this cache.
    ///
    /// Keys are the paths as written in the manifest.
    pub fn load_manifest(&mut self, path: impl AsRef<Path>) -> Result<usize, AssetError> {
        let path = path.as_ref();
        let contents = read_text(path)?;
        let manifest: Manifest = ron::from_str(&contents).map_err(|e| AssetError::Parse {
            key: path.display().to_string(),
            message: e.to_string(),
        })?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        for key in &manifest.text {
            let text = read_text(&base.join(key))?;
            self.insert_text(key, text);
        }
        for key in &manifest.binary {
            let file = base.join(key);
            let bytes = std::fs::read(&file).map_err(|source| AssetError::Io {
                path: file.display().to_string(),
                source,
            })?;
            self.insert_bytes(key, bytes);
        }

        let count = manifest.text.len() + manifest.binary.len();
        log::info!("Loaded {} resources from {}", count, path.display());
        Ok(count)
    }

    /// Add or replace a text resource
    pub fn insert_text(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.resources.insert(key.into(), Resource::Text(text.into()));
    }

    /// Add or replace a binary resource
    pub fn insert_bytes(&mut self, key: impl Into<String>, bytes: Vec<u8>) {
        self.resources.insert(key.into(), Resource::Bytes(bytes));
    }

    /// Cached value, if any
    pub fn load(&self, key: &str) -> Option<&Resource> {
        self.resources.get(key)
    }

    /// Cached text
    pub fn load_text(&self, key: &str) -> Result<&str, AssetError> {
        match self.resources.get(key) {
            Some(Resource::Text(text)) => Ok(text),
            Some(other) => Err(AssetError::WrongKind {
                key: key.to_string(),
                expected: "text",
                found: other.kind(),
            }),
            None => Err(AssetError::Missing(key.to_string())),
        }
    }

    /// Cached bytes
    pub fn load_bytes(&self, key: &str) -> Result<&[u8], AssetError> {
        match self.resources.get(key) {
            Some(Resource::Bytes(bytes)) => Ok(bytes),
            Some(other) => Err(AssetError::WrongKind {
                key: key.to_string(),
                expected: "binary",
                found: other.kind(),
            }),
            None => Err(AssetError::Missing(key.to_string())),
        }
    }

    /// Parse a cached RON text resource as a scene description
    pub fn load_scene(&self, key: &str) -> Result<SceneDesc, AssetError> {
        let text = self.load_text(key)?;
        ron::from_str(text).map_err(|e| AssetError::Parse {
            key: key.to_string(),
            message: e.to_string(),
        })
    }

    /// Whether a key is cached
    pub fn contains(&self, key: &str) -> bool {
        self.resources.contains_key(key)
    }

    /// Number of cached resources
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

fn read_text(path: &Path) -> Result<String, AssetError> {
    std::fs::read_to_string(path).map_err(|source| AssetError::Io {
        path: path.display().to_string(),
        source,
    })
}
