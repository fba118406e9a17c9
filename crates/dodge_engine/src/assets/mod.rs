//! Asset management system

pub mod resources;

pub use resources::{Manifest, Resource, ResourceCache};

use thiserror::Error;

/// Asset loading errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// File could not be read
    #[error("IO error reading {path}: {source}")]
    Io {
        /// File path
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Content could not be parsed
    #[error("Failed to parse {key}: {message}")]
    Parse {
        /// Resource key or file path
        key: String,
        /// Parser message
        message: String,
    },

    /// Nothing cached under the key
    #[error("Resource not found: {0}")]
    Missing(String),

    /// Cached under the key, but as another kind
    #[error("Resource {key} is {found}, expected {expected}")]
    WrongKind {
        /// Resource key
        key: String,
        /// Requested kind
        expected: &'static str,
        /// Cached kind
        found: &'static str,
    },
}
