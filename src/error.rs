//! Error types for the block bakery.

use thiserror::Error;

/// Result type alias using BakeryError.
pub type Result<T> = std::result::Result<T, BakeryError>;

/// Main error type for state generation, model resolution and baking.
#[derive(Error, Debug)]
pub enum BakeryError {
    /// Failed to read or parse a ZIP archive.
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Failed to parse JSON data.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to read or process an image.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration document parsed but does not have the expected shape.
    #[error("Config parse error: {0}")]
    ConfigParse(String),

    /// Resource not found in the resource pack.
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    /// Invalid resource pack structure.
    #[error("Invalid resource pack: {0}")]
    InvalidResourcePack(String),

    /// Failed to resolve a block model or its parent chain.
    #[error("Model resolution error: {0}")]
    ModelResolution(String),

    /// A selector or transition names a property the block type does not declare.
    #[error("Unknown property '{property}' on {block}")]
    UnknownProperty { block: String, property: String },

    /// A transition names a value the property does not declare.
    #[error("Unknown transition on {block}: {property}={value}")]
    UnknownTransition {
        block: String,
        property: String,
        value: String,
    },

    /// The state graph could not be constructed.
    #[error("State graph error: {0}")]
    StateGraph(String),

    /// The rectangle packer could not place a rectangle.
    #[error("Packing failed: {0}")]
    PackingFailed(String),
}
