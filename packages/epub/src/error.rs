//! Error types for the converter.
//!
//! The conversion core is infallible: malformed fragments, unresolvable
//! citations and duplicate article numbers all degrade gracefully. Errors
//! only surface at the boundaries, when reading a source record or when
//! handing the finished publication to a packager.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the converter library.
#[derive(Debug, Error)]
pub enum ConverterError {
    /// A fragment record arrived without its text field.
    #[error("Fragment record #{index} has no text field")]
    MissingFragmentText { index: usize },

    /// XML parsing failed.
    #[error("XML parsing failed: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// Missing required XML element.
    #[error("Missing required XML element: {element} in {context}")]
    MissingElement { element: String, context: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML (de)serialization error.
    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// Output path is missing or not a directory.
    #[error("Output path is not an existing directory: {}", .0.display())]
    InvalidOutputDir(PathBuf),

    /// A batch list contained no input paths.
    #[error("No input records listed in {}", .0.display())]
    EmptyBatch(PathBuf),

    /// Every record of a batch failed to convert.
    #[error("All {failed} batch records failed")]
    BatchFailed { failed: usize },
}

/// Result type alias for converter operations.
pub type Result<T> = std::result::Result<T, ConverterError>;
