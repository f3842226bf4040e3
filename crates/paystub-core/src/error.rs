//! Error types for the paystub-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the paystub library.
#[derive(Error, Debug)]
pub enum PaystubError {
    /// Converted document could not be read.
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    /// External document conversion failed.
    #[error("conversion error: {0}")]
    Conversion(#[from] ConversionError),

    /// Statement field extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while reading positioned text out of a converted document.
#[derive(Error, Debug)]
pub enum LayoutError {
    /// The XML itself is malformed.
    #[error("malformed XML at byte {position}: {reason}")]
    Xml { position: u64, reason: String },

    /// An element is missing a required attribute.
    #[error("<{element}> is missing attribute `{attribute}`")]
    MissingAttribute { element: String, attribute: String },

    /// An attribute value could not be parsed.
    #[error("invalid value for `{attribute}`: {value}")]
    InvalidAttribute { attribute: String, value: String },

    /// The requested page does not exist in the document.
    #[error("page {0} not found")]
    MissingPage(u32),
}

/// Errors related to the external document converter.
#[derive(Error, Debug)]
pub enum ConversionError {
    /// The converter process could not be started.
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The converter exited unsuccessfully.
    #[error("{program} exited with {status}")]
    Failed { program: String, status: String },

    /// The converter finished but produced no output file.
    #[error("converter produced no output at {}", .0.display())]
    MissingOutput(PathBuf),

    /// File-system error around the cache directory.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to statement field extraction.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// A required row is absent.
    #[error("missing required row: {0}")]
    MissingRow(String),

    /// A required row has too few cells.
    #[error("row {label} has no cell at position {index}")]
    MissingCell { label: String, index: usize },

    /// Failed to parse a value.
    #[error("failed to parse {field}: {value}")]
    Parse { field: String, value: String },
}

/// Result type for the paystub library.
pub type Result<T> = std::result::Result<T, PaystubError>;
