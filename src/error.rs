//! Error types for acadview

use thiserror::Error;

/// Main error type for reading DXF documents
///
/// Every failure of a read call surfaces as this one type, whichever phase
/// (input validation, decoding, tokenizing, section parsing) produced it.
#[derive(Debug, Error)]
pub enum DxfError {
    /// The input buffer or string was empty
    #[error("Empty input: nothing to parse")]
    EmptyInput,

    /// The input is a binary DWG drawing, not DXF text
    #[error("DWG files are not supported (found {version} signature); convert to DXF first")]
    DwgNotSupported { version: String },

    /// The input is a binary DXF file
    #[error("Binary DXF files are not supported")]
    BinaryDxfNotSupported,

    /// Failure while determining or applying the text encoding
    #[error("Decode error: {message}")]
    Decode {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Failure while splitting the text into group code/value pairs
    #[error("Tokenize error: {message}")]
    Tokenize { message: String },

    /// Structural failure inside a recognized section
    #[error("Error in {section} section: {message}")]
    Section { section: String, message: String },
}

impl DxfError {
    /// Create a decode error with an underlying cause
    pub fn decode(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        DxfError::Decode {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a section error
    pub fn section(section: impl Into<String>, message: impl Into<String>) -> Self {
        DxfError::Section {
            section: section.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for acadview operations
pub type Result<T> = std::result::Result<T, DxfError>;
