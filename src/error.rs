//! Error types for jp2-io

use std::io;

/// Result type for jp2-io operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading or writing a JP2 container
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The data source could not be opened
    #[error("failed to open data source: {0}")]
    DataSourceOpenFailed(String),

    /// The input does not carry the JP2 signature
    #[error("not a JPEG-2000 image")]
    NotAnImage,

    /// Box grammar violation
    #[error("corrupted JP2 metadata at offset {offset}: {reason}")]
    CorruptedMetadata { offset: u64, reason: String },

    /// An I/O error occurred where image data was required
    #[error("failed to read image data")]
    FailedToReadImageData,

    /// A short read occurred where bytes were required
    #[error("input data read failed")]
    InputDataReadFailed,

    /// A short write occurred during rewrite
    #[error("image write failed")]
    ImageWriteFailed,

    /// Write attempted against an input without a valid JP2 signature
    #[error("no JPEG-2000 image in input data")]
    NoImageInInputData,

    /// Write-only operation unsupported by JP2
    #[error("setting {0} is not supported for JP2 images")]
    InvalidSettingForImage(&'static str),

    /// XML parsing error (from quick-xml)
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
}

impl Error {
    pub(crate) fn corrupted(offset: u64, reason: impl Into<String>) -> Self {
        Error::CorruptedMetadata {
            offset,
            reason: reason.into(),
        }
    }
}
