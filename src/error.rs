//! Error types for folio operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building a fixed-layout package.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("missing input file: {}", .0.display())]
    MissingInput(PathBuf),
}

#[cfg(feature = "pdf")]
impl From<mupdf::Error> for Error {
    fn from(e: mupdf::Error) -> Self {
        Error::Pdf(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
