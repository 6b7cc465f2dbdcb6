//! Error types for the xlfill library.

use std::io;
use thiserror::Error;

/// Result type alias for xlfill operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while filling a template.
#[derive(Error, Debug)]
pub enum Error {
    /// The template is missing or unreadable, or the working copy could not be created.
    #[error("Template read error: {0}")]
    Read(String),

    /// The file is not a ZIP archive or lacks a usable content-type manifest.
    #[error("Unsupported format: {0}")]
    Format(String),

    /// The rendered package could not be written.
    #[error("Write error: {0}")]
    Write(String),

    /// Error parsing or serializing XML content.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// Invalid or malformed caller data.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// True for template read failures.
    pub fn is_read(&self) -> bool {
        matches!(self, Error::Read(_))
    }

    /// True for invalid package format failures.
    pub fn is_format(&self) -> bool {
        matches!(self, Error::Format(_))
    }

    /// True for failures while writing the rendered package.
    pub fn is_write(&self) -> bool {
        matches!(self, Error::Write(_))
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::Format(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlParse(err.to_string())
    }
}
