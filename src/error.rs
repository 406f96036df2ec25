use std::fmt::{self, Display, Formatter};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    #[error("Video not found")]
    NotFound(String),

    #[error("No video ID provided")]
    MissingId,

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Failed to load video: {0}")]
    Catalog(#[from] CatalogError),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("serialization failed: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage quota exceeded: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded { needed: usize, quota: usize },
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid catalog URI: {0}")]
    Uri(#[from] hyper::http::uri::InvalidUri),

    #[error("http error: {0}")]
    Http(#[from] hyper::Error),

    #[error("HTTP error! status: {0}")]
    Status(u16),

    #[error("malformed catalog: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unreadable user videos: {0}")]
    UserVideos(#[source] StorageError),
}

/// Upload form fields, as named on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    DriveUrl,
    Title,
    Description,
    ThumbnailUrl,
}

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Field::DriveUrl => "driveUrl",
            Field::Title => "videoTitle",
            Field::Description => "videoDescription",
            Field::ThumbnailUrl => "thumbnailUrl",
        }
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One rejected field: the inline message shown next to it, and the short
/// summary collected into the overall notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: &'static str,
    pub summary: &'static str,
}

/// Every field error found on a form, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn push(&mut self, field: Field, message: &'static str, summary: &'static str) {
        self.0.push(FieldError {
            field,
            message,
            summary,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// Inline message for `field`, if it was rejected.
    pub fn message_for(&self, field: Field) -> Option<&'static str> {
        self.0.iter().find(|e| e.field == field).map(|e| e.message)
    }

    pub(crate) fn into_result(self) -> std::result::Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let summaries: Vec<&str> = self.0.iter().map(|e| e.summary).collect();
        write!(
            f,
            "Please fix the following errors: {}",
            summaries.join(", ")
        )
    }
}

impl std::error::Error for ValidationErrors {}
