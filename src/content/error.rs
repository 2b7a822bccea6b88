//! Errors raised while loading blog content

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias for content operations
pub type Result<T> = std::result::Result<T, ContentError>;

/// A failure to discover, read or validate a post file.
///
/// Validation variants carry the offending file name; the field is implied
/// by the variant and available through [`ContentError::field`].
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Missing or invalid 'title' in {file}")]
    InvalidTitle { file: String },

    #[error("Missing or invalid 'date' in {file}. Expected YYYY-MM-DD format.")]
    InvalidDate { file: String },

    #[error("Missing summary in {file}. Provide either 'description' or 'excerpt'.")]
    MissingSummary { file: String },

    #[error("Invalid 'draft' value in {file}. Expected boolean.")]
    InvalidDraft { file: String },

    #[error("Invalid 'published' value in {file}. Expected boolean.")]
    InvalidPublished { file: String },

    #[error("Invalid 'tags' value in {file}. Expected an array of strings.")]
    InvalidTags { file: String },

    #[error("Failed to parse front-matter in {file}: {source}")]
    FrontMatter {
        file: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Content task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ContentError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// The post file this error is about, if it concerns a single file
    pub fn file_name(&self) -> Option<&str> {
        match self {
            Self::InvalidTitle { file }
            | Self::InvalidDate { file }
            | Self::MissingSummary { file }
            | Self::InvalidDraft { file }
            | Self::InvalidPublished { file }
            | Self::InvalidTags { file }
            | Self::FrontMatter { file, .. } => Some(file),
            Self::Io { path, .. } => path.file_name().and_then(|n| n.to_str()),
            Self::Task(_) => None,
        }
    }

    /// The front-matter field that failed validation.
    ///
    /// A missing summary reports `summary`, since either `description` or
    /// `excerpt` satisfies it.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::InvalidTitle { .. } => Some("title"),
            Self::InvalidDate { .. } => Some("date"),
            Self::MissingSummary { .. } => Some("summary"),
            Self::InvalidDraft { .. } => Some("draft"),
            Self::InvalidPublished { .. } => Some("published"),
            Self::InvalidTags { .. } => Some("tags"),
            _ => None,
        }
    }
}
