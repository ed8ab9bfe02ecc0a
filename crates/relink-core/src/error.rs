//! Error type shared by the stores and repair passes.

use crate::model::DocumentId;

/// Fatal conditions. Benign outcomes (no match, unresolved attachment,
/// gate rejection) are reported through `repair::LinkOutcome` instead.
#[derive(Debug, thiserror::Error)]
pub enum RelinkError {
    /// The single-document variant was pointed at a missing document.
    #[error("Post ID {0} not found.")]
    NotFound(DocumentId),

    /// Multisite lookup found no blog for the requested host.
    #[error("no site registered for domain {0}")]
    SiteNotFound(String),

    #[error("site URL option is missing from {0}")]
    MissingSiteUrl(String),

    #[error("site URL {0:?} has no host")]
    InvalidSiteUrl(String),

    #[error("table prefix {0:?} may only contain ASCII letters, digits and '_'")]
    InvalidTablePrefix(String),

    #[error("invalid link pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, RelinkError>;
