//! Canonical filename derivation for matched links.
//!
//! A matched link like `https://old.example.com/wp-content/uploads/2024/pic-300x200.jpg`
//! names a generated size variant; the attachment record stores the original
//! (`2024/pic.jpg`). Lookup therefore uses the last path segment with any
//! dimension suffix removed.

mod dimensions;
mod path;

pub use dimensions::{strip_dimension_suffix, IMAGE_EXTENSIONS};
pub use path::filename_from_link;

/// Ephemeral view of one matched link, alive for a single scan iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkMatch {
    pub link: String,
    /// Last path segment as it appears in the link.
    pub filename: String,
    /// `filename` without a size-variant suffix.
    pub normalized: String,
}

impl LinkMatch {
    /// Returns `None` when the link has no usable last path segment.
    pub fn from_link(link: &str) -> Option<Self> {
        let filename = filename_from_link(link)?;
        let normalized = strip_dimension_suffix(&filename);
        Some(Self {
            link: link.to_string(),
            filename,
            normalized,
        })
    }

    /// Names to try against the attachment index, in order. The raw name
    /// comes second so originals whose own name ends in `-WxH` still resolve.
    pub fn lookup_candidates(&self) -> Vec<&str> {
        if self.normalized == self.filename {
            vec![self.normalized.as_str()]
        } else {
            vec![self.normalized.as_str(), self.filename.as_str()]
        }
    }
}
