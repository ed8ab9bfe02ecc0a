//! Replacement gate: only URLs served by the storage backend may replace a link.

/// Accepts candidate URLs containing the backend host marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendGate {
    marker: String,
}

impl BackendGate {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// True if `url` is non-empty and contains the marker.
    pub fn accepts(&self, url: &str) -> bool {
        !url.is_empty() && url.contains(&self.marker)
    }
}
