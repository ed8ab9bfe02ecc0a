//! Repair passes: scan, normalize, resolve, gate, substitute, persist.
//!
//! Every pass takes the store and resolver explicitly plus a
//! [`RepairContext`] carrying the compiled link pattern, so nothing is
//! shared between passes except what the caller hands in.

mod documents;
mod metadata;
mod single;

pub use documents::{repair_document, repair_documents, DocumentReport};
pub use metadata::{repair_metadata, MetadataReport};
pub use single::repair_single_document;

use crate::error::Result;
use crate::filename::LinkMatch;
use crate::gate::BackendGate;
use crate::model::AttachmentId;
use crate::scan::LinkPattern;
use crate::store::AttachmentResolver;

/// Inputs shared by all passes of one run.
#[derive(Debug, Clone)]
pub struct RepairContext {
    pub pattern: LinkPattern,
    pub gate: BackendGate,
    /// Apply `gate` in the metadata pass too.
    pub gate_metadata: bool,
    /// Compute everything, persist nothing.
    pub dry_run: bool,
}

impl RepairContext {
    pub fn new(pattern: LinkPattern, gate: BackendGate) -> Self {
        Self {
            pattern,
            gate,
            gate_metadata: false,
            dry_run: false,
        }
    }
}

/// What happened to one distinct link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    /// Replaced by `url`.
    Fixed {
        link: LinkMatch,
        attachment_id: AttachmentId,
        url: String,
    },
    /// An attachment was found, but its URL was missing or refused by the gate.
    Rejected {
        link: LinkMatch,
        attachment_id: AttachmentId,
        url: Option<String>,
    },
    /// No attachment matches the filename.
    Unresolved { link: LinkMatch },
}

impl LinkOutcome {
    pub fn link(&self) -> &LinkMatch {
        match self {
            LinkOutcome::Fixed { link, .. }
            | LinkOutcome::Rejected { link, .. }
            | LinkOutcome::Unresolved { link } => link,
        }
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, LinkOutcome::Fixed { .. })
    }
}

/// Counters for one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    /// Items (documents or metadata rows) examined.
    pub scanned: usize,
    /// Items whose text changed.
    pub changed: usize,
    pub fixed: usize,
    pub rejected: usize,
    pub unresolved: usize,
}

impl PassSummary {
    fn record(&mut self, outcome: &LinkOutcome) {
        match outcome {
            LinkOutcome::Fixed { .. } => self.fixed += 1,
            LinkOutcome::Rejected { .. } => self.rejected += 1,
            LinkOutcome::Unresolved { .. } => self.unresolved += 1,
        }
    }
}

/// Attachment id and URL for a matched link, trying each lookup candidate.
async fn resolve<R>(resolver: &R, link: &LinkMatch) -> Result<Option<(AttachmentId, Option<String>)>>
where
    R: AttachmentResolver + ?Sized,
{
    for candidate in link.lookup_candidates() {
        if let Some(id) = resolver.find_attachment(candidate).await? {
            let url = resolver
                .attachment_url(id)
                .await?
                .filter(|u| !u.is_empty());
            return Ok(Some((id, url)));
        }
    }
    Ok(None)
}

/// Resolve `link` and decide whether its URL may be used.
///
/// With `gate = None` any non-empty URL is accepted.
pub(crate) async fn evaluate_link<R>(
    resolver: &R,
    gate: Option<&BackendGate>,
    link: LinkMatch,
) -> Result<LinkOutcome>
where
    R: AttachmentResolver + ?Sized,
{
    let Some((attachment_id, url)) = resolve(resolver, &link).await? else {
        tracing::debug!(filename = %link.normalized, "no attachment for filename");
        return Ok(LinkOutcome::Unresolved { link });
    };

    match url {
        Some(url) if gate.map_or(true, |g| g.accepts(&url)) => Ok(LinkOutcome::Fixed {
            link,
            attachment_id,
            url,
        }),
        url => {
            tracing::debug!(
                filename = %link.normalized,
                attachment_id,
                url = url.as_deref().unwrap_or(""),
                "resolved URL not applied"
            );
            Ok(LinkOutcome::Rejected {
                link,
                attachment_id,
                url,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::{MemoryStore, StoredAttachment};

    fn store_with(file: &str, url: Option<&str>) -> MemoryStore {
        let store = MemoryStore::new();
        store.insert_attachment(StoredAttachment {
            id: 42,
            attached_file: file.to_string(),
            created_at: 0,
            url: url.map(str::to_string),
        });
        store
    }

    fn link(s: &str) -> LinkMatch {
        LinkMatch::from_link(s).unwrap()
    }

    #[tokio::test]
    async fn fixed_when_gate_accepts() {
        let store = store_with("2024/pic.jpg", Some("https://b.s3.amazonaws.com/2024/pic.jpg"));
        let gate = BackendGate::new("amazonaws.com");
        let outcome = evaluate_link(&store, Some(&gate), link("https://old.test/wp-content/uploads/2024/pic-300x200.jpg"))
            .await
            .unwrap();
        assert!(outcome.is_fixed());
        assert_eq!(outcome.link().normalized, "pic.jpg");
    }

    #[tokio::test]
    async fn rejected_without_marker_or_url() {
        let gate = BackendGate::new("amazonaws.com");
        let local = store_with("pic.jpg", Some("https://old.test/wp-content/uploads/pic.jpg"));
        let outcome = evaluate_link(&local, Some(&gate), link("https://old.test/wp-content/uploads/pic.jpg"))
            .await
            .unwrap();
        assert!(matches!(outcome, LinkOutcome::Rejected { attachment_id: 42, url: Some(_), .. }));

        let missing = store_with("pic.jpg", None);
        let outcome = evaluate_link(&missing, None, link("https://old.test/wp-content/uploads/pic.jpg"))
            .await
            .unwrap();
        assert!(matches!(outcome, LinkOutcome::Rejected { url: None, .. }));
    }

    #[tokio::test]
    async fn ungated_accepts_any_url() {
        let local = store_with("pic.jpg", Some("https://old.test/wp-content/uploads/pic.jpg"));
        let outcome = evaluate_link(&local, None, link("https://old.test/wp-content/uploads/pic.jpg"))
            .await
            .unwrap();
        assert!(outcome.is_fixed());
    }

    #[tokio::test]
    async fn raw_filename_tried_after_normalized() {
        let store = store_with("2024/banner-1920x1080.jpg", Some("https://b.s3.amazonaws.com/banner-1920x1080.jpg"));
        let outcome = evaluate_link(&store, None, link("https://old.test/wp-content/uploads/2024/banner-1920x1080.jpg"))
            .await
            .unwrap();
        assert!(outcome.is_fixed());
        assert_eq!(store.attachment_lookups(), 2);
    }

    #[tokio::test]
    async fn unresolved_when_nothing_matches() {
        let store = MemoryStore::new();
        let outcome = evaluate_link(&store, None, link("https://old.test/wp-content/uploads/x.pdf"))
            .await
            .unwrap();
        assert!(matches!(outcome, LinkOutcome::Unresolved { .. }));
    }
}
