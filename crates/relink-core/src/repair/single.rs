//! Single-document spot fix.

use super::{repair_document, DocumentReport, RepairContext};
use crate::error::{RelinkError, Result};
use crate::model::{Document, DocumentId};
use crate::store::{AttachmentResolver, ContentStore};

/// Repair one document by id. A missing document is fatal.
///
/// `on_start` sees the document once it is loaded, before any link is
/// looked up or written.
pub async fn repair_single_document<S, R, F>(
    store: &S,
    resolver: &R,
    ctx: &RepairContext,
    id: DocumentId,
    on_start: F,
) -> Result<DocumentReport>
where
    S: ContentStore + ?Sized,
    R: AttachmentResolver + ?Sized,
    F: FnOnce(&Document),
{
    let doc = store
        .get_document(id)
        .await?
        .ok_or(RelinkError::NotFound(id))?;
    tracing::info!(id, title = %doc.title, "processing single document");
    on_start(&doc);
    repair_document(store, resolver, ctx, doc).await
}
