//! Body-text pass over every in-scope document.

use std::collections::HashMap;

use super::{evaluate_link, LinkOutcome, PassSummary, RepairContext};
use crate::error::Result;
use crate::filename::LinkMatch;
use crate::model::{Document, DocumentFilter, DocumentId};
use crate::store::{AttachmentResolver, ContentStore};

/// Result of repairing one document body.
#[derive(Debug, Clone)]
pub struct DocumentReport {
    pub id: DocumentId,
    /// Title, or `ID <n>` for untitled documents.
    pub label: String,
    /// One entry per distinct matched link, in order of first appearance.
    pub outcomes: Vec<LinkOutcome>,
    /// Body after substitutions (equal to the stored body if nothing changed).
    pub body: String,
    pub changed: bool,
    /// False for unchanged documents and in dry runs.
    pub persisted: bool,
}

/// Repair one document: every distinct link is resolved once and all of its
/// occurrences are substituted; the body is written back with a single update
/// if anything changed. The backend gate always applies here.
///
/// Only links whose own outcome is fixed are rewritten, even when another
/// link in the body starts with the same text.
pub async fn repair_document<S, R>(
    store: &S,
    resolver: &R,
    ctx: &RepairContext,
    doc: Document,
) -> Result<DocumentReport>
where
    S: ContentStore + ?Sized,
    R: AttachmentResolver + ?Sized,
{
    let label = doc.display_label();
    let mut outcomes = Vec::new();
    let mut fixes = HashMap::new();

    for link in ctx.pattern.scan(&doc.body) {
        let Some(link) = LinkMatch::from_link(&link) else {
            tracing::debug!(%link, "matched link has no filename");
            continue;
        };
        let outcome = evaluate_link(resolver, Some(&ctx.gate), link).await?;
        if let LinkOutcome::Fixed { link, url, .. } = &outcome {
            fixes.insert(link.link.clone(), url.clone());
        }
        outcomes.push(outcome);
    }

    let body = ctx.pattern.replace_links(&doc.body, &fixes);
    let changed = body != doc.body;
    let persisted = changed && !ctx.dry_run;
    if persisted {
        store.update_document_body(doc.id, &body).await?;
        tracing::info!(id = doc.id, %label, "fixed document content");
    }

    Ok(DocumentReport {
        id: doc.id,
        label,
        outcomes,
        body,
        changed,
        persisted,
    })
}

/// Body pass over every document accepted by `filter`.
///
/// `on_report` sees each document's report as soon as it is done.
pub async fn repair_documents<S, R, F>(
    store: &S,
    resolver: &R,
    ctx: &RepairContext,
    filter: &DocumentFilter,
    mut on_report: F,
) -> Result<PassSummary>
where
    S: ContentStore + ?Sized,
    R: AttachmentResolver + ?Sized,
    F: FnMut(&DocumentReport),
{
    let docs = store.list_documents(filter).await?;
    tracing::info!(count = docs.len(), domain = ctx.pattern.domain(), "scanning documents");

    let mut summary = PassSummary::default();
    for doc in docs {
        let report = repair_document(store, resolver, ctx, doc).await?;
        summary.scanned += 1;
        if report.changed {
            summary.changed += 1;
        }
        report.outcomes.iter().for_each(|o| summary.record(o));
        on_report(&report);
    }
    Ok(summary)
}
