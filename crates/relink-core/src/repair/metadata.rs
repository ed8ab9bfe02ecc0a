//! Metadata pass: first matched link per value.

use std::collections::HashMap;

use super::{evaluate_link, LinkOutcome, PassSummary, RepairContext};
use crate::error::Result;
use crate::filename::LinkMatch;
use crate::model::{DocumentId, MetaId, MetadataEntry};
use crate::serialized::{looks_serialized, replace_serialized};
use crate::store::{AttachmentResolver, ContentStore};

/// Result of repairing one metadata row.
#[derive(Debug, Clone)]
pub struct MetadataReport {
    pub id: MetaId,
    pub document_id: DocumentId,
    /// Outcome for the first matched link; later links in the value are not
    /// looked at.
    pub outcome: LinkOutcome,
    pub value: String,
    pub changed: bool,
    pub persisted: bool,
    /// The value looked serialized but could not be rewritten safely.
    pub malformed: bool,
}

/// Rewrite every whole occurrence of `link` in `entry.value`.
/// `None` = serialized but malformed.
fn substitute(ctx: &RepairContext, entry: &MetadataEntry, link: &str, url: &str) -> Option<String> {
    let fixes = HashMap::from([(link.to_string(), url.to_string())]);
    let rewrite = |text: &str| ctx.pattern.replace_links(text, &fixes);
    if looks_serialized(&entry.value) {
        replace_serialized(&entry.value, rewrite)
    } else {
        Some(rewrite(&entry.value))
    }
}

/// Metadata pass over rows containing `<domain>/<uploads-path>/`.
///
/// The backend gate is only applied when `ctx.gate_metadata` is set; by
/// default any non-empty resolved URL is written. `on_report` is called for
/// each row that contained a matching link.
pub async fn repair_metadata<S, R, F>(
    store: &S,
    resolver: &R,
    ctx: &RepairContext,
    mut on_report: F,
) -> Result<PassSummary>
where
    S: ContentStore + ?Sized,
    R: AttachmentResolver + ?Sized,
    F: FnMut(&MetadataReport),
{
    let entries = store
        .list_metadata_containing(&ctx.pattern.fragment())
        .await?;
    tracing::info!(count = entries.len(), "scanning metadata values");

    let gate = ctx.gate_metadata.then_some(&ctx.gate);
    let mut summary = PassSummary::default();

    for entry in entries {
        summary.scanned += 1;
        let Some(link) = ctx
            .pattern
            .first_match(&entry.value)
            .and_then(LinkMatch::from_link)
        else {
            continue;
        };

        let outcome = evaluate_link(resolver, gate, link).await?;
        summary.record(&outcome);

        let mut value = entry.value.clone();
        let mut malformed = false;
        if let LinkOutcome::Fixed { link, url, .. } = &outcome {
            match substitute(ctx, &entry, &link.link, url) {
                Some(v) => value = v,
                None => {
                    malformed = true;
                    tracing::warn!(meta_id = entry.id, "serialized value is malformed; left untouched");
                }
            }
        }

        let changed = value != entry.value;
        let persisted = changed && !ctx.dry_run;
        if changed {
            summary.changed += 1;
        }
        if persisted {
            store.update_metadata_value(entry.id, &value).await?;
            tracing::info!(meta_id = entry.id, "fixed metadata value");
        }

        on_report(&MetadataReport {
            id: entry.id,
            document_id: entry.document_id,
            outcome,
            value,
            changed,
            persisted,
            malformed,
        });
    }
    Ok(summary)
}
