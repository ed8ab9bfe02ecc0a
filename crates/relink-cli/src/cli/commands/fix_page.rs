//! `relink fix-page <id>` – spot-fix one document with a per-link report.

use anyhow::Result;
use relink_core::config::RelinkConfig;
use relink_core::repair::{repair_single_document, LinkOutcome};

use super::site::{open_site, SiteArgs};

fn outcome_line(outcome: &LinkOutcome) -> String {
    match outcome {
        LinkOutcome::Fixed {
            link, attachment_id, ..
        } => format!("✓ Fixed: {} (ID: {})", link.filename, attachment_id),
        LinkOutcome::Rejected {
            link,
            attachment_id,
            url: Some(url),
        } => format!(
            "Found ID {} for {}, but resolved URL was not applied: {}",
            attachment_id, link.filename, url
        ),
        LinkOutcome::Rejected {
            link,
            attachment_id,
            url: None,
        } => format!(
            "Found ID {} for {}, but no offloaded URL returned.",
            attachment_id, link.filename
        ),
        LinkOutcome::Unresolved { link } => {
            format!("✗ Still could not find ID for filename: {}", link.filename)
        }
    }
}

pub async fn run_fix_page(cfg: &RelinkConfig, args: &SiteArgs, id: u64) -> Result<()> {
    let (db, ctx) = open_site(cfg, args).await?;
    let report = repair_single_document(&db, &db, &ctx, id, |doc| {
        println!("Processing page: {}", doc.display_label())
    })
    .await?;

    for outcome in &report.outcomes {
        println!("{}", outcome_line(outcome));
    }

    match (report.changed, report.persisted) {
        (true, true) => println!("DONE: Page updated. Refresh your editor."),
        (true, false) => println!("DONE (dry run): page would be updated."),
        _ => println!("No changes were made."),
    }
    Ok(())
}
