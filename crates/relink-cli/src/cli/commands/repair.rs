//! `relink repair` – bulk pass over document bodies, then metadata values.

use anyhow::Result;
use relink_core::config::RelinkConfig;
use relink_core::repair::{repair_documents, repair_metadata, DocumentReport, MetadataReport};

use super::site::{open_site, SiteArgs};

/// Which passes to run.
#[derive(Debug, Clone, Copy)]
pub struct RepairPasses {
    pub content: bool,
    pub meta: bool,
}

fn content_line(report: &DocumentReport) -> Option<String> {
    match (report.changed, report.persisted) {
        (true, true) => Some(format!("✓ Fixed Content: {}", report.label)),
        (true, false) => Some(format!("~ Would fix Content: {}", report.label)),
        _ => None,
    }
}

fn meta_line(report: &MetadataReport) -> Option<String> {
    if report.malformed {
        return Some(format!(
            "! Skipped Meta ID: {} (malformed serialized value)",
            report.id
        ));
    }
    match (report.changed, report.persisted) {
        (true, true) => Some(format!("✓ Fixed Meta ID: {}", report.id)),
        (true, false) => Some(format!("~ Would fix Meta ID: {}", report.id)),
        _ => None,
    }
}

pub async fn run_repair(cfg: &RelinkConfig, args: &SiteArgs, passes: RepairPasses) -> Result<()> {
    let (db, ctx) = open_site(cfg, args).await?;
    let domain = ctx.pattern.domain().to_string();
    println!("Starting repair for: {domain}");
    if ctx.dry_run {
        println!("Dry run: nothing will be written.");
    }

    if passes.content {
        println!("Phase 1: Scanning content items...");
        let summary = repair_documents(&db, &db, &ctx, &cfg.document_filter(), |report| {
            if let Some(line) = content_line(report) {
                println!("{line}");
            }
        })
        .await?;
        println!(
            "Phase 1: {} item(s) scanned, {} changed ({} link(s) fixed, {} not applied, {} unresolved).",
            summary.scanned, summary.changed, summary.fixed, summary.rejected, summary.unresolved
        );
    }

    if passes.meta {
        println!("\nPhase 2: Scanning PostMeta for hidden links...");
        let summary = repair_metadata(&db, &db, &ctx, |report| {
            if let Some(line) = meta_line(report) {
                println!("{line}");
            }
        })
        .await?;
        println!(
            "Phase 2: {} value(s) scanned, {} changed.",
            summary.scanned, summary.changed
        );
    }

    println!("Repair for {domain} Complete!");
    Ok(())
}
