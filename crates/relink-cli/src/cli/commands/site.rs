//! Shared setup: connect, scope to a site, build the repair context.

use anyhow::Result;
use relink_core::config::RelinkConfig;
use relink_core::gate::BackendGate;
use relink_core::model::SiteContext;
use relink_core::repair::RepairContext;
use relink_core::scan::LinkPattern;
use relink_core::store::wp::{host_of, WpDatabase};

/// Site selection flags common to `repair` and `fix-page`.
#[derive(Debug, Clone, Default)]
pub struct SiteArgs {
    pub url: Option<String>,
    pub domain: Option<String>,
    pub dry_run: bool,
}

/// Context for one run. `--domain` wins over the site's own host.
pub fn repair_context(cfg: &RelinkConfig, site: &SiteContext, args: &SiteArgs) -> Result<RepairContext> {
    let domain = match &args.domain {
        Some(d) => host_of(d)?,
        None => site.domain.clone(),
    };
    let pattern = LinkPattern::new(&domain, &cfg.uploads_path)?;
    let mut ctx = RepairContext::new(pattern, BackendGate::new(cfg.backend_marker.clone()));
    ctx.gate_metadata = cfg.gate_metadata;
    ctx.dry_run = args.dry_run;
    Ok(ctx)
}

/// Connect to the database and scope it to the requested site.
pub async fn open_site(cfg: &RelinkConfig, args: &SiteArgs) -> Result<(WpDatabase, RepairContext)> {
    let mut db = WpDatabase::connect(cfg).await?;
    let site = db
        .resolve_site(args.url.as_deref(), cfg.multisite, &cfg.uploads_path)
        .await?;
    tracing::info!(
        site_url = %site.site_url,
        prefix = %site.table_prefix,
        "resolved site"
    );
    let ctx = repair_context(cfg, &site, args)?;
    Ok((db, ctx))
}
