//! Site context: which tables and which domain a run works on.

use sqlx::Row;

use super::WpDatabase;
use crate::error::{RelinkError, Result};
use crate::model::SiteContext;

/// Host part of `url` as written: no case folding and no punycode, so it
/// matches the links stored in content. Bare hosts (`2027.example.org`) are
/// accepted too.
pub fn host_of(url: &str) -> Result<String> {
    let invalid = || RelinkError::InvalidSiteUrl(url.to_string());
    let candidate = if url.contains("://") {
        url.to_string()
    } else {
        format!("https://{url}")
    };
    let parsed = url::Url::parse(&candidate).map_err(|_| invalid())?;
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(invalid());
    }

    let authority = candidate
        .split_once("://")
        .map_or(candidate.as_str(), |(_, rest)| rest)
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, h)| h);
    let host = match host_port.split_once(']') {
        Some((v6, _)) if v6.starts_with('[') => &host_port[..=v6.len()],
        _ => host_port.split(':').next().unwrap_or_default(),
    };
    if host.is_empty() {
        return Err(invalid());
    }
    Ok(host.to_string())
}

/// Uploads base URL of a site; network sites below the main one keep their
/// files in `sites/<id>/`.
pub(crate) fn uploads_base(site_url: &str, uploads_path: &str, blog_id: i64) -> String {
    let base = format!(
        "{}/{}",
        site_url.trim_end_matches('/'),
        uploads_path.trim_matches('/')
    );
    if blog_id > 1 {
        format!("{base}/sites/{blog_id}")
    } else {
        base
    }
}

impl WpDatabase {
    /// Scope this handle to the site addressed by `url` and return its context.
    ///
    /// With `multisite`, `url` is looked up in the network's blogs table;
    /// otherwise the configured prefix is used as is. The domain of the
    /// returned context is the host of the site's `siteurl` option.
    pub async fn resolve_site(
        &mut self,
        url: Option<&str>,
        multisite: bool,
        uploads_path: &str,
    ) -> Result<SiteContext> {
        if let (true, Some(url)) = (multisite, url) {
            let host = host_of(url)?;
            let blog_id = self
                .blog_id_for(&host)
                .await?
                .ok_or_else(|| RelinkError::SiteNotFound(host.clone()))?;
            tracing::debug!(%host, blog_id, "resolved network site");
            self.tables = self.tables.for_blog(blog_id);
        }

        let options = self.tables.options();
        let site_url = self
            .option("siteurl")
            .await?
            .filter(|v| !v.is_empty())
            .ok_or(RelinkError::MissingSiteUrl(options))?;
        let domain = host_of(&site_url)?;
        self.uploads_base = Some(uploads_base(&site_url, uploads_path, self.tables.blog_id()));

        Ok(SiteContext {
            site_url,
            domain,
            table_prefix: self.tables.prefix(),
        })
    }

    async fn blog_id_for(&self, host: &str) -> Result<Option<i64>> {
        let sql = format!(
            "SELECT blog_id FROM {} WHERE domain = ? ORDER BY blog_id LIMIT 1",
            self.tables.blogs()
        );
        let row = sqlx::query(&sql)
            .bind(host)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.try_get::<i64, _>("blog_id")).transpose()?)
    }

    async fn option(&self, name: &str) -> Result<Option<String>> {
        let sql = format!(
            "SELECT option_value FROM {} WHERE option_name = ? LIMIT 1",
            self.tables.options()
        );
        let row = sqlx::query(&sql)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row
            .map(|r| r.try_get::<String, _>("option_value"))
            .transpose()?)
    }
}
