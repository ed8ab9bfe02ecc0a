//! WordPress database adapter (MySQL via sqlx).
//!
//! Reads posts and postmeta of one site, resolves attachments through
//! `_wp_attached_file` and the media offload item table.

mod attachments;
mod read;
mod site;
mod write;


pub use site::host_of;

use sqlx::mysql::{MySqlPool, MySqlPoolOptions};

use crate::config::{OffloadConfig, RelinkConfig};
use crate::error::{RelinkError, Result};

/// Meta key holding an attachment's path relative to the uploads dir.
pub(crate) const ATTACHED_FILE_KEY: &str = "_wp_attached_file";
/// Postmeta key older offload plugin versions kept the object location in.
pub(crate) const LEGACY_OFFLOAD_KEY: &str = "amazonS3_info";

/// Table names for one site. Identifiers cannot be bound as parameters,
/// so the prefix is validated before it is ever interpolated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tables {
    base_prefix: String,
    blog_id: i64,
}

impl Tables {
    pub fn new(base_prefix: &str) -> Result<Self> {
        let valid = base_prefix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid {
            return Err(RelinkError::InvalidTablePrefix(base_prefix.to_string()));
        }
        Ok(Self {
            base_prefix: base_prefix.to_string(),
            blog_id: 1,
        })
    }

    /// Tables of network site `blog_id`. The main site (1) keeps the base prefix.
    pub fn for_blog(&self, blog_id: i64) -> Self {
        Self {
            base_prefix: self.base_prefix.clone(),
            blog_id,
        }
    }

    pub fn blog_id(&self) -> i64 {
        self.blog_id
    }

    pub fn prefix(&self) -> String {
        if self.blog_id <= 1 {
            self.base_prefix.clone()
        } else {
            format!("{}{}_", self.base_prefix, self.blog_id)
        }
    }

    pub fn posts(&self) -> String {
        format!("{}posts", self.prefix())
    }

    pub fn postmeta(&self) -> String {
        format!("{}postmeta", self.prefix())
    }

    pub fn options(&self) -> String {
        format!("{}options", self.prefix())
    }

    pub fn offload_items(&self) -> String {
        format!("{}as3cf_items", self.prefix())
    }

    /// Network-wide table; always uses the base prefix.
    pub fn blogs(&self) -> String {
        format!("{}blogs", self.base_prefix)
    }
}

/// Handle to a WordPress database, scoped to one site.
#[derive(Clone)]
pub struct WpDatabase {
    pub(crate) pool: MySqlPool,
    pub(crate) tables: Tables,
    /// `<site url>/<uploads path>`, known once the site is resolved.
    pub(crate) uploads_base: Option<String>,
    pub(crate) offload: Option<OffloadConfig>,
}

impl WpDatabase {
    /// Connect using `cfg.database_url` and `cfg.table_prefix`.
    ///
    /// The handle starts on the main site; call `resolve_site` before
    /// running a pass.
    pub async fn connect(cfg: &RelinkConfig) -> Result<Self> {
        let tables = Tables::new(&cfg.table_prefix)?;
        let pool = MySqlPoolOptions::new()
            .max_connections(cfg.max_connections.max(1))
            .connect(&cfg.database_url)
            .await?;
        tracing::debug!(prefix = %tables.prefix(), "connected to WordPress database");
        Ok(Self {
            pool,
            tables,
            uploads_base: None,
            offload: cfg.offload.clone(),
        })
    }

    pub fn tables(&self) -> &Tables {
        &self.tables
    }
}

/// True for "table doesn't exist" (SQLSTATE 42S02) and "unknown column"
/// (42S22): the schema predates what the query expects.
pub(crate) fn is_missing_schema(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => matches!(db.code().as_deref(), Some("42S02" | "42S22")),
        _ => false,
    }
}
