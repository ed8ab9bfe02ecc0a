//! Document and metadata updates.

use super::WpDatabase;
use crate::error::Result;
use crate::model::{DocumentId, MetaId};

impl WpDatabase {
    /// Rewrites `post_content` only; modification dates are left alone.
    pub(crate) async fn store_document_body(&self, id: DocumentId, body: &str) -> Result<()> {
        let sql = format!(
            "UPDATE {} SET post_content = ? WHERE ID = ?",
            self.tables.posts()
        );
        let result = sqlx::query(&sql)
            .bind(body)
            .bind(id)
            .execute(&self.pool)
            .await?;
        tracing::debug!(id, rows = result.rows_affected(), "updated document body");
        Ok(())
    }

    pub(crate) async fn store_metadata_value(&self, id: MetaId, value: &str) -> Result<()> {
        let sql = format!(
            "UPDATE {} SET meta_value = ? WHERE meta_id = ?",
            self.tables.postmeta()
        );
        let result = sqlx::query(&sql)
            .bind(value)
            .bind(id)
            .execute(&self.pool)
            .await?;
        tracing::debug!(id, rows = result.rows_affected(), "updated metadata value");
        Ok(())
    }
}
