//! Document and metadata reads.

use sqlx::mysql::MySqlRow;
use sqlx::{MySql, QueryBuilder, Row};

use super::WpDatabase;
use crate::error::Result;
use crate::model::{Document, DocumentFilter, DocumentId, MetadataEntry};
use crate::store::like;

const DOCUMENT_COLUMNS: &str = "ID, post_title, post_content, post_status, post_type";

fn document_from_row(row: &MySqlRow) -> Result<Document> {
    Ok(Document {
        id: row.try_get("ID")?,
        title: row.try_get("post_title")?,
        body: row.try_get("post_content")?,
        status: row.try_get("post_status")?,
        kind: row.try_get("post_type")?,
    })
}

/// `SELECT` for documents accepted by `filter`, with every value bound.
pub(crate) fn documents_query<'a>(posts: &str, filter: &'a DocumentFilter) -> QueryBuilder<'a, MySql> {
    let mut qb = QueryBuilder::new(format!(
        "SELECT {DOCUMENT_COLUMNS} FROM {posts} WHERE 1 = 1"
    ));
    if !filter.kinds.is_empty() {
        qb.push(" AND post_type IN (");
        let mut kinds = qb.separated(", ");
        for kind in &filter.kinds {
            kinds.push_bind(kind.as_str());
        }
        kinds.push_unseparated(")");
    }
    if !filter.excluded_statuses.is_empty() {
        qb.push(" AND post_status NOT IN (");
        let mut statuses = qb.separated(", ");
        for status in &filter.excluded_statuses {
            statuses.push_bind(status.as_str());
        }
        statuses.push_unseparated(")");
    }
    qb.push(" ORDER BY ID");
    qb
}

impl WpDatabase {
    pub(crate) async fn fetch_documents(&self, filter: &DocumentFilter) -> Result<Vec<Document>> {
        let mut qb = documents_query(&self.tables.posts(), filter);
        let rows = qb.build().fetch_all(&self.pool).await?;
        rows.iter().map(document_from_row).collect()
    }

    pub(crate) async fn fetch_document(&self, id: DocumentId) -> Result<Option<Document>> {
        let sql = format!(
            "SELECT {DOCUMENT_COLUMNS} FROM {} WHERE ID = ?",
            self.tables.posts()
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(document_from_row).transpose()
    }

    pub(crate) async fn fetch_metadata_containing(&self, fragment: &str) -> Result<Vec<MetadataEntry>> {
        let sql = format!(
            "SELECT meta_id, post_id, meta_value FROM {} \
             WHERE meta_value LIKE ? ESCAPE '!' ORDER BY meta_id",
            self.tables.postmeta()
        );
        let rows = sqlx::query(&sql)
            .bind(like::contains(fragment))
            .fetch_all(&self.pool)
            .await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let value: Option<String> = row.try_get("meta_value")?;
            out.push(MetadataEntry {
                id: row.try_get("meta_id")?,
                document_id: row.try_get("post_id")?,
                value: value.unwrap_or_default(),
            });
        }
        Ok(out)
    }
}
