//! Attachment lookup and URL resolution, plus the store trait impls.

use async_trait::async_trait;
use sqlx::Row;

use super::{is_missing_schema, WpDatabase, ATTACHED_FILE_KEY, LEGACY_OFFLOAD_KEY};
use crate::error::Result;
use crate::model::{AttachmentId, Document, DocumentFilter, DocumentId, MetaId, MetadataEntry};
use crate::offload::{legacy_location, object_url, ObjectLocation};
use crate::store::{like, AttachmentResolver, ContentStore};

impl WpDatabase {
    /// Where the offload integration put the attachment: its items table
    /// first, then the postmeta older plugin versions wrote.
    async fn offloaded_object(&self, id: AttachmentId) -> Result<Option<ObjectLocation>> {
        if let Some(location) = self.offload_item(id).await? {
            return Ok(Some(location));
        }
        self.legacy_offload_info(id).await
    }

    /// Newest row of the items table for the attachment.
    async fn offload_item(&self, id: AttachmentId) -> Result<Option<ObjectLocation>> {
        let sql = format!(
            "SELECT provider, region, bucket, path FROM {} \
             WHERE source_type = 'media-library' AND source_id = ? \
             ORDER BY id DESC LIMIT 1",
            self.tables.offload_items()
        );
        let row = match sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await {
            Ok(row) => row,
            Err(e) if is_missing_schema(&e) => {
                tracing::debug!(table = %self.tables.offload_items(), error = %e, "offload table unusable");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(ObjectLocation {
            provider: row.try_get("provider")?,
            region: row
                .try_get::<Option<String>, _>("region")?
                .unwrap_or_default(),
            bucket: row.try_get("bucket")?,
            key: row.try_get("path")?,
        }))
    }

    async fn legacy_offload_info(&self, id: AttachmentId) -> Result<Option<ObjectLocation>> {
        let Some(info) = self.meta_value(id, LEGACY_OFFLOAD_KEY).await? else {
            return Ok(None);
        };
        let location = legacy_location(&info);
        if location.is_none() {
            tracing::debug!(id, "legacy offload info without bucket or key");
        }
        Ok(location)
    }

    async fn attached_file(&self, id: AttachmentId) -> Result<Option<String>> {
        self.meta_value(id, ATTACHED_FILE_KEY).await
    }

    async fn meta_value(&self, id: AttachmentId, key: &str) -> Result<Option<String>> {
        let sql = format!(
            "SELECT meta_value FROM {} WHERE post_id = ? AND meta_key = ? \
             ORDER BY meta_id DESC LIMIT 1",
            self.tables.postmeta()
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row
            .map(|r| r.try_get::<Option<String>, _>("meta_value"))
            .transpose()?
            .flatten())
    }
}

#[async_trait]
impl AttachmentResolver for WpDatabase {
    async fn find_attachment(&self, filename: &str) -> Result<Option<AttachmentId>> {
        let sql = format!(
            "SELECT pm.post_id FROM {postmeta} pm \
             JOIN {posts} p ON p.ID = pm.post_id \
             WHERE pm.meta_key = ? AND pm.meta_value LIKE ? ESCAPE '!' \
             ORDER BY p.post_date DESC, pm.post_id DESC LIMIT 1",
            postmeta = self.tables.postmeta(),
            posts = self.tables.posts()
        );
        let row = sqlx::query(&sql)
            .bind(ATTACHED_FILE_KEY)
            .bind(like::suffix(filename))
            .fetch_optional(&self.pool)
            .await?;
        Ok(row
            .map(|r| r.try_get::<AttachmentId, _>("post_id"))
            .transpose()?)
    }

    /// Offloaded URL when the integration knows the object; otherwise the
    /// local uploads URL, which the replacement gate will refuse.
    async fn attachment_url(&self, id: AttachmentId) -> Result<Option<String>> {
        if let Some(location) = self.offloaded_object(id).await? {
            if let Some(url) = object_url(&location, self.offload.as_ref()) {
                return Ok(Some(url));
            }
        }
        let Some(file) = self.attached_file(id).await? else {
            return Ok(None);
        };
        Ok(self
            .uploads_base
            .as_ref()
            .map(|base| format!("{}/{}", base, file.trim_start_matches('/'))))
    }
}

#[async_trait]
impl ContentStore for WpDatabase {
    async fn list_documents(&self, filter: &DocumentFilter) -> Result<Vec<Document>> {
        self.fetch_documents(filter).await
    }

    async fn get_document(&self, id: DocumentId) -> Result<Option<Document>> {
        self.fetch_document(id).await
    }

    async fn update_document_body(&self, id: DocumentId, body: &str) -> Result<()> {
        self.store_document_body(id, body).await
    }

    async fn list_metadata_containing(&self, fragment: &str) -> Result<Vec<MetadataEntry>> {
        self.fetch_metadata_containing(fragment).await
    }

    async fn update_metadata_value(&self, id: MetaId, value: &str) -> Result<()> {
        self.store_metadata_value(id, value).await
    }
}
