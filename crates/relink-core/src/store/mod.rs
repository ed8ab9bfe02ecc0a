//! Content store and attachment resolver contracts.
//!
//! The repair passes only see these traits. `wp::WpDatabase` talks to a
//! WordPress MySQL schema; `memory::MemoryStore` keeps everything in process.

pub mod like;
pub mod memory;
pub mod wp;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{AttachmentId, Document, DocumentFilter, DocumentId, MetaId, MetadataEntry};

/// Read/update access to documents and their metadata.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Every document accepted by `filter`, ordered by identifier.
    async fn list_documents(&self, filter: &DocumentFilter) -> Result<Vec<Document>>;

    async fn get_document(&self, id: DocumentId) -> Result<Option<Document>>;

    async fn update_document_body(&self, id: DocumentId, body: &str) -> Result<()>;

    /// Metadata rows whose value contains `fragment` literally, ordered by identifier.
    async fn list_metadata_containing(&self, fragment: &str) -> Result<Vec<MetadataEntry>>;

    async fn update_metadata_value(&self, id: MetaId, value: &str) -> Result<()>;
}

/// Maps stored files to attachments and attachments to public URLs.
#[async_trait]
pub trait AttachmentResolver: Send + Sync {
    /// Attachment whose stored original path ends with `filename`.
    ///
    /// When several match, the most recently created one wins, then the
    /// highest identifier.
    async fn find_attachment(&self, filename: &str) -> Result<Option<AttachmentId>>;

    /// Current public URL of the attachment, or `None` if the record is gone.
    async fn attachment_url(&self, id: AttachmentId) -> Result<Option<String>>;
}
