//! In-process store with the same matching contract as the database adapter.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use super::{AttachmentResolver, ContentStore};
use crate::error::Result;
use crate::model::{AttachmentId, Document, DocumentFilter, DocumentId, MetaId, MetadataEntry};

/// Attachment as the memory store keeps it.
#[derive(Debug, Clone)]
pub struct StoredAttachment {
    pub id: AttachmentId,
    /// Stored original path relative to the uploads dir, e.g. `2024/05/pic.jpg`.
    pub attached_file: String,
    /// Creation time (Unix seconds); newer wins on ambiguous lookups.
    pub created_at: i64,
    pub url: Option<String>,
}

#[derive(Default)]
struct Tables {
    documents: BTreeMap<DocumentId, Document>,
    metadata: BTreeMap<MetaId, MetadataEntry>,
    attachments: Vec<StoredAttachment>,
}

/// `ContentStore` + `AttachmentResolver` over in-memory maps.
///
/// Counts lookups and writes so callers can check how much work a pass did.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    lookups: AtomicUsize,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn insert_document(&self, doc: Document) {
        self.tables().documents.insert(doc.id, doc);
    }

    pub fn insert_metadata(&self, entry: MetadataEntry) {
        self.tables().metadata.insert(entry.id, entry);
    }

    pub fn insert_attachment(&self, attachment: StoredAttachment) {
        self.tables().attachments.push(attachment);
    }

    pub fn document(&self, id: DocumentId) -> Option<Document> {
        self.tables().documents.get(&id).cloned()
    }

    pub fn metadata(&self, id: MetaId) -> Option<MetadataEntry> {
        self.tables().metadata.get(&id).cloned()
    }

    /// Number of `find_attachment` calls served so far.
    pub fn attachment_lookups(&self) -> usize {
        self.lookups.load(Ordering::Relaxed)
    }

    /// Number of document/metadata updates applied so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn list_documents(&self, filter: &DocumentFilter) -> Result<Vec<Document>> {
        Ok(self
            .tables()
            .documents
            .values()
            .filter(|d| filter.matches(d))
            .cloned()
            .collect())
    }

    async fn get_document(&self, id: DocumentId) -> Result<Option<Document>> {
        Ok(self.document(id))
    }

    async fn update_document_body(&self, id: DocumentId, body: &str) -> Result<()> {
        if let Some(doc) = self.tables().documents.get_mut(&id) {
            doc.body = body.to_string();
            self.writes.fetch_add(1, Ordering::Relaxed);
        }
        Ok(())
    }

    async fn list_metadata_containing(&self, fragment: &str) -> Result<Vec<MetadataEntry>> {
        Ok(self
            .tables()
            .metadata
            .values()
            .filter(|m| m.value.contains(fragment))
            .cloned()
            .collect())
    }

    async fn update_metadata_value(&self, id: MetaId, value: &str) -> Result<()> {
        if let Some(entry) = self.tables().metadata.get_mut(&id) {
            entry.value = value.to_string();
            self.writes.fetch_add(1, Ordering::Relaxed);
        }
        Ok(())
    }
}

#[async_trait]
impl AttachmentResolver for MemoryStore {
    async fn find_attachment(&self, filename: &str) -> Result<Option<AttachmentId>> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        Ok(self
            .tables()
            .attachments
            .iter()
            .filter(|a| a.attached_file.ends_with(filename))
            .max_by_key(|a| (a.created_at, a.id))
            .map(|a| a.id))
    }

    async fn attachment_url(&self, id: AttachmentId) -> Result<Option<String>> {
        Ok(self
            .tables()
            .attachments
            .iter()
            .find(|a| a.id == id)
            .and_then(|a| a.url.clone()))
    }
}
