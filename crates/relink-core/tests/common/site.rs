//! Fixture: an in-memory site with a migrated domain and offloaded media.

use relink_core::gate::BackendGate;
use relink_core::model::{Document, MetadataEntry};
use relink_core::repair::RepairContext;
use relink_core::scan::LinkPattern;
use relink_core::store::memory::{MemoryStore, StoredAttachment};

pub const OLD: &str = "https://old.example.com/wp-content/uploads";
pub const BUCKET: &str = "https://bucket.s3.amazonaws.com";

pub fn context() -> RepairContext {
    let pattern = LinkPattern::new("old.example.com", "wp-content/uploads").unwrap();
    RepairContext::new(pattern, BackendGate::new("amazonaws.com"))
}

pub fn document(id: u64, title: &str, body: &str) -> Document {
    Document {
        id,
        title: title.to_string(),
        body: body.to_string(),
        status: "publish".to_string(),
        kind: "page".to_string(),
    }
}

pub fn meta(id: u64, document_id: u64, value: &str) -> MetadataEntry {
    MetadataEntry {
        id,
        document_id,
        value: value.to_string(),
    }
}

/// Attachment stored at `file` with a URL of `url` (or none).
pub fn attachment(id: u64, file: &str, url: Option<&str>) -> StoredAttachment {
    StoredAttachment {
        id,
        attached_file: file.to_string(),
        created_at: id as i64,
        url: url.map(str::to_string),
    }
}

/// Store with `pic.jpg` offloaded to the bucket and `local.png` still local.
pub fn store() -> MemoryStore {
    let store = MemoryStore::new();
    store.insert_attachment(attachment(
        100,
        "2024/pic.jpg",
        Some(format!("{BUCKET}/2024/pic.jpg").as_str()),
    ));
    store.insert_attachment(attachment(
        101,
        "2024/local.png",
        Some(format!("{OLD}/2024/local.png").as_str()),
    ));
    store
}
