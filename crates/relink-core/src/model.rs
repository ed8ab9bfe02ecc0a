//! Rows read from the content store.

/// Document (post) identifier.
pub type DocumentId = u64;

/// Metadata row identifier.
pub type MetaId = u64;

/// Attachment identifier. Attachments are documents too, so this shares
/// the document id space.
pub type AttachmentId = u64;

/// A document whose body may carry hardcoded upload links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: DocumentId,
    pub title: String,
    pub body: String,
    pub status: String,
    pub kind: String,
}

impl Document {
    /// Title for progress lines, or `ID <n>` when the title is empty.
    pub fn display_label(&self) -> String {
        if self.title.is_empty() {
            format!("ID {}", self.id)
        } else {
            self.title.clone()
        }
    }
}

/// One metadata value attached to a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataEntry {
    pub id: MetaId,
    pub document_id: DocumentId,
    pub value: String,
}

/// Which documents the body pass visits.
#[derive(Debug, Clone, Default)]
pub struct DocumentFilter {
    /// Document types to include. Empty means every type.
    pub kinds: Vec<String>,
    /// Statuses to leave out (e.g. `trash`).
    pub excluded_statuses: Vec<String>,
}

impl DocumentFilter {
    pub fn matches(&self, doc: &Document) -> bool {
        (self.kinds.is_empty() || self.kinds.iter().any(|k| *k == doc.kind))
            && !self.excluded_statuses.iter().any(|s| *s == doc.status)
    }
}

/// The site a run is scoped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteContext {
    /// Site URL as stored by the platform, e.g. `https://2027.example.org`.
    pub site_url: String,
    /// Host of the site URL; the default scan domain.
    pub domain: String,
    /// Table prefix of this site (`wp_`, `wp_3_`, ...).
    pub table_prefix: String,
}
