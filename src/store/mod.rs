//! The storage collaborator.
//!
//! A [`Store`] performs the actual reads and writes against the document
//! database. Documents only ever talk to the database through this trait,
//! so transports stay outside the core.

pub mod memory;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::document::Properties;
use crate::types::identifiers::{DocumentId, Revision};

pub use memory::{MemoryStore, RequestCounts};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {reason}")]
    NotFound { reason: String },
    #[error("revision conflict on document {id}")]
    Conflict { id: DocumentId },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    pub fn not_found(reason: impl Into<String>) -> Self {
        StoreError::NotFound {
            reason: reason.into(),
        }
    }
}

/// A document as last written to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub id: DocumentId,
    pub revision: Revision,
    #[serde(rename = "type")]
    pub doc_type: String,
    pub properties: Properties,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteReceipt {
    pub id: DocumentId,
    pub revision: Revision,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub ok: bool,
    pub id: DocumentId,
    /// Revision of the deletion marker.
    pub revision: Revision,
}

/// One historical state of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevisionEntry {
    pub revision: Revision,
    pub properties: Properties,
    pub written_at: DateTime<Utc>, // informational only
}

/// Blocking access to a revision-versioned document database.
///
/// Implementations must never retry on their own and must report a stale
/// `known_revision` as [`StoreError::Conflict`].
pub trait Store: Send + Sync {
    fn read(&self, doc_type: &str, id: &DocumentId) -> Result<StoredDocument, StoreError>;

    /// Create (`known_revision == None`) or update a document. Passing no id
    /// asks the store to assign one.
    fn write(
        &self,
        doc_type: &str,
        id: Option<&DocumentId>,
        properties: &Properties,
        known_revision: Option<&Revision>,
    ) -> Result<WriteReceipt, StoreError>;

    fn delete(
        &self,
        doc_type: &str,
        id: &DocumentId,
        revision: &Revision,
    ) -> Result<DeleteResponse, StoreError>;

    /// All stored states of the document, oldest first.
    fn read_revision_log(
        &self,
        doc_type: &str,
        id: &DocumentId,
    ) -> Result<Vec<RevisionEntry>, StoreError>;
}
