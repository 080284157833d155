use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use uuid::Uuid;

use super::{DeleteResponse, RevisionEntry, Store, StoreError, StoredDocument, WriteReceipt};
use crate::document::Properties;
use crate::types::identifiers::{DocumentId, Revision};

#[derive(Debug)]
struct Entry {
    doc_type: String,
    history: Vec<RevisionEntry>,
    /// Revision of the deletion marker, if deleted.
    tombstone: Option<Revision>,
}

impl Entry {
    fn head(&self) -> Option<&RevisionEntry> {
        match self.tombstone {
            Some(_) => None,
            None => self.history.last(),
        }
    }
}

/// Per-operation request counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RequestCounts {
    pub reads: usize,
    pub writes: usize,
    pub deletes: usize,
    pub log_reads: usize,
}

impl RequestCounts {
    pub fn total(&self) -> usize {
        self.reads + self.writes + self.deletes + self.log_reads
    }
}

/// In-process store with full revision history and optimistic concurrency.
///
/// Revisions follow the `<generation>-<hash>` convention; store-assigned
/// ids are lowercase hex.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<DocumentId, Entry>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
    deletes: AtomicUsize,
    log_reads: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests served so far, including failed ones.
    pub fn request_counts(&self) -> RequestCounts {
        RequestCounts {
            reads: self.reads.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            deletes: self.deletes.load(Ordering::Relaxed),
            log_reads: self.log_reads.load(Ordering::Relaxed),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<DocumentId, Entry>>, StoreError> {
        self.entries
            .lock()
            .map_err(|_| StoreError::Transport("memory store lock poisoned".into()))
    }

    fn live<'a>(
        entries: &'a BTreeMap<DocumentId, Entry>,
        doc_type: &str,
        id: &DocumentId,
    ) -> Result<&'a Entry, StoreError> {
        if id.is_empty() {
            return Err(StoreError::not_found("No document ID specified."));
        }
        let entry = entries
            .get(id)
            .ok_or_else(|| StoreError::not_found("missing"))?;
        if entry.tombstone.is_some() {
            return Err(StoreError::not_found("deleted"));
        }
        if entry.doc_type != doc_type {
            return Err(StoreError::not_found(format!(
                "document {id} is of type '{}'",
                entry.doc_type
            )));
        }
        Ok(entry)
    }
}

impl Store for MemoryStore {
    fn read(&self, doc_type: &str, id: &DocumentId) -> Result<StoredDocument, StoreError> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        let entries = self.lock()?;
        let entry = Self::live(&entries, doc_type, id)?;
        let head = entry
            .head()
            .ok_or_else(|| StoreError::not_found("missing"))?;

        Ok(StoredDocument {
            id: id.clone(),
            revision: head.revision.clone(),
            doc_type: entry.doc_type.clone(),
            properties: head.properties.clone(),
        })
    }

    fn write(
        &self,
        doc_type: &str,
        id: Option<&DocumentId>,
        properties: &Properties,
        known_revision: Option<&Revision>,
    ) -> Result<WriteReceipt, StoreError> {
        self.writes.fetch_add(1, Ordering::Relaxed);
        let body = serde_json::to_vec(properties)?;
        let mut entries = self.lock()?;

        let id = match id {
            Some(id) if id.is_empty() => {
                return Err(StoreError::Transport("empty document id".into()))
            }
            Some(id) => id.clone(),
            None => DocumentId::new(Uuid::new_v4().simple().to_string()),
        };

        let current = entries.get(&id).and_then(Entry::head).map(|h| &h.revision);
        let base = match (current, known_revision) {
            (None, None) => entries.get(&id).and_then(|e| e.tombstone.clone()),
            (Some(head), Some(known)) if head == known => Some(head.clone()),
            _ => {
                log::debug!("write conflict on {id}: known {known_revision:?}, current {current:?}");
                return Err(StoreError::Conflict { id });
            }
        };

        let revision = Revision::next(base.as_ref(), &body);
        let record = RevisionEntry {
            revision: revision.clone(),
            properties: properties.clone(),
            written_at: Utc::now(),
        };

        match entries.get_mut(&id) {
            Some(entry) if entry.tombstone.is_none() => {
                if entry.doc_type != doc_type {
                    return Err(StoreError::Conflict { id });
                }
                entry.history.push(record);
            }
            // Fresh document, or re-creation over a deletion marker.
            _ => {
                entries.insert(
                    id.clone(),
                    Entry {
                        doc_type: doc_type.to_string(),
                        history: vec![record],
                        tombstone: None,
                    },
                );
            }
        }

        Ok(WriteReceipt { id, revision })
    }

    fn delete(
        &self,
        doc_type: &str,
        id: &DocumentId,
        revision: &Revision,
    ) -> Result<DeleteResponse, StoreError> {
        self.deletes.fetch_add(1, Ordering::Relaxed);
        let mut entries = self.lock()?;
        Self::live(&entries, doc_type, id)?;

        let entry = entries
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found("missing"))?;
        let head = entry
            .head()
            .map(|h| h.revision.clone())
            .ok_or_else(|| StoreError::not_found("missing"))?;
        if &head != revision {
            return Err(StoreError::Conflict { id: id.clone() });
        }

        let marker = Revision::next(Some(&head), b"deleted");
        entry.tombstone = Some(marker.clone());

        Ok(DeleteResponse {
            ok: true,
            id: id.clone(),
            revision: marker,
        })
    }

    fn read_revision_log(
        &self,
        doc_type: &str,
        id: &DocumentId,
    ) -> Result<Vec<RevisionEntry>, StoreError> {
        self.log_reads.fetch_add(1, Ordering::Relaxed);
        let entries = self.lock()?;
        let entry = Self::live(&entries, doc_type, id)?;
        Ok(entry.history.clone())
    }
}
