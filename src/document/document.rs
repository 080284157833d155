use std::collections::BTreeSet;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use super::schema::{Properties, Schema};
use crate::config::MapperConfig;
use crate::store::{DeleteResponse, Store, StoreError, StoredDocument};
use crate::types::identifiers::{DocumentId, Revision};

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("No such property '{name}' on document type '{doc_type}'")]
    NoSuchProperty { doc_type: String, name: String },
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Revision conflict on document {id}: local revision is stale")]
    Conflict { id: DocumentId },
    #[error("Error (404) in request: not_found ({reason}).")]
    NotFound { reason: String },
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Illegal state: {0}")]
    IllegalState(String),
    #[error("Unknown document type: {0}")]
    UnknownType(String),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<StoreError> for DocumentError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { reason } => DocumentError::NotFound { reason },
            StoreError::Conflict { id } => DocumentError::Conflict { id },
            StoreError::Transport(msg) => DocumentError::Transport(msg),
            StoreError::Serialization(e) => DocumentError::Serialization(e),
        }
    }
}

/// Outcome of [`Document::save`]. `ok` is false when there was nothing to
/// persist and no write was issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Saved {
    pub id: DocumentId,
    pub ok: bool,
}

/// Local, typed view of one remote document.
///
/// A document is owned by a single caller for a read-modify-save cycle and
/// does no internal locking.
pub struct Document {
    schema: Arc<Schema>,
    store: Arc<dyn Store>,
    config: MapperConfig,
    id: Option<DocumentId>,
    revision: Option<Revision>,
    properties: Properties,
    dirty: BTreeSet<String>,
    revisions: Option<Vec<Properties>>,
    deleted: bool,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("type", &self.schema.doc_type())
            .field("id", &self.id)
            .field("revision", &self.revision)
            .field("properties", &self.properties)
            .field("dirty", &self.dirty)
            .field("deleted", &self.deleted)
            .finish_non_exhaustive()
    }
}

impl Document {
    /// A fresh, unpersisted document with every property at its default.
    pub fn create_new(schema: Arc<Schema>, store: Arc<dyn Store>, config: MapperConfig) -> Self {
        let properties = schema.defaults();
        Document {
            schema,
            store,
            config,
            id: None,
            revision: None,
            properties,
            dirty: BTreeSet::new(),
            revisions: None,
            deleted: false,
        }
    }

    /// Build a clean document from a store payload.
    pub fn hydrate(
        schema: Arc<Schema>,
        store: Arc<dyn Store>,
        config: MapperConfig,
        stored: StoredDocument,
    ) -> Result<Self, DocumentError> {
        if stored.doc_type != schema.doc_type() {
            return Err(DocumentError::NotFound {
                reason: format!(
                    "document {} is of type '{}', not '{}'",
                    stored.id,
                    stored.doc_type,
                    schema.doc_type()
                ),
            });
        }

        let (properties, dropped) = schema.project(stored.properties);
        if !dropped.is_empty() {
            log::warn!(
                "ignoring undeclared properties {dropped:?} on {} document {}",
                schema.doc_type(),
                stored.id
            );
        }
        log::trace!("hydrated {} at {}", stored.id, stored.revision);

        Ok(Document {
            schema,
            store,
            config,
            id: Some(stored.id),
            revision: Some(stored.revision),
            properties,
            dirty: BTreeSet::new(),
            revisions: None,
            deleted: false,
        })
    }

    pub fn doc_type(&self) -> &str {
        self.schema.doc_type()
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn id(&self) -> Option<&DocumentId> {
        self.id.as_ref()
    }

    pub fn revision(&self) -> Option<&Revision> {
        self.revision.as_ref()
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn is_new(&self) -> bool {
        self.revision.is_none()
    }

    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    pub fn dirty_properties(&self) -> impl Iterator<Item = &str> {
        self.dirty.iter().map(String::as_str)
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    pub fn get(&self, name: &str) -> Result<&Value, DocumentError> {
        self.schema.get(&self.properties, name)
    }

    /// Set a declared property. Setting a value equal to the current one is
    /// not a mutation and does not mark the property dirty.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), DocumentError> {
        self.ensure_live("set a property on")?;
        if self.schema.set(&mut self.properties, name, value.into())? {
            self.dirty.insert(name.to_string());
        }
        Ok(())
    }

    pub fn has(&self, name: &str) -> bool {
        self.schema.has(&self.properties, name)
    }

    /// Pin the storage key before the first save. Takes precedence over ids
    /// derived from the schema's id key and over store assignment.
    pub fn set_id(&mut self, id: DocumentId) -> Result<(), DocumentError> {
        self.ensure_live("assign an id to")?;
        if self.revision.is_some() {
            return Err(DocumentError::IllegalState(
                "cannot change the id of a persisted document".into(),
            ));
        }
        if id.is_empty() {
            return Err(DocumentError::InvalidArgument("document id must not be empty".into()));
        }
        self.id = Some(id);
        Ok(())
    }

    /// Persist local changes.
    ///
    /// On any failure the document is left exactly as it was, dirty set
    /// included, so the caller may retry or re-fetch.
    pub fn save(&mut self) -> Result<Saved, DocumentError> {
        self.ensure_live("save")?;
        self.schema.check_required(&self.properties)?;

        if let (Some(id), Some(_)) = (&self.id, &self.revision) {
            if self.dirty.is_empty() {
                log::debug!("{id} unchanged, skipping write");
                return Ok(Saved {
                    id: id.clone(),
                    ok: false,
                });
            }
        }

        let target = self.target_id();
        let receipt = match self.store.write(
            self.schema.doc_type(),
            target.as_ref(),
            &self.properties,
            self.revision.as_ref(),
        ) {
            Ok(receipt) => receipt,
            Err(err) => {
                log::debug!("save of {:?} failed: {err}", target);
                return Err(err.into());
            }
        };

        log::debug!("saved {} at {}", receipt.id, receipt.revision);
        self.id = Some(receipt.id.clone());
        self.revision = Some(receipt.revision);
        self.dirty.clear();

        Ok(Saved {
            id: receipt.id,
            ok: true,
        })
    }

    /// Delete the document at its known revision. The document is terminal
    /// afterwards.
    pub fn delete(&mut self) -> Result<DeleteResponse, DocumentError> {
        self.ensure_live("delete")?;
        let (Some(id), Some(revision)) = (&self.id, &self.revision) else {
            return Err(DocumentError::IllegalState(
                "cannot delete a document without id and revision".into(),
            ));
        };

        let response = self.store.delete(self.schema.doc_type(), id, revision)?;
        log::debug!("deleted {id} at {revision}");
        self.deleted = true;
        Ok(response)
    }

    /// Historical property snapshots, oldest first.
    ///
    /// Fetched from the store on first access and cached for the lifetime of
    /// this document. Unsaved documents have no history.
    pub fn revisions(&mut self) -> Result<&[Properties], DocumentError> {
        if self.revisions.is_none() {
            let Some(id) = &self.id else {
                return Ok(&[][..]);
            };
            if self.revision.is_none() {
                return Ok(&[][..]);
            }

            let log = self.store.read_revision_log(self.schema.doc_type(), id)?;
            log::trace!("fetched {} revisions of {id}", log.len());
            let schema = &self.schema;
            let snapshots = log
                .into_iter()
                .map(|entry| schema.project(entry.properties).0)
                .collect();
            self.revisions = Some(snapshots);
        }
        Ok(self.revisions.as_deref().unwrap_or_default())
    }

    fn target_id(&self) -> Option<DocumentId> {
        if let Some(id) = &self.id {
            return Some(id.clone());
        }

        let key = self.schema.id_key()?;
        let value = match self.properties.get(key)? {
            Value::Null => return None,
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        Some(DocumentId::from_key(
            self.schema.doc_type(),
            &value,
            &self.config.type_separator,
            &self.config.id_separator,
        ))
    }

    fn ensure_live(&self, action: &str) -> Result<(), DocumentError> {
        if self.deleted {
            return Err(DocumentError::IllegalState(format!(
                "cannot {action} a deleted document"
            )));
        }
        Ok(())
    }
}
