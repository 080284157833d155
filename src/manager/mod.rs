//! Entry point for application code: registers document types and fetches
//! documents through the configured store.

pub mod registry;

use std::sync::Arc;

use crate::config::MapperConfig;
use crate::document::{Document, DocumentError, Schema};
use crate::store::Store;
use crate::types::identifiers::DocumentId;

pub use registry::Registry;

/// Registrations take `&mut self`, so they must happen before the manager
/// is shared; afterwards it is read-only and can sit behind an `Arc`.
pub struct Manager {
    registry: Registry,
    store: Arc<dyn Store>,
    config: MapperConfig,
}

impl Manager {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self::with_config(store, MapperConfig::v0())
    }

    pub fn with_config(store: Arc<dyn Store>, config: MapperConfig) -> Self {
        Self {
            registry: Registry::new(),
            store,
            config,
        }
    }

    /// Register `schema` under `type_name`. Documents created or fetched
    /// through this binding have `type_name` as their type, whatever name
    /// the schema was built with.
    pub fn set_document_class(&mut self, type_name: impl Into<String>, schema: Schema) {
        self.registry.register(type_name, schema);
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    pub fn create_document(&self, type_name: &str) -> Result<Document, DocumentError> {
        let schema = self.registry.lookup(type_name)?;
        Ok(Document::create_new(
            schema,
            Arc::clone(&self.store),
            self.config.clone(),
        ))
    }

    /// Fetch and hydrate a document. An empty id is rejected before the
    /// store is contacted.
    pub fn fetch_document(&self, type_name: &str, id: &str) -> Result<Document, DocumentError> {
        let schema = self.registry.lookup(type_name)?;
        if id.is_empty() {
            return Err(DocumentError::InvalidArgument(
                "No document ID specified.".into(),
            ));
        }

        let id = DocumentId::new(id);
        let stored = self.store.read(schema.doc_type(), &id)?;
        Document::hydrate(schema, Arc::clone(&self.store), self.config.clone(), stored)
    }
}

impl std::fmt::Debug for Manager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Manager")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
