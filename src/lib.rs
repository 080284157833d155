//! Typed, revision-tracked object mapping for document-oriented databases.
//!
//! `docmapper` presents remote documents as schema-validated local objects,
//! tracks which properties changed since the last known revision, and
//! writes changes back with optimistic concurrency: every update and delete
//! carries the revision it was based on, and a stale revision is reported
//! as a conflict instead of overwriting newer data.
//!
//! The database itself is reached through the [`store::Store`] trait;
//! [`store::MemoryStore`] is an in-process implementation.

pub mod config;
pub mod document;
pub mod manager;
pub mod store;
pub mod tool;
pub mod types;

pub use config::MapperConfig;
pub use document::{Document, DocumentError, PropertyDef, Saved, Schema};
pub use manager::Manager;
pub use types::identifiers::{normalize, DocumentId, Revision};
