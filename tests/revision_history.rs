use std::sync::Arc;

use docmapper::document::StringValidator;
use docmapper::store::MemoryStore;
use docmapper::{Manager, PropertyDef, Schema};
use serde_json::json;

fn manager() -> (Arc<MemoryStore>, Manager) {
    let store = Arc::new(MemoryStore::new());
    let mut manager = Manager::new(store.clone());
    manager.set_document_class(
        "user",
        Schema::new("user")
            .property("login", PropertyDef::new(StringValidator::default()).required())
            .property("name", PropertyDef::new(StringValidator::default()))
            .id_from("login"),
    );
    (store, manager)
}

#[test]
fn invariant_revisions_are_ordered_oldest_first() {
    let (_, manager) = manager();

    let mut doc = manager.create_document("user").unwrap();
    doc.set("login", "kore").unwrap();
    doc.save().unwrap();

    let mut doc = manager.fetch_document("user", "user-kore").unwrap();
    doc.set("login", "Kore_2").unwrap();
    doc.set("name", "Kore Nordmann").unwrap();
    doc.save().unwrap();

    let mut doc = manager.fetch_document("user", "user-kore").unwrap();
    doc.set("name", "Kore D. Nordmann").unwrap();
    doc.save().unwrap();

    let mut doc = manager.fetch_document("user", "user-kore").unwrap();
    let revisions = doc.revisions().unwrap();

    assert_eq!(revisions.len(), 3);
    assert_eq!(revisions[0]["login"], json!("kore"));
    assert_eq!(revisions[1]["name"], json!("Kore Nordmann"));
    assert_eq!(revisions[2]["name"], json!("Kore D. Nordmann"));
}

#[test]
fn invariant_revisions_are_fetched_once() {
    let (store, manager) = manager();

    let mut doc = manager.create_document("user").unwrap();
    doc.set("login", "kore").unwrap();
    doc.save().unwrap();

    assert_eq!(doc.revisions().unwrap().len(), 1);
    assert_eq!(doc.revisions().unwrap().len(), 1);
    assert_eq!(store.request_counts().log_reads, 1);
}

#[test]
fn invariant_revisions_are_not_local_edits() {
    let (_, manager) = manager();

    let mut doc = manager.create_document("user").unwrap();
    doc.set("login", "kore").unwrap();
    doc.save().unwrap();

    let mut doc = manager.fetch_document("user", "user-kore").unwrap();
    doc.set("name", "unsaved").unwrap();

    let revisions = doc.revisions().unwrap();
    assert_eq!(revisions.len(), 1);
    assert_eq!(revisions[0]["name"], serde_json::Value::Null);
}
