use std::fmt::Display;

use lumipet_storage::{
    core::{AnimationData, AnimationId, AnimationRecord, Error, Fps, Grid},
    test_utils::MemoryBlobStore,
    AnimationStore, BlobStore, FileBlobStore, ANIMATIONS_KEY,
};
use pretty_assertions::assert_eq;

fn init_store() -> AnimationStore<MemoryBlobStore> {
    let _ = env_logger::try_init();
    AnimationStore::new(MemoryBlobStore::default())
}

fn animation(frames: usize) -> AnimationData {
    let frames = (0..frames).map(|i| Grid::empty().toggle(i % 8, i % 8)).collect();
    AnimationData::new(Fps::new(4).unwrap(), frames).unwrap()
}

fn names(records: &[AnimationRecord]) -> Vec<&str> {
    records.iter().map(|record| record.name.as_str()).collect()
}

#[test]
fn test_empty_store_lists_nothing() {
    let store = init_store();
    assert!(store.list().unwrap().is_empty());
}

#[test]
fn test_create_assigns_identity() {
    let mut store = init_store();

    let first = store.create("first", animation(1)).unwrap();
    let second = store.create("second", animation(3)).unwrap();
    assert_ne!(first.id, second.id);
    assert!(first.created_at <= second.created_at);

    let records = store.list().unwrap();
    assert_eq!(names(&records), ["first", "second"]);
    assert_eq!(records[1].data, animation(3));
    assert_eq!(store.get(&second.id).unwrap(), Some(second));
}

#[test]
fn test_create_rejects_empty_name() {
    let mut store = init_store();
    assert_eq!(store.create(" \t", animation(1)), Err(Error::EmptyName));
    assert!(store.list().unwrap().is_empty());
}

#[test]
fn test_update_replaces_by_id() {
    let mut store = init_store();
    let mut record = store.create("wave", animation(1)).unwrap();
    store.create("other", animation(1)).unwrap();

    record.data = animation(5);
    assert!(store.update(&record).unwrap());

    let records = store.list().unwrap();
    assert_eq!(names(&records), ["wave", "other"]);
    assert_eq!(records[0].data.len(), 5);
    assert_eq!(records[0].created_at, record.created_at);
}

#[test]
fn test_update_missing_is_noop() {
    let mut store = init_store();
    store.create("wave", animation(1)).unwrap();
    let before = store.list().unwrap();

    let mut ghost = AnimationRecord::new("ghost", animation(2)).unwrap();
    ghost.id = AnimationId::from("missing");
    assert!(!store.update(&ghost).unwrap());
    assert_eq!(store.list().unwrap(), before);
}

#[test]
fn test_rename() {
    let mut store = init_store();
    let record = store.create("wave", animation(1)).unwrap();

    assert!(store.rename(&record.id, "  ocean  ").unwrap());
    assert_eq!(store.get(&record.id).unwrap().unwrap().name, "ocean");
    assert_eq!(store.rename(&record.id, ""), Err(Error::EmptyName));
    assert!(!store.rename(&AnimationId::from("missing"), "name").unwrap());
}

#[test]
fn test_delete_by_id() {
    let mut store = init_store();
    let a = store.create("a", animation(1)).unwrap();
    let b = store.create("b", animation(1)).unwrap();

    assert!(store.delete(&a.id).unwrap());
    assert!(!store.delete(&a.id).unwrap());
    assert_eq!(store.list().unwrap(), vec![b]);
}

#[test]
fn test_save_all_preserves_given_order() {
    let mut store = init_store();
    let a = store.create("A", animation(1)).unwrap();
    let b = store.create("B", animation(2)).unwrap();
    let c = store.create("C", animation(3)).unwrap();

    // Creation order is A, B, C; store it in a different one and back.
    store.save_all(&[c.clone(), a.clone(), b.clone()]).unwrap();
    assert_eq!(names(&store.list().unwrap()), ["C", "A", "B"]);

    store.save_all(&[a.clone(), b.clone(), c.clone()]).unwrap();
    assert_eq!(store.list().unwrap(), vec![a, b, c]);
}

#[test]
fn test_move_item() {
    let mut store = init_store();
    for name in ["A", "B", "C", "D"] {
        store.create(name, animation(1)).unwrap();
    }

    store.move_item(0, 2).unwrap();
    assert_eq!(names(&store.list().unwrap()), ["B", "C", "A", "D"]);
    store.move_item(3, 0).unwrap();
    assert_eq!(names(&store.list().unwrap()), ["D", "B", "C", "A"]);

    assert_eq!(
        store.move_item(4, 0),
        Err(Error::OutOfRange { index: 4, len: 4 })
    );
}

#[test]
fn test_malformed_collection_is_format_error() {
    let mut backend = MemoryBlobStore::default();
    backend
        .save(
            ANIMATIONS_KEY,
            r#"[{"id":"1","name":"bad","createdAt":"2024-06-10T06:13:20.000Z","data":{"fps":8,"loop":true,"frames":["0101"]}}]"#,
        )
        .unwrap();

    let store = AnimationStore::new(backend);
    assert!(matches!(store.list(), Err(Error::Format(_))));
}

#[test]
fn test_reads_original_app_records() {
    let mut backend = MemoryBlobStore::default();
    backend
        .save(
            ANIMATIONS_KEY,
            r#"[{"id":"1718000000000","name":"blink","createdAt":"2024-06-10T06:13:20.000Z","data":{"fps":8,"loop":true,"frames":["00000000,00011000,00100100,01000010,01000010,00100100,00011000,00000000","00000000,00000000,00000000,00000000,00000000,00000000,00000000,00000000"]}}]"#,
        )
        .unwrap();

    let store = AnimationStore::new(backend);
    let records = store.list().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id.as_str(), "1718000000000");
    assert_eq!(records[0].data.frames()[0].count_on(), 12);
    assert!(records[0].data.frames()[1].is_empty());
}

/// Backend which fails every write.
struct ReadOnlyBackend;

#[derive(Debug)]
struct ReadOnlyError;

impl Display for ReadOnlyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("read-only backend")
    }
}

impl BlobStore for ReadOnlyBackend {
    type Error = ReadOnlyError;

    fn load(&self, _key: &str) -> Result<Option<String>, Self::Error> {
        Ok(None)
    }

    fn save(&mut self, _key: &str, _value: &str) -> Result<(), Self::Error> {
        Err(ReadOnlyError)
    }

    fn list(&self) -> Result<Vec<String>, Self::Error> {
        Ok(Vec::new())
    }
}

#[test]
fn test_backend_errors_are_passed_through() {
    let mut store = AnimationStore::new(ReadOnlyBackend);
    assert_eq!(
        store.create("wave", animation(1)),
        Err(Error::Storage("read-only backend".to_owned()))
    );
}

#[test]
fn test_file_blob_store() {
    let dir = tempfile::tempdir().unwrap();
    let mut backend = FileBlobStore::open(dir.path().join("store")).unwrap();
    assert_eq!(backend.load(ANIMATIONS_KEY).unwrap(), None);

    backend.save(ANIMATIONS_KEY, "[]").unwrap();
    backend.save("settings", "{}").unwrap();
    assert_eq!(backend.load(ANIMATIONS_KEY).unwrap().as_deref(), Some("[]"));
    assert_eq!(backend.list().unwrap(), [ANIMATIONS_KEY, "settings"]);

    assert!(backend.save("../escape", "{}").is_err());
}

#[test]
fn test_file_backed_animation_store_reopen() {
    let dir = tempfile::tempdir().unwrap();

    let record = {
        let mut store = AnimationStore::new(FileBlobStore::open(dir.path()).unwrap());
        store.create("persisted", animation(2)).unwrap()
    };

    let store = AnimationStore::new(FileBlobStore::open(dir.path()).unwrap());
    assert_eq!(store.list().unwrap(), vec![record]);
}
