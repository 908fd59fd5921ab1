//! Test helpers

use std::{collections::BTreeMap, convert::Infallible};

use crate::BlobStore;

/// In-memory blob store backend.
#[derive(Debug, Default, Clone)]
pub struct MemoryBlobStore(pub BTreeMap<String, String>);

impl BlobStore for MemoryBlobStore {
    type Error = Infallible;

    fn load(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.0.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.0.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn list(&self) -> Result<Vec<String>, Self::Error> {
        Ok(self.0.keys().cloned().collect())
    }
}

#[test]
fn test_blob_store_in_memory() {
    let mut backend = MemoryBlobStore::default();
    assert_eq!(backend.load("missing").unwrap(), None);

    for index in 0..16 {
        let key = format!("key-{index}");
        backend.save(&key, "first").unwrap();
        backend.save(&key, "second").unwrap();
        assert_eq!(backend.load(&key).unwrap().as_deref(), Some("second"));
    }
    assert_eq!(backend.list().unwrap().len(), 16);
}
