//! LumiPet animations storage
//!
//! The persistent storage itself is an external key-value blob store, this crate
//! defines its contract and keeps the user animations collection on top of it.

// Linter configuration
#![warn(unsafe_code, clippy::pedantic, clippy::use_self)]
// Too many false positives.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::missing_const_for_fn
)]

use std::fmt::Display;

pub use lumipet_core as core;
use lumipet_core::{
    animation::validate_name, AnimationData, AnimationId, AnimationRecord, Error as LumipetError,
    Result as LumipetResult,
};

pub use crate::file::FileBlobStore;

mod file;
pub mod test_utils;

/// The key under which the animations collection is kept.
pub const ANIMATIONS_KEY: &str = "@LumiPetAnimations";

/// Key-value blob store provided by the platform.
pub trait BlobStore {
    /// Backend specific error type, it is passed through as an opaque storage error.
    type Error: Display;
    /// Loads a value stored with the given key, returns `None` if there is no such key.
    fn load(&self, key: &str) -> Result<Option<String>, Self::Error>;
    /// Stores a value with the given key, replacing the previous one.
    fn save(&mut self, key: &str, value: &str) -> Result<(), Self::Error>;
    /// Returns all stored keys.
    fn list(&self) -> Result<Vec<String>, Self::Error>;
}

impl<T: BlobStore + ?Sized> BlobStore for &mut T {
    type Error = T::Error;

    fn load(&self, key: &str) -> Result<Option<String>, Self::Error> {
        T::load(self, key)
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), Self::Error> {
        T::save(self, key, value)
    }

    fn list(&self) -> Result<Vec<String>, Self::Error> {
        T::list(self)
    }
}

/// User animations collection kept as a single JSON array in the blob store.
///
/// The collection order is significant: it is the order chosen by the user and it is
/// never derived from the creation time. Nothing is cached, each operation reads the
/// whole collection from the backend and writes it back.
#[derive(Debug)]
pub struct AnimationStore<B> {
    backend: B,
    key: String,
}

impl<B: BlobStore> AnimationStore<B> {
    /// Creates a new animations store on top of the given backend.
    pub fn new(backend: B) -> Self {
        Self::with_key(backend, ANIMATIONS_KEY)
    }

    /// Creates a new animations store which keeps the collection under the given key.
    pub fn with_key(backend: B, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    /// Returns the whole animations collection in the stored order.
    pub fn list(&self) -> LumipetResult<Vec<AnimationRecord>> {
        let Some(json) = self
            .backend
            .load(&self.key)
            .map_err(LumipetError::storage)?
        else {
            return Ok(Vec::new());
        };

        let records = serde_json::from_str(&json)?;
        Ok(records)
    }

    /// Returns an animation with the given identifier.
    pub fn get(&self, id: &AnimationId) -> LumipetResult<Option<AnimationRecord>> {
        Ok(self.list()?.into_iter().find(|record| &record.id == id))
    }

    /// Creates a new animation at the end of the collection.
    ///
    /// Returns the stored record with a freshly assigned identifier and creation time.
    pub fn create(&mut self, name: &str, data: AnimationData) -> LumipetResult<AnimationRecord> {
        let record = AnimationRecord::new(name, data)?;

        let mut records = self.list()?;
        records.push(record.clone());
        self.write(&records)?;

        log::info!("Created animation '{}' with id {}", record.name, record.id);
        Ok(record)
    }

    /// Replaces an animation with the same identifier.
    ///
    /// Returns `false` and leaves the collection untouched if there is no such animation.
    pub fn update(&mut self, record: &AnimationRecord) -> LumipetResult<bool> {
        record.validate()?;

        let mut records = self.list()?;
        let Some(stored) = records.iter_mut().find(|stored| stored.id == record.id) else {
            log::debug!("Skipped update of the missing animation {}", record.id);
            return Ok(false);
        };
        *stored = record.clone();
        self.write(&records)?;

        log::info!("Updated animation {}", record.id);
        Ok(true)
    }

    /// Renames an animation with the given identifier.
    pub fn rename(&mut self, id: &AnimationId, name: &str) -> LumipetResult<bool> {
        let name = validate_name(name)?;
        match self.get(id)? {
            Some(mut record) => {
                record.name = name;
                self.update(&record)
            }
            None => Ok(false),
        }
    }

    /// Removes an animation with the given identifier.
    ///
    /// Returns `false` if there is no such animation.
    pub fn delete(&mut self, id: &AnimationId) -> LumipetResult<bool> {
        let mut records = self.list()?;
        let len = records.len();
        records.retain(|record| &record.id != id);
        if records.len() == len {
            return Ok(false);
        }

        self.write(&records)?;
        log::info!("Deleted animation {id}");
        Ok(true)
    }

    /// Replaces the entire collection, preserving the given order.
    pub fn save_all(&mut self, records: &[AnimationRecord]) -> LumipetResult<()> {
        for record in records {
            record.validate()?;
        }
        self.write(records)
    }

    /// Moves an animation from one position to another, shifting the ones in between.
    pub fn move_item(&mut self, from: usize, to: usize) -> LumipetResult<()> {
        let mut records = self.list()?;
        LumipetError::check_index(from, records.len())?;
        LumipetError::check_index(to, records.len())?;

        let record = records.remove(from);
        records.insert(to, record);
        self.write(&records)
    }

    fn write(&mut self, records: &[AnimationRecord]) -> LumipetResult<()> {
        let json = serde_json::to_string(records).map_err(LumipetError::storage)?;
        log::trace!("Writing {} animations into '{}'", records.len(), self.key);
        self.backend
            .save(&self.key, &json)
            .map_err(LumipetError::storage)
    }
}
