//! Blob store backed by a directory, each key is kept in its own file.

use std::{
    fs,
    io::{self, ErrorKind},
    path::PathBuf,
};

use crate::BlobStore;

const EXTENSION: &str = "json";

/// Directory based blob store.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    root: PathBuf,
}

impl FileBlobStore {
    /// Opens a store in the given directory, creating it if necessary.
    pub fn open(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        log::debug!("Opened blob store at {}", root.display());
        Ok(Self { root })
    }

    fn path(&self, key: &str) -> io::Result<PathBuf> {
        // Keys must not escape the store directory.
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(io::Error::new(
                ErrorKind::InvalidInput,
                format!("invalid blob key '{key}'"),
            ));
        }
        Ok(self.root.join(format!("{key}.{EXTENSION}")))
    }
}

impl BlobStore for FileBlobStore {
    type Error = io::Error;

    fn load(&self, key: &str) -> Result<Option<String>, Self::Error> {
        match fs::read_to_string(self.path(key)?) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), Self::Error> {
        let path = self.path(key)?;
        // Write into a temporary file first so a crash never leaves a truncated value.
        let tmp = self.root.join(format!("{key}.tmp"));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)
    }

    fn list(&self) -> Result<Vec<String>, Self::Error> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(key) = path.file_stem().and_then(|stem| stem.to_str()) {
                keys.push(key.to_owned());
            }
        }
        keys.sort();
        Ok(keys)
    }
}
