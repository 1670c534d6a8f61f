//! Storage service traits and implementations.
//!
//! `KeyValueStore` models the per-browser local store (guest profiles);
//! `DocumentStore` models the remote blob store (one named document holding
//! the identity-to-profile map). Both are trait seams so the broker can be
//! exercised against in-memory fakes.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use lumen_types::error::{LumenError, Result};

/// Local key-value persistence.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Remote single-document persistence. Every read/write round-trips the
/// whole document.
pub trait DocumentStore {
    fn fetch(&self, name: &str) -> Result<Option<String>>;
    fn store(&mut self, name: &str, contents: &str) -> Result<()>;
}

/// In-memory key-value store.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: HashMap<String, String>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Key-value store backed by one JSON file per key in a directory.
#[derive(Debug)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    /// Open (creating the directory if needed).
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys become filenames; anything outside [A-Za-z0-9._-] is mapped
        // to '_' so a key can never escape the store directory.
        let safe: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(LumenError::Io(e)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(LumenError::Io(e)),
        }
    }
}

/// Document store backed by one file per document in a directory. Stands in
/// for the remote blob store when running locally.
#[derive(Debug)]
pub struct FileDocumentStore {
    dir: PathBuf,
}

impl FileDocumentStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, name: &str) -> PathBuf {
        let safe: String = name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(safe)
    }
}

impl DocumentStore for FileDocumentStore {
    fn fetch(&self, name: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(name)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(LumenError::Io(e)),
        }
    }

    fn store(&mut self, name: &str, contents: &str) -> Result<()> {
        fs::write(self.path_for(name), contents)?;
        Ok(())
    }
}

/// In-memory document store.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    documents: HashMap<String, String>,
    /// Number of successful writes, observable by tests.
    pub writes: usize,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed a document.
    pub fn with_document(name: &str, contents: &str) -> Self {
        let mut store = Self::default();
        store
            .documents
            .insert(name.to_string(), contents.to_string());
        store
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn fetch(&self, name: &str) -> Result<Option<String>> {
        Ok(self.documents.get(name).cloned())
    }

    fn store(&mut self, name: &str, contents: &str) -> Result<()> {
        self.documents
            .insert(name.to_string(), contents.to_string());
        self.writes += 1;
        Ok(())
    }
}
