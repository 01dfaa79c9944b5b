//! Enumeration of deck packages under a root directory.
//!
//! Listing is lazy: it inspects directory entries only and parses no
//! metadata. A deck is opened (and its card list read) only when the caller
//! asks for it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::package::DeckPackage;

pub struct DeckCatalog {
    root: PathBuf,
}

impl DeckCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Package locations under the root: immediate subdirectories, hidden
    /// (dot-prefixed) entries excluded, sorted by name.
    pub fn list(&self) -> io::Result<Vec<PathBuf>> {
        let mut locations = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            if entry.file_name().to_string_lossy().starts_with('.') {
                continue;
            }
            locations.push(entry.path());
        }
        locations.sort();
        Ok(locations)
    }

    /// Opens the package at a listed location.
    pub fn open(&self, location: impl Into<PathBuf>) -> DeckPackage {
        DeckPackage::open(location)
    }

    /// Opens the package in the subdirectory `name` of the root.
    pub fn open_by_name(&self, name: &str) -> DeckPackage {
        DeckPackage::open(self.root.join(name))
    }
}
