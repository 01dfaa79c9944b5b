//! Durable storage for a deck's card list and its asset files.
//!
//! Layout of a package:
//! ```text
//! <package-root>/
//!   Contents/
//!     deck.json        # serialized card list
//!     <asset files>    # referenced by ref:// tokens in card faces
//! ```
//!
//! Every mutation re-serializes the full card list and flushes it to disk
//! before returning; there is no explicit save step and no undo log. Callers
//! must serialize all mutation of one package onto a single execution
//! context; the on-disk subtrees of distinct packages are disjoint.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::Card;
use crate::resolver;

/// Directory inside the package root holding metadata and assets.
pub const CONTENTS_DIR: &str = "Contents";

/// Name of the serialized card list inside [`CONTENTS_DIR`].
pub const METADATA_FILE: &str = "deck.json";

#[derive(Error, Debug)]
pub enum PackageError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("metadata encode failed: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("write failed at {}: {source}", .path.display())]
    WriteFailure { path: PathBuf, source: io::Error },

    #[error("package is not attached to a directory")]
    Detached,

    #[error("card not found: {0}")]
    CardNotFound(Uuid),
}

pub type Result<T> = std::result::Result<T, PackageError>;

/// Serialized form of the metadata file.
#[derive(Deserialize)]
struct DeckInfo {
    id: Uuid,
    cards: Vec<Card>,
}

#[derive(Serialize)]
struct DeckInfoRef<'a> {
    id: Uuid,
    cards: &'a [Card],
}

/// An open deck package.
///
/// Created detached via [`DeckPackage::new`] and bound to a directory with
/// [`DeckPackage::attach`], or opened from an existing directory with
/// [`DeckPackage::open`]. Mutating operations flush synchronously and roll
/// the in-memory card list back if the write fails.
pub struct DeckPackage {
    root: Option<PathBuf>,
    id: Uuid,
    cards: Vec<Card>,
    // Re-entrancy guard: suppresses flushing while the card list is being
    // populated from disk.
    loading: bool,
}

impl Default for DeckPackage {
    fn default() -> Self {
        Self::new()
    }
}

impl DeckPackage {
    /// An empty package not yet bound to any directory. Mutations fail with
    /// [`PackageError::Detached`] until [`Self::attach`] succeeds.
    pub fn new() -> Self {
        Self {
            root: None,
            id: Uuid::new_v4(),
            cards: Vec::new(),
            loading: false,
        }
    }

    /// Binds the package to `root`, creating the directory skeleton and
    /// flushing an (initially empty) metadata file.
    pub fn attach(&mut self, root: impl Into<PathBuf>) -> Result<()> {
        let root = root.into();
        fs::create_dir_all(root.join(CONTENTS_DIR))?;
        self.root = Some(root);
        self.flush()
    }

    /// One-call creation of a brand-new package at `root`.
    pub fn create(root: impl Into<PathBuf>) -> Result<Self> {
        let mut package = Self::new();
        package.attach(root)?;
        Ok(package)
    }

    /// Opens an existing package directory.
    ///
    /// A missing metadata file falls back to the legacy naming-convention
    /// scan of the asset area (which yields zero cards for an empty
    /// directory); unparsable metadata degrades to an empty card list. Load
    /// failures are never fatal.
    pub fn open(root: impl Into<PathBuf>) -> Self {
        let mut package = Self::new();
        package.root = Some(root.into());
        package.load();
        package
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// The asset area (`<root>/Contents`), if attached.
    pub fn assets_dir(&self) -> Option<PathBuf> {
        self.root.as_ref().map(|root| root.join(CONTENTS_DIR))
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, id: Uuid) -> Option<&Card> {
        self.cards.iter().find(|card| card.id == id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cards due for review at `now` (epoch seconds), oldest due date first.
    pub fn due_cards(&self, now: f64) -> Vec<&Card> {
        let mut due: Vec<&Card> = self
            .cards
            .iter()
            .filter(|card| card.study.is_due(now))
            .collect();
        due.sort_by(|a, b| {
            a.study
                .next_review_at
                .total_cmp(&b.study.next_review_at)
        });
        due
    }

    /// Appends a card and flushes.
    pub fn add_card(&mut self, card: Card) -> Result<()> {
        let snapshot = self.cards.clone();
        self.cards.push(card);
        self.commit(snapshot)
    }

    /// Replaces the stored card with the same id and flushes.
    pub fn update_card(&mut self, card: Card) -> Result<()> {
        let pos = self
            .cards
            .iter()
            .position(|existing| existing.id == card.id)
            .ok_or(PackageError::CardNotFound(card.id))?;
        let snapshot = self.cards.clone();
        self.cards[pos] = card;
        self.commit(snapshot)
    }

    /// Removes a card, flushes, and deletes the card's owned `ref://` asset
    /// files so the package carries no orphans.
    pub fn remove_card(&mut self, id: Uuid) -> Result<Card> {
        let pos = self
            .cards
            .iter()
            .position(|card| card.id == id)
            .ok_or(PackageError::CardNotFound(id))?;
        let snapshot = self.cards.clone();
        let removed = self.cards.remove(pos);
        self.commit(snapshot)?;

        if let Some(assets) = self.assets_dir() {
            for token in [&removed.front, &removed.back] {
                let Some(name) = resolver::ref_filename(token) else {
                    continue;
                };
                let path = assets.join(name);
                if let Err(err) = fs::remove_file(&path) {
                    warn!("could not delete asset {}: {}", path.display(), err);
                }
            }
        }
        Ok(removed)
    }

    /// Stores captured asset bytes under a collision-free generated name and
    /// returns the `ref://` token recording it.
    pub fn store_asset(&self, bytes: &[u8], extension: &str) -> Result<String> {
        let assets = self.assets_dir().ok_or(PackageError::Detached)?;
        let name = format!("{}.{}", Uuid::new_v4(), extension.trim_start_matches('.'));
        let path = assets.join(&name);
        fs::write(&path, bytes).map_err(|source| PackageError::WriteFailure { path, source })?;
        Ok(resolver::ref_token(&name))
    }

    /// Writes a copy of this package at `dest`: a fresh metadata file plus
    /// every asset file from the source asset area. The package itself stays
    /// rooted where it was.
    pub fn save_to(&self, dest: impl AsRef<Path>) -> Result<()> {
        self.write_bundle(dest.as_ref(), self.id)
    }

    /// Like [`Self::save_to`], but the copy becomes this package's new home:
    /// the deck id is regenerated and the package re-roots at `dest`.
    pub fn save_as(&mut self, dest: impl Into<PathBuf>) -> Result<()> {
        let dest = dest.into();
        let new_id = Uuid::new_v4();
        self.write_bundle(&dest, new_id)?;
        self.id = new_id;
        self.root = Some(dest);
        Ok(())
    }

    fn load(&mut self) {
        let Some(root) = self.root.clone() else {
            return;
        };
        let contents = root.join(CONTENTS_DIR);
        let meta = contents.join(METADATA_FILE);

        self.loading = true;
        match fs::read_to_string(&meta) {
            Ok(text) => match serde_json::from_str::<DeckInfo>(&text) {
                Ok(info) => {
                    self.id = info.id;
                    self.cards = info.cards;
                    debug!("loaded {} cards from {}", self.cards.len(), meta.display());
                }
                Err(err) => {
                    warn!("corrupt metadata in {}: {}", meta.display(), err);
                    self.cards = Vec::new();
                }
            },
            // No metadata file: legacy packages carry only paired assets.
            Err(_) => self.cards = legacy_scan(&contents),
        }
        self.loading = false;
    }

    fn flush(&self) -> Result<()> {
        if self.loading {
            return Ok(());
        }
        let contents = self.assets_dir().ok_or(PackageError::Detached)?;
        let meta = contents.join(METADATA_FILE);
        let json = serde_json::to_string_pretty(&DeckInfoRef {
            id: self.id,
            cards: &self.cards,
        })?;

        // Temp-file-then-rename keeps the previous metadata intact if the
        // write fails partway.
        let tmp = contents.join(format!("{METADATA_FILE}.tmp"));
        fs::write(&tmp, json)
            .and_then(|_| fs::rename(&tmp, &meta))
            .map_err(|source| PackageError::WriteFailure { path: meta, source })?;
        debug!("flushed {} cards", self.cards.len());
        Ok(())
    }

    fn commit(&mut self, snapshot: Vec<Card>) -> Result<()> {
        if let Err(err) = self.flush() {
            self.cards = snapshot;
            return Err(err);
        }
        Ok(())
    }

    fn write_bundle(&self, dest: &Path, id: Uuid) -> Result<()> {
        let dest_contents = dest.join(CONTENTS_DIR);
        fs::create_dir_all(&dest_contents)?;

        let json = serde_json::to_string_pretty(&DeckInfoRef {
            id,
            cards: &self.cards,
        })?;
        let meta = dest_contents.join(METADATA_FILE);
        fs::write(&meta, json).map_err(|source| PackageError::WriteFailure { path: meta, source })?;

        // Carry every asset over so the bundle stays self-contained.
        let Some(src_contents) = self.assets_dir() else {
            return Ok(());
        };
        if src_contents == dest_contents || !src_contents.exists() {
            return Ok(());
        }
        for entry in fs::read_dir(&src_contents)? {
            let entry = entry?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name == METADATA_FILE || name.starts_with('.') || entry.path().is_dir() {
                continue;
            }
            fs::copy(entry.path(), dest_contents.join(&*name))?;
        }
        Ok(())
    }
}

/// Builds cards from a folder of `*.front.*`/`*.back.*` asset pairs.
///
/// Fronts whose paired back file is missing are dropped silently; the scan
/// never fails the open.
fn legacy_scan(contents: &Path) -> Vec<Card> {
    let Ok(entries) = fs::read_dir(contents) else {
        return Vec::new();
    };

    let mut fronts: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| !name.starts_with('.') && resolver::is_front_asset(name))
        .collect();
    fronts.sort();

    fronts
        .into_iter()
        .filter_map(|front| match resolver::pair_back_file(&contents.join(&front)) {
            Ok(back) => {
                let back_name = back.file_name()?.to_str()?.to_owned();
                Some(Card::new(
                    resolver::ref_token(&front),
                    resolver::ref_token(&back_name),
                ))
            }
            Err(err) => {
                debug!("skipping unpaired front asset: {err}");
                None
            }
        })
        .collect()
}
