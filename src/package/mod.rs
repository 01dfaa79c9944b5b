//! Deck package persistence: a deck stored as a relocatable directory bundle.
pub mod deck;

pub use deck::{CONTENTS_DIR, DeckPackage, METADATA_FILE, PackageError};
