//! A card is a pair of face tokens plus its scheduling state.
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::StudyState;

/// A single flashcard.
///
/// `front` and `back` are face tokens: either literal text or a
/// `ref://<filename>` pointing at an asset inside the owning package (see
/// [`crate::resolver`]). The study state is serialized flattened into the
/// card record, matching the on-disk metadata layout.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: Uuid,
    pub front: String,
    pub back: String,
    #[serde(flatten)]
    pub study: StudyState,
}

impl Card {
    /// Creates a card with a fresh id and default study state.
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            front: front.into(),
            back: back.into(),
            study: StudyState::default(),
        }
    }
}

// Identity is the id plus the face tokens; study state is mutable bookkeeping
// and deliberately excluded.
impl PartialEq for Card {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.front == other.front && self.back == other.back
    }
}

impl Eq for Card {}
