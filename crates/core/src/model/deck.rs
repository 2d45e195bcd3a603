use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::DeckId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DeckError {
    #[error("deck name cannot be empty")]
    EmptyName,
}

/// A named collection of flashcards.
///
/// Decks own their cards indirectly: the card list for a deck lives in the
/// application state tree, keyed by the deck id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    id: DeckId,
    name: String,
    created_at: DateTime<Utc>,
}

impl Deck {
    /// Creates a new Deck.
    ///
    /// # Errors
    ///
    /// Returns `DeckError::EmptyName` if name is empty or whitespace-only.
    pub fn new(
        id: DeckId,
        name: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DeckError> {
        let name = validated_name(name.into())?;
        Ok(Self {
            id,
            name,
            created_at,
        })
    }

    /// Renames the deck in place.
    ///
    /// # Errors
    ///
    /// Returns `DeckError::EmptyName` if the new name is empty or
    /// whitespace-only; the deck is left unchanged in that case.
    pub fn rename(&mut self, name: impl Into<String>) -> Result<(), DeckError> {
        self.name = validated_name(name.into())?;
        Ok(())
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> DeckId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

fn validated_name(name: String) -> Result<String, DeckError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DeckError::EmptyName);
    }
    Ok(name.to_owned())
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
