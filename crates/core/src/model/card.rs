use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::CardId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CardError {
    #[error("card front cannot be empty")]
    EmptyFront,

    #[error("card back cannot be empty")]
    EmptyBack,
}

//
// ─── DRAFT → VALIDATED → CARD ──────────────────────────────────────────────────
//

/// Unvalidated user input for a card, as submitted from an editor form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDraft {
    pub front: String,
    pub back: String,
}

impl CardDraft {
    #[must_use]
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
        }
    }

    /// Trims and validates both faces.
    ///
    /// # Errors
    ///
    /// Returns `CardError::EmptyFront` or `CardError::EmptyBack` when the
    /// corresponding face is empty or whitespace-only.
    pub fn validate(self, now: DateTime<Utc>) -> Result<ValidatedCard, CardError> {
        let (front, back) = validated_faces(&self.front, &self.back)?;
        Ok(ValidatedCard {
            front,
            back,
            updated_at: now,
        })
    }
}

/// Card content that passed validation but has no identity yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCard {
    front: String,
    back: String,
    updated_at: DateTime<Utc>,
}

impl ValidatedCard {
    #[must_use]
    pub fn assign_id(self, id: CardId) -> Card {
        Card {
            id,
            front: self.front,
            back: self.back,
            updated_at: self.updated_at,
        }
    }
}

/// A front/back text pair belonging to a deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    id: CardId,
    front: String,
    back: String,
    updated_at: DateTime<Utc>,
}

impl Card {
    /// Rebuilds a card from persisted fields.
    ///
    /// # Errors
    ///
    /// Returns `CardError` if either face fails validation.
    pub fn from_persisted(
        id: CardId,
        front: impl Into<String>,
        back: impl Into<String>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, CardError> {
        let (front, back) = validated_faces(&front.into(), &back.into())?;
        Ok(Self {
            id,
            front,
            back,
            updated_at,
        })
    }

    /// Replaces both faces and refreshes `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `CardError` if either face fails validation; the card is left
    /// unchanged in that case.
    pub fn edit(
        &mut self,
        front: &str,
        back: &str,
        now: DateTime<Utc>,
    ) -> Result<(), CardError> {
        let (front, back) = validated_faces(front, back)?;
        self.front = front;
        self.back = back;
        self.updated_at = now;
        Ok(())
    }

    /// Case-insensitive substring match against front and back text.
    ///
    /// The query must already be lowercased and trimmed.
    #[must_use]
    pub fn matches_query(&self, query: &str) -> bool {
        self.front.to_lowercase().contains(query) || self.back.to_lowercase().contains(query)
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> CardId {
        self.id
    }

    #[must_use]
    pub fn front(&self) -> &str {
        &self.front
    }

    #[must_use]
    pub fn back(&self) -> &str {
        &self.back
    }

    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

fn validated_faces(front: &str, back: &str) -> Result<(String, String), CardError> {
    let front = front.trim();
    if front.is_empty() {
        return Err(CardError::EmptyFront);
    }
    let back = back.trim();
    if back.is_empty() {
        return Err(CardError::EmptyBack);
    }
    Ok((front.to_owned(), back.to_owned()))
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
