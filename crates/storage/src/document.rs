//! The persisted state document.
//!
//! The on-disk shape mirrors the domain tree but stays a separate set of
//! serde records so storage concerns never leak into the domain layer.
//! Every top-level field except `version` carries a typed default: a stored
//! document missing a field (or an older partial write) still parses, with
//! the absent fields falling back to their defaults.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use flashcards_core::model::{Card, CardError, CardId, Deck, DeckError, DeckId};
use flashcards_core::{AppState, UiState};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::repository::STORAGE_VERSION;

/// Persisted shape for a deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckRecord {
    pub id: DeckId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl DeckRecord {
    #[must_use]
    pub fn from_deck(deck: &Deck) -> Self {
        Self {
            id: deck.id(),
            name: deck.name().to_owned(),
            created_at: deck.created_at(),
        }
    }

    /// Convert the record back into a domain `Deck`.
    ///
    /// # Errors
    ///
    /// Returns `DeckError` if the stored name fails validation.
    pub fn into_deck(self) -> Result<Deck, DeckError> {
        Deck::new(self.id, self.name, self.created_at)
    }
}

/// Persisted shape for a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardRecord {
    pub id: CardId,
    pub front: String,
    pub back: String,
    pub updated_at: DateTime<Utc>,
}

impl CardRecord {
    #[must_use]
    pub fn from_card(card: &Card) -> Self {
        Self {
            id: card.id(),
            front: card.front().to_owned(),
            back: card.back().to_owned(),
            updated_at: card.updated_at(),
        }
    }

    /// Convert the record back into a domain `Card`.
    ///
    /// # Errors
    ///
    /// Returns `CardError` if either stored face fails validation.
    pub fn into_card(self) -> Result<Card, CardError> {
        Card::from_persisted(self.id, self.front, self.back, self.updated_at)
    }
}

/// Persisted shape for the transient view state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UiRecord {
    pub active_card_index: usize,
    pub is_flipped: bool,
    pub search_query: String,
}

impl UiRecord {
    #[must_use]
    pub fn from_ui(ui: &UiState) -> Self {
        Self {
            active_card_index: ui.active_card_index,
            is_flipped: ui.is_flipped,
            search_query: ui.search_query.clone(),
        }
    }

    #[must_use]
    pub fn into_ui(self) -> UiState {
        UiState {
            active_card_index: self.active_card_index,
            is_flipped: self.is_flipped,
            search_query: self.search_query,
        }
    }
}

/// The whole application state as one JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StateDocument {
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub decks: Vec<DeckRecord>,
    #[serde(default)]
    pub cards_by_deck_id: BTreeMap<DeckId, Vec<CardRecord>>,
    #[serde(default)]
    pub active_deck_id: Option<DeckId>,
    #[serde(default)]
    pub ui: UiRecord,
}

impl StateDocument {
    /// Snapshots the in-memory state, stamping the current version.
    #[must_use]
    pub fn from_state(state: &AppState) -> Self {
        let cards_by_deck_id = state
            .decks()
            .iter()
            .map(|deck| {
                let records = state
                    .cards_for_deck(deck.id())
                    .iter()
                    .map(CardRecord::from_card)
                    .collect();
                (deck.id(), records)
            })
            .collect();

        Self {
            version: STORAGE_VERSION,
            decks: state.decks().iter().map(DeckRecord::from_deck).collect(),
            cards_by_deck_id,
            active_deck_id: state.active_deck_id(),
            ui: UiRecord::from_ui(state.ui()),
        }
    }

    /// Rebuilds the state tree, dropping records that fail domain
    /// validation; the remaining tree is normalized by
    /// `AppState::from_parts` so it always satisfies the state invariants.
    #[must_use]
    pub fn into_state(self) -> AppState {
        let mut decks = Vec::with_capacity(self.decks.len());
        for record in self.decks {
            match record.into_deck() {
                Ok(deck) => decks.push(deck),
                Err(err) => warn!("skipping invalid stored deck: {err}"),
            }
        }

        let mut cards_by_deck: HashMap<DeckId, Vec<Card>> = HashMap::new();
        for (deck_id, records) in self.cards_by_deck_id {
            let mut cards = Vec::with_capacity(records.len());
            for record in records {
                match record.into_card() {
                    Ok(card) => cards.push(card),
                    Err(err) => warn!("skipping invalid stored card: {err}"),
                }
            }
            cards_by_deck.insert(deck_id, cards);
        }

        AppState::from_parts(decks, cards_by_deck, self.active_deck_id, self.ui.into_ui())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use flashcards_core::time::fixed_now;

    fn sample_state() -> AppState {
        AppState::with_sample_data(fixed_now())
    }

    #[test]
    fn document_roundtrip_preserves_identity_and_content() {
        let state = sample_state();
        let json = serde_json::to_string(&StateDocument::from_state(&state)).unwrap();
        let restored: StateDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.into_state(), state);
    }

    #[test]
    fn document_uses_camel_case_keys() {
        let json = serde_json::to_string(&StateDocument::from_state(&sample_state())).unwrap();
        assert!(json.contains("\"cardsByDeckId\""));
        assert!(json.contains("\"activeDeckId\""));
        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("\"updatedAt\""));
        assert!(json.contains("\"activeCardIndex\""));
        assert!(json.contains("\"isFlipped\""));
        assert!(json.contains("\"searchQuery\""));
        assert!(json.contains("\"version\":1"));
    }

    #[test]
    fn missing_fields_fall_back_to_typed_defaults() {
        let document: StateDocument = serde_json::from_str("{\"version\":1}").unwrap();
        assert_eq!(document.version, 1);
        assert!(document.decks.is_empty());
        assert!(document.cards_by_deck_id.is_empty());
        assert_eq!(document.active_deck_id, None);
        assert_eq!(document.ui, UiRecord::default());
    }

    #[test]
    fn missing_version_defaults_to_zero() {
        let document: StateDocument = serde_json::from_str("{}").unwrap();
        assert_eq!(document.version, 0);
    }

    #[test]
    fn invalid_records_are_dropped_not_fatal() {
        let state = sample_state();
        let mut document = StateDocument::from_state(&state);
        document.decks.push(DeckRecord {
            id: DeckId::generate(),
            name: "   ".to_owned(),
            created_at: fixed_now(),
        });
        let first_deck = document.decks[0].id;
        document
            .cards_by_deck_id
            .get_mut(&first_deck)
            .unwrap()
            .push(CardRecord {
                id: CardId::generate(),
                front: String::new(),
                back: "orphan".to_owned(),
                updated_at: fixed_now(),
            });

        let restored = document.into_state();
        assert_eq!(restored.decks().len(), 2);
        assert_eq!(restored.cards_for_deck(first_deck).len(), 3);
    }

    #[test]
    fn orphan_card_lists_are_dropped() {
        let mut document = StateDocument::from_state(&sample_state());
        let orphan = DeckId::generate();
        document.cards_by_deck_id.insert(
            orphan,
            vec![CardRecord {
                id: CardId::generate(),
                front: "a".to_owned(),
                back: "b".to_owned(),
                updated_at: fixed_now(),
            }],
        );

        let restored = document.into_state();
        assert!(restored.cards_for_deck(orphan).is_empty());
    }
}
