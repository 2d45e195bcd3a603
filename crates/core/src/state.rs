//! The application state tree and its update functions.
//!
//! `AppState` is the single source of truth for a session: the deck list,
//! the per-deck card lists, the active deck, and the transient view state.
//! Every update function re-establishes the tree invariants before
//! returning:
//!
//! - every card list key references an existing deck;
//! - the active deck id, if set, references an existing deck;
//! - the active card index stays clamped against the filtered card list.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use crate::model::{Card, CardDraft, CardError, CardId, Deck, DeckError, DeckId};

/// Transient per-session view state.
///
/// Not an independent source of truth: `active_card_index` is only
/// meaningful relative to the filtered card list of the active deck.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UiState {
    pub active_card_index: usize,
    pub is_flipped: bool,
    pub search_query: String,
}

impl UiState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Root aggregate for one session; exactly one instance, persisted wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    decks: Vec<Deck>,
    cards_by_deck: HashMap<DeckId, Vec<Card>>,
    active_deck_id: Option<DeckId>,
    ui: UiState,
}

impl AppState {
    /// Rebuilds a state tree from loaded parts, normalizing anything that
    /// violates the invariants: card lists without an owning deck are
    /// dropped, a dangling active deck id is re-pointed at the first deck
    /// (or cleared), and the active card index is re-clamped.
    #[must_use]
    pub fn from_parts(
        decks: Vec<Deck>,
        mut cards_by_deck: HashMap<DeckId, Vec<Card>>,
        active_deck_id: Option<DeckId>,
        ui: UiState,
    ) -> Self {
        let known: HashSet<DeckId> = decks.iter().map(Deck::id).collect();
        cards_by_deck.retain(|deck_id, _| known.contains(deck_id));
        for deck in &decks {
            cards_by_deck.entry(deck.id()).or_default();
        }

        let active_deck_id = match active_deck_id {
            Some(id) if known.contains(&id) => Some(id),
            Some(_) => decks.first().map(Deck::id),
            None => None,
        };

        let mut state = Self {
            decks,
            cards_by_deck,
            active_deck_id,
            ui,
        };
        state.clamp_active_index();
        state
    }

    /// Builds the first-run state: two example decks, first one active.
    #[must_use]
    pub fn with_sample_data(now: DateTime<Utc>) -> Self {
        let mut state = Self::default();

        let spanish_id = state.seed_deck("Spanish Vocab", now);
        state.seed_card("Hola", "Hello", now);
        state.seed_card("Adiós", "Goodbye", now);
        state.seed_card("Gracias", "Thank you", now);

        state.seed_deck("Math Formulas", now);
        state.seed_card("Area of circle", "πr²", now);
        state.seed_card("Pythagorean theorem", "a² + b² = c²", now);

        state.select_deck(spanish_id);
        state
    }

    fn seed_deck(&mut self, name: &str, now: DateTime<Utc>) -> DeckId {
        let deck =
            Deck::new(DeckId::generate(), name, now).expect("sample deck name is non-empty");
        let id = deck.id();
        self.insert_deck(deck);
        id
    }

    fn seed_card(&mut self, front: &str, back: &str, now: DateTime<Utc>) {
        let card = CardDraft::new(front, back)
            .validate(now)
            .expect("sample card faces are non-empty")
            .assign_id(CardId::generate());
        self.insert_card(card);
    }

    //
    // ─── QUERIES ───────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn decks(&self) -> &[Deck] {
        &self.decks
    }

    #[must_use]
    pub fn deck(&self, id: DeckId) -> Option<&Deck> {
        self.decks.iter().find(|deck| deck.id() == id)
    }

    #[must_use]
    pub fn active_deck_id(&self) -> Option<DeckId> {
        self.active_deck_id
    }

    #[must_use]
    pub fn active_deck(&self) -> Option<&Deck> {
        self.active_deck_id.and_then(|id| self.deck(id))
    }

    #[must_use]
    pub fn cards_for_deck(&self, id: DeckId) -> &[Card] {
        self.cards_by_deck.get(&id).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    /// Cards of the active deck matching the current search query.
    ///
    /// Recomputed on every call, never cached. An empty or whitespace-only
    /// query matches every card.
    #[must_use]
    pub fn filtered_cards(&self) -> Vec<&Card> {
        let Some(deck_id) = self.active_deck_id else {
            return Vec::new();
        };
        let cards = self.cards_for_deck(deck_id);
        let query = self.ui.search_query.trim().to_lowercase();
        if query.is_empty() {
            return cards.iter().collect();
        }
        cards.iter().filter(|card| card.matches_query(&query)).collect()
    }

    /// The card at the clamped active index of the filtered list.
    #[must_use]
    pub fn active_card(&self) -> Option<&Card> {
        let filtered = self.filtered_cards();
        if filtered.is_empty() {
            return None;
        }
        let index = self.ui.active_card_index.min(filtered.len() - 1);
        Some(filtered[index])
    }

    //
    // ─── DECK UPDATES ──────────────────────────────────────────────────────────
    //

    /// Registers a deck with an empty card list and makes it active.
    pub fn insert_deck(&mut self, deck: Deck) {
        let id = deck.id();
        self.cards_by_deck.entry(id).or_default();
        self.decks.push(deck);
        self.activate(Some(id));
    }

    /// Renames a deck. `Ok(false)` when no deck has the given id.
    ///
    /// # Errors
    ///
    /// Returns `DeckError::EmptyName` for an empty or whitespace-only name.
    pub fn rename_deck(
        &mut self,
        id: DeckId,
        name: impl Into<String>,
    ) -> Result<bool, DeckError> {
        let Some(deck) = self.decks.iter_mut().find(|deck| deck.id() == id) else {
            return Ok(false);
        };
        deck.rename(name)?;
        Ok(true)
    }

    /// Removes a deck and its card list in one step.
    ///
    /// When the removed deck was active, the first remaining deck becomes
    /// active (or none) and the transient view state resets. Returns `false`
    /// when no deck had the given id.
    pub fn remove_deck(&mut self, id: DeckId) -> bool {
        let before = self.decks.len();
        self.decks.retain(|deck| deck.id() != id);
        if self.decks.len() == before {
            return false;
        }
        self.cards_by_deck.remove(&id);

        if self.active_deck_id == Some(id) {
            self.activate(self.decks.first().map(Deck::id));
        }
        true
    }

    /// Makes the given deck active, resetting the transient view state.
    ///
    /// Returns `false` (and changes nothing) when no deck has the given id.
    pub fn select_deck(&mut self, id: DeckId) -> bool {
        if self.deck(id).is_none() {
            return false;
        }
        self.activate(Some(id));
        true
    }

    fn activate(&mut self, id: Option<DeckId>) {
        self.active_deck_id = id;
        self.ui.reset();
    }

    //
    // ─── CARD UPDATES ──────────────────────────────────────────────────────────
    //

    /// Appends a card to the active deck and makes it the active card.
    ///
    /// Returns `false` when no deck is active. The new index is clamped
    /// against the filtered list, so with a live search query that excludes
    /// the new card the selection lands on the last match instead.
    pub fn insert_card(&mut self, card: Card) -> bool {
        let Some(deck_id) = self.active_deck_id else {
            return false;
        };
        let cards = self.cards_by_deck.entry(deck_id).or_default();
        cards.push(card);
        self.ui.active_card_index = cards.len() - 1;
        self.ui.is_flipped = false;
        self.clamp_active_index();
        true
    }

    /// Edits a card of the active deck. `Ok(false)` when the card (or an
    /// active deck) is missing.
    ///
    /// # Errors
    ///
    /// Returns `CardError` when either face fails validation.
    pub fn update_card(
        &mut self,
        id: CardId,
        front: &str,
        back: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, CardError> {
        let Some(deck_id) = self.active_deck_id else {
            return Ok(false);
        };
        let Some(card) = self
            .cards_by_deck
            .get_mut(&deck_id)
            .and_then(|cards| cards.iter_mut().find(|card| card.id() == id))
        else {
            return Ok(false);
        };
        card.edit(front, back, now)?;
        self.ui.is_flipped = false;
        self.clamp_active_index();
        Ok(true)
    }

    /// Removes a card from the active deck; `false` when it is missing.
    pub fn remove_card(&mut self, id: CardId) -> bool {
        let Some(deck_id) = self.active_deck_id else {
            return false;
        };
        let Some(cards) = self.cards_by_deck.get_mut(&deck_id) else {
            return false;
        };
        let Some(position) = cards.iter().position(|card| card.id() == id) else {
            return false;
        };
        cards.remove(position);
        self.ui.is_flipped = false;
        self.clamp_active_index();
        true
    }

    /// Selects a card of the active deck by id, clearing the search query
    /// first so the selection is made against the full list.
    pub fn select_card(&mut self, id: CardId) -> bool {
        let Some(deck_id) = self.active_deck_id else {
            return false;
        };
        let Some(index) = self
            .cards_for_deck(deck_id)
            .iter()
            .position(|card| card.id() == id)
        else {
            return false;
        };
        self.ui.search_query.clear();
        self.ui.active_card_index = index;
        self.ui.is_flipped = false;
        true
    }

    //
    // ─── STUDY / NAVIGATION ────────────────────────────────────────────────────
    //

    /// Replaces the search query, rewinding to the first match.
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.ui.search_query = query.into();
        self.ui.active_card_index = 0;
        self.ui.is_flipped = false;
    }

    pub fn toggle_flip(&mut self) {
        self.ui.is_flipped = !self.ui.is_flipped;
    }

    /// Moves the selection by `offset` within the filtered list, wrapping
    /// circularly, and unflips the card. Returns `false` when the filtered
    /// list is empty.
    pub fn advance(&mut self, offset: isize) -> bool {
        let count = self.filtered_cards().len();
        if count == 0 {
            return false;
        }
        let current = self.ui.active_card_index.min(count - 1) as isize;
        let next = (current + offset).rem_euclid(count as isize);
        self.ui.active_card_index = next as usize;
        self.ui.is_flipped = false;
        true
    }

    /// Jumps to the given filtered index (clamped) and unflips the card.
    /// Returns `false` when the filtered list is empty.
    pub fn jump_to(&mut self, index: usize) -> bool {
        let count = self.filtered_cards().len();
        if count == 0 {
            return false;
        }
        self.ui.active_card_index = index.min(count - 1);
        self.ui.is_flipped = false;
        true
    }

    /// Clamps the active card index into `[0, filtered_count)`; 0 when the
    /// filtered list is empty.
    pub fn clamp_active_index(&mut self) {
        let count = self.filtered_cards().len();
        if count == 0 {
            self.ui.active_card_index = 0;
        } else if self.ui.active_card_index >= count {
            self.ui.active_card_index = count - 1;
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
