//! The single operation surface over the application state.
//!
//! Control flow mirrors the original app: every user action mutates the
//! state tree, re-clamps the transient indices, persists the result, and
//! leaves re-rendering to the caller via the view projections. Persistence
//! failures never surface here; the in-memory state stays authoritative.

use flashcards_core::model::{CardDraft, CardId, Deck, DeckId, ThemePreference};
use flashcards_core::{AppState, Clock};
use rand::Rng;
use storage::StateRepository;

use crate::error::{CardServiceError, DeckServiceError};

/// Owns the application state and mirrors every mutation to storage.
pub struct AppService {
    state: AppState,
    repo: StateRepository,
    clock: Clock,
}

impl AppService {
    /// Loads persisted state (or defaults) and seeds the two example decks
    /// on first run, mirroring the original page-load path.
    #[must_use]
    pub fn bootstrap(repo: StateRepository, clock: Clock) -> Self {
        let mut state = repo.load();
        if state.decks().is_empty() {
            state = AppState::with_sample_data(clock.now());
            repo.save(&state);
        }
        Self { state, repo, clock }
    }

    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    fn persist(&self) {
        self.repo.save(&self.state);
    }

    //
    // ─── DECK OPERATIONS ───────────────────────────────────────────────────────
    //

    /// Creates a deck, makes it active, and persists.
    ///
    /// # Errors
    ///
    /// Returns `DeckServiceError::Deck` for an empty name.
    pub fn create_deck(&mut self, name: &str) -> Result<DeckId, DeckServiceError> {
        let deck = Deck::new(DeckId::generate(), name, self.clock.now())?;
        let id = deck.id();
        self.state.insert_deck(deck);
        self.persist();
        Ok(id)
    }

    /// Renames a deck; `Ok(false)` no-op when the id is unknown.
    ///
    /// # Errors
    ///
    /// Returns `DeckServiceError::Deck` for an empty name.
    pub fn rename_deck(&mut self, id: DeckId, name: &str) -> Result<bool, DeckServiceError> {
        let applied = self.state.rename_deck(id, name)?;
        if applied {
            self.persist();
        }
        Ok(applied)
    }

    /// Deletes a deck and its cards; no-op when the id is unknown.
    pub fn delete_deck(&mut self, id: DeckId) -> bool {
        let applied = self.state.remove_deck(id);
        if applied {
            self.persist();
        }
        applied
    }

    /// Switches the active deck; no-op when the id is unknown.
    pub fn select_deck(&mut self, id: DeckId) -> bool {
        let applied = self.state.select_deck(id);
        if applied {
            self.persist();
        }
        applied
    }

    //
    // ─── CARD OPERATIONS ───────────────────────────────────────────────────────
    //

    /// Creates a card in the active deck and makes it the active card.
    ///
    /// Returns `Ok(None)` as a no-op when no deck is active.
    ///
    /// # Errors
    ///
    /// Returns `CardServiceError::Card` when either face is empty.
    pub fn create_card(
        &mut self,
        front: &str,
        back: &str,
    ) -> Result<Option<CardId>, CardServiceError> {
        if self.state.active_deck().is_none() {
            return Ok(None);
        }
        let card = CardDraft::new(front, back)
            .validate(self.clock.now())?
            .assign_id(CardId::generate());
        let id = card.id();
        if !self.state.insert_card(card) {
            return Ok(None);
        }
        self.persist();
        Ok(Some(id))
    }

    /// Edits a card of the active deck; `Ok(false)` no-op when missing.
    ///
    /// # Errors
    ///
    /// Returns `CardServiceError::Card` when either face is empty.
    pub fn update_card(
        &mut self,
        id: CardId,
        front: &str,
        back: &str,
    ) -> Result<bool, CardServiceError> {
        let applied = self.state.update_card(id, front, back, self.clock.now())?;
        if applied {
            self.persist();
        }
        Ok(applied)
    }

    /// Deletes a card of the active deck; no-op when missing.
    pub fn delete_card(&mut self, id: CardId) -> bool {
        let applied = self.state.remove_card(id);
        if applied {
            self.persist();
        }
        applied
    }

    /// Selects a card of the active deck by id, clearing the search query.
    pub fn select_card(&mut self, id: CardId) -> bool {
        let applied = self.state.select_card(id);
        if applied {
            self.persist();
        }
        applied
    }

    //
    // ─── STUDY CONTROLS ────────────────────────────────────────────────────────
    //

    pub fn toggle_flip(&mut self) {
        self.state.toggle_flip();
        self.persist();
    }

    /// Moves to the next filtered card, wrapping past the last to the first.
    pub fn next_card(&mut self) -> bool {
        let applied = self.state.advance(1);
        if applied {
            self.persist();
        }
        applied
    }

    /// Moves to the previous filtered card, wrapping before the first to
    /// the last.
    pub fn previous_card(&mut self) -> bool {
        let applied = self.state.advance(-1);
        if applied {
            self.persist();
        }
        applied
    }

    /// Jumps to a uniformly random filtered card distinct from the current
    /// one; no-op unless more than one card is available.
    pub fn shuffle_card(&mut self) -> bool {
        let count = self.state.filtered_cards().len();
        if count <= 1 {
            return false;
        }
        let current = self.state.ui().active_card_index.min(count - 1);
        let mut rng = rand::rng();
        let mut next = current;
        while next == current {
            next = rng.random_range(0..count);
        }
        self.state.jump_to(next);
        self.persist();
        true
    }

    /// Replaces the search query and rewinds to the first match.
    pub fn set_search_query(&mut self, query: &str) {
        self.state.set_search_query(query);
        self.persist();
    }

    //
    // ─── THEME ─────────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn theme(&self) -> ThemePreference {
        self.repo.load_theme()
    }

    pub fn set_theme(&self, theme: ThemePreference) {
        self.repo.save_theme(theme);
    }

    /// Flips between light and dark and persists the result.
    pub fn toggle_theme(&self) -> ThemePreference {
        let next = self.theme().toggled();
        self.set_theme(next);
        next
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
