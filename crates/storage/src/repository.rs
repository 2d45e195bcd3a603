//! Load/save contract over a key-value store.
//!
//! `load` never fails: a missing key, an unreadable backend, a parse error,
//! or a version mismatch all degrade to the default state. `save` swallows
//! failures after logging them; the in-memory state stays authoritative for
//! the rest of the session and the previously persisted document simply
//! goes stale.

use std::sync::Arc;

use flashcards_core::AppState;
use flashcards_core::model::ThemePreference;
use tracing::warn;

use crate::document::StateDocument;
use crate::store::KeyValueStore;

/// Storage key for the serialized application state document.
pub const STATE_KEY: &str = "flashcards-app-state";

/// Storage key for the theme preference value.
pub const THEME_KEY: &str = "flashcards-theme";

/// Version tag stamped into every persisted document. Any other stored
/// version discards the document wholesale; there is no migration logic.
pub const STORAGE_VERSION: u32 = 1;

/// Reads and writes the application state and theme preference.
#[derive(Clone)]
pub struct StateRepository {
    store: Arc<dyn KeyValueStore>,
}

impl StateRepository {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Loads the persisted state, or the default empty state when nothing
    /// usable is stored.
    #[must_use]
    pub fn load(&self) -> AppState {
        let raw = match self.store.read(STATE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return AppState::default(),
            Err(err) => {
                warn!("failed to read stored state, using defaults: {err}");
                return AppState::default();
            }
        };

        let document: StateDocument = match serde_json::from_str(&raw) {
            Ok(document) => document,
            Err(err) => {
                warn!("discarding unreadable state document: {err}");
                return AppState::default();
            }
        };

        if document.version != STORAGE_VERSION {
            warn!(
                "discarding state document with version {}, expected {STORAGE_VERSION}",
                document.version
            );
            return AppState::default();
        }

        document.into_state()
    }

    /// Serializes and writes the state. Failures are logged and swallowed.
    pub fn save(&self, state: &AppState) {
        let document = StateDocument::from_state(state);
        match serde_json::to_string(&document) {
            Ok(raw) => {
                if let Err(err) = self.store.write(STATE_KEY, &raw) {
                    warn!("failed to persist state, keeping in-memory copy: {err}");
                }
            }
            Err(err) => warn!("failed to serialize state document: {err}"),
        }
    }

    /// Loads the stored theme preference; anything unreadable or
    /// unrecognized falls back to the default light theme.
    #[must_use]
    pub fn load_theme(&self) -> ThemePreference {
        match self.store.read(THEME_KEY) {
            Ok(Some(value)) => value.parse().unwrap_or_default(),
            Ok(None) => ThemePreference::default(),
            Err(err) => {
                warn!("failed to read theme preference, using default: {err}");
                ThemePreference::default()
            }
        }
    }

    /// Writes the theme preference. Failures are logged and swallowed.
    pub fn save_theme(&self, theme: ThemePreference) {
        if let Err(err) = self.store.write(THEME_KEY, theme.as_str()) {
            warn!("failed to persist theme preference: {err}");
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use flashcards_core::time::fixed_now;

    fn repository_over(store: Arc<MemoryStore>) -> StateRepository {
        StateRepository::new(store)
    }

    #[test]
    fn load_with_nothing_stored_yields_default_state() {
        let repo = repository_over(Arc::new(MemoryStore::new()));
        assert_eq!(repo.load(), AppState::default());
    }

    #[test]
    fn load_discards_corrupted_document() {
        let store = Arc::new(MemoryStore::new());
        store.write(STATE_KEY, "{not json at all").unwrap();
        let repo = repository_over(store);
        assert_eq!(repo.load(), AppState::default());
    }

    #[test]
    fn load_discards_version_mismatch() {
        let store = Arc::new(MemoryStore::new());
        store
            .write(STATE_KEY, "{\"version\":2,\"decks\":[]}")
            .unwrap();
        let repo = repository_over(store);
        assert_eq!(repo.load(), AppState::default());
    }

    #[test]
    fn load_discards_document_without_version() {
        let store = Arc::new(MemoryStore::new());
        store.write(STATE_KEY, "{\"decks\":[]}").unwrap();
        let repo = repository_over(store);
        assert_eq!(repo.load(), AppState::default());
    }

    #[test]
    fn save_load_roundtrip_preserves_state() {
        let repo = repository_over(Arc::new(MemoryStore::new()));
        let state = AppState::with_sample_data(fixed_now());

        repo.save(&state);
        assert_eq!(repo.load(), state);

        // Repeated roundtrips stay stable.
        repo.save(&repo.load());
        assert_eq!(repo.load(), state);
    }

    #[test]
    fn load_salvages_top_level_fields_with_defaults() {
        let store = Arc::new(MemoryStore::new());
        store.write(STATE_KEY, "{\"version\":1}").unwrap();
        let repo = repository_over(store);
        assert_eq!(repo.load(), AppState::default());
    }

    #[test]
    fn theme_roundtrip_and_fallback() {
        let store = Arc::new(MemoryStore::new());
        let repo = repository_over(Arc::clone(&store));

        assert_eq!(repo.load_theme(), ThemePreference::Light);

        repo.save_theme(ThemePreference::Dark);
        assert_eq!(repo.load_theme(), ThemePreference::Dark);

        store.write(THEME_KEY, "sepia").unwrap();
        assert_eq!(repo.load_theme(), ThemePreference::Light);
    }
}
