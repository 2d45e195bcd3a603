//! Pure projections from `AppState` to render-ready view models.
//!
//! These replace the original renderer: every label the document view
//! showed (deck counts, card position, search status, empty-state hints)
//! is derived here from the state tree, so a frontend only has to paint.

use flashcards_core::AppState;
use flashcards_core::model::{CardId, Deck, DeckId};

/// Longest card front shown in the sidebar before truncation.
const SIDEBAR_LABEL_CHARS: usize = 28;

/// One entry of the deck sidebar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeckListItem {
    pub id: DeckId,
    pub name: String,
    pub card_count: usize,
    pub count_label: String,
    pub is_active: bool,
}

/// One entry of the card sidebar for the active deck.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardListItem {
    pub id: CardId,
    pub label: String,
    pub is_active: bool,
}

/// The main study area.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StudyView {
    /// No deck selected; the frontend shows its empty state.
    NoDeck,
    Deck(DeckView),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeckView {
    pub title: String,
    /// "N cards • Created Mon D, YYYY"
    pub meta_label: String,
    /// Present while a search query is active, e.g. "Search “hola” — 1 match."
    pub search_status: Option<String>,
    pub body: DeckBody,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeckBody {
    /// Nothing to study: either the deck is empty or no card matches.
    Empty {
        front_hint: String,
        back_hint: String,
        /// "0 of N" over the unfiltered count.
        position_label: String,
    },
    Card(CardFace),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardFace {
    pub id: CardId,
    pub front: String,
    pub back: String,
    pub is_flipped: bool,
    /// "Card i of n" over the filtered count.
    pub position_label: String,
}

/// Projects the deck sidebar.
#[must_use]
pub fn deck_list(state: &AppState) -> Vec<DeckListItem> {
    state
        .decks()
        .iter()
        .map(|deck| {
            let card_count = state.cards_for_deck(deck.id()).len();
            DeckListItem {
                id: deck.id(),
                name: deck.name().to_owned(),
                card_count,
                count_label: count_noun(card_count, "card", "cards"),
                is_active: state.active_deck_id() == Some(deck.id()),
            }
        })
        .collect()
}

/// Projects the card sidebar for the active deck (unfiltered, with the
/// filtered active card highlighted).
#[must_use]
pub fn card_list(state: &AppState) -> Vec<CardListItem> {
    let Some(deck_id) = state.active_deck_id() else {
        return Vec::new();
    };
    let active_id = state.active_card().map(|card| card.id());
    state
        .cards_for_deck(deck_id)
        .iter()
        .map(|card| CardListItem {
            id: card.id(),
            label: truncated(card.front(), SIDEBAR_LABEL_CHARS),
            is_active: active_id == Some(card.id()),
        })
        .collect()
}

/// Projects the main study area.
#[must_use]
pub fn study_view(state: &AppState) -> StudyView {
    let Some(deck) = state.active_deck() else {
        return StudyView::NoDeck;
    };

    let total = state.cards_for_deck(deck.id()).len();
    let filtered = state.filtered_cards();
    let query = state.ui().search_query.trim().to_owned();

    let search_status = if query.is_empty() {
        None
    } else {
        Some(format!(
            "Search “{query}” — {}.",
            count_noun(filtered.len(), "match", "matches")
        ))
    };

    let body = if filtered.is_empty() {
        let (front_hint, back_hint) = if query.is_empty() {
            (
                "No cards in this deck yet.".to_owned(),
                "Use “New Card” to add your first card.".to_owned(),
            )
        } else {
            (
                "No cards match your search.".to_owned(),
                "Try another keyword or clear the search.".to_owned(),
            )
        };
        DeckBody::Empty {
            front_hint,
            back_hint,
            position_label: format!("0 of {total}"),
        }
    } else {
        let index = state.ui().active_card_index.min(filtered.len() - 1);
        let card = filtered[index];
        DeckBody::Card(CardFace {
            id: card.id(),
            front: card.front().to_owned(),
            back: card.back().to_owned(),
            is_flipped: state.ui().is_flipped,
            position_label: format!("Card {} of {}", index + 1, filtered.len()),
        })
    };

    StudyView::Deck(DeckView {
        title: deck.name().to_owned(),
        meta_label: meta_label(deck, total),
        search_status,
        body,
    })
}

fn meta_label(deck: &Deck, total: usize) -> String {
    format!(
        "{} • Created {}",
        count_noun(total, "card", "cards"),
        deck.created_at().format("%b %-d, %Y")
    )
}

fn count_noun(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

fn truncated(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let label: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{label}…")
    } else {
        label
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
    fn deck_list_marks_the_active_deck_and_counts_cards() {
        let state = sample_state();
        let items = deck_list(&state);

        assert_eq!(items.len(), 2);
        assert!(items[0].is_active);
        assert!(!items[1].is_active);
        assert_eq!(items[0].count_label, "3 cards");
        assert_eq!(items[1].count_label, "2 cards");
    }

    #[test]
    fn card_list_shows_full_deck_even_while_filtering() {
        let mut state = sample_state();
        state.set_search_query("gracias");

        let items = card_list(&state);
        assert_eq!(items.len(), 3);
        let active: Vec<_> = items.iter().filter(|item| item.is_active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].label, "Gracias");
    }

    #[test]
    fn card_list_truncates_long_fronts() {
        let long = "a".repeat(40);
        assert_eq!(truncated(&long, SIDEBAR_LABEL_CHARS).chars().count(), 29);
        assert!(truncated(&long, SIDEBAR_LABEL_CHARS).ends_with('…'));
        assert_eq!(truncated("short", SIDEBAR_LABEL_CHARS), "short");
    }

    #[test]
    fn study_view_without_decks_is_no_deck() {
        let state = AppState::default();
        assert_eq!(study_view(&state), StudyView::NoDeck);
    }

    #[test]
    fn study_view_shows_current_card_and_position() {
        let mut state = sample_state();
        state.advance(1);

        let StudyView::Deck(view) = study_view(&state) else {
            panic!("expected deck view");
        };
        assert_eq!(view.title, "Spanish Vocab");
        assert_eq!(view.meta_label, "3 cards • Created Jan 1, 2025");
        assert_eq!(view.search_status, None);

        let DeckBody::Card(face) = view.body else {
            panic!("expected card body");
        };
        assert_eq!(face.front, "Adiós");
        assert_eq!(face.position_label, "Card 2 of 3");
        assert!(!face.is_flipped);
    }

    #[test]
    fn study_view_reports_search_matches() {
        let mut state = sample_state();
        state.set_search_query("hola");

        let StudyView::Deck(view) = study_view(&state) else {
            panic!("expected deck view");
        };
        assert_eq!(view.search_status.as_deref(), Some("Search “hola” — 1 match."));

        let DeckBody::Card(face) = view.body else {
            panic!("expected card body");
        };
        assert_eq!(face.front, "Hola");
        assert_eq!(face.position_label, "Card 1 of 1");
    }

    #[test]
    fn study_view_distinguishes_no_match_from_empty_deck() {
        let mut state = sample_state();
        state.set_search_query("zzz");

        let StudyView::Deck(view) = study_view(&state) else {
            panic!("expected deck view");
        };
        assert_eq!(
            view.search_status.as_deref(),
            Some("Search “zzz” — 0 matches.")
        );
        let DeckBody::Empty {
            front_hint,
            position_label,
            ..
        } = view.body
        else {
            panic!("expected empty body");
        };
        assert_eq!(front_hint, "No cards match your search.");
        assert_eq!(position_label, "0 of 3");

        // Truly empty deck shows the other hint.
        let mut state = AppState::default();
        let deck =
            flashcards_core::model::Deck::new(DeckId::generate(), "Empty", fixed_now()).unwrap();
        state.insert_deck(deck);
        let StudyView::Deck(view) = study_view(&state) else {
            panic!("expected deck view");
        };
        let DeckBody::Empty { front_hint, .. } = view.body else {
            panic!("expected empty body");
        };
        assert_eq!(front_hint, "No cards in this deck yet.");
    }

    #[test]
    fn flip_state_is_projected() {
        let mut state = sample_state();
        state.toggle_flip();

        let StudyView::Deck(view) = study_view(&state) else {
            panic!("expected deck view");
        };
        let DeckBody::Card(face) = view.body else {
            panic!("expected card body");
        };
        assert!(face.is_flipped);
    }
}
