mod card;
mod deck;
mod ids;
mod theme;

pub use card::{Card, CardDraft, CardError, ValidatedCard};
pub use deck::{Deck, DeckError};
pub use ids::{CardId, DeckId, ParseIdError};
pub use theme::{ParseThemeError, ThemePreference};
