#![forbid(unsafe_code)]

pub mod app_service;
pub mod error;
pub mod view;

pub use flashcards_core::Clock;

pub use app_service::AppService;
pub use error::{CardServiceError, DeckServiceError};
pub use view::{
    CardFace, CardListItem, DeckBody, DeckListItem, DeckView, StudyView, card_list, deck_list,
    study_view,
};
