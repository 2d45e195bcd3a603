//! Shared error types for the services crate.

use thiserror::Error;

use flashcards_core::model::{CardError, DeckError};

/// Errors emitted by deck operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DeckServiceError {
    #[error(transparent)]
    Deck(#[from] DeckError),
}

/// Errors emitted by card operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CardServiceError {
    #[error(transparent)]
    Card(#[from] CardError),
}
