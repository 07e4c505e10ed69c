use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid card id")]
    InvalidCardId,
    #[error("Every symbol must appear exactly twice")]
    UnpairedSymbol,
    #[error("Deck has no cards")]
    EmptyDeck,
    #[error("Too many pairs for the symbol alphabet")]
    TooManyPairs,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
}

pub type Result<T> = core::result::Result<T, GameError>;
