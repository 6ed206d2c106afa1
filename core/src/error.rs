use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("No cards left in the deck")]
    DeckExhausted,
    #[error("Card number {0} is out of range")]
    InvalidCardNumber(u8),
    #[error("Invalid card label: {0:?}")]
    InvalidCardLabel(String),
    #[error("Malformed amount text: {0:?}")]
    MalformedAmount(String),
    #[error("Bounds or texture size must be non-zero")]
    InvalidGeometry,
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Required collaborator is missing: {0}")]
    MissingCollaborator(String),
}

pub type Result<T> = core::result::Result<T, GameError>;
