use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("round must be 1-11, got {0}")]
    InvalidRound(u32),
    #[error("invalid rank token: {0:?}")]
    InvalidRank(String),
    #[error("invalid suit token: {0:?}")]
    InvalidSuit(String),
    #[error("invalid card token: {0:?}")]
    InvalidCard(String),
    #[error("deck has {remaining} cards left, {needed} needed")]
    NotEnoughCards { needed: usize, remaining: usize },
}
