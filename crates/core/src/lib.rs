//! Meld rules for Five Crowns. Keep this crate free of IO and platform concerns.
//!
//! Every operation is a pure function of an explicit hand and wild rank;
//! nothing is cached between calls.

pub mod cards;
pub mod config;
pub mod deck;
pub mod error;
pub mod finder;
pub mod melds;
pub mod scoring;
pub mod wild;

pub use cards::*;
pub use config::*;
pub use deck::*;
pub use error::*;
pub use finder::*;
pub use melds::*;
pub use scoring::*;
pub use wild::*;
