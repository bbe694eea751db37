//! Loading hands, meld groupings and rule configuration from text and JSON.

pub mod load;
pub mod schema;

pub use load::*;
pub use schema::*;
