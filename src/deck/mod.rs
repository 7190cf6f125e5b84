//! Deck generation.
//!
//! A theme names an emoji pool; the generator duplicates each selected value
//! into a pair, applies a uniform shuffle and numbers the result. Decks are
//! `im::Vector`s so session snapshots handed to the UI clone in O(1).

mod generator;
pub mod pools;

pub use generator::DeckGenerator;
