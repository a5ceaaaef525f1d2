//! Card encoding, deterministic shuffle, and 7-card hand evaluation.
//!
//! ## Representation
//!
//! - [`Rank`] / [`Suit`] — the two axes of a card
//! - [`Card`] — a single card, encoded as `rank * 4 + suit` in `0..52`
//! - [`CardSet`] — an unordered set of cards as a 64-bit bitmask, used
//!   internally by the evaluator for fast bitwise rank/suit queries
//!
//! ## Dealing
//!
//! - [`Deck`] — a deterministic, seed-reproducible shuffle with burn/deal
//!   helpers and a SHA-256 commitment of the post-shuffle order
//!
//! ## Evaluation
//!
//! - [`Score`] — a total order over 5-to-7 card hands, **lower is better**
//! - [`Ranking`] — the hand category (straight flush, quads, ...) backing a score
//! - [`Evaluator`] — computes a [`Score`] from up to 7 [`Card`]s
mod card;
mod cardset;
mod deck;
mod evaluator;
mod kickers;
mod rank;
mod ranking;
mod score;
mod suit;

pub use card::*;
pub use cardset::*;
pub use deck::*;
pub use evaluator::*;
pub use kickers::*;
pub use rank::*;
pub use ranking::*;
pub use score::*;
pub use suit::*;
