//! Scoring of classical Chinese Mahjong hands.
//!
//! A hand is a whitespace separated string of melds, an optional unsplit
//! residual, a status token and an optional `L<nnnn>` limit token:
//!
//! ```text
//! s1s1s1 B2B3B4 wewewewe DrDr c7c8c9 fe Mesc9w
//! ```
//!
//! [`Hand::new`] parses and validates it against a [`Ruleset`] and
//! [`Hand::score`] applies the ruleset's meld, hand, mah jongg and limit
//! rules.
pub mod decompose;
pub mod dsl;
pub mod error;
pub mod hand;
pub mod meld;
pub mod pairs;
pub mod pattern;
pub mod rule;
pub mod ruleset;
pub mod split;
pub mod suffix;
pub mod tile;
pub mod variant;

pub use error::{HandError, RuleError};
pub use hand::{Hand, Score};
pub use meld::Meld;
pub use ruleset::{Ruleset, RulesetParams};
pub use tile::Tile;

/// Parses and scores a single hand.
pub fn score(ruleset: &Ruleset, hand: &str) -> Result<u64, HandError> {
    Ok(Hand::new(ruleset, hand)?.score())
}
