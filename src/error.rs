//! Error types surfaced by hand parsing and ruleset construction.
use thiserror::Error;

/// Reasons a hand string cannot be scored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandError {
    #[error("more than one unsplit residual: {}", .0.join(" "))]
    MoreThanOneResidual(Vec<String>),

    #[error("residual tiles do not split into melds, left over: {0:?}")]
    UnsplittableResidual(String),

    #[error("invalid melds: {}", .0.join(" "))]
    InvalidMeld(Vec<String>),

    #[error("hand has no status token (m... or M...)")]
    MissingSuffix,

    #[error("hand has more than one status token: {}", .0.join(" "))]
    MultipleSuffixes(Vec<String>),

    #[error("malformed status token {0:?}")]
    BadSuffix(String),

    #[error("malformed limit token {0:?}")]
    BadLimit(String),

    #[error("wrong number of tiles: won={won}, tiles={tile_count}, kongs={kan_count}")]
    WrongTileCount { won: bool, tile_count: usize, kan_count: usize },
}

/// Ruleset build-time failures. These are fatal: a predefined ruleset that
/// fails to build is a programming error in its rule table.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("rule {rule:?}: bad regex")]
    Regex {
        rule: String,
        #[source]
        source: regex::Error,
    },

    #[error("rule {rule:?}: {source}")]
    Expression {
        rule: String,
        #[source]
        source: crate::dsl::ParseError,
    },

    #[error("rule {rule:?}: unknown variant flag {flag:?}")]
    BadFlag { rule: String, flag: char },

    #[error("rule {0:?} has an empty variant")]
    EmptyVariant(String),

    #[error("unknown ruleset {0:?}")]
    UnknownRuleset(String),
}
