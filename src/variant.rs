//! The ways a rule can recognize a hand or a meld.
use crate::decompose;
use crate::dsl::{self, ParseError};
use crate::meld::{Meld, MeldState, MeldType};
use crate::pattern::{Pattern, Slot};
use crate::suffix::Suffix;
use regex::Regex;
use std::borrow::Cow;

/// Which canonical string a regex variant runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Normalized,
    Summary,
    Original,
}

#[derive(Debug, Clone)]
pub struct RegexVariant {
    pub regex: Regex,
    pub target: Target,
    pub case_insensitive: bool,
}

impl RegexVariant {
    #[must_use]
    pub fn is_match(&self, subject: &Subject<'_>) -> bool {
        let text = match self.target {
            Target::Normalized => subject.normalized,
            Target::Summary => subject.summary,
            Target::Original => subject.original,
        };
        let text = if self.case_insensitive {
            Cow::Owned(text.to_ascii_lowercase())
        } else {
            Cow::Borrowed(text)
        };
        self.regex.is_match(&text)
    }
}

#[derive(Debug, Clone)]
pub enum Variant {
    Regex(RegexVariant),
    Pattern(Pattern),
    /// Self-drawn with four concealed pungs or kongs.
    MjHiddenTreasure,
    /// The last tile completed a pair the slot accepts.
    LastTileCompletes(Slot),
    /// The last tile was the only tile that could complete the hand.
    OnlyPossibleTile,
}

/// Everything a variant may look at. For a meld rule the melds are the single
/// meld and every text is its content followed by the status token.
#[derive(Debug, Clone, Copy)]
pub struct Subject<'a> {
    pub melds: &'a [Meld],
    pub suffix: &'a Suffix,
    pub normalized: &'a str,
    pub summary: &'a str,
    pub original: &'a str,
}

/// Error from [`Variant::parse`].
#[derive(Debug, thiserror::Error)]
pub enum VariantError {
    #[error(transparent)]
    Regex(regex::Error),
    #[error(transparent)]
    Expression(ParseError),
    #[error("unknown variant flag {0:?}")]
    Flag(char),
    #[error("empty variant")]
    Empty,
}

impl Variant {
    /// Parses `P<expression>` as a pattern expression, otherwise the first
    /// character selects the regex target: `N` normalized, `I` normalized
    /// and case-insensitive, `S` summary, `O` original.
    pub fn parse(src: &str) -> Result<Self, VariantError> {
        let mut chars = src.chars();
        let flag = chars.next().ok_or(VariantError::Empty)?;
        let body = chars.as_str();
        let (target, case_insensitive) = match flag {
            'P' => return dsl::parse(body).map_err(VariantError::Expression),
            'N' => (Target::Normalized, false),
            'I' => (Target::Normalized, true),
            'S' => (Target::Summary, false),
            'O' => (Target::Original, false),
            other => return Err(VariantError::Flag(other)),
        };
        let regex = Regex::new(body).map_err(VariantError::Regex)?;
        Ok(Self::Regex(RegexVariant {
            regex,
            target,
            case_insensitive,
        }))
    }

    #[must_use]
    pub fn applies(&self, subject: &Subject<'_>) -> bool {
        match self {
            Self::Regex(r) => r.is_match(subject),
            Self::Pattern(p) => p.matches(subject.melds, subject.suffix),
            Self::MjHiddenTreasure => hidden_treasure(subject),
            Self::LastTileCompletes(slot) => last_tile_completes(slot, subject),
            Self::OnlyPossibleTile => decompose::only_possible_tile(subject.melds, subject.suffix),
        }
    }
}

fn hidden_treasure(subject: &Subject<'_>) -> bool {
    if subject.suffix.last_source != Some('w') {
        return false;
    }
    let concealed_sets = subject
        .melds
        .iter()
        .filter(|m| match m.meld_type() {
            Some(MeldType::ClaimedKong) => true,
            Some(MeldType::Pung | MeldType::Kong) => m.state() == MeldState::Concealed,
            _ => false,
        })
        .count();
    concealed_sets == 4
}

fn last_tile_completes(slot: &Slot, subject: &Subject<'_>) -> bool {
    let Some(last) = subject.suffix.last_tile else {
        return false;
    };
    let token = last.to_string();
    let pair = Meld::new(&token.repeat(2));
    pair.is_pair()
        && subject.melds.iter().any(|m| m.is_pair() && m.same_tiles(&pair))
        && slot.accepts(&pair, subject.suffix.own_wind, subject.suffix.round_wind)
}

#[cfg(test)]
pub mod test {
    use super::*;

    fn subject_for<'a>(melds: &'a [Meld], suffix: &'a Suffix, normalized: &'a str) -> Subject<'a> {
        Subject {
            melds,
            suffix,
            normalized,
            summary: "",
            original: normalized,
        }
    }

    #[test]
    pub fn regex_flags() {
        let melds: [Meld; 0] = [];
        let suffix: Suffix = "MweDrw".parse().unwrap();
        let subject = subject_for(&melds, &suffix, "DrDr s1s2s3 MweDrw");

        let Variant::Regex(exact) = Variant::parse(r"N\bdrdr\b").unwrap() else {
            panic!("not a regex");
        };
        assert!(!exact.is_match(&subject));
        let lowered = Variant::parse(r"I\bdrdr\b").unwrap();
        assert!(lowered.applies(&subject));
        let summary = Variant::parse("Sdrdr").unwrap();
        assert!(!summary.applies(&subject));
        assert!(matches!(Variant::parse("Xs1s1"), Err(VariantError::Flag('X'))));
        assert!(matches!(Variant::parse("PPung"), Ok(Variant::Pattern(_))));
        assert!(matches!(Variant::parse("N(unclosed"), Err(VariantError::Regex(_))));
        assert!(matches!(Variant::parse(""), Err(VariantError::Empty)));
    }

    #[test]
    pub fn hidden_treasure_needs_self_draw() {
        let melds: Vec<_> = ["S1S1S1", "s2S2S2s2", "c9c9c9C9", "B4B4B4", "DrDr"].map(Meld::new).into();
        let drawn: Suffix = "MeeB4w".parse().unwrap();
        let discarded: Suffix = "MeeB4d".parse().unwrap();
        assert!(Variant::MjHiddenTreasure.applies(&subject_for(&melds, &drawn, "")));
        assert!(!Variant::MjHiddenTreasure.applies(&subject_for(&melds, &discarded, "")));

        let exposed: Vec<_> = ["s1s1s1", "s2S2S2s2", "c9c9c9C9", "B4B4B4", "DrDr"].map(Meld::new).into();
        assert!(!Variant::MjHiddenTreasure.applies(&subject_for(&exposed, &drawn, "")));
    }

    #[test]
    pub fn last_tile_completes_pair() {
        let Ok(variant) = Variant::parse("PLastTileCompletes(NoSimple(Pair))") else {
            panic!("bad expression");
        };
        let melds: Vec<_> = ["DrDr", "s1s2s3"].map(Meld::new).into();
        let suffix: Suffix = "MweDrw".parse().unwrap();
        assert!(variant.applies(&subject_for(&melds, &suffix, "")));

        let suffix: Suffix = "MweS2w".parse().unwrap();
        assert!(!variant.applies(&subject_for(&melds, &suffix, "")));

        let no_pair: Vec<_> = ["DrDrDr", "s1s2s3"].map(Meld::new).into();
        let suffix: Suffix = "MweDrw".parse().unwrap();
        assert!(!variant.applies(&subject_for(&no_pair, &suffix, "")));
    }
}
