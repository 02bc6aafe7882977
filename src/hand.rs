//! A parsed hand and its scoring driver.
use crate::error::HandError;
use crate::meld::Meld;
use crate::rule::Rule;
use crate::ruleset::Ruleset;
use crate::split::split;
use crate::suffix::{Suffix, parse_limit};
use crate::variant::Subject;
use serde::Serialize;
use std::slice;

#[derive(Debug, Clone)]
pub struct Hand<'a> {
    ruleset: &'a Ruleset,
    /// The hand string as given.
    pub original: String,
    /// Melds in canonical order, flowers and seasons excluded.
    pub melds: Vec<Meld>,
    /// Flowers and seasons in canonical order.
    pub fs_melds: Vec<Meld>,
    pub suffix: Suffix,
    /// Per-hand cap on the additive score, from an `L<nnnn>` token.
    pub limit_override: Option<u64>,
    pub base_points: u32,
    pub doubles: u32,
    pub explain: Vec<String>,
    pub found_limit_hands: Vec<String>,
    total: Option<u64>,
}

/// Snapshot of a scored hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Score {
    pub hand: String,
    pub total: u64,
    pub base_points: u32,
    pub doubles: u32,
    pub limit_hands: Vec<String>,
    pub explain: Vec<String>,
}

impl<'a> Hand<'a> {
    /// Parses and validates `s` under `ruleset`.
    pub fn new(ruleset: &'a Ruleset, s: &str) -> Result<Self, HandError> {
        let hand = Self::parse(ruleset, s);
        if let Err(e) = &hand {
            log::warn!("rejected hand {s:?}: {e}");
        }
        hand
    }

    fn parse(ruleset: &'a Ruleset, s: &str) -> Result<Self, HandError> {
        let mut suffixes = vec![];
        let mut residuals = vec![];
        let mut melds = vec![];
        let mut limit_override = None;
        for token in s.split_whitespace() {
            if Suffix::is_suffix_token(token) {
                suffixes.push(token);
            } else if token.starts_with('L') {
                limit_override = Some(parse_limit(token)?);
            } else if token.len() > 8 {
                residuals.push(token);
            } else {
                let meld = Meld::new(token);
                if !meld.is_valid() && token.starts_with(|c: char| c.is_ascii_uppercase()) {
                    residuals.push(token);
                } else {
                    melds.push(meld);
                }
            }
        }

        let suffix: Suffix = match suffixes.as_slice() {
            [] => return Err(HandError::MissingSuffix),
            [one] => one.parse()?,
            many => return Err(HandError::MultipleSuffixes(many.iter().map(|t| (*t).to_owned()).collect())),
        };

        match residuals.as_slice() {
            [] => {}
            [residual] => {
                let (carved, rest) = split(&ruleset.split_rules, residual);
                if !rest.is_empty() {
                    return Err(HandError::UnsplittableResidual(rest));
                }
                log::debug!("split {residual} into {carved:?}");
                melds.extend(carved.iter().map(|m| Meld::new(m)));
            }
            many => return Err(HandError::MoreThanOneResidual(many.iter().map(|t| (*t).to_owned()).collect())),
        }

        let invalid: Vec<_> = melds.iter().filter(|m| !m.is_valid()).map(|m| m.content().to_owned()).collect();
        if !invalid.is_empty() {
            return Err(HandError::InvalidMeld(invalid));
        }

        let (mut fs_melds, mut melds): (Vec<_>, Vec<_>) = melds.into_iter().partition(Meld::is_bonus);
        fs_melds.sort_by(Meld::canonical_cmp);
        melds.sort_by(Meld::canonical_cmp);

        let tile_count: usize = melds.iter().map(Meld::size).sum();
        let kan_count = melds.iter().filter(|m| m.is_kong()).count();
        let effective = tile_count - kan_count;
        let bad_count = if suffix.won { effective != 14 } else { effective > 13 };
        if bad_count {
            return Err(HandError::WrongTileCount {
                won: suffix.won,
                tile_count,
                kan_count,
            });
        }

        Ok(Self {
            ruleset,
            original: s.trim().to_owned(),
            melds,
            fs_melds,
            suffix,
            limit_override,
            base_points: 0,
            doubles: 0,
            explain: vec![],
            found_limit_hands: vec![],
            total: None,
        })
    }

    #[inline]
    #[must_use]
    pub const fn won(&self) -> bool {
        self.suffix.won
    }

    #[must_use]
    pub const fn ruleset(&self) -> &'a Ruleset {
        self.ruleset
    }

    /// Flowers and seasons, then melds, then the status token, all in
    /// canonical order and separated by spaces.
    #[must_use]
    pub fn normalized(&self) -> String {
        let parts: Vec<&str> = self
            .fs_melds
            .iter()
            .chain(&self.melds)
            .map(Meld::content)
            .chain([self.suffix.as_str()])
            .collect();
        parts.join(" ")
    }

    /// Flowers and seasons, then the summary encoding of every meld, then
    /// the status token, e.g. `fe ys/D202/B308/B000 MweDrw`.
    #[must_use]
    pub fn summary(&self) -> String {
        let fs: Vec<_> = self.fs_melds.iter().map(Meld::content).collect();
        let mut summary = fs.join(" ");
        for meld in &self.melds {
            summary.push('/');
            summary.push_str(&meld.regex());
        }
        summary.push(' ');
        summary.push_str(self.suffix.as_str());
        summary
    }

    /// Rules from `rules` that apply to the whole hand in its current state.
    #[must_use]
    pub fn matching_rules<'r>(&self, rules: &'r [Rule]) -> Vec<&'r Rule> {
        let normalized = self.normalized();
        let summary = self.summary();
        let subject = Subject {
            melds: &self.melds,
            suffix: &self.suffix,
            normalized: &normalized,
            summary: &summary,
            original: &self.original,
        };
        rules.iter().filter(|r| r.applies(&subject)).collect()
    }

    fn apply_meld_rules(&mut self) {
        let ruleset = self.ruleset;
        let rules = &ruleset.meld_rules;
        let suffix = &self.suffix;
        for meld in self.melds.iter_mut().chain(self.fs_melds.iter_mut()) {
            let text = format!("{} {}", meld.content(), suffix);
            let subject = Subject {
                melds: slice::from_ref(meld),
                suffix,
                normalized: &text,
                summary: &text,
                original: &text,
            };
            let matched: Vec<&Rule> = rules.iter().filter(|r| r.applies(&subject)).collect();
            for rule in matched {
                log::debug!("meld {} matches {}", meld.content(), rule.name);
                meld.base_points += rule.points;
                meld.doubles += rule.doubles;
                self.explain.push(format!("{}: {}", meld.content(), rule.explain()));
            }
        }
    }

    fn add_rules(&mut self, rules: &[Rule]) {
        for rule in self.matching_rules(rules) {
            log::debug!("hand matches {}", rule.name);
            self.base_points += rule.points;
            self.doubles += rule.doubles;
            self.explain.push(rule.explain());
        }
    }

    /// Scores the hand. Later calls return the cached total.
    pub fn score(&mut self) -> u64 {
        if let Some(total) = self.total {
            return total;
        }
        let ruleset = self.ruleset;
        let params = ruleset.params;

        self.apply_meld_rules();
        self.base_points = self.melds.iter().chain(&self.fs_melds).map(|m| m.base_points).sum();
        self.doubles = self.melds.iter().chain(&self.fs_melds).map(|m| m.doubles).sum();

        if self.won() {
            let limits = self.matching_rules(&ruleset.limit_hands);
            if !limits.is_empty() {
                for rule in limits {
                    log::debug!("limit hand {}", rule.name);
                    self.found_limit_hands.push(rule.name.clone());
                    self.explain.push(rule.explain());
                }
                self.total = Some(params.limit);
                return params.limit;
            }
        }

        self.add_rules(&ruleset.hand_rules);
        if self.won() {
            self.add_rules(&ruleset.mj_rules);
            if self.base_points < params.min_mj_points {
                self.explain.push(format!("Minimum Mah Jongg points: {}", params.min_mj_points));
                self.base_points = params.min_mj_points;
            }
        }
        if params.max_mj_doubles > 0 && self.doubles > params.max_mj_doubles {
            self.doubles = params.max_mj_doubles;
        }

        let cap = self.limit_override.unwrap_or(params.limit);
        let total = u64::from(self.base_points).saturating_mul(2u64.saturating_pow(self.doubles)).min(cap);
        self.total = Some(total);
        total
    }

    /// Scores the hand and snapshots the result.
    pub fn to_score(&mut self) -> Score {
        let total = self.score();
        Score {
            hand: self.original.clone(),
            total,
            base_points: self.base_points,
            doubles: self.doubles,
            limit_hands: self.found_limit_hands.clone(),
            explain: self.explain.clone(),
        }
    }
}

#[cfg(test)]
pub mod test {
    use super::*;

    fn ccp() -> Ruleset {
        Ruleset::load("CCP").unwrap()
    }

    #[test]
    pub fn parsing() {
        let ruleset = ccp();
        let hand = Hand::new(&ruleset, "b1b1b1B1 B2B3B4B5B6B7B8B8B2B2B2 fe fs fn fw MweDrw L0500").unwrap();
        assert_eq!(hand.melds.len(), 5);
        assert_eq!(hand.fs_melds.len(), 4);
        assert_eq!(hand.limit_override, Some(500));
        assert!(hand.won());
        assert_eq!(hand.normalized(), "fe fn fs fw b1b1b1B1 B2B2B2 B2B3B4 B5B6B7 B8B8 MweDrw");
    }

    #[test]
    pub fn canonical_case_and_order() {
        let ruleset = ccp();
        let hand = Hand::new(&ruleset, "s2S2s2 wewe drdrdr mes").unwrap();
        assert_eq!(hand.normalized(), "drdrdr wewe S2S2S2 mes");
        assert_eq!(hand.original, "s2S2s2 wewe drdrdr mes");
    }

    #[test]
    pub fn summary_string() {
        let ruleset = ccp();
        let mut hand = Hand::new(&ruleset, "B1B1B1B1B2B3B4B5B6B7B8B9DrDr fe ys MweDrw").unwrap();
        hand.score();
        assert_eq!(hand.summary(), "fe ys/D202/B308/B000/B000/B000 MweDrw");
    }

    #[test]
    pub fn errors() {
        let ruleset = ccp();
        let err = |s| Hand::new(&ruleset, s).unwrap_err();
        assert_eq!(err("s1s1s1"), HandError::MissingSuffix);
        assert!(matches!(err("s1s1s1 mee mes"), HandError::MultipleSuffixes(_)));
        assert!(matches!(err("S1S2S3S4S5 S6S7S8S9S9 mee"), HandError::MoreThanOneResidual(_)));
        assert_eq!(err("s1s2s4 mee"), HandError::InvalidMeld(vec!["s1s2s4".to_owned()]));
        assert!(matches!(err("s1s1s1 Mee"), HandError::BadSuffix(_)));
        assert!(matches!(err("s1s1s1 mee Lxx"), HandError::BadLimit(_)));
        assert_eq!(
            err("s1s1s1 s2s2s2 s3s3s3 s4s4s4 Mees4d"),
            HandError::WrongTileCount {
                won: true,
                tile_count: 12,
                kan_count: 0
            }
        );
        assert!(matches!(err("s1s1s1 s2s2s2 s3s3s3 s4s4s4 s5s5 mee"), HandError::WrongTileCount { won: false, .. }));
        assert_eq!(
            err("S1S1S1S1Sé mes"),
            HandError::UnsplittableResidual("S1S1S1S1Sé".to_owned())
        );
        assert_eq!(err("sé mes"), HandError::InvalidMeld(vec!["sé".to_owned()]));
        // kongs do not count towards the limit
        assert!(Hand::new(&ruleset, "s1s1s1s1 s2s2s2s2 s3s3s3 s4s4s4 s5s5 Mees5d").is_ok());
    }

    #[test]
    pub fn score_is_idempotent() {
        let ruleset = ccp();
        let mut hand = Hand::new(&ruleset, "drdrdr mesdr").unwrap();
        assert_eq!(hand.score(), 8);
        let explain = hand.explain.clone();
        assert_eq!(hand.score(), 8);
        assert_eq!(hand.explain, explain);
        assert_eq!(hand.base_points, 4);
        assert_eq!(hand.doubles, 1);
    }

    #[test]
    pub fn params_shape_the_total() {
        let params = crate::ruleset::RulesetParams {
            limit: 100,
            min_mj_points: 30,
            max_mj_doubles: 1,
        };
        let ruleset = Ruleset::load_with("CCP", params).unwrap();
        let mut hand = Hand::new(&ruleset, "s1s2s3 s4s5s6 b2b3b4 c6c7c8 s9s9 Meeb4d").unwrap();
        // 20 for mah jongg padded to 30, no doubles
        assert_eq!(hand.score(), 30);
        let mut big = Hand::new(&ruleset, "B1B1B1B1B2B3B4B5B6B7B8B9DrDr fe ys MweDrw").unwrap();
        // 46 points, doubles capped at one
        assert_eq!(big.score(), 92);
        let mut limit = Hand::new(&ruleset, "c1c1c1 c9c9 b9b9b9b9 s1s1s1 s9s9s9 Meec1w").unwrap();
        assert_eq!(limit.score(), 100);
        assert_eq!(limit.found_limit_hands, ["All Terminals"]);
    }
}
