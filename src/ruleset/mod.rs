//! Predefined rulesets.
//!
//! `CCP` expresses its rules mostly as pattern expressions and `CCR` mostly
//! as regexes over the canonical hand strings. Both award the same rules with
//! the same values and must agree on every legal hand.
mod ccp;
mod ccr;
mod regex_gen;

use crate::error::RuleError;
use crate::rule::Rule;
use crate::split::{Splitter, standard_splitters};
use serde::{Deserialize, Serialize};

/// Numeric ruleset parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesetParams {
    /// Score of a limit hand and cap of every other hand.
    pub limit: u64,
    /// Base points a won hand is padded up to.
    pub min_mj_points: u32,
    /// Cap on the doubles of a hand, 0 for none.
    pub max_mj_doubles: u32,
}

impl Default for RulesetParams {
    fn default() -> Self {
        Self {
            limit: 5000,
            min_mj_points: 0,
            max_mj_doubles: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Ruleset {
    pub name: &'static str,
    pub params: RulesetParams,
    pub split_rules: Vec<Splitter>,
    pub meld_rules: Vec<Rule>,
    pub hand_rules: Vec<Rule>,
    pub mj_rules: Vec<Rule>,
    pub limit_hands: Vec<Rule>,
}

impl Ruleset {
    pub const NAMES: [&'static str; 2] = ["CCP", "CCR"];

    /// Builds a predefined ruleset with default parameters.
    pub fn load(name: &str) -> Result<Self, RuleError> {
        Self::load_with(name, RulesetParams::default())
    }

    /// Builds a predefined ruleset. Names are case-insensitive.
    pub fn load_with(name: &str, params: RulesetParams) -> Result<Self, RuleError> {
        let mut ruleset = Self {
            name: "",
            params,
            split_rules: standard_splitters()?,
            meld_rules: vec![],
            hand_rules: vec![],
            mj_rules: vec![],
            limit_hands: vec![],
        };
        match name.to_ascii_uppercase().as_str() {
            "CCP" => {
                ruleset.name = "CCP";
                ccp::populate(&mut ruleset)?;
            }
            "CCR" => {
                ruleset.name = "CCR";
                ccr::populate(&mut ruleset)?;
            }
            _ => return Err(RuleError::UnknownRuleset(name.to_owned())),
        }
        log::debug!(
            "loaded ruleset {}: {} meld, {} hand, {} mah jongg, {} limit rules",
            ruleset.name,
            ruleset.meld_rules.len(),
            ruleset.hand_rules.len(),
            ruleset.mj_rules.len(),
            ruleset.limit_hands.len(),
        );
        Ok(ruleset)
    }
}

#[cfg(test)]
pub mod test {
    use super::*;

    fn signature(rules: &[Rule]) -> Vec<(&str, u32, u32, Option<char>)> {
        rules.iter().map(|r| (r.name.as_str(), r.points, r.doubles, r.last_tile_source)).collect()
    }

    #[test]
    pub fn both_rulesets_build() {
        for name in Ruleset::NAMES {
            let ruleset = Ruleset::load(name).unwrap();
            assert_eq!(ruleset.name, name);
            assert_eq!(ruleset.params.limit, 5000);
        }
        assert_eq!(Ruleset::load("ccp").unwrap().name, "CCP");
        assert!(matches!(Ruleset::load("ZZZ"), Err(RuleError::UnknownRuleset(_))));
    }

    #[test]
    pub fn rulesets_share_rule_table() {
        let ccp = Ruleset::load("CCP").unwrap();
        let ccr = Ruleset::load("CCR").unwrap();
        assert_eq!(signature(&ccp.meld_rules), signature(&ccr.meld_rules));
        assert_eq!(signature(&ccp.hand_rules), signature(&ccr.hand_rules));
        assert_eq!(signature(&ccp.mj_rules), signature(&ccr.mj_rules));
        assert_eq!(signature(&ccp.limit_hands), signature(&ccr.limit_hands));
    }

    #[test]
    pub fn params_from_json() {
        let params: RulesetParams = serde_json::from_str(r#"{"limit": 1000}"#).unwrap();
        assert_eq!(params.limit, 1000);
        assert_eq!(params.min_mj_points, 0);
        let ruleset = Ruleset::load_with("CCR", params).unwrap();
        assert_eq!(ruleset.params.limit, 1000);
    }
}
