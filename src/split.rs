//! Carving melds out of a residual string of concealed tiles.
use crate::error::RuleError;
use crate::pairs::tokens;
use crate::tile::{SUITS, all_kinds};
use regex::Regex;

/// A named regex that extracts one meld at a time from a residual string.
///
/// A splitter with capture groups extracts only the captured tokens and
/// leaves the text between them in place. Without groups the whole match is
/// extracted.
#[derive(Debug, Clone)]
pub struct Splitter {
    pub name: &'static str,
    regex: Regex,
    /// Tiles consumed per match.
    pub size: usize,
}

impl Splitter {
    pub fn new(name: &'static str, pattern: &str, size: usize) -> Result<Self, RuleError> {
        let regex = Regex::new(pattern).map_err(|source| RuleError::Regex {
            rule: format!("{name} splitter"),
            source,
        })?;
        Ok(Self { name, regex, size })
    }

    /// Extracts all token-aligned, non-overlapping matches from `residual`.
    /// Returns the extracted melds in left-to-right order and the shrunken
    /// remainder, or `None` if nothing matched.
    #[must_use]
    pub fn apply(&self, residual: &str) -> Option<(Vec<String>, String)> {
        // byte ranges to cut, one inner vec per match
        let mut cuts: Vec<Vec<(usize, usize)>> = vec![];
        let mut pos = 0;
        while pos < residual.len() {
            let Some(caps) = self.regex.captures_at(residual, pos) else {
                break;
            };
            let Some(whole) = caps.get(0) else {
                break;
            };
            if whole.start() % 2 != 0 {
                pos = whole.start() + 1;
                continue;
            }
            let groups: Vec<_> = caps.iter().skip(1).flatten().map(|m| (m.start(), m.end())).collect();
            if groups.is_empty() {
                cuts.push(vec![(whole.start(), whole.end())]);
            } else {
                cuts.push(groups);
            }
            pos = whole.end().max(whole.start() + 2);
        }
        if cuts.is_empty() {
            return None;
        }

        let melds = cuts
            .iter()
            .map(|ranges| ranges.iter().map(|&(s, e)| &residual[s..e]).collect::<String>())
            .collect();
        let mut rest = residual.to_owned();
        for &(s, e) in cuts.iter().rev().flat_map(|ranges| ranges.iter().rev()) {
            rest.replace_range(s..e, "");
        }
        Some((melds, rest))
    }
}

/// `(?:a|b|...)`
pub fn alternation(parts: impl IntoIterator<Item = String>) -> String {
    let parts: Vec<_> = parts.into_iter().collect();
    format!("(?:{})", parts.join("|"))
}

/// Kinds that may appear in a residual, as lowercase tokens.
fn residual_kinds() -> Vec<String> {
    all_kinds().into_iter().map(|t| t.to_string()).chain(["xy".to_owned()]).collect()
}

/// Uppercases the class character of a lowercase token.
pub fn upper(token: &str) -> String {
    let mut chars = token.chars();
    chars.next().map(|c| c.to_ascii_uppercase()).into_iter().chain(chars).collect()
}

/// The fixed splitter chain: kong, pung, chows for each suit and start value,
/// pair, single. Order matters; a pung splitter ahead of the kong splitter
/// would break every declared kong apart.
pub fn standard_splitters() -> Result<Vec<Splitter>, RuleError> {
    let kinds = residual_kinds();
    let mut splitters = vec![];

    let kong = alternation(kinds.iter().map(|k| format!("{k}{u}{u}{k}", u = upper(k))));
    splitters.push(Splitter::new("kong", &kong, 4)?);

    let pung = alternation(kinds.iter().flat_map(|k| [k.repeat(3), upper(k).repeat(3)]));
    splitters.push(Splitter::new("pung", &pung, 3)?);

    for suit in SUITS.chars() {
        for value in 1..=7 {
            let run: Vec<_> = (value..value + 3).map(|v| format!("{suit}{v}")).collect();
            let adjacent = alternation([run.concat(), run.iter().map(|t| upper(t)).collect()]);
            splitters.push(Splitter::new("chow", &adjacent, 3)?);

            let gap = "(?:..)*?";
            let tile = |t: &String| format!("({t}|{})", upper(t));
            let spread = [tile(&run[0]), tile(&run[1]), tile(&run[2])].join(gap);
            splitters.push(Splitter::new("chow", &spread, 3)?);
        }
    }

    let pair = alternation(kinds.iter().flat_map(|k| [k.repeat(2), upper(k).repeat(2)]));
    splitters.push(Splitter::new("pair", &pair, 2)?);
    splitters.push(Splitter::new("single", "..", 1)?);
    Ok(splitters)
}

/// Sorts the tokens of `residual` and runs the splitter chain over it. Each
/// splitter is re-applied until it stops firing. Returns the melds and
/// whatever could not be carved.
#[must_use]
pub fn split(splitters: &[Splitter], residual: &str) -> (Vec<String>, String) {
    if !residual.is_ascii() {
        return (vec![], residual.to_owned());
    }
    let mut sorted: Vec<_> = tokens(residual).collect();
    sorted.sort_unstable();
    let mut rest = sorted.concat();
    if residual.len() % 2 != 0 {
        // keep the dangling byte so the caller sees an unsplittable residual
        rest.push_str(&residual[residual.len() - 1..]);
    }

    let mut melds = vec![];
    for splitter in splitters {
        while let Some((found, remainder)) = splitter.apply(&rest) {
            log::trace!("splitter {} carved {:?} from {rest:?}", splitter.name, found);
            melds.extend(found);
            rest = remainder;
        }
    }
    (melds, rest)
}

#[cfg(test)]
pub mod test {
    use super::*;

    fn run(residual: &str) -> (Vec<String>, String) {
        let splitters = standard_splitters().unwrap();
        split(&splitters, residual)
    }

    #[test]
    pub fn undeclared_kong_becomes_pung_and_single() {
        let (melds, rest) = run("C1C1C1C1");
        assert_eq!(melds, ["C1C1C1", "C1"]);
        assert!(rest.is_empty());
    }

    #[test]
    pub fn sorting_separates_case() {
        // uppercase tokens sort first, so a declared kong only survives as its
        // own hand token
        let (melds, rest) = run("c1C1C1c1");
        assert_eq!(melds, ["C1C1", "c1c1"]);
        assert!(rest.is_empty());
    }

    #[test]
    pub fn full_concealed_hand() {
        let (mut melds, rest) = run("B1B1B1B1B2B3B4B5B6B7B8B9DrDr");
        melds.sort();
        assert_eq!(melds, ["B1B1B1", "B1B2B3", "B4B5B6", "B7B8B9", "DrDr"]);
        assert!(rest.is_empty());
    }

    #[test]
    pub fn discontinuous_chow() {
        let splitters = standard_splitters().unwrap();
        let spread = splitters.iter().find(|s| s.name == "chow" && s.apply("S2WeS3WeS4").is_some()).unwrap();
        let (melds, rest) = spread.apply("S2WeS3WeS4").unwrap();
        assert_eq!(melds, ["S2S3S4"]);
        assert_eq!(rest, "WeWe");

        let (melds, rest) = run("S2S3S3S4S4");
        assert_eq!(melds[0], "S2S3S4");
        assert_eq!(rest, "");
    }

    #[test]
    pub fn reassembles_to_input() {
        let input = "B2B2B2B2B3B4B5B6B7B8B8";
        let (melds, rest) = run(input);
        assert!(rest.is_empty());
        let mut joined: Vec<_> = melds.iter().flat_map(|m| tokens(m)).collect();
        joined.sort_unstable();
        let mut expected: Vec<_> = tokens(input).collect();
        expected.sort_unstable();
        assert_eq!(joined, expected);
    }

    #[test]
    pub fn matches_stay_token_aligned() {
        // "wsWs" contains "sW" at an odd offset; only whole tokens may match
        let pair = Splitter::new("pair", "(?:WsWs|sWsW)", 2).unwrap();
        assert!(pair.apply("XyWsWs").is_some());
        assert!(pair.apply("WsWy").is_none());
        assert!(pair.apply("sWsW").is_some());
        assert!(pair.apply("xsWsWy").is_none());
    }

    #[test]
    pub fn non_ascii_is_left_whole() {
        let (melds, rest) = run("S1S1S1S1Sé");
        assert!(melds.is_empty());
        assert_eq!(rest, "S1S1S1S1Sé");
    }

    #[test]
    pub fn odd_length_is_left_over() {
        let (melds, rest) = run("S1S1S");
        assert_eq!(melds, ["S1S1"]);
        assert_eq!(rest, "S");
    }
}
