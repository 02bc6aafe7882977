//! Builders for the regexes of the regex-based ruleset.
//!
//! The regex engine has no back-references, so "the same tile repeated" is
//! spelled out as an alternation over every tile kind.
use crate::split::{alternation, upper};
use crate::tile::{DRAGONS, SUITS, WINDS};

/// A summary item that may sit between the items a regex looks for.
pub const GAP: &str = "(?:/[^ /]+)*";

/// Simple tiles, lowercase.
pub fn simples() -> Vec<String> {
    SUITS.chars().flat_map(|s| (2..=8).map(move |v| format!("{s}{v}"))).collect()
}

/// Terminals and honours, lowercase.
pub fn terminals_honours() -> Vec<String> {
    let terminals = SUITS.chars().flat_map(|s| ["1", "9"].map(|v| format!("{s}{v}")));
    let winds = WINDS.chars().map(|w| format!("w{w}"));
    let dragons = DRAGONS.chars().map(|d| format!("d{d}"));
    terminals.chain(winds).chain(dragons).collect()
}

/// Meld contents anchored at the start of a meld rule subject.
pub fn meld_forms(kinds: &[String], form: impl Fn(&str) -> String) -> String {
    format!("^{} ", alternation(kinds.iter().map(|k| form(k))))
}

pub fn exposed_pung(k: &str) -> String {
    k.repeat(3)
}

pub fn concealed_pung(k: &str) -> String {
    upper(k).repeat(3)
}

/// Exposed and claimed kongs: both present as exposed.
pub fn exposed_kong(k: &str) -> String {
    format!("{}|{}{}", k.repeat(4), k.repeat(3), upper(k))
}

pub fn concealed_kong(k: &str) -> String {
    format!("{k}{}{k}", upper(k).repeat(2))
}

/// Four sets and a pair in any order, items joined by `sep`.
pub fn mah_jongg_shape(set: &str, pair: &str, sep: &str) -> String {
    alternation((0..5).map(|pos| {
        let items: Vec<&str> = (0..5).map(|i| if i == pos { pair } else { set }).collect();
        items.join(sep)
    }))
}

/// `sets` summary items plus one pair item in any order, other melds
/// allowed in between.
pub fn sets_and_pair(set: &str, pair: &str, sets: usize) -> String {
    alternation((0..=sets).map(|pos| {
        let items: Vec<&str> = (0..=sets).map(|i| if i == pos { pair } else { set }).collect();
        items.join(GAP)
    }))
}

/// At least `n` summary items matching `item`, anywhere.
pub fn at_least(item: &str, n: usize) -> String {
    format!("(?:{GAP}{item}){{{n}}}")
}

/// Summary regex for a won hand of exactly four sets and a pair.
pub fn summary_mah_jongg(set: &str, pair: &str) -> String {
    format!("^[^/]*{} M", mah_jongg_shape(set, pair, ""))
}

/// Normalized regex for a won hand of four sets and a pair built from tokens
/// matching `tile`, flowers and seasons ahead.
pub fn normalized_mah_jongg(tile: &str) -> String {
    let set = format!("(?:{tile}){{3,4}}");
    let pair = format!("(?:{tile}){{2}}");
    format!("^(?:[fy]. )*{} m", mah_jongg_shape(&set, &pair, " "))
}

/// "The last tile completed a pair of one of `kinds`" over the lowercased
/// normalized string.
pub fn last_tile_pair(kinds: &[String]) -> String {
    alternation(kinds.iter().map(|k| format!(r"\b{k}{k}\b.* m..{k}")))
}

#[cfg(test)]
pub mod test {
    use super::*;
    use regex::Regex;

    #[test]
    pub fn kind_lists() {
        assert_eq!(simples().len(), 21);
        assert_eq!(terminals_honours().len(), 13);
    }

    #[test]
    pub fn meld_forms_anchor() {
        let re = Regex::new(&meld_forms(&terminals_honours(), exposed_kong)).unwrap();
        assert!(re.is_match("c9c9c9C9 mes"));
        assert!(re.is_match("wewewewe mes"));
        assert!(!re.is_match("c9c9c9 mes"));
        assert!(!re.is_match("c5c5c5c5 mes"));

        let re = Regex::new(&meld_forms(&simples(), concealed_kong)).unwrap();
        assert!(re.is_match("s2S2S2s2 mes"));
    }

    #[test]
    pub fn shapes() {
        let re = Regex::new(&summary_mah_jongg(r"/[a-zA-Z][34]\d\d", r"/[a-zA-Z]2\d\d")).unwrap();
        assert!(re.is_match("/w200/s416/s302/S304/s302 Msws3d"));
        assert!(re.is_match("fe/s416/s302/w200/S304/s302 Msws3d"));
        assert!(!re.is_match("/w200/s416/s000/S304/s302 Msws3d"));

        let little = Regex::new(&sets_and_pair(r"/[dD][34]\d\d", r"/[dD]2\d\d", 2)).unwrap();
        assert!(little.is_match("/d200/D308/d304/s000"));
        assert!(little.is_match("/D308/D100/d200/d304/s000"));
        assert!(!little.is_match("/D308/d304/w200"));

        let four = Regex::new(&at_least(r"/[sS][34]\d\d", 4)).unwrap();
        assert!(four.is_match("/s302/s000/S304/s416/s302/w200"));
        assert!(!four.is_match("/s302/S304/s416/w200"));
    }

    #[test]
    pub fn normalized_shape() {
        let re = Regex::new(&normalized_mah_jongg("[sbc][19]")).unwrap();
        assert!(re.is_match("s1s1s1 s9s9s9 b9b9b9b9 c1c1c1 c9c9 meec1w"));
        assert!(!re.is_match("s1s1s1 s9s9s9 b9b9b9b9 c1c2c3 c9c9 meec1w"));

        let re = Regex::new(&last_tile_pair(&terminals_honours())).unwrap();
        assert!(re.is_match("fe ys drdr b1b1b1 mwedrw"));
        assert!(!re.is_match("drdrdr b1b1 mwedrw"));
    }
}
