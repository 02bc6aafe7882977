//! The status token of a hand string: `Morxxyd` when won, `mor[xx]` otherwise.
use crate::error::HandError;
use crate::tile::{Tile, WINDS};
use std::fmt;
use std::str::FromStr;

/// Where the winning tile came from.
pub const LAST_SOURCES: &str = "dwzZk1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suffix {
    raw: String,
    pub won: bool,
    pub own_wind: char,
    pub round_wind: char,
    /// The last tile drawn or claimed, case as written.
    pub last_tile: Option<Tile>,
    pub last_source: Option<char>,
    /// Declarations; `a` is a call at the beginning.
    pub declarations: String,
}

impl Suffix {
    /// True for tokens that look like a status token.
    #[must_use]
    pub fn is_suffix_token(token: &str) -> bool {
        token.starts_with(['m', 'M'])
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl FromStr for Suffix {
    type Err = HandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || HandError::BadSuffix(s.to_owned());
        if !s.is_ascii() {
            return Err(bad());
        }
        let bytes = s.as_bytes();
        let won = match bytes.first() {
            Some(b'M') => true,
            Some(b'm') => false,
            _ => return Err(HandError::MissingSuffix),
        };
        let wind = |idx: usize| {
            bytes
                .get(idx)
                .map(|&b| b as char)
                .filter(|c| WINDS.contains(*c))
                .ok_or_else(bad)
        };
        let own_wind = wind(1)?;
        let round_wind = wind(2)?;

        let last_tile = match s.get(3..5) {
            Some(token) => Some(Tile::parse(token).map_err(|_| bad())?),
            None if won || s.len() > 3 => return Err(bad()),
            None => None,
        };

        let (last_source, declarations) = if won {
            let source = bytes.get(5).map(|&b| b as char).filter(|c| LAST_SOURCES.contains(*c)).ok_or_else(bad)?;
            let declarations = s.get(6..).unwrap_or_default();
            if !declarations.chars().all(|c| c == 'a') {
                return Err(bad());
            }
            (Some(source), declarations.to_owned())
        } else {
            if s.len() > 5 {
                return Err(bad());
            }
            (None, String::new())
        };

        Ok(Self {
            raw: s.to_owned(),
            won,
            own_wind,
            round_wind,
            last_tile,
            last_source,
            declarations,
        })
    }
}

impl fmt::Display for Suffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Parses an `L<nnnn>` limit override token.
pub fn parse_limit(token: &str) -> Result<u64, HandError> {
    token
        .strip_prefix('L')
        .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|digits| digits.parse().ok())
        .ok_or_else(|| HandError::BadLimit(token.to_owned()))
}

#[cfg(test)]
pub mod test {
    use super::*;

    #[test]
    pub fn won_suffix() {
        let s: Suffix = "MweDrwa".parse().unwrap();
        assert!(s.won);
        assert_eq!(s.own_wind, 'w');
        assert_eq!(s.round_wind, 'e');
        assert_eq!(s.last_tile.unwrap().to_string(), "Dr");
        assert_eq!(s.last_source, Some('w'));
        assert_eq!(s.declarations, "a");
        assert_eq!(s.to_string(), "MweDrwa");
    }

    #[test]
    pub fn not_won_suffix() {
        let s: Suffix = "mesdr".parse().unwrap();
        assert!(!s.won);
        assert_eq!(s.last_tile.unwrap().to_string(), "dr");
        assert_eq!(s.last_source, None);

        let s: Suffix = "mes".parse().unwrap();
        assert_eq!(s.last_tile, None);
    }

    #[test]
    pub fn malformed_suffixes() {
        for bad in ["Mwe", "MweDr", "MweDrq", "MweDrwb", "mxe", "mesd", "mesdrw", "MweD9w"] {
            assert_eq!(bad.parse::<Suffix>(), Err(HandError::BadSuffix(bad.to_owned())), "{bad}");
        }
        assert!(!Suffix::is_suffix_token("s1s1"));
        assert!(Suffix::is_suffix_token("mes"));
    }

    #[test]
    pub fn limit_token() {
        assert_eq!(parse_limit("L0500"), Ok(500));
        assert!(parse_limit("L").is_err());
        assert!(parse_limit("L12a").is_err());
    }
}
