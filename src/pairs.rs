//! A flat tile string viewed as a sequence of two-character tokens.
//!
//! Only the first character of a token carries case; value characters are
//! never touched by case mutation.
use std::fmt;
use std::ops::Range;

#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Pairs(String);

/// Iterates the two-byte tokens of `s`. A trailing odd byte is dropped, as
/// is any token that would cut a multi-byte character.
pub fn tokens(s: &str) -> impl Iterator<Item = &str> {
    (0..s.len() / 2).filter_map(move |i| s.get(i * 2..i * 2 + 2))
}

impl Pairs {
    /// Non-ASCII content is kept as is; its tokens are neither lower nor
    /// upper case.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Number of tokens.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len() / 2
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.len() < 2
    }

    /// Token `idx`, empty when out of range or not on a char boundary.
    #[must_use]
    pub fn get(&self, idx: usize) -> &str {
        self.0.get(idx * 2..idx * 2 + 2).unwrap_or_default()
    }

    fn class_byte(&self, idx: usize) -> Option<u8> {
        self.get(idx).as_bytes().first().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        tokens(&self.0)
    }

    /// The class characters of all tokens, case preserved.
    #[must_use]
    pub fn starts(&self) -> String {
        self.iter().map(|t| t.as_bytes()[0] as char).collect()
    }

    /// The value characters of all tokens.
    #[must_use]
    pub fn values(&self) -> String {
        self.iter().map(|t| t.as_bytes()[1] as char).collect()
    }

    #[must_use]
    pub fn is_lower(&self, range: Range<usize>) -> bool {
        range.into_iter().all(|i| self.class_byte(i).is_some_and(|b| b.is_ascii_lowercase()))
    }

    #[must_use]
    pub fn is_upper(&self, range: Range<usize>) -> bool {
        range.into_iter().all(|i| self.class_byte(i).is_some_and(|b| b.is_ascii_uppercase()))
    }

    pub fn to_lower(&mut self, range: Range<usize>) {
        self.map_class(range, |c| c.to_ascii_lowercase());
    }

    pub fn to_upper(&mut self, range: Range<usize>) {
        self.map_class(range, |c| c.to_ascii_uppercase());
    }

    /// Maps the class character of every token in `range`. Counts chars, so
    /// it agrees with the byte tokens on ASCII and cannot split a char.
    fn map_class(&mut self, range: Range<usize>, f: impl Fn(char) -> char) {
        self.0 = self
            .0
            .chars()
            .enumerate()
            .map(|(i, c)| if i % 2 == 0 && range.contains(&(i / 2)) { f(c) } else { c })
            .collect();
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Pairs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Pairs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pairs({:?})", self.0)
    }
}

#[cfg(test)]
pub mod test {
    use super::*;

    #[test]
    pub fn accessors() {
        let p = Pairs::new("b1B1B1b1");
        assert_eq!(p.len(), 4);
        assert_eq!(p.get(2), "B1");
        assert_eq!(p.starts(), "bBBb");
        assert_eq!(p.values(), "1111");
        assert!(p.is_upper(1..3));
        assert!(!p.is_lower(0..4));
        assert!(p.is_lower(0..1));
        assert!(p.is_lower(3..4));
    }

    #[test]
    pub fn case_flips_only_touch_class() {
        let mut p = Pairs::new("wewewe");
        p.to_upper(0..3);
        assert_eq!(p.as_str(), "WeWeWe");
        p.to_lower(1..2);
        assert_eq!(p.as_str(), "WeweWe");
        assert_eq!(tokens("s1s2s").collect::<Vec<_>>(), vec!["s1", "s2"]);
    }

    #[test]
    pub fn non_ascii_does_not_panic() {
        assert_eq!(tokens("S1Sé").collect::<Vec<_>>(), vec!["S1"]);
        let mut p = Pairs::new("sé");
        assert_eq!(p.get(1), "");
        assert!(!p.is_lower(0..1));
        assert!(!p.is_upper(1..2));
        p.to_upper(0..1);
        assert_eq!(p.as_str(), "Sé");
    }
}
