//! Scoring rules: a name, the variants that trigger it and what it awards.
use crate::error::RuleError;
use crate::variant::{Subject, Variant, VariantError};

/// A named scoring item.
#[derive(Debug, Clone)]
pub struct Rule {
    pub name: String,
    pub variants: Vec<Variant>,
    /// Only applies when the last tile came from this source.
    pub last_tile_source: Option<char>,
    pub points: u32,
    pub doubles: u32,
}

impl Rule {
    /// Builds a rule from variant strings; see [`Variant::parse`].
    pub fn new(name: &str, variants: &[&str]) -> Result<Self, RuleError> {
        let variants = variants
            .iter()
            .map(|src| {
                Variant::parse(src).map_err(|e| match e {
                    VariantError::Regex(source) => RuleError::Regex {
                        rule: name.to_owned(),
                        source,
                    },
                    VariantError::Expression(source) => RuleError::Expression {
                        rule: name.to_owned(),
                        source,
                    },
                    VariantError::Flag(flag) => RuleError::BadFlag {
                        rule: name.to_owned(),
                        flag,
                    },
                    VariantError::Empty => RuleError::EmptyVariant(name.to_owned()),
                })
            })
            .collect::<Result<_, _>>()?;
        Ok(Self {
            name: name.to_owned(),
            variants,
            last_tile_source: None,
            points: 0,
            doubles: 0,
        })
    }

    #[must_use]
    pub fn points(mut self, points: u32) -> Self {
        self.points = points;
        self
    }

    #[must_use]
    pub fn doubles(mut self, doubles: u32) -> Self {
        self.doubles = doubles;
        self
    }

    #[must_use]
    pub fn source(mut self, source: char) -> Self {
        self.last_tile_source = Some(source);
        self
    }

    /// A rule with a source filter and no variants applies whenever the
    /// source matches.
    #[must_use]
    pub fn applies(&self, subject: &Subject<'_>) -> bool {
        if self.last_tile_source.is_some() && subject.suffix.last_source != self.last_tile_source {
            return false;
        }
        self.variants.is_empty() || self.variants.iter().any(|v| v.applies(subject))
    }

    /// One line of the score explanation.
    #[must_use]
    pub fn explain(&self) -> String {
        match (self.points, self.doubles) {
            (0, 0) => format!("{}: limit hand", self.name),
            (p, 0) => format!("{}: {p} points", self.name),
            (0, d) => format!("{}: {d} doubles", self.name),
            (p, d) => format!("{}: {p} points {d} doubles", self.name),
        }
    }
}

#[cfg(test)]
pub mod test {
    use super::*;
    use crate::meld::Meld;
    use crate::suffix::Suffix;

    #[test]
    pub fn source_filter() {
        let rule = Rule::new("Won with Last Tile Taken from Wall", &[]).unwrap().points(2).source('w');
        let melds: [Meld; 0] = [];
        let drawn: Suffix = "Mees1w".parse().unwrap();
        let discarded: Suffix = "Mees1d".parse().unwrap();
        fn subject<'a>(melds: &'a [Meld], suffix: &'a Suffix) -> Subject<'a> {
            Subject {
                melds,
                suffix,
                normalized: "",
                summary: "",
                original: "",
            }
        }
        assert!(rule.applies(&subject(&melds, &drawn)));
        assert!(!rule.applies(&subject(&melds, &discarded)));
        assert_eq!(rule.explain(), "Won with Last Tile Taken from Wall: 2 points");
    }

    #[test]
    pub fn any_variant_fires() {
        let rule = Rule::new("Pair of Dragons", &[r"I^d.d. ", "PDragons(Pair)"]).unwrap().points(2);
        let melds = [Meld::new("DrDr")];
        let suffix: Suffix = "mee".parse().unwrap();
        let subject = Subject {
            melds: &melds,
            suffix: &suffix,
            normalized: "xx",
            summary: "",
            original: "",
        };
        // the regex misses on this text but the pattern sees the meld
        assert!(rule.applies(&subject));
    }

    #[test]
    pub fn build_errors() {
        assert!(matches!(Rule::new("bad", &["N(oops"]), Err(RuleError::Regex { .. })));
        assert!(matches!(Rule::new("bad", &["PPongs"]), Err(RuleError::Expression { .. })));
        assert!(matches!(Rule::new("bad", &[""]), Err(RuleError::EmptyVariant(_))));
        assert!(matches!(Rule::new("bad", &["Qx"]), Err(RuleError::BadFlag { flag: 'Q', .. })));
        assert_eq!(Rule::new("Big Four Joys", &[]).unwrap().explain(), "Big Four Joys: limit hand");
        assert_eq!(Rule::new("x", &[]).unwrap().doubles(2).explain(), "x: 2 doubles");
    }
}
