//! Parser for pattern expressions such as `Dragons(PungKong)*2 + Rest`.
//!
//! ```text
//! expr   := term ('+' term)*
//! term   := factor ('*' INT)*
//! factor := IDENT ['(' expr ')'] | '(' expr ')'
//! ```
//!
//! A decorator without arguments applies to a slot accepting anything, so
//! `Pung` and `Pung()` both mean "any pung".
use crate::pattern::{Decorator, Pattern};
use crate::variant::Variant;
use ahash::AHashMap;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("unexpected {found:?} at {pos}")]
    Unexpected { pos: usize, found: String },

    #[error("unknown identifier {0:?}")]
    UnknownIdentifier(String),

    #[error("{0} cannot be combined with other patterns")]
    NotAPattern(&'static str),

    #[error("{name}: {reason}")]
    BadArgument { name: &'static str, reason: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Builtin {
    Decorator(Decorator),
    MahJongg,
    Rest,
    LastTileCompletes,
    MjHiddenTreasure,
    OnlyPossibleTile,
}

static NAMESPACE: LazyLock<AHashMap<&'static str, Builtin>> = LazyLock::new(|| {
    let mut map: AHashMap<_, _> = Decorator::ALL.iter().map(|&(name, d)| (name, Builtin::Decorator(d))).collect();
    map.insert("MahJongg", Builtin::MahJongg);
    map.insert("Rest", Builtin::Rest);
    map.insert("LastTileCompletes", Builtin::LastTileCompletes);
    map.insert("MJHiddenTreasure", Builtin::MjHiddenTreasure);
    map.insert("OnlyPossibleTile", Builtin::OnlyPossibleTile);
    map
});

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token<'a> {
    Ident(&'a str),
    Int(usize),
    Plus,
    Star,
    Open,
    Close,
}

fn tokenize(src: &str) -> Result<Vec<(usize, Token<'_>)>, ParseError> {
    let bytes = src.as_bytes();
    let mut tokens = vec![];
    let mut i = 0;
    while i < bytes.len() {
        let start = i;
        let c = bytes[i];
        let token = match c {
            b' ' | b'\t' => {
                i += 1;
                continue;
            }
            b'+' => Token::Plus,
            b'*' => Token::Star,
            b'(' => Token::Open,
            b')' => Token::Close,
            b'0'..=b'9' => {
                while i < bytes.len() && bytes[i].is_ascii_digit() {
                    i += 1;
                }
                let n = src[start..i].parse().map_err(|_| ParseError::Unexpected {
                    pos: start,
                    found: src[start..i].to_owned(),
                })?;
                tokens.push((start, Token::Int(n)));
                continue;
            }
            c if c.is_ascii_alphabetic() => {
                while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                    i += 1;
                }
                tokens.push((start, Token::Ident(&src[start..i])));
                continue;
            }
            _ => {
                let found = src[start..].chars().next().map(String::from).unwrap_or_default();
                return Err(ParseError::Unexpected { pos: start, found });
            }
        };
        tokens.push((start, token));
        i += 1;
    }
    Ok(tokens)
}

/// An evaluated sub-expression.
enum Value {
    Pattern(Pattern),
    Special(&'static str, Variant),
}

impl Value {
    fn into_pattern(self) -> Result<Pattern, ParseError> {
        match self {
            Self::Pattern(p) => Ok(p),
            Self::Special(name, _) => Err(ParseError::NotAPattern(name)),
        }
    }
}

struct Parser<'a> {
    tokens: Vec<(usize, Token<'a>)>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos).map(|(_, t)| t)
    }

    fn next(&mut self) -> Result<Token<'a>, ParseError> {
        let (_, token) = self.tokens.get(self.pos).cloned().ok_or(ParseError::UnexpectedEnd)?;
        self.pos += 1;
        Ok(token)
    }

    fn unexpected(&self) -> ParseError {
        match self.tokens.get(self.pos.saturating_sub(1)) {
            Some((pos, token)) => ParseError::Unexpected {
                pos: *pos,
                found: format!("{token:?}"),
            },
            None => ParseError::UnexpectedEnd,
        }
    }

    fn expect_close(&mut self) -> Result<(), ParseError> {
        match self.next()? {
            Token::Close => Ok(()),
            _ => Err(self.unexpected()),
        }
    }

    fn expr(&mut self) -> Result<Value, ParseError> {
        let first = self.term()?;
        if self.peek() != Some(&Token::Plus) {
            return Ok(first);
        }
        let mut pattern = first.into_pattern()?;
        while self.peek() == Some(&Token::Plus) {
            self.pos += 1;
            pattern = pattern + self.term()?.into_pattern()?;
        }
        Ok(Value::Pattern(pattern))
    }

    fn term(&mut self) -> Result<Value, ParseError> {
        let mut value = self.factor()?;
        while self.peek() == Some(&Token::Star) {
            self.pos += 1;
            let n = match self.next()? {
                Token::Int(n) => n,
                _ => return Err(self.unexpected()),
            };
            value = Value::Pattern(value.into_pattern()? * n);
        }
        Ok(value)
    }

    /// The optional parenthesized argument of an identifier.
    fn argument(&mut self) -> Result<Option<Value>, ParseError> {
        if self.peek() != Some(&Token::Open) {
            return Ok(None);
        }
        self.pos += 1;
        if self.peek() == Some(&Token::Close) {
            self.pos += 1;
            return Ok(None);
        }
        let inner = self.expr()?;
        self.expect_close()?;
        Ok(Some(inner))
    }

    fn factor(&mut self) -> Result<Value, ParseError> {
        let name = match self.next()? {
            Token::Ident(name) => name,
            Token::Open => {
                let inner = self.expr()?;
                self.expect_close()?;
                return Ok(inner);
            }
            _ => return Err(self.unexpected()),
        };
        let builtin = *NAMESPACE.get(name).ok_or_else(|| ParseError::UnknownIdentifier(name.to_owned()))?;
        let arg = self.argument()?;
        let arg_pattern = |arg: Option<Value>| -> Result<Pattern, ParseError> { arg.map_or(Ok(Pattern::any()), Value::into_pattern) };

        Ok(match builtin {
            Builtin::Decorator(d) => Value::Pattern(d.apply(arg_pattern(arg)?)),
            Builtin::Rest => Value::Pattern(Pattern::rest(arg_pattern(arg)?)),
            Builtin::MahJongg => {
                if arg.is_some() {
                    return Err(ParseError::BadArgument {
                        name: "MahJongg",
                        reason: "takes no argument",
                    });
                }
                Value::Pattern(Pattern::mah_jongg())
            }
            Builtin::LastTileCompletes => {
                let mut pattern = arg_pattern(arg)?;
                if pattern.slots.len() != 1 {
                    return Err(ParseError::BadArgument {
                        name: "LastTileCompletes",
                        reason: "needs exactly one slot",
                    });
                }
                Value::Special("LastTileCompletes", Variant::LastTileCompletes(pattern.slots.remove(0)))
            }
            Builtin::MjHiddenTreasure => Value::Special("MJHiddenTreasure", Variant::MjHiddenTreasure),
            Builtin::OnlyPossibleTile => Value::Special("OnlyPossibleTile", Variant::OnlyPossibleTile),
        })
    }
}

/// Parses a pattern expression into a rule variant.
pub fn parse(src: &str) -> Result<Variant, ParseError> {
    let mut parser = Parser {
        tokens: tokenize(src)?,
        pos: 0,
    };
    let value = parser.expr()?;
    if parser.pos != parser.tokens.len() {
        parser.pos += 1;
        return Err(parser.unexpected());
    }
    Ok(match value {
        Value::Pattern(p) => Variant::Pattern(p),
        Value::Special(_, v) => v,
    })
}

#[cfg(test)]
pub mod test {
    use super::*;
    use crate::pattern::TypeMask;

    fn pattern(src: &str) -> Pattern {
        match parse(src).unwrap() {
            Variant::Pattern(p) => p,
            other => panic!("{src} parsed to {other:?}"),
        }
    }

    #[test]
    pub fn composition() {
        let p = pattern("Dragons(PungKong)*2 + Dragons(Pair) + Rest");
        assert_eq!(p.slots.len(), 4);
        assert!(p.slots[3].is_rest);
        assert_eq!(p.slots[2].types, TypeMask::PAIR);
        assert!(p.slots[0].content.iter().all(|c| c.class == 'd'));

        let mj = pattern("NoChow(MahJongg)");
        assert_eq!(mj.slots.len(), 5);
        assert!(mj.is_mah_jongg);
        assert!(!mj.slots[0].types.intersects(TypeMask::CHOW));

        let grouped = pattern("(Pung + Pair) * 2");
        assert_eq!(grouped.slots.len(), 4);
        assert_eq!(grouped.slots[3].types, TypeMask::PAIR);
    }

    #[test]
    pub fn empty_arguments() {
        assert_eq!(pattern("Kong()"), pattern("Kong"));
        assert!(pattern("Rest()").slots[0].is_rest);
    }

    #[test]
    pub fn specials() {
        assert!(matches!(parse("LastTileCompletes(Simple(Pair))"), Ok(Variant::LastTileCompletes(_))));
        assert!(matches!(parse("MJHiddenTreasure"), Ok(Variant::MjHiddenTreasure)));
        assert!(matches!(parse("OnlyPossibleTile"), Ok(Variant::OnlyPossibleTile)));
        assert_eq!(
            parse("LastTileCompletes(Pair*2)").unwrap_err(),
            ParseError::BadArgument {
                name: "LastTileCompletes",
                reason: "needs exactly one slot"
            }
        );
        assert_eq!(parse("OnlyPossibleTile + Rest").unwrap_err(), ParseError::NotAPattern("OnlyPossibleTile"));
    }

    #[test]
    pub fn errors() {
        assert_eq!(parse("Pongs(Pair)").unwrap_err(), ParseError::UnknownIdentifier("Pongs".to_owned()));
        assert_eq!(parse("Pung +").unwrap_err(), ParseError::UnexpectedEnd);
        assert!(matches!(parse("Pung * Pair"), Err(ParseError::Unexpected { .. })));
        assert!(matches!(parse("Pung(Pair"), Err(ParseError::UnexpectedEnd)));
        assert!(matches!(parse("Pung Pair"), Err(ParseError::Unexpected { pos: 5, .. })));
        assert!(matches!(parse("Pung $"), Err(ParseError::Unexpected { pos: 5, .. })));
        assert_eq!(parse("MahJongg(Pair)").unwrap_err(), ParseError::BadArgument {
            name: "MahJongg",
            reason: "takes no argument"
        });
    }
}
