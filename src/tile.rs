//! Tile vocabulary.
//!
//! A tile is written as two ASCII characters: a class character and a value
//! character. The case of the class character carries visibility, lowercase
//! for exposed and uppercase for concealed.
use std::fmt;
use std::str::FromStr;

/// Numeric suits in canonical order.
pub const SUITS: &str = "sbc";
pub const WINDS: &str = "eswn";
pub const DRAGONS: &str = "bgr";
/// Number of distinct playable tile kinds (three suits, four winds, three dragons).
pub const KINDS: usize = 34;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TileClass {
    Stone,
    Bamboo,
    Character,
    Wind,
    Dragon,
    Flower,
    Season,
    Unknown,
}

impl TileClass {
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        Some(match c.to_ascii_lowercase() {
            's' => Self::Stone,
            'b' => Self::Bamboo,
            'c' => Self::Character,
            'w' => Self::Wind,
            'd' => Self::Dragon,
            'f' => Self::Flower,
            'y' => Self::Season,
            'x' => Self::Unknown,
            _ => return None,
        })
    }

    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Stone => 's',
            Self::Bamboo => 'b',
            Self::Character => 'c',
            Self::Wind => 'w',
            Self::Dragon => 'd',
            Self::Flower => 'f',
            Self::Season => 'y',
            Self::Unknown => 'x',
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_suit(self) -> bool {
        matches!(self, Self::Stone | Self::Bamboo | Self::Character)
    }

    #[inline]
    #[must_use]
    pub const fn is_honour(self) -> bool {
        matches!(self, Self::Wind | Self::Dragon)
    }

    #[inline]
    #[must_use]
    pub const fn is_bonus(self) -> bool {
        matches!(self, Self::Flower | Self::Season)
    }

    /// Sort priority used for canonical meld order: dragons, winds, stone,
    /// bamboo, character, then everything else.
    #[must_use]
    pub const fn priority(self) -> u8 {
        match self {
            Self::Dragon => 0,
            Self::Wind => 1,
            Self::Stone => 2,
            Self::Bamboo => 3,
            Self::Character => 4,
            _ => 5,
        }
    }

    const fn accepts_value(self, v: char) -> bool {
        match self {
            Self::Stone | Self::Bamboo | Self::Character => matches!(v, '1'..='9'),
            Self::Wind | Self::Flower | Self::Season => matches!(v, 'e' | 's' | 'w' | 'n'),
            Self::Dragon => matches!(v, 'b' | 'g' | 'r'),
            Self::Unknown => v == 'y',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidTile(pub String);

impl fmt::Display for InvalidTile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid tile {:?}", self.0)
    }
}

impl std::error::Error for InvalidTile {}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    class: TileClass,
    value: u8,
    concealed: bool,
}

impl Default for Tile {
    fn default() -> Self {
        Self {
            class: TileClass::Unknown,
            value: b'y',
            concealed: false,
        }
    }
}

impl Tile {
    /// Parses one two-character token.
    pub fn parse(token: &str) -> Result<Self, InvalidTile> {
        let bytes = token.as_bytes();
        if bytes.len() != 2 || !token.is_ascii() {
            return Err(InvalidTile(token.to_owned()));
        }
        let (c, v) = (bytes[0] as char, bytes[1] as char);
        match TileClass::from_char(c) {
            Some(class) if class.accepts_value(v) => Ok(Self {
                class,
                value: bytes[1],
                concealed: c.is_ascii_uppercase(),
            }),
            _ => Err(InvalidTile(token.to_owned())),
        }
    }

    /// Inverse of [`Tile::kind_index`], always exposed.
    #[must_use]
    pub fn from_kind_index(idx: usize) -> Option<Self> {
        let (class, value) = match idx {
            0..=26 => {
                let class = [TileClass::Stone, TileClass::Bamboo, TileClass::Character][idx / 9];
                (class, b'1' + (idx % 9) as u8)
            }
            27..=30 => (TileClass::Wind, WINDS.as_bytes()[idx - 27]),
            31..=33 => (TileClass::Dragon, DRAGONS.as_bytes()[idx - 31]),
            _ => return None,
        };
        Some(Self {
            class,
            value,
            concealed: false,
        })
    }

    #[inline]
    #[must_use]
    pub const fn class(self) -> TileClass {
        self.class
    }

    #[inline]
    #[must_use]
    pub const fn value(self) -> char {
        self.value as char
    }

    /// Face value of a numeric tile.
    #[inline]
    #[must_use]
    pub const fn number(self) -> Option<u8> {
        if self.class.is_suit() {
            Some(self.value - b'0')
        } else {
            None
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_concealed(self) -> bool {
        self.concealed
    }

    #[inline]
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self.number(), Some(1 | 9))
    }

    #[inline]
    #[must_use]
    pub const fn is_simple(self) -> bool {
        matches!(self.number(), Some(2..=8))
    }

    #[inline]
    #[must_use]
    pub const fn is_honour(self) -> bool {
        self.class.is_honour()
    }

    #[must_use]
    pub const fn exposed(self) -> Self {
        Self {
            concealed: false,
            ..self
        }
    }

    #[must_use]
    pub const fn concealed(self) -> Self {
        Self {
            concealed: true,
            ..self
        }
    }

    /// Same tile regardless of visibility.
    #[inline]
    #[must_use]
    pub fn same_kind(self, other: Self) -> bool {
        self.class == other.class && self.value == other.value
    }

    /// Dense index over the 34 playable kinds, `None` for bonus and unknown
    /// tiles.
    #[must_use]
    pub fn kind_index(self) -> Option<usize> {
        match self.class {
            TileClass::Stone => Some((self.value - b'1') as usize),
            TileClass::Bamboo => Some(9 + (self.value - b'1') as usize),
            TileClass::Character => Some(18 + (self.value - b'1') as usize),
            TileClass::Wind => WINDS.find(self.value as char).map(|i| 27 + i),
            TileClass::Dragon => DRAGONS.find(self.value as char).map(|i| 31 + i),
            _ => None,
        }
    }
}

impl FromStr for Tile {
    type Err = InvalidTile;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.class.as_char();
        let c = if self.concealed { c.to_ascii_uppercase() } else { c };
        write!(f, "{c}{}", self.value as char)
    }
}

impl fmt::Debug for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Every playable tile kind as an exposed token, in kind-index order.
#[must_use]
pub fn all_kinds() -> Vec<Tile> {
    (0..KINDS).filter_map(Tile::from_kind_index).collect()
}
