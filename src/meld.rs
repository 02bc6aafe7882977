//! Melds: groups of one to four tiles.
use crate::pairs::Pairs;
use crate::tile::{Tile, TileClass};
use std::cmp::Ordering;
use std::fmt;
use tinyvec::ArrayVec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeldType {
    Single,
    Pair,
    Chow,
    Pung,
    /// Exposed `aaaa` or declared concealed `aAAa`.
    Kong,
    /// `aaaA`: a concealed pung completed by a claimed tile.
    ClaimedKong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeldState {
    Concealed,
    Exposed,
}

#[derive(Clone)]
pub struct Meld {
    content: Pairs,
    tiles: ArrayVec<[Tile; 4]>,
    meld_type: Option<MeldType>,
    /// Points awarded to this meld by meld rules.
    pub base_points: u32,
    /// Doubles awarded to this meld by meld rules.
    pub doubles: u32,
}

impl Meld {
    /// Classifies `content`. An invalid meld is still constructed so callers
    /// can report it; see [`Meld::is_valid`]. Valid melds are rewritten to the
    /// canonical case pattern of their own state.
    #[must_use]
    pub fn new(content: &str) -> Self {
        let tiles = parse_tiles(content);
        let content = Pairs::new(content);
        let meld_type = tiles.as_ref().and_then(|tiles| classify(&content, tiles));
        let mut meld = Self {
            content,
            tiles: tiles.unwrap_or_default(),
            meld_type,
            base_points: 0,
            doubles: 0,
        };
        if meld.is_valid() {
            meld.set_state(meld.state());
        }
        meld
    }

    #[inline]
    #[must_use]
    pub fn content(&self) -> &str {
        self.content.as_str()
    }

    #[inline]
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Number of tiles.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.content.len()
    }

    #[inline]
    #[must_use]
    pub const fn meld_type(&self) -> Option<MeldType> {
        self.meld_type
    }

    #[inline]
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.meld_type.is_some()
    }

    #[inline]
    #[must_use]
    pub fn is_single(&self) -> bool {
        self.meld_type == Some(MeldType::Single)
    }

    #[inline]
    #[must_use]
    pub fn is_pair(&self) -> bool {
        self.meld_type == Some(MeldType::Pair)
    }

    #[inline]
    #[must_use]
    pub fn is_chow(&self) -> bool {
        self.meld_type == Some(MeldType::Chow)
    }

    #[inline]
    #[must_use]
    pub fn is_pung(&self) -> bool {
        self.meld_type == Some(MeldType::Pung)
    }

    /// True for declared, exposed and claimed kongs alike.
    #[inline]
    #[must_use]
    pub fn is_kong(&self) -> bool {
        matches!(self.meld_type, Some(MeldType::Kong | MeldType::ClaimedKong))
    }

    #[inline]
    #[must_use]
    pub fn is_claimed_kong(&self) -> bool {
        self.meld_type == Some(MeldType::ClaimedKong)
    }

    /// Class character of the first tile, lowercased.
    #[must_use]
    pub fn tile_type(&self) -> char {
        self.content.as_str().chars().next().map_or(' ', |c| c.to_ascii_lowercase())
    }

    #[must_use]
    pub fn class(&self) -> Option<TileClass> {
        self.tiles.first().map(|t| t.class())
    }

    /// Flowers and seasons.
    #[must_use]
    pub fn is_bonus(&self) -> bool {
        self.class().is_some_and(TileClass::is_bonus)
    }

    #[must_use]
    pub fn state(&self) -> MeldState {
        let n = self.content.len();
        if self.content.is_lower(0..n) {
            MeldState::Exposed
        } else if n <= 2 || self.content.is_upper(1..n - 1) {
            MeldState::Concealed
        } else {
            MeldState::Exposed
        }
    }

    /// Rewrites the content to the canonical case pattern of `state`. A
    /// claimed kong keeps its mixed pattern.
    pub fn set_state(&mut self, state: MeldState) {
        if self.is_claimed_kong() {
            return;
        }
        let n = self.content.len();
        match state {
            MeldState::Exposed => self.content.to_lower(0..n),
            MeldState::Concealed if self.is_kong() => {
                self.content.to_lower(0..n);
                self.content.to_upper(1..n - 1);
            }
            MeldState::Concealed => self.content.to_upper(0..n),
        }
        for (tile, token) in self.tiles.iter_mut().zip(self.content.iter()) {
            if let Ok(t) = Tile::parse(token) {
                *tile = t;
            }
        }
    }

    /// Summary encoding `<class><size><points>`: class uppercase when
    /// concealed, size 0 for chows, points as two digits.
    #[must_use]
    pub fn regex(&self) -> String {
        let c = self.tile_type();
        let c = match self.state() {
            MeldState::Concealed => c.to_ascii_uppercase(),
            MeldState::Exposed => c,
        };
        let size = if self.is_chow() { 0 } else { self.size() };
        format!("{c}{size}{:02}", self.base_points)
    }

    /// Equality ignoring the case pattern, i.e. the same tiles in the same
    /// order. `==` compares the raw content and so also the state.
    #[must_use]
    pub fn same_tiles(&self, other: &Self) -> bool {
        self.content.as_str().eq_ignore_ascii_case(other.content.as_str())
    }

    /// Canonical order: tile class priority, then lowercased content.
    #[must_use]
    pub fn canonical_cmp(&self, other: &Self) -> Ordering {
        let key = |m: &Self| m.class().map_or(u8::MAX, TileClass::priority);
        key(self)
            .cmp(&key(other))
            .then_with(|| self.content.as_str().to_ascii_lowercase().cmp(&other.content.as_str().to_ascii_lowercase()))
    }
}

fn parse_tiles(content: &str) -> Option<ArrayVec<[Tile; 4]>> {
    if content.is_empty() || content.len() % 2 != 0 || content.len() > 8 || !content.is_ascii() {
        return None;
    }
    crate::pairs::tokens(content).map(|t| Tile::parse(t).ok()).collect()
}

fn classify(content: &Pairs, tiles: &[Tile]) -> Option<MeldType> {
    let first = tiles[0];
    if first.class().is_bonus() {
        return (tiles.len() == 1).then_some(MeldType::Single);
    }
    let all_same = tiles.iter().all(|t| t.same_kind(first));
    match tiles.len() {
        1 => Some(MeldType::Single),
        2 if all_same => Some(MeldType::Pair),
        3 if all_same => Some(MeldType::Pung),
        3 if is_run(tiles) => Some(MeldType::Chow),
        4 if all_same => {
            let (first, last) = (content.is_lower(0..1), content.is_lower(3..4));
            if content.is_lower(0..4) || (first && last && content.is_upper(1..3)) {
                Some(MeldType::Kong)
            } else if content.is_lower(0..3) && content.is_upper(3..4) {
                Some(MeldType::ClaimedKong)
            } else {
                // AAAA is an undeclared concealed kong and must be split
                None
            }
        }
        _ => None,
    }
}

fn is_run(tiles: &[Tile]) -> bool {
    let first = tiles[0];
    first.class().is_suit()
        && tiles.iter().all(|t| t.class() == first.class())
        && tiles
            .iter()
            .zip(tiles.iter().skip(1))
            .all(|(a, b)| b.number().zip(a.number()).is_some_and(|(b, a)| b == a + 1))
}

impl PartialEq for Meld {
    fn eq(&self, other: &Self) -> bool {
        self.content == other.content
    }
}

impl Eq for Meld {}

impl fmt::Display for Meld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.content.as_str())
    }
}

impl fmt::Debug for Meld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Meld({} {:?})", self.content.as_str(), self.meld_type)
    }
}
