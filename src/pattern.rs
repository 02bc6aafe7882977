//! Structured rule patterns: a list of slots, each describing a meld that
//! would fit there, matched against a hand by forced-choice binding.
//!
//! A [`Pattern`] is immutable once built. Matching never writes into it; the
//! result of a match is a separate [`Binding`].
use crate::meld::{Meld, MeldState, MeldType};
use crate::suffix::Suffix;
use crate::tile::{SUITS, Tile, TileClass};
use std::fmt;
use std::ops::{Add, BitOr, Mul};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TypeMask(u8);

impl TypeMask {
    pub const SINGLE: Self = Self(1 << 0);
    pub const PAIR: Self = Self(1 << 1);
    pub const CHOW: Self = Self(1 << 2);
    pub const PUNG: Self = Self(1 << 3);
    pub const KONG: Self = Self(1 << 4);
    pub const CLAIMED_KONG: Self = Self(1 << 5);
    pub const ALL: Self = Self(0b11_1111);

    #[inline]
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    #[must_use]
    pub const fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    #[must_use]
    pub const fn of(t: MeldType) -> Self {
        match t {
            MeldType::Single => Self::SINGLE,
            MeldType::Pair => Self::PAIR,
            MeldType::Chow => Self::CHOW,
            MeldType::Pung => Self::PUNG,
            MeldType::Kong => Self::KONG,
            MeldType::ClaimedKong => Self::CLAIMED_KONG,
        }
    }

    /// Smallest and largest meld size admitted by the mask.
    #[must_use]
    pub fn size_range(self) -> (usize, usize) {
        let sizes = [
            (Self::SINGLE, 1),
            (Self::PAIR, 2),
            (Self::CHOW, 3),
            (Self::PUNG, 3),
            (Self::KONG, 4),
            (Self::CLAIMED_KONG, 4),
        ];
        let admitted = sizes.iter().filter(|(m, _)| self.intersects(*m)).map(|&(_, n)| n);
        let min = admitted.clone().min().unwrap_or(0);
        let max = admitted.max().unwrap_or(0);
        (min, max)
    }
}

impl BitOr for TypeMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Debug for TypeMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = ["single", "pair", "chow", "pung", "kong", "claimed"];
        let set: Vec<_> = names.iter().enumerate().filter(|(i, _)| self.0 & (1 << i) != 0).map(|(_, n)| *n).collect();
        write!(f, "{}", set.join("|"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StateMask {
    pub concealed: bool,
    pub exposed: bool,
}

impl StateMask {
    pub const ANY: Self = Self {
        concealed: true,
        exposed: true,
    };
    pub const CONCEALED: Self = Self {
        concealed: true,
        exposed: false,
    };
    pub const EXPOSED: Self = Self {
        concealed: false,
        exposed: true,
    };

    #[must_use]
    pub const fn admits(self, state: MeldState) -> bool {
        match state {
            MeldState::Concealed => self.concealed,
            MeldState::Exposed => self.exposed,
        }
    }
}

/// One acceptable tile: a lowercase class character and a value, where the
/// value may also be `.` (any), `O` (own wind) or `R` (round wind).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentToken {
    pub class: char,
    pub value: char,
}

impl ContentToken {
    const fn new(class: char, value: char) -> Self {
        Self { class, value }
    }

    fn accepts(self, tile: Tile, own_wind: char, round_wind: char) -> bool {
        if tile.class().as_char() != self.class {
            return false;
        }
        match self.value {
            '.' => true,
            'O' => tile.value() == own_wind,
            'R' => tile.value() == round_wind,
            v => tile.value() == v,
        }
    }
}

const ALL_CLASSES: &str = "sbcwdfyx";

/// A constraint describing a meld that would fit at this position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub types: TypeMask,
    pub states: StateMask,
    pub content: Vec<ContentToken>,
    pub is_rest: bool,
    pub claimed_kong_as_concealed: bool,
}

impl Default for Slot {
    fn default() -> Self {
        Self {
            types: TypeMask::ALL,
            states: StateMask::ANY,
            content: ALL_CLASSES.chars().map(|c| ContentToken::new(c, '.')).collect(),
            is_rest: false,
            claimed_kong_as_concealed: false,
        }
    }
}

impl Slot {
    /// The type and state a meld presents to this slot.
    fn view(&self, meld: &Meld) -> Option<(TypeMask, MeldState)> {
        let t = meld.meld_type()?;
        if self.claimed_kong_as_concealed && t == MeldType::ClaimedKong {
            return Some((TypeMask::KONG, MeldState::Concealed));
        }
        Some((TypeMask::of(t), meld.state()))
    }

    #[must_use]
    pub fn accepts(&self, meld: &Meld, own_wind: char, round_wind: char) -> bool {
        let (min, max) = self.types.size_range();
        if !(min..=max).contains(&meld.size()) {
            return false;
        }
        let Some((t, state)) = self.view(meld) else {
            return false;
        };
        self.types.intersects(t)
            && self.states.admits(state)
            && meld
                .tiles()
                .iter()
                .all(|&tile| self.content.iter().any(|c| c.accepts(tile, own_wind, round_wind)))
    }

    fn keep_classes(&mut self, classes: &str) {
        self.content.retain(|c| classes.contains(c.class));
    }

    fn drop_classes(&mut self, classes: &str) {
        self.content.retain(|c| !classes.contains(c.class));
    }

    fn set_winds(&mut self, value: char) {
        self.keep_classes("w");
        for c in &mut self.content {
            c.value = value;
        }
        self.content.dedup();
    }

    /// Keeps only the listed (class, value) tiles, expanding wildcards.
    fn keep_tiles(&mut self, keep: impl Fn(char, char) -> bool) {
        let values = |class: char| -> &'static str {
            match class {
                's' | 'b' | 'c' => "123456789",
                'w' | 'f' | 'y' => "eswn",
                'd' => "bgr",
                _ => "y",
            }
        };
        let mut expanded = vec![];
        for c in &self.content {
            let candidates: Vec<char> = match c.value {
                '.' => values(c.class).chars().collect(),
                v => vec![v],
            };
            for v in candidates {
                // wind placeholders are honours and survive honour filters
                let probe = if matches!(v, 'O' | 'R') { 'e' } else { v };
                if keep(c.class, probe) {
                    expanded.push(ContentToken::new(c.class, v));
                }
            }
        }
        expanded.dedup();
        self.content = expanded;
    }
}

/// Result of a successful match: the slot each meld was bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub meld_slot: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pattern {
    pub slots: Vec<Slot>,
    pub is_mah_jongg: bool,
    pub one_color: bool,
}

impl Pattern {
    /// A single slot accepting anything.
    #[must_use]
    pub fn any() -> Self {
        Self {
            slots: vec![Slot::default()],
            ..Self::default()
        }
    }

    /// Four sets and a pair, only matching a won hand.
    #[must_use]
    pub fn mah_jongg() -> Self {
        let mut pattern = Decorator::ChowPungKong.apply(Self::any()) * 4 + Decorator::Pair.apply(Self::any());
        pattern.is_mah_jongg = true;
        pattern
    }

    /// Marks every slot of `inner` as the sink for unbound melds.
    #[must_use]
    pub fn rest(mut inner: Self) -> Self {
        for slot in &mut inner.slots {
            slot.is_rest = true;
        }
        inner
    }

    fn map_slots(mut self, f: impl Fn(&mut Slot)) -> Self {
        self.slots.iter_mut().for_each(f);
        self
    }

    /// Binds `melds` to slots. Slots with the fewest free candidates bind
    /// first; at level `L` every unbound slot with at most `L` free candidates
    /// takes its first one, repeated while that makes progress. Leftover melds
    /// go to the rest slot if there is one.
    #[must_use]
    pub fn bind(&self, melds: &[Meld], suffix: &Suffix) -> Option<Binding> {
        if self.is_mah_jongg && !suffix.won {
            return None;
        }
        if self.one_color {
            let mut suits = SUITS.chars().filter(|&s| melds.iter().any(|m| m.tile_type() == s));
            if suits.nth(1).is_some() {
                return None;
            }
        }

        let rest = self.slots.iter().position(|s| s.is_rest);
        let candidates: Vec<Vec<usize>> = self
            .slots
            .iter()
            .map(|slot| {
                if slot.is_rest {
                    return vec![];
                }
                (0..melds.len())
                    .filter(|&i| slot.accepts(&melds[i], suffix.own_wind, suffix.round_wind))
                    .collect()
            })
            .collect();

        let mut meld_slot: Vec<Option<usize>> = vec![None; melds.len()];
        let mut slot_bound = vec![false; self.slots.len()];
        'levels: for level in 1..=melds.len() {
            loop {
                let mut progress = false;
                for (si, cands) in candidates.iter().enumerate() {
                    if slot_bound[si] || self.slots[si].is_rest {
                        continue;
                    }
                    let mut free = cands.iter().copied().filter(|&m| meld_slot[m].is_none());
                    let Some(first) = free.next() else {
                        continue;
                    };
                    if 1 + free.count() <= level {
                        meld_slot[first] = Some(si);
                        slot_bound[si] = true;
                        progress = true;
                    }
                }
                log::trace!("level {level}: bound {meld_slot:?}");
                if meld_slot.iter().all(Option::is_some) {
                    break 'levels;
                }
                if !progress {
                    break;
                }
            }
        }

        let all_slots_bound = slot_bound.iter().zip(&self.slots).all(|(&bound, slot)| bound || slot.is_rest);
        if !all_slots_bound {
            return None;
        }
        let meld_slot = meld_slot
            .into_iter()
            .map(|s| s.or(rest))
            .collect::<Option<Vec<_>>>()?;
        Some(Binding { meld_slot })
    }

    #[must_use]
    pub fn matches(&self, melds: &[Meld], suffix: &Suffix) -> bool {
        self.bind(melds, suffix).is_some()
    }
}

impl Add for Pattern {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self.slots.extend(rhs.slots);
        self.is_mah_jongg |= rhs.is_mah_jongg;
        self.one_color |= rhs.one_color;
        self
    }
}

impl Mul<usize> for Pattern {
    type Output = Self;

    fn mul(mut self, n: usize) -> Self {
        let slots = std::mem::take(&mut self.slots);
        self.slots = (0..n).flat_map(|_| slots.iter().cloned()).collect();
        self
    }
}

/// Pattern transformers. Each applies to every slot of its argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decorator {
    Concealed,
    Exposed,
    Single,
    Pair,
    Chow,
    Pung,
    Kong,
    ClaimedKong,
    PungKong,
    ChowPungKong,
    NoChow,
    Honours,
    NoHonours,
    Winds,
    Dragons,
    OwnWind,
    RoundWind,
    Stone,
    Bamboo,
    Character,
    NoStone,
    NoBamboo,
    NoCharacter,
    OneColor,
    AllGreen,
    Terminals,
    Simple,
    NoSimple,
    ClaimedKongAsConcealed,
}

impl Decorator {
    pub const ALL: [(&'static str, Self); 29] = [
        ("Concealed", Self::Concealed),
        ("Exposed", Self::Exposed),
        ("Single", Self::Single),
        ("Pair", Self::Pair),
        ("Chow", Self::Chow),
        ("Pung", Self::Pung),
        ("Kong", Self::Kong),
        ("ClaimedKong", Self::ClaimedKong),
        ("PungKong", Self::PungKong),
        ("ChowPungKong", Self::ChowPungKong),
        ("NoChow", Self::NoChow),
        ("Honours", Self::Honours),
        ("NoHonours", Self::NoHonours),
        ("Winds", Self::Winds),
        ("Dragons", Self::Dragons),
        ("OwnWind", Self::OwnWind),
        ("RoundWind", Self::RoundWind),
        ("Stone", Self::Stone),
        ("Bamboo", Self::Bamboo),
        ("Character", Self::Character),
        ("NoStone", Self::NoStone),
        ("NoBamboo", Self::NoBamboo),
        ("NoCharacter", Self::NoCharacter),
        ("OneColor", Self::OneColor),
        ("AllGreen", Self::AllGreen),
        ("Terminals", Self::Terminals),
        ("Simple", Self::Simple),
        ("NoSimple", Self::NoSimple),
        ("ClaimedKongAsConcealed", Self::ClaimedKongAsConcealed),
    ];

    #[must_use]
    pub fn apply(self, pattern: Pattern) -> Pattern {
        let types = |mask: TypeMask| move |s: &mut Slot| s.types = mask;
        let pung_kong = TypeMask::PUNG | TypeMask::KONG | TypeMask::CLAIMED_KONG;
        match self {
            Self::Concealed => pattern.map_slots(|s| s.states = StateMask::CONCEALED),
            Self::Exposed => pattern.map_slots(|s| s.states = StateMask::EXPOSED),
            Self::Single => pattern.map_slots(types(TypeMask::SINGLE)),
            Self::Pair => pattern.map_slots(types(TypeMask::PAIR)),
            Self::Chow => pattern.map_slots(types(TypeMask::CHOW)),
            Self::Pung => pattern.map_slots(types(TypeMask::PUNG)),
            Self::Kong => pattern.map_slots(types(TypeMask::KONG | TypeMask::CLAIMED_KONG)),
            Self::ClaimedKong => pattern.map_slots(types(TypeMask::CLAIMED_KONG)),
            Self::PungKong => pattern.map_slots(types(pung_kong)),
            Self::ChowPungKong => pattern.map_slots(types(pung_kong | TypeMask::CHOW)),
            Self::NoChow => pattern.map_slots(|s| s.types = s.types.without(TypeMask::CHOW)),
            Self::Honours => pattern.map_slots(|s| s.keep_classes("wd")),
            Self::NoHonours => pattern.map_slots(|s| s.drop_classes("wd")),
            Self::Winds => pattern.map_slots(|s| s.keep_classes("w")),
            Self::Dragons => pattern.map_slots(|s| s.keep_classes("d")),
            Self::OwnWind => pattern.map_slots(|s| s.set_winds('O')),
            Self::RoundWind => pattern.map_slots(|s| s.set_winds('R')),
            Self::Stone => pattern.map_slots(|s| s.keep_classes("s")),
            Self::Bamboo => pattern.map_slots(|s| s.keep_classes("b")),
            Self::Character => pattern.map_slots(|s| s.keep_classes("c")),
            Self::NoStone => pattern.map_slots(|s| s.drop_classes("s")),
            Self::NoBamboo => pattern.map_slots(|s| s.drop_classes("b")),
            Self::NoCharacter => pattern.map_slots(|s| s.drop_classes("c")),
            Self::OneColor => Pattern {
                one_color: true,
                ..pattern
            },
            Self::AllGreen => pattern.map_slots(|s| s.keep_tiles(|c, v| matches!((c, v), ('b', '2' | '3' | '4' | '6' | '8') | ('d', 'g')))),
            Self::Terminals => pattern.map_slots(|s| s.keep_tiles(|c, v| is_suit(c) && matches!(v, '1' | '9'))),
            Self::Simple => pattern.map_slots(|s| s.keep_tiles(|c, v| is_suit(c) && matches!(v, '2'..='8'))),
            Self::NoSimple => {
                pattern.map_slots(|s| s.keep_tiles(|c, v| matches!(c, 'w' | 'd') || (is_suit(c) && matches!(v, '1' | '9'))))
            }
            Self::ClaimedKongAsConcealed => pattern.map_slots(|s| s.claimed_kong_as_concealed = true),
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().find(|(n, _)| *n == name).map(|&(_, d)| d)
    }
}

fn is_suit(class: char) -> bool {
    TileClass::from_char(class).is_some_and(TileClass::is_suit)
}

#[cfg(test)]
pub mod test {
    use super::*;

    fn melds(s: &str) -> Vec<Meld> {
        let mut melds: Vec<_> = s.split_whitespace().map(Meld::new).collect();
        melds.sort_by(Meld::canonical_cmp);
        melds
    }

    fn suffix(s: &str) -> Suffix {
        s.parse().unwrap()
    }

    #[test]
    pub fn size_ranges() {
        assert_eq!(TypeMask::ALL.size_range(), (1, 4));
        assert_eq!((TypeMask::CHOW | TypeMask::PUNG).size_range(), (3, 3));
        assert_eq!(TypeMask::PAIR.size_range(), (2, 2));
    }

    #[test]
    pub fn slot_filters() {
        let own = Decorator::OwnWind.apply(Decorator::Pair.apply(Pattern::any()));
        let slot = &own.slots[0];
        assert!(slot.accepts(&Meld::new("wewe"), 'e', 's'));
        assert!(!slot.accepts(&Meld::new("wsws"), 'e', 's'));
        assert!(!slot.accepts(&Meld::new("wewewe"), 'e', 's'));

        let simple = Decorator::Simple.apply(Decorator::Pung.apply(Pattern::any()));
        assert!(simple.slots[0].accepts(&Meld::new("s2s2s2"), 'e', 'e'));
        assert!(!simple.slots[0].accepts(&Meld::new("s9s9s9"), 'e', 'e'));
        assert!(!simple.slots[0].accepts(&Meld::new("drdrdr"), 'e', 'e'));

        let no_simple = Decorator::NoSimple.apply(Decorator::Pung.apply(Pattern::any()));
        assert!(no_simple.slots[0].accepts(&Meld::new("s9s9s9"), 'e', 'e'));
        assert!(no_simple.slots[0].accepts(&Meld::new("drdrdr"), 'e', 'e'));
        assert!(!no_simple.slots[0].accepts(&Meld::new("s5s5s5"), 'e', 'e'));

        let green = Decorator::AllGreen.apply(Pattern::any());
        assert!(green.slots[0].accepts(&Meld::new("b2b3b4"), 'e', 'e'));
        assert!(!green.slots[0].accepts(&Meld::new("b5b6b7"), 'e', 'e'));
    }

    #[test]
    pub fn concealed_and_claimed_kongs() {
        let concealed_kong = Decorator::Concealed.apply(Decorator::Kong.apply(Pattern::any()));
        let slot = &concealed_kong.slots[0];
        assert!(slot.accepts(&Meld::new("c1C1C1c1"), 'e', 'e'));
        assert!(!slot.accepts(&Meld::new("c1c1c1c1"), 'e', 'e'));
        assert!(!slot.accepts(&Meld::new("c1c1c1C1"), 'e', 'e'));

        let lenient = Decorator::ClaimedKongAsConcealed.apply(concealed_kong);
        assert!(lenient.slots[0].accepts(&Meld::new("c1c1c1C1"), 'e', 'e'));
    }

    #[test]
    pub fn mah_jongg_requires_won_hand() {
        let hand = melds("s1s2s3 s4s5s6 s7s8s9 b1b1b1 drdr");
        let mj = Pattern::mah_jongg();
        assert!(mj.matches(&hand, &suffix("Meeb1w")));
        assert!(!mj.matches(&hand, &suffix("mee")));
        let short = melds("s1s2s3 s4s5s6 s7s8s9 drdr");
        assert!(!mj.matches(&short, &suffix("Meeb1w")));
    }

    #[test]
    pub fn rest_takes_leftovers() {
        let dragons = Decorator::Dragons.apply(Decorator::PungKong.apply(Pattern::any()));
        let three = dragons.clone() * 3 + Pattern::rest(Pattern::any());
        let hand = melds("drdrdr dgdgdg dbdbdbdb s1s2s3 wewe");
        let binding = three.bind(&hand, &suffix("Meewew")).unwrap();
        assert_eq!(binding.meld_slot.iter().filter(|&&s| s == 3).count(), 2);

        let two_and_pair = dragons * 2 + Decorator::Dragons.apply(Decorator::Pair.apply(Pattern::any()));
        // no dragon pair here
        assert!(!two_and_pair.matches(&hand, &suffix("Meewew")));
        let little = melds("drdrdr dgdgdg dbdb");
        assert!(two_and_pair.matches(&little, &suffix("mee")));
    }

    #[test]
    pub fn one_color() {
        let false_color = Decorator::OneColor.apply(
            Decorator::Honours.apply(Pattern::any()) + Decorator::NoHonours.apply(Pattern::any()) + Pattern::rest(Pattern::any()),
        );
        assert!(false_color.matches(&melds("drdrdr wewe s1s2s3 s4s5s6 s7s7s7"), &suffix("Meewew")));
        assert!(!false_color.matches(&melds("drdrdr wewe s1s2s3 b4b5b6 s7s7s7"), &suffix("Meewew")));
        assert!(!false_color.matches(&melds("s1s1 s1s2s3 s4s5s6 s7s7s7 s9s9s9"), &suffix("Mees1w")));
    }

    #[test]
    pub fn forced_choice_binds_scarce_slots_first() {
        // the pair slot has a single candidate and binds at level one
        let pattern = Decorator::NoChow.apply(Pattern::mah_jongg());
        let hand = melds("s1s1s1 s2s2s2 s3s3s3 s4s4s4 s5s5");
        let binding = pattern.bind(&hand, &suffix("Mees5w")).unwrap();
        let pair_idx = hand.iter().position(Meld::is_pair).unwrap();
        assert_eq!(binding.meld_slot[pair_idx], 4);
        assert!(!pattern.matches(&melds("s1s2s3 s2s2s2 s3s3s3 s4s4s4 s5s5"), &suffix("Mees5w")));
    }

    #[test]
    pub fn operators() {
        let p = Decorator::Pung.apply(Pattern::any()) * 3 + Pattern::any();
        assert_eq!(p.slots.len(), 4);
        assert_eq!(p.slots[2].types, TypeMask::PUNG);
        assert_eq!(Decorator::from_name("NoSimple"), Some(Decorator::NoSimple));
        assert_eq!(Decorator::from_name("Nope"), None);
    }
}
