//! Waits of a concealed tile multiset, used to decide whether the last tile
//! was the only tile that could complete the hand.
use crate::meld::{Meld, MeldState};
use crate::suffix::Suffix;
use crate::tile::{KINDS, Tile};

/// Whether `counts` splits into exactly `sets` pungs/chows plus one pair.
#[must_use]
pub fn is_complete(counts: &mut [u8; KINDS], sets: usize) -> bool {
    let total: usize = counts.iter().map(|&c| c as usize).sum();
    total == sets * 3 + 2 && decompose(counts, true)
}

fn decompose(counts: &mut [u8; KINDS], need_pair: bool) -> bool {
    let Some(i) = counts.iter().position(|&c| c > 0) else {
        return !need_pair;
    };
    if need_pair && counts[i] >= 2 {
        counts[i] -= 2;
        let ok = decompose(counts, false);
        counts[i] += 2;
        if ok {
            return true;
        }
    }
    if counts[i] >= 3 {
        counts[i] -= 3;
        let ok = decompose(counts, need_pair);
        counts[i] += 3;
        if ok {
            return true;
        }
    }
    // chows only within a suit, and i is the lowest tile left
    if i < 27 && i % 9 <= 6 && counts[i + 1] > 0 && counts[i + 2] > 0 {
        counts[i] -= 1;
        counts[i + 1] -= 1;
        counts[i + 2] -= 1;
        let ok = decompose(counts, need_pair);
        counts[i] += 1;
        counts[i + 1] += 1;
        counts[i + 2] += 1;
        if ok {
            return true;
        }
    }
    false
}

/// Melds that can no longer change: exposed chows and pungs and every kong.
fn is_fixed(meld: &Meld) -> bool {
    meld.is_kong() || ((meld.is_chow() || meld.is_pung()) && meld.state() == MeldState::Exposed)
}

/// Tile kinds that would complete the hand in place of the last tile.
#[must_use]
pub fn waits(melds: &[Meld], last: Tile) -> Vec<Tile> {
    let fixed = melds.iter().filter(|m| is_fixed(m)).count();
    let Some(sets) = 4usize.checked_sub(fixed) else {
        return vec![];
    };

    let mut free = [0u8; KINDS];
    let mut seen = [0u8; KINDS];
    for meld in melds {
        for tile in meld.tiles() {
            let Some(idx) = tile.kind_index() else {
                // unknown tiles leave nothing to reason about
                return vec![];
            };
            seen[idx] += 1;
            if !is_fixed(meld) {
                free[idx] += 1;
            }
        }
    }
    let Some(last_idx) = last.kind_index() else {
        return vec![];
    };
    if free[last_idx] == 0 {
        return vec![];
    }
    free[last_idx] -= 1;
    seen[last_idx] -= 1;

    (0..KINDS)
        .filter(|&k| seen[k] < 4)
        .filter(|&k| {
            free[k] += 1;
            let ok = is_complete(&mut free, sets);
            free[k] -= 1;
            ok
        })
        .filter_map(Tile::from_kind_index)
        .collect()
}

/// True iff the last tile was the only tile that completes the hand.
#[must_use]
pub fn only_possible_tile(melds: &[Meld], suffix: &Suffix) -> bool {
    let Some(last) = suffix.last_tile else {
        return false;
    };
    match waits(melds, last).as_slice() {
        [only] => only.same_kind(last),
        _ => false,
    }
}
