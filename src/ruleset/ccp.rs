//! Classical Chinese rules written as pattern expressions.
use super::Ruleset;
use crate::error::RuleError;
use crate::rule::Rule;

pub fn populate(ruleset: &mut Ruleset) -> Result<(), RuleError> {
    ruleset.meld_rules = vec![
        Rule::new("Flower", &["I^f. "])?.points(4),
        Rule::new("Season", &["I^y. "])?.points(4),
        Rule::new("Exposed Pung", &["PExposed(Simple(Pung))"])?.points(2),
        Rule::new("Exposed Pung of Terminals or Honours", &["PExposed(NoSimple(Pung))"])?.points(4),
        Rule::new("Concealed Pung", &["PConcealed(Simple(Pung))"])?.points(4),
        Rule::new("Concealed Pung of Terminals or Honours", &["PConcealed(NoSimple(Pung))"])?.points(8),
        Rule::new("Exposed Kong", &["PExposed(Simple(Kong))"])?.points(8),
        Rule::new("Exposed Kong of Terminals or Honours", &["PExposed(NoSimple(Kong))"])?.points(16),
        Rule::new("Concealed Kong", &["PConcealed(Simple(Kong))"])?.points(16),
        Rule::new("Concealed Kong of Terminals or Honours", &["PConcealed(NoSimple(Kong))"])?.points(32),
        Rule::new("Pair of Own Wind", &["POwnWind(Pair)"])?.points(2),
        Rule::new("Pair of Round Wind", &["PRoundWind(Pair)"])?.points(2),
        Rule::new("Pair of Dragons", &["PDragons(Pair)"])?.points(2),
        Rule::new("Pung/Kong of Dragons", &["PDragons(PungKong)"])?.doubles(1),
        Rule::new("Pung/Kong of Own Wind", &["POwnWind(PungKong)"])?.doubles(1),
        Rule::new("Pung/Kong of Round Wind", &["PRoundWind(PungKong)"])?.doubles(1),
    ];

    // bonus tiles never reach the pattern matcher, so these stay regexes
    ruleset.hand_rules = vec![
        Rule::new("Own Flower and Own Season", &[r"I(?:\bfe\b.*\bye\b.* me|\bfs\b.*\bys\b.* ms|\bfw\b.*\byw\b.* mw|\bfn\b.*\byn\b.* mn)"])?
            .doubles(1),
        Rule::new("All Flowers", &["I^fe fn fs fw "])?.doubles(1),
        Rule::new("All Seasons", &[r"I\bye yn ys yw "])?.doubles(1),
        Rule::new("Three Concealed Pungs", &["PConcealed(PungKong)*3 + Rest"])?.doubles(1),
        Rule::new("Little Three Dragons", &["PDragons(PungKong)*2 + Dragons(Pair) + Rest"])?.doubles(1),
        Rule::new("Big Three Dragons", &["PDragons(PungKong)*3 + Rest"])?.doubles(2),
        Rule::new("Little Four Joys", &["PWinds(PungKong)*3 + Winds(Pair) + Rest"])?.doubles(1),
    ];

    ruleset.mj_rules = vec![
        Rule::new("Mah Jongg", &["PMahJongg"])?.points(20),
        Rule::new("Last Tile Completes Pair of 2..8", &["PLastTileCompletes(Simple(Pair))"])?.points(2),
        Rule::new("Last Tile Completes Pair of Terminals or Honours", &["PLastTileCompletes(NoSimple(Pair))"])?.points(4),
        Rule::new("Last Tile is Only Possible Tile", &["POnlyPossibleTile"])?.points(2),
        Rule::new("Won with Last Tile Taken from Wall", &[])?.points(2).source('w'),
        Rule::new("Won with Last Tile of Wall", &[])?.doubles(1).source('z'),
        Rule::new("Won with Last Tile of Wall Discarded", &[])?.doubles(1).source('Z'),
        Rule::new("Robbing the Kong", &[])?.doubles(1).source('k'),
        Rule::new("Mah Jongg with Call at Beginning", &[r"N M\S{5}a"])?.doubles(1),
        Rule::new("No Chow", &["PNoChow(MahJongg)"])?.doubles(1),
        Rule::new("Only Concealed Melds", &["PConcealed(MahJongg)"])?.doubles(1),
        Rule::new("False Color Game", &["POneColor(Honours + NoHonours + Rest)"])?.doubles(1),
        Rule::new("True Color Game", &["POneColor(NoHonours(MahJongg))"])?.doubles(3),
        Rule::new(
            "Four Pungs or Kongs of One Suit",
            &["PStone(PungKong)*4 + Rest", "PBamboo(PungKong)*4 + Rest", "PCharacter(PungKong)*4 + Rest"],
        )?
        .doubles(1),
        Rule::new("Only Terminals and Honours", &["PNoSimple(MahJongg)"])?.doubles(1),
    ];

    ruleset.limit_hands = vec![
        Rule::new("Thirteen Orphans", &["PNoSimple(Single)*12 + NoSimple(Pair)"])?,
        Rule::new("All Terminals", &["PTerminals(MahJongg)"])?,
        Rule::new("All Honours", &["PHonours(MahJongg)"])?,
        Rule::new("Big Four Joys", &["PWinds(PungKong)*4 + Rest"])?,
        Rule::new("Fourfold Plenty", &["PKong*4 + Rest"])?,
        Rule::new("Concealed True Color Game", &["PClaimedKongAsConcealed(Concealed(OneColor(NoHonours(MahJongg))))"])?,
        Rule::new("Hidden Treasure", &["PMJHiddenTreasure"])?,
        Rule::new("Blessing of Heaven or Earth", &[])?.source('1'),
    ];
    Ok(())
}
