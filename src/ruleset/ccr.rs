//! Classical Chinese rules written as regexes over the canonical strings.
use super::Ruleset;
use super::regex_gen::{
    at_least, concealed_kong, concealed_pung, exposed_kong, exposed_pung, last_tile_pair, mah_jongg_shape, meld_forms,
    normalized_mah_jongg, sets_and_pair, simples, summary_mah_jongg, terminals_honours,
};
use crate::error::RuleError;
use crate::rule::Rule;
use crate::tile::WINDS;

/// One alternative per wind: `form(wind token, wind char)`.
fn per_wind(form: impl Fn(&str, char) -> String) -> String {
    let parts: Vec<_> = WINDS.chars().map(|w| form(&format!("w{w}"), w)).collect();
    format!("(?:{})", parts.join("|"))
}

pub fn populate(ruleset: &mut Ruleset) -> Result<(), RuleError> {
    let simple = simples();
    let th = terminals_honours();
    let n = |body: String| format!("N{body}");

    ruleset.meld_rules = vec![
        Rule::new("Flower", &["I^f. "])?.points(4),
        Rule::new("Season", &["I^y. "])?.points(4),
        Rule::new("Exposed Pung", &[&n(meld_forms(&simple, exposed_pung))])?.points(2),
        Rule::new("Exposed Pung of Terminals or Honours", &[&n(meld_forms(&th, exposed_pung))])?.points(4),
        Rule::new("Concealed Pung", &[&n(meld_forms(&simple, concealed_pung))])?.points(4),
        Rule::new("Concealed Pung of Terminals or Honours", &[&n(meld_forms(&th, concealed_pung))])?.points(8),
        Rule::new("Exposed Kong", &[&n(meld_forms(&simple, exposed_kong))])?.points(8),
        Rule::new("Exposed Kong of Terminals or Honours", &[&n(meld_forms(&th, exposed_kong))])?.points(16),
        Rule::new("Concealed Kong", &[&n(meld_forms(&simple, concealed_kong))])?.points(16),
        Rule::new("Concealed Kong of Terminals or Honours", &[&n(meld_forms(&th, concealed_kong))])?.points(32),
        Rule::new("Pair of Own Wind", &[&format!("I^{}", per_wind(|t, w| format!("{t}{t} m{w}")))])?.points(2),
        Rule::new("Pair of Round Wind", &[&format!("I^{}", per_wind(|t, w| format!("{t}{t} m.{w}")))])?.points(2),
        Rule::new("Pair of Dragons", &["I^d.d. "])?.points(2),
        Rule::new("Pung/Kong of Dragons", &["I^d.d.d.(?:d.)? "])?.doubles(1),
        Rule::new("Pung/Kong of Own Wind", &[&format!("I^{}", per_wind(|t, w| format!("{t}{t}{t}(?:{t})? m{w}")))])?.doubles(1),
        Rule::new("Pung/Kong of Round Wind", &[&format!("I^{}", per_wind(|t, w| format!("{t}{t}{t}(?:{t})? m.{w}")))])?
            .doubles(1),
    ];

    let dragon_set = r"/[dD][34]\d\d";
    let wind_set = r"/[wW][34]\d\d";
    ruleset.hand_rules = vec![
        Rule::new("Own Flower and Own Season", &[r"I(?:\bfe\b.*\bye\b.* me|\bfs\b.*\bys\b.* ms|\bfw\b.*\byw\b.* mw|\bfn\b.*\byn\b.* mn)"])?
            .doubles(1),
        Rule::new("All Flowers", &["I^fe fn fs fw "])?.doubles(1),
        Rule::new("All Seasons", &[r"I\bye yn ys yw "])?.doubles(1),
        Rule::new("Three Concealed Pungs", &[&format!("S{}", at_least(r"/[A-Z][34]\d\d", 3))])?.doubles(1),
        Rule::new("Little Three Dragons", &[&format!("S{}", sets_and_pair(dragon_set, r"/[dD]2\d\d", 2))])?.doubles(1),
        Rule::new("Big Three Dragons", &[&format!("S{}", at_least(dragon_set, 3))])?.doubles(2),
        Rule::new("Little Four Joys", &[&format!("S{}", sets_and_pair(wind_set, r"/[wW]2\d\d", 3))])?.doubles(1),
    ];

    let any_set = r"/[a-zA-Z][034]\d\d";
    let any_pair = r"/[a-zA-Z]2\d\d";
    let suit_mah_jongg = |case_set: &str, case_pair: &str| {
        let parts: Vec<_> = ["sS", "bB", "cC"]
            .iter()
            .map(|cls| {
                mah_jongg_shape(
                    &format!("/[{cls}]{case_set}"),
                    &format!("/[{cls}]{case_pair}"),
                    "",
                )
            })
            .collect();
        format!("S^[^/]*(?:{}) M", parts.join("|"))
    };
    ruleset.mj_rules = vec![
        Rule::new("Mah Jongg", &[&format!("S{}", summary_mah_jongg(any_set, any_pair))])?.points(20),
        Rule::new("Last Tile Completes Pair of 2..8", &[&format!("I{}", last_tile_pair(&simple))])?.points(2),
        Rule::new("Last Tile Completes Pair of Terminals or Honours", &[&format!("I{}", last_tile_pair(&th))])?.points(4),
        Rule::new("Last Tile is Only Possible Tile", &["POnlyPossibleTile"])?.points(2),
        Rule::new("Won with Last Tile Taken from Wall", &[])?.points(2).source('w'),
        Rule::new("Won with Last Tile of Wall", &[])?.doubles(1).source('z'),
        Rule::new("Won with Last Tile of Wall Discarded", &[])?.doubles(1).source('Z'),
        Rule::new("Robbing the Kong", &[])?.doubles(1).source('k'),
        Rule::new("Mah Jongg with Call at Beginning", &[r"N M\S{5}a"])?.doubles(1),
        Rule::new("No Chow", &[&format!("S{}", summary_mah_jongg(r"/[a-zA-Z][34]\d\d", any_pair))])?.doubles(1),
        Rule::new("Only Concealed Melds", &[&format!("S{}", summary_mah_jongg(r"/[A-Z][034]\d\d", r"/[A-Z]2\d\d"))])?.doubles(1),
        Rule::new(
            "False Color Game",
            &[r"S^[^/]*(?:/[dwDW]\d{3})+(?:(?:/[sS]\d{3})+|(?:/[bB]\d{3})+|(?:/[cC]\d{3})+) M"],
        )?
        .doubles(1),
        Rule::new("True Color Game", &[&suit_mah_jongg(r"[034]\d\d", r"2\d\d")])?.doubles(3),
        Rule::new(
            "Four Pungs or Kongs of One Suit",
            &[
                &format!("S{}", at_least(r"/[sS][34]\d\d", 4)),
                &format!("S{}", at_least(r"/[bB][34]\d\d", 4)),
                &format!("S{}", at_least(r"/[cC][34]\d\d", 4)),
            ],
        )?
        .doubles(1),
        Rule::new("Only Terminals and Honours", &[&format!("I{}", normalized_mah_jongg("[sbc][19]|[wd]."))])?.doubles(1),
    ];

    let concealed_true_color: Vec<_> = ["s", "b", "c"]
        .iter()
        .map(|lo| {
            let up = lo.to_ascii_uppercase();
            let set = format!(r"(?:{up}\d(?:{up}\d){{2,3}}|{lo}\d{up}\d{up}\d{lo}\d|{lo}\d{lo}\d{lo}\d{up}\d)");
            mah_jongg_shape(&set, &format!(r"{up}\d{up}\d"), " ")
        })
        .collect();
    ruleset.limit_hands = vec![
        Rule::new("Thirteen Orphans", &[r"I^(?:[fy]. )*(?:(?:[sbc][19]|[wd].){1,2} ){13}m"])?,
        Rule::new("All Terminals", &[&format!("I{}", normalized_mah_jongg("[sbc][19]"))])?,
        Rule::new("All Honours", &[&format!("S{}", summary_mah_jongg(r"/[dwDW][034]\d\d", r"/[dwDW]2\d\d"))])?,
        Rule::new("Big Four Joys", &[&format!("S{}", at_least(wind_set, 4))])?,
        Rule::new("Fourfold Plenty", &[&format!("S{}", at_least(r"/[a-zA-Z]4\d\d", 4))])?,
        Rule::new(
            "Concealed True Color Game",
            &[&format!("N^(?:[fyFY]. )*(?:{}) M", concealed_true_color.join("|"))],
        )?,
        Rule::new("Hidden Treasure", &["PMJHiddenTreasure"])?,
        Rule::new("Blessing of Heaven or Earth", &[])?.source('1'),
    ];
    Ok(())
}
