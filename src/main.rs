use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use console::style;
use mjscore::{Hand, HandError, Ruleset, RulesetParams, Score};
use rayon::prelude::*;
use std::io::BufRead;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mjscore", about = "Score classical Chinese Mahjong hands")]
struct Args {
    /// Hands to score. Read one per line from stdin when none are given.
    hands: Vec<String>,

    /// Ruleset to score with.
    #[arg(short, long, default_value = "CCP")]
    ruleset: String,

    /// JSON file with ruleset parameters.
    #[arg(long)]
    params: Option<PathBuf>,

    /// Score of a limit hand. Overrides the params file.
    #[arg(long)]
    limit: Option<u64>,

    /// Print one JSON object per hand.
    #[arg(long)]
    json: bool,

    /// Print the rules each hand matched.
    #[arg(short, long)]
    explain: bool,

    /// Score every hand under all predefined rulesets and report disagreements.
    #[arg(long)]
    compare: bool,

    /// More log output. Repeat for more.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let level = match record.level() {
            log::Level::Error => style("error").red().bold(),
            log::Level::Warn => style("warn").yellow(),
            log::Level::Info => style("info").green(),
            log::Level::Debug => style("debug").cyan(),
            log::Level::Trace => style("trace").dim(),
        };
        eprintln!("{level} {}", record.args());
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

/// `MJSCORE_LOG` wins over `-v`.
fn init_logging(verbose: u8) -> Result<()> {
    let level = match std::env::var("MJSCORE_LOG") {
        Ok(value) => value.parse().map_err(|_| anyhow!("bad MJSCORE_LOG value {value:?}"))?,
        Err(_) => match verbose {
            0 => log::LevelFilter::Error,
            1 => log::LevelFilter::Warn,
            2 => log::LevelFilter::Info,
            3 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        },
    };
    log::set_logger(&LOGGER).map_err(|e| anyhow!("{e}"))?;
    log::set_max_level(level);
    Ok(())
}

fn load_params(args: &Args) -> Result<RulesetParams> {
    let mut params = match &args.params {
        Some(path) => {
            let file = std::fs::File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
            serde_json::from_reader(std::io::BufReader::new(file))
                .with_context(|| format!("failed to parse {}", path.display()))?
        }
        None => RulesetParams::default(),
    };
    if let Some(limit) = args.limit {
        params.limit = limit;
    }
    Ok(params)
}

fn read_hands(args: &Args) -> Result<Vec<String>> {
    if !args.hands.is_empty() {
        return Ok(args.hands.clone());
    }
    let mut hands = vec![];
    for line in std::io::stdin().lock().lines() {
        let line = line.context("failed to read stdin")?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        hands.push(line.to_owned());
    }
    Ok(hands)
}

fn score_all(rulesets: &[Ruleset], hands: &[String]) -> Vec<Vec<Result<Score, HandError>>> {
    hands
        .par_iter()
        .map(|s| {
            rulesets
                .iter()
                .map(|ruleset| Hand::new(ruleset, s).map(|mut hand| hand.to_score()))
                .collect()
        })
        .collect()
}

fn print_one(hand: &str, result: &Result<Score, HandError>, args: &Args) -> Result<bool> {
    match result {
        Ok(score) if args.json => println!("{}", serde_json::to_string(score)?),
        Ok(score) => {
            println!("{}\t{}", score.total, score.hand);
            if args.explain {
                for line in &score.explain {
                    println!("    {line}");
                }
            }
        }
        Err(e) if args.json => println!("{}", serde_json::json!({ "hand": hand, "error": e.to_string() })),
        Err(e) => eprintln!("{} {hand}: {e}", style("rejected").red()),
    }
    Ok(result.is_ok())
}

/// Prints the common total or the per-ruleset totals, returns whether all
/// rulesets agreed.
fn print_comparison(hand: &str, rulesets: &[Ruleset], results: &[Result<Score, HandError>]) -> bool {
    let totals: Vec<Option<u64>> = results.iter().map(|r| r.as_ref().ok().map(|s| s.total)).collect();
    if totals.windows(2).all(|w| w[0] == w[1]) {
        match totals.first().copied().flatten() {
            Some(total) => println!("{total}\t{hand}"),
            None => println!("-\t{hand}"),
        }
        return true;
    }
    let parts: Vec<String> = rulesets
        .iter()
        .zip(&totals)
        .map(|(ruleset, total)| match total {
            Some(total) => format!("{}={total}", ruleset.name),
            None => format!("{}=rejected", ruleset.name),
        })
        .collect();
    println!("{}\t{hand}\t{}", style("MISMATCH").red().bold(), parts.join(" "));
    false
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose)?;

    let params = load_params(&args)?;
    let rulesets = if args.compare {
        Ruleset::NAMES.iter().map(|name| Ruleset::load_with(name, params)).collect::<Result<Vec<_>, _>>()?
    } else {
        vec![Ruleset::load_with(&args.ruleset, params).with_context(|| format!("cannot load ruleset {}", args.ruleset))?]
    };

    let hands = read_hands(&args)?;
    let results = score_all(&rulesets, &hands);

    let mut failed = 0;
    for (hand, results) in hands.iter().zip(&results) {
        let ok = if args.compare {
            print_comparison(hand, &rulesets, results)
        } else {
            results.iter().map(|r| print_one(hand, r, &args)).collect::<Result<Vec<_>>>()?.into_iter().all(|ok| ok)
        };
        if !ok {
            failed += 1;
        }
    }
    if failed > 0 {
        if args.compare {
            bail!("{failed} of {} hands scored differently", hands.len());
        }
        bail!("{failed} of {} hands rejected", hands.len());
    }
    Ok(())
}
