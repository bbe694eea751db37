use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use crowns_core::{
    cards_per_round, check_meld, find_all_melds, find_best_meld_combination_with_rules,
    leftover_cards, sort_hand, validate_all_melds, verify_go_out, wild_rank_for_round, Card, Deck,
    MeldCombination, MeldKind, Rank, RulesConfig, ValidationResult,
};
use crowns_data::{load_hand_file, load_rules_or_default, parse_hand, parse_melds, LoadedHand};
use log::debug;
use serde::Serialize;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Parser)]
#[command(name = "crowns")]
#[command(about = "Five Crowns meld checker and finder", long_about = None)]
struct Args {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// JSON rules file overriding point values and search limits
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    /// Log more (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the wild rank and hand size of a round
    Wild { round: u32 },
    /// Validate meld groups, e.g. "7H 7S 7C | 4D 5D 6D"
    Check {
        #[arg(short, long)]
        round: u32,
        melds: String,
    },
    /// List every legal book and run in a hand
    Melds {
        #[arg(short, long)]
        round: u32,
        hand: String,
    },
    /// Find the melds leaving the fewest points in hand
    Best {
        #[arg(short, long)]
        round: u32,
        hand: String,
    },
    /// Check that the given melds lay down the whole hand
    GoOut {
        #[arg(short, long)]
        round: u32,
        #[arg(long)]
        hand: String,
        melds: String,
    },
    /// Shuffle a deck and deal a round
    Deal {
        #[arg(short, long)]
        round: u32,
        #[arg(short, long, default_value = "2")]
        players: usize,
        /// Shuffle seed (defaults to the current time)
        #[arg(short, long)]
        seed: Option<u64>,
    },
    /// Analyse a saved JSON hand file
    File { path: PathBuf },
}

#[derive(Serialize)]
struct WildReport {
    round: u32,
    wild: Rank,
    cards_per_hand: usize,
}

#[derive(Serialize)]
struct CheckReport {
    kinds: Vec<Option<MeldKind>>,
    result: ValidationResult,
    reason: Option<String>,
}

#[derive(Serialize)]
struct BestReport {
    melds: Vec<Vec<String>>,
    leftover: Vec<String>,
    leftover_points: u32,
    goes_out: bool,
}

impl BestReport {
    fn new(hand: &[Card], best: &MeldCombination) -> Self {
        Self {
            melds: best.melds.iter().map(|meld| tokens(meld)).collect(),
            leftover: tokens(&leftover_cards(hand, best)),
            leftover_points: best.leftover_points,
            goes_out: best.goes_out(),
        }
    }
}

#[derive(Serialize)]
struct GoOutReport {
    goes_out: bool,
    error: Option<String>,
}

#[derive(Serialize)]
struct DealReport {
    round: u32,
    wild: Rank,
    seed: u64,
    hands: Vec<Vec<String>>,
    discard: Option<String>,
    remaining: usize,
}

#[derive(Serialize)]
struct FileReport {
    round: u32,
    wild: Rank,
    best: BestReport,
    declared: Option<GoOutReport>,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);
    match run(args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(2);
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// Runs one command. `Ok(false)` means the command worked but the answer was
/// negative (an illegal meld, a hand that cannot go out).
fn run(args: Args) -> anyhow::Result<bool> {
    let rules = load_rules_or_default(args.rules.as_deref())?;
    debug!("rules: {rules:?}");
    match args.command {
        Command::Wild { round } => run_wild(round, args.json),
        Command::Check { round, melds } => run_check(round, &melds, args.json),
        Command::Melds { round, hand } => run_melds(round, &hand, args.json),
        Command::Best { round, hand } => run_best(round, &hand, &rules, args.json),
        Command::GoOut { round, hand, melds } => run_go_out(round, &hand, &melds, args.json),
        Command::Deal {
            round,
            players,
            seed,
        } => run_deal(round, players, seed, args.json),
        Command::File { path } => {
            let loaded = load_hand_file(&path)?;
            run_file(&loaded, &rules, args.json)
        }
    }
}

fn run_wild(round: u32, json: bool) -> anyhow::Result<bool> {
    let report = WildReport {
        round,
        wild: wild_rank_for_round(round)?,
        cards_per_hand: cards_per_round(round)?,
    };
    if json {
        print_json(&report)?;
    } else {
        println!(
            "round {}: {}s are wild, {} cards each",
            report.round, report.wild, report.cards_per_hand
        );
    }
    Ok(true)
}

fn run_check(round: u32, text: &str, json: bool) -> anyhow::Result<bool> {
    let wild = wild_rank_for_round(round)?;
    let melds = parse_melds(text)?;
    let result = validate_all_melds(&melds, wild);
    let kinds: Vec<Option<MeldKind>> = melds
        .iter()
        .map(|meld| check_meld(meld, wild).ok())
        .collect();
    if json {
        print_json(&CheckReport {
            kinds,
            reason: result.reason(),
            result,
        })?;
        return Ok(result.is_valid());
    }
    for (index, (meld, kind)) in melds.iter().zip(&kinds).enumerate() {
        let label = match kind {
            Some(MeldKind::Book) => "book",
            Some(MeldKind::Run) => "run",
            None => "illegal",
        };
        println!("{index}: {:<24} {label}", join(meld));
    }
    match result.failure() {
        None => println!("all {} melds are legal", melds.len()),
        Some(failure) => println!("{failure}"),
    }
    Ok(result.is_valid())
}

fn run_melds(round: u32, text: &str, json: bool) -> anyhow::Result<bool> {
    let wild = wild_rank_for_round(round)?;
    let hand = parse_hand(text)?;
    let melds = find_all_melds(&hand, wild);
    if json {
        let found: Vec<Vec<String>> = melds.iter().map(|meld| tokens(meld)).collect();
        print_json(&found)?;
    } else if melds.is_empty() {
        println!("no melds");
    } else {
        for meld in &melds {
            println!("{}", join(meld));
        }
    }
    Ok(!melds.is_empty())
}

fn run_best(round: u32, text: &str, rules: &RulesConfig, json: bool) -> anyhow::Result<bool> {
    let wild = wild_rank_for_round(round)?;
    let hand = parse_hand(text)?;
    let best = find_best_meld_combination_with_rules(&hand, wild, rules);
    let report = BestReport::new(&hand, &best);
    if json {
        print_json(&report)?;
    } else {
        print_best(&report);
    }
    Ok(report.goes_out)
}

fn run_go_out(round: u32, hand: &str, melds: &str, json: bool) -> anyhow::Result<bool> {
    let wild = wild_rank_for_round(round)?;
    let hand = parse_hand(hand)?;
    let melds = parse_melds(melds)?;
    let report = go_out_report(&hand, &melds, wild);
    if json {
        print_json(&report)?;
    } else {
        match &report.error {
            None => println!("goes out"),
            Some(err) => println!("cannot go out: {err}"),
        }
    }
    Ok(report.goes_out)
}

fn run_deal(round: u32, players: usize, seed: Option<u64>, json: bool) -> anyhow::Result<bool> {
    let wild = wild_rank_for_round(round)?;
    let seed = seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default()
    });
    let mut deck = Deck::shuffled(seed);
    let mut hands = deck
        .deal_round(round, players)
        .with_context(|| format!("deal round {round} to {players} players"))?;
    if let Some(card) = deck.draw() {
        deck.discard(card);
    }
    for hand in hands.iter_mut() {
        sort_hand(hand);
    }
    let report = DealReport {
        round,
        wild,
        seed,
        hands: hands.iter().map(|hand| tokens(hand)).collect(),
        discard: deck.peek_discard().map(Card::to_string),
        remaining: deck.remaining(),
    };
    if json {
        print_json(&report)?;
        return Ok(true);
    }
    println!("round {round}, {wild}s wild, seed {seed}");
    for (player, hand) in hands.iter().enumerate() {
        println!("player {}: {}", player + 1, join(hand));
    }
    if let Some(card) = &report.discard {
        println!("discard: {card}");
    }
    println!("{} cards left to draw", report.remaining);
    Ok(true)
}

fn run_file(loaded: &LoadedHand, rules: &RulesConfig, json: bool) -> anyhow::Result<bool> {
    let best = find_best_meld_combination_with_rules(&loaded.hand, loaded.wild, rules);
    let declared = if loaded.melds.is_empty() {
        None
    } else {
        Some(go_out_report(&loaded.hand, &loaded.melds, loaded.wild))
    };
    let report = FileReport {
        round: loaded.round,
        wild: loaded.wild,
        best: BestReport::new(&loaded.hand, &best),
        declared,
    };
    if json {
        print_json(&report)?;
    } else {
        println!("round {}, {}s wild: {}", report.round, report.wild, join(&loaded.hand));
        print_best(&report.best);
        match &report.declared {
            None => {}
            Some(GoOutReport { error: None, .. }) => println!("listed melds go out"),
            Some(GoOutReport {
                error: Some(err), ..
            }) => println!("listed melds cannot go out: {err}"),
        }
    }
    let declared_ok = report.declared.as_ref().map_or(true, |d| d.goes_out);
    Ok(declared_ok)
}

fn go_out_report(hand: &[Card], melds: &[Vec<Card>], wild: Rank) -> GoOutReport {
    match verify_go_out(hand, melds, wild) {
        Ok(()) => GoOutReport {
            goes_out: true,
            error: None,
        },
        Err(err) => GoOutReport {
            goes_out: false,
            error: Some(err.to_string()),
        },
    }
}

fn print_best(report: &BestReport) {
    for meld in &report.melds {
        println!("meld: {}", meld.join(" "));
    }
    if report.goes_out {
        println!("goes out");
    } else {
        println!(
            "left: {} ({} points)",
            report.leftover.join(" "),
            report.leftover_points
        );
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn tokens(cards: &[Card]) -> Vec<String> {
    cards.iter().map(Card::to_string).collect()
}

fn join(cards: &[Card]) -> String {
    tokens(cards).join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crowns_core::parse_cards;

    #[test]
    fn parses_global_flags_after_subcommand() {
        let args = Args::try_parse_from(["crowns", "best", "-r", "3", "7H 7S 7C", "--json", "-vv"])
            .unwrap();
        assert!(args.json);
        assert_eq!(args.verbose, 2);
        assert!(matches!(args.command, Command::Best { round: 3, .. }));
    }

    #[test]
    fn deal_defaults_to_two_players() {
        let args = Args::try_parse_from(["crowns", "deal", "--round", "1"]).unwrap();
        assert!(matches!(
            args.command,
            Command::Deal {
                round: 1,
                players: 2,
                seed: None
            }
        ));
    }

    #[test]
    fn best_report_lists_leftover_tokens() {
        let hand = parse_cards("7H 7S 7C KD").unwrap();
        let best = find_best_meld_combination_with_rules(&hand, Rank::Three, &RulesConfig::default());
        let report = BestReport::new(&hand, &best);
        assert_eq!(report.leftover, vec!["KD".to_string()]);
        assert_eq!(report.leftover_points, 10);
        assert!(!report.goes_out);
    }

    #[test]
    fn go_out_report_carries_reason() {
        let hand = parse_cards("5H 6S 7H").unwrap();
        let melds = vec![hand.clone()];
        let report = go_out_report(&hand, &melds, Rank::Three);
        assert!(!report.goes_out);
        assert_eq!(
            report.error.as_deref(),
            Some("meld 0 is not a valid book or run: mixed suits in run")
        );
    }

    #[test]
    fn bad_round_is_an_error() {
        assert!(run_wild(0, false).is_err());
        assert!(run_wild(11, true).unwrap());
    }
}
