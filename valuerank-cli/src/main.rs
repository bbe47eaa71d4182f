mod config;
mod output;
mod parse;
mod prompt;
mod session;
mod simulate;

use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use valuerank_core::constants::{DEFAULT_RATING, TOP_LIST_SIZE};
use valuerank_core::{
    Choice, EngineConfig, EngineStats, Item, Next, RankingEngine, RatedItem, SessionRecord,
    Strategy, next_custom_id, rate, standard_values,
};

use crate::parse::{PairAnswer, SetAnswer};
use crate::session::SavedSession;

pub fn bail(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {msg}");
    std::process::exit(1);
}

#[derive(Parser)]
#[command(name = "valuerank", version, about = "Find your top personal values by comparing them")]
struct Cli {
    /// Log engine decisions to stderr (VALUERANK_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Run an interactive ranking session
    Rank(RankArgs),
    /// Answer automatically from a hidden order and report how well it was recovered
    Simulate(SimulateArgs),
    /// Create a default config file at ~/.config/valuerank/config.toml
    Init,
}

#[derive(Parser)]
struct RankArgs {
    /// Ranking strategy: "pairwise" or "maxdiff"
    #[arg(long)]
    strategy: Option<String>,

    /// Pairwise score update: "tally" or "elo"
    #[arg(long)]
    scoring: Option<String>,

    /// Add a custom value, "NAME=description" (repeatable)
    #[arg(long = "custom")]
    custom: Vec<String>,

    /// File of custom values, one "NAME=description" per line or a JSON array
    #[arg(long)]
    custom_file: Option<PathBuf>,

    /// Save progress here after every answer and resume from it on start
    #[arg(long)]
    progress_file: Option<PathBuf>,

    /// Ignore saved progress and start over
    #[arg(long)]
    fresh: bool,

    /// Fixed random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Skip the 1-10 importance ratings
    #[arg(long)]
    skip_rating: bool,

    /// How many top values to report
    #[arg(long, default_value_t = TOP_LIST_SIZE)]
    top: usize,

    /// Output JSON instead of table
    #[arg(long)]
    json: bool,

    /// Path to config file (default: ~/.config/valuerank/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser)]
struct SimulateArgs {
    /// Ranking strategy: "pairwise" or "maxdiff"
    #[arg(long, default_value = "pairwise")]
    strategy: String,

    /// Pairwise score update: "tally" or "elo"
    #[arg(long)]
    scoring: Option<String>,

    /// Pool size (93 = the standard values)
    #[arg(long, default_value_t = 93)]
    values: usize,

    /// Chance that a simulated answer ignores the hidden order
    #[arg(long, default_value_t = 0.0)]
    noise: f64,

    /// Chance that a pairwise question is skipped
    #[arg(long, default_value_t = 0.0)]
    skip_rate: f64,

    /// Number of independent runs; seeds count up from --seed
    #[arg(long, default_value_t = 1)]
    runs: u64,

    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Output JSON instead of a report
    #[arg(long)]
    json: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("VALUERANK_LOG").unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Rank(args) => run_rank(args),
        Commands::Simulate(args) => run_simulate(args),
        Commands::Init => {
            let path = config::config_path();
            config::create_default_config(&path);
            println!("Created config at {}", path.display());
            println!("Edit it to set your default strategy, progress file, etc.");
        }
    }
}

/// Prompt on stderr and read one line. `None` on end of input.
fn ask(prompt: &str) -> Option<String> {
    eprint!("{prompt}");
    let _ = io::stderr().flush();
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line),
        Err(e) => bail(format!("Failed to read from stdin: {e}")),
    }
}

/// Standard values plus the user's own, which get ids above the catalog.
fn build_pool(custom_specs: &[String]) -> (Vec<Item>, Vec<Item>) {
    let mut pool = standard_values();
    let mut customs = Vec::new();
    for spec in custom_specs {
        let (name, description) = parse::parse_custom(spec).unwrap_or_else(|e| bail(e));
        if pool.iter().any(|v| v.name == name) {
            bail(format!("\"{name}\" is already in the list of values"));
        }
        let item = Item::custom(next_custom_id(&pool), name, description);
        customs.push(item.clone());
        pool.push(item);
    }
    (pool, customs)
}

fn run_rank(args: RankArgs) {
    // Load config file, merge with CLI args (CLI wins)
    let config_path = args.config.clone().unwrap_or_else(config::config_path);
    let cfg = config::load_config(&config_path);

    let progress_path = args
        .progress_file
        .clone()
        .or_else(|| cfg.progress_file.as_deref().map(config::expand_home));
    let saved = match (&progress_path, args.fresh) {
        (Some(path), false) => session::load(path).unwrap_or_else(|e| bail(e)),
        _ => None,
    };
    let saved = saved.filter(|s| {
        if s.is_complete() {
            eprintln!("Saved session is already complete; starting a new one.");
        }
        !s.is_complete()
    });

    let strategy = match &saved {
        Some(s) => {
            if args.strategy.is_some() {
                eprintln!("Resuming a {} session; --strategy is ignored (use --fresh to start over).", s.strategy);
            }
            s.strategy
        }
        None => config::resolve_strategy(args.strategy.as_deref(), &cfg).unwrap_or_else(|e| bail(e)),
    };
    let scoring = config::resolve_scoring(args.scoring.as_deref(), &cfg).unwrap_or_else(|e| bail(e));
    let engine_config = EngineConfig {
        strategy,
        scoring,
        seed: args.seed.or(cfg.seed),
    };
    let skip_rating = args.skip_rating || cfg.skip_rating.unwrap_or(false);

    let (pool, customs) = match &saved {
        Some(s) => {
            let mut pool = standard_values();
            pool.extend(s.custom_values.iter().cloned());
            (pool, s.custom_values.clone())
        }
        None => {
            let mut specs = args.custom.clone();
            if let Some(ref path) = args.custom_file {
                let content = std::fs::read_to_string(path)
                    .unwrap_or_else(|e| bail(format!("Failed to read {}: {e}", path.display())));
                specs.extend(parse::parse_custom_list(&content).unwrap_or_else(|e| bail(e)));
            }
            build_pool(&specs)
        }
    };

    let mut engine = match &saved {
        Some(s) => {
            eprintln!("Resuming saved session ({:.0}% done).", s.progress.percent());
            RankingEngine::resume(pool, engine_config, &s.progress)
        }
        None => RankingEngine::new(pool, engine_config),
    }
    .unwrap_or_else(|e| bail(e));

    let save = |engine: &RankingEngine| {
        if let Some(ref path) = progress_path {
            let snapshot = SavedSession {
                strategy,
                custom_values: customs.clone(),
                progress: engine.snapshot(),
            };
            if let Err(e) = session::save(path, &snapshot) {
                tracing::warn!("{e}");
            }
        }
    };

    let answers = match run_questions(&mut engine, &save) {
        Some(answers) => answers,
        None => {
            save(&engine);
            match &progress_path {
                Some(path) => eprintln!("Progress saved to {}. Run again to continue.", path.display()),
                None => eprintln!("Stopped. Pass --progress-file to be able to resume."),
            }
            return;
        }
    };
    save(&engine);

    let ranking = engine.final_ranking();
    let top = engine.top_values(args.top);
    let rated: Vec<RatedItem> = if skip_rating {
        top.iter().map(RatedItem::unrated).collect()
    } else {
        collect_ratings(&top)
    };

    let record = SessionRecord::new(rated, &ranking);
    let confidence = engine.ranking_confidence();
    if args.json {
        output::print_json(&record, strategy, answers, confidence);
    } else {
        output::print_table(&record.top_values, answers, confidence);
    }
}

/// Ask questions until the engine completes. Returns the number of answers
/// recorded, counting those from a resumed session, or `None` if the user quit.
fn run_questions(engine: &mut RankingEngine, save: &dyn Fn(&RankingEngine)) -> Option<usize> {
    let mut answers = answers_so_far(engine);
    loop {
        let choice = match engine.next() {
            Next::Complete => return Some(answers),
            Next::Exhausted => {
                let waiting = match engine.stats() {
                    EngineStats::Pairwise(stats) => stats.pending_reopens,
                    EngineStats::MaxDiff(_) => 0,
                };
                if waiting == 0 {
                    eprintln!("No more informative questions; finishing with the answers so far.");
                    return Some(answers);
                }
                // Only cooling-down pairs are left; they come back shortly.
                std::thread::sleep(Duration::from_millis(500));
                continue;
            }
            Next::Pair([first, second]) => {
                let percent = engine.progress();
                loop {
                    let line = ask(&prompt::render_pair(&first, &second, percent))?;
                    match parse::parse_pair_answer(&line) {
                        Ok(PairAnswer::First) => {
                            break Choice::Pick { selected: first.id, rejected: second.id };
                        }
                        Ok(PairAnswer::Second) => {
                            break Choice::Pick { selected: second.id, rejected: first.id };
                        }
                        Ok(PairAnswer::Skip) => break Choice::Skip { first: first.id, second: second.id },
                        Ok(PairAnswer::Quit) => return None,
                        Err(msg) => eprintln!("{msg}"),
                    }
                }
            }
            Next::Set(set) => {
                let percent = engine.progress();
                loop {
                    let line = ask(&prompt::render_set(&set, percent))?;
                    match parse::parse_set_answer(&line, set.items.len()) {
                        Ok(SetAnswer::Pick { most, least }) => {
                            break Choice::Best {
                                set_id: set.set_id.clone(),
                                most: set.items[most].id,
                                least: set.items[least].id,
                            };
                        }
                        Ok(SetAnswer::Quit) => return None,
                        Err(msg) => eprintln!("{msg}"),
                    }
                }
            }
        };

        match engine.record(&choice) {
            Ok(()) => {
                if !matches!(choice, Choice::Skip { .. }) {
                    answers += 1;
                }
                save(engine);
            }
            Err(e) => eprintln!("{e}"),
        }
    }
}

/// Answers already recorded, including those carried in by a resume.
fn answers_so_far(engine: &RankingEngine) -> usize {
    engine.snapshot().completed_sets
}

fn collect_ratings(top: &[Item]) -> Vec<RatedItem> {
    eprintln!("\nRate how important each of your top values is to you.");
    top.iter()
        .enumerate()
        .map(|(i, item)| loop {
            let Some(line) = ask(&prompt::render_rating(i + 1, item, DEFAULT_RATING)) else {
                break RatedItem::unrated(item);
            };
            match parse::parse_rating(&line) {
                Ok(Some(rating)) => match rate(item, rating) {
                    Ok(rated) => break rated,
                    Err(e) => eprintln!("{e}"),
                },
                Ok(None) => break RatedItem::unrated(item),
                Err(msg) => eprintln!("{msg}"),
            }
        })
        .collect()
}

fn run_simulate(args: SimulateArgs) {
    let strategy: Strategy = args.strategy.parse().unwrap_or_else(|e: String| bail(e));
    let scoring = config::resolve_scoring(args.scoring.as_deref(), &config::ValuerankConfig::default())
        .unwrap_or_else(|e| bail(e));
    let min_values = match strategy {
        Strategy::Pairwise => 2,
        Strategy::MaxDiff => 3,
    };
    if args.values < min_values {
        bail(format!("--values must be at least {min_values} for {strategy}"));
    }
    if !(0.0..=1.0).contains(&args.noise) || !(0.0..1.0).contains(&args.skip_rate) {
        bail("--noise must be in [0, 1] and --skip-rate in [0, 1)");
    }

    let reports: Vec<simulate::SimulationReport> = (0..args.runs.max(1))
        .map(|run| {
            let opts = simulate::SimulationOptions {
                strategy,
                scoring,
                values: args.values,
                noise: args.noise,
                skip_rate: args.skip_rate,
                seed: args.seed.wrapping_add(run),
            };
            simulate::run_simulation(&opts).unwrap_or_else(|e| bail(e))
        })
        .collect();

    if args.json {
        match serde_json::to_string_pretty(&reports) {
            Ok(json) => println!("{json}"),
            Err(e) => bail(format!("Failed to serialize report: {e}")),
        }
        return;
    }

    for (i, report) in reports.iter().enumerate() {
        if reports.len() > 1 {
            println!("\nRun {} (seed {})", i + 1, args.seed.wrapping_add(i as u64));
        }
        simulate::print_report(report);
    }
    if reports.len() > 1 {
        let n = reports.len() as f64;
        let recovered = reports.iter().map(|r| r.top_recovered as f64).sum::<f64>() / n;
        let answers = reports.iter().map(|r| r.answers as f64).sum::<f64>() / n;
        println!("\n── Average over {} runs ─────────────────────────", reports.len());
        println!("Answers:               {answers:.1}");
        println!("Top recovered:         {recovered:.2}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_values_get_ids_after_catalog() {
        let specs = vec!["craft=to make things well".to_string(), "PLAY".to_string()];
        let (pool, customs) = build_pool(&specs);
        assert_eq!(pool.len(), 95);
        assert_eq!(customs.len(), 2);
        assert_eq!(customs[0].id, 94);
        assert_eq!(customs[0].name, "CRAFT");
        assert_eq!(customs[1].id, 95);
        assert!(customs.iter().all(|c| c.is_custom));
    }

    #[test]
    fn test_resumed_session_counts_earlier_answers() {
        let config = EngineConfig {
            strategy: Strategy::MaxDiff,
            seed: Some(3),
            ..EngineConfig::default()
        };
        let mut engine = RankingEngine::new(standard_values(), config.clone()).unwrap();
        for _ in 0..4 {
            let Next::Set(set) = engine.next() else { panic!("expected a set") };
            let ids = set.ids();
            engine
                .record(&Choice::Best { set_id: set.set_id, most: ids[0], least: ids[1] })
                .unwrap();
        }
        let resumed = RankingEngine::resume(standard_values(), config, &engine.snapshot()).unwrap();
        assert_eq!(answers_so_far(&resumed), 4);
    }

    #[test]
    fn test_cli_parses_rank_flags() {
        let cli = Cli::try_parse_from([
            "valuerank", "rank", "--strategy", "maxdiff", "--custom", "CRAFT=x", "--custom", "PLAY", "--json", "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Rank(args) => {
                assert_eq!(args.strategy.as_deref(), Some("maxdiff"));
                assert_eq!(args.custom.len(), 2);
                assert_eq!(args.top, 10);
                assert!(args.json);
            }
            _ => panic!("expected rank"),
        }
    }

    #[test]
    fn test_cli_simulate_defaults() {
        let cli = Cli::try_parse_from(["valuerank", "simulate"]).unwrap();
        match cli.command {
            Commands::Simulate(args) => {
                assert_eq!(args.values, 93);
                assert_eq!(args.runs, 1);
                assert_eq!(args.strategy, "pairwise");
            }
            _ => panic!("expected simulate"),
        }
    }
}
