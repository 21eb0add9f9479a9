mod config;
mod interactive;
mod items;
mod output;

use clap::Parser;
use ordo_core::{anchor_samples, within_limit, CurveKind, FitOptions, RankingSession};
use std::io;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::interactive::{
    ask_value_table, choose_curve, fill_missing_prices, run_comparisons, Prompter,
};
use crate::items::{build_items, parse_items_from_str, Item};

pub fn bail(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {msg}");
    std::process::exit(1);
}

fn input_ended() -> ! {
    bail("Input ended before all questions were answered.");
}

#[derive(Parser)]
#[command(name = "ordo", version, about = "Rank items by pairwise preference and compare price with perceived value")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Rank items interactively, then fit a value curve
    Rank(RankArgs),
    /// Create a default config file at ~/.config/ordo/config.toml
    Init,
}

#[derive(Parser)]
struct RankArgs {
    /// File with one item per line (or a JSON array), e.g. "nike_airforce44.250.png"
    #[arg(long)]
    items: Option<PathBuf>,

    /// Inline item (repeatable)
    #[arg(long = "item")]
    inline_items: Vec<String>,

    /// Value curve: "linear" or "exponential". Asked interactively if unset.
    #[arg(long)]
    curve: Option<String>,

    /// Hide items whose price - value is above this number
    #[arg(long, allow_negative_numbers = true)]
    limit: Option<f64>,

    /// Decimal places in the summary table. Default: 0.
    #[arg(long)]
    precision: Option<usize>,

    /// Iteration cap for the exponential fit
    #[arg(long)]
    max_fit_iterations: Option<usize>,

    /// Output JSON instead of table
    #[arg(long)]
    json: bool,

    /// Show progress during execution
    #[arg(short, long)]
    verbose: bool,

    /// Path to config file (default: ~/.config/ordo/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Load item specs from --items and --item, de-duplicated.
fn load_items(args: &RankArgs) -> Vec<Item> {
    let mut specs = Vec::new();

    if let Some(ref path) = args.items {
        let content = std::fs::read_to_string(path)
            .unwrap_or_else(|e| bail(format!("Failed to read items file {}: {e}", path.display())));
        specs = parse_items_from_str(&content)
            .unwrap_or_else(|e| bail(format!("File looks like JSON but failed to parse: {e}")));
    }

    specs.extend(args.inline_items.iter().cloned());

    if specs.is_empty() {
        bail("No items provided. Use --items <file> or --item <name.price.suffix>.");
    }

    let items = build_items(&specs);
    if items.len() < 2 {
        bail(format!("Need at least 2 items to rank, got {}", items.len()));
    }
    items
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Rank(args) => {
            init_tracing(args.verbose);
            run_rank(args);
        }
        Commands::Init => {
            let path = config::create_default_config();
            println!("Created config at {}", path.display());
            println!("Edit it to set your default curve, output format, etc.");
        }
    }
}

fn run_rank(args: RankArgs) {
    // Load config file, merge with CLI args (CLI wins)
    let config_path = args.config.clone().unwrap_or_else(config::config_path);
    let cfg = config::load_config(&config_path);

    let preset_curve = args
        .curve
        .clone()
        .or(cfg.curve)
        .map(|name| name.parse::<CurveKind>().unwrap_or_else(|e| bail(e)));
    let limit = args.limit.or(cfg.limit);
    let precision = args.precision.or(cfg.precision).unwrap_or(0);
    let json = args.json || cfg.json.unwrap_or(false);
    let fit_options = FitOptions {
        max_iterations: args
            .max_fit_iterations
            .or(cfg.max_fit_iterations)
            .unwrap_or(FitOptions::default().max_iterations),
    };

    let mut items = load_items(&args);

    // Prompts go to stderr so that stdout only carries the summary.
    let mut prompter = Prompter::new(io::stdin().lock(), io::stderr());

    if !fill_missing_prices(&mut items, &mut prompter).unwrap_or_else(|e| bail(e)) {
        input_ended();
    }

    info!(items = items.len(), "Starting ranking session");
    let mut session = RankingSession::new(items.len());

    if !run_comparisons(&mut session, &items, &mut prompter).unwrap_or_else(|e| bail(e)) {
        input_ended();
    }
    info!(
        comparisons = session.decisions_made(),
        skips = session.skips_made(),
        possible = session.aggregator().total_pairs(),
        "All items ranked"
    );

    let Some(ranking) = session.ranking() else {
        bail("Ranking is incomplete.");
    };
    let ranked_titles: Vec<&str> = ranking.iter().map(|&i| items[i].title.as_str()).collect();
    prompter
        .notice(format!("\nYour ranking, favorite first: {}", ranked_titles.join(" > ")))
        .unwrap_or_else(|e| bail(e));

    if !choose_curve(&mut session, preset_curve, &mut prompter).unwrap_or_else(|e| bail(e)) {
        input_ended();
    }

    let Some((anchor_prices, rows)) =
        ask_value_table(&session, &items, &fit_options, &mut prompter).unwrap_or_else(|e| bail(e))
    else {
        input_ended();
    };
    debug!(?anchor_prices, "Value curve fitted");

    let shown = within_limit(&rows, limit);
    let curve = session.curve().unwrap_or_else(|| bail("No curve selected."));

    if json {
        let anchors = anchor_samples(curve, &anchor_prices, rows.len());
        let rendered = output::render_json(&shown, &items, curve, &anchors, session.decisions_made())
            .unwrap_or_else(|e| bail(format!("Failed to serialize output: {e}")));
        println!("{rendered}");
    } else {
        output::print_table(&shown, &items, precision, rows.len(), session.decisions_made());
    }
}
