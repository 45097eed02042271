use std::path::PathBuf;

use clap::Parser;
use cut_policy::efficiency::efficiency;
use cut_policy::env::CuttingEnv;
use cut_policy::render;
use cut_policy::selector::GreedyBestFit;
use cut_policy::stock::Stock;
use cut_policy::types::{Observation, ProductDemand, Rect};
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "cut_policy",
    about = "Greedy best-fit placement policy for 2D cutting stock"
)]
struct Cli {
    /// Stock sheet dimensions, repeatable (WxH, e.g. 10x8)
    #[arg(long = "stock")]
    stocks: Vec<String>,

    /// Products as WxH:qty (e.g. 4x3:2 2x2:5)
    #[arg(long = "cuts", num_args = 1..)]
    cuts: Vec<String>,

    /// Read products and stock grids from a JSON observation instead
    #[arg(long, conflicts_with_all = ["stocks", "cuts"])]
    observation: Option<PathBuf>,

    /// Stop after this many placements
    #[arg(long, default_value_t = 10_000)]
    max_steps: usize,

    /// Print the episode as JSON
    #[arg(long)]
    json: bool,

    /// Show ASCII layout of each stock
    #[arg(long)]
    layout: bool,

    /// Log each decision to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn parse_dimensions(s: &str) -> Result<Rect, String> {
    let parts: Vec<&str> = s.split('x').collect();
    if parts.len() != 2 {
        return Err(format!("invalid dimensions '{}', expected WxH", s));
    }
    let w = parts[0]
        .parse::<u32>()
        .map_err(|_| format!("invalid width in '{}'", s))?;
    let h = parts[1]
        .parse::<u32>()
        .map_err(|_| format!("invalid height in '{}'", s))?;
    if w == 0 || h == 0 {
        return Err(format!("dimensions must be non-zero in '{}'", s));
    }
    Ok(Rect::new(w, h))
}

fn parse_cut(s: &str) -> Result<ProductDemand, String> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 2 {
        return Err(format!("invalid cut '{}', expected WxH:qty", s));
    }
    let size = parse_dimensions(parts[0])?;
    let quantity = parts[1]
        .parse::<u32>()
        .map_err(|_| format!("invalid quantity in '{}'", s))?;
    Ok(ProductDemand::new(size, quantity))
}

fn load_observation(cli: &Cli) -> Result<Observation, String> {
    if let Some(path) = &cli.observation {
        let data = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
        return serde_json::from_str(&data)
            .map_err(|e| format!("invalid observation in {}: {}", path.display(), e));
    }

    if cli.stocks.is_empty() {
        return Err("at least one --stock or an --observation file is required".to_string());
    }
    let stocks = cli
        .stocks
        .iter()
        .map(|s| parse_dimensions(s).map(Stock::new))
        .collect::<Result<Vec<_>, _>>()?;
    let products = cli
        .cuts
        .iter()
        .map(|c| parse_cut(c))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Observation::new(products, stocks))
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let mut env = load_observation(&cli)
        .and_then(|obs| CuttingEnv::from_observation(obs).map_err(|e| e.to_string()))
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        });

    let episode = env.run(&GreedyBestFit::default(), cli.max_steps);

    if cli.json {
        match serde_json::to_string_pretty(&episode) {
            Ok(out) => println!("{out}"),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    for (i, decision) in episode.decisions.iter().enumerate() {
        println!("Step {}: {}", i + 1, decision);
    }
    println!();

    let observation = env.into_observation();
    for (i, stock) in observation.stocks.iter().enumerate() {
        let score = efficiency(stock).map_or("n/a".to_string(), |s| format!("{:.3}", s));
        println!("Stock {} ({}): efficiency {}", i, stock.size(), score);
        if cli.layout {
            print!("{}", render::render_stock(stock));
        }
    }
    println!();

    let remaining = observation.remaining_demand();
    println!(
        "Summary: {} placement{}, {} unplaced, {:.1}% stocks used, {:.1}% trim loss",
        episode.decisions.len(),
        if episode.decisions.len() == 1 { "" } else { "s" },
        remaining,
        episode.info.filled_ratio * 100.0,
        episode.info.trim_loss * 100.0,
    );
}
