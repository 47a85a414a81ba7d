// Copyright 2025 Servus Altissimi (Pseudonym)

// Permission is hereby granted, free of charge, to any person obtaining a copy of this software and associated documentation files (the "Software"), to deal in the Software without restriction, including without limitation the rights to use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the Software is furnished to do so, subject to the following conditions:
// The above copyright notice and this permission notice shall be included in all copies or substantial portions of the Software.
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use pggsim::metrics::analyzer;
use pggsim::models::{ModelRegistry, PopulationSpec, PublicGoodsGame};
use pggsim::revision::AdoptionRule;
use pggsim::simulation::{Simulation, SimConfig};

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::time::Instant;
use tracing::{info, Level};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(clap::Args, Clone)]
struct GameArgs {
    /// Players; ignored when --width/--height describe a lattice
    #[arg(short = 'n', long, default_value_t = 300)]
    players: usize,
    #[arg(long)]
    width: Option<usize>,
    #[arg(long)]
    height: Option<usize>,
    #[arg(short, long, default_value_t = 100)]
    epochs: usize,
    #[arg(short, long, default_value_t = 5)]
    participants: usize,
    #[arg(long)]
    games: Option<usize>,
    #[arg(short, long, default_value_t = 1.0)]
    cost: f64,
    #[arg(short, long, default_value_t = 3.0)]
    r: f64,
    #[arg(long, default_value_t = 1.0)]
    sigma: f64,
    #[arg(long, default_value_t = 0.1)]
    tau: f64,
    #[arg(short = 'k', long, default_value_t = 0.1)]
    noise: f64,
    /// Use 1/(1+exp(x/K)) instead of 1/(1+exp(x)/K)
    #[arg(long)]
    fermi: bool,
    /// Initial cooperator,defector,loner probabilities; uniform if omitted
    #[arg(long, value_delimiter = ',', num_args = 3)]
    distribution: Option<Vec<f64>>,
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
}

#[derive(Subcommand)]
enum Commands {
    Run {
        #[arg(short, long, default_value = "bucket")]
        model: String,
        #[command(flatten)]
        game: GameArgs,
        /// Print the per-epoch trajectory as JSON
        #[arg(long)]
        json: bool,
        /// Print the final lattice as a character grid
        #[arg(long)]
        grid: bool,
    },

    Compare {
        #[arg(short, long, default_value = "mean-field,bucket")]
        models: String,
        #[command(flatten)]
        game: GameArgs,
        #[arg(long, default_value_t = 3)]
        repetitions: u32,
    },

    List,
}

fn main() -> Result<()> {
    let program_start = Instant::now();

    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Run { model, game, json, grid } => {
            run_single_simulation(&model, &game, json, grid)?;
        }

        Commands::Compare { models, game, repetitions } => {
            compare_models(&models, &game, repetitions)?;
        }

        Commands::List => {
            println!("\nAvailable Models");

            for model in ModelRegistry::global().list() {
                println!("  - {}", model);
            }

            println!("\nUsage: cargo run -- run --model <name>");
            println!("Example: cargo run -- run --model lattice --width 50 --height 50 --grid\n");
        }
    }

    info!("Total runtime: {:.2}s", program_start.elapsed().as_secs_f64());

    Ok(())
}

fn build_config(name: String, model: &str, args: &GameArgs) -> Result<SimConfig> {
    let population = match (args.width, args.height) {
        (Some(width), Some(height)) => PopulationSpec::Lattice { width, height },
        (None, None) => PopulationSpec::Unstructured { players: args.players },
        _ => anyhow::bail!("--width and --height must be given together"),
    };

    let distribution = match args.distribution.as_deref() {
        None => None,
        Some([c, d, l]) => Some([*c, *d, *l]),
        Some(other) => anyhow::bail!("Expected 3 probabilities, got {}", other.len()),
    };

    let rule = if args.fermi { AdoptionRule::Fermi } else { AdoptionRule::Literal };

    let mut config = SimConfig {
        name,
        population,
        ..SimConfig::default()
    }
    .with_model(model)
    .with_epochs(args.epochs)
    .with_game(args.participants, args.cost, args.r, args.sigma)
    .with_revision(args.tau, args.noise, rule)
    .with_distribution(distribution)
    .with_seed(args.seed);
    config.games_per_epoch = args.games;

    Ok(config)
}

fn run_single_simulation(model: &str, args: &GameArgs, json: bool, grid: bool) -> Result<()> {
    let mut config = build_config(format!("{}_{}", model, args.seed), model, args)?;
    config.progress = !json;

    info!("PGG: Single Run");

    let mut sim = Simulation::new(config)?;
    sim.run()?;

    let report = analyzer::analyze(sim.metrics.snapshots(), model);

    if json {
        println!("{}", serde_json::to_string_pretty(sim.metrics.snapshots())?);
    } else {
        comparison_table(std::slice::from_ref(&report));
    }

    if grid {
        match sim.model().strategy_grid() {
            Some(strategy_grid) => print!("{}", strategy_grid),
            None => info!("Model {} has no lattice to show", model),
        }
    }

    Ok(())
}

fn compare_models(models_str: &str, args: &GameArgs, repetitions: u32) -> Result<()> {
    let model_names: Vec<&str> = models_str.split(',').map(|s| s.trim()).collect();

    info!("PGG: Comparison");
    info!("Models: {}", model_names.join(", "));
    info!("Repetitions: {}", repetitions);
    info!("Epochs per run: {}", args.epochs);

    let mut all_reports = Vec::new();

    for model_name in model_names {
        info!("Testing: {}", model_name);

        let mut model_reports = Vec::new();

        for rep in 1..=repetitions {
            let seed = args.seed.wrapping_add(rep as u64);
            info!("  Run {}/{} (seed {})", rep, repetitions, seed);

            let config = build_config(format!("{}_{}", model_name, rep), model_name, args)?
                .with_seed(seed);

            let mut sim = Simulation::new(config)?;
            sim.run()?;

            model_reports.push(analyzer::analyze(sim.metrics.snapshots(), model_name));
        }

        if let Some(avg) = average_reports(&model_reports) {
            all_reports.push(avg);
        }
    }

    comparison_table(&all_reports);

    Ok(())
}

fn average_reports(reports: &[analyzer::AnalysisReport]) -> Option<analyzer::AnalysisReport> {
    let first = reports.first()?;
    let n = reports.len() as f64;

    Some(analyzer::AnalysisReport {
        model_name: first.model_name.clone(),
        epochs: first.epochs,
        final_cooperators: reports.iter().map(|r| r.final_cooperators).sum::<f64>() / n,
        final_defectors: reports.iter().map(|r| r.final_defectors).sum::<f64>() / n,
        final_loners: reports.iter().map(|r| r.final_loners).sum::<f64>() / n,
        mean_cooperators: reports.iter().map(|r| r.mean_cooperators).sum::<f64>() / n,
        mean_defectors: reports.iter().map(|r| r.mean_defectors).sum::<f64>() / n,
        mean_loners: reports.iter().map(|r| r.mean_loners).sum::<f64>() / n,
        // only what died out in every repetition
        extinct: first
            .extinct
            .iter()
            .copied()
            .filter(|s| reports.iter().all(|r| r.extinct.contains(s)))
            .collect(),
    })
}

fn comparison_table(reports: &[analyzer::AnalysisReport]) {
    println!("\n╔════════════╦════════╦═══════════════════════════╦═══════════════════════════╗");
    println!("║ Model      ║ Epochs ║ Final C / D / L (%)       ║ Mean C / D / L (%)        ║");
    println!("╠════════════╬════════╬═══════════════════════════╬═══════════════════════════╣");

    for report in reports {
        println!(
            "║ {:<10} ║ {:>6} ║ {:>7.2} {:>7.2} {:>7.2}   ║ {:>7.2} {:>7.2} {:>7.2}   ║",
            report.model_name,
            report.epochs,
            report.final_cooperators * 100.0,
            report.final_defectors * 100.0,
            report.final_loners * 100.0,
            report.mean_cooperators * 100.0,
            report.mean_defectors * 100.0,
            report.mean_loners * 100.0,
        );
    }

    println!("╚════════════╩════════╩═══════════════════════════╩═══════════════════════════╝\n");

    for report in reports.iter().filter(|r| !r.extinct.is_empty()) {
        let names: Vec<String> = report.extinct.iter().map(|s| s.to_string()).collect();
        println!("{}: extinct {}", report.model_name, names.join(", "));
    }

    println!();
}
