//! F1 predictor CLI - train the classifier and rank likely finishers

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use f1predict::core::EvaluationReport;
use f1predict::{
    ClassifierTrainer, PipelineConfig, PredictRequest, PredictionService, RaceCorpus, TrainerConfig,
    TrainingSet,
};

#[derive(Parser)]
#[command(name = "f1predict")]
#[command(author, version, about = "F1 top-10 finisher prediction CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Run in interactive mode
    #[arg(short, long)]
    interactive: bool,

    /// Path to historical results CSV (default: $F1_DATA or F1_Data.csv)
    #[arg(long)]
    data: Option<PathBuf>,

    /// Number of trees in the forest
    #[arg(long)]
    trees: Option<u16>,

    /// Random seed for the split and the forest
    #[arg(long)]
    seed: Option<u64>,

    /// Held-out fraction for evaluation
    #[arg(long)]
    test_size: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the classifier and report held-out accuracy
    Train {
        /// Print the evaluation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Predict the top finishers for a race
    Predict {
        /// Race name (e.g. "Belgian Grand Prix")
        #[arg(long)]
        race: String,

        /// Circuit name
        #[arg(long)]
        circuit: String,

        /// Circuit location
        #[arg(long)]
        location: String,

        /// Race date (DD/MM/YYYY)
        #[arg(short, long)]
        date: String,

        /// Rain expected ("True" or "False")
        #[arg(long, default_value = "False", value_parser = ["True", "False"])]
        rainfall: String,

        /// Starting grid position (1-22)
        #[arg(short, long, value_parser = clap::value_parser!(i32).range(1..=22))]
        grid: i32,

        /// Driver first name
        #[arg(long, default_value = "")]
        forename: String,

        /// Driver last name
        #[arg(long, default_value = "")]
        surname: String,
    },
}

fn main() -> Result<()> {
    // Logs go to stderr so rankings on stdout stay clean
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    println!("{}", "F1 Classement Simulator".cyan().bold());
    println!();

    let config = resolve_config(&cli)?;

    if cli.interactive {
        let service = build_service(&config)?;
        run_interactive(&service)?;
    } else if let Some(command) = cli.command {
        match command {
            Commands::Train { json } => {
                let service = build_service(&config)?;
                if json {
                    println!("{}", serde_json::to_string_pretty(service.model().report())?);
                } else {
                    print_report(service.model().report());
                }
            }
            Commands::Predict {
                race,
                circuit,
                location,
                date,
                rainfall,
                grid,
                forename,
                surname,
            } => {
                let service = build_service(&config)?;
                let request = PredictRequest {
                    forename,
                    surname,
                    race_name: race,
                    circuit_name: circuit,
                    location,
                    date,
                    rainfall,
                    grid_position: grid,
                };
                print_ranking(&service, &request);
            }
        }
    } else {
        println!("Use --help for usage information or --interactive for interactive mode.");
    }

    Ok(())
}

/// Environment configuration overridden by command-line flags
fn resolve_config(cli: &Cli) -> Result<PipelineConfig> {
    let mut config = PipelineConfig::from_env().context("invalid F1_* environment variable")?;

    if let Some(ref data) = cli.data {
        config.data_path = data.clone();
    }
    if let Some(trees) = cli.trees {
        config.n_trees = trees;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(test_size) = cli.test_size {
        config.test_fraction = test_size;
    }

    config.validate().context("invalid command-line option")?;
    Ok(config)
}

/// Load the corpus and train, with a spinner per stage
fn build_service(config: &PipelineConfig) -> Result<PredictionService> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));

    pb.set_message(format!("Loading {}", config.data_path.display()));
    let corpus = RaceCorpus::load(&config.data_path)
        .with_context(|| format!("failed to load corpus {:?}", config.data_path))?;

    pb.set_message("Encoding features");
    let set = TrainingSet::from_corpus(&corpus);

    pb.set_message(format!("Training {} trees on {} rows", config.n_trees, set.len()));
    let model = ClassifierTrainer::new(TrainerConfig::from(config))
        .train(&set)
        .context("training failed")?;

    pb.finish_and_clear();

    println!(
        "Model ready: {} records, {} features, accuracy {}",
        corpus.len(),
        set.schema().len(),
        format!("{:.2}%", model.report().accuracy * 100.0).green()
    );
    println!();

    Ok(PredictionService::new(corpus, model, config.top_n))
}

fn print_report(report: &EvaluationReport) {
    println!("{}", "Evaluation".bold());
    println!("  Train rows: {}", report.train_size);
    println!("  Test rows:  {}", report.test_size);
    println!("  Classes:    {}", report.n_classes);
    println!(
        "  Accuracy:   {:.4} ({}/{})",
        report.accuracy, report.correct, report.test_size
    );
    println!();
    println!("  {:>8}  {:>7}  {:>5}", "Position", "Correct", "Total");
    for (label, hits) in &report.per_label {
        let position = if *label == 0 {
            "-".to_string()
        } else {
            label.to_string()
        };
        println!("  {:>8}  {:>7}  {:>5}", position, hits.correct, hits.total);
    }
}

fn print_ranking(service: &PredictionService, request: &PredictRequest) {
    println!("{}", "The Champions".yellow().bold());
    println!("{}", service.predict_top10(request));
}

fn run_interactive(service: &PredictionService) -> Result<()> {
    println!("{}", "Interactive mode".green().bold());
    println!("Enter race details to see who is likely to finish in the top 10.\n");

    let theme = ColorfulTheme::default();

    loop {
        let options = vec!["Predict a race", "Show evaluation", "Quit"];

        let selection = Select::with_theme(&theme)
            .with_prompt("What would you like to do?")
            .items(&options)
            .default(0)
            .interact()?;

        match selection {
            0 => {
                let request = prompt_request(&theme)?;
                println!();
                print_ranking(service, &request);
                println!();
            }
            1 => {
                println!();
                print_report(service.model().report());
                println!();
            }
            2 => {
                println!("Goodbye!");
                break;
            }
            _ => {}
        }
    }

    Ok(())
}

/// Collect the prediction form fields
fn prompt_request(theme: &ColorfulTheme) -> Result<PredictRequest> {
    let surname: String = Input::with_theme(theme)
        .with_prompt("Driver last name")
        .allow_empty(true)
        .interact_text()?;

    let forename: String = Input::with_theme(theme)
        .with_prompt("Driver first name")
        .allow_empty(true)
        .interact_text()?;

    let race_name: String = Input::with_theme(theme)
        .with_prompt("Race name")
        .interact_text()?;

    let circuit_name: String = Input::with_theme(theme)
        .with_prompt("Circuit name")
        .interact_text()?;

    let location: String = Input::with_theme(theme)
        .with_prompt("Location")
        .interact_text()?;

    // Free text on purpose: a malformed date is reported by the predictor
    let date: String = Input::with_theme(theme)
        .with_prompt("Date (DD/MM/YYYY)")
        .interact_text()?;

    let rain_options = ["True", "False"];
    let rain_idx = Select::with_theme(theme)
        .with_prompt("Rain?")
        .items(&rain_options)
        .default(1)
        .interact()?;

    let grid_position: i32 = Input::with_theme(theme)
        .with_prompt("Grid position (1-22)")
        .default(1)
        .validate_with(|grid: &i32| -> Result<(), &str> {
            if (1..=22).contains(grid) {
                Ok(())
            } else {
                Err("Grid position must be between 1 and 22")
            }
        })
        .interact_text()?;

    Ok(PredictRequest {
        forename,
        surname,
        race_name,
        circuit_name,
        location,
        date,
        rainfall: rain_options[rain_idx].to_string(),
        grid_position,
    })
}
