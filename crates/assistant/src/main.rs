//! Wellness assistant CLI
//!
//! Trains the three condition models from CSV and either prints their
//! evaluation reports or assesses a JSON input record.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use wellness_assistant::{
    Condition, ConditionOutcomes, DiabetesInput, FeatureMap, HeartInput, HypertensionInput,
    WellnessAssistant, WellnessConfig,
};

#[derive(Parser, Debug)]
#[command(name = "wellness")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Multi-condition wellness risk assistant", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Train all models and print their evaluation reports
    Report,
    /// Assess the conditions described by a JSON input file
    Assess {
        /// JSON object with optional `diabetes`, `heart` and `hypertension` sections
        #[arg(short, long)]
        input: PathBuf,
    },
}

/// Input sections; an absent section falls back to the record defaults
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct AssessInput {
    diabetes: Option<FeatureMap>,
    heart: Option<FeatureMap>,
    hypertension: Option<FeatureMap>,
}

impl AssessInput {
    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input {}", path.display()))?;
        serde_json::from_str(&content).context("Failed to parse input JSON")
    }
}

/// Output for a partially failed assessment
#[derive(Serialize)]
#[serde(untagged)]
enum OutcomeJson<T> {
    Ok(T),
    Err { error: String },
}

fn init_logging(level: &str, verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init()
        .context("Failed to set tracing subscriber")?;
    Ok(())
}

fn outcomes_json(outcomes: ConditionOutcomes) -> Result<String> {
    let mut out = BTreeMap::new();
    for (condition, outcome) in [
        (Condition::Diabetes, outcomes.diabetes),
        (Condition::Heart, outcomes.heart),
        (Condition::Hypertension, outcomes.hypertension),
    ] {
        let value = match outcome {
            Ok(assessment) => OutcomeJson::Ok(assessment),
            Err(err) => OutcomeJson::Err {
                error: err.to_string(),
            },
        };
        out.insert(condition.key(), value);
    }
    Ok(serde_json::to_string_pretty(&out)?)
}

fn report(assistant: &WellnessAssistant) -> Result<()> {
    for condition in Condition::ALL {
        let model = assistant.model(condition);
        println!("Model Performance for {}:", condition);
        println!("{}", model.report());
        println!("  features:    {}", model.feature_names().join(", "));
        println!("  baseline:    {:.4}", model.expected_value());
        println!("  trees:       {}", model.forest().num_trees());
        println!("  fingerprint: {}", model.fingerprint()?);
        println!();
    }
    Ok(())
}

fn assess(assistant: &WellnessAssistant, input: &Path) -> Result<()> {
    let input = AssessInput::from_file(input)?;
    let diabetes = input
        .diabetes
        .unwrap_or_else(|| FeatureMap::from(&DiabetesInput::default()));
    let heart = input
        .heart
        .unwrap_or_else(|| FeatureMap::from(&HeartInput::default()));
    let hypertension = input
        .hypertension
        .unwrap_or_else(|| FeatureMap::from(&HypertensionInput::default()));

    let outcomes = assistant.assess_each(&diabetes, &heart, &hypertension);
    if outcomes.is_complete() {
        let assessment = outcomes.into_result()?;
        println!("{}", serde_json::to_string_pretty(&assessment)?);
        return Ok(());
    }

    println!("{}", outcomes_json(outcomes)?);
    bail!("one or more conditions could not be assessed")
}

/// Where the configuration came from, for the startup log
fn config_source(path: Option<&Path>) -> String {
    match path {
        Some(path) => path.display().to_string(),
        None => "built-in defaults".to_string(),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // The log filter comes from the config, so nothing can be logged before this.
    let config = WellnessConfig::load(cli.config.as_deref())
        .context("Failed to load configuration")?;
    init_logging(&config.logging.level, cli.verbose)?;

    info!(
        "Wellness assistant v{} (forest core v{}, trainer v{})",
        wellness_assistant::VERSION,
        wellness_forest_core::VERSION,
        wellness_forest_trainer::VERSION
    );
    info!("Loaded configuration from: {}", config_source(cli.config.as_deref()));
    info!(
        data_dir = %config.datasets.data_dir.display(),
        trees = config.forest.tree_count,
        seed = config.forest.seed,
        "training configuration"
    );
    let assistant = WellnessAssistant::from_config(&config).context("Failed to build models")?;

    match cli.command {
        Command::Report => report(&assistant),
        Command::Assess { input } => assess(&assistant, &input),
    }
}
