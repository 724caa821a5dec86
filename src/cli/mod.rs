//! Command-line interface for deckforge.
//!
//! Provides commands for generating a deck package from a vocabulary CSV,
//! inspecting how a label routes, and showing the resolved configuration.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use crate::adapters::{ContentGenerator, OpenAiClient, SpeechSynthesizer};
use crate::config::{self, ResolvedConfig};
use crate::core::coordinator::{BatchCoordinator, RunSummary};
use crate::core::routing::classify;
use crate::deck;
use crate::ingest;

/// deckforge - AI-assisted flashcard deck generator
#[derive(Parser, Debug)]
#[command(name = "deckforge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a deck package from a vocabulary CSV
    Generate {
        /// Input CSV (requires 'Front' and 'Source' columns)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output package path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Maximum in-flight generation jobs
        #[arg(short = 'c', long)]
        concurrency: Option<usize>,

        /// Scratch directory for narration files
        #[arg(long)]
        audio_dir: Option<PathBuf>,
    },

    /// Show how a source label would be routed
    Classify {
        /// The label to classify
        label: String,
    },

    /// Show resolved configuration
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Generate {
                input,
                output,
                concurrency,
                audio_dir,
            } => generate(input, output, concurrency, audio_dir).await,
            Commands::Classify { label } => classify_label(&label),
            Commands::Config => show_config(),
        }
    }
}

/// Run the full pipeline: read, fan out, assemble, write.
async fn generate(
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    concurrency: Option<usize>,
    audio_dir: Option<PathBuf>,
) -> Result<()> {
    let mut cfg = config::load()?;

    // CLI flags win over the config file
    if let Some(input) = input {
        cfg.input = input;
    }
    if let Some(output) = output {
        cfg.output = output;
    }
    if let Some(concurrency) = concurrency {
        cfg.max_concurrent = concurrency.max(1);
    }
    if let Some(audio_dir) = audio_dir {
        cfg.audio_dir = audio_dir;
    }

    // Credential check happens before any input is read or remote call made
    let client = Arc::new(OpenAiClient::from_env(cfg.openai.clone())?);

    let records = ingest::read_records(&cfg.input)
        .with_context(|| format!("failed to load input: {}", cfg.input.display()))?;

    info!(
        count = records.len(),
        input = %cfg.input.display(),
        "Loaded vocabulary rows"
    );

    let generator: Arc<dyn ContentGenerator> = client.clone();
    let synthesizer: Arc<dyn SpeechSynthesizer> = client;

    let coordinator = BatchCoordinator::new(
        generator,
        synthesizer,
        cfg.routing.clone(),
        cfg.audio_dir.clone(),
        cfg.max_concurrent,
    );

    let outcome = coordinator.run(records).await?;

    deck::write_package(&outcome.buckets, &outcome.media, &cfg.decks, &cfg.output)?;

    print_summary(&outcome.summary, &cfg.output);
    Ok(())
}

fn print_summary(summary: &RunSummary, output: &std::path::Path) {
    eprintln!("\n✅ Deck generated: {}", output.display());
    eprintln!("   Run:            {}", summary.run_id);
    eprintln!("   Total rows:     {}", summary.total_records);
    eprintln!("   Notes produced: {}", summary.notes_produced);
    eprintln!("   Dropped items:  {}", summary.content_failures);
    eprintln!("   Audio files:    {}", summary.audio_artifacts);
}

/// Show the routing decision for one label
fn classify_label(label: &str) -> Result<()> {
    let cfg = config::load()?;
    let decision = classify(label, &cfg.routing);

    println!("label: {}", label);
    println!("tier:  {}", decision.tier);
    println!(
        "audio: {}",
        if decision.audio_enabled {
            "enabled"
        } else {
            "disabled"
        }
    );

    Ok(())
}

/// Show the resolved configuration (for debugging)
fn show_config() -> Result<()> {
    let cfg: ResolvedConfig = config::load()?;

    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Paths:");
    println!("  Input:      {}", cfg.input.display());
    println!("  Output:     {}", cfg.output.display());
    println!("  Audio dir:  {}", cfg.audio_dir.display());
    println!();
    println!("Pipeline:");
    println!("  Max concurrent: {}", cfg.max_concurrent);
    println!("  Chat model:     {}", cfg.openai.chat_model);
    println!("  TTS model:      {} ({})", cfg.openai.tts_model, cfg.openai.tts_voice);
    println!("  Timeout:        {}s", cfg.openai.request_timeout_secs);
    println!();
    println!("Routing keywords:");
    println!("  High priority: {}", cfg.routing.high_priority.join(", "));
    println!("  Low priority:  {}", cfg.routing.low_priority.join(", "));
    println!();
    println!("Decks:");
    println!("  Essential:  {}", cfg.decks.essential);
    println!("  Enrichment: {}", cfg.decks.enrichment);
    println!("  Archive:    {}", cfg.decks.archive);

    Ok(())
}
