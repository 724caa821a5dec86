//! Configuration for deckforge.
//!
//! Sources (highest priority first):
//! 1. CLI flags (applied by the command layer)
//! 2. Config file (.deckforge/config.yaml)
//! 3. Defaults
//!
//! Config file discovery searches the current directory and its parents.
//! The API credential is never read from the config file, only from the
//! `OPENAI_API_KEY` environment variable.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::adapters::OpenAiConfig;
use crate::core::coordinator::DEFAULT_CONCURRENCY;
use crate::core::routing::RoutingRules;
use crate::deck::DeckNames;

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub pipeline: Option<PipelineConfig>,

    #[serde(default)]
    pub routing: Option<RoutingRules>,

    #[serde(default)]
    pub openai: Option<OpenAiConfig>,

    #[serde(default)]
    pub decks: Option<DeckNames>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// Input CSV path
    pub input: Option<String>,

    /// Output package path
    pub output: Option<String>,

    /// Scratch directory for narration files
    pub audio_dir: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PipelineConfig {
    /// Maximum in-flight generation jobs
    pub max_concurrent: Option<usize>,
}

/// Resolved configuration with all defaults applied
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Input CSV path
    pub input: PathBuf,

    /// Output package path
    pub output: PathBuf,

    /// Scratch directory for narration files
    pub audio_dir: PathBuf,

    /// Worker pool bound
    pub max_concurrent: usize,

    /// Keyword lists driving tier routing
    pub routing: RoutingRules,

    /// Remote service settings
    pub openai: OpenAiConfig,

    /// Deck naming
    pub decks: DeckNames,

    /// Path to the config file (if one was found)
    pub config_file: Option<PathBuf>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("vocabulary.csv"),
            output: PathBuf::from("generated_deck.apkg"),
            audio_dir: PathBuf::from("temp_deck_audio"),
            max_concurrent: DEFAULT_CONCURRENCY,
            routing: RoutingRules::default(),
            openai: OpenAiConfig::default(),
            decks: DeckNames::default(),
            config_file: None,
        }
    }
}

/// Find a config file by searching the current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".deckforge").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse a config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("failed to parse config file: {}", path.display()))
}

fn apply_config_file(mut resolved: ResolvedConfig, file: ConfigFile) -> ResolvedConfig {
    if let Some(input) = file.paths.input {
        resolved.input = PathBuf::from(input);
    }
    if let Some(output) = file.paths.output {
        resolved.output = PathBuf::from(output);
    }
    if let Some(audio_dir) = file.paths.audio_dir {
        resolved.audio_dir = PathBuf::from(audio_dir);
    }
    if let Some(max) = file.pipeline.and_then(|p| p.max_concurrent) {
        resolved.max_concurrent = max.max(1);
    }
    if let Some(routing) = file.routing {
        resolved.routing = routing;
    }
    if let Some(openai) = file.openai {
        resolved.openai = openai;
    }
    if let Some(decks) = file.decks {
        resolved.decks = decks;
    }
    resolved
}

/// Load configuration from the discovered config file, or defaults.
///
/// Built once at process start and passed down by reference; there is no
/// global config state.
pub fn load() -> Result<ResolvedConfig> {
    let mut resolved = ResolvedConfig::default();

    if let Some(path) = find_config_file() {
        let file = load_config_file(&path)?;
        resolved = apply_config_file(resolved, file);
        resolved.config_file = Some(path);
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DeckTier;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ResolvedConfig::default();
        assert_eq!(config.input, PathBuf::from("vocabulary.csv"));
        assert_eq!(config.output, PathBuf::from("generated_deck.apkg"));
        assert_eq!(config.max_concurrent, DEFAULT_CONCURRENCY);
        assert!(config.config_file.is_none());
    }

    #[test]
    fn test_config_file_parsing_and_merge() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(
            file,
            r#"
paths:
  input: ./words.csv
  output: out/deck.apkg
pipeline:
  max_concurrent: 8
routing:
  high_priority: ["exam"]
  low_priority: ["someday"]
decks:
  essential: "Mine::Top"
"#
        )
        .unwrap();

        let parsed = load_config_file(&config_path).unwrap();
        let resolved = apply_config_file(ResolvedConfig::default(), parsed);

        assert_eq!(resolved.input, PathBuf::from("./words.csv"));
        assert_eq!(resolved.output, PathBuf::from("out/deck.apkg"));
        assert_eq!(resolved.max_concurrent, 8);
        assert_eq!(resolved.routing.high_priority, vec!["exam".to_string()]);
        assert_eq!(resolved.decks.name(DeckTier::Essential), "Mine::Top");
        // Untouched sections keep defaults
        assert_eq!(resolved.audio_dir, PathBuf::from("temp_deck_audio"));
        assert_eq!(resolved.openai.chat_model, "gpt-4o");
    }

    #[test]
    fn test_zero_concurrency_is_clamped() {
        let file = ConfigFile {
            pipeline: Some(PipelineConfig {
                max_concurrent: Some(0),
            }),
            ..Default::default()
        };
        let resolved = apply_config_file(ResolvedConfig::default(), file);
        assert_eq!(resolved.max_concurrent, 1);
    }

    #[test]
    fn test_empty_config_file_keeps_defaults() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.yaml");
        std::fs::write(&config_path, "paths: {}\n").unwrap();

        let parsed = load_config_file(&config_path).unwrap();
        let resolved = apply_config_file(ResolvedConfig::default(), parsed);
        assert_eq!(resolved.input, PathBuf::from("vocabulary.csv"));
    }
}
