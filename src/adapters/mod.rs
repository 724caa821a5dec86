//! Adapter interfaces for the remote generation services.
//!
//! Adapters provide a unified interface to the external AI endpoints the
//! pipeline consumes: structured content generation and speech synthesis.
//! The traits are the test seam: integration tests swap in deterministic
//! implementations.

pub mod openai;

use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::GeneratedContent;

// Re-export the OpenAI adapter
pub use openai::{OpenAiClient, OpenAiConfig};

/// Produces structured card content for a term
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Generate cloze text, definition HTML, audio script, and tags.
    ///
    /// Implementations return `Err` for any transport failure, non-success
    /// response, or response that does not parse into the expected shape.
    async fn generate(&self, term: &str, source_label: &str) -> Result<GeneratedContent>;
}

/// Renders narration audio for a script
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `script` and write the audio bytes to `output`.
    async fn synthesize(&self, script: &str, output: &Path) -> Result<()>;
}
