//! deckforge - AI-assisted flashcard deck generator
//!
//! Turns a vocabulary CSV into an Anki `.apkg` package: each term gets a
//! generated cloze sentence, definition, and optional narrated audio from
//! a remote language-model service, and lands in one of three
//! priority-tier decks.
//!
//! # Architecture
//!
//! The system is a bounded-concurrency batch mapper:
//! - Routing for every row is resolved before dispatch
//! - Jobs run independently on a fixed-size worker pool
//! - Per-item failures are isolated; the batch always completes
//! - Results are folded into tier buckets in completion order, then
//!   serialized once, atomically
//!
//! # Modules
//!
//! - `adapters`: Remote service seams (OpenAI content + speech)
//! - `core`: Routing, per-item processing, batch coordination
//! - `deck`: Bucket accumulation and `.apkg` serialization
//! - `domain`: Data structures (records, notes, artifacts)
//! - `ingest`: CSV reading and validation
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Generate a deck from vocabulary.csv
//! OPENAI_API_KEY=... deckforge generate --input vocabulary.csv
//!
//! # See where a source label routes
//! deckforge classify "Core Concepts"
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod deck;
pub mod domain;
pub mod ingest;

// Re-export main types at crate root for convenience
pub use crate::adapters::{ContentGenerator, OpenAiClient, OpenAiConfig, SpeechSynthesizer};
pub use crate::core::{classify, BatchCoordinator, BatchOutcome, RoutingRules, RunSummary};
pub use crate::deck::{write_package, DeckBuckets, DeckNames};
pub use crate::domain::{
    AudioArtifact, DeckTier, GeneratedContent, InputRecord, NoteRecord, RoutingDecision,
};
pub use crate::ingest::{read_records, IngestError};
