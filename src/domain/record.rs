//! Input records and routing decisions.
//!
//! An `InputRecord` is one validated vocabulary row; its `RoutingDecision`
//! is resolved before dispatch so processing outcome never affects routing.

use serde::{Deserialize, Serialize};

/// A validated vocabulary row ready for processing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRecord {
    /// Zero-based row position in the input file; unique within a run and
    /// used to derive artifact file names
    pub index: usize,

    /// The term or phrase to build a card for (never empty)
    pub term: String,

    /// Free-text source label that drives routing
    pub source_label: String,
}

/// Priority tier a note is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeckTier {
    /// High-priority material
    Essential,

    /// Everything without an explicit priority signal
    Enrichment,

    /// Reference material, narration skipped
    Archive,
}

impl std::fmt::Display for DeckTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeckTier::Essential => write!(f, "essential"),
            DeckTier::Enrichment => write!(f, "enrichment"),
            DeckTier::Archive => write!(f, "archive"),
        }
    }
}

/// Where a record's output goes and whether narration is synthesized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutingDecision {
    /// Destination tier
    pub tier: DeckTier,

    /// Whether a speech-synthesis call is made for this record
    pub audio_enabled: bool,
}
