//! Core pipeline logic.
//!
//! This module contains:
//! - Routing: label classification into priority tiers
//! - Processor: single-item content and narration handling
//! - Coordinator: bounded fan-out/fan-in over the worker pool

pub mod coordinator;
pub mod processor;
pub mod routing;

// Re-export commonly used types
pub use coordinator::{BatchCoordinator, BatchOutcome, RunSummary};
pub use processor::{audio_file_name, process_record, ProcessedCard};
pub use routing::{classify, RoutingRules};
