//! Batch fan-out/fan-in across a bounded worker pool.
//!
//! Routing is resolved before dispatch, so every job carries its own
//! destination and no bookkeeping keyed by task handle is needed.
//! Completions are folded into the buckets as they arrive (completion
//! order, not submission order); the buckets and media list are only ever
//! touched by the drain loop.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};
use uuid::Uuid;

use crate::adapters::{ContentGenerator, SpeechSynthesizer};
use crate::core::processor::{self, ProcessedCard};
use crate::core::routing::{classify, RoutingRules};
use crate::deck::DeckBuckets;
use crate::domain::{InputRecord, RoutingDecision};

/// How many completions between progress log lines
const PROGRESS_INTERVAL: usize = 10;

/// Default number of in-flight jobs
pub const DEFAULT_CONCURRENCY: usize = 5;

/// A dispatched job: the record plus its pre-resolved destination
#[derive(Debug, Clone)]
struct CardJob {
    record: InputRecord,
    routing: RoutingDecision,
}

/// End-of-run accounting
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Identity of this batch run, for log correlation
    pub run_id: Uuid,

    /// Valid input records submitted
    pub total_records: usize,

    /// Notes that made it into a bucket
    pub notes_produced: usize,

    /// Items dropped after a content failure
    pub content_failures: usize,

    /// Narration files registered as package media
    pub audio_artifacts: usize,

    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

/// Everything the assembler needs to write the package
#[derive(Debug)]
pub struct BatchOutcome {
    /// Tier-keyed notes, in completion order
    pub buckets: DeckBuckets,

    /// Paths of every synthesized narration file
    pub media: Vec<PathBuf>,

    /// Aggregate counts for the run
    pub summary: RunSummary,
}

/// Coordinates parallel card generation over a bounded pool
pub struct BatchCoordinator {
    generator: Arc<dyn ContentGenerator>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    rules: RoutingRules,
    audio_dir: PathBuf,
    max_concurrent: usize,
}

impl BatchCoordinator {
    /// Create a coordinator with an explicit concurrency bound
    pub fn new(
        generator: Arc<dyn ContentGenerator>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        rules: RoutingRules,
        audio_dir: PathBuf,
        max_concurrent: usize,
    ) -> Self {
        Self {
            generator,
            synthesizer,
            rules,
            audio_dir,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Run all records through the pool and fold completions into buckets.
    ///
    /// Per-item failures never abort the batch; only infrastructure errors
    /// (scratch dir creation, a closed pool) surface as `Err`.
    pub async fn run(&self, records: Vec<InputRecord>) -> Result<BatchOutcome> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let total = records.len();

        info!(
            %run_id,
            total,
            max_concurrent = self.max_concurrent,
            "Starting batch run"
        );

        tokio::fs::create_dir_all(&self.audio_dir)
            .await
            .with_context(|| {
                format!("failed to create audio dir: {}", self.audio_dir.display())
            })?;

        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut tasks: JoinSet<(CardJob, Result<ProcessedCard>)> = JoinSet::new();

        // Submission order is input order; the permit is acquired before
        // spawning so at most `max_concurrent` jobs are ever in flight.
        for record in records {
            let routing = classify(&record.source_label, &self.rules);
            let job = CardJob { record, routing };

            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .context("worker pool closed unexpectedly")?;

            let generator = self.generator.clone();
            let synthesizer = self.synthesizer.clone();
            let audio_dir = self.audio_dir.clone();

            tasks.spawn(async move {
                let _permit = permit;
                let result = processor::process_record(
                    generator.as_ref(),
                    synthesizer.as_ref(),
                    &job.record,
                    job.routing.audio_enabled,
                    &audio_dir,
                )
                .await;
                (job, result)
            });
        }

        let mut buckets = DeckBuckets::new();
        let mut media: Vec<PathBuf> = Vec::new();
        let mut content_failures = 0usize;
        let mut completed = 0usize;

        while let Some(joined) = tasks.join_next().await {
            completed += 1;

            match joined {
                Ok((job, Ok(card))) => {
                    if let Some(artifact) = &card.audio {
                        media.push(artifact.path.clone());
                    }
                    buckets.push(job.routing.tier, card.note);
                }
                Ok((job, Err(e))) => {
                    content_failures += 1;
                    warn!(
                        term = %job.record.term,
                        error = %e,
                        "Dropping item after content failure"
                    );
                }
                Err(e) => {
                    // A panicked worker costs exactly its own item
                    content_failures += 1;
                    warn!(error = %e, "Worker task failed");
                }
            }

            if completed % PROGRESS_INTERVAL == 0 {
                info!(completed, total, "Progress");
            }
        }

        let summary = RunSummary {
            run_id,
            total_records: total,
            notes_produced: buckets.len(),
            content_failures,
            audio_artifacts: media.len(),
            started_at,
            completed_at: Utc::now(),
        };

        info!(
            %run_id,
            notes = summary.notes_produced,
            dropped = summary.content_failures,
            audio = summary.audio_artifacts,
            "Batch run complete"
        );

        Ok(BatchOutcome {
            buckets,
            media,
            summary,
        })
    }
}
