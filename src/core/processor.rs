//! Single-item processing: content generation plus optional narration.
//!
//! The failure policy is asymmetric: a failed or malformed content
//! response drops the whole item, while a failed synthesis call only
//! costs the narration and the note is kept with an empty audio field.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::warn;

use crate::adapters::{ContentGenerator, SpeechSynthesizer};
use crate::domain::{AudioArtifact, InputRecord, NoteRecord};

/// Maximum sanitized term length inside narration file names
const TERM_PREFIX_LEN: usize = 10;

/// Result of one record's processing
#[derive(Debug, Clone)]
pub struct ProcessedCard {
    /// The assembled note
    pub note: NoteRecord,

    /// Narration file, when one was requested and synthesis succeeded
    pub audio: Option<AudioArtifact>,
}

/// Derive a filesystem-safe narration file name from a record.
///
/// Non-alphanumeric characters are stripped and the term is truncated, so
/// the index prefix is what guarantees uniqueness within a run.
pub fn audio_file_name(index: usize, term: &str) -> String {
    let safe: String = term
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(TERM_PREFIX_LEN)
        .collect();
    format!("audio_{}_{}.mp3", index, safe)
}

/// Process one record end to end.
pub async fn process_record(
    generator: &dyn ContentGenerator,
    synthesizer: &dyn SpeechSynthesizer,
    record: &InputRecord,
    audio_enabled: bool,
    audio_dir: &Path,
) -> Result<ProcessedCard> {
    let content = generator
        .generate(&record.term, &record.source_label)
        .await
        .with_context(|| format!("content generation failed for '{}'", record.term))?;

    content
        .validate()
        .with_context(|| format!("malformed content for '{}'", record.term))?;

    let mut audio = None;
    if audio_enabled {
        let file_name = audio_file_name(record.index, &record.term);
        let path = audio_dir.join(&file_name);

        match synthesizer.synthesize(&content.audio_script, &path).await {
            Ok(()) => audio = Some(AudioArtifact { file_name, path }),
            Err(e) => {
                warn!(
                    term = %record.term,
                    error = %e,
                    "Speech synthesis failed, keeping note without audio"
                );
            }
        }
    }

    let audio_field = audio
        .as_ref()
        .map(|a| format!("[sound:{}]", a.file_name))
        .unwrap_or_default();

    let tags = content
        .tags
        .split_whitespace()
        .map(str::to_string)
        .collect();

    Ok(ProcessedCard {
        note: NoteRecord {
            cloze_text: content.cloze_text,
            extra_html: content.extra_html,
            audio_field,
            source_label: record.source_label.clone(),
            tags,
        },
        audio,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GeneratedContent;

    struct FixedGenerator;

    #[async_trait::async_trait]
    impl ContentGenerator for FixedGenerator {
        async fn generate(&self, term: &str, _source_label: &str) -> Result<GeneratedContent> {
            Ok(GeneratedContent {
                cloze_text: format!("The {{{{c1::{term}}}}}."),
                extra_html: "<b>Meaning:</b> test".to_string(),
                audio_script: "A sentence.".to_string(),
                tags: "vocab unit1".to_string(),
            })
        }
    }

    struct UnreachableSynthesizer;

    #[async_trait::async_trait]
    impl SpeechSynthesizer for UnreachableSynthesizer {
        async fn synthesize(&self, _script: &str, _output: &Path) -> Result<()> {
            panic!("synthesize must not be called for audio-disabled records");
        }
    }

    #[test]
    fn test_audio_disabled_never_calls_synthesizer() {
        let record = InputRecord {
            index: 0,
            term: "sol".to_string(),
            source_label: "Archived Notes".to_string(),
        };

        let card = tokio_test::block_on(process_record(
            &FixedGenerator,
            &UnreachableSynthesizer,
            &record,
            false,
            Path::new("unused"),
        ))
        .unwrap();

        assert!(card.audio.is_none());
        assert_eq!(card.note.audio_field, "");
        assert_eq!(card.note.tags, vec!["vocab", "unit1"]);
        assert_eq!(card.note.source_label, "Archived Notes");
    }

    #[test]
    fn test_audio_file_name_strips_and_truncates() {
        assert_eq!(audio_file_name(3, "hello"), "audio_3_hello.mp3");
        assert_eq!(audio_file_name(0, "c'est-à-dire"), "audio_0_cestdire.mp3");
        assert_eq!(
            audio_file_name(12, "extraordinarily long phrase"),
            "audio_12_extraordin.mp3"
        );
    }

    #[test]
    fn test_audio_file_name_survives_fully_symbolic_terms() {
        assert_eq!(audio_file_name(7, "!?¡"), "audio_7_.mp3");
    }

    #[test]
    fn test_audio_file_name_unique_per_index() {
        // Same term, different rows: the index prefix keeps names distinct
        assert_ne!(audio_file_name(1, "word"), audio_file_name(2, "word"));
    }
}
