//! Final package serialization.
//!
//! Writes the three tier decks plus their media into one `.apkg` file,
//! using a temp-file-then-rename discipline: a failed write never leaves
//! a partial file at the destination.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use genanki_rs::{Deck, Note, Package};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::model::cloze_model;
use super::DeckBuckets;
use crate::domain::DeckTier;

/// Stable per-tier deck identities (imports depend on them)
const DECK_IDS: [(DeckTier, i64); 3] = [
    (DeckTier::Essential, 2059400101),
    (DeckTier::Enrichment, 2059400102),
    (DeckTier::Archive, 2059400103),
];

/// Hierarchical deck names, overridable from configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckNames {
    #[serde(default = "default_essential")]
    pub essential: String,

    #[serde(default = "default_enrichment")]
    pub enrichment: String,

    #[serde(default = "default_archive")]
    pub archive: String,
}

fn default_essential() -> String {
    "Flashcards::01_High_Priority".to_string()
}
fn default_enrichment() -> String {
    "Flashcards::02_Medium_Priority".to_string()
}
fn default_archive() -> String {
    "Flashcards::03_Low_Priority".to_string()
}

impl Default for DeckNames {
    fn default() -> Self {
        Self {
            essential: default_essential(),
            enrichment: default_enrichment(),
            archive: default_archive(),
        }
    }
}

impl DeckNames {
    /// Name for a tier's deck
    pub fn name(&self, tier: DeckTier) -> &str {
        match tier {
            DeckTier::Essential => &self.essential,
            DeckTier::Enrichment => &self.enrichment,
            DeckTier::Archive => &self.archive,
        }
    }
}

/// Serialize all buckets and media into `output`.
pub fn write_package(
    buckets: &DeckBuckets,
    media: &[PathBuf],
    names: &DeckNames,
    output: &Path,
) -> Result<()> {
    let model = cloze_model();
    let mut decks = Vec::with_capacity(DECK_IDS.len());

    for (tier, deck_id) in DECK_IDS {
        let mut deck = Deck::new(deck_id, names.name(tier), "");

        for record in buckets.notes(tier) {
            let note = Note::new_with_options(
                model.clone(),
                vec![
                    record.cloze_text.as_str(),
                    record.extra_html.as_str(),
                    record.audio_field.as_str(),
                    record.source_label.as_str(),
                ],
                None,
                Some(record.tags.iter().map(String::as_str).collect()),
                None,
            )
            .with_context(|| format!("failed to build note for '{}'", record.cloze_text))?;

            deck.add_note(note);
        }

        decks.push(deck);
    }

    let media_refs = media
        .iter()
        .map(|p| {
            p.to_str()
                .with_context(|| format!("media path is not valid UTF-8: {}", p.display()))
        })
        .collect::<Result<Vec<&str>>>()?;

    let mut package = Package::new(decks, media_refs).context("failed to assemble package")?;

    // The temp file lives next to the destination so the rename stays on
    // one filesystem.
    let dir = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let tmp = tempfile::Builder::new()
        .prefix(".deckforge-")
        .suffix(".apkg")
        .tempfile_in(dir)
        .context("failed to create temporary package file")?;

    let tmp_path = tmp
        .path()
        .to_str()
        .context("temporary path is not valid UTF-8")?
        .to_string();

    package
        .write_to_file(&tmp_path)
        .context("failed to write package")?;

    tmp.persist(output)
        .with_context(|| format!("failed to move package into place: {}", output.display()))?;

    info!(
        output = %output.display(),
        notes = buckets.len(),
        media = media.len(),
        "Package written"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NoteRecord;
    use tempfile::TempDir;

    fn note(text: &str, audio_field: &str) -> NoteRecord {
        NoteRecord {
            cloze_text: text.to_string(),
            extra_html: "<b>Meaning:</b> test".to_string(),
            audio_field: audio_field.to_string(),
            source_label: "Core".to_string(),
            tags: vec!["vocab".to_string()],
        }
    }

    #[test]
    fn test_deck_names_defaults_are_hierarchical() {
        let names = DeckNames::default();
        assert!(names.essential.starts_with("Flashcards::"));
        assert!(names.enrichment.contains("Medium"));
        assert_eq!(names.name(DeckTier::Archive), "Flashcards::03_Low_Priority");
    }

    #[test]
    fn test_write_package_creates_output() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("deck.apkg");

        let mut buckets = DeckBuckets::new();
        buckets.push(DeckTier::Essential, note("The {{c1::sun}} rises.", ""));
        buckets.push(DeckTier::Archive, note("A {{c1::moon}} sets.", ""));

        write_package(&buckets, &[], &DeckNames::default(), &output).unwrap();

        assert!(output.exists());
        assert!(std::fs::metadata(&output).unwrap().len() > 0);
    }

    #[test]
    fn test_write_package_with_empty_buckets() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("empty.apkg");

        write_package(&DeckBuckets::new(), &[], &DeckNames::default(), &output).unwrap();
        assert!(output.exists());
    }

    #[test]
    fn test_failed_write_leaves_no_partial_output() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("deck.apkg");

        let mut buckets = DeckBuckets::new();
        buckets.push(DeckTier::Essential, note("The {{c1::sun}}.", "[sound:a.mp3]"));

        // Media file does not exist, so serialization must fail
        let missing = dir.path().join("a.mp3");
        let result = write_package(
            &buckets,
            &[missing],
            &DeckNames::default(),
            &output,
        );

        assert!(result.is_err());
        assert!(!output.exists());
    }

    #[test]
    fn test_media_files_are_packaged() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("deck.apkg");

        let audio = dir.path().join("audio_0_sun.mp3");
        std::fs::write(&audio, b"mp3 bytes").unwrap();

        let mut buckets = DeckBuckets::new();
        buckets.push(
            DeckTier::Essential,
            note("The {{c1::sun}}.", "[sound:audio_0_sun.mp3]"),
        );

        write_package(&buckets, &[audio], &DeckNames::default(), &output).unwrap();
        assert!(output.exists());
    }
}
