//! Generated card content and assembled notes.

use std::path::PathBuf;

use serde::Deserialize;

/// Structured content returned by the generation model
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedContent {
    /// Sentence containing at least one cloze deletion marker
    pub cloze_text: String,

    /// Definition and usage HTML shown on the answer side
    pub extra_html: String,

    /// Plain-text sentence for speech synthesis
    pub audio_script: String,

    /// Space-separated tag list
    pub tags: String,
}

impl GeneratedContent {
    /// Check the response against the required shape.
    ///
    /// A response that parses but misses these constraints is still a
    /// content failure: the item is dropped, never patched up.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.cloze_text.trim().is_empty() {
            anyhow::bail!("cloze text is empty");
        }
        if !contains_cloze_marker(&self.cloze_text) {
            anyhow::bail!("cloze text has no deletion marker: {}", self.cloze_text);
        }
        if self.extra_html.trim().is_empty() {
            anyhow::bail!("extra field is empty");
        }
        Ok(())
    }
}

/// Check for at least one `{{cN::...}}` deletion marker
pub fn contains_cloze_marker(text: &str) -> bool {
    let mut rest = text;
    while let Some(pos) = rest.find("{{c") {
        let after = &rest[pos + 3..];
        let digits = after.chars().take_while(|c| c.is_ascii_digit()).count();
        if digits > 0 && after[digits..].starts_with("::") {
            return true;
        }
        rest = after;
    }
    false
}

/// A synthesized narration file on local scratch storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioArtifact {
    /// File name referenced from the note's audio field
    pub file_name: String,

    /// Location of the bytes on disk
    pub path: PathBuf,
}

/// A fully processed card, ready for bucket accumulation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteRecord {
    /// Sentence with cloze deletions
    pub cloze_text: String,

    /// Answer-side HTML
    pub extra_html: String,

    /// `[sound:...]` markup, or empty when no narration exists
    pub audio_field: String,

    /// The original source label, shown on the card
    pub source_label: String,

    /// Tags split from the generated tag string
    pub tags: Vec<String>,
}
