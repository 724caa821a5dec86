//! The shared cloze note model.
//!
//! One model serves every note in every tier; only deck membership
//! differs. The id must stay stable across runs so re-imports update
//! existing cards instead of duplicating them.

use genanki_rs::{Field, Model, ModelType, Template};

/// Stable model identity across runs
pub const MODEL_ID: i64 = 1607392319;

const CSS_STYLE: &str = r#".card {
    font-family: arial;
    font-size: 24px;
    text-align: center;
    color: black;
    background-color: white;
}
.cloze {
    font-weight: bold;
    color: #007bff;
}
.nightMode .cloze {
    color: #5dade2;
}
.extra {
    font-size: 18px;
    color: #555;
    margin-top: 20px;
}
.source-tag {
    font-size: 12px;
    color: #aaa;
    margin-top: 40px;
}
"#;

/// Build the cloze model used by every note
pub fn cloze_model() -> Model {
    Model::new_with_options(
        MODEL_ID,
        "AI Cloze Flashcard",
        vec![
            Field::new("Text"),
            Field::new("Extra"),
            Field::new("Audio"),
            Field::new("Source"),
        ],
        vec![Template::new("Cloze Card").qfmt("{{cloze:Text}}").afmt(
            r#"{{cloze:Text}}<br><div class="extra">{{Extra}}</div><br>{{Audio}}<div class="source-tag">{{Source}}</div>"#,
        )],
        Some(CSS_STYLE),
        Some(ModelType::Cloze),
        None,
        None,
        None,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use genanki_rs::Note;

    #[test]
    fn test_model_accepts_four_fields() {
        let note = Note::new(
            cloze_model(),
            vec!["The {{c1::word}}.", "<b>Meaning:</b> x", "", "Core"],
        );
        assert!(note.is_ok());
    }

    #[test]
    fn test_model_rejects_wrong_field_count() {
        let note = Note::new(cloze_model(), vec!["only one field"]);
        assert!(note.is_err());
    }
}
