//! Priority routing for source labels.
//!
//! Maps a free-text source label to a deck tier and audio policy using
//! ordered keyword sets. The keyword lists are configuration data, not
//! logic: operators can reroute material by editing the config file.

use serde::{Deserialize, Serialize};

use crate::domain::{DeckTier, RoutingDecision};

/// Keyword lists driving tier routing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingRules {
    /// Labels containing any of these go to the essential tier, with audio
    #[serde(default = "default_high_priority")]
    pub high_priority: Vec<String>,

    /// Labels containing any of these go to the archive tier, without audio
    #[serde(default = "default_low_priority")]
    pub low_priority: Vec<String>,
}

fn default_high_priority() -> Vec<String> {
    vec![
        "essential".to_string(),
        "priority".to_string(),
        "important".to_string(),
        "core".to_string(),
    ]
}

fn default_low_priority() -> Vec<String> {
    vec![
        "archive".to_string(),
        "reference".to_string(),
        "low".to_string(),
        "deprecated".to_string(),
    ]
}

impl Default for RoutingRules {
    fn default() -> Self {
        Self {
            high_priority: default_high_priority(),
            low_priority: default_low_priority(),
        }
    }
}

/// Route a source label to its tier and audio policy.
///
/// Case-insensitive, whitespace-trimmed substring matching in fixed
/// priority order: a high-priority match always wins, even when the label
/// also matches the low-priority set. Labels matching neither set land in
/// the enrichment tier with audio enabled.
pub fn classify(source_label: &str, rules: &RoutingRules) -> RoutingDecision {
    let label = source_label.trim().to_lowercase();

    if matches_any(&label, &rules.high_priority) {
        return RoutingDecision {
            tier: DeckTier::Essential,
            audio_enabled: true,
        };
    }

    if matches_any(&label, &rules.low_priority) {
        return RoutingDecision {
            tier: DeckTier::Archive,
            audio_enabled: false,
        };
    }

    RoutingDecision {
        tier: DeckTier::Enrichment,
        audio_enabled: true,
    }
}

fn matches_any(label: &str, keywords: &[String]) -> bool {
    keywords
        .iter()
        .any(|k| !k.is_empty() && label.contains(&k.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_high_priority_keyword_routes_essential_with_audio() {
        let rules = RoutingRules::default();
        let decision = classify("Core Concepts", &rules);
        assert_eq!(decision.tier, DeckTier::Essential);
        assert!(decision.audio_enabled);
    }

    #[test]
    fn test_low_priority_keyword_routes_archive_without_audio() {
        let rules = RoutingRules::default();
        let decision = classify("Archived Notes", &rules);
        assert_eq!(decision.tier, DeckTier::Archive);
        assert!(!decision.audio_enabled);
    }

    #[test]
    fn test_unmatched_label_routes_enrichment_with_audio() {
        let rules = RoutingRules::default();
        let decision = classify("Chapter 7 Vocabulary", &rules);
        assert_eq!(decision.tier, DeckTier::Enrichment);
        assert!(decision.audio_enabled);
    }

    #[test]
    fn test_high_priority_wins_over_low_priority() {
        let rules = RoutingRules::default();
        // "core" (high) and "reference" (low) both match
        let decision = classify("Core Reference Sheet", &rules);
        assert_eq!(decision.tier, DeckTier::Essential);
        assert!(decision.audio_enabled);
    }

    #[test]
    fn test_matching_is_case_insensitive_and_trimmed() {
        let rules = RoutingRules::default();
        assert_eq!(
            classify("  ESSENTIAL grammar  ", &rules).tier,
            DeckTier::Essential
        );
        assert_eq!(classify("DePrEcAtEd", &rules).tier, DeckTier::Archive);
    }

    #[test]
    fn test_custom_rules_override_defaults() {
        let rules = RoutingRules {
            high_priority: vec!["exam".to_string()],
            low_priority: vec!["someday".to_string()],
        };

        assert_eq!(classify("Exam Prep", &rules).tier, DeckTier::Essential);
        assert_eq!(classify("someday maybe", &rules).tier, DeckTier::Archive);
        // Default keywords no longer match
        assert_eq!(classify("Core Concepts", &rules).tier, DeckTier::Enrichment);
    }

    #[test]
    fn test_empty_keyword_never_matches() {
        let rules = RoutingRules {
            high_priority: vec![String::new()],
            low_priority: vec![],
        };
        assert_eq!(classify("anything", &rules).tier, DeckTier::Enrichment);
    }

    #[test]
    fn test_keyword_casing_in_config_is_ignored() {
        let rules = RoutingRules {
            high_priority: vec!["Exam".to_string()],
            low_priority: vec![],
        };
        assert_eq!(classify("final exam drill", &rules).tier, DeckTier::Essential);
    }
}
