//! Keyword-based clinical entity extraction.
//!
//! A fixed, ordered table of patterns is tested against each utterance;
//! every rule that matches produces one [`ClinicalEntity`] carrying the
//! rule's declared value and codes. Matching is case-insensitive and
//! independent per rule, so one utterance can yield several entities.

use rand::Rng;
use regex::RegexBuilder;
use tracing::debug;
use uuid::Uuid;

use crate::defaults::ENTITY_CONFIDENCE_MIN;
use crate::error::Result;
use crate::simulator::SharedRng;
use crate::types::{ClinicalEntity, EntityKind, TextSpan};

/// Source row of the extraction table.
struct PatternRow {
    pattern: &'static str,
    kind: EntityKind,
    value: &'static str,
    icd10: Option<&'static str>,
    snomed_ct: Option<&'static str>,
}

/// The fixed extraction rules, in evaluation order. Extend by adding rows;
/// the matching loop never needs to change.
const PATTERN_TABLE: [PatternRow; 5] = [
    PatternRow {
        pattern: r"chest pain",
        kind: EntityKind::Symptom,
        value: "chest pain",
        icd10: Some("R06.02"),
        snomed_ct: None,
    },
    PatternRow {
        pattern: r"nausea",
        kind: EntityKind::Symptom,
        value: "nausea",
        icd10: Some("R11.0"),
        snomed_ct: None,
    },
    PatternRow {
        pattern: r"blood pressure.*?(\d+).*?(?:over|/).*?(\d+)",
        kind: EntityKind::Vital,
        value: "blood pressure",
        icd10: None,
        snomed_ct: Some("75367002"),
    },
    PatternRow {
        pattern: r"lisinopril",
        kind: EntityKind::Medication,
        value: "lisinopril",
        icd10: None,
        snomed_ct: Some("29046004"),
    },
    PatternRow {
        pattern: r"blood sugar.*?(\d+)",
        kind: EntityKind::Vital,
        value: "blood glucose",
        icd10: None,
        snomed_ct: Some("33747000"),
    },
];

/// One compiled extraction rule: a matching pattern paired with the entity
/// it produces.
struct EntityPattern {
    regex: regex::Regex,
    kind: EntityKind,
    value: &'static str,
    icd10: Option<&'static str>,
    snomed_ct: Option<&'static str>,
}

/// Extracts clinical entities from utterance text.
pub struct EntityTagger {
    patterns: Vec<EntityPattern>,
    rng: SharedRng,
}

impl EntityTagger {
    /// Compile the fixed pattern table.
    pub fn new(rng: SharedRng) -> Result<Self> {
        let mut patterns = Vec::with_capacity(PATTERN_TABLE.len());
        for row in &PATTERN_TABLE {
            let regex = RegexBuilder::new(row.pattern)
                .case_insensitive(true)
                .build()?;
            patterns.push(EntityPattern {
                regex,
                kind: row.kind,
                value: row.value,
                icd10: row.icd10,
                snomed_ct: row.snomed_ct,
            });
        }
        Ok(Self { patterns, rng })
    }

    /// Match every rule against `text` and return the produced entities.
    ///
    /// Returns an empty vec when nothing matches; callers must not publish
    /// an empty batch.
    pub fn tag(&self, text: &str) -> Vec<ClinicalEntity> {
        let mut entities = Vec::new();
        for pattern in &self.patterns {
            if let Some(found) = pattern.regex.find(text) {
                let confidence = {
                    let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
                    rng.gen_range(ENTITY_CONFIDENCE_MIN..1.0)
                };
                entities.push(ClinicalEntity {
                    id: Uuid::new_v4(),
                    kind: pattern.kind,
                    value: pattern.value.to_string(),
                    confidence,
                    context: text.to_string(),
                    icd10: pattern.icd10.map(str::to_string),
                    snomed_ct: pattern.snomed_ct.map(str::to_string),
                    location: Some(TextSpan {
                        start: found.start(),
                        end: found.end(),
                    }),
                });
            }
        }
        if !entities.is_empty() {
            debug!(count = entities.len(), text, "extracted entities");
        }
        entities
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulator::make_rng;

    fn tagger() -> EntityTagger {
        EntityTagger::new(make_rng(None)).unwrap()
    }

    #[test]
    fn test_chest_pain_yields_symptom_with_icd10() {
        let entities = tagger().tag("I've been having chest pain for about 2 hours.");
        assert_eq!(entities.len(), 1);

        let entity = &entities[0];
        assert_eq!(entity.kind, EntityKind::Symptom);
        assert_eq!(entity.value, "chest pain");
        assert_eq!(entity.icd10.as_deref(), Some("R06.02"));
        assert_eq!(entity.snomed_ct, None);
        assert_eq!(entity.context, "I've been having chest pain for about 2 hours.");
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let entities = tagger().tag("CHEST PAIN radiating to the left arm");
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].value, "chest pain");
    }

    #[test]
    fn test_nausea_yields_symptom() {
        let entities = tagger().tag("Patient reports nausea this morning.");
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].kind, EntityKind::Symptom);
        assert_eq!(entities[0].icd10.as_deref(), Some("R11.0"));
    }

    #[test]
    fn test_nauseous_does_not_match_nausea() {
        // The keyword is "nausea"; the adjectival form in the scripted
        // dialogue does not contain it.
        let entities = tagger().tag("I also feel nauseous but no shortness of breath.");
        assert!(entities.is_empty());
    }

    #[test]
    fn test_blood_pressure_spoken_form() {
        let text = "Your blood pressure is 145 over 92.";
        let entities = tagger().tag(text);
        assert_eq!(entities.len(), 1);

        let entity = &entities[0];
        assert_eq!(entity.kind, EntityKind::Vital);
        assert_eq!(entity.value, "blood pressure");
        assert_eq!(entity.snomed_ct.as_deref(), Some("75367002"));
        assert_eq!(entity.icd10, None);

        let span = entity.location.unwrap();
        let matched = &text[span.start..span.end];
        assert!(matched.starts_with("blood pressure"));
        assert!(matched.ends_with("92"));
    }

    #[test]
    fn test_blood_pressure_slash_form() {
        let entities = tagger().tag("blood pressure 120/80 recorded at triage");
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].snomed_ct.as_deref(), Some("75367002"));
    }

    #[test]
    fn test_blood_pressure_without_reading_does_not_match() {
        // "Let me check your blood pressure." has no numbers, so the vital
        // rule must not fire.
        let entities = tagger().tag("Let me check your blood pressure.");
        assert!(entities.is_empty());
    }

    #[test]
    fn test_lisinopril_yields_medication() {
        let entities = tagger().tag("I take lisinopril for my blood pressure.");
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].kind, EntityKind::Medication);
        assert_eq!(entities[0].value, "lisinopril");
        assert_eq!(entities[0].snomed_ct.as_deref(), Some("29046004"));
    }

    #[test]
    fn test_blood_sugar_yields_blood_glucose_vital() {
        let entities = tagger().tag("My last blood sugar reading was 135.");
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].kind, EntityKind::Vital);
        assert_eq!(entities[0].value, "blood glucose");
        assert_eq!(entities[0].snomed_ct.as_deref(), Some("33747000"));
    }

    #[test]
    fn test_multiple_rules_match_in_table_order() {
        let entities = tagger().tag("Chest pain with nausea, taking lisinopril daily");
        assert_eq!(entities.len(), 3);
        assert_eq!(entities[0].value, "chest pain");
        assert_eq!(entities[1].value, "nausea");
        assert_eq!(entities[2].value, "lisinopril");
    }

    #[test]
    fn test_unmatched_text_yields_empty_batch() {
        let entities = tagger().tag("Can you describe the pain in more detail?");
        assert!(entities.is_empty());
    }

    #[test]
    fn test_confidence_within_declared_range() {
        let tagger = tagger();
        for _ in 0..20 {
            let entities = tagger.tag("chest pain");
            assert!((ENTITY_CONFIDENCE_MIN..1.0).contains(&entities[0].confidence));
        }
    }

    #[test]
    fn test_seeded_rng_reproduces_confidences() {
        let first = EntityTagger::new(make_rng(Some(7))).unwrap();
        let second = EntityTagger::new(make_rng(Some(7))).unwrap();

        let a: Vec<f64> = (0..5)
            .flat_map(|_| first.tag("chest pain and nausea"))
            .map(|e| e.confidence)
            .collect();
        let b: Vec<f64> = (0..5)
            .flat_map(|_| second.tag("chest pain and nausea"))
            .map(|e| e.confidence)
            .collect();

        assert_eq!(a, b);
    }

    #[test]
    fn test_entity_ids_are_unique() {
        let entities = tagger().tag("chest pain and more chest pain with nausea");
        let mut ids: Vec<_> = entities.iter().map(|e| e.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), entities.len());
    }
}
