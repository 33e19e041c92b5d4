//! Domain types for the clinical session simulator.
//!
//! Everything here is plain data: records emitted on the event bus and
//! returned by the request/response operations. Construction logic lives
//! with the components that produce them (session driver, tagger, note
//! store); nothing in this module is mutated after creation except
//! [`StructuredNote`], which the note store updates through
//! [`StructuredNote::apply_update`] and its status transitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Speaker role in the simulated conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeakerRole {
    Patient,
    Clinician,
}

/// One of the two fixed participants in a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Speaker {
    pub id: String,
    pub name: String,
    pub role: SpeakerRole,
}

/// One simulated speech-to-text segment attributed to a speaker.
///
/// Immutable once emitted; consumers that want a transcript keep their
/// own list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    pub id: Uuid,
    pub text: String,
    /// Synthetic recognizer confidence in [0.9, 1.0).
    pub confidence: f64,
    pub timestamp: DateTime<Utc>,
    pub speaker: Speaker,
}

/// Category of a clinical entity extracted from utterance text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Symptom,
    Diagnosis,
    Medication,
    Procedure,
    Vital,
    Allergy,
}

impl EntityKind {
    /// Lowercase label for table output.
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Symptom => "symptom",
            EntityKind::Diagnosis => "diagnosis",
            EntityKind::Medication => "medication",
            EntityKind::Procedure => "procedure",
            EntityKind::Vital => "vital",
            EntityKind::Allergy => "allergy",
        }
    }
}

/// Byte range of a pattern match within the source utterance text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSpan {
    pub start: usize,
    pub end: usize,
}

/// A structured clinical fact extracted from one utterance.
///
/// Created only by the entity tagger; never mutated afterwards. `context`
/// always carries the original utterance text the entity came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalEntity {
    pub id: Uuid,
    pub kind: EntityKind,
    /// The pattern's declared value (e.g. "chest pain"), not the raw match.
    pub value: String,
    /// Synthetic extraction confidence in [0.8, 1.0).
    pub confidence: f64,
    /// Source utterance text. Never empty when produced by the tagger.
    pub context: String,
    pub icd10: Option<String>,
    pub snomed_ct: Option<String>,
    /// Where the pattern matched within `context`.
    pub location: Option<TextSpan>,
}

/// Lifecycle status of a structured note. Transitions are forward-only:
/// draft → under_review → finalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteStatus {
    Draft,
    UnderReview,
    Finalized,
}

impl NoteStatus {
    pub fn label(&self) -> &'static str {
        match self {
            NoteStatus::Draft => "draft",
            NoteStatus::UnderReview => "under_review",
            NoteStatus::Finalized => "finalized",
        }
    }
}

/// The fixed-shape narrative sections of a clinical note.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Narrative {
    pub chief_complaint: Option<String>,
    pub history_of_present_illness: Option<String>,
    pub review_of_systems: Option<String>,
    pub physical_exam: Option<String>,
    pub assessment: Option<String>,
    pub plan: Option<String>,
}

/// Partial narrative update: only the fields present overwrite the note.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteUpdate {
    pub chief_complaint: Option<String>,
    pub history_of_present_illness: Option<String>,
    pub review_of_systems: Option<String>,
    pub physical_exam: Option<String>,
    pub assessment: Option<String>,
    pub plan: Option<String>,
}

/// The synthesized clinical documentation record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredNote {
    pub id: String,
    pub patient_id: String,
    pub provider_id: String,
    pub session_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status: NoteStatus,
    /// Raw transcript text the note was generated from, when available.
    pub transcript: Option<String>,
    pub narrative: Narrative,
    pub entities: Vec<ClinicalEntity>,
}

impl StructuredNote {
    /// Merge a partial update into the narrative, bumping `updated_at`.
    /// Fields absent from the update are left untouched.
    pub fn apply_update(&mut self, update: &NoteUpdate, now: DateTime<Utc>) {
        let n = &mut self.narrative;
        if let Some(v) = &update.chief_complaint {
            n.chief_complaint = Some(v.clone());
        }
        if let Some(v) = &update.history_of_present_illness {
            n.history_of_present_illness = Some(v.clone());
        }
        if let Some(v) = &update.review_of_systems {
            n.review_of_systems = Some(v.clone());
        }
        if let Some(v) = &update.physical_exam {
            n.physical_exam = Some(v.clone());
        }
        if let Some(v) = &update.assessment {
            n.assessment = Some(v.clone());
        }
        if let Some(v) = &update.plan {
            n.plan = Some(v.clone());
        }
        self.updated_at = now;
    }
}

/// Category of a review suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    Completeness,
    Medical,
    Coding,
    Grammar,
}

/// How urgently a suggestion should be addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// Which narrative section a suggestion targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteSection {
    ChiefComplaint,
    HistoryOfPresentIllness,
    ReviewOfSystems,
    PhysicalExam,
    Assessment,
    Plan,
}

/// Character range within a section's text that a suggestion points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionSpan {
    pub start: usize,
    pub end: usize,
}

/// One review finding produced by the simulated note analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: String,
    pub kind: SuggestionKind,
    pub severity: Severity,
    pub message: String,
    pub section: NoteSection,
    pub span: Option<SuggestionSpan>,
    pub suggested_fix: Option<String>,
    pub auto_fixable: bool,
}

/// Outcome of submitting a note to one integration target.
///
/// Failure is expected data here, not an error: a failed submission is a
/// normal row in the result batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationResult {
    pub target: String,
    pub success: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Reported health of an external system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemState {
    Online,
    Degraded,
    Offline,
}

impl SystemState {
    pub fn label(&self) -> &'static str {
        match self {
            SystemState::Online => "online",
            SystemState::Degraded => "degraded",
            SystemState::Offline => "offline",
        }
    }
}

/// One row of a system status snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemStatus {
    pub name: String,
    pub state: SystemState,
    pub response_time_ms: u32,
    pub last_check: DateTime<Utc>,
    pub error_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_note() -> StructuredNote {
        StructuredNote {
            id: "note_test".to_string(),
            patient_id: "patient_123".to_string(),
            provider_id: "provider_456".to_string(),
            session_id: Some("session_1".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            status: NoteStatus::Draft,
            transcript: None,
            narrative: Narrative {
                chief_complaint: Some("Chest pain".to_string()),
                history_of_present_illness: Some("Two days of intermittent pain".to_string()),
                review_of_systems: None,
                physical_exam: Some("BP 145/92".to_string()),
                assessment: Some("Possible angina".to_string()),
                plan: Some("Order ECG".to_string()),
            },
            entities: vec![],
        }
    }

    #[test]
    fn test_entity_kind_serializes_snake_case() {
        let json = serde_json::to_string(&EntityKind::Symptom).unwrap();
        assert_eq!(json, "\"symptom\"");
        let json = serde_json::to_string(&EntityKind::Vital).unwrap();
        assert_eq!(json, "\"vital\"");
    }

    #[test]
    fn test_note_status_serializes_snake_case() {
        let json = serde_json::to_string(&NoteStatus::UnderReview).unwrap();
        assert_eq!(json, "\"under_review\"");
        let back: NoteStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, NoteStatus::UnderReview);
    }

    #[test]
    fn test_system_state_serializes_snake_case() {
        let json = serde_json::to_string(&SystemState::Degraded).unwrap();
        assert_eq!(json, "\"degraded\"");
    }

    #[test]
    fn test_utterance_json_roundtrip() {
        let utterance = Utterance {
            id: Uuid::new_v4(),
            text: "I have been having chest pain".to_string(),
            confidence: 0.95,
            timestamp: Utc::now(),
            speaker: Speaker {
                id: "patient_123".to_string(),
                name: "John Doe".to_string(),
                role: SpeakerRole::Patient,
            },
        };
        let json = serde_json::to_string(&utterance).unwrap();
        let back: Utterance = serde_json::from_str(&json).unwrap();
        assert_eq!(utterance, back);
        assert!(json.contains("\"role\":\"patient\""));
    }

    #[test]
    fn test_clinical_entity_optional_codes() {
        let entity = ClinicalEntity {
            id: Uuid::new_v4(),
            kind: EntityKind::Symptom,
            value: "chest pain".to_string(),
            confidence: 0.85,
            context: "I have chest pain".to_string(),
            icd10: Some("R06.02".to_string()),
            snomed_ct: None,
            location: Some(TextSpan { start: 7, end: 17 }),
        };
        let json = serde_json::to_string(&entity).unwrap();
        assert!(json.contains("\"icd10\":\"R06.02\""));
        assert!(json.contains("\"snomed_ct\":null"));
        let back: ClinicalEntity = serde_json::from_str(&json).unwrap();
        assert_eq!(entity, back);
    }

    #[test]
    fn test_apply_update_merges_only_present_fields() {
        let mut note = sample_note();
        let before = note.narrative.clone();
        let later = note.updated_at + chrono::Duration::seconds(5);

        note.apply_update(
            &NoteUpdate {
                assessment: Some("Rule out ACS".to_string()),
                ..Default::default()
            },
            later,
        );

        assert_eq!(note.narrative.assessment.as_deref(), Some("Rule out ACS"));
        assert_eq!(note.narrative.chief_complaint, before.chief_complaint);
        assert_eq!(
            note.narrative.history_of_present_illness,
            before.history_of_present_illness
        );
        assert_eq!(note.narrative.physical_exam, before.physical_exam);
        assert_eq!(note.narrative.plan, before.plan);
        assert_eq!(note.updated_at, later);
    }

    #[test]
    fn test_apply_update_empty_is_timestamp_only() {
        let mut note = sample_note();
        let before = note.narrative.clone();
        let later = note.updated_at + chrono::Duration::seconds(1);

        note.apply_update(&NoteUpdate::default(), later);

        assert_eq!(note.narrative, before);
        assert_eq!(note.updated_at, later);
    }

    #[test]
    fn test_note_section_serializes_snake_case() {
        let json = serde_json::to_string(&NoteSection::HistoryOfPresentIllness).unwrap();
        assert_eq!(json, "\"history_of_present_illness\"");
    }

    #[test]
    fn test_labels_match_serde_names() {
        for (kind, label) in [
            (EntityKind::Symptom, "symptom"),
            (EntityKind::Medication, "medication"),
        ] {
            assert_eq!(serde_json::to_string(&kind).unwrap(), format!("\"{label}\""));
            assert_eq!(kind.label(), label);
        }
        assert_eq!(NoteStatus::UnderReview.label(), "under_review");
        assert_eq!(SystemState::Online.label(), "online");
        assert_eq!(Severity::Warning.label(), "warning");
    }
}
