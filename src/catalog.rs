//! Canned demo content for the simulator.
//!
//! Dialogue scripts, speaker profiles, the generated-note narrative and
//! entity list, the seeded note collection, review suggestions, and the
//! external system inventory. Everything here is fixed demo data; the only
//! runtime input is the timestamp used to age the seed records.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::types::{
    ClinicalEntity, EntityKind, Narrative, NoteSection, NoteStatus, Severity, Speaker,
    SpeakerRole, StructuredNote, Suggestion, SuggestionKind, SuggestionSpan, SystemState,
    TextSpan,
};

/// Scripted patient lines, in emission order.
pub const PATIENT_SCRIPT: [&str; 6] = [
    "I've been having chest pain for about 2 hours.",
    "It's a sharp, stabbing pain that radiates to my left arm.",
    "On a scale of 1 to 10, I'd say it's about a 7.",
    "I also feel nauseous but no shortness of breath.",
    "I take lisinopril for my blood pressure.",
    "My last blood sugar reading was 135.",
];

/// Scripted clinician lines, in emission order.
pub const CLINICIAN_SCRIPT: [&str; 6] = [
    "Can you describe the pain in more detail?",
    "Let me check your blood pressure.",
    "Your blood pressure is 145 over 92.",
    "I'm going to order an ECG and some blood work.",
    "We'll need to monitor your symptoms closely.",
    "I'll prescribe some medication for the pain.",
];

/// Bonus clinician questions emitted when the dialogue script wraps around.
pub const FILLER_QUESTIONS: [&str; 2] = [
    "How long have you been experiencing this?",
    "Any other symptoms I should know about?",
];

/// The patient participating in every simulated session.
pub fn patient() -> Speaker {
    Speaker {
        id: "patient_123".to_string(),
        name: "John Doe".to_string(),
        role: SpeakerRole::Patient,
    }
}

/// The clinician participating in every simulated session.
pub fn clinician() -> Speaker {
    Speaker {
        id: "provider_456".to_string(),
        name: "Dr. Sarah Johnson".to_string(),
        role: SpeakerRole::Clinician,
    }
}

pub fn speaker_for(role: SpeakerRole) -> Speaker {
    match role {
        SpeakerRole::Patient => patient(),
        SpeakerRole::Clinician => clinician(),
    }
}

/// Baseline reported health of one external system.
pub struct SystemBaseline {
    pub name: &'static str,
    pub state: SystemState,
    pub error_count: u32,
}

/// The six external systems the integration layer reports on.
pub const SYSTEM_BASELINES: [SystemBaseline; 6] = [
    SystemBaseline {
        name: "Epic EHR",
        state: SystemState::Online,
        error_count: 0,
    },
    SystemBaseline {
        name: "Cerner EHR",
        state: SystemState::Online,
        error_count: 0,
    },
    SystemBaseline {
        name: "Redox API",
        state: SystemState::Degraded,
        error_count: 2,
    },
    SystemBaseline {
        name: "FHIR Server",
        state: SystemState::Online,
        error_count: 0,
    },
    SystemBaseline {
        name: "Speech Service",
        state: SystemState::Online,
        error_count: 0,
    },
    SystemBaseline {
        name: "Clinical AI",
        state: SystemState::Offline,
        error_count: 5,
    },
];

fn entity(
    kind: EntityKind,
    value: &str,
    confidence: f64,
    context: &str,
    icd10: Option<&str>,
    snomed_ct: Option<&str>,
    span: (usize, usize),
) -> ClinicalEntity {
    ClinicalEntity {
        id: Uuid::new_v4(),
        kind,
        value: value.to_string(),
        confidence,
        context: context.to_string(),
        icd10: icd10.map(str::to_string),
        snomed_ct: snomed_ct.map(str::to_string),
        location: Some(TextSpan {
            start: span.0,
            end: span.1,
        }),
    }
}

/// Entity list attached to every generated note.
pub fn generated_entities() -> Vec<ClinicalEntity> {
    vec![
        entity(
            EntityKind::Symptom,
            "chest pain",
            0.95,
            "chest pain for the past 2 hours",
            Some("R06.02"),
            Some("29857009"),
            (18, 28),
        ),
        entity(
            EntityKind::Symptom,
            "nausea",
            0.88,
            "I do feel a bit nauseous",
            Some("R11.0"),
            Some("422587007"),
            (34, 40),
        ),
        entity(
            EntityKind::Vital,
            "blood pressure 145/92",
            0.92,
            "blood pressure. It's 145 over 92",
            None,
            Some("75367002"),
            (25, 45),
        ),
        entity(
            EntityKind::Vital,
            "heart rate 88 bpm",
            0.91,
            "Heart rate is 88 beats per minute",
            None,
            Some("364075005"),
            (50, 67),
        ),
        entity(
            EntityKind::Medication,
            "Lisinopril",
            0.89,
            "patient medications",
            None,
            Some("29046004"),
            (0, 10),
        ),
    ]
}

/// Narrative attached to every generated note.
pub fn generated_narrative() -> Narrative {
    Narrative {
        chief_complaint: Some("Chest pain".to_string()),
        history_of_present_illness: Some(
            "Patient reports chest pain for the past 2 hours. Pain is described as sharp \
             and radiates to the left arm. Patient rates pain 7/10."
                .to_string(),
        ),
        review_of_systems: None,
        physical_exam: Some(
            "Vital signs: Blood pressure 145/92 mmHg. Patient appears in mild distress."
                .to_string(),
        ),
        assessment: Some("Chest pain, rule out acute coronary syndrome.".to_string()),
        plan: Some("Order ECG, cardiac enzymes, chest X-ray. Monitor vital signs.".to_string()),
    }
}

/// Placeholder transcript attached to every generated note.
pub fn generated_transcript() -> String {
    "Simulated transcription content...".to_string()
}

/// Review findings returned by note analysis and emitted after every
/// generated note.
pub fn review_suggestions() -> Vec<Suggestion> {
    vec![
        Suggestion {
            id: "suggestion_1".to_string(),
            kind: SuggestionKind::Completeness,
            severity: Severity::Warning,
            message: "Review of systems section is missing".to_string(),
            section: NoteSection::ReviewOfSystems,
            span: None,
            suggested_fix: Some(
                "Add review of systems to enhance documentation completeness".to_string(),
            ),
            auto_fixable: false,
        },
        Suggestion {
            id: "suggestion_2".to_string(),
            kind: SuggestionKind::Medical,
            severity: Severity::Error,
            message: "Consider ordering troponin levels for chest pain evaluation".to_string(),
            section: NoteSection::Plan,
            span: None,
            suggested_fix: Some("Add troponin levels to cardiac enzyme panel".to_string()),
            auto_fixable: true,
        },
        Suggestion {
            id: "suggestion_3".to_string(),
            kind: SuggestionKind::Coding,
            severity: Severity::Warning,
            message: "Chest pain needs ICD-10 code specification".to_string(),
            section: NoteSection::Assessment,
            span: None,
            suggested_fix: Some("Specify ICD-10 code: R06.02 for chest pain".to_string()),
            auto_fixable: true,
        },
        Suggestion {
            id: "suggestion_4".to_string(),
            kind: SuggestionKind::Grammar,
            severity: Severity::Info,
            message: "Consider using consistent tense throughout the note".to_string(),
            section: NoteSection::HistoryOfPresentIllness,
            span: Some(SuggestionSpan { start: 0, end: 20 }),
            suggested_fix: Some("Use past tense consistently".to_string()),
            auto_fixable: true,
        },
    ]
}

/// Seed notes the store starts with, aged relative to `now`.
pub fn seed_notes(now: DateTime<Utc>) -> Vec<StructuredNote> {
    vec![
        note_001(now),
        note_002(now),
        note_003(now),
        note_004(now),
        note_005(now),
    ]
}

fn seed_note(
    id: &str,
    patient_id: &str,
    session_id: &str,
    age: Duration,
    now: DateTime<Utc>,
    status: NoteStatus,
    transcript: &str,
    narrative: Narrative,
    entities: Vec<ClinicalEntity>,
) -> StructuredNote {
    let timestamp = now - age;
    StructuredNote {
        id: id.to_string(),
        patient_id: patient_id.to_string(),
        provider_id: "provider_456".to_string(),
        session_id: Some(session_id.to_string()),
        created_at: timestamp,
        updated_at: timestamp,
        status,
        transcript: Some(transcript.to_string()),
        narrative,
        entities,
    }
}

fn note_001(now: DateTime<Utc>) -> StructuredNote {
    seed_note(
        "note_001",
        "patient_123",
        "session_001",
        Duration::hours(1),
        now,
        NoteStatus::Draft,
        "Patient presents with chest pain...",
        Narrative {
            chief_complaint: Some("Chest pain".to_string()),
            history_of_present_illness: Some(
                "Patient reports chest pain for the past 2 hours. Pain is described as \
                 sharp and radiates to the left arm. Patient rates pain 7/10. Associated \
                 with nausea but no shortness of breath."
                    .to_string(),
            ),
            review_of_systems: None,
            physical_exam: Some(
                "Vital signs: Blood pressure 145/92 mmHg, Heart rate 88 bpm. Patient \
                 appears in mild distress."
                    .to_string(),
            ),
            assessment: Some(
                "Chest pain, rule out acute coronary syndrome. Hypertension.".to_string(),
            ),
            plan: Some(
                "Order ECG, cardiac enzymes, chest X-ray. Monitor vital signs. Consider \
                 cardiology consultation if abnormal findings."
                    .to_string(),
            ),
        },
        vec![
            entity(
                EntityKind::Symptom,
                "chest pain",
                0.95,
                "chest pain for the past 2 hours",
                Some("R06.02"),
                Some("29857009"),
                (18, 28),
            ),
            entity(
                EntityKind::Symptom,
                "nausea",
                0.88,
                "Associated with nausea",
                Some("R11.0"),
                Some("422587007"),
                (34, 40),
            ),
            entity(
                EntityKind::Vital,
                "blood pressure 145/92",
                0.92,
                "blood pressure 145/92 mmHg",
                None,
                Some("75367002"),
                (25, 45),
            ),
            entity(
                EntityKind::Vital,
                "heart rate 88 bpm",
                0.91,
                "Heart rate 88 bpm",
                None,
                Some("364075005"),
                (50, 67),
            ),
            entity(
                EntityKind::Diagnosis,
                "acute coronary syndrome",
                0.78,
                "rule out acute coronary syndrome",
                Some("I24.9"),
                Some("394659003"),
                (0, 25),
            ),
        ],
    )
}

fn note_002(now: DateTime<Utc>) -> StructuredNote {
    seed_note(
        "note_002",
        "patient_124",
        "session_002",
        Duration::hours(2),
        now,
        NoteStatus::UnderReview,
        "Follow-up visit for diabetes management...",
        Narrative {
            chief_complaint: Some("Diabetes follow-up".to_string()),
            history_of_present_illness: Some(
                "Patient with type 2 diabetes mellitus presents for routine follow-up. \
                 Reports good adherence to metformin. Blood glucose readings at home \
                 averaging 120-140 mg/dL."
                    .to_string(),
            ),
            review_of_systems: None,
            physical_exam: Some(
                "Vital signs stable. Weight 180 lbs. No acute distress. Feet examination \
                 shows no ulcers or deformities."
                    .to_string(),
            ),
            assessment: Some("Type 2 diabetes mellitus, well controlled.".to_string()),
            plan: Some(
                "Continue metformin 500mg twice daily. Recheck HbA1c in 3 months. \
                 Diabetic foot care education provided."
                    .to_string(),
            ),
        },
        vec![
            entity(
                EntityKind::Diagnosis,
                "type 2 diabetes mellitus",
                0.96,
                "type 2 diabetes mellitus presents for routine follow-up",
                Some("E11.9"),
                Some("44054006"),
                (0, 25),
            ),
            entity(
                EntityKind::Medication,
                "metformin",
                0.94,
                "good adherence to metformin",
                None,
                Some("387562000"),
                (30, 39),
            ),
            entity(
                EntityKind::Vital,
                "blood glucose 120-140 mg/dL",
                0.92,
                "Blood glucose readings at home averaging 120-140 mg/dL",
                None,
                Some("33747000"),
                (45, 70),
            ),
            entity(
                EntityKind::Vital,
                "weight 180 lbs",
                0.90,
                "Weight 180 lbs",
                None,
                Some("27113001"),
                (75, 90),
            ),
        ],
    )
}

fn note_003(now: DateTime<Utc>) -> StructuredNote {
    seed_note(
        "note_003",
        "patient_125",
        "session_003",
        Duration::hours(3),
        now,
        NoteStatus::Finalized,
        "Hypertension management visit...",
        Narrative {
            chief_complaint: Some("Hypertension follow-up".to_string()),
            history_of_present_illness: Some(
                "Patient with essential hypertension presents for routine follow-up. \
                 Reports taking lisinopril as prescribed. Occasional dizziness when \
                 standing up."
                    .to_string(),
            ),
            review_of_systems: None,
            physical_exam: Some(
                "Blood pressure 135/85 mmHg. Heart rate 72 bpm. No orthostatic changes. \
                 Cardiac exam normal."
                    .to_string(),
            ),
            assessment: Some("Essential hypertension, adequately controlled.".to_string()),
            plan: Some(
                "Continue lisinopril 10mg daily. Lifestyle modifications counseling \
                 provided. Follow-up in 6 months."
                    .to_string(),
            ),
        },
        vec![
            entity(
                EntityKind::Diagnosis,
                "essential hypertension",
                0.93,
                "essential hypertension presents for routine follow-up",
                Some("I10"),
                Some("59621000"),
                (0, 20),
            ),
            entity(
                EntityKind::Medication,
                "lisinopril",
                0.95,
                "taking lisinopril as prescribed",
                None,
                Some("29046004"),
                (25, 35),
            ),
            entity(
                EntityKind::Symptom,
                "dizziness",
                0.87,
                "Occasional dizziness when standing up",
                Some("R42"),
                Some("404640003"),
                (40, 49),
            ),
            entity(
                EntityKind::Vital,
                "blood pressure 135/85",
                0.94,
                "Blood pressure 135/85 mmHg",
                None,
                Some("75367002"),
                (54, 75),
            ),
        ],
    )
}

fn note_004(now: DateTime<Utc>) -> StructuredNote {
    seed_note(
        "note_004",
        "patient_126",
        "session_004",
        Duration::hours(4),
        now,
        NoteStatus::Draft,
        "Annual physical examination...",
        Narrative {
            chief_complaint: Some("Annual physical examination".to_string()),
            history_of_present_illness: Some(
                "Patient presents for routine annual physical examination. No acute \
                 complaints. Feels well overall."
                    .to_string(),
            ),
            review_of_systems: None,
            physical_exam: Some(
                "Vital signs: BP 125/80, HR 68, Temp 98.6°F. General appearance well. \
                 Heart regular rate and rhythm. Lungs clear bilaterally."
                    .to_string(),
            ),
            assessment: Some("Healthy adult, no acute issues.".to_string()),
            plan: Some(
                "Routine screening labs ordered. Continue current medications. Follow-up \
                 in 1 year or as needed."
                    .to_string(),
            ),
        },
        vec![
            entity(
                EntityKind::Vital,
                "blood pressure 125/80",
                0.96,
                "BP 125/80",
                None,
                Some("75367002"),
                (0, 20),
            ),
            entity(
                EntityKind::Vital,
                "heart rate 68",
                0.94,
                "HR 68",
                None,
                Some("364075005"),
                (25, 35),
            ),
            entity(
                EntityKind::Vital,
                "temperature 98.6°F",
                0.93,
                "Temp 98.6°F",
                None,
                Some("276885007"),
                (40, 55),
            ),
            entity(
                EntityKind::Procedure,
                "annual physical examination",
                0.91,
                "routine annual physical examination",
                None,
                Some("185349003"),
                (60, 85),
            ),
        ],
    )
}

fn note_005(now: DateTime<Utc>) -> StructuredNote {
    seed_note(
        "note_005",
        "patient_127",
        "session_005",
        Duration::hours(5),
        now,
        NoteStatus::UnderReview,
        "Patient with shortness of breath...",
        Narrative {
            chief_complaint: Some("Shortness of breath".to_string()),
            history_of_present_illness: Some(
                "Patient reports progressive shortness of breath over the past week. \
                 Worse with exertion. No chest pain. Some fatigue."
                    .to_string(),
            ),
            review_of_systems: None,
            physical_exam: Some(
                "Vital signs: BP 140/90, HR 95, O2 sat 94% on room air. Bilateral lower \
                 extremity edema. Crackles at lung bases."
                    .to_string(),
            ),
            assessment: Some("Congestive heart failure, acute exacerbation.".to_string()),
            plan: Some(
                "Chest X-ray, BNP, echo. Increase furosemide. Strict I/O monitoring. \
                 Cardiology consultation."
                    .to_string(),
            ),
        },
        vec![
            entity(
                EntityKind::Symptom,
                "shortness of breath",
                0.97,
                "progressive shortness of breath over the past week",
                Some("R06.00"),
                Some("267036007"),
                (0, 19),
            ),
            entity(
                EntityKind::Symptom,
                "fatigue",
                0.89,
                "Some fatigue",
                Some("R53.1"),
                Some("84229001"),
                (24, 31),
            ),
            entity(
                EntityKind::Vital,
                "oxygen saturation 94%",
                0.95,
                "O2 sat 94% on room air",
                None,
                Some("442476006"),
                (36, 55),
            ),
            entity(
                EntityKind::Symptom,
                "bilateral lower extremity edema",
                0.92,
                "Bilateral lower extremity edema",
                Some("R60.0"),
                Some("102491009"),
                (60, 90),
            ),
            entity(
                EntityKind::Diagnosis,
                "congestive heart failure",
                0.88,
                "Congestive heart failure, acute exacerbation",
                Some("I50.9"),
                Some("42343007"),
                (95, 118),
            ),
            entity(
                EntityKind::Medication,
                "furosemide",
                0.90,
                "Increase furosemide",
                None,
                Some("387475002"),
                (123, 133),
            ),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripts_have_equal_length() {
        // The shared cursor interleaves the two scripts, so they must stay
        // the same length for the turn-taking to cover both fully.
        assert_eq!(PATIENT_SCRIPT.len(), CLINICIAN_SCRIPT.len());
    }

    #[test]
    fn test_speaker_profiles() {
        let p = patient();
        assert_eq!(p.id, "patient_123");
        assert_eq!(p.role, SpeakerRole::Patient);

        let c = clinician();
        assert_eq!(c.id, "provider_456");
        assert_eq!(c.name, "Dr. Sarah Johnson");
        assert_eq!(c.role, SpeakerRole::Clinician);

        assert_eq!(speaker_for(SpeakerRole::Patient), p);
        assert_eq!(speaker_for(SpeakerRole::Clinician), c);
    }

    #[test]
    fn test_seed_notes_ids_and_statuses() {
        let notes = seed_notes(Utc::now());
        assert_eq!(notes.len(), 5);

        let expect = [
            ("note_001", NoteStatus::Draft),
            ("note_002", NoteStatus::UnderReview),
            ("note_003", NoteStatus::Finalized),
            ("note_004", NoteStatus::Draft),
            ("note_005", NoteStatus::UnderReview),
        ];
        for (note, (id, status)) in notes.iter().zip(expect) {
            assert_eq!(note.id, id);
            assert_eq!(note.status, status);
            assert_eq!(note.provider_id, "provider_456");
            assert_eq!(note.created_at, note.updated_at);
        }
    }

    #[test]
    fn test_seed_notes_are_aged_oldest_last() {
        let now = Utc::now();
        let notes = seed_notes(now);
        for window in notes.windows(2) {
            assert!(window[0].created_at > window[1].created_at);
        }
        assert_eq!(notes[0].created_at, now - Duration::hours(1));
        assert_eq!(notes[4].created_at, now - Duration::hours(5));
    }

    #[test]
    fn test_generated_entities_satisfy_invariants() {
        for e in generated_entities() {
            assert!(!e.context.is_empty());
            assert!((0.0..=1.0).contains(&e.confidence));
        }
    }

    #[test]
    fn test_generated_narrative_sections() {
        let n = generated_narrative();
        assert_eq!(n.chief_complaint.as_deref(), Some("Chest pain"));
        assert!(n.review_of_systems.is_none());
        assert!(n.assessment.unwrap().contains("acute coronary syndrome"));
    }

    #[test]
    fn test_review_suggestions_shape() {
        let suggestions = review_suggestions();
        assert_eq!(suggestions.len(), 4);

        // Only the grammar suggestion carries a span.
        let with_span: Vec<_> = suggestions.iter().filter(|s| s.span.is_some()).collect();
        assert_eq!(with_span.len(), 1);
        assert_eq!(with_span[0].kind, SuggestionKind::Grammar);
        assert_eq!(with_span[0].span, Some(SuggestionSpan { start: 0, end: 20 }));

        // The completeness finding is the only one that cannot be auto-fixed.
        let manual: Vec<_> = suggestions.iter().filter(|s| !s.auto_fixable).collect();
        assert_eq!(manual.len(), 1);
        assert_eq!(manual[0].kind, SuggestionKind::Completeness);
    }

    #[test]
    fn test_system_baselines() {
        assert_eq!(SYSTEM_BASELINES.len(), 6);

        let names: Vec<_> = SYSTEM_BASELINES.iter().map(|s| s.name).collect();
        assert!(names.contains(&"Epic EHR"));
        assert!(names.contains(&"Clinical AI"));

        let mut unique = names.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), names.len());

        // Clinical AI is the seeded outage.
        let ai = SYSTEM_BASELINES
            .iter()
            .find(|s| s.name == "Clinical AI")
            .unwrap();
        assert_eq!(ai.state, SystemState::Offline);
        assert_eq!(ai.error_count, 5);
    }
}
