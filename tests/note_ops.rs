//! Note store, review, and integration tests through the simulator facade.

use std::time::Duration;

use tokio::sync::mpsc::{UnboundedReceiver, error::TryRecvError};
use tokio::time::sleep;

use clinsim::bus::{Event, EventKind};
use clinsim::catalog::SYSTEM_BASELINES;
use clinsim::config::Config;
use clinsim::simulator::Simulator;
use clinsim::types::{NoteStatus, NoteUpdate, Severity, SuggestionKind};

fn simulator_with(seed: u64, success_rate: f64, flip_rate: f64) -> Simulator {
    let mut config = Config::default();
    config.simulator.rng_seed = Some(seed);
    config.simulator.integration_success_rate = success_rate;
    config.simulator.status_flip_rate = flip_rate;
    Simulator::new(&config).unwrap()
}

fn seeded_simulator(seed: u64) -> Simulator {
    simulator_with(seed, 0.8, 0.1)
}

fn collect(sim: &Simulator, kind: EventKind) -> UnboundedReceiver<Event> {
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    sim.subscribe(kind, move |event| {
        let _ = tx.send(event.clone());
    });
    rx
}

fn drain(rx: &mut UnboundedReceiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(event) => events.push(event),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => return events,
        }
    }
}

#[tokio::test]
async fn test_seeded_notes_are_available() {
    let sim = seeded_simulator(1);
    let notes = sim.get_notes().await;

    assert_eq!(notes.len(), 5);
    assert_eq!(notes[0].id, "note_001");
    assert_eq!(notes[0].status, NoteStatus::Draft);
    assert_eq!(notes[2].status, NoteStatus::Finalized);

    let note = sim.get_note("note_004").await.unwrap();
    assert_eq!(note.patient_id, "patient_126");
}

#[tokio::test]
async fn test_unknown_note_lookup_reports_id() {
    let sim = seeded_simulator(1);
    let err = sim.get_note("note_042").await.unwrap_err();
    assert_eq!(err.to_string(), "Note not found: note_042");
}

#[tokio::test]
async fn test_update_then_approve_lifecycle() {
    let sim = seeded_simulator(1);

    let update = NoteUpdate {
        history_of_present_illness: Some("Symptoms began after exertion.".to_string()),
        plan: Some("Admit for observation.".to_string()),
        ..NoteUpdate::default()
    };
    let updated = sim.update_note("note_002", &update).await.unwrap();
    assert_eq!(
        updated.narrative.history_of_present_illness.as_deref(),
        Some("Symptoms began after exertion.")
    );
    assert_eq!(updated.narrative.plan.as_deref(), Some("Admit for observation."));
    assert_eq!(updated.status, NoteStatus::UnderReview);

    let approved = sim.approve_note("note_002").await.unwrap();
    assert_eq!(approved.status, NoteStatus::Finalized);
    // The edit survives approval.
    assert_eq!(
        approved.narrative.plan.as_deref(),
        Some("Admit for observation.")
    );

    let reread = sim.get_note("note_002").await.unwrap();
    assert_eq!(reread.status, NoteStatus::Finalized);
    assert_eq!(reread.narrative.plan.as_deref(), Some("Admit for observation."));
}

#[tokio::test]
async fn test_update_unknown_note_fails() {
    let sim = seeded_simulator(1);
    let err = sim
        .update_note("note_042", &NoteUpdate::default())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Note not found: note_042");
}

#[tokio::test]
async fn test_analysis_returns_review_findings() {
    let sim = seeded_simulator(1);
    let suggestions = sim.analyze_note("note_001").await;

    assert_eq!(suggestions.len(), 4);

    let troponin = &suggestions[1];
    assert_eq!(troponin.id, "suggestion_2");
    assert_eq!(troponin.kind, SuggestionKind::Medical);
    assert_eq!(troponin.severity, Severity::Error);
    assert!(troponin.auto_fixable);
    assert!(troponin.suggested_fix.is_some());

    // One finding needs a human to resolve it.
    let manual: Vec<_> = suggestions.iter().filter(|s| !s.auto_fixable).collect();
    assert_eq!(manual.len(), 1);
    assert_eq!(manual[0].kind, SuggestionKind::Completeness);
}

#[tokio::test]
async fn test_finalize_reports_each_target_in_order() {
    let sim = seeded_simulator(9);
    let mut rx = collect(&sim, EventKind::IntegrationResults);

    let targets = vec![
        "Epic EHR".to_string(),
        "Cerner EHR".to_string(),
        "FHIR Server".to_string(),
    ];
    let results = sim.finalize_note("note_001", &targets).await;

    assert_eq!(results.len(), 3);
    for (result, target) in results.iter().zip(targets.iter()) {
        assert_eq!(&result.target, target);
        if result.success {
            assert_eq!(result.message, format!("Successfully submitted to {target}"));
        } else {
            assert_eq!(result.message, format!("Failed to connect to {target}"));
        }
    }

    let events = drain(&mut rx);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0], Event::IntegrationResults(results));
}

#[tokio::test]
async fn test_finalize_failure_messages_when_nothing_connects() {
    let sim = simulator_with(9, 0.0, 0.1);
    let results = sim
        .finalize_note("note_001", &["Epic EHR".to_string()])
        .await;

    assert_eq!(results.len(), 1);
    assert!(!results[0].success);
    assert_eq!(results[0].message, "Failed to connect to Epic EHR");
}

#[tokio::test]
async fn test_system_status_tracks_baselines_without_flips() {
    let sim = simulator_with(4, 0.8, 0.0);
    let statuses = sim.system_status();

    let names: Vec<&str> = statuses.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        [
            "Epic EHR",
            "Cerner EHR",
            "Redox API",
            "FHIR Server",
            "Speech Service",
            "Clinical AI",
        ]
    );

    for (status, baseline) in statuses.iter().zip(SYSTEM_BASELINES.iter()) {
        assert_eq!(status.state, baseline.state);
        assert_eq!(status.error_count, baseline.error_count);
        assert!((100..600).contains(&status.response_time_ms));
    }
}

#[tokio::test(start_paused = true)]
async fn test_connection_probe_follows_success_rate() {
    assert!(simulator_with(2, 1.0, 0.1).test_connection("Epic EHR").await);
    assert!(
        !simulator_with(2, 0.0, 0.1)
            .test_connection("Epic EHR")
            .await
    );
}

#[tokio::test(start_paused = true)]
async fn test_session_note_generation_does_not_grow_the_store() {
    let sim = seeded_simulator(6);
    let mut rx = collect(&sim, EventKind::NoteGenerated);

    sim.start_listening("session_1").unwrap();
    sim.stop_listening().unwrap();
    sleep(Duration::from_millis(2500)).await;

    assert_eq!(drain(&mut rx).len(), 1);
    assert_eq!(sim.get_notes().await.len(), 5);
}
