use anyhow::Result;
use clap::Parser;
use owo_colors::OwoColorize;
use std::path::Path;
use std::time::Duration;

use clinsim::bus::{Event, EventKind};
use clinsim::cli::{Cli, Commands};
use clinsim::config::Config;
use clinsim::simulator::Simulator;
use clinsim::types::SystemState;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(seed) = cli.seed {
        config.simulator.rng_seed = Some(seed);
    }

    let simulator = Simulator::new(&config)?;

    match cli.command.unwrap_or(Commands::Run {
        duration: None,
        session: None,
    }) {
        Commands::Run { duration, session } => {
            run_session(&simulator, &config, duration, session).await?;
        }
        Commands::Notes => {
            list_notes(&simulator).await;
        }
        Commands::Note { id } => {
            show_note(&simulator, &id).await?;
        }
        Commands::Tag { text } => {
            tag_text(&simulator, &text);
        }
        Commands::Status => {
            show_status(&simulator);
        }
        Commands::Finalize { note_id, targets } => {
            finalize_note(&simulator, &note_id, &targets).await;
        }
    }

    Ok(())
}

/// Initialize stderr logging from the verbosity flags.
///
/// A `RUST_LOG` filter takes precedence over the flag-derived one.
fn init_logging(quiet: bool, verbose: u8) {
    if quiet {
        return;
    }
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("clinsim={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load configuration from file or use defaults.
///
/// Priority order:
/// 1. Custom config path from CLI (--config)
/// 2. Default config path (~/.config/clinsim/config.toml)
/// 3. Built-in defaults with environment variable overrides
fn load_config(custom_path: Option<&Path>) -> Result<Config> {
    let config = if let Some(path) = custom_path {
        // Load from custom path
        Config::load(path)?
    } else if let Some(default_path) = Config::default_path() {
        // Try default path, fall back to defaults
        Config::load_or_default(&default_path)?
    } else {
        Config::default()
    };

    // Apply environment variable overrides
    Ok(config.with_env_overrides())
}

/// Run one listening session, streaming every published event to stdout.
async fn run_session(
    simulator: &Simulator,
    config: &Config,
    duration: Option<Duration>,
    session: Option<String>,
) -> Result<()> {
    let session_id =
        session.unwrap_or_else(|| format!("session_{}", chrono::Utc::now().timestamp_millis()));

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    for kind in EventKind::ALL {
        let tx = tx.clone();
        simulator.subscribe(kind, move |event| {
            let _ = tx.send(event.clone());
        });
    }
    drop(tx);

    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            render_event(&event);
        }
    });

    simulator.start_listening(&session_id)?;
    eprintln!("{}", "Press Ctrl-C to stop".dimmed());

    let time_limit = async {
        match duration {
            Some(limit) => tokio::time::sleep(limit).await,
            None => std::future::pending().await,
        }
    };
    tokio::select! {
        _ = time_limit => {}
        _ = tokio::signal::ctrl_c() => {
            eprintln!();
        }
    }

    simulator.stop_listening()?;

    // Let the note pipeline and any in-flight tagging publish before
    // tearing down.
    let grace = config.session.note_delay()
        + config.session.suggestions_delay()
        + Duration::from_millis(500);
    tokio::time::sleep(grace).await;
    printer.abort();

    Ok(())
}

/// Render one event as a human-readable stdout line.
fn render_event(event: &Event) {
    match event {
        Event::ListeningStarted { session_id } => {
            println!("{} {}", "listening".green().bold(), session_id);
        }
        Event::ListeningStopped { session_id } => {
            println!("{} {}", "stopped".yellow().bold(), session_id);
        }
        Event::Transcription(utterance) => {
            println!(
                "{} {} {}",
                format!("[{}]", utterance.speaker.name).cyan(),
                utterance.text,
                format!("{:.2}", utterance.confidence).dimmed()
            );
        }
        Event::ClinicalEntities(entities) => {
            for entity in entities {
                println!(
                    "  {} {} {}",
                    entity.kind.label().magenta(),
                    entity.value,
                    format!("{:.2}", entity.confidence).dimmed()
                );
            }
        }
        Event::NoteGenerated(note) => {
            println!(
                "{} {} ({} entities, status {})",
                "note".green().bold(),
                note.id,
                note.entities.len(),
                note.status.label()
            );
        }
        Event::ReviewSuggestions(suggestions) => {
            for suggestion in suggestions {
                println!(
                    "  {} [{}] {}",
                    "review".blue(),
                    suggestion.severity.label(),
                    suggestion.message
                );
            }
        }
        Event::IntegrationResults(results) => {
            for result in results {
                if result.success {
                    println!("  {} {}", "ok".green(), result.message);
                } else {
                    println!("  {} {}", "failed".red(), result.message);
                }
            }
        }
    }
}

/// Print the stored note list.
async fn list_notes(simulator: &Simulator) {
    println!("Stored notes:");
    for note in simulator.get_notes().await {
        println!(
            "  {}  {:<12}  {}  {}",
            note.id,
            note.status.label(),
            note.patient_id,
            note.updated_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .dimmed()
        );
    }
}

/// Print one stored note as JSON.
async fn show_note(simulator: &Simulator, id: &str) -> Result<()> {
    let note = simulator.get_note(id).await?;
    println!("{}", serde_json::to_string_pretty(&note)?);
    Ok(())
}

/// Run the entity tagger over a piece of text and print what it finds.
fn tag_text(simulator: &Simulator, text: &str) {
    let entities = simulator.tag(text);
    if entities.is_empty() {
        println!("No clinical entities found");
        return;
    }
    println!("Entities:");
    for entity in &entities {
        let mut line = format!("  {:<10} {}", entity.kind.label(), entity.value);
        if let Some(code) = &entity.icd10 {
            line.push_str(&format!("  ICD-10 {code}"));
        }
        if let Some(code) = &entity.snomed_ct {
            line.push_str(&format!("  SNOMED {code}"));
        }
        if let Some(span) = &entity.location {
            line.push_str(&format!("  at {}..{}", span.start, span.end));
        }
        println!("{line}");
    }
}

/// Print downstream system health.
fn show_status(simulator: &Simulator) {
    println!("Downstream systems:");
    for status in simulator.system_status() {
        let bullet = match status.state {
            SystemState::Online => "●".green().to_string(),
            SystemState::Degraded => "●".yellow().to_string(),
            SystemState::Offline => "●".red().to_string(),
        };
        println!(
            "  {} {:<16} {:<9} {:>4} ms  errors: {}",
            bullet,
            status.name,
            status.state.label(),
            status.response_time_ms,
            status.error_count
        );
    }
}

/// Submit a note to the given systems and print per-target outcomes.
async fn finalize_note(simulator: &Simulator, note_id: &str, targets: &[String]) {
    println!("Submitting {} to {} system(s):", note_id, targets.len());
    let results = simulator.finalize_note(note_id, targets).await;
    let mut failures = 0;
    for result in &results {
        if result.success {
            println!("  {} {}", "ok".green(), result.message);
        } else {
            failures += 1;
            println!("  {} {}", "failed".red(), result.message);
        }
    }
    if failures > 0 {
        std::process::exit(1);
    }
}
