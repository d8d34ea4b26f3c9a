//! CLI walkthrough for the registration ledger.
//!
//! Seeds a class roster and an event calendar, then drives the two ledger
//! facades through the full admit / waitlist / withdraw / promote cycle.
//!
//! Scenario parameters come from the environment (a `.env` file works):
//! `BARRE_DEMO_CLASS_CAPACITY`, `BARRE_DEMO_EVENT_CAPACITY`,
//! `BARRE_DEMO_APPLICANTS`. Set `RUST_LOG=debug` to watch the ledger's
//! own admission decisions.

use anyhow::Result;
use barre_core::directory::{InMemoryResourceDirectory, InMemorySubjectDirectory};
use barre_core::environment::{Clock, SystemClock};
use barre_core::{
    Capacity, ClassEnrollments, EventRegistrations, Registration, ResourceId, SeatStatus,
    SubjectId,
};
use std::env;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Scenario parameters loaded from environment variables with defaults.
#[derive(Debug, Clone, Copy)]
struct DemoConfig {
    class_capacity: u32,
    event_capacity: u32,
    applicants: usize,
}

impl DemoConfig {
    fn from_env() -> Self {
        Self {
            class_capacity: env_or("BARRE_DEMO_CLASS_CAPACITY", 2),
            event_capacity: env_or("BARRE_DEMO_EVENT_CAPACITY", 3),
            applicants: env_or("BARRE_DEMO_APPLICANTS", 5),
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn short(id: impl ToString) -> String {
    let s = id.to_string();
    s.chars().take(8).collect()
}

fn describe(record: &Registration) -> String {
    format!(
        "registration {} (student {}) -> {}",
        short(record.id),
        short(record.subject_id),
        record.status
    )
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = DemoConfig::from_env();
    tracing::info!(?config, "starting enrollment walkthrough");

    println!("=== Barre: Class Enrollment ===\n");

    // Seed directories: one ballet section, one recital, a handful of students.
    let classes = InMemoryResourceDirectory::new();
    let events = InMemoryResourceDirectory::new();
    let students = InMemorySubjectDirectory::new();

    let ballet = ResourceId::new();
    classes.upsert(ballet, Capacity::new(config.class_capacity));
    let recital = ResourceId::new();
    events.upsert(recital, Capacity::new(config.event_capacity));

    let roster: Vec<SubjectId> = (0..config.applicants).map(|_| SubjectId::new()).collect();
    for student in &roster {
        students.insert(*student);
    }

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let enrollments = ClassEnrollments::new(
        Arc::new(classes),
        Arc::new(students.clone()),
        Arc::clone(&clock),
    );
    let registrations = EventRegistrations::new(Arc::new(events), Arc::new(students), clock);

    // Everybody applies; seats go to the first arrivals, the rest queue up.
    println!(
        "Ballet section has {} seats; {} students apply...",
        config.class_capacity, config.applicants
    );
    let mut records = Vec::new();
    for student in &roster {
        let record = enrollments.enroll(ballet, *student)?;
        println!("  {}", describe(&record));
        records.push(record);
    }

    // A duplicate application is rejected while the first is still active.
    if let Some(first) = roster.first() {
        match enrollments.enroll(ballet, *first) {
            Err(err) => println!("\nDuplicate application rejected: {err}"),
            Ok(_) => println!("\nUnexpected duplicate admission!"),
        }
    }

    // The first seat holder withdraws; the earliest waitlisted student is
    // promoted in the same step.
    if let Some(holder) = records.iter().find(|r| r.status == SeatStatus::Admitted) {
        println!("\nStudent {} withdraws...", short(holder.subject_id));
        let outcome = enrollments.withdraw(&holder.id)?;
        println!("  {}", describe(&outcome.withdrawn));
        match outcome.promoted {
            Some(promoted) => println!("  promoted: {}", describe(&promoted)),
            None => println!("  nobody waitlisted; the seat stays open"),
        }
    }

    println!("\nFinal ballet roster:");
    for record in enrollments.for_class(&ballet) {
        println!("  {}", describe(&record));
    }

    println!("\n=== Barre: Event Registration ===\n");
    println!(
        "Recital has {} seats; {} students register...",
        config.event_capacity, config.applicants
    );
    let mut event_records = Vec::new();
    for student in &roster {
        let record = registrations.register(recital, *student)?;
        println!("  {}", describe(&record));
        event_records.push(record);
    }

    // Cancellation is the event-side withdrawal; promotion works the same.
    if let Some(holder) = event_records.iter().find(|r| r.status == SeatStatus::Admitted) {
        println!("\nStudent {} cancels...", short(holder.subject_id));
        let outcome = registrations.cancel(&holder.id)?;
        println!("  {}", describe(&outcome.withdrawn));
        if let Some(promoted) = outcome.promoted {
            println!("  promoted: {}", describe(&promoted));
        }
    }

    println!("\nFinal recital roster:");
    for record in registrations.for_event(&recital) {
        println!("  {}", describe(&record));
    }

    Ok(())
}
