//! # Barre Core
//!
//! Capacity-bounded registration ledger for the Barre dance-school
//! platform.
//!
//! This crate provides the one genuinely hard piece of the platform's
//! backend: admitting applicants up to a fixed capacity, keeping a
//! deterministic FIFO waitlist, and atomically promoting the next
//! waitlisted applicant when a seat holder withdraws - all under
//! concurrent access without races, double-bookings, or lost promotions.
//!
//! ## Core Concepts
//!
//! - **Resource**: a capacity-bearing entity (class section or event)
//!   that registrations compete for seats in
//! - **Subject**: the party being registered (a student)
//! - **Registration**: one subject's claim on one resource, moving
//!   through admitted / waitlisted / withdrawn / rejected
//! - **Promotion**: the earliest waitlisted registration taking over a
//!   freed seat
//!
//! ## Architecture Principles
//!
//! - One exclusive lock per ledger; check-then-insert and
//!   mark-then-promote are single critical sections
//! - Directories are consulted per operation, never cached
//! - Dependency injection via traits ([`environment::Clock`],
//!   [`directory::ResourceDirectory`], [`directory::SubjectDirectory`])
//! - Typed, recoverable errors - bad input never panics the ledger
//!
//! ## Example
//!
//! ```
//! use barre_core::directory::{InMemoryResourceDirectory, InMemorySubjectDirectory};
//! use barre_core::environment::SystemClock;
//! use barre_core::{Capacity, ClassEnrollments, ResourceId, SeatStatus, SubjectId};
//! use std::sync::Arc;
//!
//! # fn main() -> barre_core::Result<()> {
//! let classes = InMemoryResourceDirectory::new();
//! let students = InMemorySubjectDirectory::new();
//!
//! let ballet = ResourceId::new();
//! classes.upsert(ballet, Capacity::new(1));
//! let ava = SubjectId::new();
//! let ben = SubjectId::new();
//! students.insert(ava);
//! students.insert(ben);
//!
//! let enrollments = ClassEnrollments::new(
//!     Arc::new(classes),
//!     Arc::new(students),
//!     Arc::new(SystemClock),
//! );
//!
//! let seat = enrollments.enroll(ballet, ava)?;
//! let queued = enrollments.enroll(ballet, ben)?;
//! assert_eq!(seat.status, SeatStatus::Admitted);
//! assert_eq!(queued.status, SeatStatus::Waitlisted);
//!
//! // Withdrawing the seat holder promotes the waitlist head atomically.
//! let outcome = enrollments.withdraw(&seat.id)?;
//! assert_eq!(outcome.promoted.map(|r| r.id), Some(queued.id));
//! # Ok(())
//! # }
//! ```

pub mod directory;
pub mod environment;
pub mod error;
pub mod facades;
pub mod ledger;
pub mod types;

pub use error::{LedgerError, Result};
pub use facades::{ClassEnrollments, EventRegistrations};
pub use ledger::SeatLedger;
pub use types::{
    Capacity, Registration, RegistrationId, ResourceId, SeatStatus, SubjectId, Withdrawal,
};
