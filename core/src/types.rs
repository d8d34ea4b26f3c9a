//! Domain types for the registration ledger.
//!
//! This module contains the identifier newtypes, the capacity value object,
//! the seat status state machine, and the registration record itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for a registration record
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegistrationId(Uuid);

impl RegistrationId {
    /// Creates a new random `RegistrationId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `RegistrationId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RegistrationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RegistrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a capacity-bearing resource (a class section or an event)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceId(Uuid);

impl ResourceId {
    /// Creates a new random `ResourceId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `ResourceId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ResourceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for the party being registered (a student)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubjectId(Uuid);

impl SubjectId {
    /// Creates a new random `SubjectId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `SubjectId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SubjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Capacity Value Object
// ============================================================================

/// Seat capacity of a resource.
///
/// A capacity of zero means the resource is unbounded: every applicant is
/// admitted and nobody is ever waitlisted. Positive capacities bound the
/// number of concurrently admitted registrations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Capacity(u32);

impl Capacity {
    /// Creates a `Capacity` with the given seat count
    #[must_use]
    pub const fn new(seats: u32) -> Self {
        Self(seats)
    }

    /// An unbounded capacity (never waitlists)
    pub const UNBOUNDED: Self = Self(0);

    /// Get the raw seat count (zero means unbounded)
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.0
    }

    /// Returns `true` if this capacity never waitlists
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if a resource with `admitted` current seat holders
    /// can admit one more
    #[must_use]
    pub const fn admits(&self, admitted: usize) -> bool {
        self.is_unbounded() || admitted < self.0 as usize
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unbounded() {
            write!(f, "unbounded")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

// ============================================================================
// Seat Status State Machine
// ============================================================================

/// Status of a registration record.
///
/// Resting states are `Admitted` (holding a confirmed seat against
/// capacity) and `Waitlisted` (queued in FIFO order awaiting a freed
/// seat). Terminal states are `Withdrawn` and `Rejected`; a terminal
/// record never holds a seat again, and a fresh application for the same
/// (resource, subject) pair creates an independent new record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatStatus {
    /// Holding a confirmed seat against capacity
    Admitted,
    /// Queued awaiting a freed seat
    Waitlisted,
    /// Voluntarily withdrawn (the event facade calls this "cancelled")
    Withdrawn,
    /// Rejected by an administrative override
    Rejected,
}

impl SeatStatus {
    /// Returns `true` for statuses from which no further seat-bearing
    /// transition occurs
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Withdrawn | Self::Rejected)
    }

    /// Returns `true` if this status counts against resource capacity
    #[must_use]
    pub const fn holds_seat(&self) -> bool {
        matches!(self, Self::Admitted)
    }
}

impl fmt::Display for SeatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Admitted => "admitted",
            Self::Waitlisted => "waitlisted",
            Self::Withdrawn => "withdrawn",
            Self::Rejected => "rejected",
        };
        write!(f, "{label}")
    }
}

// ============================================================================
// Registration Record
// ============================================================================

/// A single registration of a subject against a capacity-bearing resource.
///
/// Identity fields (`id`, `resource_id`, `subject_id`, `created_at`) are
/// immutable after creation. Only the ledger mutates `status` and
/// `updated_at`; callers submit apply / withdraw / set-status intents and
/// receive back owned snapshots.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    /// Opaque unique identifier, never reused
    pub id: RegistrationId,
    /// The resource this registration competes for a seat in
    pub resource_id: ResourceId,
    /// The party being registered
    pub subject_id: SubjectId,
    /// Current status
    pub status: SeatStatus,
    /// When the record was created
    pub created_at: DateTime<Utc>,
    /// Bumped on every status change
    pub updated_at: DateTime<Utc>,
    /// Arrival order under the ledger lock. Promotion picks the smallest
    /// arrival among waitlisted records; wall-clock resolution alone cannot
    /// order rapid concurrent creates.
    #[serde(skip)]
    pub(crate) arrival: u64,
}

impl Registration {
    pub(crate) const fn new(
        id: RegistrationId,
        resource_id: ResourceId,
        subject_id: SubjectId,
        status: SeatStatus,
        created_at: DateTime<Utc>,
        arrival: u64,
    ) -> Self {
        Self {
            id,
            resource_id,
            subject_id,
            status,
            created_at,
            updated_at: created_at,
            arrival,
        }
    }

    /// Returns `true` for records in a terminal status
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Outcome of a withdrawal: the record that was withdrawn plus the
/// waitlisted record promoted into the freed seat, when one exists.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Withdrawal {
    /// The record the withdrawal was applied to
    pub withdrawn: Registration,
    /// The earliest-arrival waitlisted record promoted into the freed
    /// seat; absent when no seat was freed or the waitlist was empty
    pub promoted: Option<Registration>,
}
