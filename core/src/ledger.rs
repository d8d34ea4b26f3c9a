//! The capacity-bounded registration ledger.
//!
//! `SeatLedger` is the authoritative state for one resource kind's
//! registrations. It is CRITICAL for preventing double-booking under
//! concurrency (the "last seat" problem): two applicants racing for the
//! final seat must never both be admitted, and a freed seat must promote
//! exactly one waitlisted record.
//!
//! **Concurrency strategy**: one exclusive lock per ledger instance guards
//! every mutating operation; a shared lock guards pure reads. The lock
//! scopes the whole ledger rather than a single resource - a deliberate
//! simplicity/correctness trade-off for school-scale traffic. Admission
//! decisions are made against the state visible at lock-acquisition time,
//! so the check-then-insert in [`SeatLedger::apply`] and the
//! mark-terminal/scan/promote in [`SeatLedger::withdraw`] are each one
//! atomic unit.

use crate::directory::{ResourceDirectory, SubjectDirectory};
use crate::environment::Clock;
use crate::error::{LedgerError, Result};
use crate::types::{Registration, RegistrationId, ResourceId, SeatStatus, SubjectId, Withdrawal};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Records plus the monotonic arrival counter, guarded together.
///
/// The counter is assigned under the same lock as insertion so that FIFO
/// order is total even for creates that land within one clock tick.
#[derive(Default)]
struct LedgerState {
    records: HashMap<RegistrationId, Registration>,
    next_arrival: u64,
}

impl LedgerState {
    fn admitted_count(&self, resource_id: &ResourceId) -> usize {
        self.records
            .values()
            .filter(|r| r.resource_id == *resource_id && r.status.holds_seat())
            .count()
    }

    /// Earliest-arrival waitlisted record for the resource, if any.
    ///
    /// Selection is by arrival sequence, never map iteration order or
    /// wall-clock timestamps.
    fn next_waitlisted(&self, resource_id: &ResourceId) -> Option<RegistrationId> {
        self.records
            .values()
            .filter(|r| r.resource_id == *resource_id && r.status == SeatStatus::Waitlisted)
            .min_by_key(|r| r.arrival)
            .map(|r| r.id)
    }
}

/// Capacity-bounded registration ledger for one resource kind.
///
/// Holds every registration record ever created against it; records are
/// never deleted, only transitioned to a terminal status. The ledger
/// exclusively owns `status` and `updated_at` - callers submit apply /
/// withdraw / set-status intents and receive owned snapshots back.
///
/// Resource existence and capacity are read through the injected
/// [`ResourceDirectory`] on every operation that needs them, so external
/// capacity edits take effect without restarting the ledger.
pub struct SeatLedger {
    inner: RwLock<LedgerState>,
    resources: Arc<dyn ResourceDirectory>,
    subjects: Arc<dyn SubjectDirectory>,
    clock: Arc<dyn Clock>,
}

impl SeatLedger {
    /// Create a ledger over the given directories and clock
    #[must_use]
    pub fn new(
        resources: Arc<dyn ResourceDirectory>,
        subjects: Arc<dyn SubjectDirectory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            inner: RwLock::new(LedgerState::default()),
            resources,
            subjects,
            clock,
        }
    }

    /// Apply a subject for a seat in a resource.
    ///
    /// Admission is decided at creation: if the resource's current
    /// capacity admits one more seat holder the record is created
    /// `Admitted`, otherwise `Waitlisted`. The existence checks, the
    /// duplicate check, the admitted count, and the insert happen under
    /// one write-lock acquisition - two concurrent applies can never both
    /// observe the same spare seat.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::Validation`] if the resource or subject does not
    ///   resolve in its directory
    /// - [`LedgerError::Conflict`] if a non-terminal registration already
    ///   exists for this (resource, subject) pair
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned (indicates a panic in another thread)
    #[allow(clippy::expect_used)]
    pub fn apply(&self, resource_id: ResourceId, subject_id: SubjectId) -> Result<Registration> {
        let mut state = self
            .inner
            .write()
            .expect("Seat ledger lock poisoned - indicates a panic in another thread");

        let Some(capacity) = self.resources.capacity(&resource_id) else {
            return Err(LedgerError::validation("resourceId", "not found"));
        };
        if !self.subjects.exists(&subject_id) {
            return Err(LedgerError::validation("subjectId", "not found"));
        }
        let duplicate = state
            .records
            .values()
            .any(|r| r.resource_id == resource_id && r.subject_id == subject_id && !r.is_terminal());
        if duplicate {
            return Err(LedgerError::conflict("already applied"));
        }

        let admitted = state.admitted_count(&resource_id);
        let status = if capacity.admits(admitted) {
            SeatStatus::Admitted
        } else {
            SeatStatus::Waitlisted
        };

        let arrival = state.next_arrival;
        state.next_arrival += 1;
        let record = Registration::new(
            RegistrationId::new(),
            resource_id,
            subject_id,
            status,
            self.clock.now(),
            arrival,
        );
        tracing::debug!(
            registration = %record.id,
            resource = %resource_id,
            subject = %subject_id,
            %status,
            admitted,
            %capacity,
            "registration created"
        );
        state.records.insert(record.id, record.clone());
        Ok(record)
    }

    /// Withdraw a registration and promote the next waitlisted record.
    ///
    /// A record already in a terminal status is returned unchanged with no
    /// promotion - repeated withdrawals are idempotent and can never
    /// double-promote for one freed seat. Otherwise the record is marked
    /// `Withdrawn`; if it held a seat, capacity is re-read at this instant
    /// and the earliest-arrival waitlisted record for the same resource is
    /// promoted into the freed seat. Mark, scan, and promote are one
    /// atomic unit: no concurrent call can observe the freed seat before
    /// the promotion is attempted.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NotFound`] if no record has this id
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned (indicates a panic in another thread)
    #[allow(clippy::expect_used)]
    pub fn withdraw(&self, id: &RegistrationId) -> Result<Withdrawal> {
        let mut state = self
            .inner
            .write()
            .expect("Seat ledger lock poisoned - indicates a panic in another thread");

        let now = self.clock.now();
        let (withdrawn, prior, resource_id) = {
            let Some(record) = state.records.get_mut(id) else {
                return Err(LedgerError::not_found("registration", id));
            };
            if record.is_terminal() {
                return Ok(Withdrawal {
                    withdrawn: record.clone(),
                    promoted: None,
                });
            }
            let prior = record.status;
            record.status = SeatStatus::Withdrawn;
            record.updated_at = now;
            (record.clone(), prior, record.resource_id)
        };

        let mut promoted = None;
        if prior.holds_seat() {
            // The seat only transfers if capacity still admits one more at
            // this instant; an external capacity cut since enqueue time
            // leaves the waitlist untouched. A resource missing from its
            // directory has no capacity to check, so promotion is skipped.
            if let Some(capacity) = self.resources.capacity(&resource_id) {
                let admitted = state.admitted_count(&resource_id);
                if capacity.admits(admitted) {
                    if let Some(next_id) = state.next_waitlisted(&resource_id) {
                        if let Some(record) = state.records.get_mut(&next_id) {
                            record.status = SeatStatus::Admitted;
                            record.updated_at = now;
                            promoted = Some(record.clone());
                            tracing::info!(
                                withdrawn = %id,
                                promoted = %next_id,
                                resource = %resource_id,
                                "waitlisted registration promoted into freed seat"
                            );
                        }
                    }
                }
            }
        }

        Ok(Withdrawal { withdrawn, promoted })
    }

    /// Set a registration's status directly (administrative override).
    ///
    /// Bypasses FIFO order and never promotes. Setting the current status
    /// again is a no-op success. A record in a terminal status cannot be
    /// moved to a different one - re-application creates a fresh record
    /// instead. Forcing `Admitted` re-reads capacity and fails when the
    /// resource is full.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NotFound`] if no record has this id
    /// - [`LedgerError::Conflict`] if the record is terminal, or if
    ///   forcing `Admitted` would exceed the resource's capacity
    /// - [`LedgerError::Validation`] if forcing `Admitted` and the
    ///   resource no longer resolves in its directory
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned (indicates a panic in another thread)
    #[allow(clippy::expect_used)]
    pub fn set_status(&self, id: &RegistrationId, status: SeatStatus) -> Result<Registration> {
        let mut state = self
            .inner
            .write()
            .expect("Seat ledger lock poisoned - indicates a panic in another thread");

        let resource_id = match state.records.get(id) {
            None => return Err(LedgerError::not_found("registration", id)),
            Some(record) if record.status == status => return Ok(record.clone()),
            Some(record) if record.is_terminal() => {
                return Err(LedgerError::conflict(format!(
                    "registration is {} and cannot change status",
                    record.status
                )));
            }
            Some(record) => record.resource_id,
        };

        if status == SeatStatus::Admitted {
            let Some(capacity) = self.resources.capacity(&resource_id) else {
                return Err(LedgerError::validation("resourceId", "not found"));
            };
            let admitted = state.admitted_count(&resource_id);
            if !capacity.admits(admitted) {
                return Err(LedgerError::conflict("resource full"));
            }
        }

        let now = self.clock.now();
        if let Some(record) = state.records.get_mut(id) {
            let prior = record.status;
            record.status = status;
            record.updated_at = now;
            tracing::debug!(
                registration = %id,
                from = %prior,
                to = %status,
                "registration status overridden"
            );
            Ok(record.clone())
        } else {
            Err(LedgerError::not_found("registration", id))
        }
    }

    /// Look up a registration by id.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NotFound`] if no record has this id
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned (indicates a panic in another thread)
    #[allow(clippy::expect_used)]
    pub fn get(&self, id: &RegistrationId) -> Result<Registration> {
        let state = self
            .inner
            .read()
            .expect("Seat ledger lock poisoned - indicates a panic in another thread");
        state
            .records
            .get(id)
            .cloned()
            .ok_or_else(|| LedgerError::not_found("registration", id))
    }

    /// All registrations for a resource, as an unordered snapshot.
    ///
    /// Waitlist order is an internal promotion detail, not a guarantee of
    /// this listing.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned (indicates a panic in another thread)
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn list_by_resource(&self, resource_id: &ResourceId) -> Vec<Registration> {
        let state = self
            .inner
            .read()
            .expect("Seat ledger lock poisoned - indicates a panic in another thread");
        state
            .records
            .values()
            .filter(|r| r.resource_id == *resource_id)
            .cloned()
            .collect()
    }

    /// All registrations for a subject, as an unordered snapshot.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned (indicates a panic in another thread)
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn list_by_subject(&self, subject_id: &SubjectId) -> Vec<Registration> {
        let state = self
            .inner
            .read()
            .expect("Seat ledger lock poisoned - indicates a panic in another thread");
        state
            .records
            .values()
            .filter(|r| r.subject_id == *subject_id)
            .cloned()
            .collect()
    }

    /// Total number of records ever created in this ledger
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned (indicates a panic in another thread)
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn count(&self) -> usize {
        let state = self
            .inner
            .read()
            .expect("Seat ledger lock poisoned - indicates a panic in another thread");
        state.records.len()
    }
}

