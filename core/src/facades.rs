//! Domain facades over the seat ledger.
//!
//! The same engine is instantiated twice: once for (student, class)
//! registrations and once for (student, event) registrations. The two
//! differ only in which resource directory they consult and in their
//! vocabulary - a class enrollment is *withdrawn* while an event
//! registration is *cancelled*; both are the ledger's terminal
//! `Withdrawn` state.

use crate::directory::{ResourceDirectory, SubjectDirectory};
use crate::environment::Clock;
use crate::error::Result;
use crate::ledger::SeatLedger;
use crate::types::{Registration, RegistrationId, ResourceId, SeatStatus, SubjectId, Withdrawal};
use std::sync::Arc;

/// Class-seat registrations: enrollment.
pub struct ClassEnrollments {
    ledger: SeatLedger,
}

impl ClassEnrollments {
    /// Create an enrollment ledger over the class roster and student directory
    #[must_use]
    pub fn new(
        classes: Arc<dyn ResourceDirectory>,
        students: Arc<dyn SubjectDirectory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            ledger: SeatLedger::new(classes, students, clock),
        }
    }

    /// Enroll a student in a class; admitted when a seat is open,
    /// waitlisted otherwise.
    ///
    /// # Errors
    ///
    /// See [`SeatLedger::apply`].
    pub fn enroll(&self, class_id: ResourceId, student_id: SubjectId) -> Result<Registration> {
        self.ledger.apply(class_id, student_id)
    }

    /// Withdraw an enrollment, promoting the earliest waitlisted student
    /// when a seat is freed.
    ///
    /// # Errors
    ///
    /// See [`SeatLedger::withdraw`].
    pub fn withdraw(&self, id: &RegistrationId) -> Result<Withdrawal> {
        self.ledger.withdraw(id)
    }

    /// Administrative status override; see [`SeatLedger::set_status`].
    ///
    /// # Errors
    ///
    /// See [`SeatLedger::set_status`].
    pub fn set_status(&self, id: &RegistrationId, status: SeatStatus) -> Result<Registration> {
        self.ledger.set_status(id, status)
    }

    /// Look up an enrollment by id.
    ///
    /// # Errors
    ///
    /// See [`SeatLedger::get`].
    pub fn get(&self, id: &RegistrationId) -> Result<Registration> {
        self.ledger.get(id)
    }

    /// All enrollments for a class, unordered
    #[must_use]
    pub fn for_class(&self, class_id: &ResourceId) -> Vec<Registration> {
        self.ledger.list_by_resource(class_id)
    }

    /// All enrollments for a student, unordered
    #[must_use]
    pub fn for_student(&self, student_id: &SubjectId) -> Vec<Registration> {
        self.ledger.list_by_subject(student_id)
    }
}

/// Event-seat registrations.
pub struct EventRegistrations {
    ledger: SeatLedger,
}

impl EventRegistrations {
    /// Create an event registration ledger over the event calendar and
    /// student directory
    #[must_use]
    pub fn new(
        events: Arc<dyn ResourceDirectory>,
        students: Arc<dyn SubjectDirectory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            ledger: SeatLedger::new(events, students, clock),
        }
    }

    /// Register a student for an event; admitted when a seat is open,
    /// waitlisted otherwise.
    ///
    /// # Errors
    ///
    /// See [`SeatLedger::apply`].
    pub fn register(&self, event_id: ResourceId, student_id: SubjectId) -> Result<Registration> {
        self.ledger.apply(event_id, student_id)
    }

    /// Cancel a registration (the event-side synonym of withdrawal),
    /// promoting the earliest waitlisted student when a seat is freed.
    ///
    /// # Errors
    ///
    /// See [`SeatLedger::withdraw`].
    pub fn cancel(&self, id: &RegistrationId) -> Result<Withdrawal> {
        self.ledger.withdraw(id)
    }

    /// Administrative status override; see [`SeatLedger::set_status`].
    ///
    /// # Errors
    ///
    /// See [`SeatLedger::set_status`].
    pub fn set_status(&self, id: &RegistrationId, status: SeatStatus) -> Result<Registration> {
        self.ledger.set_status(id, status)
    }

    /// Look up a registration by id.
    ///
    /// # Errors
    ///
    /// See [`SeatLedger::get`].
    pub fn get(&self, id: &RegistrationId) -> Result<Registration> {
        self.ledger.get(id)
    }

    /// All registrations for an event, unordered
    #[must_use]
    pub fn for_event(&self, event_id: &ResourceId) -> Vec<Registration> {
        self.ledger.list_by_resource(event_id)
    }

    /// All registrations for a student, unordered
    #[must_use]
    pub fn for_student(&self, student_id: &SubjectId) -> Vec<Registration> {
        self.ledger.list_by_subject(student_id)
    }
}

