//! Property-based tests for the ledger invariants.
//!
//! Random operation sequences against a single resource must preserve,
//! at every step: the capacity bound on admitted records, the
//! one-active-record-per-subject rule, and strict FIFO promotion by
//! application order.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect

use barre_core::directory::{InMemoryResourceDirectory, InMemorySubjectDirectory};
use barre_core::{Capacity, RegistrationId, ResourceId, SeatLedger, SeatStatus, SubjectId};
use barre_testing::test_clock;
use proptest::prelude::*;
use std::sync::Arc;

const SUBJECT_POOL: usize = 6;

#[derive(Debug, Clone)]
enum Op {
    Apply(usize),
    Withdraw(usize),
    SetStatus(usize, SeatStatus),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    let status = prop_oneof![
        Just(SeatStatus::Admitted),
        Just(SeatStatus::Waitlisted),
        Just(SeatStatus::Withdrawn),
        Just(SeatStatus::Rejected),
    ];
    prop_oneof![
        (0..SUBJECT_POOL).prop_map(Op::Apply),
        any::<usize>().prop_map(Op::Withdraw),
        (any::<usize>(), status).prop_map(|(k, s)| Op::SetStatus(k, s)),
    ]
}

struct Harness {
    ledger: SeatLedger,
    resource: ResourceId,
    subjects: Vec<SubjectId>,
    capacity: Capacity,
    /// Record ids in application order; promotion must follow this order.
    created: Vec<RegistrationId>,
}

impl Harness {
    fn new(capacity: u32) -> Self {
        let resources = InMemoryResourceDirectory::new();
        let subjects_dir = InMemorySubjectDirectory::new();
        let resource = ResourceId::new();
        let capacity = Capacity::new(capacity);
        resources.upsert(resource, capacity);
        let subjects: Vec<SubjectId> = (0..SUBJECT_POOL).map(|_| SubjectId::new()).collect();
        for id in &subjects {
            subjects_dir.insert(*id);
        }
        Self {
            ledger: SeatLedger::new(
                Arc::new(resources),
                Arc::new(subjects_dir),
                Arc::new(test_clock()),
            ),
            resource,
            subjects,
            capacity,
            created: Vec::new(),
        }
    }

    fn admitted(&self) -> usize {
        self.ledger
            .list_by_resource(&self.resource)
            .iter()
            .filter(|r| r.status == SeatStatus::Admitted)
            .count()
    }

    /// Waitlisted record ids in application order.
    fn waitlist(&self) -> Vec<RegistrationId> {
        self.created
            .iter()
            .filter(|id| self.ledger.get(id).unwrap().status == SeatStatus::Waitlisted)
            .copied()
            .collect()
    }

    fn check_invariants(&self) {
        if !self.capacity.is_unbounded() {
            assert!(
                self.admitted() <= self.capacity.value() as usize,
                "admitted count exceeds capacity"
            );
        }
        for subject in &self.subjects {
            let active = self
                .ledger
                .list_by_subject(subject)
                .iter()
                .filter(|r| !r.is_terminal())
                .count();
            assert!(active <= 1, "subject holds {active} active registrations");
        }
    }

    fn step(&mut self, op: &Op) {
        match op {
            Op::Apply(subject_idx) => {
                let pre_admitted = self.admitted();
                match self.ledger.apply(self.resource, self.subjects[*subject_idx]) {
                    Ok(record) => {
                        // Admission is decided strictly by spare capacity
                        // at creation time.
                        let expected = if self.capacity.admits(pre_admitted) {
                            SeatStatus::Admitted
                        } else {
                            SeatStatus::Waitlisted
                        };
                        assert_eq!(record.status, expected);
                        self.created.push(record.id);
                    }
                    Err(err) => assert!(err.is_conflict(), "apply may only fail as duplicate"),
                }
            }
            Op::Withdraw(pick) => {
                if self.created.is_empty() {
                    return;
                }
                let id = self.created[pick % self.created.len()];
                let before = self.ledger.get(&id).unwrap();
                let expected_head = self.waitlist().first().copied();
                let outcome = self.ledger.withdraw(&id).unwrap();

                if before.is_terminal() {
                    // Idempotent: unchanged record, never a promotion.
                    assert_eq!(outcome.withdrawn, before);
                    assert!(outcome.promoted.is_none());
                } else {
                    assert_eq!(outcome.withdrawn.status, SeatStatus::Withdrawn);
                    if before.status == SeatStatus::Admitted {
                        // The freed seat goes to the earliest waitlisted
                        // record, or nobody when the waitlist is empty.
                        assert_eq!(outcome.promoted.map(|r| r.id), expected_head);
                    } else {
                        assert!(outcome.promoted.is_none());
                    }
                }
            }
            Op::SetStatus(pick, status) => {
                if self.created.is_empty() {
                    return;
                }
                let id = self.created[pick % self.created.len()];
                let before = self.ledger.get(&id).unwrap();
                match self.ledger.set_status(&id, *status) {
                    Ok(record) => {
                        assert_eq!(record.status, *status);
                        if before.status != *status {
                            assert!(!before.is_terminal(), "terminal records must not move");
                        }
                    }
                    Err(err) => {
                        // Either the record was terminal or a forced admit
                        // hit the capacity bound.
                        assert!(err.is_conflict());
                        assert_eq!(self.ledger.get(&id).unwrap(), before);
                    }
                }
            }
        }
    }
}

proptest! {
    #[test]
    fn invariants_hold_for_random_operation_sequences(
        capacity in 0u32..5,
        ops in prop::collection::vec(op_strategy(), 1..80),
    ) {
        let mut harness = Harness::new(capacity);
        for op in &ops {
            harness.step(op);
            harness.check_invariants();
        }
    }

    #[test]
    fn full_drain_after_random_applies_empties_the_waitlist(
        capacity in 1u32..4,
        applicants in 1usize..SUBJECT_POOL,
    ) {
        let mut harness = Harness::new(capacity);
        for i in 0..applicants {
            harness.step(&Op::Apply(i));
        }

        // Withdraw records in application order until none are active;
        // every withdrawal keeps the invariants intact.
        for idx in 0..harness.created.len() {
            harness.step(&Op::Withdraw(idx));
            harness.check_invariants();
        }
        prop_assert_eq!(harness.admitted(), 0);
        prop_assert!(harness.waitlist().is_empty());
    }
}
