//! # Barre Testing
//!
//! Testing utilities and fixtures for the Barre platform.
//!
//! This crate provides:
//! - Deterministic clock implementations of [`barre_core::environment::Clock`]
//! - Seeded-directory fixture helpers
//!
//! ## Example
//!
//! ```
//! use barre_testing::{seeded_resources, seeded_subjects, test_clock};
//! use barre_core::{Capacity, ClassEnrollments, ResourceId, SubjectId};
//! use std::sync::Arc;
//!
//! let ballet = ResourceId::new();
//! let ava = SubjectId::new();
//! let classes = seeded_resources(&[(ballet, Capacity::new(8))]);
//! let students = seeded_subjects(&[ava]);
//!
//! let enrollments = ClassEnrollments::new(
//!     Arc::new(classes),
//!     Arc::new(students),
//!     Arc::new(test_clock()),
//! );
//! assert!(enrollments.enroll(ballet, ava).is_ok());
//! ```

use barre_core::directory::{InMemoryResourceDirectory, InMemorySubjectDirectory};
use barre_core::{Capacity, ResourceId, SubjectId};
use chrono::{DateTime, Utc};

/// Mock implementations for testing.
pub mod mocks {
    use barre_core::environment::Clock;
    use chrono::{DateTime, Duration, Utc};
    use std::sync::Mutex;

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use barre_testing::mocks::FixedClock;
    /// use barre_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Clock that advances one second per reading
    ///
    /// Useful for asserting that a mutation bumped `updated_at` past
    /// `created_at` without sleeping in tests.
    #[derive(Debug)]
    pub struct SteppingClock {
        next: Mutex<DateTime<Utc>>,
    }

    impl SteppingClock {
        /// Create a stepping clock starting at the given time
        #[must_use]
        pub const fn new(start: DateTime<Utc>) -> Self {
            Self {
                next: Mutex::new(start),
            }
        }

        /// Create a stepping clock starting at the default test epoch
        ///
        /// # Panics
        ///
        /// Panics if the hardcoded timestamp fails to parse, which should
        /// never happen in practice.
        #[must_use]
        pub fn from_test_epoch() -> Self {
            Self::new(super::test_epoch())
        }
    }

    impl Clock for SteppingClock {
        #[allow(clippy::expect_used)]
        fn now(&self) -> DateTime<Utc> {
            let mut next = self
                .next
                .lock()
                .expect("Stepping clock lock poisoned - indicates a panic in another thread");
            let current = *next;
            *next += Duration::seconds(1);
            current
        }
    }
}

/// The default test epoch (2025-01-01 00:00:00 UTC)
///
/// # Panics
///
/// This function will panic if the hardcoded timestamp fails to parse,
/// which should never happen in practice.
#[must_use]
#[allow(clippy::expect_used)]
pub fn test_epoch() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
        .expect("hardcoded timestamp should always parse")
        .with_timezone(&Utc)
}

/// Create a default fixed clock for tests, pinned at [`test_epoch`]
#[must_use]
pub fn test_clock() -> mocks::FixedClock {
    mocks::FixedClock::new(test_epoch())
}

/// Build an in-memory resource directory seeded with the given capacities
#[must_use]
pub fn seeded_resources(entries: &[(ResourceId, Capacity)]) -> InMemoryResourceDirectory {
    let directory = InMemoryResourceDirectory::new();
    for (id, capacity) in entries {
        directory.upsert(*id, *capacity);
    }
    directory
}

/// Build an in-memory subject directory seeded with the given subjects
#[must_use]
pub fn seeded_subjects(ids: &[SubjectId]) -> InMemorySubjectDirectory {
    let directory = InMemorySubjectDirectory::new();
    for id in ids {
        directory.insert(*id);
    }
    directory
}

// Re-export commonly used items
pub use mocks::{FixedClock, SteppingClock};

#[cfg(test)]
mod tests {
    use super::*;
    use barre_core::environment::Clock;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        let time1 = clock.now();
        let time2 = clock.now();
        assert_eq!(time1, time2);
    }

    #[test]
    fn test_stepping_clock_advances_per_reading() {
        let clock = SteppingClock::from_test_epoch();
        let time1 = clock.now();
        let time2 = clock.now();
        assert!(time2 > time1);
    }

    #[test]
    fn test_seeded_directories() {
        use barre_core::directory::{ResourceDirectory, SubjectDirectory};

        let class = ResourceId::new();
        let student = SubjectId::new();
        let resources = seeded_resources(&[(class, Capacity::new(3))]);
        let subjects = seeded_subjects(&[student]);

        assert!(resources.exists(&class));
        assert_eq!(resources.capacity(&class), Some(Capacity::new(3)));
        assert!(subjects.exists(&student));
    }
}
