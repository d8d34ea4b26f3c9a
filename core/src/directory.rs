//! Directories the ledger consults for referential validation.
//!
//! The ledger never owns resources or subjects; it reads them through these
//! narrow traits on every operation that needs them. Capacity in particular
//! is re-read per call, never cached, so an external capacity edit takes
//! effect on the next apply without restarting the ledger.

use crate::types::{Capacity, ResourceId, SubjectId};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

/// Read contract for capacity-bearing resources (class sections, events).
pub trait ResourceDirectory: Send + Sync {
    /// Returns `true` if the resource is known to this directory
    fn exists(&self, id: &ResourceId) -> bool;

    /// Current capacity of the resource, or `None` if it is unknown
    fn capacity(&self, id: &ResourceId) -> Option<Capacity>;
}

/// Read contract for registrable subjects (students).
pub trait SubjectDirectory: Send + Sync {
    /// Returns `true` if the subject is known to this directory
    fn exists(&self, id: &SubjectId) -> bool;
}

/// Thread-safe in-memory resource directory.
///
/// Backs the ledger in tests, demos, and deployments that keep the roster
/// in process. Capacity updates are visible to the ledger on its next
/// operation.
#[derive(Clone, Default)]
pub struct InMemoryResourceDirectory {
    resources: Arc<RwLock<HashMap<ResourceId, Capacity>>>,
}

impl InMemoryResourceDirectory {
    /// Create a new empty directory
    #[must_use]
    pub fn new() -> Self {
        Self {
            resources: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Add a resource, or update its capacity if already present.
    ///
    /// Returns `true` if a previous capacity was replaced.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned (indicates a panic in another thread)
    #[allow(clippy::expect_used)]
    pub fn upsert(&self, id: ResourceId, capacity: Capacity) -> bool {
        let mut resources = self
            .resources
            .write()
            .expect("Resource directory lock poisoned - indicates a panic in another thread");
        resources.insert(id, capacity).is_some()
    }

    /// Remove a resource from the directory.
    ///
    /// Returns `true` if it was present.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned (indicates a panic in another thread)
    #[allow(clippy::expect_used)]
    pub fn remove(&self, id: &ResourceId) -> bool {
        let mut resources = self
            .resources
            .write()
            .expect("Resource directory lock poisoned - indicates a panic in another thread");
        resources.remove(id).is_some()
    }

    /// Number of known resources
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned (indicates a panic in another thread)
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn len(&self) -> usize {
        let resources = self
            .resources
            .read()
            .expect("Resource directory lock poisoned - indicates a panic in another thread");
        resources.len()
    }

    /// Returns `true` if no resources are known
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResourceDirectory for InMemoryResourceDirectory {
    #[allow(clippy::expect_used)]
    fn exists(&self, id: &ResourceId) -> bool {
        let resources = self
            .resources
            .read()
            .expect("Resource directory lock poisoned - indicates a panic in another thread");
        resources.contains_key(id)
    }

    #[allow(clippy::expect_used)]
    fn capacity(&self, id: &ResourceId) -> Option<Capacity> {
        let resources = self
            .resources
            .read()
            .expect("Resource directory lock poisoned - indicates a panic in another thread");
        resources.get(id).copied()
    }
}

/// Thread-safe in-memory subject directory.
#[derive(Clone, Default)]
pub struct InMemorySubjectDirectory {
    subjects: Arc<RwLock<HashSet<SubjectId>>>,
}

impl InMemorySubjectDirectory {
    /// Create a new empty directory
    #[must_use]
    pub fn new() -> Self {
        Self {
            subjects: Arc::new(RwLock::new(HashSet::new())),
        }
    }

    /// Add a subject.
    ///
    /// Returns `true` if the subject was already present.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned (indicates a panic in another thread)
    #[allow(clippy::expect_used)]
    pub fn insert(&self, id: SubjectId) -> bool {
        let mut subjects = self
            .subjects
            .write()
            .expect("Subject directory lock poisoned - indicates a panic in another thread");
        !subjects.insert(id)
    }

    /// Remove a subject.
    ///
    /// Returns `true` if it was present.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned (indicates a panic in another thread)
    #[allow(clippy::expect_used)]
    pub fn remove(&self, id: &SubjectId) -> bool {
        let mut subjects = self
            .subjects
            .write()
            .expect("Subject directory lock poisoned - indicates a panic in another thread");
        subjects.remove(id)
    }

    /// Number of known subjects
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned (indicates a panic in another thread)
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn len(&self) -> usize {
        let subjects = self
            .subjects
            .read()
            .expect("Subject directory lock poisoned - indicates a panic in another thread");
        subjects.len()
    }

    /// Returns `true` if no subjects are known
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SubjectDirectory for InMemorySubjectDirectory {
    #[allow(clippy::expect_used)]
    fn exists(&self, id: &SubjectId) -> bool {
        let subjects = self
            .subjects
            .read()
            .expect("Subject directory lock poisoned - indicates a panic in another thread");
        subjects.contains(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_directory_upsert_and_lookup() {
        let dir = InMemoryResourceDirectory::new();
        let id = ResourceId::new();

        assert!(!dir.exists(&id));
        assert_eq!(dir.capacity(&id), None);

        let replaced = dir.upsert(id, Capacity::new(12));
        assert!(!replaced);
        assert!(dir.exists(&id));
        assert_eq!(dir.capacity(&id), Some(Capacity::new(12)));
    }

    #[test]
    fn test_resource_directory_capacity_update_is_visible() {
        let dir = InMemoryResourceDirectory::new();
        let id = ResourceId::new();

        dir.upsert(id, Capacity::new(1));
        let replaced = dir.upsert(id, Capacity::new(5));
        assert!(replaced);
        assert_eq!(dir.capacity(&id), Some(Capacity::new(5)));
    }

    #[test]
    fn test_resource_directory_remove() {
        let dir = InMemoryResourceDirectory::new();
        let id = ResourceId::new();

        dir.upsert(id, Capacity::new(3));
        assert!(dir.remove(&id));
        assert!(!dir.remove(&id));
        assert!(dir.is_empty());
    }

    #[test]
    fn test_subject_directory_membership() {
        let dir = InMemorySubjectDirectory::new();
        let id = SubjectId::new();

        assert!(!dir.exists(&id));
        dir.insert(id);
        assert!(dir.exists(&id));
        assert_eq!(dir.len(), 1);
        assert!(dir.remove(&id));
        assert!(!dir.exists(&id));
    }
}
