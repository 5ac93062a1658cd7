//! Job store abstraction
//!
//! The orchestrator keeps jobs behind a small get/put/update interface so
//! the in-memory table can be swapped for a persistent store without
//! touching orchestration logic. No TTL or eviction: jobs live until
//! process restart.

use crate::job::Job;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

/// Storage contract for jobs, keyed by job token.
pub trait JobStore: Send + Sync {
    fn put(&self, job: Job);
    fn get(&self, id: &Uuid) -> Option<Job>;
    /// Apply a mutation to a stored job, if present. Returns whether the
    /// job existed.
    fn update(&self, id: &Uuid, f: &mut dyn FnMut(&mut Job)) -> bool;
    fn list(&self) -> Vec<Uuid>;
}

/// In-memory job table. One writer per job (the processing routine), any
/// number of readers.
#[derive(Default)]
pub struct MemoryJobStore {
    jobs: RwLock<HashMap<Uuid, Job>>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl JobStore for MemoryJobStore {
    fn put(&self, job: Job) {
        self.jobs.write().unwrap().insert(job.id, job);
    }

    fn get(&self, id: &Uuid) -> Option<Job> {
        self.jobs.read().unwrap().get(id).cloned()
    }

    fn update(&self, id: &Uuid, f: &mut dyn FnMut(&mut Job)) -> bool {
        let mut jobs = self.jobs.write().unwrap();
        match jobs.get_mut(id) {
            Some(job) => {
                f(job);
                true
            }
            None => false,
        }
    }

    fn list(&self) -> Vec<Uuid> {
        self.jobs.read().unwrap().keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::JobStatus;

    #[test]
    fn test_put_get_roundtrip() {
        let store = MemoryJobStore::new();
        let id = Uuid::new_v4();
        store.put(Job::new(id));

        let job = store.get(&id).unwrap();
        assert_eq!(job.status, JobStatus::Pending);
        assert!(store.get(&Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_update_mutates_in_place() {
        let store = MemoryJobStore::new();
        let id = Uuid::new_v4();
        store.put(Job::new(id));

        let updated = store.update(&id, &mut |job| {
            job.transition(JobStatus::Disassembling, "Disassembling binary...", 10)
        });
        assert!(updated);
        assert_eq!(store.get(&id).unwrap().progress, 10);

        let missing = store.update(&Uuid::new_v4(), &mut |_| {});
        assert!(!missing);
    }
}
