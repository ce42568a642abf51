use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::model::{
    candidate::{Candidate, CandidateId},
    user::User,
};

use super::{ElectionStore, StoreData, StoreError};

/// An in-memory store: the browser-local-storage analogue for tests and
/// short-lived embedding. Contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<StoreData>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ElectionStore for MemoryStore {
    fn users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.data.lock().users.clone())
    }

    fn user(&self, student_id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.data.lock().user(student_id).cloned())
    }

    fn insert_user(&self, user: User) -> Result<(), StoreError> {
        self.data.lock().insert_user(user)
    }

    fn candidates(&self) -> Result<Vec<Candidate>, StoreError> {
        Ok(self.data.lock().candidates.clone())
    }

    fn init_candidates(&self, candidates: Vec<Candidate>) -> Result<bool, StoreError> {
        let mut data = self.data.lock();
        if data.candidates.is_empty() {
            data.candidates = candidates;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn voting_end_time(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        Ok(self.data.lock().voting_end_time)
    }

    fn set_voting_end_time(&self, end: DateTime<Utc>) -> Result<(), StoreError> {
        self.data.lock().voting_end_time = Some(end);
        Ok(())
    }

    fn init_voting_end_time(&self, end: DateTime<Utc>) -> Result<bool, StoreError> {
        let mut data = self.data.lock();
        if data.voting_end_time.is_none() {
            data.voting_end_time = Some(end);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn record_ballot(
        &self,
        student_id: &str,
        selected: &BTreeSet<CandidateId>,
    ) -> Result<User, StoreError> {
        self.data.lock().record_ballot(student_id, selected)
    }
}
