mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{
    candidate::{Candidate, CandidateId},
    user::User,
};

/// Stable keys of the underlying key-value store.
pub const USERS_KEY: &str = "users";
pub const CANDIDATES_KEY: &str = "candidates";
pub const VOTING_END_TIME_KEY: &str = "votingEndTime";

/// Failures from the persistence layer. All of them abort the attempt
/// without applying a partial update; none are fatal to the session.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("corrupt store record: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("corrupt voting end time: {0:?}")]
    BadTimestamp(String),
    #[error("student id already registered: {0}")]
    DuplicateStudentId(String),
    #[error("no user with student id {0}")]
    UnknownUser(String),
    #[error("no candidate with id {0}")]
    UnknownCandidate(CandidateId),
    #[error("user {0} has already voted")]
    AlreadyVoted(String),
}

/// Repository interface over the shared election records.
///
/// `record_ballot` is the transaction boundary: the candidate tallies and the
/// voter record are committed together or not at all, and the already-voted
/// guard is re-checked inside the commit so a stale eligibility answer cannot
/// double-count. Implementations serialise writers with an in-process mutex;
/// that is only an approximation of the single-writer requirement, and
/// running several processes against the same backing data needs a shared
/// transactional backend instead.
pub trait ElectionStore: Send + Sync {
    /// All registered users, in registration order.
    fn users(&self) -> Result<Vec<User>, StoreError>;

    /// Look up one user by student ID.
    fn user(&self, student_id: &str) -> Result<Option<User>, StoreError>;

    /// Insert a user, enforcing student ID uniqueness.
    fn insert_user(&self, user: User) -> Result<(), StoreError>;

    /// All candidates, in seed order.
    fn candidates(&self) -> Result<Vec<Candidate>, StoreError>;

    /// Install the candidate slate iff none exists yet.
    /// Returns whether this call did the seeding.
    fn init_candidates(&self, candidates: Vec<Candidate>) -> Result<bool, StoreError>;

    fn voting_end_time(&self) -> Result<Option<DateTime<Utc>>, StoreError>;

    fn set_voting_end_time(&self, end: DateTime<Utc>) -> Result<(), StoreError>;

    /// Set the voting end time iff none exists yet.
    /// Returns whether this call set it.
    fn init_voting_end_time(&self, end: DateTime<Utc>) -> Result<bool, StoreError>;

    /// Atomically apply an accepted ballot: bump each selected candidate's
    /// tally by one and mark the voter. Returns the updated user record.
    fn record_ballot(
        &self,
        student_id: &str,
        selected: &BTreeSet<CandidateId>,
    ) -> Result<User, StoreError>;
}

/// The full store contents; what a single browser's local storage would hold.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct StoreData {
    pub users: Vec<User>,
    pub candidates: Vec<Candidate>,
    pub voting_end_time: Option<DateTime<Utc>>,
}

impl StoreData {
    pub fn user(&self, student_id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.student_id == student_id)
    }

    pub fn insert_user(&mut self, user: User) -> Result<(), StoreError> {
        if self.user(&user.student_id).is_some() {
            return Err(StoreError::DuplicateStudentId(user.student_id));
        }
        self.users.push(user);
        Ok(())
    }

    /// Apply a ballot all-or-nothing: every check runs before any mutation.
    pub fn record_ballot(
        &mut self,
        student_id: &str,
        selected: &BTreeSet<CandidateId>,
    ) -> Result<User, StoreError> {
        let user_index = self
            .users
            .iter()
            .position(|u| u.student_id == student_id)
            .ok_or_else(|| StoreError::UnknownUser(student_id.to_string()))?;
        if self.users[user_index].has_voted {
            return Err(StoreError::AlreadyVoted(student_id.to_string()));
        }
        for &id in selected {
            if !self.candidates.iter().any(|c| c.id == id) {
                return Err(StoreError::UnknownCandidate(id));
            }
        }

        for candidate in &mut self.candidates {
            if selected.contains(&candidate.id) {
                candidate.vote_count += 1;
            }
        }
        self.users[user_index].record_vote(selected.clone());
        Ok(self.users[user_index].clone())
    }
}
