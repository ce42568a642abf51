use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::model::candidate::CandidateId;

/// A registered account, as stored under the `users` key.
///
/// `has_voted` is true iff `voted_candidate_ids` is non-empty. The record is
/// created at registration and mutated exactly once, through [`record_vote`],
/// when a ballot is accepted.
///
/// `password_hash` is opaque here: credential checks belong to the login
/// screen, which hands this crate an already-authenticated record.
///
/// [`record_vote`]: User::record_vote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub student_id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub department: String,
    pub is_admin: bool,
    pub has_voted: bool,
    pub voted_candidate_ids: BTreeSet<CandidateId>,
}

impl User {
    /// Mark this account as having voted for the given candidates.
    /// Keeps `has_voted` consistent with the recorded selections.
    pub fn record_vote(&mut self, selected: BTreeSet<CandidateId>) {
        self.has_voted = !selected.is_empty();
        self.voted_candidate_ids = selected;
    }
}

/// A registration payload: a user that has not been stored yet.
/// Produced by the (external, already-validated) registration form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub student_id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub department: String,
}

impl From<NewUser> for User {
    fn from(new_user: NewUser) -> Self {
        Self {
            student_id: new_user.student_id,
            name: new_user.name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            department: new_user.department,
            is_admin: false,
            has_voted: false,
            voted_candidate_ids: BTreeSet::new(),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_produces_an_unvoted_student() {
        let user: User = NewUser::example().into();
        assert!(!user.is_admin);
        assert!(!user.has_voted);
        assert!(user.voted_candidate_ids.is_empty());
    }

    #[test]
    fn record_vote_keeps_flag_consistent_with_selections() {
        let mut user = User::example();
        user.record_vote(BTreeSet::from([3, 4]));
        assert!(user.has_voted);
        assert_eq!(user.voted_candidate_ids, BTreeSet::from([3, 4]));

        let mut untouched = User::example();
        untouched.record_vote(BTreeSet::new());
        assert!(!untouched.has_voted);
    }

    #[test]
    fn serialises_with_stable_field_names() {
        let user = User::example();
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("studentId").is_some());
        assert!(json.get("hasVoted").is_some());
        assert!(json.get("votedCandidateIds").is_some());
    }
}
