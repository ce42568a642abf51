use serde::{Deserialize, Serialize};

pub type CandidateId = u32;

/// Someone standing for a position, as stored under the `candidates` key.
///
/// Candidates come from the fixed seed list and are never added or removed
/// afterwards; `vote_count` only ever grows, by exactly one per accepted
/// ballot that selects this candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    pub department: String,
    pub position: String,
    pub vote_count: u32,
}

impl Candidate {
    /// Whether this candidate runs in the given department.
    /// Department names match case-insensitively.
    pub fn runs_in(&self, department: &str) -> bool {
        self.department.eq_ignore_ascii_case(department)
    }

    /// The initial candidate slate, installed once at store bootstrap.
    pub fn seed() -> Vec<Candidate> {
        let entries = [
            (1, "Aswith", "Computer Science", "President"),
            (2, "Bob Smith", "Computer Science", "Vice President"),
            (3, "Carol Brown", "Engineering", "President"),
            (4, "David Wilson", "Engineering", "Vice President"),
            (5, "Eva Davis", "Business", "President"),
            (6, "Frank Miller", "Business", "Vice President"),
        ];
        entries
            .into_iter()
            .map(|(id, name, department, position)| Candidate {
                id,
                name: name.to_string(),
                department: department.to_string(),
                position: position.to_string(),
                vote_count: 0,
            })
            .collect()
    }
}
