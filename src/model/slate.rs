use serde::Serialize;

use crate::model::candidate::Candidate;

/// The candidates standing in one department, grouped by position.
///
/// Positions appear in seed-list first-seen order, and candidates keep their
/// seed order within a position; nothing here is ranked by votes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slate {
    department: String,
    groups: Vec<PositionGroup>,
}

/// One position and everyone standing for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionGroup {
    pub position: String,
    pub candidates: Vec<Candidate>,
}

impl Slate {
    /// Resolve the slate for a department (case-insensitive match).
    ///
    /// A department with no candidates yields an empty slate, which means
    /// there is simply nothing to vote for, not an error.
    pub fn resolve(candidates: &[Candidate], department: &str) -> Self {
        let mut groups: Vec<PositionGroup> = Vec::new();
        for candidate in candidates.iter().filter(|c| c.runs_in(department)) {
            match groups.iter_mut().find(|g| g.position == candidate.position) {
                Some(group) => group.candidates.push(candidate.clone()),
                None => groups.push(PositionGroup {
                    position: candidate.position.clone(),
                    candidates: vec![candidate.clone()],
                }),
            }
        }
        Self {
            department: department.to_string(),
            groups,
        }
    }

    pub fn department(&self) -> &str {
        &self.department
    }

    pub fn groups(&self) -> &[PositionGroup] {
        &self.groups
    }

    pub fn positions(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.position.as_str())
    }

    pub fn position_count(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::candidate::CandidateId;

    fn candidate(id: CandidateId, department: &str, position: &str) -> Candidate {
        Candidate {
            id,
            name: format!("Candidate {id}"),
            department: department.to_string(),
            position: position.to_string(),
            vote_count: 0,
        }
    }

    #[test]
    fn groups_by_position_in_first_seen_order() {
        let candidates = vec![
            candidate(1, "Engineering", "President"),
            candidate(2, "Engineering", "Vice President"),
            candidate(3, "Engineering", "President"),
            candidate(4, "Business", "President"),
        ];

        let slate = Slate::resolve(&candidates, "Engineering");
        assert_eq!(
            slate.positions().collect::<Vec<_>>(),
            vec!["President", "Vice President"]
        );
        let president_ids: Vec<_> = slate.groups()[0].candidates.iter().map(|c| c.id).collect();
        assert_eq!(president_ids, vec![1, 3]);
    }

    #[test]
    fn department_match_is_case_insensitive() {
        let candidates = vec![candidate(1, "Computer Science", "President")];
        let slate = Slate::resolve(&candidates, "computer science");
        assert_eq!(slate.position_count(), 1);
    }

    #[test]
    fn unknown_department_yields_empty_slate() {
        let slate = Slate::resolve(&Candidate::seed(), "Fine Arts");
        assert!(slate.is_empty());
        assert_eq!(slate.position_count(), 0);
    }
}
