use serde::Serialize;

use crate::model::{candidate::Candidate, user::User};

/// Standings for every (department, position) contest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElectionResults {
    /// Votes cast across the whole election; the denominator for every
    /// percentage shown, not a per-contest count.
    pub total_votes: u32,
    pub contests: Vec<ContestResult>,
}

/// One contest: a department/position pair and its ranked candidates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContestResult {
    pub department: String,
    pub position: String,
    pub standings: Vec<Standing>,
}

/// A candidate's result within a contest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standing {
    pub candidate: Candidate,
    /// Share of `total_votes`, 0 when no votes have been cast at all.
    pub percentage: f64,
    /// Leads the contest with at least one vote. Ties mark every leader.
    pub is_winner: bool,
}

impl ElectionResults {
    /// Tabulate standings from the current candidate tallies.
    ///
    /// Contests keep first-seen order; within a contest candidates are
    /// sorted by votes descending, with the stable sort preserving seed
    /// order between equals.
    pub fn tabulate(candidates: &[Candidate]) -> Self {
        let total_votes: u32 = candidates.iter().map(|c| c.vote_count).sum();

        let mut contests: Vec<ContestResult> = Vec::new();
        for candidate in candidates {
            let standing = Standing {
                percentage: percentage(candidate.vote_count, total_votes),
                is_winner: false,
                candidate: candidate.clone(),
            };
            match contests.iter_mut().find(|contest| {
                contest.department == candidate.department && contest.position == candidate.position
            }) {
                Some(contest) => contest.standings.push(standing),
                None => contests.push(ContestResult {
                    department: candidate.department.clone(),
                    position: candidate.position.clone(),
                    standings: vec![standing],
                }),
            }
        }

        for contest in &mut contests {
            contest
                .standings
                .sort_by(|a, b| b.candidate.vote_count.cmp(&a.candidate.vote_count));
            let max = contest
                .standings
                .iter()
                .map(|s| s.candidate.vote_count)
                .max()
                .unwrap_or(0);
            for standing in &mut contest.standings {
                standing.is_winner = max > 0 && standing.candidate.vote_count == max;
            }
        }

        Self {
            total_votes,
            contests,
        }
    }
}

fn percentage(votes: u32, total: u32) -> f64 {
    if total > 0 {
        f64::from(votes) / f64::from(total) * 100.0
    } else {
        0.0
    }
}

/// Participation numbers for the admin dashboard.
/// Admin accounts count neither as registered nor as voted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticipationStats {
    pub total_students: u32,
    pub voted_students: u32,
    pub rate_percent: f64,
}

impl ParticipationStats {
    pub fn from_users(users: &[User]) -> Self {
        let students = users.iter().filter(|u| !u.is_admin);
        let total_students = students.clone().count() as u32;
        let voted_students = students.filter(|u| u.has_voted).count() as u32;
        Self {
            total_students,
            voted_students,
            rate_percent: percentage(voted_students, total_students),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::BTreeSet;

    use crate::model::{candidate::CandidateId, user::NewUser};

    fn candidate(id: CandidateId, department: &str, position: &str, votes: u32) -> Candidate {
        Candidate {
            id,
            name: format!("Candidate {id}"),
            department: department.to_string(),
            position: position.to_string(),
            vote_count: votes,
        }
    }

    #[test]
    fn ties_mark_every_leader_as_winner() {
        let candidates = vec![
            candidate(1, "Engineering", "President", 3),
            candidate(2, "Engineering", "President", 3),
            candidate(3, "Engineering", "President", 0),
        ];
        let results = ElectionResults::tabulate(&candidates);
        let standings = &results.contests[0].standings;
        assert!(standings[0].is_winner);
        assert!(standings[1].is_winner);
        assert!(!standings[2].is_winner);
    }

    #[test]
    fn contest_with_no_votes_has_no_winner() {
        let candidates = vec![
            candidate(1, "Business", "President", 0),
            candidate(2, "Business", "President", 0),
        ];
        let results = ElectionResults::tabulate(&candidates);
        assert!(results.contests[0].standings.iter().all(|s| !s.is_winner));
        assert_eq!(results.total_votes, 0);
        assert!(results.contests[0].standings.iter().all(|s| s.percentage == 0.0));
    }

    #[test]
    fn sorts_by_votes_descending_and_keeps_seed_order_between_equals() {
        let candidates = vec![
            candidate(1, "Engineering", "President", 1),
            candidate(2, "Engineering", "President", 4),
            candidate(3, "Engineering", "President", 1),
        ];
        let results = ElectionResults::tabulate(&candidates);
        let order: Vec<_> = results.contests[0]
            .standings
            .iter()
            .map(|s| s.candidate.id)
            .collect();
        assert_eq!(order, vec![2, 1, 3]);
    }

    #[test]
    fn percentages_share_a_global_denominator() {
        let candidates = vec![
            candidate(1, "Engineering", "President", 3),
            candidate(2, "Engineering", "Vice President", 1),
            candidate(3, "Business", "President", 1),
        ];
        let results = ElectionResults::tabulate(&candidates);
        assert_eq!(results.total_votes, 5);

        let all: Vec<&Standing> = results
            .contests
            .iter()
            .flat_map(|c| c.standings.iter())
            .collect();
        let sum: f64 = all.iter().map(|s| s.percentage).sum();
        assert!((sum - 100.0).abs() < 1e-9);
        assert!((all[0].percentage - 60.0).abs() < 1e-9);
    }

    #[test]
    fn single_contest_percentages_sum_to_exactly_one_hundred() {
        let candidates = vec![
            candidate(1, "Engineering", "President", 2),
            candidate(2, "Engineering", "President", 2),
        ];
        let results = ElectionResults::tabulate(&candidates);
        let sum: f64 = results.contests[0]
            .standings
            .iter()
            .map(|s| s.percentage)
            .sum();
        assert!((sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn contests_keep_first_seen_order() {
        let results = ElectionResults::tabulate(&Candidate::seed());
        let keys: Vec<_> = results
            .contests
            .iter()
            .map(|c| (c.department.as_str(), c.position.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("Computer Science", "President"),
                ("Computer Science", "Vice President"),
                ("Engineering", "President"),
                ("Engineering", "Vice President"),
                ("Business", "President"),
                ("Business", "Vice President"),
            ]
        );
    }

    #[test]
    fn participation_excludes_admin_accounts() {
        let mut voted = User::example();
        voted.record_vote(BTreeSet::from([3, 4]));
        let users = vec![User::example_admin(), voted, NewUser::example2().into()];

        let stats = ParticipationStats::from_users(&users);
        assert_eq!(stats.total_students, 2);
        assert_eq!(stats.voted_students, 1);
        assert!((stats.rate_percent - 50.0).abs() < 1e-9);
    }
}
