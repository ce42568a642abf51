pub mod ballot;
pub mod candidate;
pub mod results;
pub mod slate;
pub mod user;

pub use ballot::Ballot;
pub use candidate::{Candidate, CandidateId};
pub use results::{ContestResult, ElectionResults, ParticipationStats, Standing};
pub use slate::{PositionGroup, Slate};
pub use user::{NewUser, User};
