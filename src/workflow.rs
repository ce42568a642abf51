use std::sync::Arc;

use log::{info, warn};

use crate::{
    clock::ClockSource,
    config::Config,
    countdown::{CountdownStatus, ElectionWindow},
    error::{Error, Ineligibility, Result},
    model::{
        ballot::Ballot,
        candidate::Candidate,
        results::{ElectionResults, ParticipationStats},
        slate::Slate,
        user::{NewUser, User},
    },
    scheduled_task::PeriodicTask,
    store::{ElectionStore, StoreError},
};

/// Student ID of the bootstrap admin account. The login screen owns the
/// credential check; the stored hash is opaque to this crate.
const DEFAULT_ADMIN_ID: &str = "ADMIN001";

/// Whether a user may vote right now.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Eligibility {
    Eligible,
    AlreadyVoted,
    WindowClosed,
    /// Admin accounts never vote, whatever the window says.
    NotEligible,
}

impl Eligibility {
    /// The refusal behind a non-`Eligible` answer.
    pub fn refusal(self) -> Option<Ineligibility> {
        match self {
            Self::Eligible => None,
            Self::AlreadyVoted => Some(Ineligibility::AlreadyVoted),
            Self::WindowClosed => Some(Ineligibility::WindowClosed),
            Self::NotEligible => Some(Ineligibility::NotEligible),
        }
    }
}

/// The election workflow: eligibility, slates, ballot submission, results,
/// and the admin window controls, all over an injected [`ElectionStore`].
///
/// The login, registration and voting screens sit outside this crate; they
/// hand over validated records and render whatever these entry points return.
pub struct ElectionWorkflow<S> {
    store: S,
    clock: Arc<ClockSource>,
    config: Config,
}

impl<S: ElectionStore> ElectionWorkflow<S> {
    pub fn new(store: S, clock: Arc<ClockSource>, config: Config) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// One-time store bootstrap: the candidate slate, the default admin
    /// account, and the voting end time. Idempotent; reruns touch nothing
    /// that already exists and never reset tallies or cast votes.
    pub fn initialize(&self) -> Result<()> {
        if self.store.init_candidates(Candidate::seed())? {
            info!("Installed the initial candidate slate");
        }

        if self.store.user(DEFAULT_ADMIN_ID)?.is_none() {
            self.store.insert_user(default_admin())?;
            info!("Created the default admin account {DEFAULT_ADMIN_ID}");
        }

        let end = self.clock.now() + self.config.voting_duration();
        if self.store.init_voting_end_time(end)? {
            info!("Voting window opened, ends at {end}");
        }

        Ok(())
    }

    /// Store a freshly registered user. The registration form has already
    /// validated the fields; only student ID uniqueness is enforced here.
    pub fn register_user(&self, new_user: NewUser) -> Result<User> {
        let user: User = new_user.into();
        match self.store.insert_user(user.clone()) {
            Ok(()) => {
                info!("Registered student {}", user.student_id);
                Ok(user)
            }
            Err(StoreError::DuplicateStudentId(id)) => Err(Error::Validation(format!(
                "student id already registered: {id}"
            ))),
            Err(err) => Err(err.into()),
        }
    }

    /// Look up a user by student ID.
    pub fn user(&self, student_id: &str) -> Result<User> {
        self.store
            .user(student_id)?
            .ok_or_else(|| Error::not_found(format!("user {student_id}")))
    }

    /// The current voting window.
    pub fn window(&self) -> Result<ElectionWindow> {
        let end = self
            .store
            .voting_end_time()?
            .ok_or_else(|| Error::not_found("voting window"))?;
        Ok(ElectionWindow::new(end))
    }

    /// Countdown snapshot of the current window under the workflow clock.
    pub fn countdown(&self) -> Result<CountdownStatus> {
        Ok(self.window()?.status(self.clock.now()))
    }

    /// Whether the user may vote right now. Pure query, changes nothing.
    pub fn check_eligibility(&self, user: &User) -> Result<Eligibility> {
        if user.is_admin {
            return Ok(Eligibility::NotEligible);
        }
        if user.has_voted {
            return Ok(Eligibility::AlreadyVoted);
        }
        if !self.window()?.is_open(self.clock.now()) {
            return Ok(Eligibility::WindowClosed);
        }
        Ok(Eligibility::Eligible)
    }

    /// The candidates a department votes on, grouped by position.
    pub fn slate(&self, department: &str) -> Result<Slate> {
        Ok(Slate::resolve(&self.store.candidates()?, department))
    }

    /// Accept or refuse a proposed ballot.
    ///
    /// Checks run in order, failing fast: eligibility, then completeness and
    /// candidate ownership against the voter's own department slate. Only
    /// then does the store commit the tallies and the voter flag together.
    /// The store re-checks the already-voted guard inside that commit, so a
    /// racing duplicate can never double-count.
    pub fn submit_ballot(&self, student_id: &str, ballot: &Ballot) -> Result<User> {
        let user = self.user(student_id)?;

        if let Some(refusal) = self.check_eligibility(&user)?.refusal() {
            return Err(Error::Ineligible(refusal));
        }

        let slate = self.slate(&user.department)?;
        ballot.validate(&slate)?;

        let selected = ballot.candidate_ids();
        let updated = match self.store.record_ballot(student_id, &selected) {
            Ok(updated) => updated,
            Err(StoreError::AlreadyVoted(_)) => {
                return Err(Error::Ineligible(Ineligibility::AlreadyVoted));
            }
            Err(err) => return Err(err.into()),
        };

        info!(
            "Recorded ballot from {student_id}: {} selection(s)",
            selected.len()
        );
        Ok(updated)
    }

    /// Full standings. Admin-only; everyone else is refused here, not merely
    /// hidden in the UI.
    pub fn results(&self, caller: &User) -> Result<ElectionResults> {
        self.require_admin(caller, "election results")?;
        Ok(ElectionResults::tabulate(&self.store.candidates()?))
    }

    /// Participation numbers for the admin dashboard.
    pub fn participation(&self, caller: &User) -> Result<ParticipationStats> {
        self.require_admin(caller, "participation statistics")?;
        Ok(ParticipationStats::from_users(&self.store.users()?))
    }

    /// Close the voting window immediately. Repeating this keeps it closed;
    /// cast votes and tallies are untouched.
    pub fn end_voting_now(&self, caller: &User) -> Result<ElectionWindow> {
        self.require_admin(caller, "voting window controls")?;
        let end = self.clock.now();
        self.store.set_voting_end_time(end)?;
        warn!("Voting ended by {} at {end}", caller.student_id);
        Ok(ElectionWindow::new(end))
    }

    /// Reopen the voting window for the configured duration.
    pub fn restart_voting(&self, caller: &User) -> Result<ElectionWindow> {
        self.require_admin(caller, "voting window controls")?;
        let end = self.clock.now() + self.config.voting_duration();
        self.store.set_voting_end_time(end)?;
        info!("Voting restarted by {}, ends at {end}", caller.student_id);
        Ok(ElectionWindow::new(end))
    }

    /// Keep the remote clock reading fresh until the task is cancelled.
    pub fn spawn_clock_refresh(&self) -> PeriodicTask {
        Arc::clone(&self.clock).spawn_refresh(self.config.time_refresh_interval())
    }

    fn require_admin(&self, user: &User, what: &str) -> Result<()> {
        if user.is_admin {
            Ok(())
        } else {
            Err(Error::Unauthorized(format!(
                "only administrators may access {what}"
            )))
        }
    }
}

impl<S> ElectionWorkflow<S>
where
    S: ElectionStore + 'static,
{
    /// Re-evaluate the countdown once per second while a countdown is on
    /// screen; cancel the returned task when the view is torn down.
    pub fn spawn_countdown_ticker<F>(self: Arc<Self>, mut on_tick: F) -> PeriodicTask
    where
        F: FnMut(CountdownStatus) + Send + 'static,
    {
        PeriodicTask::spawn(std::time::Duration::from_secs(1), move || {
            if let Ok(status) = self.countdown() {
                on_tick(status);
            }
            std::future::ready(())
        })
    }
}

fn default_admin() -> User {
    User {
        student_id: DEFAULT_ADMIN_ID.to_string(),
        name: "System Administrator".to_string(),
        email: "admin@university.example".to_string(),
        password_hash: "admin123".to_string(),
        department: "Administration".to_string(),
        is_admin: true,
        has_voted: false,
        voted_candidate_ids: Default::default(),
    }
}
