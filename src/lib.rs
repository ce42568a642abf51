//! Election workflow engine for a browser-local student voting app.
//!
//! The UI screens (login, registration, voting, results) live outside this
//! crate; they call the [`workflow::ElectionWorkflow`] entry points and
//! render whatever comes back. Everything the screens share (registered
//! users, candidate tallies, and the voting end time) sits behind the
//! [`store::ElectionStore`] repository interface, with [`store::FileStore`]
//! standing in for browser local storage.
//!
//! Time comes from a [`clock::ClockSource`] that prefers a remote time
//! service and silently falls back to the device clock, and the
//! [`countdown`] module turns clock readings into the remaining-time
//! display. Periodic work (clock refresh, countdown ticks) runs as
//! cancellable [`scheduled_task::PeriodicTask`]s.

pub mod clock;
pub mod config;
pub mod countdown;
pub mod error;
pub mod logging;
pub mod model;
pub mod router;
pub mod scheduled_task;
pub mod store;
pub mod workflow;

pub use config::Config;
pub use error::{Error, Ineligibility, Result};
pub use workflow::{Eligibility, ElectionWorkflow};
