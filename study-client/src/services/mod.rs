//! Fetch-through cache policies, one service per entity family.
//!
//! Each service pairs one store cell with the request client. Reads consult
//! the store first and only hit the network when the store is empty or the
//! caller forces a refresh; writes always go to the network first and only
//! mutate the store after success.
//!
//! # Concurrency
//!
//! The policy provides no mutual exclusion: two overlapping refreshing
//! reads can race and the store ends up holding whichever response resolves
//! last. Screens are expected to tolerate a late wholesale replace.

mod documents;
mod quizzes;
mod schedules;
mod users;

pub use documents::DocumentService;
pub use quizzes::QuizService;
pub use schedules::ScheduleService;
pub use users::UserService;

/// Where a list read was served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListSource {
    /// Served synchronously from the in-memory store; no network call.
    Store,
    /// Fetched from the network and written back into the store.
    Network,
}

/// Result of a fetch-through list read.
#[derive(Debug, Clone)]
pub struct ListOutcome<T> {
    /// The items visible to the caller after the read.
    pub items: Vec<T>,
    /// Where they came from.
    pub source: ListSource,
}

impl<T> ListOutcome<T> {
    pub(crate) fn from_store(items: Vec<T>) -> Self {
        Self {
            items,
            source: ListSource::Store,
        }
    }

    pub(crate) fn from_network(items: Vec<T>) -> Self {
        Self {
            items,
            source: ListSource::Network,
        }
    }
}
