//! Application-scoped state context.

use crate::cell::StoreCell;
use studyhall_core::{EntityStore, QuizStore, SessionState};
use studyhall_types::{Document, Schedule, Settings};

/// One store cell per entity family, created once at process start and
/// injected into the services and the UI layer.
///
/// Stores live for the whole process; nothing here is persisted or expired.
/// Cloning the context clones the cells, which share state - every consumer
/// sees the same stores.
#[derive(Debug, Clone, Default)]
pub struct AppContext {
    /// Cached document collection.
    pub documents: StoreCell<EntityStore<Document>>,
    /// Cached quizzes plus generation placeholders.
    pub quizzes: StoreCell<QuizStore>,
    /// Cached schedule entries.
    pub schedules: StoreCell<EntityStore<Schedule>>,
    /// Auth/session state. Re-read by the request client on every request.
    pub session: StoreCell<SessionState>,
    /// On-device user settings.
    pub settings: StoreCell<Settings>,
}

impl AppContext {
    /// Create a context with empty stores and default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear everything tied to the logged-in user.
    ///
    /// Settings are device preferences and survive logout.
    pub fn clear_on_logout(&self) {
        self.documents.mutate(|store| store.clear());
        self.quizzes.mutate(|store| store.clear());
        self.schedules.mutate(|store| store.clear());
        self.session.mutate(|session| session.clear());
    }
}
