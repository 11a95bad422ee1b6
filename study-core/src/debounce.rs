//! Search debounce state machine.
//!
//! This module provides a pure, side-effect-free state machine that collapses
//! rapid search keystrokes into a single dispatched call. The machine takes
//! inputs and produces a new state plus a list of actions to execute.
//!
//! The actual timer (a cancellable `tokio` sleep) lives in `studyhall-client`,
//! not here. This enables instant unit testing without time control.
//!
//! Timer identity is a generation counter: every keystroke bumps the
//! generation, and a fired timer carries the generation it was started with.
//! A fire whose generation no longer matches the pending one is stale and
//! produces no actions. The counter is monotone across the machine's whole
//! life, not per search cycle, so a timer armed in an earlier cycle can
//! never collide with a later one.

/// Debounce state - NO timers, just transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchState {
    /// No search pending. `generation` is the last one handed out.
    Idle {
        /// High-water mark of the generation counter.
        generation: u64,
    },
    /// A keystroke was seen; a timer for `generation` is running.
    Pending {
        /// Identity of the currently armed timer.
        generation: u64,
        /// The query text as of the last keystroke.
        query: String,
    },
}

impl SearchState {
    /// Create a new machine in the Idle state.
    pub fn new() -> Self {
        Self::Idle { generation: 0 }
    }

    /// Process an input and return the new state plus actions to execute.
    ///
    /// This is a pure function - the caller (the dispatcher in
    /// `studyhall-client`) is responsible for starting and cancelling the
    /// real timer and for issuing the network call.
    pub fn on_input(self, input: SearchInput) -> (Self, Vec<SearchAction>) {
        match (self, input) {
            // First keystroke of a cycle arms a timer, continuing the
            // counter from wherever the previous cycle left it.
            (Self::Idle { generation }, SearchInput::QueryChanged { query }) => {
                let next = generation.wrapping_add(1);
                (
                    Self::Pending {
                        generation: next,
                        query,
                    },
                    vec![SearchAction::StartTimer { generation: next }],
                )
            }

            // Another keystroke within the window: cancel and re-arm.
            // Only the last keystroke in the window ever dispatches.
            (Self::Pending { generation, .. }, SearchInput::QueryChanged { query }) => {
                let next = generation.wrapping_add(1);
                (
                    Self::Pending {
                        generation: next,
                        query,
                    },
                    vec![
                        SearchAction::CancelTimer,
                        SearchAction::StartTimer { generation: next },
                    ],
                )
            }

            // The armed timer fired: dispatch and go idle. An empty query
            // reverts to the paginated list path, not the search endpoint.
            (
                Self::Pending { generation, query },
                SearchInput::TimerFired {
                    generation: fired_generation,
                },
            ) if generation == fired_generation => {
                let action = if query.trim().is_empty() {
                    SearchAction::ListAll
                } else {
                    SearchAction::Search { query }
                };
                (Self::Idle { generation }, vec![action])
            }

            // A stale timer fired after being superseded: ignore it.
            (state @ Self::Pending { .. }, SearchInput::TimerFired { .. }) => (state, vec![]),

            // Owner going away: any armed timer must be cancelled so the
            // callback never runs into a dead consumer.
            (Self::Pending { generation, .. }, SearchInput::Teardown) => (
                Self::Idle { generation },
                vec![SearchAction::CancelTimer],
            ),

            // Inputs with nothing to do in the current state.
            (state, _) => (state, vec![]),
        }
    }

    /// Whether a search is pending dispatch.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }
}

impl Default for SearchState {
    fn default() -> Self {
        Self::new()
    }
}

/// Inputs to the debounce machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchInput {
    /// The search field content changed.
    QueryChanged {
        /// The full current field content.
        query: String,
    },
    /// The timer armed for `generation` elapsed.
    TimerFired {
        /// Generation the timer was started with.
        generation: u64,
    },
    /// The owning screen is being torn down.
    Teardown,
}

/// Actions to be executed by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchAction {
    /// Arm the debounce timer with this generation.
    StartTimer {
        /// Generation to report back in [`SearchInput::TimerFired`].
        generation: u64,
    },
    /// Cancel the armed timer.
    CancelTimer,
    /// Issue the remote title search with the settled query.
    Search {
        /// The settled, non-empty query.
        query: String,
    },
    /// The field settled empty: go back to the paginated list read.
    ListAll,
}
