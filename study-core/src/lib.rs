//! # studyhall-core
//!
//! Pure client-state logic for Studyhall (no I/O, instant tests).
//!
//! This crate implements the entity stores and the search debounce state
//! machine without any network or disk I/O.
//!
//! ## Design Philosophy
//!
//! All modules in this crate are **pure** - they take input and produce output
//! without side effects. This enables:
//! - Instant unit tests (no mocks, no async)
//! - Deterministic behavior (same input → same output)
//! - Easy reasoning about state transitions
//!
//! The actual I/O (HTTP requests, the debounce timer, settings persistence)
//! is performed by `studyhall-client`, which drives these types.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod debounce;
pub mod quizzes;
pub mod session;
pub mod store;

pub use debounce::{SearchAction, SearchInput, SearchState};
pub use quizzes::QuizStore;
pub use session::{merge_settings, SessionState};
pub use store::{EntityStore, Keyed};
