//! # studyhall-types
//!
//! Entity records and wire types for the Studyhall client.
//!
//! This crate provides the foundational types used across all Studyhall crates:
//! - [`DocumentId`], [`QuizId`], [`QuestionId`], [`ScheduleId`] - Typed identifiers
//! - [`Document`], [`Quiz`], [`Schedule`], [`UserProfile`] - Server-owned records
//! - [`Settings`], [`GeneratingQuiz`] - Client-owned state
//! - [`PageRequest`] - Pagination parameters

#![warn(missing_docs)]
#![warn(clippy::all)]

mod ids;
mod models;
mod page;

pub use ids::{DocumentId, QuestionId, QuizId, ScheduleId};
pub use models::{
    Document, GenerateQuizRequest, GeneratingQuiz, Question, Quiz, RegisterRequest, Schedule,
    ScheduleDraft, Settings, SummaryResponse, TokenResponse, UserProfile,
};
pub use page::PageRequest;
