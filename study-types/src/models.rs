//! Entity records exchanged with the Studyhall REST API.
//!
//! Server payloads use snake_case field names. The one exception is
//! [`Settings`], whose serialized form mirrors the legacy on-device storage
//! blob and therefore keeps its camelCase keys.

use crate::ids::{DocumentId, QuestionId, QuizId, ScheduleId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An uploaded study document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Server-assigned identifier.
    pub id: DocumentId,
    /// Display title.
    pub title: String,
    /// Original file name of the upload.
    pub file_name: String,
    /// Number of pages, when the server has extracted it.
    #[serde(default)]
    pub page_count: Option<u32>,
    /// Upload timestamp.
    pub created_at: DateTime<Utc>,
}

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Server-assigned identifier.
    pub id: QuestionId,
    /// The question text.
    pub prompt: String,
    /// Answer choices, in display order.
    pub choices: Vec<String>,
    /// Index into `choices` of the correct answer.
    pub answer_index: u32,
    /// Optional explanation shown after answering.
    #[serde(default)]
    pub explanation: Option<String>,
}

/// A quiz generated from a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    /// Server-assigned identifier.
    pub id: QuizId,
    /// The document this quiz was generated from.
    pub document_id: DocumentId,
    /// Display title.
    pub title: String,
    /// The questions, in display order.
    pub questions: Vec<Question>,
    /// Generation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Transient marker for a quiz generation that is still running server-side.
///
/// Not a quiz: this record exists only in client memory while the generate
/// request is outstanding, and is lost on process restart. The server is the
/// durable source of generation status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratingQuiz {
    /// The document being quizzed.
    pub document_id: DocumentId,
    /// Title to render on the placeholder card.
    pub document_title: String,
}

/// A study schedule entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Server-assigned identifier.
    pub id: ScheduleId,
    /// Display title.
    pub title: String,
    /// Quiz to launch when the entry fires, if any.
    #[serde(default)]
    pub quiz_id: Option<QuizId>,
    /// When the study session is planned.
    pub scheduled_for: DateTime<Utc>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Payload for creating or updating a schedule entry.
///
/// Identical to [`Schedule`] minus the server-assigned id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleDraft {
    /// Display title.
    pub title: String,
    /// Quiz to launch when the entry fires, if any.
    #[serde(default)]
    pub quiz_id: Option<QuizId>,
    /// When the study session is planned.
    pub scheduled_for: DateTime<Utc>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// The authenticated user, as returned by `GET /users/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Server-assigned identifier.
    pub id: String,
    /// Account email address.
    pub email: String,
    /// Display name.
    pub username: String,
    /// Preferred content language code (e.g. "en").
    pub language: String,
}

/// On-device user settings.
///
/// Serialized with the legacy storage keys so existing installs keep their
/// saved preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Default question count for quiz generation.
    #[serde(rename = "numberOfQuestions")]
    pub number_of_questions: u32,
    /// Daily study reminder time, "HH:MM".
    #[serde(rename = "notifyTime")]
    pub notify_time: String,
    /// Preferred content language code.
    pub language: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            number_of_questions: 5,
            notify_time: "09:00".to_string(),
            language: "en".to_string(),
        }
    }
}

/// OAuth2 password-grant token response from `POST /token`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    /// The bearer token.
    pub access_token: String,
    /// Token type, always "bearer" for this API.
    pub token_type: String,
}

/// Payload for `POST /register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Account email address.
    pub email: String,
    /// Display name.
    pub username: String,
    /// Plain password; sent over TLS only.
    pub password: String,
}

/// Payload for `POST /quizzes/generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateQuizRequest {
    /// The document to generate from.
    pub document_id: DocumentId,
    /// How many questions to generate.
    pub num_questions: u32,
}

/// Response from `POST /documents/:id/summary`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResponse {
    /// The generated summary text.
    pub summary: String,
}
