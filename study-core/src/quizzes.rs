//! Quiz store with generation placeholders.
//!
//! Quizzes carry one piece of state the other collections do not: while a
//! generation request is outstanding server-side (a multi-second operation),
//! the UI renders an "in progress" placeholder card. [`QuizStore`] keeps
//! those markers in a sequence decoupled from the quiz collection itself.

use crate::store::EntityStore;
use studyhall_types::{DocumentId, GeneratingQuiz, Question, Quiz, QuizId};

/// Entity store for quizzes plus the pending-generation markers.
#[derive(Debug, Clone, Default)]
pub struct QuizStore {
    quizzes: EntityStore<Quiz>,
    generating: Vec<GeneratingQuiz>,
}

impl QuizStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The underlying quiz collection.
    pub fn quizzes(&self) -> &EntityStore<Quiz> {
        &self.quizzes
    }

    /// Mutable access to the underlying quiz collection.
    pub fn quizzes_mut(&mut self) -> &mut EntityStore<Quiz> {
        &mut self.quizzes
    }

    /// Replace the questions of the quiz with the given id.
    ///
    /// A missing id is a silent no-op; the return value reports whether a
    /// quiz was updated.
    pub fn update_questions(&mut self, quiz_id: &QuizId, questions: Vec<Question>) -> bool {
        // Intentional no-op when absent: callers update unconditionally
        // after answering and the quiz may have been deleted meanwhile.
        match self.quizzes.get_mut(quiz_id) {
            Some(quiz) => {
                quiz.questions = questions;
                true
            }
            None => false,
        }
    }

    /// Record that a generation request for this document is in flight.
    pub fn add_generating(&mut self, marker: GeneratingQuiz) {
        self.generating.push(marker);
    }

    /// Drop the generation marker for this document.
    ///
    /// Called on completion, success or failure. Removing a marker that is
    /// not present is a silent no-op.
    pub fn remove_generating(&mut self, document_id: &DocumentId) -> bool {
        let before = self.generating.len();
        self.generating
            .retain(|marker| marker.document_id != *document_id);
        self.generating.len() != before
    }

    /// The pending-generation markers, in dispatch order.
    pub fn generating(&self) -> &[GeneratingQuiz] {
        &self.generating
    }

    /// Reset quizzes and markers. Used on logout and cache invalidation.
    pub fn clear(&mut self) {
        self.quizzes.clear();
        self.generating.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use studyhall_types::QuestionId;

    fn quiz(title: &str) -> Quiz {
        Quiz {
            id: QuizId::new(),
            document_id: DocumentId::new(),
            title: title.to_string(),
            questions: vec![],
            created_at: Utc::now(),
        }
    }

    fn question(prompt: &str) -> Question {
        Question {
            id: QuestionId::new(),
            prompt: prompt.to_string(),
            choices: vec!["yes".into(), "no".into()],
            answer_index: 0,
            explanation: None,
        }
    }

    fn marker(title: &str) -> GeneratingQuiz {
        GeneratingQuiz {
            document_id: DocumentId::new(),
            document_title: title.to_string(),
        }
    }

    #[test]
    fn update_questions_replaces_for_matching_quiz() {
        let mut store = QuizStore::new();
        let q = quiz("chapter 1");
        let quiz_id = q.id;
        store.quizzes_mut().set_all(vec![q]);

        let updated = store.update_questions(&quiz_id, vec![question("What is a vector?")]);

        assert!(updated);
        let quiz = &store.quizzes().items()[0];
        assert_eq!(quiz.questions.len(), 1);
        assert_eq!(quiz.questions[0].prompt, "What is a vector?");
    }

    #[test]
    fn update_questions_missing_id_is_silent_noop() {
        let mut store = QuizStore::new();
        store.quizzes_mut().set_all(vec![quiz("chapter 1")]);

        let updated = store.update_questions(&QuizId::new(), vec![question("?")]);

        assert!(!updated);
        assert!(store.quizzes().items()[0].questions.is_empty());
    }

    #[test]
    fn update_questions_leaves_other_quizzes_alone() {
        let mut store = QuizStore::new();
        let target = quiz("target");
        let target_id = target.id;
        store.quizzes_mut().set_all(vec![quiz("other"), target]);

        store.update_questions(&target_id, vec![question("?")]);

        assert!(store.quizzes().items()[0].questions.is_empty());
        assert_eq!(store.quizzes().items()[1].questions.len(), 1);
    }

    #[test]
    fn generating_markers_are_decoupled_from_quizzes() {
        let mut store = QuizStore::new();
        store.add_generating(marker("Notes"));

        assert_eq!(store.generating().len(), 1);
        assert!(store.quizzes().is_empty());
    }

    #[test]
    fn remove_generating_filters_by_document() {
        let mut store = QuizStore::new();
        let keep = marker("keep");
        let gone = marker("gone");
        let gone_doc = gone.document_id;
        store.add_generating(keep);
        store.add_generating(gone);

        assert!(store.remove_generating(&gone_doc));
        assert_eq!(store.generating().len(), 1);
        assert_eq!(store.generating()[0].document_title, "keep");
    }

    #[test]
    fn remove_generating_missing_is_noop() {
        let mut store = QuizStore::new();
        store.add_generating(marker("only"));

        assert!(!store.remove_generating(&DocumentId::new()));
        assert_eq!(store.generating().len(), 1);
    }

    #[test]
    fn clear_drops_quizzes_and_markers() {
        let mut store = QuizStore::new();
        store.quizzes_mut().set_all(vec![quiz("a")]);
        store.add_generating(marker("b"));

        store.clear();

        assert!(store.quizzes().is_empty());
        assert!(store.generating().is_empty());
    }
}
