//! Fetch-through cache policy for quizzes, including generation markers.

use crate::cell::StoreCell;
use crate::client::ApiClient;
use crate::error::ClientError;
use crate::services::ListOutcome;
use crate::transport::{ApiRequest, HttpTransport};
use std::sync::Arc;
use studyhall_core::QuizStore;
use studyhall_types::{
    DocumentId, GenerateQuizRequest, GeneratingQuiz, PageRequest, Question, Quiz, QuizId,
};

/// Quizzes: paginated fetch-through reads plus the generation flow.
pub struct QuizService<T: HttpTransport> {
    client: Arc<ApiClient<T>>,
    quizzes: StoreCell<QuizStore>,
}

impl<T: HttpTransport> QuizService<T> {
    /// Create the service over a client and the quiz store cell.
    pub fn new(client: Arc<ApiClient<T>>, quizzes: StoreCell<QuizStore>) -> Self {
        Self { client, quizzes }
    }

    /// Read a page of quizzes. Same policy as documents: first page from
    /// the store when populated, later pages appended, refresh replaces.
    pub async fn fetch_list(
        &self,
        page: PageRequest,
        refresh: bool,
    ) -> Result<ListOutcome<Quiz>, ClientError> {
        if !refresh && page.is_first() {
            let cached = self.quizzes.read(|store| {
                if store.quizzes().is_empty() {
                    None
                } else {
                    Some(store.quizzes().items().to_vec())
                }
            });
            if let Some(items) = cached {
                return Ok(ListOutcome::from_store(items));
            }
        }

        let request = ApiRequest::get("quizzes.list", "/quizzes").with_query(page.query_pairs());
        let items: Vec<Quiz> = self.client.send_json(request).await?;

        self.quizzes.mutate(|store| {
            if page.is_first() {
                store.quizzes_mut().set_all(items.clone());
            } else {
                store.quizzes_mut().append_page(items.clone());
            }
        });
        Ok(ListOutcome::from_network(items))
    }

    /// Fetch a single quiz by id. Always a network read.
    pub async fn get(&self, id: QuizId) -> Result<Quiz, ClientError> {
        let request = ApiRequest::get("quizzes.get", format!("/quizzes/{id}"));
        self.client.send_json(request).await
    }

    /// Search quizzes by title. Always a network read.
    pub async fn search_by_title(&self, query: &str) -> Result<Vec<Quiz>, ClientError> {
        let request = ApiRequest::get("quizzes.search", "/quizzes/search")
            .with_query(vec![("q".to_string(), query.to_string())]);
        self.client.send_json(request).await
    }

    /// Generate a quiz from a document.
    ///
    /// Generation runs for multiple seconds server-side with no
    /// intermediate state to cache, so this is the one optimistic mutation
    /// in the client: a [`GeneratingQuiz`] marker is added before dispatch
    /// and removed on completion either way. The marker's presence is the
    /// only user-visible feedback during the generation window.
    pub async fn generate(
        &self,
        document_id: DocumentId,
        document_title: &str,
        num_questions: u32,
    ) -> Result<Quiz, ClientError> {
        self.quizzes.mutate(|store| {
            store.add_generating(GeneratingQuiz {
                document_id,
                document_title: document_title.to_string(),
            })
        });

        let body = GenerateQuizRequest {
            document_id,
            num_questions,
        };
        let request = ApiRequest::post("quizzes.generate", "/quizzes/generate")
            .with_json(serde_json::to_value(&body).map_err(|e| ClientError::Decode(e.to_string()))?);

        match self.client.send_json::<Quiz>(request).await {
            Ok(quiz) => {
                self.quizzes.mutate(|store| {
                    store.remove_generating(&document_id);
                    store.quizzes_mut().add(quiz.clone());
                });
                Ok(quiz)
            }
            Err(err) => {
                self.quizzes
                    .mutate(|store| store.remove_generating(&document_id));
                Err(err)
            }
        }
    }

    /// Replace a quiz's questions in the local store.
    ///
    /// Local-only; a missing quiz id is a silent no-op.
    pub fn update_questions(&self, quiz_id: QuizId, questions: Vec<Question>) -> bool {
        self.quizzes
            .mutate(|store| store.update_questions(&quiz_id, questions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::services::ListSource;
    use crate::session::MemoryStorage;
    use crate::transport::MockTransport;
    use chrono::Utc;
    use studyhall_core::SessionState;

    fn quiz(title: &str) -> Quiz {
        Quiz {
            id: QuizId::new(),
            document_id: DocumentId::new(),
            title: title.to_string(),
            questions: vec![],
            created_at: Utc::now(),
        }
    }

    fn service(transport: &MockTransport) -> QuizService<MockTransport> {
        let client = Arc::new(ApiClient::new(
            ClientConfig::new("https://api.test"),
            transport.clone(),
            StoreCell::new(SessionState::new()),
            Arc::new(MemoryStorage::new()),
        ));
        QuizService::new(client, StoreCell::default())
    }

    // ===========================================
    // Fetch-Through Tests
    // ===========================================

    #[tokio::test]
    async fn populated_store_serves_first_page() {
        let transport = MockTransport::new();
        transport.queue_json(200, &vec![quiz("a")]);
        let service = service(&transport);

        service
            .fetch_list(PageRequest::first(20), false)
            .await
            .unwrap();
        let second = service
            .fetch_list(PageRequest::first(20), false)
            .await
            .unwrap();

        assert_eq!(second.source, ListSource::Store);
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn refresh_replaces_quiz_collection() {
        let transport = MockTransport::new();
        transport.queue_json(200, &vec![quiz("old")]);
        transport.queue_json(200, &vec![quiz("new-1"), quiz("new-2")]);
        let service = service(&transport);

        service
            .fetch_list(PageRequest::first(20), false)
            .await
            .unwrap();
        service
            .fetch_list(PageRequest::first(20), true)
            .await
            .unwrap();

        let titles = service.quizzes.read(|s| {
            s.quizzes()
                .items()
                .iter()
                .map(|q| q.title.clone())
                .collect::<Vec<_>>()
        });
        assert_eq!(titles, vec!["new-1", "new-2"]);
    }

    // ===========================================
    // Generation Marker Tests
    // ===========================================

    #[tokio::test]
    async fn generate_success_swaps_marker_for_quiz() {
        let transport = MockTransport::new();
        let document_id = DocumentId::new();
        let mut generated = quiz("generated");
        generated.document_id = document_id;
        transport.queue_json(200, &generated);
        let service = service(&transport);

        let result = service.generate(document_id, "My Notes", 5).await.unwrap();

        assert_eq!(result.id, generated.id);
        assert!(service.quizzes.read(|s| s.generating().is_empty()));
        assert_eq!(service.quizzes.read(|s| s.quizzes().len()), 1);
    }

    #[tokio::test]
    async fn generate_failure_removes_marker_and_adds_nothing() {
        let transport = MockTransport::new();
        transport.queue_status(500);
        let service = service(&transport);
        let document_id = DocumentId::new();

        let err = service.generate(document_id, "My Notes", 5).await.unwrap_err();

        assert!(matches!(err, ClientError::Status { status: 500, .. }));
        assert!(service.quizzes.read(|s| s.generating().is_empty()));
        assert!(service.quizzes.read(|s| s.quizzes().is_empty()));
    }

    #[tokio::test]
    async fn generate_request_carries_document_and_count() {
        let transport = MockTransport::new();
        let document_id = DocumentId::new();
        let mut generated = quiz("g");
        generated.document_id = document_id;
        transport.queue_json(200, &generated);
        let service = service(&transport);

        service.generate(document_id, "Title", 8).await.unwrap();

        let sent = transport.last_request().unwrap();
        assert_eq!(sent.path, "/quizzes/generate");
        match &sent.body {
            crate::transport::RequestBody::Json(value) => {
                assert_eq!(value["document_id"], document_id.to_string());
                assert_eq!(value["num_questions"], 8);
            }
            other => panic!("expected JSON body, got {other:?}"),
        }
    }

    // ===========================================
    // Local Update Tests
    // ===========================================

    #[tokio::test]
    async fn update_questions_is_local_only() {
        let transport = MockTransport::new();
        transport.queue_json(200, &vec![quiz("q")]);
        let service = service(&transport);
        service
            .fetch_list(PageRequest::first(20), false)
            .await
            .unwrap();
        let quiz_id = service.quizzes.read(|s| s.quizzes().items()[0].id);

        let updated = service.update_questions(
            quiz_id,
            vec![Question {
                id: studyhall_types::QuestionId::new(),
                prompt: "?".to_string(),
                choices: vec!["a".to_string()],
                answer_index: 0,
                explanation: None,
            }],
        );

        assert!(updated);
        // No extra network traffic beyond the initial list fetch.
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn update_questions_missing_quiz_is_noop() {
        let transport = MockTransport::new();
        let service = service(&transport);

        assert!(!service.update_questions(QuizId::new(), vec![]));
    }
}
