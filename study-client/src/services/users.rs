//! Authentication, profile, and settings operations.
//!
//! Holds the whole [`AppContext`] rather than a single store cell because
//! its operations cut across state families: login writes session state,
//! a language change invalidates the document and quiz caches, logout
//! clears everything user-scoped.

use crate::client::ApiClient;
use crate::context::AppContext;
use crate::error::ClientError;
use crate::session::{clear_persisted_session, persist_settings, StoragePort, PROFILE_KEY, TOKEN_KEY};
use crate::transport::{ApiRequest, HttpTransport};
use std::sync::Arc;
use studyhall_types::{RegisterRequest, TokenResponse, UserProfile};

/// Auth and account: login, register, profile, preferences, logout.
pub struct UserService<T: HttpTransport> {
    client: Arc<ApiClient<T>>,
    ctx: AppContext,
    storage: Arc<dyn StoragePort>,
}

impl<T: HttpTransport> UserService<T> {
    /// Create the service over a client, the shared context, and storage.
    pub fn new(client: Arc<ApiClient<T>>, ctx: AppContext, storage: Arc<dyn StoragePort>) -> Self {
        Self {
            client,
            ctx,
            storage,
        }
    }

    /// Log in with the OAuth2 password grant.
    ///
    /// On success the token is installed in the session before the profile
    /// fetch, so that fetch (and everything after it) is authenticated.
    /// Token and profile are persisted for [`restore_session`] at the next
    /// process start.
    ///
    /// [`restore_session`]: crate::session::restore_session
    pub async fn login(&self, username: &str, password: &str) -> Result<UserProfile, ClientError> {
        let request = ApiRequest::post("auth.token", "/token").with_form(vec![
            ("grant_type".to_string(), "password".to_string()),
            ("username".to_string(), username.to_string()),
            ("password".to_string(), password.to_string()),
        ]);
        let token: TokenResponse = self.client.send_json(request).await?;

        self.ctx
            .session
            .mutate(|session| session.set_token(token.access_token.clone()));
        self.storage
            .set(TOKEN_KEY, &token.access_token)
            .await
            .map_err(|e| ClientError::Storage(e.to_string()))?;

        let profile = self.me().await?;
        Ok(profile)
    }

    /// Create an account. Does not log in; callers chain [`login`] after.
    ///
    /// [`login`]: UserService::login
    pub async fn register(&self, registration: &RegisterRequest) -> Result<(), ClientError> {
        let body =
            serde_json::to_value(registration).map_err(|e| ClientError::Decode(e.to_string()))?;
        let request = ApiRequest::post("auth.register", "/register").with_json(body);
        self.client.send(request).await?;
        Ok(())
    }

    /// Fetch the authenticated profile and install it in the session.
    pub async fn me(&self) -> Result<UserProfile, ClientError> {
        let request = ApiRequest::get("users.me", "/users/me");
        let profile: UserProfile = self.client.send_json(request).await?;

        self.ctx
            .session
            .mutate(|session| session.set_profile(profile.clone()));
        let raw =
            serde_json::to_string(&profile).map_err(|e| ClientError::Decode(e.to_string()))?;
        self.storage
            .set(PROFILE_KEY, &raw)
            .await
            .map_err(|e| ClientError::Storage(e.to_string()))?;
        Ok(profile)
    }

    /// Change the content language, server-side first.
    ///
    /// Documents and quizzes are server-rendered in the account language, so
    /// a successful change empties both caches; the next list read refetches
    /// in the new language. Schedules are language-independent and keep
    /// their cache.
    pub async fn change_language(&self, language: &str) -> Result<(), ClientError> {
        let request = ApiRequest::put("users.language", "/users/me/language")
            .with_query(vec![("language".to_string(), language.to_string())]);
        self.client.send(request).await?;

        self.ctx.settings.mutate(|settings| {
            settings.language = language.to_string();
        });
        persist_settings(&self.ctx.settings, self.storage.as_ref())
            .await
            .map_err(|e| ClientError::Storage(e.to_string()))?;

        self.ctx.session.mutate(|session| {
            if let Some(profile) = session.profile().cloned() {
                session.set_profile(UserProfile {
                    language: language.to_string(),
                    ..profile
                });
            }
        });

        self.ctx.documents.mutate(|store| store.clear());
        self.ctx.quizzes.mutate(|store| store.clear());
        Ok(())
    }

    /// Change the default question count for quiz generation. Local only.
    pub async fn set_number_of_questions(&self, count: u32) -> Result<(), ClientError> {
        self.ctx
            .settings
            .mutate(|settings| settings.number_of_questions = count);
        persist_settings(&self.ctx.settings, self.storage.as_ref())
            .await
            .map_err(|e| ClientError::Storage(e.to_string()))
    }

    /// Change the daily reminder time ("HH:MM"). Local only.
    pub async fn set_notify_time(&self, notify_time: &str) -> Result<(), ClientError> {
        self.ctx
            .settings
            .mutate(|settings| settings.notify_time = notify_time.to_string());
        persist_settings(&self.ctx.settings, self.storage.as_ref())
            .await
            .map_err(|e| ClientError::Storage(e.to_string()))
    }

    /// Log out: drop the persisted token and profile, then clear all
    /// user-scoped in-memory state. No server call; the token simply stops
    /// being used.
    pub async fn logout(&self) -> Result<(), ClientError> {
        clear_persisted_session(self.storage.as_ref())
            .await
            .map_err(|e| ClientError::Storage(e.to_string()))?;
        self.ctx.clear_on_logout();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::StoreCell;
    use crate::config::ClientConfig;
    use crate::session::{MemoryStorage, SETTINGS_KEY};
    use crate::transport::{MockTransport, RequestBody};
    use chrono::Utc;
    use serde_json::json;
    use studyhall_types::{Document, DocumentId};

    fn profile_json() -> serde_json::Value {
        json!({
            "id": "u-1",
            "email": "ada@example.com",
            "username": "ada",
            "language": "en"
        })
    }

    fn service(transport: &MockTransport) -> (UserService<MockTransport>, AppContext, MemoryStorage) {
        let ctx = AppContext::new();
        let storage = MemoryStorage::new();
        let client = Arc::new(ApiClient::new(
            ClientConfig::new("https://api.test"),
            transport.clone(),
            ctx.session.clone(),
            Arc::new(storage.clone()),
        ));
        let service = UserService::new(client, ctx.clone(), Arc::new(storage.clone()));
        (service, ctx, storage)
    }

    // ===========================================
    // Login Tests
    // ===========================================

    #[tokio::test]
    async fn login_sends_password_grant_form() {
        let transport = MockTransport::new();
        transport.queue_json(200, &json!({"access_token": "tok-1", "token_type": "bearer"}));
        transport.queue_json(200, &profile_json());
        let (service, _, _) = service(&transport);

        service.login("ada", "hunter2").await.unwrap();

        let token_request = &transport.sent_requests()[0];
        assert_eq!(token_request.path, "/token");
        match &token_request.body {
            RequestBody::Form(pairs) => {
                assert!(pairs.contains(&("grant_type".to_string(), "password".to_string())));
                assert!(pairs.contains(&("username".to_string(), "ada".to_string())));
                assert!(pairs.contains(&("password".to_string(), "hunter2".to_string())));
            }
            other => panic!("expected form body, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn login_installs_token_before_profile_fetch() {
        let transport = MockTransport::new();
        transport.queue_json(200, &json!({"access_token": "tok-1", "token_type": "bearer"}));
        transport.queue_json(200, &profile_json());
        let (service, ctx, storage) = service(&transport);

        let profile = service.login("ada", "hunter2").await.unwrap();

        assert_eq!(profile.username, "ada");
        // The /users/me request rode on the fresh token.
        let me_request = &transport.sent_requests()[1];
        assert_eq!(me_request.header("authorization"), Some("Bearer tok-1"));
        assert_eq!(
            ctx.session.read(|s| s.profile().map(|p| p.username.clone())),
            Some("ada".to_string())
        );
        assert_eq!(storage.get(TOKEN_KEY).await.unwrap(), Some("tok-1".to_string()));
        assert!(storage.get(PROFILE_KEY).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn failed_login_leaves_session_untouched() {
        let transport = MockTransport::new();
        transport.queue_status(400);
        let (service, ctx, storage) = service(&transport);

        let err = service.login("ada", "wrong").await.unwrap_err();

        assert!(matches!(err, ClientError::Status { status: 400, .. }));
        assert!(!ctx.session.read(|s| s.is_authenticated()));
        assert_eq!(storage.get(TOKEN_KEY).await.unwrap(), None);
    }

    // ===========================================
    // Registration Tests
    // ===========================================

    #[tokio::test]
    async fn register_posts_payload_without_logging_in() {
        let transport = MockTransport::new();
        transport.queue_status(201);
        let (service, ctx, _) = service(&transport);

        service
            .register(&RegisterRequest {
                email: "ada@example.com".to_string(),
                username: "ada".to_string(),
                password: "hunter2".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(transport.last_request().unwrap().path, "/register");
        assert!(!ctx.session.read(|s| s.is_authenticated()));
    }

    // ===========================================
    // Language Change Tests
    // ===========================================

    #[tokio::test]
    async fn language_change_invalidates_content_caches() {
        let transport = MockTransport::new();
        transport.queue_status(200);
        let (service, ctx, _) = service(&transport);
        ctx.documents.mutate(|store| {
            store.add(Document {
                id: DocumentId::new(),
                title: "English notes".to_string(),
                file_name: "notes.pdf".to_string(),
                page_count: None,
                created_at: Utc::now(),
            })
        });

        service.change_language("de").await.unwrap();

        assert!(ctx.documents.read(|s| s.is_empty()));
        assert!(ctx.quizzes.read(|s| s.quizzes().is_empty()));
        assert_eq!(ctx.settings.read(|s| s.language.clone()), "de");
        let sent = transport.last_request().unwrap();
        assert_eq!(sent.path, "/users/me/language");
        assert!(sent
            .query
            .contains(&("language".to_string(), "de".to_string())));
    }

    #[tokio::test]
    async fn failed_language_change_keeps_caches_and_setting() {
        let transport = MockTransport::new();
        transport.queue_status(500);
        let (service, ctx, _) = service(&transport);
        ctx.documents.mutate(|store| {
            store.add(Document {
                id: DocumentId::new(),
                title: "kept".to_string(),
                file_name: "kept.pdf".to_string(),
                page_count: None,
                created_at: Utc::now(),
            })
        });

        service.change_language("de").await.unwrap_err();

        assert_eq!(ctx.documents.read(|s| s.len()), 1);
        assert_eq!(ctx.settings.read(|s| s.language.clone()), "en");
    }

    #[tokio::test]
    async fn language_change_updates_session_profile() {
        let transport = MockTransport::new();
        transport.queue_status(200);
        let (service, ctx, _) = service(&transport);
        ctx.session.mutate(|session| {
            session.set_profile(UserProfile {
                id: "u-1".to_string(),
                email: "ada@example.com".to_string(),
                username: "ada".to_string(),
                language: "en".to_string(),
            })
        });

        service.change_language("fr").await.unwrap();

        assert_eq!(
            ctx.session.read(|s| s.profile().map(|p| p.language.clone())),
            Some("fr".to_string())
        );
    }

    // ===========================================
    // Settings Tests
    // ===========================================

    #[tokio::test]
    async fn settings_setters_persist_merged_blob() {
        let transport = MockTransport::new();
        let (service, ctx, storage) = service(&transport);
        storage
            .set(SETTINGS_KEY, &json!({"legacyTheme": "dark"}).to_string())
            .await
            .unwrap();

        service.set_number_of_questions(12).await.unwrap();
        service.set_notify_time("21:30").await.unwrap();

        assert_eq!(ctx.settings.read(|s| s.number_of_questions), 12);
        assert_eq!(ctx.settings.read(|s| s.notify_time.clone()), "21:30");
        let blob: serde_json::Value =
            serde_json::from_str(&storage.get(SETTINGS_KEY).await.unwrap().unwrap()).unwrap();
        assert_eq!(blob["numberOfQuestions"], 12);
        assert_eq!(blob["notifyTime"], "21:30");
        assert_eq!(blob["legacyTheme"], "dark");
        // Settings never touch the network.
        assert_eq!(transport.request_count(), 0);
    }

    // ===========================================
    // Logout Tests
    // ===========================================

    #[tokio::test]
    async fn logout_clears_state_and_persisted_keys_but_not_settings() {
        let transport = MockTransport::new();
        transport.queue_json(200, &json!({"access_token": "tok-1", "token_type": "bearer"}));
        transport.queue_json(200, &profile_json());
        let (service, ctx, storage) = service(&transport);
        service.login("ada", "hunter2").await.unwrap();
        service.set_number_of_questions(12).await.unwrap();

        service.logout().await.unwrap();

        assert!(!ctx.session.read(|s| s.is_authenticated()));
        assert_eq!(storage.get(TOKEN_KEY).await.unwrap(), None);
        assert_eq!(storage.get(PROFILE_KEY).await.unwrap(), None);
        assert!(storage.get(SETTINGS_KEY).await.unwrap().is_some());
        assert_eq!(ctx.settings.read(|s| s.number_of_questions), 12);
        // No network traffic beyond the login pair.
        assert_eq!(transport.request_count(), 2);
    }
}
