//! The request client - single HTTP gateway for all entity reads and writes.
//!
//! Every service call goes through [`ApiClient::send`], which:
//! - re-reads the bearer token from session state on every request (the
//!   latest login state always wins; tokens are never cached here),
//! - strips any explicit Content-Type when the body is multipart, so the
//!   transport can set its own boundary-bearing value,
//! - reports every failure to the log with the originating API name, the
//!   status (or the literal `network_error`), URL and method,
//! - on a 401, clears the in-memory session and the persisted token and
//!   fires the unauthorized hook *before* the error reaches the caller.
//!
//! The client performs no retries; retry-on-5xx lives in the optional
//! [`RetryPolicy`](crate::RetryPolicy) decorator layered above it.

use crate::cell::StoreCell;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::session::{clear_persisted_session, StoragePort};
use crate::transport::{ApiRequest, ApiResponse, HttpTransport};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use studyhall_core::SessionState;

/// Callback fired after a 401 has cleared the session.
///
/// The app binds this to its navigation reset ("back to the login screen");
/// tests bind it to a flag.
pub type UnauthorizedHook = Arc<dyn Fn() + Send + Sync>;

/// The single configured HTTP gateway.
pub struct ApiClient<T: HttpTransport> {
    config: ClientConfig,
    transport: T,
    session: StoreCell<SessionState>,
    storage: Arc<dyn StoragePort>,
    on_unauthorized: Option<UnauthorizedHook>,
}

impl<T: HttpTransport> ApiClient<T> {
    /// Create a client over the given transport.
    pub fn new(
        config: ClientConfig,
        transport: T,
        session: StoreCell<SessionState>,
        storage: Arc<dyn StoragePort>,
    ) -> Self {
        Self {
            config,
            transport,
            session,
            storage,
            on_unauthorized: None,
        }
    }

    /// Bind the 401 side-effect hook.
    pub fn with_unauthorized_hook(mut self, hook: UnauthorizedHook) -> Self {
        self.on_unauthorized = Some(hook);
        self
    }

    /// The session cell this client reads tokens from.
    pub fn session(&self) -> &StoreCell<SessionState> {
        &self.session
    }

    /// The storage port this client clears on 401.
    pub fn storage(&self) -> &Arc<dyn StoragePort> {
        &self.storage
    }

    /// Execute a request and return its 2xx response.
    ///
    /// Any other outcome is reported and returned as an error; nothing is
    /// swallowed.
    pub async fn send(&self, mut request: ApiRequest) -> Result<ApiResponse, ClientError> {
        // Always re-read: a login or logout between two requests must be
        // honored by the second request.
        let token = self
            .session
            .read(|session| session.bearer_token().map(str::to_string));
        if let Some(token) = token {
            request
                .headers
                .push(("Authorization".to_string(), format!("Bearer {token}")));
        }

        // The transport must compute the multipart boundary itself; an
        // explicit Content-Type would clobber it.
        if request.body.is_multipart() {
            request
                .headers
                .retain(|(name, _)| !name.eq_ignore_ascii_case("content-type"));
        }

        let api = request.api;
        let method = request.method;
        let url = format!("{}{}", self.config.base_url, request.path);

        let response = match self.transport.execute(request).await {
            Ok(response) => response,
            Err(err) => {
                tracing::error!(
                    api,
                    status = "network_error",
                    url = %url,
                    method = %method,
                    error = %err,
                    "request failed"
                );
                return Err(err.into());
            }
        };

        if response.is_success() {
            return Ok(response);
        }

        tracing::error!(
            api,
            status = response.status,
            status_text = %response.status_text,
            url = %url,
            method = %method,
            "request failed"
        );

        match response.status {
            401 => {
                self.session.mutate(|session| session.clear());
                // Best-effort: a storage failure must not block the error
                // from reaching the caller.
                if let Err(err) = clear_persisted_session(self.storage.as_ref()).await {
                    tracing::warn!(error = %err, "failed to clear persisted session after 401");
                }
                if let Some(hook) = &self.on_unauthorized {
                    hook();
                }
                Err(ClientError::Unauthorized)
            }
            // 403 and 5xx are recognized but have no handling beyond the
            // report above; they propagate like any other status.
            403 => Err(status_error(api, &response)),
            500..=599 => Err(status_error(api, &response)),
            _ => Err(status_error(api, &response)),
        }
    }

    /// Execute a request and decode its 2xx body as JSON.
    pub async fn send_json<D: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<D, ClientError> {
        let response = self.send(request).await?;
        response
            .json()
            .map_err(|err| ClientError::Decode(err.to_string()))
    }
}

fn status_error(api: &'static str, response: &ApiResponse) -> ClientError {
    ClientError::Status {
        api,
        status: response.status,
        status_text: response.status_text.clone(),
    }
}
