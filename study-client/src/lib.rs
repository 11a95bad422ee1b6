//! # studyhall-client
//!
//! Request client, fetch-through cache policy and search dispatch for the
//! Studyhall study tool.
//!
//! ## Architecture
//!
//! ```text
//! Screen → Service (fetch-through policy) → ApiClient → HttpTransport → Network
//!              ↓                               ↓
//!         StoreCell (studyhall-core stores)  SessionState (bearer token)
//! ```
//!
//! A screen calls a service function, which consults the in-memory store; on
//! a cache miss it goes through [`ApiClient`], then writes the result back
//! into the store. Search input flows through [`SearchDispatcher`], which
//! coalesces keystrokes before calling the same service functions.
//!
//! ## Example
//!
//! ```ignore
//! use studyhall_client::{
//!     ApiClient, AppContext, ClientConfig, DocumentService, MemoryStorage, ReqwestTransport,
//! };
//! use studyhall_types::PageRequest;
//! use std::sync::Arc;
//!
//! let config = ClientConfig::from_env()?;
//! let ctx = AppContext::new();
//! let transport = ReqwestTransport::new(&config)?;
//! let storage = Arc::new(MemoryStorage::new());
//! let client = Arc::new(ApiClient::new(config, transport, ctx.session.clone(), storage));
//!
//! let documents = DocumentService::new(client.clone(), ctx.documents.clone());
//! let outcome = documents.fetch_list(PageRequest::first(20), false).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cell;
pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod retry;
pub mod search;
pub mod services;
pub mod session;
pub mod transport;

pub use cell::StoreCell;
pub use client::{ApiClient, UnauthorizedHook};
pub use config::{ClientConfig, ConfigError};
pub use context::AppContext;
pub use error::ClientError;
pub use retry::RetryPolicy;
pub use search::{SearchDispatch, SearchDispatcher, DEFAULT_DEBOUNCE};
pub use services::{
    DocumentService, ListOutcome, ListSource, QuizService, ScheduleService, UserService,
};
pub use session::{
    clear_persisted_session, persist_settings, restore_session, FileStorage, MemoryStorage,
    StorageError, StoragePort, PROFILE_KEY, SETTINGS_KEY, TOKEN_KEY,
};
pub use transport::{
    ApiRequest, ApiResponse, HttpTransport, Method, MockTransport, MultipartPart, ReqwestTransport,
    RequestBody, TransportError,
};
