//! Session state and the persisted settings merge.
//!
//! The client keeps the bearer token and the last-known user profile in
//! memory; `studyhall-client` mirrors them to device storage and restores
//! them at process start. Settings persistence merges into the stored JSON
//! blob rather than replacing it, so keys written by older app versions
//! survive an update.

use serde_json::Value;
use studyhall_types::{Settings, UserProfile};

/// In-memory auth/session state.
///
/// The request client re-reads the token from here on every request; it is
/// never cached across requests, so the latest login state always wins.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    token: Option<String>,
    profile: Option<UserProfile>,
}

impl SessionState {
    /// Create an empty, unauthenticated session.
    pub fn new() -> Self {
        Self::default()
    }

    /// The bearer token, if logged in.
    pub fn bearer_token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Store a bearer token after login.
    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    /// The last-known user profile, if any.
    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    /// Store the user profile.
    pub fn set_profile(&mut self, profile: UserProfile) {
        self.profile = Some(profile);
    }

    /// Whether a token is present.
    ///
    /// An absent token does not block requests; they proceed
    /// unauthenticated and the server decides.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Drop token and profile. Called on logout and on a 401 response.
    pub fn clear(&mut self) {
        self.token = None;
        self.profile = None;
    }
}

/// Merge settings into an existing persisted blob.
///
/// Only the three settings keys are written; any other keys already in the
/// blob are kept. A blob that is not a JSON object (corrupted storage,
/// first run) is replaced with a fresh object.
pub fn merge_settings(blob: Value, settings: &Settings) -> Value {
    let mut object = match blob {
        Value::Object(map) => map,
        _ => serde_json::Map::new(),
    };
    // Settings serializes to an object by construction.
    if let Ok(Value::Object(fields)) = serde_json::to_value(settings) {
        for (key, value) in fields {
            object.insert(key, value);
        }
    }
    Value::Object(object)
}
