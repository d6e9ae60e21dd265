//! Session store: the single owner of client-side authentication state.
//!
//! ARCHITECTURE
//! ============
//! `SessionStore` wraps a [`Transport`] and a [`Notifier`]. Every state
//! transition is driven by a backend round-trip:
//!
//! - `login` / `register` → `POST /api/auth/{login,register}`
//! - `logout`             → `POST /api/auth/logout`
//! - `check_status`       → `GET  /api/auth/status`
//!
//! Committed states are published through a `tokio::sync::watch` channel so
//! readers (route guard, UI) observe whole snapshots only.
//!
//! CONCURRENCY
//! ===========
//! Operations hold a fair `tokio::sync::Mutex` across the network call and
//! the commit. At most one operation is in flight per store, and queued
//! operations run in the order they were accepted.
//!
//! ERROR HANDLING
//! ==============
//! Transport failures, backend rejections and malformed 2xx payloads are all
//! recovered here into a `bool` result plus a notice. `check_status` is
//! best-effort: on failure it logs and leaves state untouched.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::{Mutex, watch};

use crate::notice::{Notice, NoticeMessages, Notifier};
use crate::transport::{Method, Transport, TransportError};

pub const LOGIN_PATH: &str = "/api/auth/login";
pub const REGISTER_PATH: &str = "/api/auth/register";
pub const LOGOUT_PATH: &str = "/api/auth/logout";
pub const STATUS_PATH: &str = "/api/auth/status";

// =============================================================================
// SESSION STATE
// =============================================================================

/// Current login status.
///
/// `authenticated` is true exactly when `identity` is non-empty. Fields are
/// private so the pair can only be built through the two constructors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    identity: String,
    authenticated: bool,
}

impl SessionState {
    #[must_use]
    pub fn signed_out() -> Self {
        Self::default()
    }

    /// Signed-in state for `identity`, or `None` if it is blank.
    #[must_use]
    pub fn signed_in(identity: impl Into<String>) -> Option<Self> {
        let identity = identity.into();
        if identity.trim().is_empty() {
            return None;
        }
        Some(Self { identity, authenticated: true })
    }

    /// The authenticated user's email, or `""` when signed out.
    #[must_use]
    pub fn identity(&self) -> &str {
        &self.identity
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }
}

// =============================================================================
// CREDENTIALS
// =============================================================================

/// Login / registration form. Serialized with the backend's form field
/// names `user` and `pass`.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    #[serde(rename = "user")]
    pub email: String,
    #[serde(rename = "pass")]
    pub password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into() }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Debug, Deserialize)]
struct AuthResponse {
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    #[serde(default)]
    logged_in: bool,
    #[serde(default)]
    email: Option<String>,
}

/// Identity from a login/register success body, if present and non-empty.
fn identity_from_auth_body(body: &Value) -> Option<SessionState> {
    let parsed: AuthResponse = serde_json::from_value(body.clone()).ok()?;
    SessionState::signed_in(parsed.email?)
}

/// Outcome of a status body: `Some(state)` to commit, `None` if malformed.
///
/// Only a body claiming `logged_in: true` without a usable email is
/// malformed. Anything else that does not report a session signs out.
fn state_from_status_body(body: &Value) -> Option<SessionState> {
    match serde_json::from_value::<StatusResponse>(body.clone()) {
        Ok(StatusResponse { logged_in: true, email }) => SessionState::signed_in(email?),
        _ => Some(SessionState::signed_out()),
    }
}

// =============================================================================
// SESSION STORE
// =============================================================================

#[derive(Debug, Clone, Copy)]
enum AuthAction {
    Login,
    Register,
}

impl AuthAction {
    fn path(self) -> &'static str {
        match self {
            Self::Login => LOGIN_PATH,
            Self::Register => REGISTER_PATH,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Register => "register",
        }
    }
}

pub struct SessionStore<T> {
    transport: T,
    notifier: Arc<dyn Notifier>,
    messages: NoticeMessages,
    state: watch::Sender<SessionState>,
    gate: Mutex<()>,
}

impl<T: Transport> SessionStore<T> {
    /// Create a signed-out store.
    #[must_use]
    pub fn new(transport: T, notifier: Arc<dyn Notifier>) -> Self {
        let (state, _) = watch::channel(SessionState::signed_out());
        Self { transport, notifier, messages: NoticeMessages::default(), state, gate: Mutex::new(()) }
    }

    /// Replace the notice texts.
    #[must_use]
    pub fn with_messages(mut self, messages: NoticeMessages) -> Self {
        self.messages = messages;
        self
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Current committed state.
    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    #[must_use]
    pub fn identity(&self) -> String {
        self.state.borrow().identity().to_owned()
    }

    /// Receiver woken whenever the committed state changes. Intermediate states may be skipped;
    /// the latest committed state is always visible.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Log in with `credentials`. Returns whether the store is now signed in
    /// as the identity the backend returned.
    pub async fn login(&self, credentials: &Credentials) -> bool {
        self.authenticate(AuthAction::Login, credentials).await
    }

    /// Register `profile` and sign in as the returned identity.
    pub async fn register(&self, profile: &Credentials) -> bool {
        self.authenticate(AuthAction::Register, profile).await
    }

    /// Log out. State is only cleared once the backend confirms.
    pub async fn logout(&self) -> bool {
        let _gate = self.gate.lock().await;

        match self.transport.request(Method::Post, LOGOUT_PATH, None).await {
            Ok(_) => {
                self.commit(SessionState::signed_out());
                tracing::info!("logged out");
                self.notifier.notify(Notice::success(self.messages.logout_succeeded.clone()));
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "logout failed");
                self.notifier.notify(Notice::failure(self.messages.logout_failed.clone()));
                false
            }
        }
    }

    /// Resynchronize with the backend session. Failures are logged only and
    /// leave state untouched. Returns the state after the call.
    pub async fn check_status(&self) -> SessionState {
        let _gate = self.gate.lock().await;

        match self.transport.request(Method::Get, STATUS_PATH, None).await {
            Ok(resp) => match state_from_status_body(&resp.body) {
                Some(next) => {
                    tracing::debug!(authenticated = next.is_authenticated(), "session status resynchronized");
                    self.commit(next);
                }
                None => tracing::warn!(body = %resp.body, "malformed session status response"),
            },
            Err(e) => tracing::warn!(error = %e, "session status check failed"),
        }

        self.snapshot()
    }

    async fn authenticate(&self, action: AuthAction, credentials: &Credentials) -> bool {
        let _gate = self.gate.lock().await;

        let (succeeded, failed) = match action {
            AuthAction::Login => (&self.messages.login_succeeded, &self.messages.login_failed),
            AuthAction::Register => (&self.messages.register_succeeded, &self.messages.register_failed),
        };

        let body = match serde_json::to_value(credentials) {
            Ok(body) => body,
            Err(e) => {
                tracing::error!(action = action.name(), error = %e, "credentials serialization failed");
                self.notifier.notify(Notice::failure(failed.clone()));
                return false;
            }
        };

        match self.transport.request(Method::Post, action.path(), Some(&body)).await {
            Ok(resp) => {
                let Some(next) = identity_from_auth_body(&resp.body) else {
                    tracing::warn!(action = action.name(), "success response without identity");
                    self.notifier.notify(Notice::failure(failed.clone()));
                    return false;
                };
                tracing::info!(action = action.name(), identity = next.identity(), "authenticated");
                self.commit(next);
                self.notifier.notify(Notice::success(succeeded.clone()));
                true
            }
            Err(e) => {
                tracing::warn!(action = action.name(), error = %e, "authentication rejected");
                self.notifier.notify(Notice::failure(failure_text(&e, failed)));
                false
            }
        }
    }

    /// Swap in `next` as one unit; subscribers are only woken on change.
    fn commit(&self, next: SessionState) {
        self.state.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next;
            true
        });
    }
}

/// Backend-supplied message when present, otherwise the generic text.
fn failure_text(err: &TransportError, fallback: &str) -> String {
    err.message().unwrap_or(fallback).to_owned()
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
