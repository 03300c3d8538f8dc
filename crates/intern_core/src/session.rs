//! Session state derived from a stored token.
//!
//! # Responsibility
//! - Track whether the user is authenticated.
//! - Check credentials through a pluggable policy and persist the token.
//!
//! # Invariants
//! - `Authenticated` iff a token is stored under `SESSION_TOKEN_KEY`.
//! - A rejected login leaves both the store and the state untouched.
//!
//! The credential check is a placeholder gate for a local single-user app,
//! not a security boundary.

use crate::store::{KeyValueStore, StoreError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Store key holding the session token.
pub const SESSION_TOKEN_KEY: &str = "authToken";

pub const DEFAULT_USERNAME: &str = "admin";
pub const DEFAULT_PASSWORD: &str = "1234";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated,
}

#[derive(Debug)]
pub enum SessionError {
    /// Login rejected by the credential policy.
    InvalidCredentials,
    /// Operation requires a logged-in session.
    NotAuthenticated,
    /// Token could not be read or written.
    StorageUnavailable(StoreError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCredentials => write!(f, "invalid credentials"),
            Self::NotAuthenticated => write!(f, "not authenticated: login first"),
            Self::StorageUnavailable(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::StorageUnavailable(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for SessionError {
    fn from(value: StoreError) -> Self {
        Self::StorageUnavailable(value)
    }
}

/// Decides whether a username/password pair may open a session.
pub trait CredentialPolicy {
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// Single fixed username/password pair.
#[derive(Clone, PartialEq, Eq)]
pub struct FixedCredentials {
    username: String,
    password: String,
}

impl FixedCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// True when either half of the pair is empty or whitespace.
    pub fn is_blank(&self) -> bool {
        self.username.trim().is_empty() || self.password.trim().is_empty()
    }
}

impl Default for FixedCredentials {
    fn default() -> Self {
        Self::new(DEFAULT_USERNAME, DEFAULT_PASSWORD)
    }
}

impl std::fmt::Debug for FixedCredentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixedCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl CredentialPolicy for FixedCredentials {
    fn verify(&self, username: &str, password: &str) -> bool {
        username == self.username && password == self.password
    }
}

/// Explicitly owned session state bound to a store.
pub struct Session<'s, S: KeyValueStore + ?Sized, P: CredentialPolicy> {
    store: &'s S,
    policy: P,
    state: SessionState,
}

impl<'s, S: KeyValueStore + ?Sized, P: CredentialPolicy> Session<'s, S, P> {
    /// Loads the initial state from the stored token.
    pub fn init(store: &'s S, policy: P) -> Result<Self, SessionError> {
        let state = match store.get(SESSION_TOKEN_KEY)? {
            Some(token) if !token.is_empty() => SessionState::Authenticated,
            _ => SessionState::Unauthenticated,
        };
        info!("event=session_init module=session status=ok state={state:?}");
        Ok(Self {
            store,
            policy,
            state,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == SessionState::Authenticated
    }

    /// Returns `NotAuthenticated` unless a session is open.
    pub fn ensure_authenticated(&self) -> Result<(), SessionError> {
        if self.is_authenticated() {
            Ok(())
        } else {
            Err(SessionError::NotAuthenticated)
        }
    }

    /// Checks credentials and stores a fresh token on success.
    pub fn login(&mut self, username: &str, password: &str) -> Result<(), SessionError> {
        if !self.policy.verify(username, password) {
            warn!("event=session_login module=session status=error error_code=invalid_credentials");
            return Err(SessionError::InvalidCredentials);
        }

        let token = Uuid::new_v4().to_string();
        self.store.set(SESSION_TOKEN_KEY, &token)?;
        self.state = SessionState::Authenticated;
        info!("event=session_login module=session status=ok");
        Ok(())
    }

    /// Removes the token. Logging out twice is harmless.
    pub fn logout(&mut self) -> Result<(), SessionError> {
        self.store.remove(SESSION_TOKEN_KEY)?;
        self.state = SessionState::Unauthenticated;
        info!("event=session_logout module=session status=ok");
        Ok(())
    }
}
