use std::convert::Infallible;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use serde::Serialize;

use crate::storage::{KeyValueStore, ROLE_KEY, StorageState, TOKEN_KEY};

/// Role assumed when the store holds no role for the session.
pub const DEFAULT_ROLE: &str = "user";

/// Credentials
///
/// A snapshot of the session as held in persisted storage. It is read fresh for
/// every navigation and every menu projection; nothing caches it between calls.
///
/// The token is opaque: it is never decoded or validated here. Issuing it is the
/// login flow's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    /// `None` means the session is unauthenticated.
    #[serde(skip_serializing)]
    pub token: Option<String>,
    /// The role used for route checks, `DEFAULT_ROLE` when none is stored.
    pub role: String,
}

impl Credentials {
    /// read
    ///
    /// Builds the snapshot from the store. Read failures and empty strings both
    /// count as absent values.
    pub fn read(store: &dyn KeyValueStore) -> Self {
        let token = read_non_empty(store, TOKEN_KEY);
        let role = read_non_empty(store, ROLE_KEY).unwrap_or_else(|| DEFAULT_ROLE.to_string());

        Self { token, role }
    }

    pub fn anonymous() -> Self {
        Self {
            token: None,
            role: DEFAULT_ROLE.to_string(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

fn read_non_empty(store: &dyn KeyValueStore, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(value) => value.filter(|v| !v.is_empty()),
        Err(e) => {
            tracing::warn!(key, error = %e, "credential read failed, treating as absent");
            None
        }
    }
}

/// Credentials Extractor Implementation
///
/// Lets a handler take `Credentials` as an argument. The snapshot comes from the
/// persisted store, not from request headers, so extraction never rejects: an
/// unreadable store simply yields an anonymous session.
impl<S> FromRequestParts<S> for Credentials
where
    S: Send + Sync,
    StorageState: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let store = StorageState::from_ref(state);
        Ok(Credentials::read(store.as_ref()))
    }
}
