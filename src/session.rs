use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use uuid::Uuid;

use crate::auth::repo::Role;
use crate::state::AppState;

/// Per-visitor identity, created at login. There is no logout and no expiry;
/// sessions live until the process stops.
#[derive(Debug, Clone)]
pub struct Session {
    pub username: String,
    pub role: Role,
}

/// In-process session map keyed by an opaque bearer token.
#[derive(Clone, Default)]
pub struct Sessions {
    inner: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl Sessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, session: Session) -> Uuid {
        let token = Uuid::new_v4();
        self.inner
            .write()
            .expect("session lock poisoned")
            .insert(token, session);
        token
    }

    pub fn get(&self, token: &Uuid) -> Option<Session> {
        self.inner
            .read()
            .expect("session lock poisoned")
            .get(token)
            .cloned()
    }
}

/// Extracts the visitor's session from `Authorization: Bearer <token>`.
pub struct SessionUser(pub Session);

#[async_trait]
impl FromRequestParts<AppState> for SessionUser {
    type Rejection = (StatusCode, String);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or((
                StatusCode::UNAUTHORIZED,
                "Please log in or sign up first.".to_string(),
            ))?;

        let token = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            .ok_or((StatusCode::UNAUTHORIZED, "invalid auth scheme".to_string()))?;

        let token = Uuid::parse_str(token)
            .map_err(|_| (StatusCode::UNAUTHORIZED, "invalid session token".to_string()))?;

        let session = state.sessions.get(&token).ok_or((
            StatusCode::UNAUTHORIZED,
            "Please log in or sign up first.".to_string(),
        ))?;

        Ok(SessionUser(session))
    }
}
