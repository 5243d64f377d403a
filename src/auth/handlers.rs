use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, PublicUser, SignupRequest},
        password::{hash_password, verify_password},
        repo::{Role, User},
    },
    session::Session,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
}

/// Creates an account with role `user`. There are no password rules and
/// no duplicate-username check, so signup always succeeds while storage is
/// reachable.
#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<PublicUser>), (StatusCode, String)> {
    let hash = hash_password(&payload.password).map_err(|e| {
        error!(error = %e, "hash_password failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    let user = User::create(&state.db, &payload.username, &hash, Role::User)
        .await
        .map_err(|e| {
            error!(error = %e, "create user failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;

    info!(user_id = user.id, username = %user.username, "user signed up");
    Ok((
        StatusCode::CREATED,
        Json(PublicUser {
            id: user.id,
            username: user.username,
            role: user.role,
        }),
    ))
}

/// Verifies credentials and opens a session. Rejection is a single generic
/// message with no unknown-user/wrong-password distinction.
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, (StatusCode, String)> {
    let candidates = User::find_by_username(&state.db, &payload.username)
        .await
        .map_err(|e| {
            error!(error = %e, "find_by_username failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;

    // Usernames may repeat; take the first row whose password matches.
    let mut matched = None;
    for user in candidates {
        if verify_password(&payload.password, &user.password_hash).unwrap_or(false) {
            matched = Some(user);
            break;
        }
    }
    let user = match matched {
        Some(u) => u,
        None => {
            warn!(username = %payload.username, "login rejected");
            return Err((StatusCode::UNAUTHORIZED, "Invalid credentials".into()));
        }
    };

    let token = state.sessions.insert(Session {
        username: user.username.clone(),
        role: user.role,
    });

    info!(user_id = user.id, username = %user.username, "user logged in");
    Ok(Json(LoginResponse {
        token,
        user: PublicUser {
            id: user.id,
            username: user.username,
            role: user.role,
        },
    }))
}
