use std::net::SocketAddr;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use crate::{admin, auth, shop};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .nest(
            "/api/v1",
            Router::new()
                .merge(auth::router())
                .merge(shop::router())
                .merge(admin::router())
                .route("/home", get(home))
                .route("/queries", get(queries))
                .route("/health", get(|| async { "ok" })),
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

/// The Home view: static welcome copy, no store or session access.
async fn home() -> &'static str {
    "Welcome to NectarNest! Buy the purest honey directly from the hive. \
     Our honey is 100% organic and farm fresh."
}

/// The Queries view is a menu entry with no behavior behind it; it
/// deliberately renders nothing.
async fn queries() -> &'static str {
    ""
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into())
    )
    .parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::Json;

    use crate::admin::handlers::list_orders;
    use crate::auth::dto::{LoginRequest, SignupRequest};
    use crate::auth::handlers::{login, signup};
    use crate::auth::repo::Role;
    use crate::session::SessionUser;
    use crate::state::AppState;

    // Fresh store: sign up bob, log in, then hit the admin panel and get
    // turned away with nothing rendered.
    #[tokio::test]
    async fn fresh_visitor_cannot_reach_admin_panel() {
        let state = AppState::in_memory().await.unwrap();

        signup(
            State(state.clone()),
            Json(SignupRequest {
                username: "bob".into(),
                password: "pw2".into(),
            }),
        )
        .await
        .unwrap();

        let Json(resp) = login(
            State(state.clone()),
            Json(LoginRequest {
                username: "bob".into(),
                password: "pw2".into(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(resp.user.role, Role::User);

        let session = state.sessions.get(&resp.token).expect("bob is logged in");
        let (status, msg) = list_orders(State(state), SessionUser(session))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(msg, "Admins only!");
    }
}
