use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    admin::dto::AddProductRequest,
    auth::repo::Role,
    session::{Session, SessionUser},
    shop::repo::{Order, Product},
    state::AppState,
};

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/orders", get(list_orders))
        .route("/admin/products", post(add_product))
}

fn require_admin(session: &Session) -> Result<(), (StatusCode, String)> {
    if session.role != Role::Admin {
        warn!(username = %session.username, "admin route denied");
        return Err((StatusCode::FORBIDDEN, "Admins only!".into()));
    }
    Ok(())
}

/// Raw dump of every order, newest last.
#[instrument(skip(state))]
pub async fn list_orders(
    State(state): State<AppState>,
    SessionUser(session): SessionUser,
) -> Result<Json<Vec<Order>>, (StatusCode, String)> {
    require_admin(&session)?;
    let orders = Order::list(&state.db).await.map_err(internal)?;
    Ok(Json(orders))
}

/// Adds a product. Price and stock must be non-negative; that constraint
/// lives here at the boundary, not in the schema.
#[instrument(skip(state, payload))]
pub async fn add_product(
    State(state): State<AppState>,
    SessionUser(session): SessionUser,
    Json(payload): Json<AddProductRequest>,
) -> Result<(StatusCode, Json<Product>), (StatusCode, String)> {
    require_admin(&session)?;

    if payload.price < 0.0 || !payload.price.is_finite() {
        return Err((StatusCode::BAD_REQUEST, "price must be non-negative".into()));
    }
    if payload.stock < 0 {
        return Err((StatusCode::BAD_REQUEST, "stock must be non-negative".into()));
    }

    let product = Product::create(&state.db, &payload.name, payload.price, payload.stock)
        .await
        .map_err(internal)?;

    info!(product_id = product.id, name = %product.name, "product added");
    Ok((StatusCode::CREATED, Json(product)))
}

fn internal(e: anyhow::Error) -> (StatusCode, String) {
    error!(error = %e, "admin operation failed");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;

    fn as_role(username: &str, role: Role) -> SessionUser {
        SessionUser(Session {
            username: username.into(),
            role,
        })
    }

    #[tokio::test]
    async fn non_admin_is_rejected_without_data() {
        let state = AppState::in_memory().await.unwrap();
        Order::create(&state.db, "alice", 1, 2, "TXN", "")
            .await
            .unwrap();

        let (status, msg) = list_orders(State(state.clone()), as_role("bob", Role::User))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(msg, "Admins only!");

        let (status, _) = add_product(
            State(state),
            as_role("bob", Role::User),
            Json(AddProductRequest {
                name: "Honey 500g".into(),
                price: 250.0,
                stock: 10,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn admin_sees_raw_order_dump() {
        let state = AppState::in_memory().await.unwrap();
        Order::create(&state.db, "alice", 7, 2, "TXN1", "proof.png")
            .await
            .unwrap();

        let Json(orders) = list_orders(State(state), as_role("admin", Role::Admin))
            .await
            .unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].user, "alice");
        assert_eq!(orders[0].product_id, 7);
        assert_eq!(orders[0].status, "Pending");
    }

    #[tokio::test]
    async fn admin_adds_a_product() {
        let state = AppState::in_memory().await.unwrap();

        let (status, Json(product)) = add_product(
            State(state.clone()),
            as_role("admin", Role::Admin),
            Json(AddProductRequest {
                name: "Honey 500g".into(),
                price: 250.0,
                stock: 10,
            }),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(product.name, "Honey 500g");

        let products = Product::list(&state.db).await.unwrap();
        assert_eq!(products.len(), 1);
    }

    #[tokio::test]
    async fn negative_price_or_stock_is_rejected() {
        let state = AppState::in_memory().await.unwrap();

        for (price, stock) in [(-1.0, 10), (250.0, -1)] {
            let (status, _) = add_product(
                State(state.clone()),
                as_role("admin", Role::Admin),
                Json(AddProductRequest {
                    name: "Honey 500g".into(),
                    price,
                    stock,
                }),
            )
            .await
            .unwrap_err();
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }
        assert!(Product::list(&state.db).await.unwrap().is_empty());
    }
}
