use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument};

use crate::{
    session::SessionUser,
    shop::{
        dto::{CheckoutRequest, CheckoutResponse, ProductListing},
        repo::Product,
        services::place_cart_orders,
    },
    state::AppState,
};

const PROOF_CONTENT_TYPES: &[&str] = &["image/png", "image/jpeg", "image/jpg"];

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/shop/products", get(list_products))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/shop/checkout", post(checkout))
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
}

#[instrument(skip(state, _session))]
pub async fn list_products(
    State(state): State<AppState>,
    SessionUser(_session): SessionUser,
) -> Result<Json<Vec<ProductListing>>, (StatusCode, String)> {
    let products = Product::list(&state.db).await.map_err(internal)?;
    let items = products
        .into_iter()
        .map(|p| ProductListing {
            id: p.id,
            name: p.name,
            price: p.price,
            in_stock: p.stock > 0,
            stock: p.stock,
        })
        .collect();
    Ok(Json(items))
}

/// POST /shop/checkout (multipart)
/// Fields: `order` = JSON `CheckoutRequest`, optional `proof` = payment
/// screenshot (png/jpeg). Only the proof's file name is recorded.
#[instrument(skip(state, mp))]
pub async fn checkout(
    State(state): State<AppState>,
    SessionUser(session): SessionUser,
    mut mp: Multipart,
) -> Result<Json<CheckoutResponse>, (StatusCode, String)> {
    let mut request: Option<CheckoutRequest> = None;
    let mut proof_name = String::new();

    while let Ok(Some(field)) = mp.next_field().await {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("order") => {
                let raw = field.text().await.map_err(bad_request)?;
                request = Some(serde_json::from_str(&raw).map_err(bad_request)?);
            }
            Some("proof") => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                if !PROOF_CONTENT_TYPES.contains(&content_type.as_str()) {
                    return Err((
                        StatusCode::BAD_REQUEST,
                        "payment proof must be a png or jpeg image".into(),
                    ));
                }
                proof_name = field.file_name().unwrap_or_default().to_string();
                // Body is discarded; only the name is persisted.
                field.bytes().await.map_err(bad_request)?;
            }
            _ => {}
        }
    }

    let request = request.ok_or((StatusCode::BAD_REQUEST, "order field is required".into()))?;
    if request.items.iter().any(|line| line.quantity < 1) {
        return Err((
            StatusCode::BAD_REQUEST,
            "quantity must be at least 1".into(),
        ));
    }

    let (order_ids, total) = place_cart_orders(
        &state.db,
        &session.username,
        &request.items,
        &request.transaction_id,
        &proof_name,
    )
    .await
    .map_err(internal)?;

    info!(
        username = %session.username,
        orders = order_ids.len(),
        total,
        "checkout placed"
    );
    Ok(Json(CheckoutResponse { order_ids, total }))
}

fn internal(e: anyhow::Error) -> (StatusCode, String) {
    error!(error = %e, "shop operation failed");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

fn bad_request<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, e.to_string())
}
