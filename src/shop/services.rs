use sqlx::SqlitePool;
use tracing::warn;

use crate::shop::dto::CartLine;
use crate::shop::repo::{Order, Product};

/// Converts a cart into one Pending order per line and returns the inserted
/// ids with the recomputed total.
///
/// Prices come from the products table at checkout time. A line whose
/// product id matches nothing still produces an order row (product_id is
/// unchecked in the schema) but contributes nothing to the total. Stock is
/// read-only here: neither availability nor quantity is checked against it.
pub async fn place_cart_orders(
    db: &SqlitePool,
    username: &str,
    items: &[CartLine],
    transaction_id: &str,
    payment_proof: &str,
) -> anyhow::Result<(Vec<i64>, f64)> {
    let mut order_ids = Vec::with_capacity(items.len());
    let mut total = 0.0;

    for line in items {
        match Product::find(db, line.product_id).await? {
            Some(product) => total += product.price * line.quantity as f64,
            None => {
                warn!(product_id = line.product_id, "checkout line for unknown product");
            }
        }

        let order = Order::create(
            db,
            username,
            line.product_id,
            line.quantity,
            transaction_id,
            payment_proof,
        )
        .await?;
        order_ids.push(order.id);
    }

    Ok((order_ids, total))
}
