use serde::{Deserialize, Serialize};

/// Catalog entry as shown to a logged-in shopper. Out-of-stock products are
/// flagged rather than hidden.
#[derive(Debug, Serialize)]
pub struct ProductListing {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub stock: i64,
    pub in_stock: bool,
}

/// One cart line submitted at checkout.
#[derive(Debug, Deserialize)]
pub struct CartLine {
    pub product_id: i64,
    pub quantity: i64,
}

/// JSON payload of the `order` multipart field.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub items: Vec<CartLine>,
    #[serde(default)]
    pub transaction_id: String,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub order_ids: Vec<i64>,
    pub total: f64,
}
