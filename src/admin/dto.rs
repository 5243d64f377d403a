use serde::Deserialize;

/// Request body for adding a catalog product.
#[derive(Debug, Deserialize)]
pub struct AddProductRequest {
    pub name: String,
    pub price: f64,
    pub stock: i64,
}
