use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub stock: i64,
}

/// Order line as persisted. `product_id` is not a foreign key and `user`
/// is a plain username string, so rows can outlive any matching product or
/// account.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub id: i64,
    pub user: String,
    pub product_id: i64,
    pub quantity: i64,
    pub status: String,
    pub transaction_id: String,
    pub payment_proof: String,
}

impl Product {
    pub async fn create(
        db: &SqlitePool,
        name: &str,
        price: f64,
        stock: i64,
    ) -> anyhow::Result<Product> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, price, stock)
            VALUES (?, ?, ?)
            RETURNING id, name, price, stock
            "#,
        )
        .bind(name)
        .bind(price)
        .bind(stock)
        .fetch_one(db)
        .await?;
        Ok(product)
    }

    /// All products in insertion order.
    pub async fn list(db: &SqlitePool) -> anyhow::Result<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price, stock
            FROM products
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(products)
    }

    pub async fn find(db: &SqlitePool, id: i64) -> anyhow::Result<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price, stock
            FROM products
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(product)
    }
}

impl Order {
    /// Inserts one Pending order line. Does not check that the product
    /// exists and does not touch stock; checkout never mutates products.
    pub async fn create(
        db: &SqlitePool,
        user: &str,
        product_id: i64,
        quantity: i64,
        transaction_id: &str,
        payment_proof: &str,
    ) -> anyhow::Result<Order> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders (user, product_id, quantity, status, transaction_id, payment_proof)
            VALUES (?, ?, ?, 'Pending', ?, ?)
            RETURNING id, user, product_id, quantity, status, transaction_id, payment_proof
            "#,
        )
        .bind(user)
        .bind(product_id)
        .bind(quantity)
        .bind(transaction_id)
        .bind(payment_proof)
        .fetch_one(db)
        .await?;
        Ok(order)
    }

    /// All orders in insertion order.
    pub async fn list(db: &SqlitePool) -> anyhow::Result<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, user, product_id, quantity, status, transaction_id, payment_proof
            FROM orders
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(orders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;

    #[tokio::test]
    async fn created_product_appears_in_listing() {
        let state = AppState::in_memory().await.unwrap();

        Product::create(&state.db, "Honey 500g", 250.0, 10)
            .await
            .unwrap();

        let products = Product::list(&state.db).await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Honey 500g");
        assert_eq!(products[0].price, 250.0);
        assert_eq!(products[0].stock, 10);
    }

    #[tokio::test]
    async fn order_is_created_pending() {
        let state = AppState::in_memory().await.unwrap();
        let product = Product::create(&state.db, "Honey 500g", 250.0, 10)
            .await
            .unwrap();

        let order = Order::create(&state.db, "alice", product.id, 2, "TXN1", "proof.png")
            .await
            .unwrap();
        assert_eq!(order.status, "Pending");

        let orders = Order::list(&state.db).await.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].user, "alice");
        assert_eq!(orders[0].quantity, 2);
        assert_eq!(orders[0].transaction_id, "TXN1");
        assert_eq!(orders[0].payment_proof, "proof.png");
    }

    #[tokio::test]
    async fn ordering_never_mutates_stock() {
        let state = AppState::in_memory().await.unwrap();
        let in_stock = Product::create(&state.db, "Honey 500g", 250.0, 10)
            .await
            .unwrap();
        let sold_out = Product::create(&state.db, "Honeycomb", 400.0, 0)
            .await
            .unwrap();

        for quantity in [1, 5, 100] {
            Order::create(&state.db, "alice", in_stock.id, quantity, "TXN", "")
                .await
                .unwrap();
            Order::create(&state.db, "alice", sold_out.id, quantity, "TXN", "")
                .await
                .unwrap();
        }

        let products = Product::list(&state.db).await.unwrap();
        assert_eq!(products[0].stock, 10);
        assert_eq!(products[1].stock, 0);
    }

    #[tokio::test]
    async fn orphan_product_id_is_accepted() {
        let state = AppState::in_memory().await.unwrap();

        // No products table row with id 99; the insert still lands.
        let order = Order::create(&state.db, "alice", 99, 1, "TXN", "")
            .await
            .unwrap();
        assert_eq!(order.product_id, 99);
    }
}
