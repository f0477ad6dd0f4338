//! Catalog store: the durable collection of sellable products.
//!
//! Products are `(id, name, price)` triples. The price is an opaque display
//! string; nothing in the system does arithmetic on it. Ids are assigned by
//! SQLite's AUTOINCREMENT, so they are strictly increasing and never reused,
//! even after deletions.

use anyhow::{Context, Result};
use sqlx::sqlite::SqlitePool;
use tracing::info;

/// A sellable product as stored in the catalog.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: String,
}

/// Initialize the catalog schema. Safe to call on every startup.
pub async fn init_catalog_schema(pool: &SqlitePool) -> Result<()> {
    info!("Initializing catalog schema...");

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS products (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            price TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create products table")?;

    info!("Catalog schema initialized successfully");
    Ok(())
}

/// Insert a new product and return its assigned id.
pub async fn create_product(pool: &SqlitePool, name: &str, price: &str) -> Result<i64> {
    let result = sqlx::query("INSERT INTO products (name, price) VALUES (?, ?)")
        .bind(name)
        .bind(price)
        .execute(pool)
        .await
        .context("Failed to insert product")?;

    let product_id = result.last_insert_rowid();
    info!(product_id, "Product created");

    Ok(product_id)
}

/// List all products in insertion order.
pub async fn list_products(pool: &SqlitePool) -> Result<Vec<Product>> {
    let products =
        sqlx::query_as::<_, Product>("SELECT id, name, price FROM products ORDER BY id")
            .fetch_all(pool)
            .await
            .context("Failed to list products")?;

    Ok(products)
}

/// Look up a single product by id.
pub async fn get_product(pool: &SqlitePool, product_id: i64) -> Result<Option<Product>> {
    let product =
        sqlx::query_as::<_, Product>("SELECT id, name, price FROM products WHERE id = ?")
            .bind(product_id)
            .fetch_optional(pool)
            .await
            .context("Failed to read product")?;

    Ok(product)
}

/// Delete a product by id. Returns whether a row was removed; deleting an
/// id that no longer exists is a no-op, not an error.
pub async fn delete_product(pool: &SqlitePool, product_id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM products WHERE id = ?")
        .bind(product_id)
        .execute(pool)
        .await
        .context("Failed to delete product")?;

    let removed = result.rows_affected() > 0;
    info!(product_id, removed, "Product delete requested");

    Ok(removed)
}
