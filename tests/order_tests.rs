use anyhow::Result;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use fastkitchen::catalog::{create_product, get_product, init_catalog_schema};
use fastkitchen::order::{format_notice, OrderRequest};

async fn setup_test_pool() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    init_catalog_schema(&pool).await?;
    Ok(pool)
}

/// The visible half of an order: picked product resolved from the catalog,
/// quantity and customer identity rendered into the admin notice
#[tokio::test]
async fn test_order_notice_from_catalog_product() -> Result<()> {
    let pool = setup_test_pool().await?;
    let id = create_product(&pool, "Burger", "25000").await?;

    let product = get_product(&pool, id).await?.unwrap();
    let request = OrderRequest {
        product_id: id,
        quantity: "2".to_string(),
        customer_name: "Ali".to_string(),
        customer_username: Some("ali_v".to_string()),
        customer_id: 12345,
    };

    let notice = format_notice(&product, &request);
    assert!(notice.contains("Product: Burger"));
    assert!(notice.contains("Quantity: 2"));
    assert!(notice.contains("Name: Ali"));
    assert!(notice.contains("Username: @ali_v"));
    assert!(notice.contains("ID: 12345"));

    Ok(())
}

/// A product deleted between listing and ordering resolves to nothing,
/// which the dispatcher reports as a distinct outcome
#[tokio::test]
async fn test_stale_product_resolves_to_none() -> Result<()> {
    let pool = setup_test_pool().await?;
    let id = create_product(&pool, "Burger", "25000").await?;

    fastkitchen::catalog::delete_product(&pool, id).await?;

    assert!(get_product(&pool, id).await?.is_none());

    Ok(())
}
