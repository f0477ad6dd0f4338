//! Order dispatcher: the terminal action of the quantity step.
//!
//! Resolves the picked product, formats the fixed-shape notice, and delivers
//! it to the admin chat. Delivery is fire-and-forget with a single retry; a
//! persistent failure is logged and does not roll back the transition that
//! preceded it.

use anyhow::Result;
use sqlx::sqlite::SqlitePool;
use std::time::Duration;
use teloxide::prelude::*;
use tracing::{error, info, warn};

use crate::catalog::{self, Product};

/// Everything the admin needs to fulfil an order.
#[derive(Debug, Clone)]
pub struct OrderRequest {
    pub product_id: i64,
    /// Free-text quantity as the customer typed it (pieces or kg).
    pub quantity: String,
    pub customer_name: String,
    pub customer_username: Option<String>,
    pub customer_id: u64,
}

/// Result of attempting to dispatch an order.
#[derive(Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The notice was handed to the outbound channel.
    Sent,
    /// The picked product was deleted between listing and ordering.
    ProductMissing,
}

/// Fixed-shape notice delivered to the admin.
pub fn format_notice(product: &Product, request: &OrderRequest) -> String {
    format!(
        "🆕 New order!\n\n\
         📦 Product: {}\n\
         🔢 Quantity: {}\n\n\
         👤 Customer:\n\
         Name: {}\n\
         Username: @{}\n\
         ID: {}",
        product.name,
        request.quantity,
        request.customer_name,
        request.customer_username.as_deref().unwrap_or("-"),
        request.customer_id,
    )
}

/// Resolve the product and deliver the order notice to the admin chat.
pub async fn dispatch(
    bot: &Bot,
    pool: &SqlitePool,
    admin_chat: ChatId,
    request: &OrderRequest,
) -> Result<DispatchOutcome> {
    let product = match catalog::get_product(pool, request.product_id).await? {
        Some(product) => product,
        None => {
            warn!(
                product_id = request.product_id,
                customer_id = request.customer_id,
                "Ordered product no longer exists"
            );
            return Ok(DispatchOutcome::ProductMissing);
        }
    };

    let notice = format_notice(&product, request);

    if let Err(first) = bot.send_message(admin_chat, notice.clone()).await {
        warn!(error = %first, "Admin notification failed, retrying once");
        tokio::time::sleep(Duration::from_millis(500)).await;
        if let Err(second) = bot.send_message(admin_chat, notice).await {
            // The catalog read and the state transition stand regardless.
            error!(
                error = %second,
                customer_id = request.customer_id,
                "Admin notification failed after retry"
            );
        }
    }

    info!(
        product_id = product.id,
        customer_id = request.customer_id,
        "Order dispatched to admin"
    );

    Ok(DispatchOutcome::Sent)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_product() -> Product {
        Product {
            id: 1,
            name: "Burger".to_string(),
            price: "25000".to_string(),
        }
    }

    #[test]
    fn test_notice_contains_order_details() {
        let request = OrderRequest {
            product_id: 1,
            quantity: "2".to_string(),
            customer_name: "Ali".to_string(),
            customer_username: Some("ali_v".to_string()),
            customer_id: 12345,
        };

        let notice = format_notice(&test_product(), &request);
        assert!(notice.contains("Burger"));
        assert!(notice.contains("Quantity: 2"));
        assert!(notice.contains("Name: Ali"));
        assert!(notice.contains("@ali_v"));
        assert!(notice.contains("ID: 12345"));
    }

    #[test]
    fn test_notice_without_username() {
        let request = OrderRequest {
            product_id: 1,
            quantity: "1 kg".to_string(),
            customer_name: "Ali".to_string(),
            customer_username: None,
            customer_id: 12345,
        };

        let notice = format_notice(&test_product(), &request);
        assert!(notice.contains("Username: @-"));
        assert!(notice.contains("Quantity: 1 kg"));
    }
}
