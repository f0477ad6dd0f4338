use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use teloxide::dispatching::dialogue::{self, InMemStorage};
use teloxide::prelude::*;
use tracing::info;

use fastkitchen::bot::{callback_handler, message_handler};
use fastkitchen::catalog;
use fastkitchen::config::Config;
use fastkitchen::dialogue::OrderDialogueState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    info!("Starting FastKitchen ordering bot");

    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let config = Config::from_env()?;

    info!("Initializing catalog at: {}", config.database_url);

    // Bounded pool acquisition so a stuck store surfaces as an error instead
    // of a hung transition.
    let connect_options =
        SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(connect_options)
        .await?;

    catalog::init_catalog_schema(&pool).await?;

    let bot = Bot::new(config.bot_token.clone());

    info!("Bot initialized, starting dispatcher");

    let handler = dialogue::enter::<Update, InMemStorage<OrderDialogueState>, OrderDialogueState, _>()
        .branch(Update::filter_message().endpoint(message_handler))
        .branch(Update::filter_callback_query().endpoint(callback_handler));

    // The default per-chat distribution keeps all transitions for one user
    // sequential while different users are handled concurrently.
    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![
            InMemStorage::<OrderDialogueState>::new(),
            pool,
            Arc::new(config)
        ])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
