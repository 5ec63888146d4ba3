use anyhow::Result;
use log::{info, warn};
use sqlx::postgres::PgPool;
use std::env;

use platecost::db;
use platecost::report;
use platecost::sync::{self, SyncClient};
use platecost::sync_config::SyncConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    info!("Starting platecost costing report");

    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Get database connection string from environment
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    info!("Connecting to database");
    let pool = PgPool::connect(&database_url).await?;

    // Initialize database schema
    db::init_database_schema(&pool).await?;

    // Remote snapshot sync is optional; absent config disables it
    let sync_client = match SyncConfig::from_env() {
        Some(config) => Some(SyncClient::new(config)?),
        None => None,
    };

    for user in db::list_users(&pool).await? {
        println!("=== Account {} ===\n", user.auth_uid);

        let recipes = db::load_recipes_for_user(&pool, user.id).await?;

        for book in db::list_recipe_books(&pool, user.id).await? {
            let in_book: Vec<_> = recipes
                .iter()
                .filter(|r| r.book_id == Some(book.id))
                .cloned()
                .collect();
            println!("{}", report::book_report(&book.name, &in_book));
        }

        let unfiled: Vec<_> = recipes
            .iter()
            .filter(|r| r.book_id.is_none())
            .cloned()
            .collect();
        if !unfiled.is_empty() {
            println!("{}", report::book_report("Unfiled recipes", &unfiled));
        }

        if let Some(client) = &sync_client {
            let snapshot = sync::build_snapshot(&pool, &user).await?;
            if let Err(e) = client.push_snapshot(&snapshot).await {
                warn!("Snapshot push failed for {}: {}", user.auth_uid, e);
            }
        }
    }

    info!("Costing report complete");
    Ok(())
}
