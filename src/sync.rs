//! # Remote Snapshot Sync
//!
//! Pushes a JSON snapshot of a user's catalog, recipe books, and recipes to
//! the configured remote document store, and pulls it back for restore. The
//! client retries with exponential backoff and random jitter, and a circuit
//! breaker stops it from hammering an endpoint that keeps failing.
//!
//! Sync is an optional layer: without a configured endpoint the rest of the
//! app runs untouched. Authenticating users against the store is not this
//! crate's concern; the client only forwards a bearer token.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use log::{info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::time::Duration;

use crate::circuit_breaker::CircuitBreaker;
use crate::db::{self, User};
use crate::catalog::CatalogIngredient;
use crate::recipe_model::{Recipe, RecipeBook};
use crate::sync_config::{RecoveryConfig, SyncConfig};

/// A full point-in-time copy of one user's data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// External identity uid the snapshot belongs to
    pub auth_uid: String,
    /// When the snapshot was assembled
    pub exported_at: DateTime<Utc>,
    /// Catalog ingredients with their pack pricing
    pub ingredients: Vec<CatalogIngredient>,
    /// Recipe books
    pub books: Vec<RecipeBook>,
    /// Recipes with their costed lines
    pub recipes: Vec<Recipe>,
}

/// Assemble a snapshot of everything the user has stored.
pub async fn build_snapshot(pool: &PgPool, user: &User) -> Result<Snapshot> {
    let ingredients = db::list_catalog_ingredients(pool, user.id)
        .await?
        .iter()
        .map(|record| record.as_catalog())
        .collect();

    let books = db::list_recipe_books(pool, user.id)
        .await?
        .into_iter()
        .map(|record| RecipeBook {
            id: Some(record.id),
            name: record.name,
        })
        .collect();

    let recipes = db::load_recipes_for_user(pool, user.id).await?;

    Ok(Snapshot {
        auth_uid: user.auth_uid.clone(),
        exported_at: Utc::now(),
        ingredients,
        books,
        recipes,
    })
}

/// HTTP client for the remote document store.
pub struct SyncClient {
    config: SyncConfig,
    http: reqwest::Client,
    breaker: CircuitBreaker,
}

impl SyncClient {
    /// Build a client from the given configuration.
    pub fn new(config: SyncConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.recovery.operation_timeout_secs))
            .build()
            .context("Failed to build HTTP client for sync")?;

        let breaker = CircuitBreaker::new(config.recovery.clone());

        Ok(Self {
            config,
            http,
            breaker,
        })
    }

    /// Push a snapshot to the document store, retrying on failure.
    ///
    /// Retries up to `max_retries` times with exponential backoff and
    /// random jitter between attempts. Fails fast while the circuit
    /// breaker is open.
    pub async fn push_snapshot(&self, snapshot: &Snapshot) -> Result<()> {
        if self.breaker.is_open() {
            return Err(anyhow!("Sync circuit breaker is open, skipping push"));
        }

        let url = self.document_url(&snapshot.auth_uid);
        let max_attempts = self.config.recovery.max_retries + 1;

        for attempt in 0..max_attempts {
            let mut request = self.http.post(&url).json(snapshot);
            if let Some(api_key) = &self.config.api_key {
                request = request.bearer_auth(api_key);
            }

            match request.send().await {
                Ok(response) if response.status().is_success() => {
                    self.breaker.record_success();
                    info!("Pushed snapshot for {} to {}", snapshot.auth_uid, url);
                    return Ok(());
                }
                Ok(response) => {
                    warn!(
                        "Snapshot push attempt {} failed with status {}",
                        attempt + 1,
                        response.status()
                    );
                    self.breaker.record_failure();
                }
                Err(e) => {
                    warn!("Snapshot push attempt {} failed: {}", attempt + 1, e);
                    self.breaker.record_failure();
                }
            }

            if attempt + 1 < max_attempts {
                tokio::time::sleep(self.retry_delay(attempt)).await;
            }
        }

        Err(anyhow!(
            "Failed to push snapshot for {} after {} attempts",
            snapshot.auth_uid,
            max_attempts
        ))
    }

    /// Fetch the stored snapshot for a user, `None` when the store has none.
    pub async fn pull_snapshot(&self, auth_uid: &str) -> Result<Option<Snapshot>> {
        if self.breaker.is_open() {
            return Err(anyhow!("Sync circuit breaker is open, skipping pull"));
        }

        let url = self.document_url(auth_uid);
        let mut request = self.http.get(&url);
        if let Some(api_key) = &self.config.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await;
        match response {
            Ok(response) if response.status() == reqwest::StatusCode::NOT_FOUND => {
                self.breaker.record_success();
                Ok(None)
            }
            Ok(response) if response.status().is_success() => {
                self.breaker.record_success();
                let snapshot = response
                    .json::<Snapshot>()
                    .await
                    .context("Failed to decode stored snapshot")?;
                Ok(Some(snapshot))
            }
            Ok(response) => {
                self.breaker.record_failure();
                Err(anyhow!("Snapshot pull failed with status {}", response.status()))
            }
            Err(e) => {
                self.breaker.record_failure();
                Err(e).context("Snapshot pull request failed")
            }
        }
    }

    /// Document URL for one user's snapshot.
    fn document_url(&self, auth_uid: &str) -> String {
        format!("{}/documents/{}", self.config.endpoint, auth_uid)
    }

    /// Delay before the next retry: exponential backoff plus random jitter.
    fn retry_delay(&self, attempt: u32) -> Duration {
        let base = backoff_base_ms(&self.config.recovery, attempt);
        let jitter = rand::thread_rng().gen_range(0..=self.config.recovery.base_retry_delay_ms / 2);
        Duration::from_millis(base + jitter)
    }
}

/// Deterministic part of the backoff schedule: base * 2^attempt, capped.
fn backoff_base_ms(config: &RecoveryConfig, attempt: u32) -> u64 {
    config
        .base_retry_delay_ms
        .saturating_mul(1u64 << attempt.min(16))
        .min(config.max_retry_delay_ms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe_model::IngredientLine;

    #[test]
    fn test_backoff_doubles_and_caps() {
        let config = RecoveryConfig {
            base_retry_delay_ms: 1000,
            max_retry_delay_ms: 10000,
            ..RecoveryConfig::default()
        };

        assert_eq!(backoff_base_ms(&config, 0), 1000);
        assert_eq!(backoff_base_ms(&config, 1), 2000);
        assert_eq!(backoff_base_ms(&config, 2), 4000);
        assert_eq!(backoff_base_ms(&config, 10), 10000);
    }

    #[test]
    fn test_client_builds_document_url() {
        let client = SyncClient::new(SyncConfig::new("https://store.example.com/v1/")).unwrap();
        assert_eq!(
            client.document_url("user-1"),
            "https://store.example.com/v1/documents/user-1"
        );
    }

    #[test]
    fn test_snapshot_serde_round_trip() {
        let snapshot = Snapshot {
            auth_uid: "user-1".to_string(),
            exported_at: Utc::now(),
            ingredients: vec![CatalogIngredient::new("flour", 20.0, 100.0)],
            books: vec![RecipeBook::new("Brunch")],
            recipes: vec![Recipe::new("Pancakes")
                .with_yield_portions(4.0)
                .with_sell_price(8.0)
                .with_line(IngredientLine::new("flour", 2.0, 0.2))],
        };

        let json = serde_json::to_string(&snapshot).unwrap();
        let restored: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, snapshot);
    }
}
