//! # Database Layer
//!
//! PostgreSQL persistence for users, the ingredient catalog, recipes and
//! their lines, recipe books, and saved table configurations. All access
//! goes through a shared [`PgPool`].
//!
//! Users are keyed by the opaque uid of the external identity provider;
//! authentication itself happens outside this crate. Every stored record is
//! scoped to a user.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::info;
use sqlx::PgPool;

use crate::catalog::CatalogIngredient;
use crate::recipe_model::{IngredientLine, Recipe};
use crate::table_config::TableConfig;

/// A registered user, keyed by the external identity provider's uid.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub auth_uid: String,
    pub created_at: DateTime<Utc>,
}

/// A stored catalog ingredient row.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct IngredientRecord {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub pack_cost: f64,
    pub pack_size: f64,
    pub yield_percent: f64,
    pub created_at: DateTime<Utc>,
}

impl IngredientRecord {
    /// View this row as a catalog ingredient for cost resolution.
    pub fn as_catalog(&self) -> CatalogIngredient {
        CatalogIngredient {
            id: Some(self.id),
            name: self.name.clone(),
            pack_cost: self.pack_cost,
            pack_size: self.pack_size,
            yield_percent: self.yield_percent,
        }
    }
}

/// A stored recipe book row.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct RecipeBookRecord {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A stored recipe row, without its lines.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct RecipeRecord {
    pub id: i64,
    pub user_id: i64,
    pub book_id: Option<i64>,
    pub name: String,
    pub yield_portions: f64,
    pub sell_price: f64,
    pub created_at: DateTime<Utc>,
}

/// A stored recipe line row.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct RecipeLineRecord {
    pub id: i64,
    pub recipe_id: i64,
    pub position: i32,
    pub name: String,
    pub quantity: f64,
    pub unit_cost: f64,
    pub line_cost: f64,
}

/// Initialize the database schema
pub async fn init_database_schema(pool: &PgPool) -> Result<()> {
    info!("Initializing database schema...");

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users (
            id BIGSERIAL PRIMARY KEY,
            auth_uid TEXT NOT NULL UNIQUE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create users table")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS ingredients (
            id BIGSERIAL PRIMARY KEY,
            user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            pack_cost DOUBLE PRECISION NOT NULL DEFAULT 0,
            pack_size DOUBLE PRECISION NOT NULL DEFAULT 1,
            yield_percent DOUBLE PRECISION NOT NULL DEFAULT 100,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create ingredients table")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS recipe_books (
            id BIGSERIAL PRIMARY KEY,
            user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create recipe_books table")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS recipes (
            id BIGSERIAL PRIMARY KEY,
            user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            book_id BIGINT REFERENCES recipe_books(id) ON DELETE SET NULL,
            name TEXT NOT NULL,
            yield_portions DOUBLE PRECISION NOT NULL DEFAULT 1,
            sell_price DOUBLE PRECISION NOT NULL DEFAULT 0,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create recipes table")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS recipe_lines (
            id BIGSERIAL PRIMARY KEY,
            recipe_id BIGINT NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
            position INTEGER NOT NULL DEFAULT 0,
            name TEXT NOT NULL,
            quantity DOUBLE PRECISION NOT NULL DEFAULT 0,
            unit_cost DOUBLE PRECISION NOT NULL DEFAULT 0,
            line_cost DOUBLE PRECISION NOT NULL DEFAULT 0
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create recipe_lines table")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS table_prefs (
            user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            table_name TEXT NOT NULL,
            config TEXT NOT NULL,
            PRIMARY KEY (user_id, table_name)
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create table_prefs table")?;

    info!("Database schema initialized successfully");
    Ok(())
}

/// Get an existing user by auth uid, creating the row on first sight.
pub async fn get_or_create_user(pool: &PgPool, auth_uid: &str) -> Result<User> {
    if let Some(user) = get_user_by_auth_uid(pool, auth_uid).await? {
        return Ok(user);
    }

    info!("Creating new user for auth_uid: {}", auth_uid);

    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (auth_uid) VALUES ($1)
         ON CONFLICT (auth_uid) DO UPDATE SET auth_uid = EXCLUDED.auth_uid
         RETURNING id, auth_uid, created_at",
    )
    .bind(auth_uid)
    .fetch_one(pool)
    .await
    .context("Failed to create user")?;

    Ok(user)
}

/// Look up a user by auth uid.
pub async fn get_user_by_auth_uid(pool: &PgPool, auth_uid: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, auth_uid, created_at FROM users WHERE auth_uid = $1",
    )
    .bind(auth_uid)
    .fetch_optional(pool)
    .await
    .context("Failed to read user")?;

    Ok(user)
}

/// List all users, oldest first.
pub async fn list_users(pool: &PgPool) -> Result<Vec<User>> {
    let users =
        sqlx::query_as::<_, User>("SELECT id, auth_uid, created_at FROM users ORDER BY id")
            .fetch_all(pool)
            .await
            .context("Failed to list users")?;

    Ok(users)
}

/// Create a catalog ingredient for a user.
pub async fn create_catalog_ingredient(
    pool: &PgPool,
    user_id: i64,
    ingredient: &CatalogIngredient,
) -> Result<i64> {
    info!("Creating catalog ingredient '{}' for user {}", ingredient.name, user_id);

    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO ingredients (user_id, name, pack_cost, pack_size, yield_percent)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id",
    )
    .bind(user_id)
    .bind(&ingredient.name)
    .bind(ingredient.pack_cost)
    .bind(ingredient.pack_size)
    .bind(ingredient.yield_percent)
    .fetch_one(pool)
    .await
    .context("Failed to insert catalog ingredient")?;

    Ok(id)
}

/// Read a catalog ingredient by id.
pub async fn get_catalog_ingredient(
    pool: &PgPool,
    ingredient_id: i64,
) -> Result<Option<IngredientRecord>> {
    let record = sqlx::query_as::<_, IngredientRecord>(
        "SELECT id, user_id, name, pack_cost, pack_size, yield_percent, created_at
         FROM ingredients WHERE id = $1",
    )
    .bind(ingredient_id)
    .fetch_optional(pool)
    .await
    .context("Failed to read catalog ingredient")?;

    Ok(record)
}

/// List a user's catalog ingredients, alphabetically.
pub async fn list_catalog_ingredients(
    pool: &PgPool,
    user_id: i64,
) -> Result<Vec<IngredientRecord>> {
    let records = sqlx::query_as::<_, IngredientRecord>(
        "SELECT id, user_id, name, pack_cost, pack_size, yield_percent, created_at
         FROM ingredients WHERE user_id = $1 ORDER BY name, id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .context("Failed to list catalog ingredients")?;

    Ok(records)
}

/// Update a catalog ingredient's pricing fields.
pub async fn update_catalog_ingredient(
    pool: &PgPool,
    ingredient_id: i64,
    ingredient: &CatalogIngredient,
) -> Result<bool> {
    info!("Updating catalog ingredient with ID: {}", ingredient_id);

    let result = sqlx::query(
        "UPDATE ingredients
         SET name = $1, pack_cost = $2, pack_size = $3, yield_percent = $4
         WHERE id = $5",
    )
    .bind(&ingredient.name)
    .bind(ingredient.pack_cost)
    .bind(ingredient.pack_size)
    .bind(ingredient.yield_percent)
    .bind(ingredient_id)
    .execute(pool)
    .await
    .context("Failed to update catalog ingredient")?;

    Ok(result.rows_affected() > 0)
}

/// Delete a catalog ingredient.
pub async fn delete_catalog_ingredient(pool: &PgPool, ingredient_id: i64) -> Result<bool> {
    info!("Deleting catalog ingredient with ID: {}", ingredient_id);

    let result = sqlx::query("DELETE FROM ingredients WHERE id = $1")
        .bind(ingredient_id)
        .execute(pool)
        .await
        .context("Failed to delete catalog ingredient")?;

    Ok(result.rows_affected() > 0)
}

/// Create a recipe book for a user.
pub async fn create_recipe_book(pool: &PgPool, user_id: i64, name: &str) -> Result<i64> {
    info!("Creating recipe book '{}' for user {}", name, user_id);

    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO recipe_books (user_id, name) VALUES ($1, $2) RETURNING id",
    )
    .bind(user_id)
    .bind(name)
    .fetch_one(pool)
    .await
    .context("Failed to insert recipe book")?;

    Ok(id)
}

/// List a user's recipe books, oldest first.
pub async fn list_recipe_books(pool: &PgPool, user_id: i64) -> Result<Vec<RecipeBookRecord>> {
    let books = sqlx::query_as::<_, RecipeBookRecord>(
        "SELECT id, user_id, name, created_at FROM recipe_books
         WHERE user_id = $1 ORDER BY id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .context("Failed to list recipe books")?;

    Ok(books)
}

/// Rename a recipe book.
pub async fn rename_recipe_book(pool: &PgPool, book_id: i64, name: &str) -> Result<bool> {
    let result = sqlx::query("UPDATE recipe_books SET name = $1 WHERE id = $2")
        .bind(name)
        .bind(book_id)
        .execute(pool)
        .await
        .context("Failed to rename recipe book")?;

    Ok(result.rows_affected() > 0)
}

/// Delete a recipe book. Recipes in the book are kept and unfiled.
pub async fn delete_recipe_book(pool: &PgPool, book_id: i64) -> Result<bool> {
    info!("Deleting recipe book with ID: {}", book_id);

    let result = sqlx::query("DELETE FROM recipe_books WHERE id = $1")
        .bind(book_id)
        .execute(pool)
        .await
        .context("Failed to delete recipe book")?;

    Ok(result.rows_affected() > 0)
}

/// Store a recipe and its lines, returning the new recipe id.
pub async fn create_recipe(pool: &PgPool, user_id: i64, recipe: &Recipe) -> Result<i64> {
    info!("Creating recipe '{}' for user {}", recipe.name, user_id);

    let mut tx = pool.begin().await.context("Failed to begin transaction")?;

    let recipe_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO recipes (user_id, book_id, name, yield_portions, sell_price)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id",
    )
    .bind(user_id)
    .bind(recipe.book_id)
    .bind(&recipe.name)
    .bind(recipe.yield_portions)
    .bind(recipe.sell_price)
    .fetch_one(&mut *tx)
    .await
    .context("Failed to insert recipe")?;

    insert_lines(&mut tx, recipe_id, &recipe.ingredients).await?;

    tx.commit().await.context("Failed to commit recipe insert")?;

    info!("Recipe created with ID: {}", recipe_id);
    Ok(recipe_id)
}

/// Load a full recipe, lines included, by id.
pub async fn get_recipe(pool: &PgPool, recipe_id: i64) -> Result<Option<Recipe>> {
    let Some(record) = sqlx::query_as::<_, RecipeRecord>(
        "SELECT id, user_id, book_id, name, yield_portions, sell_price, created_at
         FROM recipes WHERE id = $1",
    )
    .bind(recipe_id)
    .fetch_optional(pool)
    .await
    .context("Failed to read recipe")?
    else {
        return Ok(None);
    };

    let lines = get_recipe_lines(pool, recipe_id).await?;
    Ok(Some(assemble_recipe(&record, lines)))
}

/// Lines of a recipe in display order.
pub async fn get_recipe_lines(pool: &PgPool, recipe_id: i64) -> Result<Vec<RecipeLineRecord>> {
    let lines = sqlx::query_as::<_, RecipeLineRecord>(
        "SELECT id, recipe_id, position, name, quantity, unit_cost, line_cost
         FROM recipe_lines WHERE recipe_id = $1 ORDER BY position, id",
    )
    .bind(recipe_id)
    .fetch_all(pool)
    .await
    .context("Failed to read recipe lines")?;

    Ok(lines)
}

/// List a user's recipe rows (without lines), alphabetically.
pub async fn list_recipes(pool: &PgPool, user_id: i64) -> Result<Vec<RecipeRecord>> {
    let records = sqlx::query_as::<_, RecipeRecord>(
        "SELECT id, user_id, book_id, name, yield_portions, sell_price, created_at
         FROM recipes WHERE user_id = $1 ORDER BY name, id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .context("Failed to list recipes")?;

    Ok(records)
}

/// List the recipe rows filed in a book.
pub async fn list_recipes_in_book(pool: &PgPool, book_id: i64) -> Result<Vec<RecipeRecord>> {
    let records = sqlx::query_as::<_, RecipeRecord>(
        "SELECT id, user_id, book_id, name, yield_portions, sell_price, created_at
         FROM recipes WHERE book_id = $1 ORDER BY name, id",
    )
    .bind(book_id)
    .fetch_all(pool)
    .await
    .context("Failed to list recipes in book")?;

    Ok(records)
}

/// Load every recipe of a user as full domain values, lines included.
pub async fn load_recipes_for_user(pool: &PgPool, user_id: i64) -> Result<Vec<Recipe>> {
    let mut recipes = Vec::new();
    for record in list_recipes(pool, user_id).await? {
        let lines = get_recipe_lines(pool, record.id).await?;
        recipes.push(assemble_recipe(&record, lines));
    }
    Ok(recipes)
}

/// Replace a stored recipe's fields and lines with the given snapshot.
pub async fn update_recipe(pool: &PgPool, recipe_id: i64, recipe: &Recipe) -> Result<bool> {
    info!("Updating recipe with ID: {}", recipe_id);

    let mut tx = pool.begin().await.context("Failed to begin transaction")?;

    let result = sqlx::query(
        "UPDATE recipes
         SET name = $1, book_id = $2, yield_portions = $3, sell_price = $4
         WHERE id = $5",
    )
    .bind(&recipe.name)
    .bind(recipe.book_id)
    .bind(recipe.yield_portions)
    .bind(recipe.sell_price)
    .bind(recipe_id)
    .execute(&mut *tx)
    .await
    .context("Failed to update recipe")?;

    if result.rows_affected() == 0 {
        return Ok(false);
    }

    sqlx::query("DELETE FROM recipe_lines WHERE recipe_id = $1")
        .bind(recipe_id)
        .execute(&mut *tx)
        .await
        .context("Failed to clear recipe lines")?;

    insert_lines(&mut tx, recipe_id, &recipe.ingredients).await?;

    tx.commit().await.context("Failed to commit recipe update")?;
    Ok(true)
}

/// Delete a recipe and its lines.
pub async fn delete_recipe(pool: &PgPool, recipe_id: i64) -> Result<bool> {
    info!("Deleting recipe with ID: {}", recipe_id);

    let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
        .bind(recipe_id)
        .execute(pool)
        .await
        .context("Failed to delete recipe")?;

    Ok(result.rows_affected() > 0)
}

/// File a recipe in a book, or unfile it with `None`.
pub async fn assign_recipe_to_book(
    pool: &PgPool,
    recipe_id: i64,
    book_id: Option<i64>,
) -> Result<bool> {
    let result = sqlx::query("UPDATE recipes SET book_id = $1 WHERE id = $2")
        .bind(book_id)
        .bind(recipe_id)
        .execute(pool)
        .await
        .context("Failed to assign recipe to book")?;

    Ok(result.rows_affected() > 0)
}

/// Save a user's column configuration for one table, replacing any previous.
pub async fn save_table_config(pool: &PgPool, user_id: i64, config: &TableConfig) -> Result<()> {
    let json = config.to_json()?;

    sqlx::query(
        "INSERT INTO table_prefs (user_id, table_name, config)
         VALUES ($1, $2, $3)
         ON CONFLICT (user_id, table_name) DO UPDATE SET config = EXCLUDED.config",
    )
    .bind(user_id)
    .bind(&config.table)
    .bind(json)
    .execute(pool)
    .await
    .context("Failed to save table config")?;

    Ok(())
}

/// Load a user's saved column configuration for one table.
pub async fn load_table_config(
    pool: &PgPool,
    user_id: i64,
    table_name: &str,
) -> Result<Option<TableConfig>> {
    let json = sqlx::query_scalar::<_, String>(
        "SELECT config FROM table_prefs WHERE user_id = $1 AND table_name = $2",
    )
    .bind(user_id)
    .bind(table_name)
    .fetch_optional(pool)
    .await
    .context("Failed to read table config")?;

    match json {
        Some(json) => Ok(Some(TableConfig::from_json(&json)?)),
        None => Ok(None),
    }
}

/// Insert lines for a recipe, preserving display order via `position`.
async fn insert_lines(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    recipe_id: i64,
    lines: &[IngredientLine],
) -> Result<()> {
    for (position, line) in lines.iter().enumerate() {
        sqlx::query(
            "INSERT INTO recipe_lines (recipe_id, position, name, quantity, unit_cost, line_cost)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(recipe_id)
        .bind(position as i32)
        .bind(&line.name)
        .bind(line.quantity)
        .bind(line.unit_cost)
        .bind(line.line_cost)
        .execute(&mut **tx)
        .await
        .context("Failed to insert recipe line")?;
    }
    Ok(())
}

/// Build a domain recipe from its stored row and lines.
fn assemble_recipe(record: &RecipeRecord, lines: Vec<RecipeLineRecord>) -> Recipe {
    Recipe {
        id: Some(record.id),
        name: record.name.clone(),
        book_id: record.book_id,
        ingredients: lines
            .into_iter()
            .map(|line| IngredientLine {
                name: line.name,
                quantity: line.quantity,
                unit_cost: line.unit_cost,
                line_cost: line.line_cost,
            })
            .collect(),
        yield_portions: record.yield_portions,
        sell_price: record.sell_price,
    }
}
