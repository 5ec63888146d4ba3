//! # Platecost
//!
//! Recipe costing backend for restaurants: an ingredient catalog with pack
//! pricing, recipes composed from costed lines, recipe books, and the cost
//! engine that derives cost per portion, food-cost percentage, and profit.

pub mod amount_parsing;
pub mod catalog;
pub mod circuit_breaker;
pub mod cost_engine;
pub mod csv_io;
pub mod db;
pub mod recipe_model;
pub mod report;
pub mod sync;
pub mod sync_config;
pub mod table_config;
