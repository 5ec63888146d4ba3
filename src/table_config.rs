//! # Table Column Configuration
//!
//! Per-user configuration of the ingredient and recipe tables: which columns
//! are shown and in what order. The configuration is plain data serialized
//! to JSON for persistence; applying it to an actual rendered table is the
//! UI layer's job.
//!
//! Unknown column keys are ignored rather than rejected, so a stale saved
//! configuration keeps working after a column is added or renamed.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// One column of a data table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Stable key identifying the column ("pack_cost", "food_cost_percent")
    pub key: String,
    /// Human-readable header label
    pub label: String,
    /// Whether the column is currently shown
    pub visible: bool,
}

impl ColumnSpec {
    fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            visible: true,
        }
    }
}

/// Column layout of one named table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableConfig {
    /// Table identifier ("ingredients", "recipes")
    pub table: String,
    /// Columns in display order
    pub columns: Vec<ColumnSpec>,
}

impl TableConfig {
    /// Default layout of the ingredient catalog table.
    pub fn ingredients_default() -> Self {
        Self {
            table: "ingredients".to_string(),
            columns: vec![
                ColumnSpec::new("name", "Ingredient"),
                ColumnSpec::new("pack_cost", "Pack Cost"),
                ColumnSpec::new("pack_size", "Pack Size"),
                ColumnSpec::new("yield_percent", "Yield %"),
                ColumnSpec::new("unit_cost", "Unit Cost"),
            ],
        }
    }

    /// Default layout of the recipe table.
    pub fn recipes_default() -> Self {
        Self {
            table: "recipes".to_string(),
            columns: vec![
                ColumnSpec::new("name", "Recipe"),
                ColumnSpec::new("book", "Book"),
                ColumnSpec::new("yield_portions", "Portions"),
                ColumnSpec::new("total_cost", "Total Cost"),
                ColumnSpec::new("cost_per_portion", "Cost / Portion"),
                ColumnSpec::new("sell_price", "Sell Price"),
                ColumnSpec::new("food_cost_percent", "Food Cost %"),
                ColumnSpec::new("profit", "Profit"),
            ],
        }
    }

    /// Show or hide a column. Returns `false` when the key is unknown.
    pub fn set_visible(&mut self, key: &str, visible: bool) -> bool {
        match self.columns.iter_mut().find(|c| c.key == key) {
            Some(column) => {
                column.visible = visible;
                true
            }
            None => false,
        }
    }

    /// Move a column to a new position, clamping the index to the column
    /// count. Returns `false` when the key is unknown.
    pub fn move_column(&mut self, key: &str, new_index: usize) -> bool {
        let Some(current) = self.columns.iter().position(|c| c.key == key) else {
            return false;
        };
        let column = self.columns.remove(current);
        let target = new_index.min(self.columns.len());
        self.columns.insert(target, column);
        true
    }

    /// Columns currently shown, in display order.
    pub fn visible_columns(&self) -> Vec<&ColumnSpec> {
        self.columns.iter().filter(|c| c.visible).collect()
    }

    /// Serialize for persistence.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).context("Failed to serialize table config")
    }

    /// Deserialize a stored configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse stored table config")
    }
}
