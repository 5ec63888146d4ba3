//! # Recipe Data Model
//!
//! This module defines the data structures for recipes and their ingredient
//! lines, plus the recipe-book grouping used to organise a menu. Records are
//! owned and mutated by the persistence layer and the UI; the cost engine
//! only reads them.
//!
//! ## Core Concepts
//!
//! - **IngredientLine**: one costed entry in a recipe. Its cost is resolved
//!   once, when the line is added, as `quantity * unit_cost`.
//! - **Recipe**: an ordered list of ingredient lines with a yield (servings
//!   produced) and a menu sell price per portion.
//! - **RecipeBook**: a named grouping of recipes (brunch menu, winter menu).
//!
//! ## Usage
//!
//! ```rust
//! use platecost::recipe_model::{IngredientLine, Recipe};
//!
//! let recipe = Recipe::new("Shakshuka")
//!     .with_yield_portions(4.0)
//!     .with_sell_price(11.0)
//!     .with_line(IngredientLine::new("eggs", 8.0, 0.30))
//!     .with_line(IngredientLine::new("tomatoes", 6.0, 0.45));
//!
//! assert_eq!(recipe.ingredients.len(), 2);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// One costed entry in a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientLine {
    /// Name of the ingredient as shown on the recipe
    pub name: String,

    /// Amount used by the recipe (unit-less; unit conversion is out of scope)
    pub quantity: f64,

    /// Cost per unit of quantity, already resolved from the catalog
    pub unit_cost: f64,

    /// Resolved cost contributed by this line, fixed when the line is added
    pub line_cost: f64,
}

impl IngredientLine {
    /// Create a line, resolving its cost from quantity and unit cost.
    ///
    /// Malformed numbers (NaN, infinities, negatives) are coerced to zero
    /// before the cost is resolved, so a line can always be created and a
    /// recipe with bad data still costs out to $0.00 instead of failing.
    pub fn new(name: &str, quantity: f64, unit_cost: f64) -> Self {
        let quantity = coerce_non_negative(quantity);
        let unit_cost = coerce_non_negative(unit_cost);
        Self {
            name: name.trim().to_string(),
            quantity,
            unit_cost,
            line_cost: quantity * unit_cost,
        }
    }
}

/// Replace NaN, infinities, and negatives with zero.
fn coerce_non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

impl fmt::Display for IngredientLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} x {} @ ${:.2} = ${:.2}",
            self.quantity, self.name, self.unit_cost, self.line_cost
        )
    }
}

/// A recipe: ordered ingredient lines, yield, and sell price.
///
/// Line order is display-relevant only; the cost of a recipe does not
/// depend on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// Database id, `None` until the recipe has been stored
    pub id: Option<i64>,

    /// Recipe name (validated, see [`validate_recipe_name`])
    pub name: String,

    /// Recipe book this recipe belongs to, if any
    pub book_id: Option<i64>,

    /// Ordered ingredient lines
    pub ingredients: Vec<IngredientLine>,

    /// Number of servings the recipe produces
    pub yield_portions: f64,

    /// Menu price per portion
    pub sell_price: f64,
}

impl Recipe {
    /// Create an empty recipe with defaults of one portion and no sell price.
    pub fn new(name: &str) -> Self {
        Self {
            id: None,
            name: name.trim().to_string(),
            book_id: None,
            ingredients: Vec::new(),
            yield_portions: 1.0,
            sell_price: 0.0,
        }
    }

    /// Set the number of portions this recipe produces.
    pub fn with_yield_portions(mut self, yield_portions: f64) -> Self {
        self.yield_portions = yield_portions;
        self
    }

    /// Set the menu sell price per portion.
    pub fn with_sell_price(mut self, sell_price: f64) -> Self {
        self.sell_price = sell_price;
        self
    }

    /// Append an ingredient line.
    pub fn with_line(mut self, line: IngredientLine) -> Self {
        self.ingredients.push(line);
        self
    }

    /// Assign this recipe to a recipe book.
    pub fn with_book(mut self, book_id: i64) -> Self {
        self.book_id = Some(book_id);
        self
    }

    /// Append an ingredient line in place.
    pub fn add_line(&mut self, line: IngredientLine) {
        self.ingredients.push(line);
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} ({} portions @ ${:.2}):",
            self.name, self.yield_portions, self.sell_price
        )?;
        for line in &self.ingredients {
            writeln!(f, "  - {}", line)?;
        }
        Ok(())
    }
}

/// A named grouping of recipes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeBook {
    /// Database id, `None` until the book has been stored
    pub id: Option<i64>,

    /// Book name (same validation rules as recipe names)
    pub name: String,
}

impl RecipeBook {
    pub fn new(name: &str) -> Self {
        Self {
            id: None,
            name: name.trim().to_string(),
        }
    }
}

/// Validates a recipe or recipe-book name
pub fn validate_recipe_name(name: &str) -> Result<String, &'static str> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err("empty");
    }

    if trimmed.len() > 255 {
        return Err("too_long");
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_resolves_cost_on_creation() {
        let line = IngredientLine::new("flour", 2.0, 0.50);
        assert_eq!(line.line_cost, 1.0);
        assert_eq!(line.quantity, 2.0);
        assert_eq!(line.unit_cost, 0.50);
    }

    #[test]
    fn test_line_coerces_malformed_numbers() {
        let line = IngredientLine::new("mystery", f64::NAN, -3.0);
        assert_eq!(line.quantity, 0.0);
        assert_eq!(line.unit_cost, 0.0);
        assert_eq!(line.line_cost, 0.0);
    }

    #[test]
    fn test_line_trims_name() {
        let line = IngredientLine::new("  butter  ", 1.0, 2.0);
        assert_eq!(line.name, "butter");
    }

    #[test]
    fn test_recipe_builder() {
        let recipe = Recipe::new("Pancakes")
            .with_yield_portions(4.0)
            .with_sell_price(8.5)
            .with_line(IngredientLine::new("flour", 2.0, 0.5));

        assert_eq!(recipe.name, "Pancakes");
        assert_eq!(recipe.yield_portions, 4.0);
        assert_eq!(recipe.sell_price, 8.5);
        assert_eq!(recipe.ingredients.len(), 1);
        assert!(recipe.id.is_none());
    }

    #[test]
    fn test_recipe_add_line_preserves_order() {
        let mut recipe = Recipe::new("Salad");
        recipe.add_line(IngredientLine::new("lettuce", 1.0, 0.8));
        recipe.add_line(IngredientLine::new("dressing", 0.1, 4.0));

        assert_eq!(recipe.ingredients[0].name, "lettuce");
        assert_eq!(recipe.ingredients[1].name, "dressing");
    }

    #[test]
    fn test_recipe_name_validation() {
        // Valid names
        assert!(validate_recipe_name("Chocolate Chip Cookies").is_ok());
        assert!(validate_recipe_name("  Mom's Lasagna  ").is_ok());

        // Invalid names
        assert!(validate_recipe_name("").is_err());
        assert!(validate_recipe_name("   ").is_err());
        assert!(validate_recipe_name(&"a".repeat(256)).is_err());
    }

    #[test]
    fn test_recipe_name_trimming() {
        let result = validate_recipe_name("  Test Recipe  ");
        assert_eq!(result.unwrap(), "Test Recipe");
    }

    #[test]
    fn test_display_formatting() {
        let recipe = Recipe::new("Soup")
            .with_yield_portions(2.0)
            .with_line(IngredientLine::new("tomatoes", 2.0, 0.5));

        let display = format!("{}", recipe);
        assert!(display.contains("Soup"));
        assert!(display.contains("tomatoes"));
        assert!(display.contains("$0.50"));
    }
}
