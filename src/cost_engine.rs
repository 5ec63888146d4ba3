//! # Recipe Cost Engine
//!
//! This module computes the derived costs of a recipe: total ingredient cost,
//! cost per portion, food-cost percentage, and profit against the menu sell
//! price. It is the single place these formulas live; every caller (reports,
//! CSV export, remote snapshots) goes through it.
//!
//! ## Core Concepts
//!
//! - **Line cost**: each ingredient line carries a cost resolved when the
//!   line was added (`quantity * unit_cost`). The engine sums stored line
//!   costs; it never re-derives them from quantity and rate.
//! - **Cost per portion**: total cost divided by the recipe yield (servings).
//! - **Food-cost percentage**: cost per portion as a percentage of the sell
//!   price, the standard restaurant profitability metric.
//!
//! ## Degenerate Inputs
//!
//! The engine never fails. Non-finite or negative stored costs count as zero,
//! a yield of zero or less is treated as one portion, and a sell price of
//! zero or less produces a food-cost percentage of zero. A recipe with no
//! cost data shows $0.00 everywhere rather than an error.
//!
//! ## Usage
//!
//! ```rust
//! use platecost::cost_engine;
//! use platecost::recipe_model::{IngredientLine, Recipe};
//!
//! let recipe = Recipe::new("Tomato Soup")
//!     .with_yield_portions(2.0)
//!     .with_sell_price(5.0)
//!     .with_line(IngredientLine::new("tomatoes", 2.0, 0.50))
//!     .with_line(IngredientLine::new("cream", 1.0, 1.00));
//!
//! let summary = cost_engine::summarize(&recipe);
//! assert_eq!(summary.cost_per_portion, 1.00);
//! assert_eq!(summary.food_cost_percent, 20.00);
//! ```

use serde::{Deserialize, Serialize};

use crate::recipe_model::{IngredientLine, Recipe};

/// Derived cost figures for a recipe at a point in time.
///
/// A `CostSummary` is a pure projection of a recipe snapshot. It is
/// recomputed on every read and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostSummary {
    /// Sum of all resolved line costs, rounded to cents
    pub total_cost: f64,
    /// Total cost divided by the recipe yield, rounded to cents
    pub cost_per_portion: f64,
    /// Cost per portion as a percentage of the sell price, two decimals
    pub food_cost_percent: f64,
    /// Sell price minus cost per portion, rounded to cents; may be negative
    pub profit: f64,
}

/// Round a currency or percentage value to two decimal places.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Coerce a stored cost to a usable number.
///
/// Invariant: costs are finite and non-negative. Anything else (NaN,
/// infinities, negative values from malformed imports) counts as zero.
fn sanitize_cost(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Yield used for division: one portion when the stored yield is unusable.
fn effective_yield(yield_portions: f64) -> f64 {
    if yield_portions.is_finite() && yield_portions > 0.0 {
        yield_portions
    } else {
        1.0
    }
}

/// Sum the resolved cost of every ingredient line.
///
/// Each line contributes its stored `line_cost` (resolved as
/// `quantity * unit_cost` when the line was created). Malformed stored
/// values count as zero. An empty slice sums to zero.
pub fn total_cost(lines: &[IngredientLine]) -> f64 {
    lines.iter().map(|line| sanitize_cost(line.line_cost)).sum()
}

/// Total cost divided by the recipe yield, rounded to cents.
///
/// A yield of zero, a negative yield, or a non-finite yield is substituted
/// with one portion so the division is always defined.
pub fn cost_per_portion(total_cost: f64, yield_portions: f64) -> f64 {
    round2(sanitize_cost(total_cost) / effective_yield(yield_portions))
}

/// Cost per portion as a percentage of the sell price, rounded to two
/// decimals.
///
/// Defined as zero when the sell price is zero or less; a percentage of a
/// non-positive price has no meaning, and zero is the degenerate answer
/// rather than an error.
pub fn food_cost_percent(cost_per_portion: f64, sell_price: f64) -> f64 {
    if !sell_price.is_finite() || sell_price <= 0.0 {
        return 0.0;
    }
    round2(sanitize_cost(cost_per_portion) / sell_price * 100.0)
}

/// Profit per portion: sell price minus cost per portion, rounded to cents.
///
/// A negative result is a loss, which is a valid outcome.
pub fn profit(sell_price: f64, cost_per_portion: f64) -> f64 {
    let sell = if sell_price.is_finite() { sell_price } else { 0.0 };
    round2(sell - sanitize_cost(cost_per_portion))
}

/// Compute the full cost summary for a recipe snapshot.
///
/// Composes [`total_cost`], [`cost_per_portion`], [`food_cost_percent`] and
/// [`profit`]. Calling it twice on the same recipe yields identical values;
/// there is no hidden state.
pub fn summarize(recipe: &Recipe) -> CostSummary {
    let total = total_cost(&recipe.ingredients);
    let per_portion = cost_per_portion(total, recipe.yield_portions);

    CostSummary {
        total_cost: round2(total),
        cost_per_portion: per_portion,
        food_cost_percent: food_cost_percent(per_portion, recipe.sell_price),
        profit: profit(recipe.sell_price, per_portion),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(quantity: f64, unit_cost: f64) -> IngredientLine {
        IngredientLine::new("test", quantity, unit_cost)
    }

    #[test]
    fn test_total_cost_sums_line_costs() {
        let lines = vec![line(2.0, 0.50), line(1.0, 1.00)];
        assert_eq!(total_cost(&lines), 2.0);
    }

    #[test]
    fn test_total_cost_empty() {
        assert_eq!(total_cost(&[]), 0.0);
    }

    #[test]
    fn test_total_cost_ignores_malformed_stored_costs() {
        let mut bad = line(1.0, 1.0);
        bad.line_cost = f64::NAN;
        let mut negative = line(1.0, 1.0);
        negative.line_cost = -4.0;

        let lines = vec![bad, negative, line(3.0, 2.0)];
        assert_eq!(total_cost(&lines), 6.0);
    }

    #[test]
    fn test_cost_per_portion_divides_by_yield() {
        assert_eq!(cost_per_portion(10.0, 4.0), 2.5);
    }

    #[test]
    fn test_cost_per_portion_guards_bad_yield() {
        assert_eq!(cost_per_portion(10.0, 0.0), cost_per_portion(10.0, 1.0));
        assert_eq!(cost_per_portion(10.0, -3.0), 10.0);
        assert_eq!(cost_per_portion(10.0, f64::NAN), 10.0);
    }

    #[test]
    fn test_cost_per_portion_rounds_to_cents() {
        assert_eq!(cost_per_portion(10.0, 3.0), 3.33);
    }

    #[test]
    fn test_food_cost_percent_basic() {
        assert_eq!(food_cost_percent(1.0, 5.0), 20.0);
    }

    #[test]
    fn test_food_cost_percent_zero_sell_price() {
        assert_eq!(food_cost_percent(2.5, 0.0), 0.0);
        assert_eq!(food_cost_percent(2.5, -1.0), 0.0);
        assert_eq!(food_cost_percent(2.5, f64::NAN), 0.0);
    }

    #[test]
    fn test_food_cost_percent_above_hundred() {
        // Cost exceeding sell price is a valid (unprofitable) state
        assert_eq!(food_cost_percent(6.0, 5.0), 120.0);
    }

    #[test]
    fn test_profit_is_difference() {
        assert_eq!(profit(5.0, 1.0), 4.0);
    }

    #[test]
    fn test_profit_negative_is_loss() {
        assert_eq!(profit(5.0, 6.0), -1.0);
    }

    #[test]
    fn test_summarize_worked_example() {
        let recipe = Recipe::new("Soup")
            .with_yield_portions(2.0)
            .with_sell_price(5.0)
            .with_line(line(2.0, 0.50))
            .with_line(line(1.0, 1.00));

        let summary = summarize(&recipe);
        assert_eq!(summary.total_cost, 2.00);
        assert_eq!(summary.cost_per_portion, 1.00);
        assert_eq!(summary.food_cost_percent, 20.00);
        assert_eq!(summary.profit, 4.00);
    }

    #[test]
    fn test_summarize_empty_recipe() {
        let recipe = Recipe::new("Blank")
            .with_yield_portions(0.0)
            .with_sell_price(0.0);

        let summary = summarize(&recipe);
        assert_eq!(summary.total_cost, 0.0);
        assert_eq!(summary.cost_per_portion, 0.0);
        assert_eq!(summary.food_cost_percent, 0.0);
        assert_eq!(summary.profit, 0.0);
    }

    #[test]
    fn test_summarize_is_idempotent() {
        let recipe = Recipe::new("Stew")
            .with_yield_portions(6.0)
            .with_sell_price(12.5)
            .with_line(line(1.5, 2.2))
            .with_line(line(0.25, 8.0));

        assert_eq!(summarize(&recipe), summarize(&recipe));
    }
}
