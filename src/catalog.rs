//! # Ingredient Catalog
//!
//! Purchasable ingredients as users define them: a pack cost (as-purchased
//! price), the pack size, and a yield percentage accounting for trim and
//! cooking loss. The catalog resolves those three numbers into the per-unit
//! cost that recipe lines consume.
//!
//! ## Yield
//!
//! Yield here is the ingredient-level sense of the word: the usable fraction
//! of a purchased pack, expressed as a percentage. A case of lettuce bought
//! for $12.00 with 24 heads at 80% yield costs
//! `12.00 / (24 * 0.80) = $0.625` per usable head.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::recipe_model::IngredientLine;

/// Yield assumed when the stored yield percentage is unusable.
pub const DEFAULT_YIELD_PERCENT: f64 = 100.0;

/// A purchasable ingredient with its pack pricing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogIngredient {
    /// Database id, `None` until the ingredient has been stored
    pub id: Option<i64>,

    /// Ingredient name, unique per user in practice
    pub name: String,

    /// As-purchased cost of one pack
    pub pack_cost: f64,

    /// Units per pack (count, weight, volume; unit-less here)
    pub pack_size: f64,

    /// Usable percentage of the pack after trim/cooking loss, in (0, 100]
    pub yield_percent: f64,
}

impl CatalogIngredient {
    /// Create a catalog ingredient with a full pack yield.
    pub fn new(name: &str, pack_cost: f64, pack_size: f64) -> Self {
        Self {
            id: None,
            name: name.trim().to_string(),
            pack_cost,
            pack_size,
            yield_percent: DEFAULT_YIELD_PERCENT,
        }
    }

    /// Set the usable yield percentage.
    pub fn with_yield_percent(mut self, yield_percent: f64) -> Self {
        self.yield_percent = yield_percent;
        self
    }

    /// Resolve the cost of one usable unit from pack pricing.
    ///
    /// `pack_cost / (pack_size * yield_fraction)`, with each input guarded:
    /// an unusable pack cost counts as zero, an unusable pack size as one,
    /// and an unusable yield as 100%. The result is always finite and
    /// non-negative.
    pub fn unit_cost(&self) -> f64 {
        let pack_cost = if self.pack_cost.is_finite() && self.pack_cost > 0.0 {
            self.pack_cost
        } else {
            0.0
        };
        let pack_size = if self.pack_size.is_finite() && self.pack_size > 0.0 {
            self.pack_size
        } else {
            1.0
        };
        let yield_fraction = self.effective_yield_percent() / 100.0;

        pack_cost / (pack_size * yield_fraction)
    }

    /// Yield percentage used in calculations, clamped to (0, 100].
    pub fn effective_yield_percent(&self) -> f64 {
        if !self.yield_percent.is_finite() || self.yield_percent <= 0.0 {
            return DEFAULT_YIELD_PERCENT;
        }
        self.yield_percent.min(DEFAULT_YIELD_PERCENT)
    }

    /// Build a costed recipe line using this ingredient's resolved unit cost.
    pub fn line_for(&self, quantity: f64) -> IngredientLine {
        IngredientLine::new(&self.name, quantity, self.unit_cost())
    }
}

impl fmt::Display for CatalogIngredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: ${:.2} / {} units at {:.0}% yield (${:.4}/unit)",
            self.name,
            self.pack_cost,
            self.pack_size,
            self.effective_yield_percent(),
            self.unit_cost()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_cost_basic() {
        let flour = CatalogIngredient::new("flour", 20.0, 100.0);
        assert_eq!(flour.unit_cost(), 0.2);
    }

    #[test]
    fn test_unit_cost_applies_yield() {
        let lettuce = CatalogIngredient::new("lettuce", 12.0, 24.0).with_yield_percent(80.0);
        assert_eq!(lettuce.unit_cost(), 0.625);
    }

    #[test]
    fn test_unit_cost_guards_pack_size() {
        let odd = CatalogIngredient::new("odd", 5.0, 0.0);
        assert_eq!(odd.unit_cost(), 5.0);
    }

    #[test]
    fn test_unit_cost_guards_pack_cost() {
        let free = CatalogIngredient::new("free", f64::NAN, 10.0);
        assert_eq!(free.unit_cost(), 0.0);
    }

    #[test]
    fn test_yield_clamped_to_full_pack() {
        let generous = CatalogIngredient::new("water", 1.0, 1.0).with_yield_percent(250.0);
        assert_eq!(generous.effective_yield_percent(), 100.0);

        let broken = CatalogIngredient::new("air", 1.0, 1.0).with_yield_percent(-5.0);
        assert_eq!(broken.effective_yield_percent(), 100.0);
    }

    #[test]
    fn test_line_for_resolves_cost() {
        let lettuce = CatalogIngredient::new("lettuce", 12.0, 24.0).with_yield_percent(80.0);
        let line = lettuce.line_for(2.0);

        assert_eq!(line.name, "lettuce");
        assert_eq!(line.unit_cost, 0.625);
        assert_eq!(line.line_cost, 1.25);
    }
}
