//! # Costing Reports
//!
//! Plain-text cost reports for recipes and recipe books, built from the
//! cost engine's numbers. The UI renders its own tables; these reports are
//! for the terminal, logs, and anywhere else a quick readable summary helps.

use crate::cost_engine;
use crate::recipe_model::Recipe;

/// Format a currency amount as dollars with two decimals.
///
/// Negative amounts keep the sign in front of the symbol ("-$1.50"), and a
/// recipe with no cost data renders as "$0.00" rather than anything blank.
pub fn format_money(amount: f64) -> String {
    if amount < 0.0 {
        format!("-${:.2}", amount.abs())
    } else {
        format!("${:.2}", amount)
    }
}

/// Format a percentage with two decimals.
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

/// One recipe's cost breakdown as display text.
pub fn recipe_report(recipe: &Recipe) -> String {
    let summary = cost_engine::summarize(recipe);

    let mut output = String::new();
    output.push_str(&format!("{}\n", recipe.name));

    for line in &recipe.ingredients {
        output.push_str(&format!(
            "  {} x {} @ {} = {}\n",
            line.quantity,
            line.name,
            format_money(line.unit_cost),
            format_money(line.line_cost)
        ));
    }

    output.push_str(&format!("  Total cost:      {}\n", format_money(summary.total_cost)));
    output.push_str(&format!(
        "  Cost / portion:  {} ({} portions)\n",
        format_money(summary.cost_per_portion),
        recipe.yield_portions
    ));
    output.push_str(&format!(
        "  Sell price:      {}\n",
        format_money(recipe.sell_price)
    ));
    output.push_str(&format!(
        "  Food cost:       {}\n",
        format_percent(summary.food_cost_percent)
    ));
    output.push_str(&format!("  Profit:          {}\n", format_money(summary.profit)));

    output
}

/// A recipe book's report: every recipe's breakdown under one heading.
pub fn book_report(book_name: &str, recipes: &[Recipe]) -> String {
    let mut output = String::new();
    output.push_str(&format!("📊 {} ({} recipes)\n\n", book_name, recipes.len()));

    for recipe in recipes {
        output.push_str(&recipe_report(recipe));
        output.push('\n');
    }

    if recipes.is_empty() {
        output.push_str("  (no recipes)\n");
    }

    output
}
