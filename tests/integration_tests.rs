//! # Integration Tests
//!
//! End-to-end flow without a database: define catalog ingredients, cost a
//! recipe from them, summarize it, and move the data through reports and
//! CSV export/import.

use platecost::catalog::CatalogIngredient;
use platecost::cost_engine;
use platecost::csv_io;
use platecost::recipe_model::Recipe;
use platecost::report;
use platecost::table_config::TableConfig;

#[test]
fn test_catalog_to_costed_recipe_pipeline() {
    // Catalog as a user would enter it: pack pricing plus yield
    let tomatoes = CatalogIngredient::new("tomatoes", 9.0, 20.0).with_yield_percent(90.0);
    let cream = CatalogIngredient::new("cream", 4.0, 4.0);

    // Compose a recipe from resolved lines
    let recipe = Recipe::new("Tomato Soup")
        .with_yield_portions(4.0)
        .with_sell_price(7.5)
        .with_line(tomatoes.line_for(6.0))
        .with_line(cream.line_for(1.0));

    let summary = cost_engine::summarize(&recipe);

    // 6 * (9 / (20 * 0.9)) + 1 * (4 / 4) = 3.0 + 1.0
    assert_eq!(summary.total_cost, 4.0);
    assert_eq!(summary.cost_per_portion, 1.0);
    assert!(summary.food_cost_percent > 13.0 && summary.food_cost_percent < 14.0);
    assert_eq!(summary.profit, 6.5);

    // The report shows the same figures
    let rendered = report::recipe_report(&recipe);
    assert!(rendered.contains("$4.00"));
    assert!(rendered.contains("$1.00"));

    // And the CSV export round-trips the catalog
    let exported = csv_io::export_ingredients_csv(&[tomatoes.clone(), cream.clone()]);
    let imported = csv_io::import_ingredients_csv(&exported);
    assert_eq!(imported, vec![tomatoes, cream]);
}

#[test]
fn test_recipe_summaries_match_between_csv_and_report() {
    let recipe = Recipe::new("Lemonade")
        .with_yield_portions(10.0)
        .with_sell_price(3.0)
        .with_line(CatalogIngredient::new("lemons", 6.0, 30.0).line_for(5.0));

    let csv = csv_io::export_recipe_summaries_csv(std::slice::from_ref(&recipe));
    let rendered = report::recipe_report(&recipe);
    let summary = cost_engine::summarize(&recipe);

    // 5 * 0.2 = 1.0 total, 0.10 per portion
    assert_eq!(summary.cost_per_portion, 0.10);
    assert!(csv.contains("Lemonade,10,3.00,1.00,0.10"));
    assert!(rendered.contains("$0.10"));
}

#[test]
fn test_table_config_defaults_cover_cost_columns() {
    // Every figure the cost engine produces has a column to live in
    let config = TableConfig::recipes_default();
    for key in ["total_cost", "cost_per_portion", "food_cost_percent", "profit"] {
        assert!(config.columns.iter().any(|c| c.key == key));
    }
}
