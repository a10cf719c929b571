//! Catalog browsing commands for Maguai
//!
//! This module provides the `models list` and `models info` commands, plus
//! the table rendering reused by the `/models` command in chat mode.

use crate::catalog::{self, Model};
use crate::error::{MaguaiError, Result};
use prettytable::{row, Table};

/// List catalog entries, optionally filtered
///
/// # Arguments
///
/// * `filter` - Optional case-insensitive query matched against name and category
/// * `json` - Print JSON instead of a table
///
/// # Examples
///
/// ```no_run
/// use maguai::commands::models::list_models;
///
/// # fn example() -> anyhow::Result<()> {
/// list_models(Some("coding"), false)?;
/// # Ok(())
/// # }
/// ```
pub fn list_models(filter: Option<&str>, json: bool) -> Result<()> {
    let query = filter.unwrap_or("");
    let models = catalog::filter_catalog(query);

    tracing::debug!("Listing {} models for query {:?}", models.len(), query);

    if json {
        output_models_json(&models)?;
    } else if models.is_empty() {
        println!("No models found matching '{}'", query);
    } else {
        output_models_table(&models);
    }

    Ok(())
}

/// Show detailed information about one persona
///
/// # Errors
///
/// Returns `MaguaiError::UnknownModel` if no persona has the given id
pub fn show_model_info(model_id: &str, json: bool) -> Result<()> {
    let model =
        catalog::find_model(model_id).ok_or_else(|| MaguaiError::UnknownModel(model_id.to_string()))?;

    if json {
        let json = serialize_pretty(model)?;
        println!("{}", json);
    } else {
        output_model_info_detailed(model);
    }

    Ok(())
}

/// Serialize a value into pretty JSON
fn serialize_pretty<T: serde::Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value).map_err(MaguaiError::Serialization)?)
}

/// Output models in JSON format
///
/// # Errors
///
/// Returns `MaguaiError::Serialization` if serialization fails
fn output_models_json(models: &[&Model]) -> Result<()> {
    let json = serialize_pretty(models)?;
    println!("{}", json);
    Ok(())
}

/// Render models as a table
pub fn models_table(models: &[&Model]) -> Table {
    let mut table = Table::new();
    table.add_row(row!["", "ID", "Name", "Category", "Description"]);

    for model in models {
        table.add_row(row![
            model.icon,
            model.id,
            model.name,
            model.category,
            model.description
        ]);
    }

    table
}

/// Output models in table format
pub fn output_models_table(models: &[&Model]) {
    println!("\n{} of {} models:\n", models.len(), catalog::CATALOG_SIZE);
    models_table(models).printstd();
    println!();
}

fn output_model_info_detailed(model: &Model) {
    println!("\n{} {}\n", model.icon, model.name);
    println!("ID:          {}", model.id);
    println!("Category:    {}", model.category);
    println!("Description: {}", model.description);
    println!();
}
