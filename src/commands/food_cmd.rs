use crate::food::analysis::NutritionAnalyzer;
use crate::food::api::UsdaClient;
use crate::food::record::FoodRecord;
use crate::llm::chat::{ChatManager, DEFAULT_DIET_GOALS};
use colored::Colorize;
use std::io::Write;

const ALTERNATIVE_CRITERIA: &str = "higher protein, lower carbs, lower fat";
const MIN_CANDIDATES: usize = 10;
const ALTERNATIVES_SHOWN: usize = 2;

fn io_err(e: std::io::Error) -> String {
    format!("Failed to write output: {}", e)
}

/// Indexed record first, then a live USDA lookup.
async fn resolve_food(chat: &ChatManager, usda: &UsdaClient, name: &str) -> Result<Option<FoodRecord>, String> {
    if let Some(record) = chat.index().find(name) {
        return Ok(Some(record.clone()));
    }
    usda.lookup(name)
        .await
        .map_err(|e| format!("Could not look up '{}': {}", name, e))
}

pub fn list_foods<W: Write>(chat: &ChatManager, out: &mut W) -> Result<(), String> {
    let records = chat.index().records();
    if records.is_empty() {
        writeln!(out, "The knowledge base is empty.").map_err(io_err)?;
        return Ok(());
    }

    writeln!(out, "\n📚 {} foods in the knowledge base:", records.len()).map_err(io_err)?;
    for record in records {
        writeln!(out, "  • {}", record).map_err(io_err)?;
    }
    writeln!(out).map_err(io_err)
}

pub async fn alternatives<W: Write>(
    chat: &ChatManager,
    usda: &UsdaClient,
    analyzer: &NutritionAnalyzer,
    food_name: &str,
    out: &mut W,
) -> Result<(), String> {
    if food_name.is_empty() {
        writeln!(out, "Please specify a food.\nUsage: alternatives <food>").map_err(io_err)?;
        return Ok(());
    }

    let Some(original) = resolve_food(chat, usda, food_name).await? else {
        writeln!(out, "❌ Food not found: {}", food_name).map_err(io_err)?;
        return Ok(());
    };
    writeln!(out, "Found: {}", original).map_err(io_err)?;

    let query = format!("{} alternatives to {}", ALTERNATIVE_CRITERIA, original.name);
    let limit = chat.top_k().max(MIN_CANDIDATES);
    let candidates: Vec<FoodRecord> = chat
        .index()
        .search(&query, limit)
        .await
        .map_err(|e| format!("Could not find alternatives: {}", e))?
        .into_iter()
        .map(|hit| hit.record)
        .collect();

    let ranked = analyzer.top_n_alternatives(&original, &candidates, ALTERNATIVES_SHOWN);
    if ranked.is_empty() {
        writeln!(out, "  (No better alternatives found - this food is already great!)").map_err(io_err)?;
        return Ok(());
    }

    writeln!(out, "Better alternatives:").map_err(io_err)?;
    for alt in ranked {
        writeln!(out, "  • {}: {}", alt.food.name.bright_yellow(), alt.score.reasoning).map_err(io_err)?;
    }
    Ok(())
}

pub async fn diet<W: Write>(
    chat: &ChatManager,
    usda: &UsdaClient,
    foods_arg: &str,
    out: &mut W,
) -> Result<(), String> {
    let names: Vec<&str> = foods_arg
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if names.is_empty() {
        writeln!(out, "Please list some foods.\nUsage: diet <food>, <food>, ...").map_err(io_err)?;
        return Ok(());
    }

    let mut foods = Vec::with_capacity(names.len());
    for name in names {
        match resolve_food(chat, usda, name).await {
            Ok(Some(record)) => {
                writeln!(out, "--- {} ---\nFound: {}", name, record).map_err(io_err)?;
                foods.push(record);
            }
            Ok(None) => writeln!(out, "--- {} ---\nFood not found, skipping", name).map_err(io_err)?,
            Err(e) => writeln!(out, "--- {} ---\n{}", name, e.red()).map_err(io_err)?,
        }
    }

    if foods.is_empty() {
        return Err("None of the foods could be found".to_string());
    }

    writeln!(out, "\nGenerating personalized recommendations...").map_err(io_err)?;
    let analysis = chat
        .analyze_diet(&foods, DEFAULT_DIET_GOALS)
        .await
        .map_err(|e| format!("Could not generate analysis: {}", e))?;
    writeln!(out, "\n{}\n", analysis).map_err(io_err)
}
