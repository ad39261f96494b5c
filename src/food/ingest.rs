use crate::food::api::usda::{UsdaClient, UsdaError};
use crate::food::record::FoodRecord;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Food names seeded when no `FOODS_FILE` is configured.
pub const DEFAULT_FOODS: &str = include_str!("../../data/foods.json");

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Failed to read food list {path}: {source}")]
    FoodList {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid food list: {0}")]
    InvalidFoodList(String),
    #[error("Failed to fetch '{food}': {source}")]
    Lookup {
        food: String,
        #[source]
        source: UsdaError,
    },
}

pub fn load_food_list(path: Option<&Path>) -> Result<Vec<String>, IngestError> {
    let raw = match path {
        Some(path) => fs::read_to_string(path).map_err(|source| IngestError::FoodList {
            path: path.to_path_buf(),
            source,
        })?,
        None => DEFAULT_FOODS.to_string(),
    };
    parse_food_list(&raw)
}

pub fn parse_food_list(raw: &str) -> Result<Vec<String>, IngestError> {
    let names: Vec<String> =
        serde_json::from_str(raw).map_err(|e| IngestError::InvalidFoodList(e.to_string()))?;

    let mut seen = HashSet::new();
    let names: Vec<String> = names
        .into_iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .filter(|n| seen.insert(n.to_lowercase()))
        .collect();

    if names.is_empty() {
        return Err(IngestError::InvalidFoodList("no food names".to_string()));
    }
    Ok(names)
}

/// Fetches every listed food. The first network or parse error aborts the
/// whole run; nothing is returned for a partial ingestion.
pub async fn ingest(usda: &UsdaClient, names: &[String]) -> Result<Vec<FoodRecord>, IngestError> {
    let progress = ProgressBar::new(names.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );

    let mut records = Vec::with_capacity(names.len());
    let mut seen_ids = HashSet::new();

    for name in names {
        progress.set_message(name.clone());
        let result = usda.lookup(name).await;
        let record = match result {
            Ok(record) => record,
            Err(source) => {
                progress.abandon_with_message(format!("failed on {}", name));
                return Err(IngestError::Lookup { food: name.clone(), source });
            }
        };

        match record {
            Some(record) => {
                let duplicate = record.fdc_id.map(|id| !seen_ids.insert(id)).unwrap_or(false);
                if duplicate {
                    log::warn!("'{}' resolved to an already ingested food, skipping", name);
                } else {
                    log::info!("Ingested '{}' as {}", name, record.name);
                    records.push(record);
                }
            }
            None => log::warn!("No USDA match for '{}', skipping", name),
        }
        progress.inc(1);
    }

    progress.finish_with_message(format!("{} foods loaded", records.len()));
    Ok(records)
}
