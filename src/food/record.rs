use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use validator::{Validate, ValidationError};

/// Macronutrients per 100g, picked out of the USDA nutrient list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Macros {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub calories: f64,
    pub fiber: f64,
    pub sugar: f64,
}

/// A single food's nutrient profile as returned by FoodData Central.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct FoodRecord {
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    pub fdc_id: Option<u64>,
    #[validate(custom = "validate_nutrient_keys")]
    pub nutrients: BTreeMap<String, f64>,
    #[serde(default)]
    pub units: BTreeMap<String, String>,
    #[serde(default)]
    pub macros: Macros,
}

fn validate_nutrient_keys(nutrients: &BTreeMap<String, f64>) -> Result<(), ValidationError> {
    if nutrients.keys().any(|k| k.trim().is_empty()) {
        return Err(ValidationError::new("empty_nutrient_name"));
    }
    Ok(())
}

impl FoodRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fdc_id: None,
            nutrients: BTreeMap::new(),
            units: BTreeMap::new(),
            macros: Macros::default(),
        }
    }

    pub fn with_fdc_id(mut self, fdc_id: u64) -> Self {
        self.fdc_id = Some(fdc_id);
        self
    }

    pub fn with_nutrient(mut self, name: impl Into<String>, amount: f64, unit: impl Into<String>) -> Self {
        let name = name.into();
        let unit = unit.into();
        if !unit.is_empty() {
            self.units.insert(name.clone(), unit);
        }
        self.nutrients.insert(name, amount);
        self
    }

    pub fn with_macros(mut self, macros: Macros) -> Self {
        self.macros = macros;
        self
    }

    /// Case-insensitive nutrient lookup.
    pub fn nutrient(&self, name: &str) -> Option<f64> {
        self.nutrients
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| *v)
    }

    /// Multi-line block used as retrieval context in prompts.
    pub fn describe(&self) -> String {
        let mut out = format!("Food: {}\n", self.name);
        if let Some(id) = self.fdc_id {
            out.push_str(&format!("FDC ID: {}\n", id));
        }
        out.push_str("Nutrition per 100g:\n");
        if self.nutrients.is_empty() {
            out.push_str("- (no nutrient data)\n");
        }
        for (name, amount) in &self.nutrients {
            match self.units.get(name) {
                Some(unit) => out.push_str(&format!("- {}: {} {}\n", name, amount, unit)),
                None => out.push_str(&format!("- {}: {}\n", name, amount)),
            }
        }
        out
    }
}

impl fmt::Display for FoodRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}g protein, {}g carbs, {}g fat, {} kcal)",
            self.name, self.macros.protein, self.macros.carbs, self.macros.fat, self.macros.calories
        )
    }
}

/// One question/answer exchange. Not persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatTurn {
    pub user_text: String,
    pub assistant_text: String,
}
