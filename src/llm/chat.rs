use crate::database::vector_db::SearchHit;
use crate::food::record::{ChatTurn, FoodRecord, Macros};
use crate::llm::semantic_search::{format_results, FoodIndex, SearchError};
use crate::providers::traits::{CompletionProvider, LlmError};
use std::sync::Arc;
use thiserror::Error;

pub const DEFAULT_DIET_GOALS: &str = "improve nutrition";

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Retrieval failed: {0}")]
    Search(#[from] SearchError),
    #[error("LLM request failed: {0}")]
    Llm(#[from] LlmError),
}

/// Retrieval-augmented question answering over the food index.
pub struct ChatManager {
    provider: Arc<dyn CompletionProvider>,
    index: Arc<FoodIndex>,
    top_k: usize,
}

impl ChatManager {
    pub fn new(provider: Arc<dyn CompletionProvider>, index: Arc<FoodIndex>, top_k: usize) -> Self {
        Self {
            provider,
            index,
            top_k,
        }
    }

    pub fn index(&self) -> &FoodIndex {
        &self.index
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn build_prompt(question: &str, hits: &[SearchHit]) -> String {
        format!(
            "Context from knowledge base regarding nutrition information:\n\
             {}\n\n\
             Question: {}\n\n\
             Answer:",
            format_results(hits),
            question.trim()
        )
    }

    pub async fn retrieve(&self, query: &str) -> Result<Vec<SearchHit>, ChatError> {
        Ok(self.index.search(query, self.top_k).await?)
    }

    /// One turn: retrieve, assemble the prompt, one LLM call.
    pub async fn respond(&self, question: &str) -> Result<ChatTurn, ChatError> {
        let hits = self.retrieve(question).await?;
        log::debug!(
            "Retrieved {:?} for '{}'",
            hits.iter().map(|h| h.record.name.as_str()).collect::<Vec<_>>(),
            question
        );

        let prompt = Self::build_prompt(question, &hits);
        let answer = self.provider.complete(&prompt).await?;

        Ok(ChatTurn {
            user_text: question.to_string(),
            assistant_text: answer,
        })
    }

    /// Nutritionist review of a set of foods, with indexed foods as context
    /// for suggested alternatives.
    pub async fn analyze_diet(&self, foods: &[FoodRecord], goals: &str) -> Result<String, ChatError> {
        let query = diet_query(foods, goals);
        let hits = self.retrieve(&query).await?;

        let current_foods = foods.iter().map(|f| f.name.as_str()).collect::<Vec<_>>().join(", ");
        let prompt = format!(
            "You are a professional nutritionist analyzing a person's typical meals.\n\n\
             Context from knowledge base regarding nutrition information:\n\
             {}\n\n\
             Foods: {}\n\n\
             Nutrition Data:\n\
             {}\n\n\
             Goals: {}\n\n\
             1. Analyze the nutritional content of these foods\n\
             2. Use the context to recommend lower-carb, higher-protein and lower-fat alternatives\n\
             3. Explain why each recommendation is better\n\
             4. Present recommendations in a clear, friendly manner",
            format_results(&hits),
            current_foods,
            format_nutrition_data(foods),
            goals
        );

        Ok(self.provider.complete(&prompt).await?)
    }
}

/// Per-food macros followed by the combined totals.
pub fn format_nutrition_data(foods: &[FoodRecord]) -> String {
    let mut output = Vec::new();
    let mut total = Macros::default();

    for food in foods {
        let m = &food.macros;
        output.push(format!("\n{}:", food.name));
        output.push(format!("  - Protein: {}g", m.protein));
        output.push(format!("  - Carbs: {}g", m.carbs));
        output.push(format!("  - Fat: {}g", m.fat));
        output.push(format!("  - Calories: {}", m.calories));

        total.protein += m.protein;
        total.carbs += m.carbs;
        total.fat += m.fat;
        total.calories += m.calories;
    }

    output.push("\nTotal Intake:".to_string());
    output.push(format!("  - Protein: {}g", round2(total.protein)));
    output.push(format!("  - Carbs: {}g", round2(total.carbs)));
    output.push(format!("  - Fat: {}g", round2(total.fat)));
    output.push(format!("  - Calories: {}", round2(total.calories)));

    output.join("\n")
}

/// Retrieval query steering the index towards useful substitutes.
pub fn diet_query(foods: &[FoodRecord], goals: &str) -> String {
    let mut parts = Vec::new();

    if !foods.is_empty() {
        let n = foods.len() as f64;
        let avg_protein = foods.iter().map(|f| f.macros.protein).sum::<f64>() / n;
        let avg_carbs = foods.iter().map(|f| f.macros.carbs).sum::<f64>() / n;

        if avg_protein < 15.0 {
            parts.push("high protein alternatives".to_string());
        }
        if avg_carbs > 30.0 {
            parts.push("low carb substitutes".to_string());
        }
    }

    parts.push(goals.to_string());
    let names = foods.iter().map(|f| f.name.as_str()).collect::<Vec<_>>().join(" ");
    parts.push(format!("alternatives to {}", names));

    parts.join(" ")
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
