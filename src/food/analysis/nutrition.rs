use crate::food::record::{FoodRecord, Macros};

/// How much better an alternative is than the food it replaces.
#[derive(Debug, Clone, PartialEq)]
pub struct NutritionScore {
    pub protein_diff: f64,
    pub carb_diff: f64,
    pub fat_diff: f64,
    pub overall_score: f64,
    pub reasoning: String,
}

#[derive(Debug, Clone)]
pub struct RankedAlternative {
    pub food: FoodRecord,
    pub score: NutritionScore,
}

/// Filters and ranks candidate foods by protein gained and carbs/fat saved.
#[derive(Debug, Clone)]
pub struct NutritionAnalyzer {
    /// Grams of extra protein an alternative must add.
    pub min_protein_increase: f64,
    /// Upper bound for alternative carbs as a fraction of the original.
    pub max_carb_ratio: f64,
    /// Upper bound for alternative fat as a fraction of the original.
    pub max_fat_ratio: f64,
}

impl Default for NutritionAnalyzer {
    fn default() -> Self {
        Self {
            min_protein_increase: 3.0,
            max_carb_ratio: 0.8,
            max_fat_ratio: 0.8,
        }
    }
}

impl NutritionAnalyzer {
    pub fn is_better(&self, original: &Macros, alternative: &Macros) -> bool {
        if alternative.protein - original.protein < self.min_protein_increase {
            return false;
        }
        if original.carbs > 0.0 && alternative.carbs / original.carbs > self.max_carb_ratio {
            return false;
        }
        if original.fat > 0.0 && alternative.fat / original.fat > self.max_fat_ratio {
            return false;
        }
        true
    }

    pub fn score_alternative(&self, original: &Macros, alternative: &Macros) -> NutritionScore {
        let protein_diff = alternative.protein - original.protein;
        let carb_diff = original.carbs - alternative.carbs;
        let fat_diff = original.fat - alternative.fat;

        // Weighted relative improvement: protein 40%, carbs 30%, fat 30%
        let overall_score = (protein_diff / original.protein.max(1.0)) * 0.4
            + (carb_diff / original.carbs.max(1.0)) * 0.3
            + (fat_diff / original.fat.max(1.0)) * 0.3;

        let mut reasons = Vec::new();
        if protein_diff > 0.0 {
            reasons.push(format!("+{}g protein", round1(protein_diff)));
        }
        if carb_diff > 0.0 {
            reasons.push(format!("-{}g carbs", round1(carb_diff)));
        }
        if fat_diff > 0.0 {
            reasons.push(format!("-{}g fat", round1(fat_diff)));
        }
        let reasoning = if reasons.is_empty() {
            "Similar nutrition".to_string()
        } else {
            reasons.join(", ")
        };

        NutritionScore {
            protein_diff,
            carb_diff,
            fat_diff,
            overall_score,
            reasoning,
        }
    }

    pub fn top_n_alternatives(
        &self,
        original: &FoodRecord,
        candidates: &[FoodRecord],
        top_n: usize,
    ) -> Vec<RankedAlternative> {
        let mut ranked: Vec<RankedAlternative> = candidates
            .iter()
            .filter(|c| c.name != original.name)
            .filter(|c| self.is_better(&original.macros, &c.macros))
            .map(|c| RankedAlternative {
                food: c.clone(),
                score: self.score_alternative(&original.macros, &c.macros),
            })
            .collect();

        ranked.sort_by(|a, b| b.score.overall_score.total_cmp(&a.score.overall_score));
        ranked.truncate(top_n);
        ranked
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
