pub mod nutrition;

pub use nutrition::{NutritionAnalyzer, NutritionScore, RankedAlternative};
