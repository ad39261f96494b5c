pub mod usda;

// Re-export common types
pub use usda::{FoodSearchHit, UsdaClient, UsdaError};
