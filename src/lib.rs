pub mod app;
pub mod commands;
pub mod config;
pub mod database;
pub mod food;
pub mod llm;
pub mod providers;

// Re-export commonly used items
pub use commands::{CommandHandler, Outcome};
pub use config::{AppConfig, ConfigError};
pub use food::{ChatTurn, FoodRecord};
