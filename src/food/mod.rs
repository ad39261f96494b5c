pub mod analysis;
pub mod api;
pub mod ingest;
pub mod record;

pub use record::{ChatTurn, FoodRecord, Macros};
