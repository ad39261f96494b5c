pub mod chat;
pub mod embeddings;
pub mod semantic_search;

pub use chat::{ChatError, ChatManager};
pub use embeddings::{Embedder, EmbeddingError, HashingEmbedder, OpenAiEmbedder};
pub use semantic_search::{format_results, FoodIndex, SearchError};
