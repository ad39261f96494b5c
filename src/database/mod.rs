pub mod qdrant;
pub mod qdrant_config;
pub mod vector_db;

pub use qdrant::QdrantVectorStore;
pub use vector_db::{InMemoryVectorStore, SearchHit, VectorDBError, VectorEntry, VectorStore};
