use crate::food::record::FoodRecord;
use async_trait::async_trait;
use parking_lot::RwLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VectorDBError {
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("Operation failed: {0}")]
    Operation(String),
    #[error("Vector has {actual} dimensions, index expects {expected}")]
    Dimension { expected: usize, actual: usize },
    #[error("Invalid payload: {0}")]
    Payload(String),
}

/// A food record together with the embedding it is indexed under.
#[derive(Debug, Clone)]
pub struct VectorEntry {
    pub vector: Vec<f32>,
    pub record: FoodRecord,
}

#[derive(Debug, Clone)]
pub struct SearchHit {
    pub record: FoodRecord,
    pub score: f32,
}

#[async_trait]
pub trait VectorStore: Send + Sync {
    async fn upsert(&self, entries: Vec<VectorEntry>) -> Result<(), VectorDBError>;

    /// Nearest entries by cosine similarity, best first.
    async fn search(&self, query: &[f32], limit: usize) -> Result<Vec<SearchHit>, VectorDBError>;

    async fn len(&self) -> Result<usize, VectorDBError>;

    fn backend(&self) -> &str;
}

/// Brute-force store for the few dozen foods the chatbot works with.
pub struct InMemoryVectorStore {
    dimensions: usize,
    entries: RwLock<Vec<VectorEntry>>,
}

impl InMemoryVectorStore {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            entries: RwLock::new(Vec::new()),
        }
    }

    fn check_dimensions(&self, vector: &[f32]) -> Result<(), VectorDBError> {
        if vector.len() != self.dimensions {
            return Err(VectorDBError::Dimension {
                expected: self.dimensions,
                actual: vector.len(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn upsert(&self, entries: Vec<VectorEntry>) -> Result<(), VectorDBError> {
        for entry in &entries {
            self.check_dimensions(&entry.vector)?;
        }
        self.entries.write().extend(entries);
        Ok(())
    }

    async fn search(&self, query: &[f32], limit: usize) -> Result<Vec<SearchHit>, VectorDBError> {
        self.check_dimensions(query)?;

        let entries = self.entries.read();
        let mut scored: Vec<(usize, f32)> = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (i, cosine_similarity(query, &entry.vector)))
            .collect();

        // Stable sort keeps insertion order for equal scores
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        Ok(scored
            .into_iter()
            .take(limit)
            .map(|(i, score)| SearchHit {
                record: entries[i].record.clone(),
                score,
            })
            .collect())
    }

    async fn len(&self) -> Result<usize, VectorDBError> {
        Ok(self.entries.read().len())
    }

    fn backend(&self) -> &str {
        "in-memory"
    }
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
