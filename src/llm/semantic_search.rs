use crate::database::vector_db::{SearchHit, VectorDBError, VectorEntry, VectorStore};
use crate::food::record::FoodRecord;
use crate::llm::embeddings::{Embedder, EmbeddingError};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),
    #[error(transparent)]
    Store(#[from] VectorDBError),
}

/// Read-only nearest-neighbour index over food names.
pub struct FoodIndex {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
    records: Vec<FoodRecord>,
}

impl FoodIndex {
    /// Embeds every record name and inserts the whole set in one batch.
    pub async fn build(
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn VectorStore>,
        records: Vec<FoodRecord>,
    ) -> Result<Self, SearchError> {
        let mut entries = Vec::with_capacity(records.len());
        for record in &records {
            let vector = embedder.embed(&record.name).await?;
            entries.push(VectorEntry {
                vector,
                record: record.clone(),
            });
        }
        store.upsert(entries).await?;

        log::info!(
            "Indexed {} foods ({} embeddings, {} store)",
            store.len().await?,
            embedder.name(),
            store.backend()
        );

        Ok(Self {
            embedder,
            store,
            records,
        })
    }

    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, SearchError> {
        if limit == 0 || self.records.is_empty() {
            return Ok(Vec::new());
        }
        let vector = self.embedder.embed(query).await?;
        Ok(self.store.search(&vector, limit).await?)
    }

    pub fn records(&self) -> &[FoodRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Exact (case-insensitive) name match, falling back to the first record
    /// whose name contains `name`.
    pub fn find(&self, name: &str) -> Option<&FoodRecord> {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.records
            .iter()
            .find(|r| r.name.to_lowercase() == needle)
            .or_else(|| self.records.iter().find(|r| r.name.to_lowercase().contains(&needle)))
    }
}

pub fn format_results(hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return "No relevant information".to_string();
    }

    hits.iter()
        .enumerate()
        .map(|(i, hit)| format!("[Source {}]\n{}", i + 1, hit.record.describe().trim_end()))
        .collect::<Vec<_>>()
        .join("\n\n")
}
