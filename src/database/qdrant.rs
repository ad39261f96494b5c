use crate::database::qdrant_config::create_qdrant_client;
use crate::database::vector_db::{SearchHit, VectorDBError, VectorEntry, VectorStore};
use crate::food::record::FoodRecord;
use async_trait::async_trait;
use qdrant_client::qdrant::{
    value::Kind, CountPointsBuilder, CreateCollectionBuilder, Distance, PointStruct,
    SearchPointsBuilder, UpsertPointsBuilder, Value, VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

const RECORD_KEY: &str = "record";

/// Food index kept in a Qdrant collection. The collection is recreated on
/// connect, so each run starts from the freshly ingested foods.
#[derive(Clone)]
pub struct QdrantVectorStore {
    client: Arc<Qdrant>,
    collection: String,
    dimensions: usize,
}

fn operation(e: impl std::fmt::Display) -> VectorDBError {
    VectorDBError::Operation(e.to_string())
}

impl QdrantVectorStore {
    pub async fn connect(url: &str, collection: &str, dimensions: usize) -> Result<Self, VectorDBError> {
        let client = create_qdrant_client(url).await?;
        let store = Self {
            client: Arc::new(client),
            collection: collection.to_string(),
            dimensions,
        };
        store.recreate_collection().await?;
        Ok(store)
    }

    async fn recreate_collection(&self) -> Result<(), VectorDBError> {
        let name = self.collection.as_str();
        if self.client.collection_exists(name).await.map_err(operation)? {
            log::info!("Dropping existing collection {}", name);
            self.client.delete_collection(name).await.map_err(operation)?;
        }

        self.client
            .create_collection(
                CreateCollectionBuilder::new(name)
                    .vectors_config(VectorParamsBuilder::new(self.dimensions as u64, Distance::Cosine)),
            )
            .await
            .map_err(operation)?;
        Ok(())
    }
}

fn record_from_payload(payload: &HashMap<String, Value>) -> Result<FoodRecord, VectorDBError> {
    let raw = match payload.get(RECORD_KEY).and_then(|v| v.kind.as_ref()) {
        Some(Kind::StringValue(s)) => s,
        _ => return Err(VectorDBError::Payload(format!("missing '{}' field", RECORD_KEY))),
    };
    serde_json::from_str(raw).map_err(|e| VectorDBError::Payload(e.to_string()))
}

#[async_trait]
impl VectorStore for QdrantVectorStore {
    async fn upsert(&self, entries: Vec<VectorEntry>) -> Result<(), VectorDBError> {
        let mut points = Vec::with_capacity(entries.len());
        for entry in entries {
            if entry.vector.len() != self.dimensions {
                return Err(VectorDBError::Dimension {
                    expected: self.dimensions,
                    actual: entry.vector.len(),
                });
            }
            let encoded = serde_json::to_string(&entry.record)
                .map_err(|e| VectorDBError::Payload(e.to_string()))?;

            let mut payload = Payload::new();
            payload.insert("name", entry.record.name.clone());
            payload.insert(RECORD_KEY, encoded);

            points.push(PointStruct::new(Uuid::new_v4().to_string(), entry.vector, payload));
        }

        self.client
            .upsert_points(UpsertPointsBuilder::new(self.collection.as_str(), points).wait(true))
            .await
            .map_err(operation)?;
        Ok(())
    }

    async fn search(&self, query: &[f32], limit: usize) -> Result<Vec<SearchHit>, VectorDBError> {
        let response = self
            .client
            .search_points(
                SearchPointsBuilder::new(self.collection.as_str(), query.to_vec(), limit as u64)
                    .with_payload(true),
            )
            .await
            .map_err(operation)?;

        response
            .result
            .into_iter()
            .map(|point| {
                Ok(SearchHit {
                    record: record_from_payload(&point.payload)?,
                    score: point.score,
                })
            })
            .collect()
    }

    async fn len(&self) -> Result<usize, VectorDBError> {
        let response = self
            .client
            .count(CountPointsBuilder::new(self.collection.as_str()).exact(true))
            .await
            .map_err(operation)?;
        Ok(response.result.map(|r| r.count as usize).unwrap_or(0))
    }

    fn backend(&self) -> &str {
        "qdrant"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_payload_round_trip() {
        let record = FoodRecord::new("banana").with_nutrient("potassium", 358.0, "mg");
        let mut payload = HashMap::new();
        payload.insert(
            RECORD_KEY.to_string(),
            Value::from(serde_json::to_string(&record).unwrap()),
        );
        assert_eq!(record_from_payload(&payload).unwrap(), record);
    }

    #[test]
    fn test_missing_record_payload() {
        let payload = HashMap::new();
        assert!(matches!(record_from_payload(&payload), Err(VectorDBError::Payload(_))));
    }
}
