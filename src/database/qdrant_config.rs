use crate::database::vector_db::VectorDBError;
use qdrant_client::{config::QdrantConfig, Qdrant};

/// Connects to Qdrant and fails early when the server does not answer.
pub async fn create_qdrant_client(url: &str) -> Result<Qdrant, VectorDBError> {
    let url = grpc_url(url);

    let mut config = QdrantConfig::from_url(&url);
    config.check_compatibility = false;
    let client = Qdrant::new(config).map_err(|e| VectorDBError::Connection(e.to_string()))?;

    client
        .health_check()
        .await
        .map_err(|e| VectorDBError::Connection(format!("Qdrant at {} is unreachable: {}", url, e)))?;

    log::info!("Connected to Qdrant at {}", url);
    Ok(client)
}

/// The client speaks gRPC, so the REST port 6333 is swapped for 6334.
fn grpc_url(url: &str) -> String {
    let url = url.trim().trim_end_matches('/');
    let url = if url.contains("://") {
        url.to_string()
    } else {
        format!("http://{}", url)
    };

    match url.strip_suffix(":6333") {
        Some(host) => format!("{}:6334", host),
        None => url,
    }
}
