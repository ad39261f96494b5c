use crate::config::UsdaConfig;
use crate::food::record::{FoodRecord, Macros};
use lru::LruCache;
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::Value;
use std::num::NonZeroUsize;
use thiserror::Error;
use validator::Validate;

const CACHE_CAPACITY: usize = 256;
const SEARCH_DATA_TYPE: &str = "Survey (FNDDS)";

// FoodData Central nutrient numbers
const PROTEIN: &str = "203";
const FAT: &str = "204";
const CARBS: &str = "205";
const CALORIES: &str = "208";
const SUGAR: &str = "269";
const FIBER: &str = "291";

#[derive(Error, Debug)]
pub enum UsdaError {
    #[error("Failed to send request: {0}")]
    Request(#[from] reqwest::Error),
    #[error("USDA API request failed: Status {status}, Body: {body}")]
    Status { status: u16, body: String },
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodSearchHit {
    pub fdc_id: u64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub data_type: Option<String>,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    foods: Vec<FoodSearchHit>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FoodDetails {
    #[serde(default)]
    fdc_id: Option<u64>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    food_nutrients: Vec<FoodNutrientEntry>,
}

#[derive(Deserialize)]
struct FoodNutrientEntry {
    #[serde(default)]
    nutrient: Option<NutrientInfo>,
    #[serde(default)]
    amount: Option<f64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NutrientInfo {
    #[serde(default)]
    number: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    unit_name: Option<String>,
}

pub struct UsdaClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
    cache: Mutex<LruCache<String, Value>>,
}

impl UsdaClient {
    pub fn new(config: UsdaConfig) -> Self {
        let capacity = NonZeroUsize::new(CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN);
        Self {
            api_key: config.api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    async fn get_json(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Value, UsdaError> {
        let cache_key = format!("{}:{:?}", endpoint, params);
        if let Some(cached) = self.cache.lock().get(&cache_key) {
            log::debug!("USDA cache hit for {}", cache_key);
            return Ok(cached.clone());
        }

        let url = format!("{}/{}", self.base_url, endpoint);
        let response = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UsdaError::Status { status: status.as_u16(), body });
        }

        let body = response.text().await?;
        let data: Value = serde_json::from_str(&body).map_err(|e| UsdaError::Parse(e.to_string()))?;

        self.cache.lock().put(cache_key, data.clone());
        Ok(data)
    }

    pub async fn search_foods(&self, query: &str, page_size: u32) -> Result<Vec<FoodSearchHit>, UsdaError> {
        let params = [
            ("query", query.to_string()),
            ("pageSize", page_size.to_string()),
            ("dataType", SEARCH_DATA_TYPE.to_string()),
        ];
        let data = self.get_json("foods/search", &params).await?;
        let response: SearchResponse =
            serde_json::from_value(data).map_err(|e| UsdaError::Parse(e.to_string()))?;
        Ok(response.foods)
    }

    pub async fn get_food_details(&self, fdc_id: u64) -> Result<FoodRecord, UsdaError> {
        let data = self.get_json(&format!("food/{}", fdc_id), &[]).await?;
        parse_food(data)
    }

    /// Best single match for a food name, `None` when the search is empty.
    pub async fn lookup(&self, name: &str) -> Result<Option<FoodRecord>, UsdaError> {
        let hits = self.search_foods(name, 1).await?;
        match hits.first() {
            Some(hit) => self.get_food_details(hit.fdc_id).await.map(Some),
            None => Ok(None),
        }
    }
}

pub fn parse_food(data: Value) -> Result<FoodRecord, UsdaError> {
    let details: FoodDetails =
        serde_json::from_value(data).map_err(|e| UsdaError::Parse(e.to_string()))?;

    if details.description.trim().is_empty() {
        return Err(UsdaError::Parse("food has no description".to_string()));
    }

    let mut record = FoodRecord::new(details.description.trim());
    if let Some(id) = details.fdc_id {
        record = record.with_fdc_id(id);
    }

    let mut macros = Macros::default();
    for entry in details.food_nutrients {
        let Some(info) = entry.nutrient else { continue };
        let name = info.name.trim();
        if name.is_empty() {
            continue;
        }
        let amount = entry.amount.unwrap_or(0.0);

        match info.number.as_str() {
            PROTEIN => macros.protein = amount,
            CARBS => macros.carbs = amount,
            FAT => macros.fat = amount,
            CALORIES => macros.calories = amount,
            FIBER => macros.fiber = amount,
            SUGAR => macros.sugar = amount,
            _ => {}
        }

        record = record.with_nutrient(name, amount, info.unit_name.unwrap_or_default());
    }

    let record = record.with_macros(macros);
    record
        .validate()
        .map_err(|e| UsdaError::Parse(format!("invalid food record: {}", e)))?;
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn banana_details() -> Value {
        json!({
            "fdcId": 1105314,
            "description": "Banana, raw",
            "dataType": "Survey (FNDDS)",
            "foodNutrients": [
                { "nutrient": { "number": "203", "name": "Protein", "unitName": "g" }, "amount": 1.09 },
                { "nutrient": { "number": "205", "name": "Carbohydrate, by difference", "unitName": "g" }, "amount": 22.8 },
                { "nutrient": { "number": "204", "name": "Total lipid (fat)", "unitName": "g" }, "amount": 0.33 },
                { "nutrient": { "number": "208", "name": "Energy", "unitName": "kcal" }, "amount": 89.0 },
                { "nutrient": { "number": "306", "name": "Potassium, K", "unitName": "mg" }, "amount": 358.0 },
                { "nutrient": { "number": "999", "name": "", "unitName": "g" }, "amount": 1.0 },
                { "type": "FoodNutrient" }
            ]
        })
    }

    fn client_for(server: &MockServer) -> UsdaClient {
        UsdaClient::new(UsdaConfig {
            api_key: "test-key".to_string(),
            base_url: server.uri(),
        })
    }

    #[test]
    fn test_parse_food_extracts_macros_and_nutrients() {
        let record = parse_food(banana_details()).unwrap();
        assert_eq!(record.name, "Banana, raw");
        assert_eq!(record.fdc_id, Some(1105314));
        assert_eq!(record.macros.protein, 1.09);
        assert_eq!(record.macros.carbs, 22.8);
        assert_eq!(record.macros.fat, 0.33);
        assert_eq!(record.macros.calories, 89.0);
        assert_eq!(record.macros.fiber, 0.0);
        assert_eq!(record.nutrient("Potassium, K"), Some(358.0));
        assert_eq!(record.units.get("Potassium, K").map(String::as_str), Some("mg"));
        assert!(!record.nutrients.contains_key(""));
    }

    #[test]
    fn test_parse_food_without_description_fails() {
        let err = parse_food(json!({ "fdcId": 1, "foodNutrients": [] })).unwrap_err();
        assert!(matches!(err, UsdaError::Parse(_)));
    }

    #[tokio::test]
    async fn test_lookup_searches_then_fetches_details() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/foods/search"))
            .and(query_param("query", "banana"))
            .and(query_param("api_key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "foods": [{ "fdcId": 1105314, "description": "Banana, raw" }]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/food/1105314"))
            .respond_with(ResponseTemplate::new(200).set_body_json(banana_details()))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let record = client.lookup("banana").await.unwrap().unwrap();
        assert_eq!(record.name, "Banana, raw");

        // Second lookup is served from the cache; the mocks expect one call each.
        let again = client.lookup("banana").await.unwrap().unwrap();
        assert_eq!(again, record);
    }

    #[tokio::test]
    async fn test_lookup_with_no_match() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/foods/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "foods": [] })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert!(client.lookup("unobtainium").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_string("API_KEY_INVALID"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.search_foods("banana", 1).await.unwrap_err();
        match err {
            UsdaError::Status { status, body } => {
                assert_eq!(status, 403);
                assert!(body.contains("API_KEY_INVALID"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.get_food_details(42).await.unwrap_err();
        assert!(matches!(err, UsdaError::Parse(_)));
    }
}
