// 🌐 Park Source - raw API model and the HTTP client that fetches it
//
// The raw types mirror the API response closely enough that the cache file
// round-trips: every field we do not model explicitly is carried in `extra`.

use crate::config::Config;
use crate::error::{ParkError, ParkResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io::Read;
use tracing::info;

// ============================================================================
// RAW API MODEL
// ============================================================================

/// Top-level API response: `{ "total": .., "limit": .., "start": .., "data": [..] }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParkResponse {
    pub data: Vec<RawPark>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `{ "id": .., "name": .. }` entries used for both activities and topics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
}

/// One park record as returned by the API. Required fields are optional
/// here so a missing field becomes a per-record error rather than a failed
/// decode of the whole response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPark {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Latitude as a decimal string (the API sends strings, sometimes empty)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activities: Option<Vec<NamedItem>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topics: Option<Vec<NamedItem>>,

    /// Comma-separated state codes, e.g. "CA,NV"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub states: Option<String>,

    /// description, directionsUrl, addresses, images, ...
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ============================================================================
// SOURCE TRAIT
// ============================================================================

/// Anything that can produce a full park response
pub trait ParkSource {
    fn fetch(&self) -> ParkResult<ParkResponse>;
}

// ============================================================================
// HTTP CLIENT
// ============================================================================

pub struct NpsClient {
    agent: ureq::Agent,
    endpoint: String,
    api_key: String,
    limit: u32,
}

impl NpsClient {
    pub fn new(endpoint: &str, api_key: &str, limit: u32, timeout: std::time::Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();

        NpsClient {
            agent,
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
            limit,
        }
    }

    /// Build a client from config; the API key is mandatory for fetching
    pub fn from_config(config: &Config) -> ParkResult<Self> {
        let api_key = config.api_key.as_deref().ok_or_else(|| {
            ParkError::Fetch(
                "no API key configured (use --api-key or NPS_API_KEY)".to_string(),
            )
        })?;

        Ok(NpsClient::new(
            &config.endpoint,
            api_key,
            config.limit,
            config.timeout,
        ))
    }
}

impl ParkSource for NpsClient {
    fn fetch(&self) -> ParkResult<ParkResponse> {
        info!(endpoint = %self.endpoint, limit = self.limit, "Fetching park records");

        let response = self
            .agent
            .get(&self.endpoint)
            .query("api_key", &self.api_key)
            .query("limit", &self.limit.to_string())
            .call()
            .map_err(|e| ParkError::Fetch(e.to_string()))?;

        let parks = decode_response(response.into_reader())?;

        info!(records = parks.data.len(), "Fetched park records");

        Ok(parks)
    }
}

/// Decode an API body. Error envelopes (no `data`) and empty record lists
/// are rejected so they never reach the cache.
pub fn decode_response<R: Read>(reader: R) -> ParkResult<ParkResponse> {
    let parks: ParkResponse = serde_json::from_reader(reader)
        .map_err(|e| ParkError::Fetch(format!("malformed response: {}", e)))?;

    if parks.data.is_empty() {
        return Err(ParkError::Fetch(
            "malformed response: no park records".to_string(),
        ));
    }

    Ok(parks)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "total": "1",
        "limit": "1",
        "start": "0",
        "data": [{
            "fullName": "Yosemite National Park",
            "url": "https://www.nps.gov/yose/index.htm",
            "description": "Not just a great valley.",
            "latitude": "37.84883288",
            "longitude": "-119.5571873",
            "activities": [{"id": "a1", "name": "Hiking"}],
            "topics": [{"id": "t1", "name": "Geology"}],
            "states": "CA",
            "directionsUrl": "https://www.nps.gov/yose/planyourvisit/directions.htm",
            "addresses": [{"city": "Yosemite", "type": "Physical"}]
        }]
    }"#;

    #[test]
    fn test_decode_sample_response() {
        let response: ParkResponse = serde_json::from_str(SAMPLE).unwrap();

        assert_eq!(response.data.len(), 1);
        let park = &response.data[0];
        assert_eq!(park.full_name.as_deref(), Some("Yosemite National Park"));
        assert_eq!(park.states.as_deref(), Some("CA"));
        assert_eq!(park.activities.as_ref().unwrap()[0].name, "Hiking");
        assert!(park.extra.contains_key("directionsUrl"));
        assert!(park.extra.contains_key("addresses"));
        assert_eq!(response.extra.get("total"), Some(&Value::from("1")));
    }

    #[test]
    fn test_unknown_fields_survive_reserialization() {
        let response: ParkResponse = serde_json::from_str(SAMPLE).unwrap();
        let text = serde_json::to_string(&response).unwrap();
        let again: ParkResponse = serde_json::from_str(&text).unwrap();

        assert_eq!(response, again);
        assert!(text.contains("Not just a great valley."));
    }

    #[test]
    fn test_missing_fields_decode_as_none() {
        let response: ParkResponse =
            serde_json::from_str(r#"{"data": [{"fullName": "Nameless"}]}"#).unwrap();

        let park = &response.data[0];
        assert!(park.url.is_none());
        assert!(park.activities.is_none());
    }

    #[test]
    fn test_error_envelope_is_rejected() {
        let body = r#"{"error": {"code": "OVER_RATE_LIMIT", "message": "API rate limit exceeded"}}"#;
        let result = decode_response(body.as_bytes());

        match result {
            Err(ParkError::Fetch(message)) => assert!(message.contains("data")),
            other => panic!("expected fetch error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_record_list_is_rejected() {
        let result = decode_response(r#"{"total": "0", "data": []}"#.as_bytes());
        assert!(matches!(result, Err(ParkError::Fetch(_))));

        let ok = decode_response(SAMPLE.as_bytes()).unwrap();
        assert_eq!(ok.data.len(), 1);
    }

    #[test]
    fn test_client_requires_api_key() {
        let config = Config::default();
        let result = NpsClient::from_config(&config);

        assert!(matches!(result, Err(ParkError::Fetch(_))));
    }
}
