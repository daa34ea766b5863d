//! External collaborators: location search and attack-command resolution.
//!
//! Both are async and fallible. Transport and decoding problems surface as
//! a single `ServiceFailure`; nothing here touches the scene directly.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use warglobe_core::commands::AttackOrder;
use warglobe_core::constants::SEARCH_LIMIT;
use warglobe_core::enums::LookupSide;
use warglobe_core::error::{Result, WarRoomError};

use crate::config::AppConfig;

/// User agent for API requests.
const USER_AGENT: &str = "warglobe/0.1";

const ATTACK_SYSTEM_PROMPT: &str = r#"You parse attack commands. Extract the attacking country and all target countries from user input.
The user may specify multiple targets separated by commas and/or "and" (e.g., "india attacks china, russia and afghanistan").
Return ONLY a JSON array of attack commands like: [{"attacker": "Country Name", "target": "Country Name"}, ...]
Use full official country names (e.g., "United States" not "USA", "Russia" not "USSR").
If there is only one target, return an array with one object: [{"attacker": "Country Name", "target": "Country Name"}]
If the input is not a valid attack command, return: {"error": "Invalid command"}"#;

/// Transport-level failures of an external service.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP {0}")]
    Status(u16),
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("no API key configured")]
    MissingApiKey,
}

impl From<ServiceError> for WarRoomError {
    fn from(error: ServiceError) -> Self {
        WarRoomError::service(error.to_string())
    }
}

/// One location search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationCandidate {
    pub label: String,
    pub country: String,
    pub region: String,
    pub full_name: String,
    pub lat: f64,
    pub lon: f64,
}

impl LocationCandidate {
    /// Split a comma-separated display name: the first part is the label,
    /// the last the country, and the second the region when there are more
    /// than two parts.
    pub fn from_display_name(display_name: &str, lat: f64, lon: f64) -> Self {
        let parts: Vec<&str> = display_name.split(',').map(str::trim).collect();
        let label = parts.first().copied().unwrap_or_default();
        let country = parts.last().copied().unwrap_or_default();
        let region = if parts.len() > 2 { parts[1] } else { "" };

        Self {
            label: label.to_string(),
            country: country.to_string(),
            region: region.to_string(),
            full_name: display_name.to_string(),
            lat,
            lon,
        }
    }
}

/// Attack orders decoded from free text, plus the entries that were
/// malformed. Valid orders still run when some siblings are invalid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedAttacks {
    pub orders: Vec<AttackOrder>,
    pub invalid: Vec<WarRoomError>,
}

#[async_trait]
pub trait LocationResolver: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<LocationCandidate>>;
}

#[async_trait]
pub trait AttackCommandResolver: Send + Sync {
    async fn resolve(&self, text: &str) -> Result<ParsedAttacks>;
}

fn http_client() -> std::result::Result<reqwest::Client, ServiceError> {
    Ok(reqwest::Client::builder().user_agent(USER_AGENT).build()?)
}

// --- Location search ---

/// Location search against a Nominatim-compatible endpoint.
pub struct NominatimResolver {
    client: reqwest::Client,
    base_url: String,
}

impl NominatimResolver {
    pub fn new(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            client: http_client()?,
            base_url: config.geocoder_url.clone(),
        })
    }

    async fn fetch(
        &self,
        query: &str,
    ) -> std::result::Result<Vec<LocationCandidate>, ServiceError> {
        #[derive(Debug, Deserialize)]
        struct NominatimPlace {
            display_name: String,
            lat: String,
            lon: String,
        }

        let url = format!(
            "{}?format=json&q={}&limit={SEARCH_LIMIT}&addressdetails=1&featuretype=city",
            self.base_url,
            urlencoding::encode(query)
        );
        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ServiceError::Status(response.status().as_u16()));
        }

        let body = response.text().await?;
        let places: Vec<NominatimPlace> = serde_json::from_str(&body)?;
        Ok(places
            .into_iter()
            .filter_map(|place| {
                Some(LocationCandidate::from_display_name(
                    &place.display_name,
                    place.lat.parse().ok()?,
                    place.lon.parse().ok()?,
                ))
            })
            .collect())
    }
}

#[async_trait]
impl LocationResolver for NominatimResolver {
    async fn search(&self, query: &str) -> Result<Vec<LocationCandidate>> {
        let results = self.fetch(query).await.map_err(|error| {
            tracing::warn!(query, %error, "location search failed");
            WarRoomError::service(format!("Network error: {error}"))
        })?;
        tracing::debug!(query, count = results.len(), "location search done");
        Ok(results)
    }
}

// --- Attack-command resolution ---

/// Attack-command resolution through a chat-completion endpoint.
pub struct ChatAttackResolver {
    client: reqwest::Client,
    url: String,
    model: String,
    api_key: Option<String>,
}

impl ChatAttackResolver {
    pub fn new(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            client: http_client()?,
            url: config.attack_url.clone(),
            model: config.attack_model.clone(),
            api_key: config.api_key.clone(),
        })
    }

    async fn complete(&self, text: &str) -> std::result::Result<String, ServiceError> {
        let api_key = self.api_key.as_deref().ok_or(ServiceError::MissingApiKey)?;
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": ATTACK_SYSTEM_PROMPT },
                { "role": "user", "content": text },
            ],
            "temperature": 0.1,
            "max_tokens": 300,
        });

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ServiceError::Status(response.status().as_u16()));
        }

        let data: Value = serde_json::from_str(&response.text().await?)?;
        Ok(data["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or_default()
            .to_string())
    }
}

#[async_trait]
impl AttackCommandResolver for ChatAttackResolver {
    async fn resolve(&self, text: &str) -> Result<ParsedAttacks> {
        let content = self.complete(text).await.map_err(|error| {
            tracing::warn!(%error, "attack resolution failed");
            WarRoomError::from(error)
        })?;
        parse_attack_content(&content)
    }
}

/// Decode the service's reply: a JSON array of `{attacker, target}`, or an
/// object with an `error` field.
pub fn parse_attack_content(content: &str) -> Result<ParsedAttacks> {
    let value: Value = serde_json::from_str(content.trim())
        .map_err(|_| WarRoomError::invalid("could not understand the attack command"))?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(map) => {
            let message = map
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unexpected response");
            return Err(WarRoomError::invalid(message));
        }
        _ => return Err(WarRoomError::invalid("unexpected response")),
    };
    if items.is_empty() {
        return Err(WarRoomError::invalid("no attacks found in command"));
    }

    let mut parsed = ParsedAttacks::default();
    for (i, item) in items.iter().enumerate() {
        let field = |name: &str| {
            item.get(name)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
        };
        match (field("attacker"), field("target")) {
            (Some(attacker), Some(target)) => {
                parsed.orders.push(AttackOrder::new(attacker, target));
            }
            _ => parsed
                .invalid
                .push(WarRoomError::invalid(format!("entry {} is malformed", i + 1))),
        }
    }
    Ok(parsed)
}

/// First candidate of a search, or a resolution failure naming the query.
pub fn first_candidate(
    query: &str,
    candidates: Vec<LocationCandidate>,
) -> Result<LocationCandidate> {
    candidates
        .into_iter()
        .next()
        .ok_or_else(|| WarRoomError::unresolved(LookupSide::Location, query))
}
