//! Country lookup client - queries REST Countries and normalizes the records

use std::time::Instant;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};

use crate::config::LookupConfig;
use crate::constants::{APP_NAME, APP_VERSION, LOOKUP_FIELDS};
use crate::models::{Country, CountryOption};

/// Why a lookup produced no answer. `Clone` so one failure can be handed
/// to every caller of a debounced burst.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("invalid lookup URL: {0}")]
    Url(String),
    #[error("request timed out")]
    Timeout,
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("request failed: {0}")]
    Request(String),
    #[error("lookup service returned HTTP {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for LookupError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LookupError::Timeout
        } else if e.is_connect() {
            LookupError::Connect(e.to_string())
        } else {
            LookupError::Request(e.to_string())
        }
    }
}

/// Something that can turn a name query into country suggestions
#[async_trait]
pub trait CountryLookup: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<CountryOption>, LookupError>;
}

/// Create the shared HTTP client
pub fn create_client(config: &LookupConfig) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(config.timeout())
        .user_agent(format!("{}/{}", APP_NAME.replace(' ', "-"), APP_VERSION))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Lookup backed by the REST Countries `/name/{query}` endpoint
#[derive(Clone)]
pub struct RestCountriesClient {
    client: reqwest::Client,
    base_url: String,
}

impl RestCountriesClient {
    pub fn new(config: &LookupConfig) -> Self {
        RestCountriesClient {
            client: create_client(config),
            base_url: config.base_url.clone(),
        }
    }

    /// `{base}/name/{query}?fields=name,flag` with the query path-encoded
    pub fn search_url(&self, query: &str) -> Result<Url, LookupError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| LookupError::Url(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| LookupError::Url(format!("{} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .push("name")
            .push(query);
        url.query_pairs_mut()
            .append_pair("fields", &LOOKUP_FIELDS.join(","));
        Ok(url)
    }
}

#[async_trait]
impl CountryLookup for RestCountriesClient {
    async fn search(&self, query: &str) -> Result<Vec<CountryOption>, LookupError> {
        let url = self.search_url(query)?;
        let start = Instant::now();
        tracing::info!(query, url = %url, "Looking up countries");

        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        let options = parse_countries(status, &body)?;

        tracing::info!(
            query,
            status = status.as_u16(),
            results = options.len(),
            time_ms = start.elapsed().as_millis() as u64,
            "Lookup completed"
        );
        Ok(options)
    }
}

/// Interpret a lookup response. 404 is how the service says "no matches".
pub fn parse_countries(status: StatusCode, body: &str) -> Result<Vec<CountryOption>, LookupError> {
    if status == StatusCode::NOT_FOUND {
        return Ok(Vec::new());
    }
    if !status.is_success() {
        return Err(LookupError::Status(status.as_u16()));
    }
    let countries: Vec<Country> =
        serde_json::from_str(body).map_err(|e| LookupError::Parse(e.to_string()))?;
    Ok(countries.into_iter().map(CountryOption::from).collect())
}

/// Trim, skip blank input, and swallow failures as "no suggestions"
pub async fn load_options(lookup: &dyn CountryLookup, input: &str) -> Vec<CountryOption> {
    let query = input.trim();
    if query.is_empty() {
        return Vec::new();
    }
    match lookup.search(query).await {
        Ok(options) => options,
        Err(e) => {
            tracing::error!(query, error = %e, "Error fetching countries");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Scripted {
        queries: Mutex<Vec<String>>,
        result: Result<Vec<CountryOption>, LookupError>,
    }

    #[async_trait]
    impl CountryLookup for Scripted {
        async fn search(&self, query: &str) -> Result<Vec<CountryOption>, LookupError> {
            self.queries.lock().unwrap().push(query.to_string());
            self.result.clone()
        }
    }

    fn client(base_url: &str) -> RestCountriesClient {
        RestCountriesClient::new(&LookupConfig {
            base_url: base_url.to_string(),
            ..LookupConfig::default()
        })
    }

    #[test]
    fn test_search_url_encodes_query() {
        let url = client("https://restcountries.com/v3.1").search_url("united states").unwrap();
        assert_eq!(
            url.as_str(),
            "https://restcountries.com/v3.1/name/united%20states?fields=name%2Cflag"
        );
    }

    #[test]
    fn test_search_url_tolerates_trailing_slash() {
        let url = client("https://example.test/v3.1/").search_url("peru").unwrap();
        assert_eq!(url.path(), "/v3.1/name/peru");
    }

    #[test]
    fn test_search_url_rejects_garbage_base() {
        assert!(matches!(client("not a url").search_url("x"), Err(LookupError::Url(_))));
    }

    #[test]
    fn test_parse_countries() {
        let body = r#"[
            {"name":{"common":"Germany","official":"Federal Republic of Germany"},"flag":"🇩🇪"},
            {"name":{"common":"Papua New Guinea"},"flag":"🇵🇬"}
        ]"#;
        let options = parse_countries(StatusCode::OK, body).unwrap();
        assert_eq!(options.len(), 2);
        assert_eq!(options[1].value, "papua-new-guinea");
        assert_eq!(options[0].flag, "🇩🇪");
    }

    #[test]
    fn test_parse_not_found_is_empty() {
        let body = r#"{"status":404,"message":"Not Found"}"#;
        assert_eq!(parse_countries(StatusCode::NOT_FOUND, body).unwrap(), Vec::new());
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            parse_countries(StatusCode::BAD_GATEWAY, ""),
            Err(LookupError::Status(502))
        );
        assert!(matches!(
            parse_countries(StatusCode::OK, "<html>"),
            Err(LookupError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn test_load_options_skips_blank_input() {
        let lookup = Scripted {
            queries: Mutex::new(Vec::new()),
            result: Ok(vec![CountryOption::new("Chad", "🇹🇩")]),
        };
        assert!(load_options(&lookup, "   ").await.is_empty());
        assert!(lookup.queries.lock().unwrap().is_empty());

        let options = load_options(&lookup, "  chad ").await;
        assert_eq!(options.len(), 1);
        assert_eq!(*lookup.queries.lock().unwrap(), vec!["chad".to_string()]);
    }

    #[tokio::test]
    async fn test_load_options_swallows_failure() {
        let lookup = Scripted {
            queries: Mutex::new(Vec::new()),
            result: Err(LookupError::Timeout),
        };
        assert!(load_options(&lookup, "mali").await.is_empty());
    }
}
