use std::time::Duration;

use async_trait::async_trait;
use lexi_config::lookup::LookupConfig;
use lexi_types::{LookupFailure, LookupOutcome};
use reqwest::Url;

use crate::error::ClientError;
use crate::normalize::{LookupPayload, normalize};

pub const TRANSPORT_MESSAGE: &str = "An error occurred while fetching data.";

/// Dictionary lookup service interface
#[async_trait]
pub trait DictionaryLookup: Send + Sync {
    /// Issue exactly one request for `word` and interpret the response
    async fn lookup(&self, word: &str) -> LookupOutcome;
}

/// HTTP client for the public dictionary API
#[derive(Clone)]
pub struct LookupClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl LookupClient {
    pub fn new(config: &LookupConfig) -> Result<Self, ClientError> {
        let endpoint = Url::parse(&config.endpoint).map_err(|e| ClientError::InvalidEndpoint {
            endpoint: config.endpoint.clone(),
            reason: e.to_string(),
        })?;

        if endpoint.cannot_be_a_base() {
            return Err(ClientError::InvalidEndpoint {
                endpoint: config.endpoint.clone(),
                reason: "URL cannot take path segments".to_string(),
            });
        }

        let mut builder = reqwest::Client::builder();
        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }

        Ok(Self {
            client: builder.build()?,
            endpoint,
        })
    }

    /// Endpoint with the word appended as an encoded path segment
    pub fn word_url(&self, word: &str) -> Result<Url, LookupFailure> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| transport_error())?
            .pop_if_empty()
            .push(word);
        Ok(url)
    }
}

#[async_trait]
impl DictionaryLookup for LookupClient {
    async fn lookup(&self, word: &str) -> LookupOutcome {
        let url = self.word_url(word)?;
        tracing::debug!(%url, "Requesting definitions");

        let response = self.client.get(url).send().await.map_err(|e| {
            tracing::warn!("Lookup request for '{}' failed: {}", word, e);
            transport_error()
        })?;

        // Not-found answers come back as 404 with a JSON body, so the status is informational
        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            tracing::warn!("Failed to read lookup response for '{}': {}", word, e);
            transport_error()
        })?;
        tracing::debug!(%status, bytes = body.len(), "Lookup response received");

        normalize(parse_payload(&body)?)
    }
}

/// Decode a response body; anything that is not a known payload shape is a transport error
pub fn parse_payload(body: &[u8]) -> Result<LookupPayload, LookupFailure> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::warn!("Unreadable lookup response: {}", e);
        transport_error()
    })
}

fn transport_error() -> LookupFailure {
    LookupFailure::TransportError(TRANSPORT_MESSAGE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(endpoint: &str) -> LookupClient {
        LookupClient::new(&LookupConfig {
            endpoint: endpoint.to_string(),
            timeout_seconds: None,
        })
        .unwrap()
    }

    #[test]
    fn word_is_appended_as_segment() {
        let url = client("https://api.dictionaryapi.dev/api/v2/entries/en")
            .word_url("hello")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.dictionaryapi.dev/api/v2/entries/en/hello"
        );
    }

    #[test]
    fn trailing_slash_and_special_characters() {
        let url = client("http://localhost:8080/entries/")
            .word_url("ice cream/x")
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/entries/ice%20cream%2Fx");
    }

    #[test]
    fn rejects_invalid_endpoint() {
        let result = LookupClient::new(&LookupConfig {
            endpoint: "not a url".to_string(),
            timeout_seconds: Some(3),
        });
        assert!(matches!(result, Err(ClientError::InvalidEndpoint { .. })));

        let result = LookupClient::new(&LookupConfig {
            endpoint: "mailto:someone@example.org".to_string(),
            timeout_seconds: None,
        });
        assert!(matches!(result, Err(ClientError::InvalidEndpoint { .. })));
    }

    #[test]
    fn non_json_body_is_transport_error() {
        let err = parse_payload(b"<html>502 Bad Gateway</html>").unwrap_err();
        assert_eq!(
            err,
            LookupFailure::TransportError(TRANSPORT_MESSAGE.to_string())
        );
    }

    #[test]
    fn json_of_unknown_shape_is_transport_error() {
        assert!(parse_payload(br#"{"status": 500}"#).is_err());
        assert!(parse_payload(br#"[{"phonetic": "x"}]"#).is_err());
    }

    #[test]
    fn not_found_body_parses() {
        let payload = parse_payload(
            br#"{"title":"No Definitions Found","message":"Sorry pal","resolution":"Try again"}"#,
        )
        .unwrap();
        assert!(matches!(
            normalize(payload),
            Err(LookupFailure::NotFound(_))
        ));
    }
}
