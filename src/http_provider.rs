// HTTP adapter for the quote API
// GET {base}/api/flights and {base}/api/hotels, both answering with a JSON array.

use crate::config::ProviderConfig;
use crate::provider::{
    FlightQuoteProvider, FlightSearch, LodgingQuoteProvider, LodgingSearch, ProviderError,
};
use crate::quotes::{FlightQuote, LodgingQuote};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

pub struct HttpQuoteProvider {
    client: reqwest::Client,
    config: ProviderConfig,
}

impl HttpQuoteProvider {
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ProviderError::Other(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self, ProviderError> {
        Self::new(ProviderConfig::from_env())
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn get_array(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Value, ProviderError> {
        let url = self.endpoint(path);
        debug!(%url, "requesting quotes");

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let message = status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string();
            return Err(ProviderError::Status {
                status_code: status.as_u16(),
                message,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| self.transport_error(e))
    }

    fn transport_error(&self, error: reqwest::Error) -> ProviderError {
        if error.is_timeout() {
            ProviderError::Timeout(self.config.timeout_ms)
        } else if error.is_decode() {
            ProviderError::Decode(error.to_string())
        } else {
            ProviderError::Network(error.to_string())
        }
    }
}

/// Turns a provider body into quote records.
///
/// Anything other than a JSON array counts as zero quotes. Records that do not
/// decode are dropped one by one rather than failing the whole batch.
pub fn decode_quotes<T: DeserializeOwned>(kind: &str, body: Value) -> Vec<T> {
    let Value::Array(items) = body else {
        warn!(kind, "provider body is not an array, treating as no quotes");
        return Vec::new();
    };

    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<T>(item) {
            Ok(quote) => Some(quote),
            Err(e) => {
                warn!(kind, index, error = %e, "dropping undecodable quote");
                None
            }
        })
        .collect()
}

#[async_trait]
impl FlightQuoteProvider for HttpQuoteProvider {
    async fn flight_quotes(&self, search: &FlightSearch) -> Result<Vec<FlightQuote>, ProviderError> {
        let query = [
            ("origin", search.origin.clone()),
            ("destination", search.destination.clone()),
            ("departDate", search.depart_date.to_string()),
            ("returnDate", search.return_date.to_string()),
            ("adults", search.adults.to_string()),
        ];
        let body = self.get_array("api/flights", &query).await?;
        Ok(decode_quotes("flight", body))
    }
}

#[async_trait]
impl LodgingQuoteProvider for HttpQuoteProvider {
    async fn lodging_quotes(
        &self,
        search: &LodgingSearch,
    ) -> Result<Vec<LodgingQuote>, ProviderError> {
        let query = [
            ("destination", search.destination.clone()),
            ("checkIn", search.check_in.to_string()),
            ("checkOut", search.check_out.to_string()),
            ("adults", search.adults.to_string()),
        ];
        let body = self.get_array("api/hotels", &query).await?;
        Ok(decode_quotes("lodging", body))
    }
}
