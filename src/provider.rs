// Quote provider seam
// The engine consumes flight and lodging quotes through these traits; transport
// is owned by the implementations (HTTP adapter, in-memory scripted provider).

use crate::quotes::{Baggage, FlightProviderKind, FlightQuote, FlightSegment, LodgingQuote};
use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Provider returned {status_code}: {message}")]
    Status { status_code: u16, message: String },

    #[error("Could not decode provider response: {0}")]
    Decode(String),

    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    #[error("Other error: {0}")]
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightSearch {
    pub origin: String,
    pub destination: String,
    pub depart_date: NaiveDate,
    pub return_date: NaiveDate,
    pub adults: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LodgingSearch {
    pub destination: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub adults: u32,
}

#[async_trait]
pub trait FlightQuoteProvider: Send + Sync {
    async fn flight_quotes(&self, search: &FlightSearch) -> Result<Vec<FlightQuote>, ProviderError>;
}

#[async_trait]
pub trait LodgingQuoteProvider: Send + Sync {
    async fn lodging_quotes(
        &self,
        search: &LodgingSearch,
    ) -> Result<Vec<LodgingQuote>, ProviderError>;
}

/// Provider serving scripted quotes from memory.
///
/// Each leg answers with either a fixed list or a fixed error, and counts how
/// often it was asked, so callers can check which legs were actually fetched.
pub struct InMemoryQuoteProvider {
    flights: Mutex<Result<Vec<FlightQuote>, ProviderError>>,
    lodging: Mutex<Result<Vec<LodgingQuote>, ProviderError>>,
    flight_calls: AtomicUsize,
    lodging_calls: AtomicUsize,
    last_lodging_search: Mutex<Option<LodgingSearch>>,
}

impl InMemoryQuoteProvider {
    pub fn new(flights: Vec<FlightQuote>, lodging: Vec<LodgingQuote>) -> Self {
        Self {
            flights: Mutex::new(Ok(flights)),
            lodging: Mutex::new(Ok(lodging)),
            flight_calls: AtomicUsize::new(0),
            lodging_calls: AtomicUsize::new(0),
            last_lodging_search: Mutex::new(None),
        }
    }

    pub fn set_flights(&self, flights: Result<Vec<FlightQuote>, ProviderError>) {
        *self.flights.lock() = flights;
    }

    pub fn set_lodging(&self, lodging: Result<Vec<LodgingQuote>, ProviderError>) {
        *self.lodging.lock() = lodging;
    }

    pub fn flight_calls(&self) -> usize {
        self.flight_calls.load(Ordering::SeqCst)
    }

    pub fn lodging_calls(&self) -> usize {
        self.lodging_calls.load(Ordering::SeqCst)
    }

    pub fn last_lodging_search(&self) -> Option<LodgingSearch> {
        self.last_lodging_search.lock().clone()
    }
}

#[async_trait]
impl FlightQuoteProvider for InMemoryQuoteProvider {
    async fn flight_quotes(&self, _search: &FlightSearch) -> Result<Vec<FlightQuote>, ProviderError> {
        self.flight_calls.fetch_add(1, Ordering::SeqCst);
        self.flights.lock().clone()
    }
}

#[async_trait]
impl LodgingQuoteProvider for InMemoryQuoteProvider {
    async fn lodging_quotes(
        &self,
        search: &LodgingSearch,
    ) -> Result<Vec<LodgingQuote>, ProviderError> {
        self.lodging_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_lodging_search.lock() = Some(search.clone());
        self.lodging.lock().clone()
    }
}

// Athens to Tokyo with one connection, used by demos and tests
pub fn sample_flight() -> FlightQuote {
    FlightQuote {
        provider: Some(FlightProviderKind::Airline),
        airline: Some("Aegean".to_string()),
        currency: Some("EUR".to_string()),
        segments: vec![FlightSegment {
            from: "ATH".to_string(),
            to: "NRT".to_string(),
            depart: "2025-09-20T08:00Z".to_string(),
            arrive: "2025-09-20T20:00Z".to_string(),
            carrier: "A3".to_string(),
        }],
        baggage: Some(Baggage {
            carry_on: true,
            ..Default::default()
        }),
        ..FlightQuote::new(400.0, 1, 780, vec![120])
    }
}

pub fn sample_lodging() -> LodgingQuote {
    LodgingQuote {
        refundable: true,
        rating: Some(4.2),
        ..LodgingQuote::new(80.0, 6)
    }
}
