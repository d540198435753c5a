// Quote records as supplied by the flight and lodging providers.
//
// Providers are loosely shaped, so every field the engine may need to fall back
// on is optional here and resolved later by the pricing helpers.

use serde::{Deserialize, Serialize};

// Where a flight offer came from; unrecognised labels are kept verbatim
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum FlightProviderKind {
    Airline,
    Meta,
    Other(String),
}

impl From<String> for FlightProviderKind {
    fn from(label: String) -> Self {
        match label.as_str() {
            "airline" => FlightProviderKind::Airline,
            "meta" => FlightProviderKind::Meta,
            _ => FlightProviderKind::Other(label),
        }
    }
}

impl From<FlightProviderKind> for String {
    fn from(kind: FlightProviderKind) -> Self {
        match kind {
            FlightProviderKind::Airline => "airline".to_string(),
            FlightProviderKind::Meta => "meta".to_string(),
            FlightProviderKind::Other(label) => label,
        }
    }
}

// Segment times stay as the provider sent them; nothing here reads them
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct FlightSegment {
    pub from: String,
    pub to: String,
    pub depart: String,
    pub arrive: String,
    /// IATA carrier code, e.g. "A3".
    pub carrier: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Baggage {
    pub carry_on: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked_kg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pieces: Option<f64>,
}

/// One priced flight offer.
///
/// `price` stays optional because a provider record may omit it; such a quote
/// never passes the quality filter and prices as zero.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FlightQuote {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<FlightProviderKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub airline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fare_brand: Option<String>,
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    pub segments: Vec<FlightSegment>,
    pub stops: u32,
    pub duration_minutes: u32,
    pub layovers_minutes: Vec<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baggage: Option<Baggage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extras: Vec<String>,
}

impl FlightQuote {
    pub fn new(price: f64, stops: u32, duration_minutes: u32, layovers_minutes: Vec<u32>) -> Self {
        Self {
            price: Some(price),
            stops,
            duration_minutes,
            layovers_minutes,
            ..Default::default()
        }
    }
}

// Meal plan codes used by lodging suppliers; unknown codes are kept verbatim
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum Board {
    RoomOnly,
    BedAndBreakfast,
    HalfBoard,
    AllInclusive,
    Other(String),
}

impl From<String> for Board {
    fn from(code: String) -> Self {
        match code.as_str() {
            "RO" => Board::RoomOnly,
            "BB" => Board::BedAndBreakfast,
            "HB" => Board::HalfBoard,
            "AI" => Board::AllInclusive,
            _ => Board::Other(code),
        }
    }
}

impl From<Board> for String {
    fn from(board: Board) -> Self {
        match board {
            Board::RoomOnly => "RO".to_string(),
            Board::BedAndBreakfast => "BB".to_string(),
            Board::HalfBoard => "HB".to_string(),
            Board::AllInclusive => "AI".to_string(),
            Board::Other(code) => code,
        }
    }
}

/// One priced lodging offer, quoted per night.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LodgingQuote {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stars: Option<f64>,
    /// Guest score.
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub board: Option<Board>,
    pub refundable: bool,
    pub price_per_night: Option<f64>,
    pub nights: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub amenities: Vec<String>,
}

impl LodgingQuote {
    pub fn new(price_per_night: f64, nights: u32) -> Self {
        Self {
            price_per_night: Some(price_per_night),
            nights: Some(nights),
            ..Default::default()
        }
    }

    // Copy of this quote with a new nightly rate and stay length; the original is untouched
    pub fn repriced(&self, price_per_night: f64, nights: u32) -> Self {
        Self {
            price_per_night: Some(price_per_night),
            nights: Some(nights),
            ..self.clone()
        }
    }
}
