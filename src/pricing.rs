// Price calculator: one flight plus one lodging quote, ancillaries and margin

use crate::config::PricingDefaults;
use crate::quotes::{FlightQuote, LodgingQuote};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Optional ancillary costs and margin for a pricing call.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PriceOptions {
    pub transfers: Option<f64>,
    pub activities: Option<f64>,
    pub fees: Option<f64>,
    pub margin_pct: Option<f64>,
}

// Per-category costs. Ancillaries are only present when non-zero, so "free"
// and "not applicable" can be told apart by a renderer.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub flights: f64,
    pub hotel: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transfers: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activities: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fees: Option<f64>,
}

impl PriceBreakdown {
    pub fn items_total(&self) -> f64 {
        self.flights
            + self.hotel
            + self.transfers.unwrap_or_default()
            + self.activities.unwrap_or_default()
            + self.fees.unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedPackage {
    pub total_per_person: u64,
    pub breakdown: PriceBreakdown,
    /// Margin applied on top of the breakdown, already rounded.
    pub margin: f64,
    /// Informational freshness stamp, never used in arithmetic.
    pub verified_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

// Shared sanitizer for every numeric input: absent or non-finite falls back
pub fn coerce_or(value: Option<f64>, fallback: f64) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(fallback)
}

// f64::round already rounds half away from zero; named so call sites read as the rule
pub fn round_half_away(value: f64) -> f64 {
    value.round()
}

#[derive(Debug, Clone, Default)]
pub struct PriceCalculator {
    defaults: PricingDefaults,
}

impl PriceCalculator {
    pub fn new(defaults: PricingDefaults) -> Self {
        Self { defaults }
    }

    /// Computes the per-person price.
    ///
    /// The hotel total and the margin are each rounded on their own before the
    /// final sum is rounded again, which is what makes totals reproducible.
    pub fn compute(
        &self,
        flight: Option<&FlightQuote>,
        hotel: Option<&LodgingQuote>,
        options: &PriceOptions,
    ) -> PricedPackage {
        let d = &self.defaults;

        let transfers = coerce_or(options.transfers, d.ancillary);
        let activities = coerce_or(options.activities, d.ancillary);
        let fees = coerce_or(options.fees, d.ancillary);

        let nights = coerce_or(hotel.and_then(|h| h.nights.map(f64::from)), d.hotel_nights);
        let price_per_night = coerce_or(
            hotel.and_then(|h| h.price_per_night),
            d.hotel_price_per_night,
        );
        let hotel_total = round_half_away(price_per_night * nights);

        let flight_price = coerce_or(flight.and_then(|f| f.price), d.flight_price);

        let subtotal = flight_price + hotel_total + transfers + activities + fees;
        let margin_pct = coerce_or(options.margin_pct, d.margin_pct);
        let margin = round_half_away(subtotal * margin_pct);

        let total_per_person = round_half_away(subtotal + margin).max(0.0) as u64;

        PricedPackage {
            total_per_person,
            breakdown: PriceBreakdown {
                flights: flight_price,
                hotel: hotel_total,
                transfers: non_zero(transfers),
                activities: non_zero(activities),
                fees: non_zero(fees),
            },
            margin,
            verified_at: Utc::now(),
            notes: vec![d.note.clone()],
        }
    }
}

fn non_zero(value: f64) -> Option<f64> {
    (value != 0.0).then_some(value)
}

pub fn compute_price(
    flight: &FlightQuote,
    hotel: &LodgingQuote,
    options: &PriceOptions,
) -> PricedPackage {
    PriceCalculator::default().compute(Some(flight), Some(hotel), options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{sample_flight, sample_lodging};

    fn package_options() -> PriceOptions {
        PriceOptions {
            fees: Some(15.0),
            margin_pct: Some(0.08),
            ..Default::default()
        }
    }

    #[test]
    fn test_reference_package_price() {
        let priced = compute_price(
            &FlightQuote::new(400.0, 0, 300, vec![]),
            &LodgingQuote::new(80.0, 6),
            &package_options(),
        );

        assert_eq!(priced.breakdown.hotel, 480.0);
        assert_eq!(priced.breakdown.flights, 400.0);
        assert_eq!(priced.breakdown.fees, Some(15.0));
        assert_eq!(priced.breakdown.transfers, None);
        assert_eq!(priced.breakdown.activities, None);
        assert_eq!(priced.margin, 72.0);
        assert_eq!(priced.total_per_person, 967);
        assert_eq!(priced.notes.len(), 1);
    }

    #[test]
    fn test_breakdown_plus_margin_matches_total() {
        let priced = compute_price(
            &FlightQuote::new(389.4, 1, 700, vec![95]),
            &LodgingQuote::new(63.3, 4),
            &PriceOptions {
                transfers: Some(22.5),
                activities: Some(48.0),
                fees: Some(15.0),
                margin_pct: Some(0.1),
            },
        );

        let sum = priced.breakdown.items_total() + priced.margin;
        assert!((sum - priced.total_per_person as f64).abs() <= 0.5);
        assert_eq!(priced.breakdown.transfers, Some(22.5));
        assert_eq!(priced.breakdown.activities, Some(48.0));
    }

    #[test]
    fn test_intermediate_rounding_is_per_step() {
        // hotel 33.5 * 3 = 100.5 -> 101, subtotal 101, margin 101 * 0.05 = 5.05 -> 5
        let priced = compute_price(
            &FlightQuote::new(0.0, 0, 60, vec![]),
            &LodgingQuote::new(33.5, 3),
            &PriceOptions {
                margin_pct: Some(0.05),
                ..Default::default()
            },
        );
        assert_eq!(priced.breakdown.hotel, 101.0);
        assert_eq!(priced.margin, 5.0);
        assert_eq!(priced.total_per_person, 106);
    }

    #[test]
    fn test_missing_inputs_fall_back() {
        let flight = FlightQuote {
            price: None,
            ..FlightQuote::default()
        };
        let hotel = LodgingQuote {
            nights: None,
            ..LodgingQuote::new(90.0, 1)
        };

        let priced = compute_price(&flight, &hotel, &PriceOptions::default());
        assert_eq!(priced.breakdown.flights, 0.0);
        assert_eq!(priced.breakdown.hotel, 90.0);
        // default margin 8%: 90 * 0.08 = 7.2 -> 7
        assert_eq!(priced.total_per_person, 97);
    }

    #[test]
    fn test_non_finite_inputs_fall_back() {
        let priced = compute_price(
            &FlightQuote::new(f64::NAN, 0, 60, vec![]),
            &LodgingQuote {
                price_per_night: Some(f64::INFINITY),
                nights: Some(2),
                ..Default::default()
            },
            &PriceOptions {
                fees: Some(f64::NAN),
                margin_pct: Some(f64::NAN),
                ..Default::default()
            },
        );
        assert_eq!(priced.breakdown.flights, 0.0);
        assert_eq!(priced.breakdown.hotel, 140.0);
        assert_eq!(priced.breakdown.fees, None);
        assert_eq!(priced.total_per_person, 151);
    }

    #[test]
    fn test_missing_quotes_use_defaults() {
        let priced = PriceCalculator::default().compute(None, None, &PriceOptions::default());
        assert_eq!(priced.breakdown.hotel, 70.0);
        assert_eq!(priced.total_per_person, 76);
    }

    #[test]
    fn test_total_is_never_negative() {
        let priced = compute_price(
            &FlightQuote::new(100.0, 0, 60, vec![]),
            &LodgingQuote::new(0.0, 1),
            &PriceOptions {
                transfers: Some(-500.0),
                ..Default::default()
            },
        );
        assert_eq!(priced.total_per_person, 0);
        assert_eq!(priced.breakdown.transfers, Some(-500.0));
    }

    #[test]
    fn test_same_inputs_same_totals() {
        let first = compute_price(&sample_flight(), &sample_lodging(), &package_options());
        let second = compute_price(&sample_flight(), &sample_lodging(), &package_options());
        assert_eq!(first.total_per_person, second.total_per_person);
        assert_eq!(first.breakdown, second.breakdown);
        assert!(second.verified_at >= first.verified_at);
    }

    #[test]
    fn test_serialized_shape() {
        let priced = compute_price(&sample_flight(), &sample_lodging(), &package_options());
        let json = serde_json::to_value(&priced).unwrap();

        assert_eq!(json["totalPerPerson"], 967);
        assert_eq!(json["breakdown"]["fees"], 15.0);
        assert!(json["breakdown"].get("transfers").is_none());
        assert!(json["verifiedAt"].is_string());
    }
}
