// Variant generator
// Turns one trip query into the value / balanced / premium packages by pairing
// quality-filtered flights with multiplier-adjusted lodging options.

use crate::config::{EngineConfig, VariantMultipliers};
use crate::pricing::{coerce_or, round_half_away, PriceCalculator, PriceOptions, PricedPackage};
use crate::provider::{
    FlightQuoteProvider, FlightSearch, LodgingQuoteProvider, LodgingSearch, ProviderError,
};
use crate::quotes::{FlightQuote, LodgingQuote};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageQuery {
    pub origin: String,
    pub destination: String,
    pub depart_date: NaiveDate,
    pub return_date: NaiveDate,
    pub adults: u32,
}

impl PackageQuery {
    pub fn nights(&self) -> u32 {
        nights_between(self.depart_date, self.return_date)
    }

    fn flight_search(&self) -> FlightSearch {
        FlightSearch {
            origin: self.origin.clone(),
            destination: self.destination.clone(),
            depart_date: self.depart_date,
            return_date: self.return_date,
            adults: self.adults.max(1),
        }
    }

    fn lodging_search(&self) -> LodgingSearch {
        LodgingSearch {
            destination: self.destination.clone(),
            check_in: self.depart_date,
            check_out: self.return_date,
            adults: self.adults.max(1),
        }
    }
}

// Length of stay in nights, never less than one
pub fn nights_between(depart: NaiveDate, return_date: NaiveDate) -> u32 {
    let days = (return_date - depart).num_days().max(1);
    u32::try_from(days).unwrap_or(u32::MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Value,
    Balanced,
    Premium,
}

impl Variant {
    /// Generation order.
    pub const ALL: [Variant; 3] = [Variant::Value, Variant::Balanced, Variant::Premium];

    pub fn key(&self) -> &'static str {
        match self {
            Variant::Value => "value",
            Variant::Balanced => "balanced",
            Variant::Premium => "premium",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Variant::Value => "Value Plan",
            Variant::Balanced => "Balanced Plan",
            Variant::Premium => "Premium Plan",
        }
    }

    pub fn highlights(&self) -> [&'static str; 3] {
        match self {
            Variant::Value => ["Smart location", "Budget food tips", "Transit friendly"],
            Variant::Balanced => ["Good location", "Must-see sights", "Free afternoon"],
            Variant::Premium => ["Central hotel", "Top attractions", "Signature experience"],
        }
    }

    pub fn multiplier(&self, multipliers: &VariantMultipliers) -> f64 {
        match self {
            Variant::Value => multipliers.value,
            Variant::Balanced => multipliers.balanced,
            Variant::Premium => multipliers.premium,
        }
    }

    /// Lodging options offered by this variant, picked by position in the
    /// provider's list. Missing positions are dropped, so the result may be
    /// empty, and premium may list the same quote twice.
    pub fn select_lodging<'a>(&self, hotels: &'a [LodgingQuote]) -> Vec<&'a LodgingQuote> {
        let picks = match self {
            Variant::Value => vec![hotels.get(1).or_else(|| hotels.first())],
            Variant::Balanced => vec![hotels.first(), hotels.get(1)],
            Variant::Premium => vec![hotels.get(2).or_else(|| hotels.first()), hotels.first()],
        };
        picks.into_iter().flatten().collect()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageMeta {
    pub origin: String,
    pub depart_date: NaiveDate,
    pub return_date: NaiveDate,
    pub adults: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    /// Stable for identical queries: destination, variant key and departure date.
    pub id: String,
    pub title: String,
    pub destination: String,
    pub variant: Variant,
    pub nights: u32,
    pub highlights: Vec<String>,
    /// Priced against the first entry of `hotels` only.
    pub pricing: PricedPackage,
    pub flight: FlightQuote,
    pub hotels: Vec<LodgingQuote>,
    pub meta: PackageMeta,
}

impl Package {
    // Fresh price for a different lodging option of this package; None if the index is out of range
    pub fn reprice_with(&self, hotel_index: usize, config: &EngineConfig) -> Option<PricedPackage> {
        let hotel = self.hotels.get(hotel_index)?;
        let calculator = PriceCalculator::new(config.pricing.clone());
        Some(calculator.compute(Some(&self.flight), Some(hotel), &package_options(config)))
    }
}

fn package_options(config: &EngineConfig) -> PriceOptions {
    PriceOptions {
        fees: Some(config.package_fees),
        margin_pct: Some(config.package_margin_pct),
        ..Default::default()
    }
}

// What happened on one provider leg of a generation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LegOutcome {
    Received { total: usize, accepted: usize },
    Failed { reason: String },
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    NoQualifyingFlights,
    FlightProviderFailed,
}

#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub packages: Vec<Package>,
    pub nights: u32,
    pub flights: LegOutcome,
    pub lodging: LegOutcome,
}

impl GenerationReport {
    /// Why no packages were produced, or `None` when there are packages.
    pub fn empty_reason(&self) -> Option<EmptyReason> {
        if !self.packages.is_empty() {
            return None;
        }
        match self.flights {
            LegOutcome::Failed { .. } => Some(EmptyReason::FlightProviderFailed),
            _ => Some(EmptyReason::NoQualifyingFlights),
        }
    }

    // True when packages were priced against the stand-in lodging quote
    pub fn used_fallback_lodging(&self) -> bool {
        !self.packages.is_empty()
            && matches!(
                self.lodging,
                LegOutcome::Failed { .. } | LegOutcome::Received { total: 0, .. }
            )
    }
}

pub struct PackageGenerator {
    flights: Arc<dyn FlightQuoteProvider>,
    lodging: Arc<dyn LodgingQuoteProvider>,
    calculator: PriceCalculator,
    config: EngineConfig,
}

impl PackageGenerator {
    pub fn new(
        flights: Arc<dyn FlightQuoteProvider>,
        lodging: Arc<dyn LodgingQuoteProvider>,
        config: EngineConfig,
    ) -> Self {
        Self {
            flights,
            lodging,
            calculator: PriceCalculator::new(config.pricing.clone()),
            config,
        }
    }

    // One provider serving both legs
    pub fn with_provider<P>(provider: Arc<P>, config: EngineConfig) -> Self
    where
        P: FlightQuoteProvider + LodgingQuoteProvider + 'static,
    {
        Self::new(provider.clone(), provider, config)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub async fn generate_packages(&self, query: &PackageQuery) -> Vec<Package> {
        self.generate_report(query).await.packages
    }

    /// Runs the full pipeline for one query.
    ///
    /// Provider failures are recorded in the report instead of being returned:
    /// a failed flight leg yields no packages, a failed lodging leg yields
    /// packages priced against the stand-in lodging quote. Lodging is only
    /// requested once at least one flight passes the quality rules.
    pub async fn generate_report(&self, query: &PackageQuery) -> GenerationReport {
        let nights = query.nights();

        let (flights, flight_outcome) = match self.flights.flight_quotes(&query.flight_search()).await
        {
            Ok(quotes) => {
                let total = quotes.len();
                let accepted: Vec<FlightQuote> = quotes
                    .into_iter()
                    .filter(|f| self.config.quality.accepts(f))
                    .collect();
                let outcome = LegOutcome::Received {
                    total,
                    accepted: accepted.len(),
                };
                (accepted, outcome)
            }
            Err(e) => {
                warn_provider_failure("flights", query, &e);
                (
                    Vec::new(),
                    LegOutcome::Failed {
                        reason: e.to_string(),
                    },
                )
            }
        };

        if flights.is_empty() {
            info!(
                origin = %query.origin,
                destination = %query.destination,
                "no acceptable flights, skipping lodging search"
            );
            return GenerationReport {
                packages: Vec::new(),
                nights,
                flights: flight_outcome,
                lodging: LegOutcome::Skipped,
            };
        }

        let (hotels, lodging_outcome) =
            match self.lodging.lodging_quotes(&query.lodging_search()).await {
                Ok(quotes) => {
                    let outcome = LegOutcome::Received {
                        total: quotes.len(),
                        accepted: quotes.len(),
                    };
                    (quotes, outcome)
                }
                Err(e) => {
                    warn_provider_failure("lodging", query, &e);
                    (
                        Vec::new(),
                        LegOutcome::Failed {
                            reason: e.to_string(),
                        },
                    )
                }
            };

        let last = flights.len() - 1;
        let packages = Variant::ALL
            .iter()
            .enumerate()
            .map(|(i, variant)| {
                // Provider order, not price order; short lists repeat the last flight
                let flight = &flights[i.min(last)];
                self.build_package(query, *variant, flight, &hotels, nights)
            })
            .collect();

        GenerationReport {
            packages,
            nights,
            flights: flight_outcome,
            lodging: lodging_outcome,
        }
    }

    fn build_package(
        &self,
        query: &PackageQuery,
        variant: Variant,
        flight: &FlightQuote,
        hotels: &[LodgingQuote],
        nights: u32,
    ) -> Package {
        let multiplier = variant.multiplier(&self.config.multipliers);
        let base_rate = self.config.pricing.hotel_price_per_night;

        let options: Vec<LodgingQuote> = variant
            .select_lodging(hotels)
            .into_iter()
            .map(|h| {
                let rate = round_half_away(coerce_or(h.price_per_night, base_rate) * multiplier);
                h.repriced(rate, nights)
            })
            .collect();

        let fallback;
        let representative = match options.first() {
            Some(h) => h,
            None => {
                fallback = self.fallback_lodging(nights);
                &fallback
            }
        };

        let pricing = self.calculator.compute(
            Some(flight),
            Some(representative),
            &package_options(&self.config),
        );

        debug!(
            destination = %query.destination,
            variant = variant.key(),
            lodging_options = options.len(),
            total_per_person = pricing.total_per_person,
            "priced package variant"
        );

        Package {
            id: format!("{}-{}-{}", query.destination, variant.key(), query.depart_date),
            title: format!("{} — {}", query.destination, variant.title()),
            destination: query.destination.clone(),
            variant,
            nights,
            highlights: variant.highlights().iter().map(|s| s.to_string()).collect(),
            pricing,
            flight: flight.clone(),
            hotels: options,
            meta: PackageMeta {
                origin: query.origin.clone(),
                depart_date: query.depart_date,
                return_date: query.return_date,
                adults: query.adults,
            },
        }
    }

    fn fallback_lodging(&self, nights: u32) -> LodgingQuote {
        LodgingQuote {
            refundable: true,
            rating: Some(self.config.fallback_lodging_rating),
            ..LodgingQuote::new(self.config.pricing.hotel_price_per_night, nights)
        }
    }
}

fn warn_provider_failure(leg: &str, query: &PackageQuery, error: &ProviderError) {
    warn!(
        leg,
        origin = %query.origin,
        destination = %query.destination,
        error = %error,
        "quote provider failed, treating leg as empty"
    );
}
