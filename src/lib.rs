// Package pricing and generation engine

pub mod config;
pub mod generator;
pub mod http_provider;
pub mod pricing;
pub mod provider;
pub mod quality;
pub mod quotes;

// Re-export key types for convenience
pub use config::{EngineConfig, PricingDefaults, ProviderConfig, QualityRules, VariantMultipliers};
pub use generator::{
    nights_between, EmptyReason, GenerationReport, LegOutcome, Package, PackageGenerator,
    PackageMeta, PackageQuery, Variant,
};
pub use http_provider::HttpQuoteProvider;
pub use pricing::{
    compute_price, PriceBreakdown, PriceCalculator, PriceOptions, PricedPackage,
};
pub use provider::{
    FlightQuoteProvider, FlightSearch, InMemoryQuoteProvider, LodgingQuoteProvider, LodgingSearch,
    ProviderError,
};
pub use quality::{is_acceptable, pick_best, pick_best_with};
pub use quotes::{Board, FlightQuote, FlightSegment, LodgingQuote};
