// Engine configuration
// Every fallback constant and rule threshold lives here and is passed explicitly
// into the pricing and generation code.

use serde::{Deserialize, Serialize};

pub const API_BASE_ENV: &str = "PACKAGE_ENGINE_API_BASE";
pub const API_TIMEOUT_ENV: &str = "PACKAGE_ENGINE_TIMEOUT_MS";
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8787";

// Thresholds for the flight quality gate
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct QualityRules {
    pub max_stops: u32,
    pub max_duration_minutes: u32,
    pub min_layover_minutes: u32,
    pub max_layover_minutes: u32,
}

impl Default for QualityRules {
    fn default() -> Self {
        Self {
            max_stops: 1,
            max_duration_minutes: 16 * 60,
            min_layover_minutes: 70,
            max_layover_minutes: 300,
        }
    }
}

// Values substituted for missing or non-numeric pricing inputs
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PricingDefaults {
    pub flight_price: f64,
    pub hotel_price_per_night: f64,
    pub hotel_nights: f64,
    pub ancillary: f64,
    pub margin_pct: f64,
    pub note: String,
}

impl Default for PricingDefaults {
    fn default() -> Self {
        Self {
            flight_price: 0.0,
            hotel_price_per_night: 70.0,
            hotel_nights: 1.0,
            ancillary: 0.0,
            margin_pct: 0.08,
            note: "Package priced with quality flight constraints".to_string(),
        }
    }
}

// Nightly-rate multipliers per package variant
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct VariantMultipliers {
    pub value: f64,
    pub balanced: f64,
    pub premium: f64,
}

impl Default for VariantMultipliers {
    fn default() -> Self {
        Self {
            value: 0.95,
            balanced: 1.0,
            premium: 1.25,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EngineConfig {
    pub quality: QualityRules,
    pub pricing: PricingDefaults,
    pub multipliers: VariantMultipliers,
    /// Flat fee added to every generated package.
    pub package_fees: f64,
    pub package_margin_pct: f64,
    /// Guest score of the stand-in lodging used when no lodging quote is available.
    pub fallback_lodging_rating: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            quality: QualityRules::default(),
            pricing: PricingDefaults::default(),
            multipliers: VariantMultipliers::default(),
            package_fees: 15.0,
            package_margin_pct: 0.08,
            fallback_lodging_rating: 4.2,
        }
    }
}

// Settings for the HTTP quote provider
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProviderConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    pub user_agent: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            timeout_ms: 10_000,
            user_agent: concat!("package_pricing_engine/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ProviderConfig {
    // Reads the API base and timeout from the environment, keeping defaults for anything unset
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(base) = lookup(API_BASE_ENV).filter(|v| !v.trim().is_empty()) {
            config.base_url = base.trim().trim_end_matches('/').to_string();
        }

        match lookup(API_TIMEOUT_ENV).map(|v| v.trim().parse::<u64>()) {
            Some(Ok(timeout_ms)) if timeout_ms > 0 => config.timeout_ms = timeout_ms,
            Some(_) => tracing::warn!(
                variable = API_TIMEOUT_ENV,
                "ignoring invalid provider timeout, using {}ms",
                config.timeout_ms
            ),
            None => {}
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_engine_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.quality.max_duration_minutes, 960);
        assert_eq!(config.pricing.hotel_price_per_night, 70.0);
        assert_eq!(config.pricing.margin_pct, 0.08);
        assert_eq!(config.package_fees, 15.0);
        assert_eq!(config.multipliers.premium, 1.25);
    }

    #[test]
    fn test_provider_config_from_environment() {
        let config = ProviderConfig::from_lookup(lookup_from(&[
            (API_BASE_ENV, "https://quotes.example.com/"),
            (API_TIMEOUT_ENV, "2500"),
        ]));
        assert_eq!(config.base_url, "https://quotes.example.com");
        assert_eq!(config.timeout_ms, 2500);
    }

    #[test]
    fn test_provider_config_ignores_bad_values() {
        let config = ProviderConfig::from_lookup(lookup_from(&[
            (API_BASE_ENV, "   "),
            (API_TIMEOUT_ENV, "soon"),
        ]));
        assert_eq!(config, ProviderConfig::default());
    }
}
