// Flight quality gate and best-flight selection

use crate::config::QualityRules;
use crate::quotes::FlightQuote;
use std::cmp::Ordering;

impl QualityRules {
    /// Whether a flight is acceptable: finite price, at most `max_stops` stops,
    /// no longer than `max_duration_minutes`, and every layover inside
    /// `[min_layover_minutes, max_layover_minutes]`.
    pub fn accepts(&self, flight: &FlightQuote) -> bool {
        if !flight.price.map_or(false, f64::is_finite) {
            return false;
        }

        if flight.stops > self.max_stops {
            return false;
        }

        if flight.duration_minutes > self.max_duration_minutes {
            return false;
        }

        flight
            .layovers_minutes
            .iter()
            .all(|m| (self.min_layover_minutes..=self.max_layover_minutes).contains(m))
    }
}

pub fn is_acceptable(flight: &FlightQuote) -> bool {
    QualityRules::default().accepts(flight)
}

// A missing quote is never acceptable
pub fn is_acceptable_opt(flight: Option<&FlightQuote>) -> bool {
    flight.map_or(false, is_acceptable)
}

pub fn pick_best(candidates: &[FlightQuote]) -> Option<&FlightQuote> {
    pick_best_with(&QualityRules::default(), candidates)
}

// Cheapest acceptable flight, shorter duration breaking price ties.
// min_by keeps the first of equal elements, so remaining ties go to input order.
pub fn pick_best_with<'a>(
    rules: &QualityRules,
    candidates: &'a [FlightQuote],
) -> Option<&'a FlightQuote> {
    candidates
        .iter()
        .filter(|f| rules.accepts(f))
        .min_by(|a, b| {
            let price_a = a.price.unwrap_or_default();
            let price_b = b.price.unwrap_or_default();
            price_a
                .partial_cmp(&price_b)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.duration_minutes.cmp(&b.duration_minutes))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(FlightQuote::new(300.0, 0, 180, vec![]), true; "direct flight")]
    #[test_case(FlightQuote::new(300.0, 1, 600, vec![120]), true; "one comfortable stop")]
    #[test_case(FlightQuote::new(300.0, 2, 600, vec![120, 120]), false; "two stops")]
    #[test_case(FlightQuote::new(300.0, 0, 960, vec![]), true; "exactly sixteen hours")]
    #[test_case(FlightQuote::new(300.0, 0, 961, vec![]), false; "over sixteen hours")]
    #[test_case(FlightQuote::new(300.0, 1, 600, vec![70]), true; "shortest allowed layover")]
    #[test_case(FlightQuote::new(300.0, 1, 600, vec![300]), true; "longest allowed layover")]
    #[test_case(FlightQuote::new(300.0, 1, 600, vec![69]), false; "layover too short")]
    #[test_case(FlightQuote::new(300.0, 1, 600, vec![301]), false; "layover too long")]
    #[test_case(FlightQuote::new(300.0, 1, 600, vec![120, 45]), false; "one bad layover spoils the flight")]
    #[test_case(FlightQuote::new(f64::NAN, 0, 180, vec![]), false; "nan price")]
    #[test_case(FlightQuote::new(f64::INFINITY, 0, 180, vec![]), false; "infinite price")]
    #[test_case(FlightQuote { price: None, ..FlightQuote::new(0.0, 0, 180, vec![]) }, false; "missing price")]
    fn test_quality_rules(flight: FlightQuote, expected: bool) {
        assert_eq!(is_acceptable(&flight), expected);
    }

    #[test]
    fn test_missing_quote_is_rejected() {
        assert!(!is_acceptable_opt(None));
        assert!(is_acceptable_opt(Some(&FlightQuote::new(99.0, 0, 120, vec![]))));
    }

    #[test]
    fn test_custom_rules() {
        let strict = QualityRules {
            max_stops: 0,
            ..QualityRules::default()
        };
        assert!(!strict.accepts(&FlightQuote::new(300.0, 1, 600, vec![120])));
    }

    #[test]
    fn test_pick_best_empty() {
        assert!(pick_best(&[]).is_none());
    }

    #[test]
    fn test_pick_best_skips_unacceptable() {
        let candidates = vec![
            FlightQuote::new(50.0, 2, 900, vec![90, 90]),
            FlightQuote::new(80.0, 0, 1000, vec![]),
        ];
        assert!(pick_best(&candidates).is_none());

        let mut candidates = candidates;
        candidates.push(FlightQuote::new(250.0, 1, 500, vec![100]));
        let best = pick_best(&candidates).unwrap();
        assert_eq!(best.price, Some(250.0));
        assert!(is_acceptable(best));
    }

    #[test]
    fn test_pick_best_prefers_lower_price() {
        let candidates = vec![
            FlightQuote::new(100.0, 0, 120, vec![]),
            FlightQuote::new(90.0, 1, 700, vec![200]),
        ];
        assert_eq!(pick_best(&candidates).unwrap().price, Some(90.0));
    }

    #[test]
    fn test_pick_best_breaks_price_tie_on_duration() {
        let candidates = vec![
            FlightQuote::new(100.0, 0, 300, vec![]),
            FlightQuote::new(100.0, 0, 200, vec![]),
        ];
        assert_eq!(pick_best(&candidates).unwrap().duration_minutes, 200);
    }

    #[test]
    fn test_pick_best_full_tie_keeps_input_order() {
        let first = FlightQuote {
            airline: Some("First".to_string()),
            ..FlightQuote::new(100.0, 0, 200, vec![])
        };
        let second = FlightQuote {
            airline: Some("Second".to_string()),
            ..FlightQuote::new(100.0, 0, 200, vec![])
        };
        let candidates = vec![first, second];
        assert_eq!(
            pick_best(&candidates).unwrap().airline.as_deref(),
            Some("First")
        );
    }
}
