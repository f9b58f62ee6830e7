// =============================================================================
// Insight: Plain-language summary of RSI state and price trend
// =============================================================================
//
// Two sentences joined by a space:
//   1. RSI zone prose (oversold / overbought / neutral).
//   2. Percentage price change from the first to the last price, two
//      decimals, phrased as an increase or decrease.
//
// A zero starting price, or a ratio too large to represent, makes the
// percentage undefined. Each cause gets its own sentence instead of an "inf"
// or "NaN" in the text.
// =============================================================================

use crate::types::RsiZone;

/// Percentage change across a price window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriceChange {
    /// Signed percentage rounded to two decimals, e.g. `10.0` for +10 %.
    Percent(f64),
    /// The first price was zero.
    ZeroStart,
    /// The change overflowed `f64`.
    OutOfRange,
}

impl PriceChange {
    /// Returns `None` for an empty slice.
    pub fn over(prices: &[f64]) -> Option<Self> {
        let first = *prices.first()?;
        let last = *prices.last()?;

        if first == 0.0 {
            return Some(Self::ZeroStart);
        }

        // Round before classifying so the wording matches the printed figure.
        let pct = ((last - first) / first * 100.0 * 100.0).round() / 100.0;
        if pct.is_finite() {
            Some(Self::Percent(pct))
        } else {
            Some(Self::OutOfRange)
        }
    }

    fn sentence(self) -> String {
        match self {
            Self::Percent(pct) if pct > 0.0 => {
                format!("The price has increased by {pct:.2}% over the selected period.")
            }
            Self::Percent(pct) if pct < 0.0 => {
                format!(
                    "The price has decreased by {:.2}% over the selected period.",
                    pct.abs()
                )
            }
            Self::Percent(_) => {
                "The price has remained unchanged (0.00%) over the selected period.".to_string()
            }
            Self::ZeroStart => "The price change over the selected period is undefined \
                                because the starting price was zero."
                .to_string(),
            Self::OutOfRange => "The price change over the selected period is undefined \
                                 because it is too large to represent."
                .to_string(),
        }
    }
}

fn zone_sentence(zone: RsiZone) -> &'static str {
    match zone {
        RsiZone::Oversold => {
            "The RSI indicates that the asset is oversold. This could be a good \
             opportunity to buy for potential future gains."
        }
        RsiZone::Overbought => {
            "The RSI indicates that the asset is overbought. Consider taking profits \
             or waiting for a pullback before investing."
        }
        RsiZone::Neutral => {
            "The RSI is in a neutral zone. Monitor the market for potential entry or \
             exit points."
        }
    }
}

/// Build the insight text from the raw prices and their RSI series.
///
/// Returns `None` when either slice is empty.
pub fn build_insight(prices: &[f64], rsi: &[f64]) -> Option<String> {
    let latest_rsi = *rsi.last()?;
    let change = PriceChange::over(prices)?;

    Some(format!(
        "{} {}",
        zone_sentence(RsiZone::from_value(latest_rsi)),
        change.sentence()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_percent_increase() {
        let text = build_insight(&[100.0, 95.0, 110.0], &[50.0]).unwrap();
        assert!(text.contains("increased by 10.00%"), "{text}");
        assert!(text.starts_with("The RSI is in a neutral zone."));
    }

    #[test]
    fn ten_percent_decrease() {
        let text = build_insight(&[100.0, 104.0, 90.0], &[50.0]).unwrap();
        assert!(text.contains("decreased by 10.00%"), "{text}");
    }

    #[test]
    fn oversold_and_overbought_prose() {
        let low = build_insight(&[1.0, 2.0], &[12.0]).unwrap();
        assert!(low.starts_with("The RSI indicates that the asset is oversold."));
        assert!(low.contains("good opportunity to buy"));

        let high = build_insight(&[1.0, 2.0], &[88.0]).unwrap();
        assert!(high.starts_with("The RSI indicates that the asset is overbought."));
        assert!(high.contains("Consider taking profits"));
    }

    #[test]
    fn sentences_are_joined_by_single_space() {
        let text = build_insight(&[100.0, 120.0], &[50.0]).unwrap();
        assert_eq!(
            text,
            "The RSI is in a neutral zone. Monitor the market for potential entry or exit \
             points. The price has increased by 20.00% over the selected period."
        );
    }

    #[test]
    fn zero_start_price_is_reported_as_undefined() {
        assert_eq!(PriceChange::over(&[0.0, 5.0]), Some(PriceChange::ZeroStart));
        let text = build_insight(&[0.0, 5.0], &[50.0]).unwrap();
        assert!(text.contains("undefined because the starting price was zero"));
        assert!(!text.contains("inf") && !text.contains("NaN"));
    }

    #[test]
    fn overflowing_change_is_not_blamed_on_a_zero_start() {
        assert_eq!(PriceChange::over(&[1e-300, 1e300]), Some(PriceChange::OutOfRange));
        let text = build_insight(&[1e-300, 1e300], &[50.0]).unwrap();
        assert!(text.contains("undefined because it is too large to represent"), "{text}");
        assert!(!text.contains("starting price was zero"));
        assert!(!text.contains("inf") && !text.contains("NaN"));
    }

    #[test]
    fn sub_cent_moves_read_as_unchanged() {
        let up = build_insight(&[100.0, 100.001], &[50.0]).unwrap();
        assert!(up.contains("remained unchanged (0.00%)"), "{up}");

        let down = build_insight(&[100.0, 99.999], &[50.0]).unwrap();
        assert!(down.contains("remained unchanged (0.00%)"), "{down}");
    }

    #[test]
    fn smallest_visible_move_keeps_its_direction() {
        let up = build_insight(&[100.0, 100.01], &[50.0]).unwrap();
        assert!(up.contains("increased by 0.01%"), "{up}");

        let down = build_insight(&[100.0, 99.99], &[50.0]).unwrap();
        assert!(down.contains("decreased by 0.01%"), "{down}");
    }

    #[test]
    fn unchanged_price() {
        let text = build_insight(&[42.0, 40.0, 42.0], &[50.0]).unwrap();
        assert!(text.contains("remained unchanged (0.00%)"));
    }

    #[test]
    fn empty_inputs_yield_none() {
        assert!(build_insight(&[], &[50.0]).is_none());
        assert!(build_insight(&[1.0], &[]).is_none());
    }
}
