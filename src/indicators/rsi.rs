// =============================================================================
// Relative Strength Index (RSI): Simple Moving Average
// =============================================================================
//
// RSI measures the magnitude of recent gains against recent losses to
// evaluate whether an asset is overbought or oversold.
//
// Step 1: Compute price changes (deltas) from consecutive prices.
// Step 2: Split each delta into a gain (positive part) and a loss
//         (magnitude of the negative part).
// Step 3: Average gains and losses over a trailing window of `period`
//         deltas (plain SMA, no smoothing carried between windows).
// Step 4: RS  = avg_gain / avg_loss
//         RSI = 100 - 100 / (1 + RS)
//
// The first window needs `period` deltas, i.e. `period + 1` prices, so the
// output is exactly `period` entries shorter than the input.
// =============================================================================

/// Default look-back period.
pub const DEFAULT_RSI_PERIOD: usize = 14;

/// Outcome of turning one window's averages into an RSI value.
///
/// The zero-denominator cases are named explicitly so that no infinity or NaN
/// can leak into a response.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RsiReading {
    /// Both averages non-zero: the ratio formula applies.
    Ratio(f64),
    /// Gains only: maximal overbought reading.
    NoLosses,
    /// Losses only: maximal oversold reading.
    NoGains,
    /// No movement at all inside the window.
    Flat,
}

impl RsiReading {
    pub fn from_averages(avg_gain: f64, avg_loss: f64) -> Self {
        match (avg_gain == 0.0, avg_loss == 0.0) {
            (true, true) => Self::Flat,
            (false, true) => Self::NoLosses,
            (true, false) => Self::NoGains,
            (false, false) => Self::Ratio(avg_gain / avg_loss),
        }
    }

    /// RSI value in [0, 100].
    pub fn value(self) -> f64 {
        match self {
            Self::Ratio(rs) => 100.0 - 100.0 / (1.0 + rs),
            Self::NoLosses => 100.0,
            Self::NoGains => 0.0,
            Self::Flat => 50.0,
        }
    }
}

/// Compute the RSI series for `prices` over a trailing window of `period`.
///
/// The returned vector has `prices.len() - period` values (the first RSI
/// corresponds to `prices[period]`), or is empty when there are fewer than
/// `period + 1` prices or `period == 0`.
pub fn calculate_rsi(prices: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || prices.len() < period + 1 {
        return Vec::new();
    }

    let deltas: Vec<f64> = prices.windows(2).map(|w| w[1] - w[0]).collect();
    let period_f = period as f64;

    deltas
        .windows(period)
        .map(|window| {
            let (sum_gain, sum_loss) = window.iter().fold((0.0_f64, 0.0_f64), |(g, l), &d| {
                if d > 0.0 {
                    (g + d, l)
                } else {
                    (g, l - d)
                }
            });
            RsiReading::from_averages(sum_gain / period_f, sum_loss / period_f).value()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(len: usize) -> Vec<f64> {
        (1..=len).map(|x| x as f64).collect()
    }

    #[test]
    fn rsi_empty_input() {
        assert!(calculate_rsi(&[], DEFAULT_RSI_PERIOD).is_empty());
    }

    #[test]
    fn rsi_period_zero() {
        assert!(calculate_rsi(&[1.0, 2.0, 3.0], 0).is_empty());
    }

    #[test]
    fn rsi_insufficient_data() {
        // 14 prices => 13 deltas, one short of a full window.
        assert!(calculate_rsi(&ramp(14), 14).is_empty());
        assert!(calculate_rsi(&ramp(5), 14).is_empty());
    }

    #[test]
    fn rsi_length_is_input_minus_period() {
        for len in 0usize..40 {
            let prices: Vec<f64> = (0..len).map(|i| 100.0 + ((i * 7) % 5) as f64).collect();
            let expected = len.saturating_sub(14);
            assert_eq!(calculate_rsi(&prices, 14).len(), expected, "len={len}");
        }
        assert_eq!(calculate_rsi(&ramp(10), 3).len(), 7);
    }

    #[test]
    fn rsi_all_gains() {
        let series = calculate_rsi(&ramp(30), 14);
        assert_eq!(series.len(), 16);
        for &v in &series {
            assert_eq!(v, 100.0);
        }
    }

    #[test]
    fn rsi_all_losses() {
        let prices: Vec<f64> = ramp(30).into_iter().rev().collect();
        let series = calculate_rsi(&prices, 14);
        assert_eq!(series.len(), 16);
        for &v in &series {
            assert_eq!(v, 0.0);
        }
    }

    #[test]
    fn rsi_flat_market_is_neutral() {
        let series = calculate_rsi(&[100.0; 20], 14);
        assert_eq!(series, vec![50.0; 6]);
    }

    #[test]
    fn rsi_single_window_matches_hand_computation() {
        let prices = [
            100.0, 102.0, 101.0, 105.0, 107.0, 106.0, 110.0, 108.0, 112.0, 115.0, 113.0, 117.0,
            119.0, 118.0, 120.0,
        ];
        let series = calculate_rsi(&prices, 14);
        assert_eq!(series.len(), 1);
        // Gains sum to 27, losses to 7 => RSI = 100 * 27 / 34.
        assert!((series[0] - 100.0 * 27.0 / 34.0).abs() < 1e-9, "got {}", series[0]);
    }

    #[test]
    fn rsi_window_slides_without_smoothing() {
        // Window of 2 deltas: [+1, -1] then [-1, -1].
        let series = calculate_rsi(&[10.0, 11.0, 10.0, 9.0], 2);
        assert_eq!(series.len(), 2);
        assert!((series[0] - 50.0).abs() < 1e-12);
        assert_eq!(series[1], 0.0);
    }

    #[test]
    fn rsi_range_check() {
        let prices = vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08, 45.89, 46.03,
            44.18, 44.22, 44.57, 43.42, 42.66, 43.13,
        ];
        let series = calculate_rsi(&prices, 14);
        assert_eq!(series.len(), 4);
        for &v in &series {
            assert!((0.0..=100.0).contains(&v), "RSI {v} out of range");
        }
    }

    #[test]
    fn rsi_is_deterministic() {
        let prices: Vec<f64> = (0..60).map(|i| 50.0 + (i as f64 * 0.7).sin() * 5.0).collect();
        assert_eq!(calculate_rsi(&prices, 14), calculate_rsi(&prices, 14));
    }

    #[test]
    fn reading_edge_cases() {
        assert_eq!(RsiReading::from_averages(1.0, 0.0), RsiReading::NoLosses);
        assert_eq!(RsiReading::from_averages(0.0, 1.0), RsiReading::NoGains);
        assert_eq!(RsiReading::from_averages(0.0, 0.0), RsiReading::Flat);
        assert_eq!(RsiReading::from_averages(3.0, 1.0).value(), 75.0);
    }
}
