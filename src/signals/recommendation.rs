// =============================================================================
// Recommendation: Buy / Sell / Hold from the latest RSI value
// =============================================================================
//
//   RSI < 30  =>  Buy   (oversold, expect mean reversion upward)
//   RSI > 70  =>  Sell  (overbought)
//   otherwise =>  Hold  (boundaries 30 and 70 included)

use crate::types::{Recommendation, RsiZone};

/// Classify a single RSI value.
///
/// The value must come from a non-empty RSI series; the analysis pipeline
/// rejects empty series before reaching this point.
pub fn classify_recommendation(latest_rsi: f64) -> Recommendation {
    Recommendation::from(RsiZone::from_value(latest_rsi))
}
