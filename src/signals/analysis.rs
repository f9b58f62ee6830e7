// =============================================================================
// RSI Analysis: price series in, indicator verdict out
// =============================================================================
//
// Pipeline shared by the market snapshot and insight endpoints:
//   1. Compute the RSI series over the configured period.
//   2. Reject an empty series (not enough history to fill one window).
//   3. Classify the latest RSI value.
// =============================================================================

use tracing::debug;

use crate::indicators::calculate_rsi;
use crate::signals::insight::build_insight;
use crate::signals::recommendation::classify_recommendation;
use crate::types::{Recommendation, RsiZone};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    #[error("Insufficient price history: need at least {required} points, got {available}")]
    InsufficientData { required: usize, available: usize },
}

/// Indicator verdict for one price window.
#[derive(Debug, Clone, PartialEq)]
pub struct RsiAnalysis {
    pub rsi: Vec<f64>,
    pub latest_rsi: f64,
    pub recommendation: Recommendation,
}

impl RsiAnalysis {
    /// Run the RSI pipeline over `prices`.
    pub fn compute(prices: &[f64], period: usize) -> Result<Self, AnalysisError> {
        let rsi = calculate_rsi(prices, period);

        let Some(&latest_rsi) = rsi.last() else {
            return Err(AnalysisError::InsufficientData {
                required: period + 1,
                available: prices.len(),
            });
        };

        let recommendation = classify_recommendation(latest_rsi);
        debug!(
            points = prices.len(),
            rsi_points = rsi.len(),
            latest_rsi,
            zone = %RsiZone::from_value(latest_rsi),
            %recommendation,
            "rsi analysis complete"
        );

        Ok(Self {
            rsi,
            latest_rsi,
            recommendation,
        })
    }

    /// Insight text for the same window the analysis was computed on.
    pub fn insight(&self, prices: &[f64]) -> Result<String, AnalysisError> {
        build_insight(prices, &self.rsi).ok_or(AnalysisError::InsufficientData {
            required: self.rsi.len() + 1,
            available: prices.len(),
        })
    }
}
