// =============================================================================
// Shared types used across the coin-pulse service
// =============================================================================

use serde::{Deserialize, Serialize};

/// RSI level below which an asset is considered oversold.
pub const OVERSOLD_THRESHOLD: f64 = 30.0;
/// RSI level above which an asset is considered overbought.
pub const OVERBOUGHT_THRESHOLD: f64 = 70.0;

/// Qualitative state of the most recent RSI reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsiZone {
    Oversold,
    Overbought,
    Neutral,
}

impl RsiZone {
    /// Strict inequality on both sides: exactly 30 or 70 is neutral.
    pub fn from_value(rsi: f64) -> Self {
        if rsi < OVERSOLD_THRESHOLD {
            Self::Oversold
        } else if rsi > OVERBOUGHT_THRESHOLD {
            Self::Overbought
        } else {
            Self::Neutral
        }
    }
}

impl std::fmt::Display for RsiZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Oversold => write!(f, "OVERSOLD"),
            Self::Overbought => write!(f, "OVERBOUGHT"),
            Self::Neutral => write!(f, "NEUTRAL"),
        }
    }
}

/// Categorical trade recommendation derived from the latest RSI value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Recommendation {
    Buy,
    Sell,
    Hold,
}

impl From<RsiZone> for Recommendation {
    fn from(zone: RsiZone) -> Self {
        match zone {
            RsiZone::Oversold => Self::Buy,
            RsiZone::Overbought => Self::Sell,
            RsiZone::Neutral => Self::Hold,
        }
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "Buy"),
            Self::Sell => write!(f, "Sell"),
            Self::Hold => write!(f, "Hold"),
        }
    }
}

/// A single headline as served by `/api/news`.
///
/// Fields are passed through from the news provider untouched, so any of
/// them may be absent upstream and serialise as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: Option<String>,
    pub url: Option<String>,
    pub published_at: Option<String>,
}
