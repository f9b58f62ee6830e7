// =============================================================================
// Price Series: time-ordered (timestamp, price) history for one asset
// =============================================================================
//
// Invariants enforced at construction:
//   - at least one point
//   - timestamps strictly increasing
//   - every price finite
//
// Points violating the ordering or finiteness rules are skipped with a
// warning rather than failing the whole payload.
// =============================================================================

use anyhow::{bail, Result};
use tracing::warn;

/// One historical price observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    /// Epoch milliseconds.
    pub timestamp_ms: i64,
    /// Price in the quote currency.
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series from raw points, dropping any that break the ordering
    /// or finiteness invariants. Fails if nothing usable remains.
    pub fn from_points(raw: impl IntoIterator<Item = PricePoint>) -> Result<Self> {
        let mut points: Vec<PricePoint> = Vec::new();

        for point in raw {
            if !point.price.is_finite() {
                warn!(timestamp_ms = point.timestamp_ms, "skipping non-finite price");
                continue;
            }
            if let Some(prev) = points.last() {
                if point.timestamp_ms <= prev.timestamp_ms {
                    warn!(
                        timestamp_ms = point.timestamp_ms,
                        previous_ms = prev.timestamp_ms,
                        "skipping out-of-order price point"
                    );
                    continue;
                }
            }
            points.push(point);
        }

        if points.is_empty() {
            bail!("price series contains no usable points");
        }

        Ok(Self { points })
    }

    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    pub fn timestamps(&self) -> Vec<i64> {
        self.points.iter().map(|p| p.timestamp_ms).collect()
    }
}
