// =============================================================================
// Signals Module
// =============================================================================
//
// Derived signals built on top of the RSI series:
// - Buy / Sell / Hold recommendation
// - Plain-language insight text
// - The analysis pipeline tying both to a price window

pub mod analysis;
pub mod insight;
pub mod recommendation;

pub use analysis::{AnalysisError, RsiAnalysis};
