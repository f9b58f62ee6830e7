// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free indicator implementations. Insufficient data yields
// an empty series rather than placeholder values; callers decide how to
// report it.

pub mod rsi;

pub use rsi::{calculate_rsi, DEFAULT_RSI_PERIOD};
