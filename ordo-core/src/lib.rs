/// ordo-core: Pure-computation preference ranking and value curves.
///
/// Pairwise choices → transitively closed better-than relation → ranking →
/// perceived-value curve through a few anchor prices. No IO, no UI, no
/// persistence — the caller owns the items and drives the session.
///
/// Items are identified by their index `0..N` in the caller's list.
///
/// # Quick start
///
/// ```rust
/// use ordo_core::{CurveKind, FitOptions, RankingSession};
///
/// let listed_prices = vec![250.0, 90.0, 140.0];
/// let mut session = RankingSession::new(listed_prices.len());
///
/// // Ask the user about each pair; here item 0 always wins, then item 2.
/// while let Some(pair) = session.current_pair() {
///     let preferred = if pair.contains(0) { 0 } else { 2 };
///     session.choose(preferred);
/// }
/// assert_eq!(session.ranking(), Some(vec![0, 2, 1]));
///
/// session.select_curve(CurveKind::Linear).unwrap();
/// let rows = session.value_table(&listed_prices, &[200.0, 60.0], &FitOptions::default()).unwrap();
/// for row in &rows {
///     println!("#{} item {}: listed {:.0}, worth {:.0}", row.preference, row.item, row.price, row.value);
/// }
/// ```

pub mod aggregator;
pub mod constants;
pub mod curve;
pub mod engine;
pub mod error;
pub mod types;
pub mod valuation;

// Re-export primary public API at crate root.
pub use aggregator::PreferenceAggregator;
pub use curve::{
    fit_exponential, fit_exponential_curve, fit_exponential_with, fit_linear, ExponentialCurve,
    FitOptions,
};
pub use engine::RankingSession;
pub use error::{FitError, ValuationError};
pub use types::{AnchorSample, Decision, Pair, ValueRow};
pub use valuation::{
    anchor_samples, check_anchor_prices, fit_values, max_abs_overpay, summarize, within_limit,
    CurveKind, CurveSelection,
};
