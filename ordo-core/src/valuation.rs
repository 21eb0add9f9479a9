/// Turning a ranking plus a few user prices into a value table.
///
/// These helpers do the caller-side checks the fit functions assume: curve
/// choice versus item count, anchor count and ordering. Errors here are meant
/// for the user, who re-enters input and tries again.
use std::str::FromStr;

use crate::curve::{fit_exponential_with, fit_linear, FitOptions};
use crate::error::ValuationError;
use crate::types::{AnchorSample, ValueRow};

/// Shape of the value curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CurveKind {
    /// "Everything is similar to everything in this pool."
    Linear,
    /// "There is a long and expensive right tail."
    Exponential,
}

impl CurveKind {
    pub fn anchor_count(&self) -> usize {
        match self {
            CurveKind::Linear => 2,
            CurveKind::Exponential => 3,
        }
    }

    /// Rank positions the user is asked to price: the ends, plus the middle for exponential.
    pub fn anchor_positions(&self, n: usize) -> Vec<usize> {
        match self {
            CurveKind::Linear => vec![0, n - 1],
            CurveKind::Exponential => vec![0, n / 2, n - 1],
        }
    }

    pub fn min_items(&self) -> usize {
        self.anchor_count()
    }

    pub fn name(&self) -> &'static str {
        match self {
            CurveKind::Linear => "linear",
            CurveKind::Exponential => "exponential",
        }
    }
}

impl FromStr for CurveKind {
    type Err = ValuationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" | "l" => Ok(CurveKind::Linear),
            "exponential" | "exp" | "e" => Ok(CurveKind::Exponential),
            other => Err(ValuationError::UnknownCurve {
                name: other.to_string(),
            }),
        }
    }
}

/// Curve choice for one ranking: `Unselected -> Linear | Exponential`.
///
/// Exponential stays out of reach while there are fewer than three items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CurveSelection {
    #[default]
    Unselected,
    Selected(CurveKind),
}

impl CurveSelection {
    /// Switch to `kind`. On error the selection is left as it was.
    pub fn select(&mut self, kind: CurveKind, n: usize) -> Result<(), ValuationError> {
        if n < kind.min_items() {
            return Err(ValuationError::TooFewItems { n });
        }
        *self = CurveSelection::Selected(kind);
        Ok(())
    }

    pub fn kind(&self) -> Option<CurveKind> {
        match self {
            CurveSelection::Unselected => None,
            CurveSelection::Selected(kind) => Some(*kind),
        }
    }
}

/// Check anchor prices before fitting. Prices run from most to least preferred
/// and must be strictly descending.
pub fn check_anchor_prices(kind: CurveKind, prices: &[f64], n: usize) -> Result<(), ValuationError> {
    if n < kind.min_items() {
        return Err(ValuationError::TooFewItems { n });
    }
    if prices.len() != kind.anchor_count() {
        return Err(ValuationError::AnchorCount {
            expected: kind.anchor_count(),
            got: prices.len(),
        });
    }
    // Written as !(a > b) so NaN fails too.
    if prices.windows(2).any(|w| !(w[0] > w[1])) {
        return Err(ValuationError::PricesNotDescending);
    }
    Ok(())
}

/// Pair each anchor price with the rank position it was asked for.
pub fn anchor_samples(kind: CurveKind, prices: &[f64], n: usize) -> Vec<AnchorSample> {
    kind.anchor_positions(n)
        .into_iter()
        .zip(prices.iter())
        .map(|(position, &price)| AnchorSample { position, price })
        .collect()
}

/// Validate the anchors and produce one value per rank position.
pub fn fit_values(
    kind: CurveKind,
    prices: &[f64],
    n: usize,
    options: &FitOptions,
) -> Result<Vec<f64>, ValuationError> {
    check_anchor_prices(kind, prices, n)?;

    let values = match kind {
        CurveKind::Linear => fit_linear(prices[0], prices[1], n),
        CurveKind::Exponential => fit_exponential_with(prices[0], prices[1], prices[2], n, options)?,
    };
    Ok(values)
}

/// Build the summary table: row `i` is the item at rank `i`.
///
/// `listed_prices` is indexed by item, `values` by rank position.
pub fn summarize(ranking: &[usize], listed_prices: &[f64], values: &[f64]) -> Vec<ValueRow> {
    assert_eq!(
        ranking.len(),
        values.len(),
        "One value per ranked item is required"
    );
    assert_eq!(
        ranking.len(),
        listed_prices.len(),
        "One listed price per item is required"
    );

    ranking
        .iter()
        .zip(values)
        .enumerate()
        .map(|(preference, (&item, &value))| ValueRow {
            preference,
            item,
            price: listed_prices[item],
            value,
        })
        .collect()
}

/// Rows whose `price - value` does not exceed `limit`. `None` keeps everything.
pub fn within_limit(rows: &[ValueRow], limit: Option<f64>) -> Vec<ValueRow> {
    match limit {
        None => rows.to_vec(),
        Some(limit) => rows.iter().filter(|r| r.overpay() <= limit).copied().collect(),
    }
}

/// Largest absolute `price - value` across the table, 0 when empty.
pub fn max_abs_overpay(rows: &[ValueRow]) -> f64 {
    rows.iter().map(|r| r.overpay().abs()).fold(0.0_f64, f64::max)
}
