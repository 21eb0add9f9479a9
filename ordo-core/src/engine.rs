/// Ranking session orchestrator.
///
/// Pure computation — no IO. The caller shows `current_pair()`, feeds the
/// user's answer back through `choose()` or `skip()`, and re-renders from the
/// returned state until the session is complete. One session per item set;
/// changing the item set resets everything learned.
use tracing::debug;

use crate::aggregator::PreferenceAggregator;
use crate::curve::FitOptions;
use crate::error::ValuationError;
use crate::types::{Decision, Pair, ValueRow};
use crate::valuation::{fit_values, summarize, CurveKind, CurveSelection};

#[derive(Debug, Clone)]
pub struct RankingSession {
    aggregator: PreferenceAggregator,
    curve: CurveSelection,
    decisions_made: usize,
    skips_made: usize,
}

impl RankingSession {
    pub fn new(num_items: usize) -> Self {
        RankingSession {
            aggregator: PreferenceAggregator::new(num_items),
            curve: CurveSelection::Unselected,
            decisions_made: 0,
            skips_made: 0,
        }
    }

    /// Tell the session how many items there are now. Any change starts over.
    /// Returns true if the session was reset.
    pub fn set_item_count(&mut self, num_items: usize) -> bool {
        if num_items == self.aggregator.num_items() {
            return false;
        }
        *self = RankingSession::new(num_items);
        true
    }

    pub fn num_items(&self) -> usize {
        self.aggregator.num_items()
    }

    /// The pair to show next, or `None` once everything is ranked.
    pub fn current_pair(&self) -> Option<Pair> {
        self.aggregator.next_pair()
    }

    /// Upper bound on how many questions follow the current one.
    pub fn remaining_after_current(&self) -> usize {
        self.aggregator.pending_count().saturating_sub(1)
    }

    /// The user picked `preferred` out of the current pair.
    pub fn choose(&mut self, preferred: usize) -> Decision {
        let pair = self
            .current_pair()
            .unwrap_or_else(|| panic!("No pair pending; ranking is already complete"));
        let decision = Decision::Better {
            winner: preferred,
            loser: pair.other(preferred),
        };
        self.apply(decision);
        decision
    }

    /// The user deferred the current pair.
    pub fn skip(&mut self) -> Decision {
        self.apply(Decision::Skip);
        Decision::Skip
    }

    /// Apply a decision. `Skip` refers to the current pair.
    pub fn apply(&mut self, decision: Decision) {
        match decision {
            Decision::Better { winner, loser } => {
                self.aggregator.record_decision(winner, loser);
                self.decisions_made += 1;
            }
            Decision::Skip => {
                if let Some(pair) = self.current_pair() {
                    if self.aggregator.record_skip(pair) {
                        self.skips_made += 1;
                    }
                }
            }
        }
    }

    pub fn is_complete(&self) -> bool {
        self.current_pair().is_none()
    }

    /// Final ranking, most preferred first. `None` while pairs are pending.
    pub fn ranking(&self) -> Option<Vec<usize>> {
        if self.is_complete() {
            Some(self.aggregator.compute_ranking())
        } else {
            None
        }
    }

    pub fn select_curve(&mut self, kind: CurveKind) -> Result<(), ValuationError> {
        self.curve.select(kind, self.num_items())?;
        debug!(curve = kind.name(), "Curve selected");
        Ok(())
    }

    pub fn curve(&self) -> Option<CurveKind> {
        self.curve.kind()
    }

    /// Fit the selected curve through `anchor_prices` and line it up with `listed_prices`.
    ///
    /// `listed_prices` is indexed by item. Must be called on a complete session.
    pub fn value_table(
        &self,
        listed_prices: &[f64],
        anchor_prices: &[f64],
        options: &FitOptions,
    ) -> Result<Vec<ValueRow>, ValuationError> {
        let kind = self.curve().ok_or(ValuationError::NoCurveSelected)?;
        let ranking = self
            .ranking()
            .unwrap_or_else(|| panic!("Value table requested before the ranking is complete"));
        let values = fit_values(kind, anchor_prices, ranking.len(), options)?;
        Ok(summarize(&ranking, listed_prices, &values))
    }

    pub fn aggregator(&self) -> &PreferenceAggregator {
        &self.aggregator
    }

    /// Decisions recorded so far (skips not included).
    pub fn decisions_made(&self) -> usize {
        self.decisions_made
    }

    pub fn skips_made(&self) -> usize {
        self.skips_made
    }
}
