/// Incremental preference aggregation over pairwise choices.
///
/// Keeps a transitively closed "better-than" relation and the set of pairs whose
/// order is already known, so that implied comparisons are never asked twice.
/// Items are `usize` indices into the caller's item list.
use std::collections::{BTreeMap, BTreeSet, HashSet};

use tracing::debug;

use crate::types::Pair;

#[derive(Debug, Clone)]
pub struct PreferenceAggregator {
    num_items: usize,
    /// better_than[v] = every item known to be strictly worse than v.
    /// BTreeMap so that ranking ties resolve by ascending index.
    better_than: BTreeMap<usize, BTreeSet<usize>>,
    known_pairs: HashSet<Pair>,
    skipped_pairs: HashSet<Pair>,
}

impl PreferenceAggregator {
    pub fn new(num_items: usize) -> Self {
        assert!(num_items >= 2, "PreferenceAggregator requires at least two items to compare.");

        PreferenceAggregator {
            num_items,
            better_than: BTreeMap::new(),
            known_pairs: HashSet::new(),
            skipped_pairs: HashSet::new(),
        }
    }

    /// Drop everything learned so far and start over with a new item set.
    pub fn reset(&mut self, num_items: usize) {
        debug!(old = self.num_items, new = num_items, "Resetting preference state");
        *self = PreferenceAggregator::new(num_items);
    }

    pub fn num_items(&self) -> usize {
        self.num_items
    }

    /// Every unordered pair, in lexicographic order.
    fn all_pairs(&self) -> impl Iterator<Item = Pair> + '_ {
        let n = self.num_items;
        (0..n).flat_map(move |i| (i + 1..n).map(move |j| Pair::new(i, j)))
    }

    /// Pairs still worth asking about, in presentation order.
    ///
    /// Known pairs are dropped. Skipped pairs are moved behind all the others
    /// but kept, so they come around again once everything else is answered.
    pub fn next_pending_pairs(&self) -> Vec<Pair> {
        let (mut fresh, deferred): (Vec<Pair>, Vec<Pair>) = self
            .all_pairs()
            .filter(|p| !self.known_pairs.contains(p))
            .partition(|p| !self.skipped_pairs.contains(p));
        fresh.extend(deferred);
        fresh
    }

    /// Front of `next_pending_pairs()` without building the whole queue.
    pub fn next_pair(&self) -> Option<Pair> {
        let mut first_skipped = None;
        for pair in self.all_pairs().filter(|p| !self.known_pairs.contains(p)) {
            if !self.skipped_pairs.contains(&pair) {
                return Some(pair);
            }
            first_skipped.get_or_insert(pair);
        }
        first_skipped
    }

    pub fn pending_count(&self) -> usize {
        self.total_pairs() - self.known_pairs.len()
    }

    /// C(N, 2).
    pub fn total_pairs(&self) -> usize {
        self.num_items * (self.num_items - 1) / 2
    }

    /// Defer `pair`. Returns false if it was already deferred.
    pub fn record_skip(&mut self, pair: Pair) -> bool {
        self.check_item(pair.high());
        let inserted = self.skipped_pairs.insert(pair);
        if inserted {
            debug!(low = pair.low(), high = pair.high(), "Pair skipped");
        }
        inserted
    }

    /// Record that `winner` is preferred over `loser` and push the consequences.
    ///
    /// `winner` now beats `loser` and everything `loser` already beats. Every item
    /// already known to beat `winner` inherits the same set.
    pub fn record_decision(&mut self, winner: usize, loser: usize) {
        assert!(winner != loser, "Winner and loser must differ, got {} for both", winner);
        self.check_item(winner);
        self.check_item(loser);

        let mut worse_set = self.better_than.get(&loser).cloned().unwrap_or_default();
        worse_set.insert(loser);

        self.absorb(winner, &worse_set);

        let ancestors: Vec<usize> = self
            .better_than
            .iter()
            .filter(|&(&k, worse)| k != winner && worse.contains(&winner))
            .map(|(&k, _)| k)
            .collect();

        for &k in &ancestors {
            self.absorb(k, &worse_set);
        }

        debug!(
            winner,
            loser,
            implied = worse_set.len(),
            ancestors = ancestors.len(),
            pending = self.pending_count(),
            "Decision recorded"
        );
    }

    /// Union `worse` into `better_than[item]` and mark every resulting pair known.
    /// Under inconsistent input `worse` may contain `item` itself; that entry is dropped.
    fn absorb(&mut self, item: usize, worse: &BTreeSet<usize>) {
        let entry = self.better_than.entry(item).or_default();
        for &x in worse {
            if x == item {
                continue;
            }
            entry.insert(x);
            self.known_pairs.insert(Pair::new(item, x));
        }
    }

    /// Final ranking, most preferred first.
    ///
    /// Items that beat more others rank higher; equal counts keep ascending index
    /// order. Items that never beat anything follow in ascending index order.
    /// Must only be called once no pairs are pending.
    pub fn compute_ranking(&self) -> Vec<usize> {
        assert!(
            self.next_pair().is_none(),
            "Ranking requested with {} pairs still pending",
            self.pending_count()
        );

        let mut ranking: Vec<usize> = self.better_than.keys().copied().collect();
        // Stable sort: ties stay in ascending key order.
        ranking.sort_by(|a, b| self.better_than[b].len().cmp(&self.better_than[a].len()));

        let placed: HashSet<usize> = ranking.iter().copied().collect();
        ranking.extend((0..self.num_items).filter(|i| !placed.contains(i)));

        assert_eq!(
            ranking.len(),
            self.num_items,
            "Ranking length does not match item count"
        );
        ranking
    }

    pub fn is_known(&self, pair: Pair) -> bool {
        self.known_pairs.contains(&pair)
    }

    pub fn is_skipped(&self, pair: Pair) -> bool {
        self.skipped_pairs.contains(&pair)
    }

    /// True if `a` is known (directly or transitively) to be preferred over `b`.
    pub fn is_better(&self, a: usize, b: usize) -> bool {
        self.better_than.get(&a).is_some_and(|worse| worse.contains(&b))
    }

    /// Items known to be worse than `item`.
    pub fn worse_than(&self, item: usize) -> Option<&BTreeSet<usize>> {
        self.better_than.get(&item)
    }

    pub fn known_pair_count(&self) -> usize {
        self.known_pairs.len()
    }

    pub fn skipped_pair_count(&self) -> usize {
        self.skipped_pairs.len()
    }

    fn check_item(&self, item: usize) {
        assert!(
            item < self.num_items,
            "Item index {} out of range (num_items = {})",
            item,
            self.num_items
        );
    }
}
