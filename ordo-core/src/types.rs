/// An unordered pair of distinct item indices, stored canonically with `low < high`.
///
/// Items are identified by their position `0..N` in the caller's item list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pair {
    low: usize,
    high: usize,
}

impl Pair {
    /// Build the canonical pair for `a` and `b`, in either order.
    pub fn new(a: usize, b: usize) -> Self {
        assert!(a != b, "A pair needs two distinct items, got {} twice", a);
        Pair {
            low: a.min(b),
            high: a.max(b),
        }
    }

    /// Smaller index. Shown on the left when the pair is presented.
    pub fn low(&self) -> usize {
        self.low
    }

    /// Larger index. Shown on the right when the pair is presented.
    pub fn high(&self) -> usize {
        self.high
    }

    pub fn contains(&self, item: usize) -> bool {
        self.low == item || self.high == item
    }

    /// The member of the pair that isn't `item`.
    pub fn other(&self, item: usize) -> usize {
        assert!(self.contains(item), "Item {} is not part of pair {:?}", item, self);
        self.low ^ self.high ^ item
    }
}

impl From<(usize, usize)> for Pair {
    fn from((a, b): (usize, usize)) -> Self {
        Pair::new(a, b)
    }
}

/// Outcome of presenting a pair to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Decision {
    /// `winner` is preferred over `loser`.
    Better { winner: usize, loser: usize },
    /// Defer the pair. No information gained.
    Skip,
}

/// A (rank position, price) point used to calibrate the value curve.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnchorSample {
    pub position: usize,
    pub price: f64,
}

/// One line of the final summary: listed price versus perceived value at a rank position.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValueRow {
    /// 0-based position in the ranking. Smaller means more preferred.
    pub preference: usize,
    /// Index into the caller's item list.
    pub item: usize,
    /// Price the item is listed at.
    pub price: f64,
    /// Fitted perceived value at this position.
    pub value: f64,
}

impl ValueRow {
    /// Positive when the item costs more than it is worth to the user.
    pub fn overpay(&self) -> f64 {
        self.price - self.value
    }
}
