//! Closed key interval carrying a payload.

/// An immutable closed interval `[from, to]` with an attached value.
///
/// Equality and hashing are structural over all three fields. The
/// `from <= to` invariant is enforced by [`crate::IntervalTree::add`], not
/// here, so that invalid input is reported rather than corrected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RangeInterval<K, V> {
    from: K,
    to: K,
    value: V,
}

impl<K, V> RangeInterval<K, V> {
    pub fn new(from: K, to: K, value: V) -> Self {
        Self { from, to, value }
    }

    pub fn from(&self) -> &K {
        &self.from
    }

    pub fn to(&self) -> &K {
        &self.to
    }

    pub fn value(&self) -> &V {
        &self.value
    }
}

impl<K: Ord, V> RangeInterval<K, V> {
    /// Whether `point` lies within `[from, to]`.
    pub fn contains(&self, point: &K) -> bool {
        self.from <= *point && *point <= self.to
    }

    /// Whether this interval shares at least one key with `[from, to]`.
    pub fn overlaps(&self, from: &K, to: &K) -> bool {
        self.from <= *to && *from <= self.to
    }
}
