//! Write-buffered, read-optimized interval index.
//!
//! [`IntervalTree::add`] only appends to a pending list. The first query after
//! a batch of writes builds the centered tree (O(n log n)); later queries
//! reuse it until the next write. The built tree lives in a [`OnceLock`], so
//! queries take `&self` and concurrent readers never race on the rebuild,
//! while `add` needs `&mut self` and therefore exclusive access.

use std::fmt::Debug;
use std::sync::OnceLock;

use crate::error::{Result, ScheduleError};
use crate::interval::RangeInterval;
use crate::node::IntervalTreeNode;

/// An interval index over one ordered key type.
#[derive(Debug, Clone)]
pub struct IntervalTree<K, V> {
    items: Vec<RangeInterval<K, V>>,
    root: OnceLock<IntervalTreeNode<K, V>>,
}

impl<K, V> Default for IntervalTree<K, V> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            root: OnceLock::new(),
        }
    }
}

impl<K: Ord + Clone + Debug, V: Clone> IntervalTree<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `[from, to]` carrying `value`.
    ///
    /// # Errors
    /// Returns [`ScheduleError::InvalidInterval`] if `from > to`. The interval
    /// is never swapped or clamped.
    pub fn add(&mut self, from: K, to: K, value: V) -> Result<()> {
        if from > to {
            return Err(ScheduleError::InvalidInterval {
                from: format!("{:?}", from),
                to: format!("{:?}", to),
            });
        }
        self.items.push(RangeInterval::new(from, to, value));
        self.root.take();
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the built tree reflects every inserted interval.
    pub fn is_built(&self) -> bool {
        self.root.get().is_some()
    }

    /// Build the tree now instead of on the next query.
    pub fn rebuild(&self) {
        self.root();
    }

    /// Values of every interval containing `point`.
    ///
    /// Order is ascending by `(from, to)` within one node; across nodes it is
    /// deterministic but otherwise unspecified.
    pub fn query(&self, point: &K) -> Vec<&V> {
        let mut out = Vec::new();
        self.root().query(point, &mut out);
        out
    }

    /// Values of every interval overlapping `[from, to]`, ascending by each
    /// interval's `from` (ties by `to`).
    pub fn query_forward(&self, from: &K, to: &K) -> Vec<&V> {
        self.overlapping(from, to)
            .into_iter()
            .map(RangeInterval::value)
            .collect()
    }

    /// Same intervals as [`IntervalTree::query_forward`], descending.
    pub fn query_backward(&self, from: &K, to: &K) -> Vec<&V> {
        self.overlapping(from, to)
            .into_iter()
            .rev()
            .map(RangeInterval::value)
            .collect()
    }

    /// Depth of the built tree (0 when empty).
    pub fn depth(&self) -> usize {
        self.root().depth()
    }

    fn overlapping(&self, from: &K, to: &K) -> Vec<&RangeInterval<K, V>> {
        let mut out = Vec::new();
        if from <= to {
            self.root().collect_forward(from, to, &mut out);
        }
        out
    }

    fn root(&self) -> &IntervalTreeNode<K, V> {
        self.root
            .get_or_init(|| IntervalTreeNode::build(self.items.clone()))
    }
}
