//! Centered interval tree node.
//!
//! Each node splits its intervals around `center`, the median of all their
//! endpoints: intervals spanning `center` stay in the node's bucket (sorted by
//! `(from, to)`), intervals entirely below go left, entirely above go right.
//! Depth is therefore O(log n) regardless of how the intervals are placed.

use std::cmp::Ordering;

use crate::interval::RangeInterval;

#[derive(Debug, Clone)]
pub(crate) struct IntervalTreeNode<K, V> {
    center: Option<K>,
    items: Vec<RangeInterval<K, V>>,
    left: Option<Box<IntervalTreeNode<K, V>>>,
    right: Option<Box<IntervalTreeNode<K, V>>>,
}

impl<K: Ord + Clone, V> IntervalTreeNode<K, V> {
    /// A childless, bucket-less node. Every query on it yields nothing.
    pub(crate) fn empty() -> Self {
        Self {
            center: None,
            items: Vec::new(),
            left: None,
            right: None,
        }
    }

    /// Build the subtree for `intervals`.
    pub(crate) fn build(intervals: Vec<RangeInterval<K, V>>) -> Self {
        let mut endpoints: Vec<&K> = intervals
            .iter()
            .flat_map(|iv| [iv.from(), iv.to()])
            .collect();
        endpoints.sort();
        // Element at index len / 2 of the sorted endpoints.
        let Some(center) = endpoints.get(endpoints.len() / 2).map(|k| (*k).clone()) else {
            return Self::empty();
        };

        let mut below = Vec::new();
        let mut above = Vec::new();
        let mut overlap = Vec::new();
        for iv in intervals {
            if *iv.to() < center {
                below.push(iv);
            } else if *iv.from() > center {
                above.push(iv);
            } else {
                overlap.push(iv);
            }
        }
        overlap.sort_by(|a, b| a.from().cmp(b.from()).then_with(|| a.to().cmp(b.to())));

        Self {
            center: Some(center),
            items: overlap,
            left: (!below.is_empty()).then(|| Box::new(Self::build(below))),
            right: (!above.is_empty()).then(|| Box::new(Self::build(above))),
        }
    }

    /// Push the value of every interval containing `point`.
    pub(crate) fn query<'a>(&'a self, point: &K, out: &mut Vec<&'a V>) {
        for iv in &self.items {
            // Bucket is sorted by `from`; nothing past this can contain `point`.
            if iv.from() > point {
                break;
            }
            if point <= iv.to() {
                out.push(iv.value());
            }
        }

        let Some(center) = &self.center else {
            return;
        };
        let child = match point.cmp(center) {
            Ordering::Less => &self.left,
            Ordering::Greater => &self.right,
            Ordering::Equal => return,
        };
        if let Some(child) = child {
            child.query(point, out);
        }
    }

    /// Push every interval overlapping `[from, to]`, ascending by `(from, to)`.
    ///
    /// Left-subtree intervals may start after some bucket intervals, so the
    /// two sorted runs are merged. Everything in the right subtree starts
    /// after `center`, which bounds every `from` seen so far.
    pub(crate) fn collect_forward<'a>(
        &'a self,
        from: &K,
        to: &K,
        out: &mut Vec<&'a RangeInterval<K, V>>,
    ) {
        let Some(center) = &self.center else {
            return;
        };

        let mut below = Vec::new();
        if from < center {
            if let Some(left) = &self.left {
                left.collect_forward(from, to, &mut below);
            }
        }

        let bucket = self
            .items
            .iter()
            .take_while(|iv| iv.from() <= to)
            .filter(|iv| from <= iv.to());
        merge_sorted(below, bucket, out);

        if to > center {
            if let Some(right) = &self.right {
                right.collect_forward(from, to, out);
            }
        }
    }

    /// Number of levels below and including this node.
    pub(crate) fn depth(&self) -> usize {
        if self.center.is_none() {
            return 0;
        }
        let left = self.left.as_ref().map_or(0, |n| n.depth());
        let right = self.right.as_ref().map_or(0, |n| n.depth());
        1 + left.max(right)
    }
}

fn merge_sorted<'a, K: Ord, V>(
    below: Vec<&'a RangeInterval<K, V>>,
    bucket: impl Iterator<Item = &'a RangeInterval<K, V>>,
    out: &mut Vec<&'a RangeInterval<K, V>>,
) {
    let mut bucket = bucket.peekable();
    for iv in below {
        while let Some(next) = bucket.next_if(|b| (b.from(), b.to()) < (iv.from(), iv.to())) {
            out.push(next);
        }
        out.push(iv);
    }
    out.extend(bucket);
}
