//! Fixed-capacity priority queue retaining the `k` least items pushed into it.
//!
//! Items are kept in a max-heap so the eviction candidate (the greatest retained item) is
//! always at the top. Once the queue is full, a push replaces the top in a single sift
//! when the new item is smaller, and is dropped otherwise.

use std::collections::BinaryHeap;
use std::hash::Hash;

use itertools::Itertools;
use rustc_hash::FxHashSet;

use crate::error::SketchError;

/// An item ranked by some priority but identified by an element it carries.
pub trait PriorityItem {
    type Element: Eq + Hash + Copy;

    fn element(&self) -> Self::Element;
}

#[derive(Clone, Debug)]
pub struct BoundedPriorityQueue<T: Ord> {
    capacity: usize,
    heap: BinaryHeap<T>,
}

impl<T: Ord + Clone> BoundedPriorityQueue<T> {
    pub fn new(capacity: usize) -> Result<Self, SketchError> {
        if capacity == 0 {
            return Err(SketchError::InvalidParameter(
                "queue capacity must be greater than zero".to_string(),
            ));
        }

        Ok(BoundedPriorityQueue {
            capacity,
            heap: BinaryHeap::with_capacity(capacity),
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.heap.len() >= self.capacity
    }

    /// Add an item, evicting the greatest retained item if the queue is over capacity.
    pub fn push(&mut self, item: T) {
        if !self.is_full() {
            self.heap.push(item);
            return;
        }

        if let Some(mut greatest) = self.heap.peek_mut() {
            if item < *greatest {
                *greatest = item;
            }
        }
    }

    /// Drop the greatest items until at most `capacity` remain.
    pub fn shrink_to_capacity(&mut self) {
        if self.heap.len() <= self.capacity {
            return;
        }

        let mut items = std::mem::take(&mut self.heap).into_sorted_vec();
        items.truncate(self.capacity);
        self.heap = BinaryHeap::from(items);
    }

    /// Return a new queue holding the `capacity` least items of the deduplicated union of
    /// both queues. Neither operand is modified.
    pub fn merge(&self, other: &Self) -> Result<Self, SketchError> {
        if self.capacity != other.capacity {
            return Err(SketchError::MismatchedSignature(format!(
                "queue capacity {} differs from {}",
                self.capacity, other.capacity
            )));
        }

        let union: Vec<T> = self
            .heap
            .iter()
            .chain(other.heap.iter())
            .cloned()
            .sorted()
            .dedup()
            .collect();

        let mut merged = BoundedPriorityQueue {
            capacity: self.capacity,
            heap: BinaryHeap::from(union),
        };
        merged.shrink_to_capacity();

        Ok(merged)
    }

    /// Retained items in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.heap.iter()
    }

}

impl<T: Ord + Clone + PriorityItem> BoundedPriorityQueue<T> {
    /// Elements of the retained items, without their priorities.
    pub fn elements(&self) -> FxHashSet<T::Element> {
        self.heap.iter().map(|item| item.element()).collect()
    }
}
