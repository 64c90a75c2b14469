use crate::error::{Error, Result};

/// Backing storage is shrunk once occupancy falls to 1/SHRINK_RATIO of capacity.
const SHRINK_RATIO: usize = 4;
/// Never shrink below this many slots.
const MIN_CAPACITY: usize = 16;

/// Binary min-heap keyed by `T`'s ordering.
///
/// Duplicates are allowed; there is no decrease-key or arbitrary removal.
/// Heap invariant: `items[k] <= items[2k+1]` and `items[k] <= items[2k+2]`.
#[derive(Debug, Clone)]
pub struct EventQueue<T> {
    items: Vec<T>,
}

impl<T: Ord> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> EventQueue<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Add an item. O(log n).
    pub fn insert(&mut self, item: T) {
        self.items.push(item);
        self.sift_up(self.items.len() - 1);
    }

    /// Smallest item without removing it.
    pub fn min(&self) -> Result<&T> {
        self.items.first().ok_or(Error::QueueEmpty)
    }

    /// Remove and return the smallest item. O(log n).
    pub fn extract_min(&mut self) -> Result<T> {
        if self.items.is_empty() {
            return Err(Error::QueueEmpty);
        }
        let min = self.items.swap_remove(0);
        if !self.items.is_empty() {
            self.sift_down(0);
        }
        self.maybe_shrink();
        Ok(min)
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.maybe_shrink();
    }

    fn sift_up(&mut self, mut k: usize) {
        while k > 0 {
            let parent = (k - 1) / 2;
            if self.items[k] >= self.items[parent] {
                break;
            }
            self.items.swap(k, parent);
            k = parent;
        }
    }

    fn sift_down(&mut self, mut k: usize) {
        let n = self.items.len();
        loop {
            let left = 2 * k + 1;
            if left >= n {
                break;
            }
            let right = left + 1;
            let child = if right < n && self.items[right] < self.items[left] {
                right
            } else {
                left
            };
            if self.items[k] <= self.items[child] {
                break;
            }
            self.items.swap(k, child);
            k = child;
        }
    }

    fn maybe_shrink(&mut self) {
        let cap = self.items.capacity();
        if cap > MIN_CAPACITY && self.items.len() <= cap / SHRINK_RATIO {
            self.items.shrink_to((cap / 2).max(MIN_CAPACITY));
        }
    }

    #[cfg(test)]
    fn is_heap(&self) -> bool {
        (1..self.items.len()).all(|k| self.items[(k - 1) / 2] <= self.items[k])
    }
}
