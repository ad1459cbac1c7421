// Copyright (c) 2025-2026 Zensical and contributors

// SPDX-License-Identifier: MIT
// All contributions are certified under the DCO

// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to
// deal in the Software without restriction, including without limitation the
// rights to use, copy, modify, merge, publish, distribute, sublicense, and/or
// sell copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:

// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NON-INFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
// FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS
// IN THE SOFTWARE.

// ----------------------------------------------------------------------------

//! Heap.

use ahash::{HashMap, HashMapExt};
use std::fmt;

mod entry;
mod error;

pub use entry::Entry;
pub use error::{Error, Result};

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Heap.
///
/// This is a binary min-heap over handle-key pairs, ordered by key. It keeps
/// two synchronized structures: the heap array itself, and a back-map from
/// handles to positions in the array. The back-map makes it possible to
/// remove an arbitrary entry by its handle in logarithmic time, which a
/// plain binary heap cannot do.
///
/// The back-map is the only source of truth for positions. Callers must not
/// cache positions on their side, as any mutation is free to move entries
/// around within the array.
///
/// Keys are compared with [`f64::total_cmp`], so ordering is total and
/// deterministic for a given sequence of operations. Entries with equal keys
/// resolve in sift order, which is unspecified but stable.
///
/// # Examples
///
/// ```
/// use workshop_heap::Heap;
///
/// // Create heap and initial state
/// let mut heap = Heap::new();
/// heap.insert(0, 4.0)?;
/// heap.insert(1, 2.0)?;
/// heap.insert(2, 3.0)?;
///
/// // Remove and return entries in key order
/// assert_eq!(heap.pop(), Some(1));
/// assert_eq!(heap.pop(), Some(2));
/// assert_eq!(heap.pop(), Some(0));
/// # Ok::<(), workshop_heap::Error>(())
/// ```
pub struct Heap {
    /// Heap array.
    entries: Vec<Entry>,
    /// Back-map from handles to positions.
    positions: HashMap<usize, usize>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Heap {
    /// Creates a heap.
    ///
    /// # Examples
    ///
    /// ```
    /// use workshop_heap::Heap;
    ///
    /// // Create heap
    /// let mut heap = Heap::new();
    /// heap.insert(0, 1.0)?;
    /// # Ok::<(), workshop_heap::Error>(())
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            positions: HashMap::new(),
        }
    }

    /// Creates a heap with the given capacity.
    ///
    /// # Examples
    ///
    /// ```
    /// use workshop_heap::Heap;
    ///
    /// // Create heap with capacity
    /// let heap = Heap::with_capacity(1024);
    /// ```
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            positions: HashMap::with_capacity(capacity),
        }
    }

    /// Inserts the handle with the given key.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::Duplicate`] if the handle is already
    /// present, which denotes a bookkeeping bug on the caller's side.
    ///
    /// # Examples
    ///
    /// ```
    /// use workshop_heap::Heap;
    ///
    /// // Create heap and insert handle
    /// let mut heap = Heap::new();
    /// heap.insert(0, 1.0)?;
    /// assert!(heap.insert(0, 2.0).is_err());
    /// # Ok::<(), workshop_heap::Error>(())
    /// ```
    pub fn insert(&mut self, handle: usize, key: f64) -> Result {
        if self.positions.contains_key(&handle) {
            return Err(Error::Duplicate(handle));
        }

        // Append entry and restore heap order
        let index = self.entries.len();
        self.entries.push(Entry::new(handle, key));
        self.positions.insert(handle, index);
        self.sift_up(index);
        Ok(())
    }

    /// Removes and returns the handle with the smallest key.
    ///
    /// # Examples
    ///
    /// ```
    /// use workshop_heap::Heap;
    ///
    /// // Create heap and initial state
    /// let mut heap = Heap::new();
    /// heap.insert(0, 2.0)?;
    /// heap.insert(1, 1.0)?;
    ///
    /// // Remove and return minimum
    /// assert_eq!(heap.pop(), Some(1));
    /// # Ok::<(), workshop_heap::Error>(())
    /// ```
    pub fn pop(&mut self) -> Option<usize> {
        if self.entries.is_empty() {
            None
        } else {
            Some(self.detach(0).handle())
        }
    }

    /// Removes the entry identified by the handle and returns its key.
    ///
    /// # Examples
    ///
    /// ```
    /// use workshop_heap::Heap;
    ///
    /// // Create heap and initial state
    /// let mut heap = Heap::new();
    /// heap.insert(0, 2.0)?;
    /// heap.insert(1, 1.0)?;
    ///
    /// // Remove entry by identity
    /// assert_eq!(heap.remove(0), Some(2.0));
    /// assert_eq!(heap.remove(0), None);
    /// # Ok::<(), workshop_heap::Error>(())
    /// ```
    pub fn remove(&mut self, handle: usize) -> Option<f64> {
        let index = self.positions.get(&handle).copied()?;
        Some(self.detach(index).key())
    }

    /// Returns the entry with the smallest key without removing it.
    ///
    /// # Examples
    ///
    /// ```
    /// use workshop_heap::Heap;
    ///
    /// // Create heap and initial state
    /// let mut heap = Heap::new();
    /// heap.insert(0, 2.0)?;
    /// heap.insert(1, 1.0)?;
    ///
    /// // Obtain minimum entry
    /// let entry = heap.peek().expect("non-empty");
    /// assert_eq!(entry.handle(), 1);
    /// # Ok::<(), workshop_heap::Error>(())
    /// ```
    #[inline]
    #[must_use]
    pub fn peek(&self) -> Option<&Entry> {
        self.entries.first()
    }
}

#[allow(clippy::must_use_candidate)]
impl Heap {
    /// Returns whether the heap contains the handle.
    ///
    /// # Examples
    ///
    /// ```
    /// use workshop_heap::Heap;
    ///
    /// // Create heap and ensure presence of handle
    /// let mut heap = Heap::new();
    /// heap.insert(0, 1.0)?;
    /// assert!(heap.contains(0));
    /// # Ok::<(), workshop_heap::Error>(())
    /// ```
    #[inline]
    pub fn contains(&self, handle: usize) -> bool {
        self.positions.contains_key(&handle)
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether there are any entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Heap {
    /// Detaches and returns the entry at the given position.
    ///
    /// The entry is swapped with the last entry, removed, and heap order is
    /// restored at its former position by sifting in both directions.
    fn detach(&mut self, index: usize) -> Entry {
        let last = self.entries.len() - 1;
        self.swap(index, last);

        // We can safely use expect here, as the entry is present
        let entry = self.entries.pop().expect("invariant");
        self.positions.remove(&entry.handle());

        // Restore heap order, unless the detached entry was the last
        if index < self.entries.len() {
            self.sift_down(index);
            self.sift_up(index);
        }
        entry
    }

    /// Moves the entry at the given position up until heap order holds.
    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.less(index, parent) {
                self.swap(index, parent);
                index = parent;
            } else {
                break;
            }
        }
    }

    /// Moves the entry at the given position down until heap order holds.
    fn sift_down(&mut self, mut index: usize) {
        loop {
            let left = 2 * index + 1;
            if left >= self.entries.len() {
                break;
            }

            // Select the smaller of both children
            let right = left + 1;
            let child = if right < self.entries.len() && self.less(right, left)
            {
                right
            } else {
                left
            };

            if self.less(child, index) {
                self.swap(index, child);
                index = child;
            } else {
                break;
            }
        }
    }

    /// Returns whether the entry at `a` orders before the entry at `b`.
    #[inline]
    fn less(&self, a: usize, b: usize) -> bool {
        self.entries[a]
            .key()
            .total_cmp(&self.entries[b].key())
            .is_lt()
    }

    /// Swaps two entries, keeping the back-map synchronized.
    fn swap(&mut self, a: usize, b: usize) {
        self.entries.swap(a, b);
        self.positions.insert(self.entries[a].handle(), a);
        self.positions.insert(self.entries[b].handle(), b);
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl Default for Heap {
    /// Creates a heap.
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

// ----------------------------------------------------------------------------

impl fmt::Debug for Heap {
    /// Formats the heap for debugging.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Heap")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {

    mod insert {
        use crate::heap::{Error, Heap, Result};

        #[test]
        fn orders_by_key() -> Result {
            let mut heap = Heap::new();
            for (handle, key) in [(0, 4.0), (1, 2.0), (2, 3.0), (3, 1.0)] {
                heap.insert(handle, key)?;
            }
            assert_eq!(heap.len(), 4);
            for check in [3, 1, 2, 0] {
                assert_eq!(heap.pop(), Some(check));
            }
            Ok(())
        }

        #[test]
        fn rejects_duplicate() -> Result {
            let mut heap = Heap::new();
            heap.insert(0, 1.0)?;
            assert!(matches!(heap.insert(0, 2.0), Err(Error::Duplicate(0))));
            assert_eq!(heap.len(), 1);
            Ok(())
        }

        #[test]
        fn accepts_equal_keys() -> Result {
            let mut heap = Heap::new();
            for handle in 0..8 {
                heap.insert(handle, 1.0)?;
            }
            let mut handles: Vec<_> =
                std::iter::from_fn(|| heap.pop()).collect();
            handles.sort_unstable();
            assert_eq!(handles, (0..8).collect::<Vec<_>>());
            Ok(())
        }
    }

    mod pop {
        use crate::heap::{Heap, Result};

        #[test]
        fn handles_empty() {
            let mut heap = Heap::new();
            assert_eq!(heap.pop(), None);
        }

        #[test]
        fn drains_in_order() -> Result {
            let mut heap = Heap::new();
            for (handle, key) in
                [(5, 50.0), (3, 30.0), (8, 80.0), (1, 10.0), (4, 40.0)]
            {
                heap.insert(handle, key)?;
            }
            let handles: Vec<_> = std::iter::from_fn(|| heap.pop()).collect();
            assert_eq!(handles, vec![1, 3, 4, 5, 8]);
            assert!(heap.is_empty());
            Ok(())
        }
    }

    mod remove {
        use crate::heap::{Heap, Result};

        #[test]
        fn removes_by_identity() -> Result {
            let mut heap = Heap::new();
            for (handle, key) in [(0, 4.0), (1, 2.0), (2, 3.0), (3, 1.0)] {
                heap.insert(handle, key)?;
            }
            assert_eq!(heap.remove(2), Some(3.0));
            assert!(!heap.contains(2));
            for check in [3, 1, 0] {
                assert_eq!(heap.pop(), Some(check));
            }
            Ok(())
        }

        #[test]
        fn removes_minimum() -> Result {
            let mut heap = Heap::new();
            for (handle, key) in [(0, 4.0), (1, 2.0), (2, 3.0)] {
                heap.insert(handle, key)?;
            }
            assert_eq!(heap.remove(1), Some(2.0));
            assert_eq!(heap.peek().map(super::super::Entry::handle), Some(2));
            Ok(())
        }

        #[test]
        fn handles_unknown() {
            let mut heap = Heap::new();
            assert_eq!(heap.remove(42), None);
        }

        #[test]
        fn allows_reinsertion() -> Result {
            let mut heap = Heap::new();
            heap.insert(0, 1.0)?;
            assert_eq!(heap.remove(0), Some(1.0));
            heap.insert(0, 2.0)?;
            assert_eq!(heap.pop(), Some(0));
            Ok(())
        }
    }

    mod peek {
        use crate::heap::{Heap, Result};

        #[test]
        fn returns_minimum() -> Result {
            let mut heap = Heap::new();
            heap.insert(0, 2.0)?;
            heap.insert(1, 1.0)?;
            let entry = heap.peek().expect("non-empty");
            assert_eq!((entry.handle(), entry.key()), (1, 1.0));
            assert_eq!(heap.len(), 2);
            Ok(())
        }

        #[test]
        fn handles_empty() {
            let heap = Heap::new();
            assert!(heap.peek().is_none());
        }
    }
}
