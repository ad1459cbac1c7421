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

//! Heap entry.

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Heap entry.
///
/// An entry pairs a handle with the key it is ordered by. Handles are opaque
/// to the heap; callers typically use indices into an arena. Mutable data
/// must be stored outside of the heap, as entries are immutable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Entry {
    /// Handle.
    handle: usize,
    /// Ordering key.
    key: f64,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Entry {
    /// Creates a heap entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use workshop_heap::Entry;
    ///
    /// // Create heap entry
    /// let entry = Entry::new(0, 1.0);
    /// ```
    #[must_use]
    pub fn new(handle: usize, key: f64) -> Self {
        Self { handle, key }
    }
}

#[allow(clippy::must_use_candidate)]
impl Entry {
    /// Returns the handle.
    #[inline]
    pub fn handle(&self) -> usize {
        self.handle
    }

    /// Returns the ordering key.
    #[inline]
    pub fn key(&self) -> f64 {
        self.key
    }
}
