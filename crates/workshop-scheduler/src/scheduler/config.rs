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

//! Scheduler configuration.

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Scheduler configuration.
///
/// The two quanta govern preemption: a customer bound to a tool is immune to
/// preemption until it has used the tool for at least `quantum_min` (q)
/// milliseconds, and is unconditionally rotated out once it has used it for
/// `quantum_max` (Q) milliseconds while others are waiting.
///
/// Values are not validated here, as the server validates them at the edge.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Minimum protected quantum in milliseconds (q).
    pub quantum_min: u64,
    /// Maximum quantum in milliseconds (Q).
    pub quantum_max: u64,
    /// Number of tools (k).
    pub tools: usize,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Config {
    /// Creates a scheduler configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use workshop_scheduler::Config;
    ///
    /// // Create scheduler configuration
    /// let config = Config::new(100, 500, 2);
    /// ```
    #[must_use]
    pub fn new(quantum_min: u64, quantum_max: u64, tools: usize) -> Self {
        Self {
            quantum_min,
            quantum_max,
            tools,
        }
    }
}
