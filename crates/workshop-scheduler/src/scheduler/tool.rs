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

//! Tool.

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Tool.
///
/// One unit of the resource pool, bound to at most one customer at a time.
/// The pairing with the bound customer is symmetric: `user` holds the
/// customer's arena handle, and the customer's `tool` field holds this
/// tool's identifier.
#[derive(Debug)]
pub(crate) struct Tool {
    /// Identifier, the index into the tool table.
    pub id: usize,
    /// Cumulative milliseconds served over the tool's lifetime.
    pub total_usage: u64,
    /// Bound customer, if any.
    pub user: Option<usize>,
    /// Milliseconds since the current session started.
    pub usage: u64,
    /// Start of the current session.
    pub session_start: u64,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Tool {
    /// Creates a tool.
    pub fn new(id: usize) -> Self {
        Self {
            id,
            total_usage: 0,
            user: None,
            usage: 0,
            session_start: 0,
        }
    }
}
