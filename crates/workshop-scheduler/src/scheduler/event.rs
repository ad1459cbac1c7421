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

//! Scheduler event.

use std::fmt;

// ----------------------------------------------------------------------------
// Enumerations
// ----------------------------------------------------------------------------

/// Event kind.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Kind {
    /// Customer was bound to a tool.
    Assigned,
    /// Customer was preempted from a tool.
    Removed,
    /// Customer finished using a tool.
    Completed,
}

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Scheduler event.
///
/// Events record a customer's transition on or off a tool. They are written
/// to standard output inside the scheduler's critical section, so the log
/// order matches the true event order, and delivered to the customer's
/// client through the event mailbox.
///
/// The share is captured at emission time, truncated to whole milliseconds,
/// as that is how the wire format reports it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Event {
    /// Event kind.
    kind: Kind,
    /// Reported customer identifier.
    customer: u64,
    /// Share at emission time, truncated to milliseconds.
    share: u64,
    /// Tool identifier.
    tool: usize,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Event {
    /// Creates a scheduler event, truncating the share.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub(crate) fn new(
        kind: Kind, customer: u64, share: f64, tool: usize,
    ) -> Self {
        Self {
            kind,
            customer,
            share: share as u64,
            tool,
        }
    }
}

#[allow(clippy::must_use_candidate)]
impl Event {
    /// Returns the event kind.
    #[inline]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Returns the reported customer identifier.
    #[inline]
    pub fn customer(&self) -> u64 {
        self.customer
    }

    /// Returns the share at emission time.
    #[inline]
    pub fn share(&self) -> u64 {
        self.share
    }

    /// Returns the tool identifier.
    #[inline]
    pub fn tool(&self) -> usize {
        self.tool
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl fmt::Display for Event {
    /// Formats the event as its wire protocol line, without the newline.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let Self { customer, share, tool, .. } = self;
        match self.kind {
            Kind::Assigned => write!(
                f,
                "Customer {customer} with share {share} is assigned to the tool {tool}."
            ),
            Kind::Removed => write!(
                f,
                "Customer {customer} with share {share} is removed from the tool {tool}."
            ),
            Kind::Completed => write!(
                f,
                "Customer {customer} with share {share} leaves the tool {tool}."
            ),
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
