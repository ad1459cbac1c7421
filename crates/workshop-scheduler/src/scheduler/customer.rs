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

//! Customer.

use super::event::Event;

// ----------------------------------------------------------------------------
// Enumerations
// ----------------------------------------------------------------------------

/// Customer status.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Status {
    /// Idle, neither waiting nor using a tool.
    Resting,
    /// Enqueued in the waiting queue.
    Waiting,
    /// Bound to a tool.
    Using,
    /// Disconnected, slot pending release.
    Deleted,
}

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Customer.
///
/// One connected client, tracked in the customer arena and addressed by its
/// arena handle. The accumulated `share` is the fairness metric: it grows by
/// the served milliseconds whenever the customer is unbound from a tool, and
/// doubles as the ordering key in the waiting queue.
///
/// The `slot` field is a one-deep event mailbox consumed by the customer's
/// event forwarder. The scheduler never blocks on the forwarder: a new event
/// overwrites an unconsumed one.
#[derive(Debug)]
pub(crate) struct Customer {
    /// Reported identifier.
    pub id: u64,
    /// Customer status.
    pub status: Status,
    /// Accumulated service in milliseconds.
    pub share: f64,
    /// Requested duration in milliseconds.
    pub request: u64,
    /// Remaining duration in milliseconds.
    pub remaining: u64,
    /// Bound tool, if using.
    pub tool: Option<usize>,
    /// Start of the current service session.
    pub session_start: u64,
    /// Start of the current wait.
    pub wait_start: u64,
    /// Event mailbox.
    pub slot: Option<Event>,
    /// Whether the agent is still connected.
    pub open: bool,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Customer {
    /// Creates a customer with the given identifier and initial share.
    pub fn new(id: u64, share: f64) -> Self {
        Self {
            id,
            status: Status::Resting,
            share,
            request: 0,
            remaining: 0,
            tool: None,
            session_start: 0,
            wait_start: 0,
            slot: None,
            open: true,
        }
    }
}
