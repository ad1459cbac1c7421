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

//! Status report.

use std::fmt;

use super::customer::Status;
use super::state::State;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Status report.
///
/// A point-in-time snapshot of the scheduler: counters, the average share,
/// the waiting list sorted ascending by share, and one row per tool. The
/// snapshot is taken under the scheduler mutex; rendering to the wire format
/// through [`fmt::Display`] happens outside of it.
#[derive(Debug)]
pub struct Report {
    /// Number of tools.
    tools: usize,
    /// Number of waiting customers.
    waiting: usize,
    /// Number of resting customers.
    resting: usize,
    /// Number of allocated customers.
    total: usize,
    /// Average share over all allocated customers.
    average: f64,
    /// Waiting list, sorted ascending by share.
    waiters: Vec<Waiter>,
    /// Tool rows.
    rows: Vec<Row>,
}

/// Waiting list row.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Waiter {
    /// Reported customer identifier.
    pub id: u64,
    /// Milliseconds waited so far.
    pub waited: u64,
    /// Share, truncated to milliseconds.
    pub share: u64,
}

// ----------------------------------------------------------------------------
// Enumerations
// ----------------------------------------------------------------------------

/// Tool row.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Row {
    /// Tool is unbound.
    Free {
        /// Tool identifier.
        id: usize,
        /// Lifetime usage in milliseconds.
        total_usage: u64,
    },
    /// Tool is bound to a customer.
    Busy {
        /// Tool identifier.
        id: usize,
        /// Lifetime usage including the session in flight.
        total_usage: u64,
        /// Reported customer identifier.
        customer: u64,
        /// Share, truncated to milliseconds.
        share: u64,
        /// Remaining duration as of the last runner tick.
        remaining: u64,
    },
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Report {
    /// Creates a status report from the scheduler state.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    pub(crate) fn new(state: &State, now: u64) -> Self {
        let average = if state.total > 0 {
            state.total_share / state.total as f64
        } else {
            0.0
        };

        // Collect and sort the waiting list ascending by share
        let mut waiters: Vec<_> = state
            .customers
            .iter()
            .filter(|(_, customer)| customer.status == Status::Waiting)
            .map(|(_, customer)| Waiter {
                id: customer.id,
                waited: now.saturating_sub(customer.wait_start),
                share: customer.share as u64,
            })
            .collect();
        waiters.sort_by_key(|waiter| waiter.share);

        // Collect tool rows, folding the session in flight into the usage
        let rows = state
            .tools
            .iter()
            .map(|tool| match tool.user {
                None => Row::Free {
                    id: tool.id,
                    total_usage: tool.total_usage,
                },
                Some(user) => {
                    let customer = &state.customers[user];
                    Row::Busy {
                        id: tool.id,
                        total_usage: tool.total_usage
                            + now.saturating_sub(tool.session_start),
                        customer: customer.id,
                        share: customer.share as u64,
                        remaining: customer.remaining,
                    }
                }
            })
            .collect();

        Self {
            tools: state.tools.len(),
            waiting: state.waiting,
            resting: state.resting,
            total: state.total,
            average,
            waiters,
            rows,
        }
    }
}

#[allow(clippy::must_use_candidate)]
impl Report {
    /// Returns the number of waiting customers.
    #[inline]
    pub fn waiting(&self) -> usize {
        self.waiting
    }

    /// Returns the number of resting customers.
    #[inline]
    pub fn resting(&self) -> usize {
        self.resting
    }

    /// Returns the number of allocated customers.
    #[inline]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Returns the average share over all allocated customers.
    #[inline]
    pub fn average(&self) -> f64 {
        self.average
    }

    /// Returns the waiting list, sorted ascending by share.
    #[inline]
    pub fn waiters(&self) -> &[Waiter] {
        &self.waiters
    }

    /// Returns the tool rows.
    #[inline]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl fmt::Display for Report {
    /// Formats the report as the wire protocol document.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "k: {}, customers: {} waiting, {} resting, {} in total",
            self.tools, self.waiting, self.resting, self.total
        )?;
        writeln!(f, "average share: {:.2}", self.average)?;

        writeln!(f, "waiting list:")?;
        writeln!(f, "customer   duration  share")?;
        writeln!(f, "---------------------------")?;
        for waiter in &self.waiters {
            writeln!(
                f,
                "{:<12} {:>10} {:>12}",
                waiter.id, waiter.waited, waiter.share
            )?;
        }

        writeln!(f, "\nTools:")?;
        writeln!(f, "id   totaluse currentuser share duration")?;
        writeln!(f, "--------------")?;
        for row in &self.rows {
            match *row {
                Row::Free { id, total_usage } => {
                    writeln!(f, "{id:<5} {total_usage:>12} FREE")?;
                }
                Row::Busy {
                    id,
                    total_usage,
                    customer,
                    share,
                    remaining,
                } => {
                    writeln!(
                        f,
                        "{id:<5} {total_usage:>12} {customer:<12} {share:>10} {remaining:>12}"
                    )?;
                }
            }
        }
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
