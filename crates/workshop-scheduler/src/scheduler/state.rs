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

//! Scheduler state.

use slab::Slab;
use std::cmp::Reverse;

use workshop_heap::Heap;

use super::config::Config;
use super::customer::{Customer, Status};
use super::error::{Error, Result};
use super::event::{Event, Kind};
use super::tool::Tool;
use super::CAPACITY;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Scheduler state.
///
/// The single shared region all actors operate on: the customer arena, the
/// tool table, the share-ordered waiting queue, and the global counters. It
/// lives behind the scheduler mutex and performs no I/O and no blocking on
/// its own; every method runs to completion within the caller's critical
/// section.
///
/// Customers are addressed by arena handles, tools by their index into the
/// table. The waiting queue stores customer handles only, keyed by share,
/// and a customer is present in the queue exactly while its status is
/// [`Status::Waiting`].
#[derive(Debug)]
pub(crate) struct State {
    /// Configuration.
    pub config: Config,
    /// Customer arena.
    pub customers: Slab<Customer>,
    /// Tool table.
    pub tools: Vec<Tool>,
    /// Waiting queue, keyed by share.
    pub queue: Heap,
    /// Number of waiting customers.
    pub waiting: usize,
    /// Number of resting customers.
    pub resting: usize,
    /// Number of allocated customers.
    pub total: usize,
    /// Sum of all allocated customers' shares.
    pub total_share: f64,
    /// Identifier sequence.
    pub sequence: u64,
    /// Whether the scheduler is shutting down.
    pub closing: bool,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl State {
    /// Creates the scheduler state.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            customers: Slab::with_capacity(CAPACITY),
            tools: (0..config.tools).map(Tool::new).collect(),
            queue: Heap::with_capacity(CAPACITY),
            waiting: 0,
            resting: 0,
            total: 0,
            total_share: 0.0,
            sequence: 0,
            closing: false,
        }
    }

    /// Allocates a customer, returning its handle.
    ///
    /// The initial share is the population average at allocation time, i.e.
    /// computed before the arrival itself is counted. This keeps newcomers
    /// from always preempting incumbents that have accumulated service.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::Capacity`] if the arena is full.
    #[allow(clippy::cast_precision_loss)]
    pub fn allocate(&mut self) -> Result<usize> {
        if self.customers.len() >= CAPACITY {
            return Err(Error::Capacity);
        }

        // Initialize the share with the current population average
        let share = if self.total > 0 {
            self.total_share / self.total as f64
        } else {
            0.0
        };

        self.sequence += 1;
        let handle = self.customers.insert(Customer::new(self.sequence, share));
        self.total += 1;
        self.resting += 1;
        self.total_share += share;
        Ok(handle)
    }
}

impl State {
    /// Returns the free tool with the smallest total usage, if any.
    ///
    /// Ties resolve to the smallest tool identifier.
    pub fn free_tool(&self) -> Option<usize> {
        self.tools
            .iter()
            .filter(|tool| tool.user.is_none())
            .min_by_key(|tool| (tool.total_usage, tool.id))
            .map(|tool| tool.id)
    }

    /// Returns the tool whose holder should yield to the given share, if any.
    ///
    /// The candidate is the tool whose holder has the largest current usage,
    /// with ties resolving to the smallest tool identifier. Its holder must
    /// yield only if it has at least the requester's share and has exhausted
    /// the protected quantum.
    pub fn preemption_candidate(&self, share: f64) -> Option<usize> {
        let tool = self
            .tools
            .iter()
            .filter(|tool| tool.user.is_some())
            .max_by_key(|tool| (tool.usage, Reverse(tool.id)))?;

        let holder = &self.customers[tool.user.expect("invariant")];
        (holder.share >= share && tool.usage >= self.config.quantum_min)
            .then_some(tool.id)
    }

    /// Returns whether a holder past the protected quantum outranks the
    /// waiting queue's minimum share.
    ///
    /// When this holds, a runner will preempt that holder on its next tick,
    /// so the caller should wake idle runners.
    pub fn pressured(&self) -> bool {
        let Some(entry) = self.queue.peek() else {
            return false;
        };

        self.tools
            .iter()
            .filter(|tool| tool.usage >= self.config.quantum_min)
            .filter_map(|tool| tool.user)
            .map(|user| self.customers[user].share)
            .max_by(f64::total_cmp)
            .is_some_and(|share| entry.key() < share)
    }
}

impl State {
    /// Binds the customer to the tool, starting a service session.
    ///
    /// A waiting customer is removed from the queue first, so the queue and
    /// the customer status stay in lockstep. Returns the assignment event,
    /// which is also placed into the customer's mailbox.
    pub fn bind(&mut self, handle: usize, tool: usize, now: u64) -> Event {
        if self.customers[handle].status == Status::Waiting {
            self.dequeue(handle);
        }

        let customer = &mut self.customers[handle];
        customer.status = Status::Using;
        customer.tool = Some(tool);
        customer.session_start = now;

        let event = Event::new(Kind::Assigned, customer.id, customer.share, tool);
        customer.slot = Some(event);

        let tool = &mut self.tools[tool];
        tool.user = Some(handle);
        tool.usage = 0;
        tool.session_start = now;
        event
    }

    /// Unbinds the customer from its tool, settling the share account.
    ///
    /// The elapsed session time is added to the customer's share, the global
    /// share total, and the tool's lifetime usage, in that single step. The
    /// returned event carries the updated share. The caller decides the
    /// customer's next status. Returns [`None`] if no tool is bound.
    #[allow(clippy::cast_precision_loss)]
    pub fn unbind(
        &mut self, handle: usize, kind: Kind, now: u64,
    ) -> Option<Event> {
        let tool = self.customers[handle].tool.take()?;
        let delta = now.saturating_sub(self.customers[handle].session_start);

        let customer = &mut self.customers[handle];
        customer.share += delta as f64;
        self.total_share += delta as f64;

        let event = {
            let customer = &self.customers[handle];
            Event::new(kind, customer.id, customer.share, tool)
        };
        self.customers[handle].slot = Some(event);

        let tool = &mut self.tools[tool];
        tool.total_usage += delta;
        tool.user = None;
        tool.usage = 0;
        Some(event)
    }

    /// Enqueues the customer into the waiting queue, keyed by its share.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::Heap`] if the customer is already
    /// enqueued, which denotes a scheduler bug.
    pub fn enqueue(&mut self, handle: usize, now: u64) -> Result {
        let customer = &mut self.customers[handle];
        customer.status = Status::Waiting;
        customer.wait_start = now;

        self.queue.insert(handle, customer.share)?;
        self.waiting += 1;
        Ok(())
    }

    /// Removes the customer from the waiting queue, if enqueued.
    pub fn dequeue(&mut self, handle: usize) {
        if self.queue.remove(handle).is_some() {
            self.waiting -= 1;
        }
    }

    /// Hands the tool to the next waiter, if any.
    ///
    /// Pops the waiting queue and binds the customer with the smallest share
    /// to the given tool, returning its handle and the assignment event.
    pub fn dispatch(&mut self, tool: usize, now: u64) -> Option<(usize, Event)> {
        let next = self.queue.pop()?;
        self.waiting -= 1;
        let event = self.bind(next, tool, now);
        Some((next, event))
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use crate::scheduler::config::Config;
    use crate::scheduler::state::State;

    fn state(quantum_min: u64, quantum_max: u64, tools: usize) -> State {
        State::new(Config::new(quantum_min, quantum_max, tools))
    }

    mod allocate {
        use super::state;
        use crate::scheduler::error::Error;
        use crate::scheduler::CAPACITY;

        #[test]
        fn starts_with_zero_share() -> crate::scheduler::Result {
            let mut state = state(100, 500, 1);
            let handle = state.allocate()?;
            assert_eq!(state.customers[handle].share, 0.0);
            assert_eq!((state.total, state.resting), (1, 1));
            Ok(())
        }

        #[test]
        fn starts_with_average_share() -> crate::scheduler::Result {
            let mut state = state(100, 500, 1);
            let a = state.allocate()?;
            state.customers[a].share = 50.0;
            state.total_share = 50.0;

            // The arrival is not counted into its own average
            let b = state.allocate()?;
            assert_eq!(state.customers[b].share, 50.0);
            assert_eq!(state.total_share, 100.0);
            Ok(())
        }

        #[test]
        fn rejects_at_capacity() -> crate::scheduler::Result {
            let mut state = state(100, 500, 1);
            for _ in 0..CAPACITY {
                state.allocate()?;
            }
            assert!(matches!(state.allocate(), Err(Error::Capacity)));
            Ok(())
        }
    }

    mod free_tool {
        use super::state;

        #[test]
        fn prefers_least_used() -> crate::scheduler::Result {
            let mut state = state(100, 500, 3);
            state.tools[0].total_usage = 30;
            state.tools[1].total_usage = 10;
            state.tools[2].total_usage = 20;
            assert_eq!(state.free_tool(), Some(1));
            Ok(())
        }

        #[test]
        fn breaks_ties_by_identifier() {
            let state = state(100, 500, 3);
            assert_eq!(state.free_tool(), Some(0));
        }

        #[test]
        fn skips_bound_tools() -> crate::scheduler::Result {
            let mut state = state(100, 500, 2);
            let a = state.allocate()?;
            state.bind(a, 0, 0);
            assert_eq!(state.free_tool(), Some(1));

            let b = state.allocate()?;
            state.bind(b, 1, 0);
            assert_eq!(state.free_tool(), None);
            Ok(())
        }
    }

    mod preemption_candidate {
        use super::state;

        #[test]
        fn requires_protected_quantum() -> crate::scheduler::Result {
            let mut state = state(100, 500, 1);
            let a = state.allocate()?;
            state.bind(a, 0, 0);

            // The holder is protected until q has elapsed
            state.tools[0].usage = 99;
            assert_eq!(state.preemption_candidate(0.0), None);
            state.tools[0].usage = 100;
            assert_eq!(state.preemption_candidate(0.0), Some(0));
            Ok(())
        }

        #[test]
        fn requires_no_smaller_share() -> crate::scheduler::Result {
            let mut state = state(100, 500, 1);
            let a = state.allocate()?;
            state.bind(a, 0, 0);
            state.tools[0].usage = 200;
            state.customers[a].share = 10.0;

            // Holders with smaller shares than the requester are kept
            assert_eq!(state.preemption_candidate(20.0), None);
            assert_eq!(state.preemption_candidate(10.0), Some(0));
            assert_eq!(state.preemption_candidate(5.0), Some(0));
            Ok(())
        }

        #[test]
        fn prefers_busiest_tool() -> crate::scheduler::Result {
            let mut state = state(100, 500, 2);
            let a = state.allocate()?;
            let b = state.allocate()?;
            state.bind(a, 0, 0);
            state.bind(b, 1, 0);
            state.tools[0].usage = 150;
            state.tools[1].usage = 300;
            assert_eq!(state.preemption_candidate(0.0), Some(1));
            Ok(())
        }
    }

    mod pressured {
        use super::state;

        #[test]
        fn detects_outranked_holder() -> crate::scheduler::Result {
            let mut state = state(100, 500, 1);
            let a = state.allocate()?;
            state.bind(a, 0, 0);
            state.customers[a].share = 80.0;
            state.tools[0].usage = 120;

            let b = state.allocate()?;
            state.customers[b].share = 40.0;
            state.enqueue(b, 0)?;
            assert!(state.pressured());
            Ok(())
        }

        #[test]
        fn respects_protected_quantum() -> crate::scheduler::Result {
            let mut state = state(100, 500, 1);
            let a = state.allocate()?;
            state.bind(a, 0, 0);
            state.customers[a].share = 80.0;
            state.tools[0].usage = 40;

            let b = state.allocate()?;
            state.enqueue(b, 0)?;
            assert!(!state.pressured());
            Ok(())
        }

        #[test]
        fn handles_empty_queue() -> crate::scheduler::Result {
            let mut state = state(100, 500, 1);
            let a = state.allocate()?;
            state.bind(a, 0, 0);
            state.tools[0].usage = 120;
            assert!(!state.pressured());
            Ok(())
        }
    }

    mod bind {
        use super::state;
        use crate::scheduler::customer::Status;
        use crate::scheduler::event::Kind;

        #[test]
        fn pairs_customer_and_tool() -> crate::scheduler::Result {
            let mut state = state(100, 500, 1);
            let a = state.allocate()?;
            let event = state.bind(a, 0, 42);

            assert_eq!(state.customers[a].status, Status::Using);
            assert_eq!(state.customers[a].tool, Some(0));
            assert_eq!(state.tools[0].user, Some(a));
            assert_eq!(state.tools[0].session_start, 42);
            assert_eq!(event.kind(), Kind::Assigned);
            assert_eq!(state.customers[a].slot, Some(event));
            Ok(())
        }

        #[test]
        fn removes_waiter_from_queue() -> crate::scheduler::Result {
            let mut state = state(100, 500, 1);
            let a = state.allocate()?;
            state.enqueue(a, 0)?;
            assert_eq!(state.waiting, 1);

            state.bind(a, 0, 0);
            assert_eq!(state.waiting, 0);
            assert!(state.queue.is_empty());
            Ok(())
        }
    }

    mod unbind {
        use super::state;
        use crate::scheduler::event::Kind;

        #[test]
        fn settles_share_account() -> crate::scheduler::Result {
            let mut state = state(100, 500, 1);
            let a = state.allocate()?;
            state.bind(a, 0, 100);

            let event =
                state.unbind(a, Kind::Completed, 350).expect("bound");
            assert_eq!(state.customers[a].share, 250.0);
            assert_eq!(state.total_share, 250.0);
            assert_eq!(state.tools[0].total_usage, 250);
            assert_eq!(state.tools[0].user, None);
            assert_eq!(event.share(), 250);
            Ok(())
        }

        #[test]
        fn handles_unbound_customer() -> crate::scheduler::Result {
            let mut state = state(100, 500, 1);
            let a = state.allocate()?;
            assert_eq!(state.unbind(a, Kind::Completed, 0), None);
            Ok(())
        }
    }

    mod dispatch {
        use super::state;

        #[test]
        fn hands_tool_to_smallest_share() -> crate::scheduler::Result {
            let mut state = state(100, 500, 1);
            let a = state.allocate()?;
            let b = state.allocate()?;
            state.customers[a].share = 20.0;
            state.customers[b].share = 10.0;
            state.enqueue(a, 0)?;
            state.enqueue(b, 0)?;

            let (next, _) = state.dispatch(0, 0).expect("non-empty");
            assert_eq!(next, b);
            assert_eq!(state.waiting, 1);
            assert_eq!(state.tools[0].user, Some(b));
            Ok(())
        }

        #[test]
        fn handles_empty_queue() {
            let mut state = state(100, 500, 1);
            assert!(state.dispatch(0, 0).is_none());
        }
    }
}
