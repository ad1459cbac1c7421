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

//! Scheduler.

use std::sync::{Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use tracing::debug;

mod config;
mod customer;
mod error;
mod event;
mod report;
mod state;
mod tool;

pub use config::Config;
pub use error::{Error, Result};
pub use event::{Event, Kind};
pub use report::{Report, Row, Waiter};

use customer::Status;
use state::State;

// ----------------------------------------------------------------------------
// Constants
// ----------------------------------------------------------------------------

/// Capacity of the customer arena.
///
/// Connections beyond this limit are rejected until a slot frees up. The
/// waiting queue and the per-customer condition table are sized accordingly.
pub const CAPACITY: usize = 1024;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Scheduler.
///
/// The scheduler owns the entire shared state, i.e. the customer arena, the
/// tool table, the waiting queue, and the counters, behind a single mutex,
/// and is shared
/// among all actors through an [`Arc`][]. Three kinds of threads drive it:
/// agents mutate state on behalf of their customers ([`Scheduler::request`],
/// [`Scheduler::rest`], [`Scheduler::disconnect`]), tool runners advance
/// service timers and enforce the two preemption quanta
/// ([`Scheduler::tick`]), and event forwarders block on their customer's
/// mailbox ([`Scheduler::next_event`]).
///
/// Two kinds of conditions accompany the mutex: `new_work` is broadcast
/// whenever new work appears, waking idle runners, and one condition per
/// customer slot signals the customer's forwarder when an event is queued or
/// the customer closes. All waits release and reacquire the mutex
/// atomically; no socket I/O ever happens under the mutex.
///
/// Time is monotonic milliseconds since scheduler creation. Fairness rests
/// on the share account: whenever a customer is unbound from a tool, the
/// elapsed session time is settled into its share, the global share total,
/// and the tool's lifetime usage within one critical section, so the
/// counters never drift from each other.
///
/// [`Arc`]: std::sync::Arc
#[derive(Debug)]
pub struct Scheduler {
    /// Scheduler state, guarded by the scheduler mutex.
    state: Mutex<State>,
    /// Condition broadcast when new work appears or shutdown begins.
    new_work: Condvar,
    /// Per-slot conditions for event forwarders.
    events: Vec<Condvar>,
    /// Monotonic reference point.
    started: Instant,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Scheduler {
    /// Creates a scheduler with the given configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            state: Mutex::new(State::new(config)),
            new_work: Condvar::new(),
            events: (0..CAPACITY).map(|_| Condvar::new()).collect(),
            started: Instant::now(),
        }
    }

    /// Connects a customer, returning its handle and reported identifier.
    ///
    /// The customer starts out resting, with its share initialized to the
    /// population average at connect time.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::Capacity`] if the customer arena is
    /// full, in which case the caller should drop the connection.
    pub fn connect(&self) -> Result<(usize, u64)> {
        let mut state = self.lock()?;
        let handle = state.allocate()?;

        let id = state.customers[handle].id;
        debug!(customer = id, "customer connected");
        Ok((handle, id))
    }

    /// Requests service for the given duration in milliseconds.
    ///
    /// The customer leaves its prior state - a waiting customer is removed
    /// from the queue first - and is then placed: onto the least-used free
    /// tool if one exists, else onto the busiest tool whose holder has both
    /// at least the requester's share and exhausted the protected quantum,
    /// else into the waiting queue. Requests from bound or closing customers
    /// are ignored.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::Poisoned`] if a thread panicked inside a
    /// critical section, and [`Error::Heap`] on a queue inconsistency, which
    /// denotes a scheduler bug.
    pub fn request(&self, handle: usize, duration: u64) -> Result {
        let mut state = self.lock()?;
        let now = self.now();

        match state.customers[handle].status {
            Status::Resting => state.resting -= 1,
            Status::Waiting => state.dequeue(handle),
            Status::Using | Status::Deleted => return Ok(()),
        }

        let customer = &mut state.customers[handle];
        customer.request = duration;
        customer.remaining = duration;
        let share = customer.share;

        if let Some(tool) = state.free_tool() {
            let event = state.bind(handle, tool, now);
            self.emit(handle, event);
        } else if let Some(tool) = state.preemption_candidate(share) {
            // Rotate the holder out and hand its tool to the requester
            let holder = state.tools[tool].user.expect("invariant");
            if let Some(event) = state.unbind(holder, Kind::Removed, now) {
                self.emit(holder, event);
            }
            state.enqueue(holder, now)?;

            let event = state.bind(handle, tool, now);
            self.emit(handle, event);
        } else {
            state.enqueue(handle, now)?;

            // A holder past the protected quantum may now be outranked by
            // the queue minimum, so runners must re-evaluate on their next
            // tick
            if state.pressured() {
                self.new_work.notify_all();
            }
        }

        self.new_work.notify_all();
        Ok(())
    }

    /// Stops using or waiting, transitioning the customer to resting.
    ///
    /// A bound customer leaves its tool, settling the share account, and the
    /// tool is handed to the next waiter. A waiting customer is removed from
    /// the queue. A resting customer is left untouched.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::Poisoned`] if a thread panicked inside a
    /// critical section.
    pub fn rest(&self, handle: usize) -> Result {
        let mut state = self.lock()?;
        let now = self.now();

        match state.customers[handle].status {
            Status::Using => {
                let tool = state.customers[handle].tool.expect("invariant");
                if let Some(event) = state.unbind(handle, Kind::Completed, now)
                {
                    self.emit(handle, event);
                }
                if let Some((next, event)) = state.dispatch(tool, now) {
                    self.emit(next, event);
                }
                state.customers[handle].status = Status::Resting;
                state.resting += 1;
            }
            Status::Waiting => {
                state.dequeue(handle);
                state.customers[handle].status = Status::Resting;
                state.resting += 1;
            }
            Status::Resting | Status::Deleted => {}
        }
        Ok(())
    }

    /// Disconnects the customer, releasing its scheduler footprint.
    ///
    /// Performs the same cleanup as [`Scheduler::rest`] - including handing
    /// a held tool to the next waiter - then removes the customer from the
    /// counters, marks it closed, and wakes its forwarder so it can exit.
    /// The arena slot itself survives until [`Scheduler::remove`], which the
    /// agent calls after joining the forwarder; this two-phase teardown
    /// keeps a reused slot from ever being observed by a stale forwarder.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::Poisoned`] if a thread panicked inside a
    /// critical section.
    pub fn disconnect(&self, handle: usize) -> Result {
        let mut state = self.lock()?;
        let now = self.now();

        match state.customers[handle].status {
            Status::Using => {
                let tool = state.customers[handle].tool.expect("invariant");
                if let Some(event) = state.unbind(handle, Kind::Completed, now)
                {
                    self.emit(handle, event);
                }
                if let Some((next, event)) = state.dispatch(tool, now) {
                    self.emit(next, event);
                }
            }
            Status::Waiting => state.dequeue(handle),
            Status::Resting => state.resting -= 1,
            Status::Deleted => return Ok(()),
        }

        let customer = &mut state.customers[handle];
        customer.status = Status::Deleted;
        customer.open = false;
        let id = customer.id;
        let share = customer.share;

        state.total -= 1;
        state.total_share -= share;

        self.events[handle].notify_all();
        debug!(customer = id, "customer disconnected");
        Ok(())
    }

    /// Releases the customer's arena slot.
    ///
    /// Must only be called after [`Scheduler::disconnect`], once the
    /// customer's forwarder has been joined.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::Poisoned`] if a thread panicked inside a
    /// critical section.
    pub fn remove(&self, handle: usize) -> Result {
        let mut state = self.lock()?;
        let _ = state.customers.try_remove(handle);
        Ok(())
    }

    /// Takes a snapshot of the scheduler state.
    ///
    /// The snapshot is taken under the scheduler mutex; callers render and
    /// write it after the mutex is released.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::Poisoned`] if a thread panicked inside a
    /// critical section.
    pub fn report(&self) -> Result<Report> {
        let state = self.lock()?;
        Ok(Report::new(&state, self.now()))
    }

    /// Runs one tick for the given tool, returning whether to continue.
    ///
    /// Runners call this in a loop, sleeping briefly between ticks. An
    /// unbound tool waits for new work with a one second timeout. A bound
    /// tool advances its service timer and then, in order: completes the
    /// customer when the requested duration has elapsed, rotates it out
    /// unconditionally once the maximum quantum is exhausted and someone is
    /// waiting, or preempts it in favor of a waiter with a strictly smaller
    /// share once the protected quantum has passed. Returns `false` once the
    /// scheduler is shutting down.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::Poisoned`] if a thread panicked inside a
    /// critical section, and [`Error::Heap`] on a queue inconsistency, which
    /// denotes a scheduler bug.
    pub fn tick(&self, tool: usize) -> Result<bool> {
        let mut state = self.lock()?;
        if state.closing {
            return Ok(false);
        }

        let Some(holder) = state.tools[tool].user else {
            let (state, _) = self
                .new_work
                .wait_timeout(state, Duration::from_secs(1))
                .map_err(|_| Error::Poisoned)?;
            return Ok(!state.closing);
        };

        // Advance the service timer of the session in flight
        let now = self.now();
        let elapsed = now.saturating_sub(state.tools[tool].session_start);
        state.tools[tool].usage = elapsed;

        let customer = &mut state.customers[holder];
        customer.remaining = customer.request.saturating_sub(elapsed);
        let (remaining, share) = (customer.remaining, customer.share);

        if remaining == 0 {
            if let Some(event) = state.unbind(holder, Kind::Completed, now) {
                self.emit(holder, event);
            }
            state.customers[holder].status = Status::Resting;
            state.resting += 1;

            if let Some((next, event)) = state.dispatch(tool, now) {
                self.emit(next, event);
            }
        } else if elapsed >= state.config.quantum_max
            && !state.queue.is_empty()
        {
            self.preempt(&mut state, tool, now)?;
        } else if elapsed >= state.config.quantum_min
            && state.queue.peek().is_some_and(|entry| entry.key() < share)
        {
            self.preempt(&mut state, tool, now)?;
        }
        Ok(true)
    }

    /// Waits for and returns the customer's next event.
    ///
    /// Blocks on the customer's condition until an event is queued in its
    /// mailbox, or the customer has closed and drained, in which case
    /// [`None`] is returned and the forwarder should exit.
    pub fn next_event(&self, handle: usize) -> Option<Event> {
        let mut state = self.state.lock().ok()?;
        loop {
            let customer = state.customers.get_mut(handle)?;
            if let Some(event) = customer.slot.take() {
                return Some(event);
            }
            if !customer.open {
                return None;
            }
            state = self.events[handle].wait(state).ok()?;
        }
    }

    /// Initiates shutdown, waking all idle runners.
    pub fn shutdown(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.closing = true;
        }
        self.new_work.notify_all();
        debug!("scheduler shutting down");
    }
}

impl Scheduler {
    /// Preempts the tool's holder in favor of the next waiter.
    ///
    /// The holder is unbound with its share settled, re-enqueued under its
    /// updated share, and the tool handed to the queue minimum.
    fn preempt(&self, state: &mut State, tool: usize, now: u64) -> Result {
        let holder = state.tools[tool].user.expect("invariant");
        if let Some(event) = state.unbind(holder, Kind::Removed, now) {
            self.emit(holder, event);
        }
        state.enqueue(holder, now)?;

        if let Some((next, event)) = state.dispatch(tool, now) {
            self.emit(next, event);
        }
        Ok(())
    }

    /// Emits an event for the customer identified by the handle.
    ///
    /// Called with the scheduler mutex held: the line order on standard
    /// output is the true event order. The mailbox was already filled by the
    /// state transition; this only logs and wakes the forwarder.
    fn emit(&self, handle: usize, event: Event) {
        println!("{event}");
        self.events[handle].notify_all();
    }

    /// Locks the scheduler state.
    fn lock(&self) -> Result<MutexGuard<'_, State>> {
        self.state.lock().map_err(|_| Error::Poisoned)
    }

    /// Returns the monotonic time in milliseconds.
    fn now(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::thread;
    use std::time::Duration;

    use crate::scheduler::{Config, Scheduler};

    fn scheduler(quantum_min: u64, quantum_max: u64, tools: usize) -> Scheduler {
        Scheduler::new(Config::new(quantum_min, quantum_max, tools))
    }

    fn sleep(ms: u64) {
        thread::sleep(Duration::from_millis(ms));
    }

    mod connect {
        use super::{scheduler, sleep};
        use crate::scheduler::{Error, Kind, Result};

        #[test]
        fn assigns_sequential_identifiers() -> Result {
            let scheduler = scheduler(100, 500, 1);
            let (_, a) = scheduler.connect()?;
            let (_, b) = scheduler.connect()?;
            assert_eq!((a, b), (1, 2));
            Ok(())
        }

        #[test]
        fn rejects_at_capacity() -> Result {
            let scheduler = scheduler(100, 500, 1);
            for _ in 0..crate::scheduler::CAPACITY {
                scheduler.connect()?;
            }
            assert!(matches!(scheduler.connect(), Err(Error::Capacity)));
            Ok(())
        }

        #[test]
        fn initializes_share_with_average() -> Result {
            let scheduler = scheduler(10, 500, 1);
            let (a, _) = scheduler.connect()?;
            scheduler.request(a, 20)?;
            assert_eq!(
                scheduler.next_event(a).map(|event| event.kind()),
                Some(Kind::Assigned)
            );

            // Let the request complete so the share becomes non-zero
            sleep(60);
            scheduler.tick(0)?;
            assert_eq!(
                scheduler.next_event(a).map(|event| event.kind()),
                Some(Kind::Completed)
            );

            // The average share must not move when a newcomer arrives, as
            // it starts out with exactly the population average
            let before = scheduler.report()?.average();
            assert!(before > 0.0);
            scheduler.connect()?;
            let after = scheduler.report()?.average();
            assert!((before - after).abs() < 1e-6);
            Ok(())
        }
    }

    mod request {
        use super::{scheduler, sleep};
        use crate::scheduler::{Kind, Result};

        #[test]
        fn binds_free_tool() -> Result {
            let scheduler = scheduler(100, 500, 2);
            let (a, id) = scheduler.connect()?;
            scheduler.request(a, 1000)?;

            let event = scheduler.next_event(a).expect("event");
            assert_eq!(event.kind(), Kind::Assigned);
            assert_eq!(event.customer(), id);
            assert_eq!(event.tool(), 0);
            assert_eq!(event.share(), 0);

            let report = scheduler.report()?;
            assert_eq!(report.waiting(), 0);
            assert_eq!(report.resting(), 0);
            assert_eq!(report.total(), 1);
            Ok(())
        }

        #[test]
        fn queues_when_saturated() -> Result {
            let scheduler = scheduler(100, 500, 1);
            let (a, _) = scheduler.connect()?;
            let (b, _) = scheduler.connect()?;
            scheduler.request(a, 1000)?;
            scheduler.request(b, 1000)?;

            let report = scheduler.report()?;
            assert_eq!(report.waiting(), 1);
            assert_eq!(report.waiters().len(), 1);
            Ok(())
        }

        #[test]
        fn preempts_exhausted_holder() -> Result {
            let scheduler = scheduler(10, 10_000, 1);
            let (a, _) = scheduler.connect()?;
            scheduler.request(a, 1000)?;
            assert_eq!(
                scheduler.next_event(a).map(|event| event.kind()),
                Some(Kind::Assigned)
            );

            // Advance the service timer past the protected quantum
            sleep(50);
            scheduler.tick(0)?;

            // The holder has equal share but exhausted its protection
            let (b, _) = scheduler.connect()?;
            scheduler.request(b, 1000)?;
            let removed = scheduler.next_event(a).expect("event");
            assert_eq!(removed.kind(), Kind::Removed);
            assert!(removed.share() >= 40);
            assert_eq!(
                scheduler.next_event(b).map(|event| event.kind()),
                Some(Kind::Assigned)
            );
            Ok(())
        }

        #[test]
        fn requeues_waiting_customer_once() -> Result {
            let scheduler = scheduler(100, 500, 1);
            let (a, _) = scheduler.connect()?;
            let (b, _) = scheduler.connect()?;
            scheduler.request(a, 1000)?;
            scheduler.request(b, 500)?;
            scheduler.request(b, 700)?;

            let report = scheduler.report()?;
            assert_eq!(report.waiting(), 1);
            assert_eq!(report.waiters().len(), 1);
            Ok(())
        }
    }

    mod rest {
        use super::scheduler;
        use crate::scheduler::{Kind, Result};

        #[test]
        fn is_idempotent() -> Result {
            let scheduler = scheduler(100, 500, 1);
            let (a, _) = scheduler.connect()?;
            scheduler.rest(a)?;
            scheduler.rest(a)?;

            let report = scheduler.report()?;
            assert_eq!(report.resting(), 1);
            assert_eq!(report.total(), 1);
            Ok(())
        }

        #[test]
        fn cancels_waiting_customer() -> Result {
            let scheduler = scheduler(100, 500, 1);
            let (a, _) = scheduler.connect()?;
            let (b, _) = scheduler.connect()?;
            scheduler.request(a, 1000)?;
            scheduler.request(b, 500)?;
            scheduler.rest(b)?;

            let report = scheduler.report()?;
            assert_eq!(report.waiting(), 0);
            assert_eq!(report.resting(), 1);
            Ok(())
        }

        #[test]
        fn releases_tool_to_next_waiter() -> Result {
            let scheduler = scheduler(100, 500, 1);
            let (a, _) = scheduler.connect()?;
            let (b, _) = scheduler.connect()?;
            scheduler.request(a, 1000)?;
            assert_eq!(
                scheduler.next_event(a).map(|event| event.kind()),
                Some(Kind::Assigned)
            );
            scheduler.request(b, 500)?;
            scheduler.rest(a)?;

            assert_eq!(
                scheduler.next_event(a).map(|event| event.kind()),
                Some(Kind::Completed)
            );
            assert_eq!(
                scheduler.next_event(b).map(|event| event.kind()),
                Some(Kind::Assigned)
            );

            let report = scheduler.report()?;
            assert_eq!(report.waiting(), 0);
            assert_eq!(report.resting(), 1);
            Ok(())
        }
    }

    mod tick {
        use super::{scheduler, sleep};
        use crate::scheduler::{Kind, Result, Row};

        #[test]
        fn completes_elapsed_request() -> Result {
            let scheduler = scheduler(100, 500, 1);
            let (a, _) = scheduler.connect()?;
            scheduler.request(a, 30)?;
            assert_eq!(
                scheduler.next_event(a).map(|event| event.kind()),
                Some(Kind::Assigned)
            );

            sleep(80);
            scheduler.tick(0)?;
            let event = scheduler.next_event(a).expect("event");
            assert_eq!(event.kind(), Kind::Completed);
            assert!(event.share() >= 30);

            let report = scheduler.report()?;
            assert_eq!(report.resting(), 1);
            assert!(matches!(report.rows()[0], Row::Free { .. }));
            Ok(())
        }

        #[test]
        fn enforces_maximum_quantum() -> Result {
            let scheduler = scheduler(1, 40, 1);
            let (a, _) = scheduler.connect()?;
            let (b, _) = scheduler.connect()?;
            scheduler.request(a, 1000)?;
            assert_eq!(
                scheduler.next_event(a).map(|event| event.kind()),
                Some(Kind::Assigned)
            );
            scheduler.request(b, 1000)?;

            // Past Q with a non-empty queue, the holder must rotate out even
            // though its share is not larger than the waiter's
            sleep(80);
            scheduler.tick(0)?;
            assert_eq!(
                scheduler.next_event(a).map(|event| event.kind()),
                Some(Kind::Removed)
            );
            assert_eq!(
                scheduler.next_event(b).map(|event| event.kind()),
                Some(Kind::Assigned)
            );
            Ok(())
        }

        #[test]
        fn protects_minimum_quantum() -> Result {
            let scheduler = scheduler(200, 10_000, 1);
            let (a, _) = scheduler.connect()?;
            let (b, _) = scheduler.connect()?;
            scheduler.request(a, 1000)?;
            scheduler.request(b, 1000)?;

            sleep(50);
            scheduler.tick(0)?;

            // The holder is immune until q has elapsed
            let report = scheduler.report()?;
            assert_eq!(report.waiting(), 1);
            assert!(matches!(report.rows()[0], Row::Busy { .. }));
            Ok(())
        }

        #[test]
        fn keeps_holder_with_smaller_share() -> Result {
            let scheduler = scheduler(10, 40, 1);
            let (a, _) = scheduler.connect()?;
            let (b, _) = scheduler.connect()?;
            scheduler.request(a, 1000)?;
            assert_eq!(
                scheduler.next_event(a).map(|event| event.kind()),
                Some(Kind::Assigned)
            );
            scheduler.request(b, 1000)?;

            // The first holder rotates out at Q with its share grown
            sleep(80);
            scheduler.tick(0)?;
            assert_eq!(
                scheduler.next_event(a).map(|event| event.kind()),
                Some(Kind::Removed)
            );
            assert_eq!(
                scheduler.next_event(b).map(|event| event.kind()),
                Some(Kind::Assigned)
            );

            // The new holder has the smaller share, so it keeps the tool
            // past q as long as every waiter outranks it
            sleep(20);
            scheduler.tick(0)?;
            let report = scheduler.report()?;
            assert_eq!(report.waiting(), 1);
            assert!(
                matches!(report.rows()[0], Row::Busy { customer, .. } if customer == 2)
            );
            Ok(())
        }
    }

    mod disconnect {
        use super::scheduler;
        use crate::scheduler::{Kind, Result};

        #[test]
        fn redispatches_held_tool() -> Result {
            let scheduler = scheduler(100, 500, 1);
            let (a, _) = scheduler.connect()?;
            let (b, _) = scheduler.connect()?;
            scheduler.request(a, 1000)?;
            assert_eq!(
                scheduler.next_event(a).map(|event| event.kind()),
                Some(Kind::Assigned)
            );
            scheduler.request(b, 500)?;
            scheduler.disconnect(a)?;

            // The pending completion drains, then the forwarder is released
            assert_eq!(
                scheduler.next_event(a).map(|event| event.kind()),
                Some(Kind::Completed)
            );
            assert_eq!(scheduler.next_event(a), None);
            assert_eq!(
                scheduler.next_event(b).map(|event| event.kind()),
                Some(Kind::Assigned)
            );
            Ok(())
        }

        #[test]
        fn frees_slot_for_reuse() -> Result {
            let scheduler = scheduler(100, 500, 1);
            let (a, _) = scheduler.connect()?;
            scheduler.disconnect(a)?;
            scheduler.remove(a)?;

            let (_, id) = scheduler.connect()?;
            assert_eq!(id, 2);

            let report = scheduler.report()?;
            assert_eq!(report.total(), 1);
            assert_eq!(report.resting(), 1);
            Ok(())
        }

        #[test]
        fn is_idempotent() -> Result {
            let scheduler = scheduler(100, 500, 1);
            let (a, _) = scheduler.connect()?;
            scheduler.disconnect(a)?;
            scheduler.disconnect(a)?;

            let report = scheduler.report()?;
            assert_eq!(report.total(), 0);
            Ok(())
        }
    }

    mod next_event {
        use super::scheduler;
        use std::sync::Arc;
        use std::thread;

        #[test]
        fn blocks_until_event() -> crate::scheduler::Result {
            let scheduler = Arc::new(scheduler(100, 500, 1));
            let (a, _) = scheduler.connect()?;

            let waiter = Arc::clone(&scheduler);
            let forwarder = thread::spawn(move || waiter.next_event(a));

            scheduler.request(a, 1000)?;
            let event = forwarder.join().expect("join");
            assert!(event.is_some());
            Ok(())
        }

        #[test]
        fn unblocks_on_disconnect() -> crate::scheduler::Result {
            let scheduler = Arc::new(scheduler(100, 500, 1));
            let (a, _) = scheduler.connect()?;

            let waiter = Arc::clone(&scheduler);
            let forwarder = thread::spawn(move || waiter.next_event(a));

            scheduler.disconnect(a)?;
            assert_eq!(forwarder.join().expect("join"), None);
            Ok(())
        }
    }

    mod shutdown {
        use super::scheduler;

        #[test]
        fn stops_runners() -> crate::scheduler::Result {
            let scheduler = scheduler(100, 500, 1);
            scheduler.shutdown();
            assert!(!scheduler.tick(0)?);
            Ok(())
        }
    }
}
