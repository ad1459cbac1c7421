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

//! Agent.

use std::io::{self, BufRead, BufReader, Write};
use std::sync::Arc;
use std::thread::{Builder, JoinHandle};

use tracing::{debug, error};
use workshop_scheduler::Scheduler;

use super::command::Command;
use super::listener::Stream;

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Spawns an agent for the accepted connection.
///
/// The agent has two cooperating halves sharing the socket: the spawned
/// thread reads and executes commands, and an inner forwarder thread
/// delivers scheduler events back to the client. They meet again only at
/// teardown, which the reading half drives.
pub(crate) fn spawn(
    stream: Stream, scheduler: Arc<Scheduler>, number: usize,
) -> io::Result<JoinHandle<()>> {
    Builder::new()
        .name(format!("workshop/agent/{number}"))
        .spawn(move || serve(stream, &scheduler))
}

/// Serves one connection until the client quits or hangs up.
///
/// Teardown is two-phase: disconnecting releases the customer's scheduler
/// footprint and unblocks the forwarder, and only after the forwarder has
/// been joined is the arena slot itself released for reuse.
fn serve(mut stream: Stream, scheduler: &Arc<Scheduler>) {
    // Reject the connection silently when the customer arena is full
    let Ok((handle, id)) = scheduler.connect() else {
        debug!("connection rejected, arena is full");
        return;
    };

    let forwarder = stream
        .try_clone()
        .and_then(|stream| spawn_forwarder(stream, scheduler, handle, id));

    // Read and execute commands until the session ends
    if let Ok(reader) = stream.try_clone() {
        let reader = BufReader::new(reader);
        for line in reader.lines() {
            let Ok(line) = line else { break };
            match Command::parse(&line) {
                Some(Command::Request(duration)) => {
                    if scheduler.request(handle, duration).is_err() {
                        break;
                    }
                }
                Some(Command::Rest) => {
                    if scheduler.rest(handle).is_err() {
                        break;
                    }
                }
                Some(Command::Report) => {
                    // The snapshot is taken under the scheduler mutex, the
                    // write happens outside of it
                    let Ok(report) = scheduler.report() else { break };
                    if write!(stream, "{report}").is_err() {
                        break;
                    }
                }
                Some(Command::Quit) => break,
                None => {}
            }
        }
    }

    if let Err(err) = scheduler.disconnect(handle) {
        error!(customer = id, "disconnect failed: {err}");
    }
    if let Ok(forwarder) = forwarder {
        let _ = forwarder.join();
    }
    if let Err(err) = scheduler.remove(handle) {
        error!(customer = id, "release failed: {err}");
    }
}

/// Spawns the event forwarder half of an agent.
fn spawn_forwarder(
    mut stream: Stream, scheduler: &Arc<Scheduler>, handle: usize, id: u64,
) -> io::Result<JoinHandle<()>> {
    let scheduler = Arc::clone(scheduler);
    Builder::new()
        .name(format!("workshop/agent/{id}/events"))
        .spawn(move || {
            while let Some(event) = scheduler.next_event(handle) {
                if writeln!(stream, "{event}").is_err() {
                    break;
                }
            }
        })
}
