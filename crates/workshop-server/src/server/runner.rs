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

//! Tool runner.

use std::io;
use std::sync::Arc;
use std::thread::{self, Builder, JoinHandle};
use std::time::Duration;

use tracing::error;
use workshop_scheduler::Scheduler;

// ----------------------------------------------------------------------------
// Constants
// ----------------------------------------------------------------------------

/// Pause between runner ticks, outside the scheduler mutex.
///
/// This is the slack on enforcement of the maximum quantum: a holder may
/// overstay its welcome by at most one tick.
const TICK: Duration = Duration::from_millis(10);

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Spawns the runner thread for the given tool.
///
/// The runner drives the tool's service timer until the scheduler shuts
/// down, sleeping briefly between ticks to cap its CPU usage. When the tool
/// is unbound, the tick itself waits for new work instead.
pub(crate) fn spawn(
    scheduler: Arc<Scheduler>, tool: usize,
) -> io::Result<JoinHandle<()>> {
    Builder::new()
        .name(format!("workshop/tool/{tool}"))
        .spawn(move || run(&scheduler, tool))
}

/// Runs ticks for the given tool until shutdown.
fn run(scheduler: &Scheduler, tool: usize) {
    loop {
        match scheduler.tick(tool) {
            Ok(true) => thread::sleep(TICK),
            Ok(false) => break,
            Err(err) => {
                error!(tool, "runner failed: {err}");
                break;
            }
        }
    }
}
