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

//! Server.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{info, warn};
use workshop_scheduler::{Config, Scheduler};

mod agent;
mod command;
mod error;
mod listener;
mod runner;

pub use error::{Error, Result};
pub use listener::Endpoint;

use listener::Listener;

// ----------------------------------------------------------------------------
// Constants
// ----------------------------------------------------------------------------

/// Pause between accept polls while the listener is idle.
const POLL: Duration = Duration::from_millis(50);

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Server.
///
/// Binds the endpoint, spawns one runner per tool, and then accepts
/// connections until a termination signal arrives, handing each connection
/// to a fresh agent. The listener polls non-blockingly so the shutdown flag
/// is observed promptly.
///
/// Shutdown is cooperative: the signal handler flips the flag and tells the
/// scheduler, which wakes idle runners out of their waits. The listener is
/// dropped - unlinking a local socket path - runners are joined first, and
/// agents last, as they only exit once their clients hang up.
#[derive(Debug)]
pub struct Server {
    /// Listening endpoint.
    endpoint: Endpoint,
    /// Scheduler configuration.
    config: Config,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Server {
    /// Creates a server.
    ///
    /// # Examples
    ///
    /// ```
    /// use workshop_scheduler::Config;
    /// use workshop_server::{Endpoint, Server};
    ///
    /// // Create server
    /// let endpoint = "127.0.0.1:4000".parse::<Endpoint>()?;
    /// let server = Server::new(endpoint, Config::new(100, 500, 2));
    /// # Ok::<(), workshop_server::Error>(())
    /// ```
    #[must_use]
    pub fn new(endpoint: Endpoint, config: Config) -> Self {
        Self { endpoint, config }
    }

    /// Runs the server until a termination signal arrives.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::Io`] if the endpoint cannot be bound,
    /// [`Error::Signal`] if the signal handler cannot be installed, and
    /// forwards scheduler and thread creation failures.
    pub fn run(&self) -> Result {
        let scheduler = Arc::new(Scheduler::new(self.config));
        let closing = Arc::new(AtomicBool::new(false));

        // Install the signal handler driving cooperative shutdown
        {
            let scheduler = Arc::clone(&scheduler);
            let closing = Arc::clone(&closing);
            ctrlc::set_handler(move || {
                closing.store(true, Ordering::Release);
                scheduler.shutdown();
            })?;
        }

        let listener = Listener::bind(&self.endpoint)?;
        listener.set_nonblocking(true)?;
        info!(endpoint = %self.endpoint, "listening");

        // Spawn one runner per tool
        let mut runners = Vec::with_capacity(self.config.tools);
        for tool in 0..self.config.tools {
            runners.push(runner::spawn(Arc::clone(&scheduler), tool)?);
        }

        // Accept connections until shutdown, handing each to a fresh agent
        let mut agents = Vec::new();
        let mut sequence = 0;
        while !closing.load(Ordering::Acquire) {
            match listener.accept() {
                Ok(stream) => {
                    sequence += 1;
                    agents.retain(|agent: &thread::JoinHandle<()>| {
                        !agent.is_finished()
                    });
                    agents.push(agent::spawn(
                        stream,
                        Arc::clone(&scheduler),
                        sequence,
                    )?);
                }
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => {
                    thread::sleep(POLL);
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => warn!("accept failed: {err}"),
            }
        }

        // Stop accepting and unlink a local socket path
        drop(listener);
        scheduler.shutdown();

        // Reap runners first, then agents, which exit with their clients
        for runner in runners {
            let _ = runner.join();
        }
        for agent in agents {
            let _ = agent.join();
        }

        info!("server stopped");
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
