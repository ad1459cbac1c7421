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

//! Scheduling server binary.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use workshop_scheduler::Config;
use workshop_server::{Endpoint, Server};

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Share-based fair scheduling server for a pool of exclusive tools.
#[derive(Debug, Parser)]
#[command(name = "workshopd", version)]
struct Args {
    /// Endpoint: @<path> for a local socket, or <host>:<port> for TCP
    #[arg(value_name = "conn")]
    conn: Endpoint,

    /// Minimum protected quantum in milliseconds
    #[arg(value_name = "q", value_parser = clap::value_parser!(u64).range(1..))]
    q: u64,

    /// Maximum quantum in milliseconds
    #[arg(value_name = "Q", value_parser = clap::value_parser!(u64).range(1..))]
    quantum: u64,

    /// Number of tools, at most 100
    #[arg(value_name = "k", value_parser = clap::value_parser!(u64).range(1..=100))]
    k: u64,
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Entry point.
fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .init();

    let args = Args::parse();
    let tools = usize::try_from(args.k).expect("invariant");
    let config = Config::new(args.q, args.quantum, tools);

    let server = Server::new(args.conn, config);
    match server.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
