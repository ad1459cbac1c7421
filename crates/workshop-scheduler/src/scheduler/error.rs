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

//! Error and result types.

use thiserror::Error;

// ----------------------------------------------------------------------------
// Enumerations
// ----------------------------------------------------------------------------

/// Error.
#[derive(Debug, Error)]
pub enum Error {
    /// Customer table is at capacity.
    ///
    /// The server rejects the connection that hit the limit; the scheduler
    /// itself remains fully operational.
    #[error("customer table at capacity")]
    Capacity,

    /// Scheduler state is poisoned.
    ///
    /// A thread panicked inside a critical section, so the state can no
    /// longer be trusted. There is no recovery.
    #[error("scheduler state poisoned")]
    Poisoned,

    /// Waiting queue rejected an operation.
    ///
    /// The queue and the customer status are kept in lockstep, so this
    /// denotes a scheduler bug, not a recoverable condition.
    #[error(transparent)]
    Heap(#[from] workshop_heap::Error),
}

// ----------------------------------------------------------------------------
// Type definitions
// ----------------------------------------------------------------------------

/// Result with error.
pub type Result<T = ()> = std::result::Result<T, Error>;
