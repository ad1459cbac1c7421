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

//! Client command.

// ----------------------------------------------------------------------------
// Enumerations
// ----------------------------------------------------------------------------

/// Client command.
///
/// One line of the wire protocol. Verbs are case-sensitive and
/// whitespace-delimited; anything that does not parse is silently ignored
/// by the agent, including requests with non-positive durations.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Command {
    /// Request service for the given duration in milliseconds.
    Request(u64),
    /// Stop using or waiting, become idle.
    Rest,
    /// Request a status snapshot.
    Report,
    /// Close the session.
    Quit,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Command {
    /// Parses a protocol line, returning [`None`] for anything malformed.
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        match parts.next()? {
            "REQUEST" => parts
                .next()?
                .parse::<u64>()
                .ok()
                .filter(|&duration| duration > 0)
                .map(Self::Request),
            "REST" => Some(Self::Rest),
            "REPORT" => Some(Self::Report),
            "QUIT" => Some(Self::Quit),
            _ => None,
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {

    mod parse {
        use crate::server::command::Command;

        #[test]
        fn handles_verbs() {
            for (line, check) in [
                ("REQUEST 500", Some(Command::Request(500))),
                ("REST", Some(Command::Rest)),
                ("REPORT", Some(Command::Report)),
                ("QUIT", Some(Command::Quit)),
            ] {
                assert_eq!(Command::parse(line), check);
            }
        }

        #[test]
        fn handles_whitespace() {
            assert_eq!(
                Command::parse("  REQUEST \t 42 \r"),
                Some(Command::Request(42))
            );
        }

        #[test]
        fn ignores_unknown_verbs() {
            for line in ["", "request 500", "NOOP", "Quit"] {
                assert_eq!(Command::parse(line), None);
            }
        }

        #[test]
        fn ignores_invalid_durations() {
            for line in
                ["REQUEST", "REQUEST 0", "REQUEST -5", "REQUEST soon"]
            {
                assert_eq!(Command::parse(line), None);
            }
        }
    }
}
