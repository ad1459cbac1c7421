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

//! Listener and endpoint.

use std::fmt;
use std::fs;
use std::io::{self, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::PathBuf;
use std::str::FromStr;

use super::error::Error;

// ----------------------------------------------------------------------------
// Enumerations
// ----------------------------------------------------------------------------

/// Endpoint.
///
/// A listening address, parsed from its textual form: `@<path>` denotes a
/// local stream socket at the given filesystem path, and anything containing
/// a colon denotes a TCP `<host>:<port>` address.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Endpoint {
    /// Local stream socket at a filesystem path.
    Local(PathBuf),
    /// TCP address in `<host>:<port>` form.
    Tcp(String),
}

/// Listener.
///
/// Binds one of both endpoint flavors behind a common accept surface. A
/// local socket path is unlinked before binding, so a stale socket from an
/// earlier run cannot block startup, and unlinked again when the listener
/// is dropped.
#[derive(Debug)]
pub(crate) enum Listener {
    /// Local stream socket listener.
    Local(UnixListener, PathBuf),
    /// TCP listener.
    Tcp(TcpListener),
}

/// Stream.
///
/// One accepted connection, owned by its agent. Cloning the underlying
/// socket allows the agent's two halves to read and write independently.
#[derive(Debug)]
pub(crate) enum Stream {
    /// Local stream socket.
    Local(UnixStream),
    /// TCP stream.
    Tcp(TcpStream),
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Listener {
    /// Binds a listener for the given endpoint.
    pub fn bind(endpoint: &Endpoint) -> io::Result<Self> {
        match endpoint {
            Endpoint::Local(path) => {
                let _ = fs::remove_file(path);
                let listener = UnixListener::bind(path)?;
                Ok(Self::Local(listener, path.clone()))
            }
            Endpoint::Tcp(addr) => {
                let listener = TcpListener::bind(addr.as_str())?;
                Ok(Self::Tcp(listener))
            }
        }
    }

    /// Moves the listener in or out of non-blocking mode.
    pub fn set_nonblocking(&self, nonblocking: bool) -> io::Result<()> {
        match self {
            Self::Local(listener, _) => listener.set_nonblocking(nonblocking),
            Self::Tcp(listener) => listener.set_nonblocking(nonblocking),
        }
    }

    /// Accepts the next connection.
    ///
    /// The accepted stream is always returned in blocking mode, regardless
    /// of the listener's own mode.
    pub fn accept(&self) -> io::Result<Stream> {
        let stream = match self {
            Self::Local(listener, _) => {
                let (stream, _) = listener.accept()?;
                Stream::Local(stream)
            }
            Self::Tcp(listener) => {
                let (stream, _) = listener.accept()?;
                Stream::Tcp(stream)
            }
        };
        stream.set_nonblocking(false)?;
        Ok(stream)
    }
}

impl Stream {
    /// Clones the stream, sharing the underlying socket.
    pub fn try_clone(&self) -> io::Result<Self> {
        match self {
            Self::Local(stream) => stream.try_clone().map(Self::Local),
            Self::Tcp(stream) => stream.try_clone().map(Self::Tcp),
        }
    }

    /// Moves the stream in or out of non-blocking mode.
    fn set_nonblocking(&self, nonblocking: bool) -> io::Result<()> {
        match self {
            Self::Local(stream) => stream.set_nonblocking(nonblocking),
            Self::Tcp(stream) => stream.set_nonblocking(nonblocking),
        }
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl FromStr for Endpoint {
    type Err = Error;

    /// Parses an endpoint from its textual form.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::Endpoint`] if the value is neither a
    /// `@<path>` local socket nor a `<host>:<port>` address.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if let Some(path) = value.strip_prefix('@') {
            if path.is_empty() {
                return Err(Error::Endpoint(value.into()));
            }
            Ok(Self::Local(PathBuf::from(path)))
        } else if value.contains(':') {
            Ok(Self::Tcp(value.into()))
        } else {
            Err(Error::Endpoint(value.into()))
        }
    }
}

impl fmt::Display for Endpoint {
    /// Formats the endpoint in its textual form.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Local(path) => write!(f, "@{}", path.display()),
            Self::Tcp(addr) => f.write_str(addr),
        }
    }
}

// ----------------------------------------------------------------------------

impl Drop for Listener {
    /// Unlinks the socket path of a local listener.
    fn drop(&mut self) {
        if let Self::Local(_, path) = self {
            let _ = fs::remove_file(path);
        }
    }
}

// ----------------------------------------------------------------------------

impl Read for Stream {
    /// Reads from the underlying socket.
    #[inline]
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Local(stream) => stream.read(buf),
            Self::Tcp(stream) => stream.read(buf),
        }
    }
}

impl Write for Stream {
    /// Writes to the underlying socket.
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Local(stream) => stream.write(buf),
            Self::Tcp(stream) => stream.write(buf),
        }
    }

    /// Flushes the underlying socket.
    #[inline]
    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Local(stream) => stream.flush(),
            Self::Tcp(stream) => stream.flush(),
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
