// Copyright 2021 Matthew Ingwersen.
//
// Licensed under the Apache License, Version 2.0 (the "License"); you
// may not use this file except in compliance with the License. You may
// obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or
// implied. See the License for the specific language governing
// permissions and limitations under the License.

//! Implementation of a single address lookup.
//!
//! A [`Resolver`] performs the whole exchange for one name: it encodes
//! the name, builds a query with a fresh transaction ID, sends it over
//! its [`Transport`], waits for exactly one reply, and extracts the
//! addresses. Nothing is retried and nothing is cached; every failure
//! is returned to the caller as an [`Error`].

use std::fmt;
use std::io;
use std::net::{Ipv4Addr, SocketAddr};

use log::{debug, warn};

use crate::io::Transport;
use crate::message::{self, answer, reader, Question, Rcode, Reader};
use crate::name::{self, Name};

////////////////////////////////////////////////////////////////////////
// RESOLVER                                                           //
////////////////////////////////////////////////////////////////////////

/// A stub resolver that sends its queries to a single server.
#[derive(Debug)]
pub struct Resolver<T> {
    transport: T,
    server: SocketAddr,
}

impl<T: Transport> Resolver<T> {
    /// Creates a new `Resolver` that queries `server` over
    /// `transport`.
    pub fn new(transport: T, server: SocketAddr) -> Self {
        Self { transport, server }
    }

    /// Looks up the IPv4 addresses of `host`, given in textual form.
    /// The transaction ID is chosen at random.
    pub fn lookup_a(&mut self, host: &str) -> Result<Vec<Ipv4Addr>> {
        let qname: Name = host.parse()?;
        self.query(&qname, rand::random())
    }

    /// Looks up the IPv4 addresses of `qname` using the transaction ID
    /// `id`. The addresses are returned in the order the server gave
    /// them.
    pub fn query(&mut self, qname: &Name, id: u16) -> Result<Vec<Ipv4Addr>> {
        // The same buffer holds the query and then the response.
        let mut buf = vec![0; message::MAX_MESSAGE_SIZE];
        // The only way the query can fail to fit is a name too long
        // for the message.
        let query_len = message::build_query(&mut buf, qname, id)
            .map_err(|_| Error::InvalidName(name::Error::NameTooLong))?;
        let question_len = Question::address(qname.clone()).wire_len();

        let sent = self.transport.send(&buf[..query_len], self.server)?;
        debug!(
            "Sent {}-octet query {:#06x} for {} to {}.",
            sent, id, qname, self.server
        );

        let (len, from) = self.transport.recv(&mut buf)?;
        debug!("Received {}-octet response from {}.", len, from);
        let response = &buf[..len];

        let header = *Reader::try_from(response)?.header();
        if !header.qr || header.id != id {
            return Err(Error::UnexpectedResponse {
                expected_id: id,
                received_id: header.id,
            });
        }
        if header.tc {
            warn!(
                "The response from {} for {} was truncated; some addresses may be missing.",
                from, qname
            );
        }

        Ok(message::extract_addresses(response, question_len)?)
    }
}

////////////////////////////////////////////////////////////////////////
// ERRORS                                                             //
////////////////////////////////////////////////////////////////////////

/// An error signaling that a lookup failed.
#[derive(Debug)]
pub enum Error {
    /// The name to look up could not be encoded.
    InvalidName(name::Error),

    /// The response could not be decoded.
    MalformedMessage(reader::Error),

    /// The response was well-formed but reported failure through its
    /// RCODE (e.g. NXDOMAIN).
    QueryFailed(Rcode),

    /// The datagram received was not a response to our query.
    UnexpectedResponse { expected_id: u16, received_id: u16 },

    /// Sending or receiving failed.
    Transport(io::Error),
}

impl From<name::Error> for Error {
    fn from(err: name::Error) -> Self {
        Self::InvalidName(err)
    }
}

impl From<reader::Error> for Error {
    fn from(err: reader::Error) -> Self {
        Self::MalformedMessage(err)
    }
}

impl From<answer::Error> for Error {
    fn from(err: answer::Error) -> Self {
        match err {
            answer::Error::Malformed(err) => Self::MalformedMessage(err),
            answer::Error::QueryFailed(rcode) => Self::QueryFailed(rcode),
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Transport(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidName(err) => write!(f, "invalid name: {}", err),
            Self::MalformedMessage(err) => write!(f, "malformed response: {}", err),
            Self::QueryFailed(rcode) => write!(f, "query failed with RCODE {}", rcode),
            Self::UnexpectedResponse {
                expected_id,
                received_id,
            } => write!(
                f,
                "unexpected response (expected ID {:#06x}, received {:#06x})",
                expected_id, received_id
            ),
            Self::Transport(err) => write!(f, "transport error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidName(err) => Some(err),
            Self::MalformedMessage(err) => Some(err),
            Self::Transport(err) => Some(err),
            Self::QueryFailed(_) | Self::UnexpectedResponse { .. } => None,
        }
    }
}

/// The type returned by fallible [`Resolver`] methods.
pub type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////
