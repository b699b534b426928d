// Copyright 2022 Matthew Ingwersen.
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

//! Datagram transports for sending queries.
//!
//! The codec in [`message`](crate::message) works on byte buffers and
//! knows nothing about the network. A [`Transport`] moves those
//! buffers: it sends one datagram to the server and receives one
//! datagram back. [`UdpTransport`] is the real implementation, over a
//! standard library UDP socket.

mod udp;

use std::io;
use std::net::SocketAddr;

pub use udp::UdpTransport;

/// The API a datagram transport must implement.
///
/// UDP semantics are assumed: each successful [`recv`](Transport::recv)
/// yields exactly one complete datagram (which, for DNS, may be a
/// truncated message with the TC bit set).
pub trait Transport {
    /// Sends `datagram` to `dest`, returning the number of octets
    /// sent.
    fn send(&mut self, datagram: &[u8], dest: SocketAddr) -> io::Result<usize>;

    /// Receives a datagram into `buf`, returning its length and the
    /// address it came from.
    fn recv(&mut self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)>;
}
