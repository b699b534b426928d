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

use std::io;
use std::net::{self, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;

use log::debug;

use super::Transport;

/// A UDP transport using the Rust standard library.
///
/// By default, [`recv`](Transport::recv) blocks until a datagram
/// arrives. Use [`UdpTransport::set_read_timeout`] to bound the wait.
#[derive(Debug)]
pub struct UdpTransport(net::UdpSocket);

impl UdpTransport {
    /// Binds a socket to an ephemeral port on the unspecified address
    /// of the same family as `server`.
    pub fn bind_for(server: SocketAddr) -> io::Result<Self> {
        let local = match server {
            SocketAddr::V4(_) => SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)),
            SocketAddr::V6(_) => SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0)),
        };
        let socket = net::UdpSocket::bind(local)?;
        debug!("Bound UDP socket to {}.", socket.local_addr()?);
        Ok(Self(socket))
    }

    /// Sets the read timeout of the socket. `None` blocks forever.
    pub fn set_read_timeout(&self, timeout: Option<Duration>) -> io::Result<()> {
        self.0.set_read_timeout(timeout)
    }
}

impl Transport for UdpTransport {
    fn send(&mut self, datagram: &[u8], dest: SocketAddr) -> io::Result<usize> {
        self.0.send_to(datagram, dest)
    }

    fn recv(&mut self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)> {
        self.0.recv_from(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn udp_transport_exchanges_datagrams_over_loopback() {
        let server = net::UdpSocket::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
        let server_addr = server.local_addr().unwrap();
        let mut transport = UdpTransport::bind_for(server_addr).unwrap();
        transport
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();
        server
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();

        assert_eq!(transport.send(b"ping", server_addr).unwrap(), 4);
        let mut buf = [0; 16];
        let (len, client_addr) = server.recv_from(&mut buf).unwrap();
        assert_eq!(&buf[..len], b"ping");

        server.send_to(b"pong", client_addr).unwrap();
        let (len, from) = transport.recv(&mut buf).unwrap();
        assert_eq!(&buf[..len], b"pong");
        assert_eq!(from, server_addr);
    }
}
