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

//! Implements command-line argument parsing.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::anyhow;
use clap::Parser;

/// Parses the command line arguments.
pub fn parse() -> Args {
    Args::parse()
}

/// Look up the IPv4 addresses of a host name
#[derive(Debug, Parser)]
#[clap(author, version)]
pub struct Args {
    /// The host name to look up
    #[clap(value_name = "HOSTNAME")]
    pub hostname: String,

    /// The DNS server to query
    #[clap(value_name = "IP|IP:PORT", value_parser)]
    pub server: ServerDescription,

    /// Set the server port (if not given with the server)
    #[clap(long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Give up after waiting this many seconds for a response
    #[clap(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Set the configuration file to use
    #[clap(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// A description of the server provided on the command line. This is
/// parsed with its [`FromStr`] implementation and accepts either a
/// bare IP address or a socket address with a port:
///
/// * `192.0.2.53`
/// * `192.0.2.53:5353`
/// * `[2001:db8::53]:5353`
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ServerDescription {
    pub ip: IpAddr,
    pub port: Option<u16>,
}

impl FromStr for ServerDescription {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(ip) = s.parse::<IpAddr>() {
            Ok(Self { ip, port: None })
        } else if let Ok(addr) = s.parse::<SocketAddr>() {
            Ok(Self {
                ip: addr.ip(),
                port: Some(addr.port()),
            })
        } else {
            Err(anyhow!(
                "the server must be an IP address, optionally with a port"
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn args_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn args_parse_positionals() {
        let args = Args::try_parse_from(["quandig", "example.com", "192.0.2.53"]).unwrap();
        assert_eq!(args.hostname, "example.com");
        assert_eq!(args.server.ip, "192.0.2.53".parse::<IpAddr>().unwrap());
        assert_eq!(args.server.port, None);
        assert!(Args::try_parse_from(["quandig", "example.com"]).is_err());
    }

    #[test]
    fn server_description_accepts_ports() {
        let v4: ServerDescription = "192.0.2.53:5353".parse().unwrap();
        assert_eq!(v4.port, Some(5353));
        let v6: ServerDescription = "[2001:db8::53]:53".parse().unwrap();
        assert_eq!(v6.ip, "2001:db8::53".parse::<IpAddr>().unwrap());
        assert_eq!(v6.port, Some(53));
        let bare_v6: ServerDescription = "2001:db8::53".parse().unwrap();
        assert_eq!(bare_v6.port, None);
    }

    #[test]
    fn server_description_rejects_host_names() {
        assert!("dns.example".parse::<ServerDescription>().is_err());
    }
}
