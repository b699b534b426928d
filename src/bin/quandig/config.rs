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

//! Implements the configuration file and its merging with the command
//! line.

use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use log::debug;
use serde::Deserialize;

use crate::args::Args;

/// The port DNS servers listen on.
const DEFAULT_PORT: u16 = 53;

////////////////////////////////////////////////////////////////////////
// CONFIGURATION LOADING                                              //
////////////////////////////////////////////////////////////////////////

/// The settings for one run, merged from the command line and the
/// optional configuration file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub hostname: String,
    pub server: SocketAddr,
    pub timeout: Option<Duration>,
}

/// Builds the [`Config`] from the parsed command line arguments,
/// reading the configuration file if one was given. Values on the
/// command line take precedence over values from the file.
pub fn load(args: Args) -> Result<Config> {
    let file = match args.config {
        Some(ref path) => load_file(path)?,
        None => FileConfig::default(),
    };
    let config = merge(args, file);
    debug!(
        "Configuration loaded:\n\
         Host name: {}\n\
         Server:    {}\n\
         Timeout:   {}",
        config.hostname,
        config.server,
        config.timeout.map_or_else(
            || "none".to_owned(),
            |timeout| format!("{}s", timeout.as_secs())
        ),
    );
    Ok(config)
}

/// Reads and parses the configuration file at `path`.
fn load_file(path: &Path) -> Result<FileConfig> {
    debug!("Loading the configuration from {}.", path.display());
    let raw_config = fs::read(path).context("failed to read the configuration file")?;
    toml::from_slice(&raw_config).context("failed to parse the configuration file")
}

/// Merges the command line with the configuration file. A timeout of
/// zero seconds means no timeout.
fn merge(args: Args, file: FileConfig) -> Config {
    let port = args
        .server
        .port
        .or(args.port)
        .or(file.port)
        .unwrap_or(DEFAULT_PORT);
    let timeout = args
        .timeout
        .or(file.timeout)
        .filter(|&secs| secs > 0)
        .map(Duration::from_secs);
    Config {
        hostname: args.hostname,
        server: SocketAddr::new(args.server.ip, port),
        timeout,
    }
}

////////////////////////////////////////////////////////////////////////
// CONFIGURATION FILE STRUCTURE                                       //
////////////////////////////////////////////////////////////////////////

/// The contents of the configuration file. Every setting is optional:
///
/// ```toml
/// port = 5353
/// timeout = 5
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    /// The server port, used when none is given on the command line.
    port: Option<u16>,

    /// Seconds to wait for a response.
    timeout: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["quandig", "example.com", "192.0.2.53"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn merge_uses_defaults() {
        let config = merge(args(&[]), FileConfig::default());
        assert_eq!(config.hostname, "example.com");
        assert_eq!(config.server, "192.0.2.53:53".parse().unwrap());
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn merge_prefers_command_line() {
        let file: FileConfig = toml::from_str("port = 5300\ntimeout = 9").unwrap();
        let config = merge(args(&["--port", "5353", "--timeout", "2"]), file);
        assert_eq!(config.server.port(), 5353);
        assert_eq!(config.timeout, Some(Duration::from_secs(2)));
    }

    #[test]
    fn merge_prefers_port_given_with_server() {
        let argv = ["quandig", "example.com", "192.0.2.53:1053", "--port", "5353"];
        let config = merge(Args::try_parse_from(argv).unwrap(), FileConfig::default());
        assert_eq!(config.server.port(), 1053);
    }

    #[test]
    fn merge_falls_back_to_file() {
        let file: FileConfig = toml::from_str("port = 5300\ntimeout = 9").unwrap();
        let config = merge(args(&[]), file);
        assert_eq!(config.server.port(), 5300);
        assert_eq!(config.timeout, Some(Duration::from_secs(9)));
    }

    #[test]
    fn zero_timeout_means_none() {
        let config = merge(args(&["--timeout", "0"]), FileConfig::default());
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn file_config_rejects_unknown_keys() {
        assert!(toml::from_str::<FileConfig>("retries = 3").is_err());
    }
}
