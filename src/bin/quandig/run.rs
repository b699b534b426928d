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

//! Implements the lookup itself.

use std::fmt::Write;
use std::process;

use anyhow::{Context, Result};
use env_logger::Env;
use log::{error, info, log_enabled, Level};

use quandig::io::UdpTransport;
use quandig::resolver::Resolver;

use crate::args::Args;
use crate::config;

/// Runs the lookup, exiting with status 1 on failure.
pub fn run(args: Args) {
    env_logger::init_from_env(Env::new().default_filter_or("warn"));

    if let Err(e) = try_running(args) {
        let message = failure_message(&e);
        // The failure must reach stderr even when logging is filtered.
        if log_enabled!(Level::Error) {
            error!("{}", message);
        } else {
            eprintln!("{}", message);
        }
        process::exit(1);
    }
}

/// Formats `e` along with its chain of causes.
fn failure_message(e: &anyhow::Error) -> String {
    let mut message = String::from("Failed to resolve:");
    for (i, cause) in e.chain().enumerate() {
        write!(message, "\n[{}] {}", i + 1, cause).unwrap();
    }
    message
}

fn try_running(args: Args) -> Result<()> {
    let config = config::load(args).context("failed to load the configuration")?;

    let transport =
        UdpTransport::bind_for(config.server).context("failed to create the UDP socket")?;
    transport
        .set_read_timeout(config.timeout)
        .context("failed to set the receive timeout")?;
    let mut resolver = Resolver::new(transport, config.server);

    let addresses = resolver
        .lookup_a(&config.hostname)
        .with_context(|| format!("failed to look up {}", config.hostname))?;
    if addresses.is_empty() {
        info!("{} has no IPv4 addresses.", config.hostname);
    }
    for address in addresses {
        println!("{} resolved to {}", config.hostname, address);
    }
    Ok(())
}
