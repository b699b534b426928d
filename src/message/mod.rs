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

//! Implementation of reading and writing of DNS messages.
//!
//! [`Writer`] and [`Reader`] are general frames around message
//! buffers. On top of them, [`build_query`] assembles the one kind of
//! message a stub resolver sends, and [`extract_addresses`] pulls the
//! IPv4 addresses out of the reply.

pub mod answer;
mod constants;
mod header;
mod opcode;
mod query;
mod question;
mod rcode;
pub mod reader;
pub mod writer;
pub use answer::extract_addresses;
pub use constants::{HEADER_SIZE, MAX_MESSAGE_SIZE};
pub use header::Header;
pub use opcode::Opcode;
pub use query::build_query;
pub use question::{Qclass, Qtype, Question};
pub use rcode::Rcode;
pub use reader::Reader;
pub use writer::Writer;
