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

//! Construction of query messages.

use log::trace;

use super::writer::{self, Writer};
use super::{Opcode, Question};
use crate::name::Name;

/// Serializes a standard recursive query for the IPv4 addresses of
/// `qname` into `octets`, using the transaction ID `id`.
///
/// The header has RD set, one question, and everything else zeroed.
/// The question asks for `IN A`. Returns the length of the message,
/// which occupies the start of `octets`. The only failure is a buffer
/// too small to hold the message.
pub fn build_query(octets: &mut [u8], qname: &Name, id: u16) -> Result<usize, writer::Error> {
    let mut writer = Writer::try_from(octets)?;
    writer.set_id(id);
    writer.set_opcode(Opcode::Query);
    writer.set_rd(true);
    writer.add_question(&Question::address(qname.clone()))?;
    let len = writer.finish();
    trace!("Built {}-octet query {:#06x} for {}.", len, id, qname);
    Ok(len)
}
