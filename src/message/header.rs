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

//! Implementation of the [`Header`] type.

use super::constants::*;
use super::{Opcode, Rcode};

/// The fixed 12-octet header of a DNS message.
///
/// Defined in [RFC 1035 § 4.1.1] (with the AD and CD bits added by
/// [RFC 4035 § 3.2]), the header packs several one- and four-bit flags
/// into its third and fourth octets:
///
/// ```text
///   0  1  2  3  4  5  6  7  0  1  2  3  4  5  6  7
/// +--+-----------+--+--+--+--+--+--+--+-----------+
/// |QR|  OPCODE   |AA|TC|RD|RA| Z|AD|CD|   RCODE   |
/// +--+-----------+--+--+--+--+--+--+--+-----------+
/// ```
///
/// Each flag is a named field here; [`Header::from_octets`] and
/// [`Header::to_octets`] do the bit packing explicitly, so nothing
/// depends on in-memory layout. All multi-octet fields are big-endian
/// on the wire.
///
/// [RFC 1035 § 4.1.1]: https://datatracker.ietf.org/doc/html/rfc1035#section-4.1.1
/// [RFC 4035 § 3.2]: https://datatracker.ietf.org/doc/html/rfc4035#section-3.2
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Header {
    pub id: u16,
    pub qr: bool,
    pub opcode: Opcode,
    pub aa: bool,
    pub tc: bool,
    pub rd: bool,
    pub ra: bool,
    pub z: bool,
    pub ad: bool,
    pub cd: bool,
    pub rcode: Rcode,
    pub qdcount: u16,
    pub ancount: u16,
    pub nscount: u16,
    pub arcount: u16,
}

impl Header {
    /// Unpacks a header from its on-the-wire representation.
    pub fn from_octets(octets: &[u8; HEADER_SIZE]) -> Self {
        let read_u16 = |start: usize| u16::from_be_bytes([octets[start], octets[start + 1]]);
        Self {
            id: read_u16(ID_START),
            qr: octets[QR_BYTE] & QR_MASK != 0,
            opcode: Opcode::from_nibble((octets[OPCODE_BYTE] & OPCODE_MASK) >> OPCODE_SHIFT),
            aa: octets[AA_BYTE] & AA_MASK != 0,
            tc: octets[TC_BYTE] & TC_MASK != 0,
            rd: octets[RD_BYTE] & RD_MASK != 0,
            ra: octets[RA_BYTE] & RA_MASK != 0,
            z: octets[Z_BYTE] & Z_MASK != 0,
            ad: octets[AD_BYTE] & AD_MASK != 0,
            cd: octets[CD_BYTE] & CD_MASK != 0,
            rcode: Rcode::from_nibble(octets[RCODE_BYTE] & RCODE_MASK),
            qdcount: read_u16(QDCOUNT_START),
            ancount: read_u16(ANCOUNT_START),
            nscount: read_u16(NSCOUNT_START),
            arcount: read_u16(ARCOUNT_START),
        }
    }

    /// Packs the header into its on-the-wire representation.
    pub fn to_octets(&self) -> [u8; HEADER_SIZE] {
        let mut octets = [0; HEADER_SIZE];
        octets[ID_START..ID_END].copy_from_slice(&self.id.to_be_bytes());
        set_bit(&mut octets[QR_BYTE], QR_MASK, self.qr);
        octets[OPCODE_BYTE] |= (u8::from(self.opcode) << OPCODE_SHIFT) & OPCODE_MASK;
        set_bit(&mut octets[AA_BYTE], AA_MASK, self.aa);
        set_bit(&mut octets[TC_BYTE], TC_MASK, self.tc);
        set_bit(&mut octets[RD_BYTE], RD_MASK, self.rd);
        set_bit(&mut octets[RA_BYTE], RA_MASK, self.ra);
        set_bit(&mut octets[Z_BYTE], Z_MASK, self.z);
        set_bit(&mut octets[AD_BYTE], AD_MASK, self.ad);
        set_bit(&mut octets[CD_BYTE], CD_MASK, self.cd);
        octets[RCODE_BYTE] |= u8::from(self.rcode) & RCODE_MASK;
        octets[QDCOUNT_START..QDCOUNT_END].copy_from_slice(&self.qdcount.to_be_bytes());
        octets[ANCOUNT_START..ANCOUNT_END].copy_from_slice(&self.ancount.to_be_bytes());
        octets[NSCOUNT_START..NSCOUNT_END].copy_from_slice(&self.nscount.to_be_bytes());
        octets[ARCOUNT_START..ARCOUNT_END].copy_from_slice(&self.arcount.to_be_bytes());
        octets
    }
}

fn set_bit(octet: &mut u8, mask: u8, value: bool) {
    if value {
        *octet |= mask;
    } else {
        *octet &= !mask;
    }
}
