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

//! Extraction of IPv4 addresses from response messages.

use std::fmt;
use std::net::Ipv4Addr;

use log::debug;

use super::reader::{self, Reader};
use super::Rcode;

/// Reads the answer section of the response in `octets` and returns
/// the addresses of its A records, in the order they appear.
///
/// `question_len` is the length of the question section sent in the
/// query; the answer section is taken to begin that many octets after
/// the header. Records of other types (such as the CNAMEs leading to
/// the address records) are stepped over using their RDLENGTH.
/// Duplicate addresses are kept.
///
/// A response with a nonzero RCODE fails with [`Error::QueryFailed`]
/// before anything past the header is read.
pub fn extract_addresses(octets: &[u8], question_len: usize) -> Result<Vec<Ipv4Addr>, Error> {
    let mut reader = Reader::try_from(octets)?;
    let header = *reader.header();
    if header.rcode != Rcode::NoError {
        return Err(Error::QueryFailed(header.rcode));
    }
    reader.skip(question_len)?;

    let mut addresses = Vec::new();
    for _ in 0..header.ancount {
        let rr = reader.read_rr()?;
        match rr.ipv4_address()? {
            Some(address) => addresses.push(address),
            None => debug!(
                "Skipping {} {} record for {}.",
                rr.class, rr.rr_type, rr.owner
            ),
        }
    }
    Ok(addresses)
}

////////////////////////////////////////////////////////////////////////
// ERRORS                                                             //
////////////////////////////////////////////////////////////////////////

/// An error signaling that addresses could not be extracted from a
/// response.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Error {
    /// The response was cut short or otherwise malformed.
    Malformed(reader::Error),

    /// The response was well-formed but carried a nonzero RCODE.
    QueryFailed(Rcode),
}

impl From<reader::Error> for Error {
    fn from(err: reader::Error) -> Self {
        Self::Malformed(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Self::Malformed(err) => write!(f, "malformed response: {}", err),
            Self::QueryFailed(rcode) => write!(f, "query failed with RCODE {}", rcode),
        }
    }
}

impl std::error::Error for Error {}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name;

    /// A response to example.com. IN A with two address records, both
    /// with owners compressed to point at the QNAME.
    const TWO_ADDRESSES: &[u8] =
        b"\x12\x34\x81\x80\x00\x01\x00\x02\x00\x00\x00\x00\
          \x07example\x03com\x00\x00\x01\x00\x01\
          \xc0\x0c\x00\x01\x00\x01\x00\x00\x0e\x10\x00\x04\x5d\xb8\xd8\x22\
          \xc0\x0c\x00\x01\x00\x01\x00\x00\x0e\x10\x00\x04\x5d\xb8\xd8\x23";

    /// A response to www.example.com. IN A where the answer section
    /// starts with a CNAME to example.com.
    const CNAME_THEN_ADDRESS: &[u8] =
        b"\xab\xcd\x81\x80\x00\x01\x00\x02\x00\x00\x00\x00\
          \x03www\x07example\x03com\x00\x00\x01\x00\x01\
          \xc0\x0c\x00\x05\x00\x01\x00\x00\x01\x2c\x00\x02\xc0\x10\
          \xc0\x10\x00\x01\x00\x01\x00\x00\x01\x2c\x00\x04\x5d\xb8\xd8\x22";

    /// The NXDOMAIN response to nonexistent.example. IN A.
    const NXDOMAIN: &[u8] =
        b"\x00\x07\x81\x83\x00\x01\x00\x00\x00\x00\x00\x00\
          \x0bnonexistent\x07example\x00\x00\x01\x00\x01";

    #[test]
    fn extract_addresses_returns_answers_in_order() {
        assert_eq!(
            extract_addresses(TWO_ADDRESSES, 17),
            Ok(vec![
                Ipv4Addr::new(93, 184, 216, 34),
                Ipv4Addr::new(93, 184, 216, 35),
            ])
        );
    }

    #[test]
    fn extract_addresses_keeps_duplicates() {
        let mut message = TWO_ADDRESSES.to_vec();
        let last = message.len() - 1;
        message[last] = 0x22;
        assert_eq!(
            extract_addresses(&message, 17),
            Ok(vec![
                Ipv4Addr::new(93, 184, 216, 34),
                Ipv4Addr::new(93, 184, 216, 34),
            ])
        );
    }

    #[test]
    fn extract_addresses_skips_other_types() {
        assert_eq!(
            extract_addresses(CNAME_THEN_ADDRESS, 21),
            Ok(vec![Ipv4Addr::new(93, 184, 216, 34)])
        );
    }

    #[test]
    fn extract_addresses_does_not_filter_on_class() {
        let mut message = TWO_ADDRESSES.to_vec();
        message[34] = 3;
        assert_eq!(
            extract_addresses(&message, 17),
            Ok(vec![
                Ipv4Addr::new(93, 184, 216, 34),
                Ipv4Addr::new(93, 184, 216, 35),
            ])
        );
    }

    #[test]
    fn extract_addresses_reports_rcode() {
        assert_eq!(
            extract_addresses(NXDOMAIN, 25),
            Err(Error::QueryFailed(Rcode::NxDomain))
        );
    }

    #[test]
    fn extract_addresses_rejects_truncated_messages() {
        assert_eq!(
            extract_addresses(&TWO_ADDRESSES[..8], 17),
            Err(Error::Malformed(reader::Error::HeaderTooShort))
        );
        assert_eq!(
            extract_addresses(&TWO_ADDRESSES[..20], 17),
            Err(Error::Malformed(reader::Error::UnexpectedEomInField))
        );
        assert_eq!(
            extract_addresses(&TWO_ADDRESSES[..TWO_ADDRESSES.len() - 1], 17),
            Err(Error::Malformed(reader::Error::UnexpectedEomInRdata))
        );
        assert_eq!(
            extract_addresses(&TWO_ADDRESSES[..29], 17),
            Err(Error::Malformed(reader::Error::InvalidOwner(
                name::Error::UnexpectedEom
            )))
        );
    }

    #[test]
    fn extract_addresses_rejects_answer_count_past_end() {
        let mut message = TWO_ADDRESSES.to_vec();
        message[7] = 3;
        assert_eq!(
            extract_addresses(&message, 17),
            Err(Error::Malformed(reader::Error::InvalidOwner(
                name::Error::UnexpectedEom
            )))
        );
    }

    #[test]
    fn extract_addresses_rejects_short_address_rdata() {
        let mut message = TWO_ADDRESSES[..44].to_vec();
        message[7] = 1;
        message[40] = 3;
        assert_eq!(
            extract_addresses(&message, 17),
            Err(Error::Malformed(reader::Error::InvalidAddressRdata))
        );
    }

    #[test]
    fn extract_addresses_is_idempotent() {
        let first = extract_addresses(CNAME_THEN_ADDRESS, 21);
        let second = extract_addresses(CNAME_THEN_ADDRESS, 21);
        assert!(first.is_ok());
        assert_eq!(first, second);
    }
}
