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

//! Implementation of the [`Reader`] type to read on-the-wire DNS
//! messages.

use std::fmt;
use std::net::Ipv4Addr;

use super::constants::*;
use super::{Header, Question};
use crate::class::Class;
use crate::name::{self, Name};
use crate::rr::{Ttl, Type};

////////////////////////////////////////////////////////////////////////
// READER                                                             //
////////////////////////////////////////////////////////////////////////

/// A "frame" around a buffer containing a DNS message that enables
/// reading the message data.
///
/// A `Reader` is constructed using its [`TryFrom`] implementation. Any
/// underlying buffer for a reader must contain at least a full DNS
/// message header of 12 octets; otherwise the construction will fail.
/// The header is unpacked at construction and available through
/// [`Reader::header`].
///
/// Questions and RRs are read using a cursor, which is initially set to
/// the first octet after the DNS header. [`Reader::read_question`],
/// [`Reader::skip`], and [`Reader::read_rr`] must be called
/// sequentially in the order the data appears in the message. Every
/// read is bounds-checked; the underlying buffer is never modified.
#[derive(Eq, PartialEq)]
pub struct Reader<'a> {
    octets: &'a [u8],
    header: Header,
    cursor: usize,
}

impl<'a> Reader<'a> {
    /// Returns the unpacked message header.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Reads a [`Question`] starting at the current cursor.
    ///
    /// This method is atomic, in that the cursor is not changed on
    /// failure.
    pub fn read_question(&mut self) -> Result<Question> {
        let (qname, qname_len) =
            Name::try_from_compressed(self.octets, self.cursor).map_err(Error::InvalidQname)?;
        let qname_end = self.cursor + qname_len;
        let qtype = read_u16(self.octets, qname_end)?.into();
        let qclass = read_u16(self.octets, qname_end + 2)?.into();
        self.cursor = qname_end + QUESTION_FIXED_SIZE;
        Ok(Question {
            qname,
            qtype,
            qclass,
        })
    }

    /// Advances the cursor by `len` octets without interpreting them.
    /// This is used to step over a question section whose length is
    /// already known. Fails, leaving the cursor unchanged, if fewer than
    /// `len` octets remain.
    pub fn skip(&mut self, len: usize) -> Result<()> {
        match self.cursor.checked_add(len) {
            Some(end) if end <= self.octets.len() => {
                self.cursor = end;
                Ok(())
            }
            _ => Err(Error::UnexpectedEomInField),
        }
    }

    /// Reads a resource record at the current cursor.
    ///
    /// This method is atomic, in that the cursor is not changed on
    /// failure. The owner is decompressed, but the RDATA is returned as
    /// a slice of the message without interpretation.
    pub fn read_rr(&mut self) -> Result<ReadRr<'a>> {
        let (owner, owner_len) =
            Name::try_from_compressed(self.octets, self.cursor).map_err(Error::InvalidOwner)?;
        let owner_end = self.cursor + owner_len;
        let rr_type = read_u16(self.octets, owner_end)?.into();
        let class = read_u16(self.octets, owner_end + 2)?.into();
        let ttl = read_u32(self.octets, owner_end + 4)?.into();
        let rdlength = read_u16(self.octets, owner_end + 8)? as usize;
        let rdata_start = owner_end + RR_FIXED_SIZE;
        let rdata = self
            .octets
            .get(rdata_start..rdata_start + rdlength)
            .ok_or(Error::UnexpectedEomInRdata)?;
        self.cursor = rdata_start + rdlength;
        Ok(ReadRr {
            owner,
            rr_type,
            class,
            ttl,
            rdata,
        })
    }
}

impl<'a> TryFrom<&'a [u8]> for Reader<'a> {
    type Error = Error;

    fn try_from(octets: &'a [u8]) -> Result<Self> {
        let header_octets = octets
            .get(..HEADER_SIZE)
            .and_then(|h| <&[u8; HEADER_SIZE]>::try_from(h).ok())
            .ok_or(Error::HeaderTooShort)?;
        Ok(Self {
            octets,
            header: Header::from_octets(header_octets),
            cursor: HEADER_SIZE,
        })
    }
}

impl fmt::Debug for Reader<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Reader")
            .field("header", &self.header)
            .field("len", &self.octets.len())
            .field("cursor", &self.cursor)
            .finish()
    }
}

////////////////////////////////////////////////////////////////////////
// HELPERS FOR READING MULTI-BYTE INTEGERS                            //
////////////////////////////////////////////////////////////////////////

/// Reads a network-byte-order `u16` at `index` of `octets`.
fn read_u16(octets: &[u8], index: usize) -> Result<u16> {
    match octets.get(index..index + 2) {
        Some(&[a, b]) => Ok(u16::from_be_bytes([a, b])),
        _ => Err(Error::UnexpectedEomInField),
    }
}

/// Reads a network-byte-order `u32` at `index` of `octets`.
fn read_u32(octets: &[u8], index: usize) -> Result<u32> {
    match octets.get(index..index + 4) {
        Some(&[a, b, c, d]) => Ok(u32::from_be_bytes([a, b, c, d])),
        _ => Err(Error::UnexpectedEomInField),
    }
}

////////////////////////////////////////////////////////////////////////
// READ RR STRUCTURE                                                  //
////////////////////////////////////////////////////////////////////////

/// A structure containing RR data as returned by [`Reader::read_rr`].
///
/// The RDATA borrows from the message buffer. Since RDATA may itself
/// contain compressed names, it is only meaningful in the context of
/// the message it came from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReadRr<'a> {
    pub owner: Name,
    pub rr_type: Type,
    pub class: Class,
    pub ttl: Ttl,
    pub rdata: &'a [u8],
}

impl ReadRr<'_> {
    /// Interprets the record as an A record.
    ///
    /// Returns `Ok(None)` for records of any other type, and fails if an
    /// A record's RDATA is not exactly four octets. The class is not
    /// consulted.
    pub fn ipv4_address(&self) -> Result<Option<Ipv4Addr>> {
        if self.rr_type != Type::A {
            Ok(None)
        } else if let &[a, b, c, d] = self.rdata {
            Ok(Some(Ipv4Addr::new(a, b, c, d)))
        } else {
            Err(Error::InvalidAddressRdata)
        }
    }
}

////////////////////////////////////////////////////////////////////////
// ERRORS                                                             //
////////////////////////////////////////////////////////////////////////

/// An error signaling that the message header, a [`Question`], or a
/// resource record could not be read.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Error {
    HeaderTooShort,
    UnexpectedEomInField,
    UnexpectedEomInRdata,
    InvalidQname(name::Error),
    InvalidOwner(name::Error),
    InvalidAddressRdata,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Self::HeaderTooShort => f.write_str("header too short"),
            Self::UnexpectedEomInField => f.write_str("unexpected end of message in field"),
            Self::UnexpectedEomInRdata => f.write_str("unexpected end of message in RDATA"),
            Self::InvalidQname(err) => write!(f, "invalid QNAME: {}", err),
            Self::InvalidOwner(err) => write!(f, "invalid owner: {}", err),
            Self::InvalidAddressRdata => f.write_str("A record RDATA is not four octets long"),
        }
    }
}

impl std::error::Error for Error {}

/// The type returned by fallible [`Reader`] methods.
pub type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::super::{Opcode, Qclass, Qtype, Rcode};
    use super::*;

    /// This is a reply to a query for example.com. IN NS to a recursive
    /// server, made on January 7, 2022.
    const EXAMPLE_COM_NS_MESSAGE: &[u8] =
        b"\xe2\xd7\x81\x80\x00\x01\x00\x02\x00\x00\x00\x01\x07\x65\x78\x61\
          \x6d\x70\x6c\x65\x03\x63\x6f\x6d\x00\x00\x02\x00\x01\xc0\x0c\x00\
          \x02\x00\x01\x00\x01\x50\xa2\x00\x14\x01\x61\x0c\x69\x61\x6e\x61\
          \x2d\x73\x65\x72\x76\x65\x72\x73\x03\x6e\x65\x74\x00\xc0\x0c\x00\
          \x02\x00\x01\x00\x01\x50\xa2\x00\x04\x01\x62\xc0\x2b\x00\x00\x29\
          \x10\x00\x00\x00\x00\x00\x00\x00";

    #[test]
    fn reader_works() {
        let mut reader = Reader::try_from(EXAMPLE_COM_NS_MESSAGE).unwrap();
        let expected_qname: Name = "example.com.".parse().unwrap();

        // Check the header.
        let header = *reader.header();
        assert_eq!(header.id, 0xe2d7);
        assert!(header.qr);
        assert_eq!(header.opcode, Opcode::Query);
        assert!(!header.aa);
        assert!(!header.tc);
        assert!(header.rd);
        assert!(header.ra);
        assert_eq!(header.rcode, Rcode::NoError);
        assert_eq!(header.qdcount, 1);
        assert_eq!(header.ancount, 2);
        assert_eq!(header.nscount, 0);
        assert_eq!(header.arcount, 1);

        // Check the question.
        let question = reader.read_question().unwrap();
        assert_eq!(question.qname, expected_qname);
        assert_eq!(question.qtype, Qtype::from(Type::NS));
        assert_eq!(question.qclass, Qclass::from(Class::IN));
        assert_eq!(reader.cursor, 29);

        // Check the answers. The owners are compressed pointers back to
        // the QNAME.
        let answer_1 = reader.read_rr().unwrap();
        assert_eq!(answer_1.owner, expected_qname);
        assert_eq!(answer_1.rr_type, Type::NS);
        assert_eq!(answer_1.class, Class::IN);
        assert_eq!(answer_1.ttl, Ttl::from(86178));
        assert_eq!(answer_1.rdata, b"\x01a\x0ciana-servers\x03net\x00");
        assert_eq!(answer_1.ipv4_address(), Ok(None));
        let answer_2 = reader.read_rr().unwrap();
        assert_eq!(answer_2.owner, expected_qname);
        assert_eq!(answer_2.rr_type, Type::NS);
        assert_eq!(answer_2.rdata, b"\x01b\xc0\x2b");
        let (ns_b, _) = Name::try_from_compressed(EXAMPLE_COM_NS_MESSAGE, 73).unwrap();
        assert_eq!(ns_b.to_string(), "b.iana-servers.net");

        // Check the OPT record.
        let opt = reader.read_rr().unwrap();
        assert!(opt.owner.is_root());
        assert_eq!(opt.rr_type, Type::OPT);
        assert_eq!(opt.class, Class::from(4096));
        assert!(opt.rdata.is_empty());

        // And that should be it!
        assert_eq!(reader.cursor, EXAMPLE_COM_NS_MESSAGE.len());
    }

    #[test]
    fn reader_constructor_rejects_short_message() {
        for size in 0..HEADER_SIZE {
            let buf = vec![0; size];
            assert_eq!(Reader::try_from(buf.as_slice()), Err(Error::HeaderTooShort));
        }
    }

    #[test]
    fn skip_is_bounds_checked() {
        let mut reader = Reader::try_from(EXAMPLE_COM_NS_MESSAGE).unwrap();
        assert_eq!(reader.skip(17), Ok(()));
        assert_eq!(reader.cursor, 29);
        assert_eq!(reader.skip(1000), Err(Error::UnexpectedEomInField));
        assert_eq!(reader.skip(usize::MAX), Err(Error::UnexpectedEomInField));
        assert_eq!(reader.cursor, 29);
    }

    #[test]
    fn read_rr_rejects_truncated_fields() {
        // Cut the message off partway through the first answer's TTL.
        let mut reader = Reader::try_from(&EXAMPLE_COM_NS_MESSAGE[..37]).unwrap();
        reader.read_question().unwrap();
        assert_eq!(reader.read_rr(), Err(Error::UnexpectedEomInField));
        assert_eq!(reader.cursor, 29);
    }

    #[test]
    fn read_rr_rejects_truncated_rdata() {
        let mut reader = Reader::try_from(&EXAMPLE_COM_NS_MESSAGE[..50]).unwrap();
        reader.read_question().unwrap();
        assert_eq!(reader.read_rr(), Err(Error::UnexpectedEomInRdata));
    }

    #[test]
    fn read_rr_rejects_invalid_owner() {
        let mut message = EXAMPLE_COM_NS_MESSAGE.to_vec();
        // Point the first answer's owner forward at itself.
        message[30] = 0x1d;
        let mut reader = Reader::try_from(message.as_slice()).unwrap();
        reader.read_question().unwrap();
        assert_eq!(
            reader.read_rr(),
            Err(Error::InvalidOwner(name::Error::InvalidPointer))
        );
    }

    #[test]
    fn ipv4_address_requires_four_octets() {
        let rr = ReadRr {
            owner: "example.com".parse().unwrap(),
            rr_type: Type::A,
            class: Class::IN,
            ttl: Ttl::from(60),
            rdata: b"\x5d\xb8\xd8",
        };
        assert_eq!(rr.ipv4_address(), Err(Error::InvalidAddressRdata));
        let rr = ReadRr {
            rdata: b"\x5d\xb8\xd8\x22",
            ..rr
        };
        assert_eq!(
            rr.ipv4_address(),
            Ok(Some(Ipv4Addr::new(93, 184, 216, 34)))
        );
    }
}
