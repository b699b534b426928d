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

//! Implementation of the [`Writer`] type to write on-the-wire DNS
//! messages.

use std::fmt;

use super::constants::*;
use super::{Header, Opcode, Question};

////////////////////////////////////////////////////////////////////////
// WRITER                                                             //
////////////////////////////////////////////////////////////////////////

/// A "frame" around a buffer that serializes a DNS message into it.
///
/// A `Writer` is constructed with its [`TryFrom`] implementation. The
/// message may use the whole buffer, which must be large enough to
/// accommodate a full DNS message header of 12 octets.
///
/// Header fields are set at any time through the appropriate setters;
/// the header is written out by [`Writer::finish`], which also fills
/// in the section counts. Questions are serialized sequentially after
/// the header with [`Writer::add_question`]. Names are always written
/// uncompressed, since a query carries only one of them.
pub struct Writer<'a> {
    octets: &'a mut [u8],
    cursor: usize,
    header: Header,
}

impl Writer<'_> {
    /// Sets the 16-bit ID of the message.
    pub fn set_id(&mut self, id: u16) {
        self.header.id = id;
    }

    /// Sets the message's opcode.
    pub fn set_opcode(&mut self, opcode: Opcode) {
        self.header.opcode = opcode;
    }

    /// Sets or clears the RD (recursion desired) bit.
    pub fn set_rd(&mut self, rd: bool) {
        self.header.rd = rd;
    }

    /// Serializes a question into the message.
    ///
    /// This method is atomic: on failure, nothing is written and the
    /// `Writer` is unchanged.
    pub fn add_question(&mut self, question: &Question) -> Result<()> {
        let qdcount = self
            .header
            .qdcount
            .checked_add(1)
            .ok_or(Error::CountOverflow)?;
        let qname = question.qname.wire_repr();
        let end = self.cursor + question.wire_len();
        if end > self.octets.len() {
            return Err(Error::Truncation);
        }

        let qname_end = self.cursor + qname.len();
        let qtype = u16::from(question.qtype).to_be_bytes();
        let qclass = u16::from(question.qclass).to_be_bytes();
        self.octets[self.cursor..qname_end].copy_from_slice(qname);
        self.octets[qname_end..qname_end + 2].copy_from_slice(&qtype);
        self.octets[qname_end + 2..end].copy_from_slice(&qclass);
        self.cursor = end;
        self.header.qdcount = qdcount;
        Ok(())
    }

    /// Writes the header and returns the length of the finished
    /// message, consuming the `Writer`.
    pub fn finish(self) -> usize {
        self.octets[..HEADER_SIZE].copy_from_slice(&self.header.to_octets());
        self.cursor
    }
}

impl<'a> TryFrom<&'a mut [u8]> for Writer<'a> {
    type Error = Error;

    fn try_from(octets: &'a mut [u8]) -> Result<Self> {
        if octets.len() < HEADER_SIZE {
            Err(Error::Truncation)
        } else {
            Ok(Self {
                octets,
                cursor: HEADER_SIZE,
                header: Header::default(),
            })
        }
    }
}

impl fmt::Debug for Writer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Writer")
            .field("header", &self.header)
            .field("cursor", &self.cursor)
            .field("len", &self.octets.len())
            .finish()
    }
}

////////////////////////////////////////////////////////////////////////
// ERRORS                                                             //
////////////////////////////////////////////////////////////////////////

/// An error signaling that a [`Writer`] operation could not be
/// performed.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Error {
    /// Adding the question would overflow the 16-bit QDCOUNT.
    CountOverflow,

    /// There is not enough room left in the buffer.
    Truncation,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Self::CountOverflow => f.write_str("question count overflow"),
            Self::Truncation => f.write_str("message does not fit in the buffer"),
        }
    }
}

impl std::error::Error for Error {}

/// The type returned by fallible [`Writer`] methods.
pub type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writer_serializes_header_and_question() {
        let mut buf = [0xff; 64];
        let mut writer = Writer::try_from(&mut buf[..]).unwrap();
        writer.set_id(0xbeef);
        writer.set_rd(true);
        writer
            .add_question(&Question::address("example.com".parse().unwrap()))
            .unwrap();
        let len = writer.finish();
        assert_eq!(len, 29);
        assert_eq!(
            &buf[..len],
            b"\xbe\xef\x01\x00\x00\x01\x00\x00\x00\x00\x00\x00\
              \x07example\x03com\x00\x00\x01\x00\x01"
        );
    }

    #[test]
    fn writer_rejects_small_buffers() {
        let mut buf = [0; HEADER_SIZE - 1];
        assert_eq!(
            Writer::try_from(&mut buf[..]).map(Writer::finish),
            Err(Error::Truncation)
        );
        let mut buf = [0; HEADER_SIZE];
        assert_eq!(Writer::try_from(&mut buf[..]).map(Writer::finish), Ok(HEADER_SIZE));
    }

    #[test]
    fn add_question_is_atomic_on_truncation() {
        let mut buf = [0; 28];
        let mut writer = Writer::try_from(&mut buf[..]).unwrap();
        let question = Question::address("example.com".parse().unwrap());
        assert_eq!(writer.add_question(&question), Err(Error::Truncation));
        assert_eq!(writer.finish(), HEADER_SIZE);
        assert_eq!(&buf[4..6], b"\x00\x00");
    }
}
