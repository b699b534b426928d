// Copyright 2021 Matthew Ingwersen.
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

//! Implementation of data structures related to domain names.

use std::fmt;
use std::iter::FusedIterator;
use std::str::FromStr;

use arrayvec::ArrayVec;

mod error;
mod wire;
pub use error::Error;

/// The maximum length of the uncompressed on-the-wire representation of
/// a domain name.
const MAX_WIRE_LEN: usize = 255;

/// The maximum length of a label in a domain name (not including the
/// octet that provides the length).
const MAX_LABEL_LEN: usize = 63;

////////////////////////////////////////////////////////////////////////
// NAME STRUCTURE                                                     //
////////////////////////////////////////////////////////////////////////

/// A structure to represent a domain name.
///
/// A `Name` stores the uncompressed on-the-wire representation of the
/// name, as defined in [RFC 1035 § 3.1]: a sequence of labels, each
/// preceded by a length octet, terminated by the null label. The
/// representation is held inline in a fixed-capacity buffer, since it
/// may never exceed 255 octets.
///
/// `Name`s are constructed in two ways:
///
/// * from text through the [`FromStr`] implementation, which accepts
///   dotted names such as `example.com` (with or without a trailing
///   dot); and
/// * from compressed on-the-wire names inside a DNS message through
///   [`Name::try_from_compressed`].
///
/// Either way, every `Name` is valid: no label exceeds 63 octets, no
/// null label appears before the end, and the whole thing fits in 255
/// octets.
///
/// [RFC 1035 § 3.1]: https://datatracker.ietf.org/doc/html/rfc1035#section-3.1
#[derive(Clone)]
pub struct Name {
    wire: ArrayVec<u8, MAX_WIRE_LEN>,
}

impl Name {
    /// Parses a compressed name starting at index `start` of `octets`.
    ///
    /// Pointers are followed, and indices given in pointers are treated
    /// as indices of `octets`; hence `octets` should be an entire DNS
    /// message. On success, this returns the name along with the number
    /// of octets the name occupies at `start`. When the name ends with
    /// a pointer, that count stops after the pointer, no matter how
    /// many octets were read after following it.
    ///
    /// Only pointers to locations *prior* to the label sequence
    /// containing them are accepted, so parsing always terminates.
    pub fn try_from_compressed(octets: &[u8], start: usize) -> Result<(Self, usize), Error> {
        wire::parse_compressed_name(octets, start)
    }

    /// Returns the uncompressed on-the-wire representation of the name.
    pub fn wire_repr(&self) -> &[u8] {
        &self.wire
    }

    /// Returns whether this is the root name.
    pub fn is_root(&self) -> bool {
        self.wire.len() == 1
    }

    /// Returns an iterator over the non-null labels of the name, from
    /// left to right.
    pub fn labels(&self) -> Labels<'_> {
        Labels {
            remaining: &self.wire,
        }
    }
}

/// Encodes a textual domain name such as `www.example.com`.
///
/// A single trailing dot is accepted and does not produce an extra
/// label. The name must have at least one label, so `.` alone is
/// rejected like the empty string. Labels are taken verbatim, so escape
/// sequences are not interpreted.
impl FromStr for Name {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.strip_suffix('.').unwrap_or(text);
        if text.is_empty() {
            return Err(Error::StrEmpty);
        } else if !text.is_ascii() {
            return Err(Error::StrNotAscii);
        }

        let mut wire = ArrayVec::new();
        for label in text.split('.') {
            if label.is_empty() {
                return Err(Error::EmptyLabel);
            } else if label.len() > MAX_LABEL_LEN {
                return Err(Error::LabelTooLong);
            }
            wire.try_push(label.len() as u8)
                .or(Err(Error::NameTooLong))?;
            wire.try_extend_from_slice(label.as_bytes())
                .or(Err(Error::NameTooLong))?;
        }
        wire.try_push(0).or(Err(Error::NameTooLong))?;
        Ok(Self { wire })
    }
}

/// In accordance with RFC 1034 § 3.1 (clarified by RFC 4343),
/// comparison of `Name`s is ASCII-case-insensitive.
impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        // Length octets never fall in the ASCII letter range, so this
        // only folds the case of label contents.
        self.wire.eq_ignore_ascii_case(&other.wire)
    }
}

impl Eq for Name {}

/// Names are displayed without the trailing dot, except for the root
/// name, which is displayed as `.`. Octets that are not printable ASCII
/// (along with `.` and `\` inside labels) are escaped as in master
/// files.
impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_root() {
            return f.write_str(".");
        }
        for (i, label) in self.labels().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            for octet in label {
                if *octet == b'.' {
                    f.write_str("\\.")?;
                } else if *octet == b'\\' {
                    f.write_str("\\\\")?;
                } else if octet.is_ascii_graphic() {
                    write!(f, "{}", *octet as char)?;
                } else {
                    write!(f, "\\{:03}", *octet)?;
                }
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "\"{}\"", self)
    }
}

////////////////////////////////////////////////////////////////////////
// LABEL ITERATION                                                    //
////////////////////////////////////////////////////////////////////////

/// An iterator over the non-null labels of a [`Name`], returned by
/// [`Name::labels`].
#[derive(Clone, Debug)]
pub struct Labels<'a> {
    remaining: &'a [u8],
}

impl<'a> Iterator for Labels<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        let (&len, rest) = self.remaining.split_first()?;
        if len == 0 {
            self.remaining = &[];
            None
        } else {
            let (label, rest) = rest.split_at(len as usize);
            self.remaining = rest;
            Some(label)
        }
    }
}

impl FusedIterator for Labels<'_> {}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_str_encodes_labels() {
        let name: Name = "example.com".parse().unwrap();
        assert_eq!(name.wire_repr(), b"\x07example\x03com\x00");
        assert_eq!(name.wire_repr().len(), 13);
    }

    #[test]
    fn from_str_does_not_encode_trailing_dot_as_label() {
        let relative: Name = "example.com".parse().unwrap();
        let absolute: Name = "example.com.".parse().unwrap();
        assert_eq!(relative.wire_repr(), absolute.wire_repr());
    }

    fn root() -> Name {
        Name::try_from_compressed(b"\x00", 0).unwrap().0
    }

    #[test]
    fn from_str_rejects_empty_names() {
        assert_eq!("".parse::<Name>(), Err(Error::StrEmpty));
        assert_eq!(".".parse::<Name>(), Err(Error::StrEmpty));
    }

    #[test]
    fn display_shows_root_as_dot() {
        let root = root();
        assert!(root.is_root());
        assert_eq!(root.to_string(), ".");
    }

    #[test]
    fn from_str_rejects_non_ascii() {
        assert_eq!("bücher.example".parse::<Name>(), Err(Error::StrNotAscii));
    }

    #[test]
    fn from_str_rejects_empty_labels() {
        assert_eq!("a..b".parse::<Name>(), Err(Error::EmptyLabel));
        assert_eq!(".example".parse::<Name>(), Err(Error::EmptyLabel));
        assert_eq!("example..".parse::<Name>(), Err(Error::EmptyLabel));
    }

    #[test]
    fn from_str_rejects_long_label() {
        let ok = "x".repeat(63);
        let too_long = "x".repeat(64);
        assert!(ok.parse::<Name>().is_ok());
        assert_eq!(too_long.parse::<Name>(), Err(Error::LabelTooLong));
    }

    #[test]
    fn from_str_rejects_long_name() {
        // Three 63-octet labels and one 61-octet label come to exactly
        // 255 octets on the wire; one more octet is too many.
        let label = "x".repeat(63);
        let longest = format!("{0}.{0}.{0}.{1}", label, "y".repeat(61));
        let too_long = format!("{0}.{0}.{0}.{1}", label, "y".repeat(62));
        assert_eq!(longest.parse::<Name>().unwrap().wire_repr().len(), 255);
        assert_eq!(too_long.parse::<Name>(), Err(Error::NameTooLong));

        let way_too_long = vec![label.as_str(); 5].join(".");
        assert_eq!(way_too_long.parse::<Name>(), Err(Error::NameTooLong));
    }

    #[test]
    fn labels_iterates_non_null_labels() {
        let name: Name = "www.example.com".parse().unwrap();
        let labels: Vec<&[u8]> = name.labels().collect();
        assert_eq!(labels, [&b"www"[..], b"example", b"com"]);
        assert_eq!(root().labels().count(), 0);
    }

    #[test]
    fn display_omits_trailing_dot() {
        let name: Name = "www.example.com.".parse().unwrap();
        assert_eq!(name.to_string(), "www.example.com");
    }

    #[test]
    fn display_escapes_special_octets() {
        let (name, _) = Name::try_from_compressed(b"\x03a.b\x02\x00\\\x00", 0).unwrap();
        assert_eq!(name.to_string(), "a\\.b.\\000\\\\");
    }

    #[test]
    fn comparison_is_case_insensitive() {
        let lower: Name = "example.com".parse().unwrap();
        let mixed: Name = "ExAmPlE.CoM".parse().unwrap();
        let other: Name = "example.net".parse().unwrap();
        assert_eq!(lower, mixed);
        assert_ne!(lower, other);
    }
}
