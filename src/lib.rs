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

//! Quandig is a minimal stub resolver for IPv4 address records.
//!
//! The interesting part is the DNS wire-format codec:
//!
//! * [`name`] converts textual domain names to and from their
//!   on-the-wire label sequences, following compression pointers when
//!   decoding;
//! * [`message`] serializes queries and reads responses; and
//! * [`resolver`] ties the codec to a [`Transport`](io::Transport) to
//!   perform a single query.

pub mod class;
pub mod io;
pub mod message;
pub mod name;
pub mod resolver;
pub mod rr;
