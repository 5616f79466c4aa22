//! # Burrow DNS Codec
//!
//! Wire format encoding and decoding for the burrow resolver, covering the
//! RFC 1035 subset an iterative stub resolver needs:
//!
//! - Query serialization (one question, recursion-desired flags)
//! - Response parsing into header, answer, authority and additional sections
//! - Name compression with an offset-indexed suffix table per message
//! - RDATA decoding for A, AAAA, NS, CNAME, SOA and MX; everything else is
//!   carried as an opaque unsupported value
//!
//! Decoding never panics on hostile input: malformed messages surface as an
//! explicit [`DecodeOutcome`] that keeps every record parsed before the error.
//!
//! ## Example
//!
//! ```rust,ignore
//! use burrow_proto::{Query, Response, DecodeOutcome, Name, RecordType};
//! use std::str::FromStr;
//!
//! let query = Query::new(Name::from_str("example.com.")?, RecordType::A);
//! let wire = query.encode()?;
//!
//! // ... exchange datagrams ...
//!
//! match Response::decode(&reply, query.id()) {
//!     DecodeOutcome::Valid(response) => { /* use response.answers, ... */ }
//!     DecodeOutcome::Discarded { .. } => { /* not our transaction */ }
//!     DecodeOutcome::Malformed { salvaged, .. } => { /* keep what parsed */ }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod header;
pub mod message;
pub mod name;
pub mod rdata;
pub mod record;
pub mod rtype;
pub mod wire;

// Re-exports for convenience
pub use error::{Error, Result};
pub use header::{Header, HeaderFlags};
pub use message::{DecodeOutcome, Query, Response};
pub use name::Name;
pub use rdata::RData;
pub use record::ResourceRecord;
pub use rtype::{RecordType, Type};

/// Maximum length of a DNS label (63 bytes per RFC 1035)
pub const MAX_LABEL_LENGTH: usize = 63;

/// Maximum length of a domain name in wire format (255 bytes per RFC 1035)
pub const MAX_NAME_LENGTH: usize = 255;

/// Maximum size of a UDP DNS message without EDNS0 (512 bytes per RFC 1035)
pub const MAX_UDP_MESSAGE_SIZE: usize = 512;

/// Size of the fixed message header (12 bytes)
pub const HEADER_LENGTH: usize = 12;

/// DNS port (53)
pub const DNS_PORT: u16 = 53;

/// The IN (Internet) class code. The only class this codec emits; record
/// classes are ignored on decode.
pub const CLASS_IN: u16 = 1;
