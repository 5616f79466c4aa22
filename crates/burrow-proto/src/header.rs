//! DNS message header.
//!
//! Fixed 12-byte structure at the start of every message: transaction ID,
//! flags, and the four section counts.

use crate::error::{Error, Result};
use crate::HEADER_LENGTH;
use bitflags::bitflags;
use bytes::BytesMut;
use serde::{Deserialize, Serialize};
use std::fmt;

bitflags! {
    /// DNS header flags.
    ///
    /// Opcode and RCODE bits are masked out on parse; this resolver sends
    /// standard queries and only reads the response bits it acts on.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct HeaderFlags: u16 {
        /// Query/Response: 0 = query, 1 = response.
        const QR = 0x8000;

        /// Authoritative Answer: responder is authoritative for the zone.
        const AA = 0x0400;

        /// Truncation: message did not fit the datagram.
        const TC = 0x0200;

        /// Recursion Desired.
        const RD = 0x0100;

        /// Recursion Available.
        const RA = 0x0080;
    }
}

impl Default for HeaderFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// DNS message header.
///
/// # Wire Format
///
/// ```text
///                                 1  1  1  1  1  1
///   0  1  2  3  4  5  6  7  8  9  0  1  2  3  4  5
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                      ID                       |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |QR|   Opcode  |AA|TC|RD|RA| Z|AD|CD|   RCODE   |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                    QDCOUNT                    |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                    ANCOUNT                    |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                    NSCOUNT                    |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                    ARCOUNT                    |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Transaction ID matching requests to responses.
    pub id: u16,

    /// Header flag bits.
    pub flags: HeaderFlags,

    /// Number of questions.
    pub qd_count: u16,

    /// Number of answer records.
    pub an_count: u16,

    /// Number of authority records.
    pub ns_count: u16,

    /// Number of additional records.
    pub ar_count: u16,
}

impl Header {
    /// Creates a query header: standard query, recursion desired, one
    /// question. The flags word is exactly `0x0100` on the wire.
    #[inline]
    pub const fn query(id: u16) -> Self {
        Self {
            id,
            flags: HeaderFlags::RD,
            qd_count: 1,
            an_count: 0,
            ns_count: 0,
            ar_count: 0,
        }
    }

    /// Returns true if this is a response.
    #[inline]
    pub fn is_response(&self) -> bool {
        self.flags.contains(HeaderFlags::QR)
    }

    /// Returns true if the response is from an authoritative server.
    #[inline]
    pub fn is_authoritative(&self) -> bool {
        self.flags.contains(HeaderFlags::AA)
    }

    /// Returns true if the message was truncated.
    #[inline]
    pub fn is_truncated(&self) -> bool {
        self.flags.contains(HeaderFlags::TC)
    }

    /// Returns the total record count across the three record sections.
    #[inline]
    pub fn total_record_count(&self) -> usize {
        self.an_count as usize + self.ns_count as usize + self.ar_count as usize
    }

    /// Parses a header from the start of a message buffer.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_LENGTH {
            return Err(Error::TruncatedHeader { length: data.len() });
        }

        let id = u16::from_be_bytes([data[0], data[1]]);
        let flags = HeaderFlags::from_bits_truncate(u16::from_be_bytes([data[2], data[3]]));
        let qd_count = u16::from_be_bytes([data[4], data[5]]);
        let an_count = u16::from_be_bytes([data[6], data[7]]);
        let ns_count = u16::from_be_bytes([data[8], data[9]]);
        let ar_count = u16::from_be_bytes([data[10], data[11]]);

        Ok(Self {
            id,
            flags,
            qd_count,
            an_count,
            ns_count,
            ar_count,
        })
    }

    /// Serializes the header to wire format.
    pub fn to_wire(&self) -> [u8; HEADER_LENGTH] {
        let mut buf = [0u8; HEADER_LENGTH];

        buf[0..2].copy_from_slice(&self.id.to_be_bytes());
        buf[2..4].copy_from_slice(&self.flags.bits().to_be_bytes());
        buf[4..6].copy_from_slice(&self.qd_count.to_be_bytes());
        buf[6..8].copy_from_slice(&self.an_count.to_be_bytes());
        buf[8..10].copy_from_slice(&self.ns_count.to_be_bytes());
        buf[10..12].copy_from_slice(&self.ar_count.to_be_bytes());

        buf
    }

    /// Writes the header to a buffer.
    pub fn write_to(&self, buf: &mut BytesMut) {
        buf.extend_from_slice(&self.to_wire());
    }
}

impl Default for Header {
    fn default() -> Self {
        Self {
            id: 0,
            flags: HeaderFlags::empty(),
            qd_count: 0,
            an_count: 0,
            ns_count: 0,
            ar_count: 0,
        }
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ID:{:04X}", self.id)?;

        if self.is_response() {
            write!(f, " QR")?;
        }
        if self.is_authoritative() {
            write!(f, " AA")?;
        }
        if self.is_truncated() {
            write!(f, " TC")?;
        }
        if self.flags.contains(HeaderFlags::RD) {
            write!(f, " RD")?;
        }
        if self.flags.contains(HeaderFlags::RA) {
            write!(f, " RA")?;
        }

        write!(
            f,
            " QD:{} AN:{} NS:{} AR:{}",
            self.qd_count, self.an_count, self.ns_count, self.ar_count
        )
    }
}
