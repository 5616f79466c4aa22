//! Resource records.

use crate::error::{Error, Result};
use crate::name::{Name, NameDecoder};
use crate::rdata::RData;
use crate::rtype::{RecordType, Type};
use crate::wire::WireReader;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

/// A decoded resource record.
///
/// The class field is not stored: this codec only speaks IN, and record
/// classes are ignored on decode. TTL is the raw seconds value from the
/// wire; it never counts down after decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecord {
    name: Name,
    rtype: Type,
    ttl: u32,
    rdata: RData,
}

impl ResourceRecord {
    /// Creates a record from its parts.
    pub fn new(name: Name, rtype: Type, ttl: u32, rdata: RData) -> Self {
        Self {
            name,
            rtype,
            ttl,
            rdata,
        }
    }

    /// Creates an A record.
    pub fn a(name: Name, ttl: u32, addr: Ipv4Addr) -> Self {
        Self::new(name, Type::Known(RecordType::A), ttl, RData::A(addr))
    }

    /// Creates an AAAA record.
    pub fn aaaa(name: Name, ttl: u32, addr: Ipv6Addr) -> Self {
        Self::new(name, Type::Known(RecordType::AAAA), ttl, RData::Aaaa(addr))
    }

    /// Creates an NS record.
    pub fn ns(name: Name, ttl: u32, nsdname: Name) -> Self {
        Self::new(name, Type::Known(RecordType::NS), ttl, RData::Ns(nsdname))
    }

    /// Creates a CNAME record.
    pub fn cname(name: Name, ttl: u32, target: Name) -> Self {
        Self::new(
            name,
            Type::Known(RecordType::CNAME),
            ttl,
            RData::Cname(target),
        )
    }

    /// Returns the owner name.
    #[inline]
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Returns the record type.
    #[inline]
    pub const fn rtype(&self) -> Type {
        self.rtype
    }

    /// Returns the TTL in seconds.
    #[inline]
    pub const fn ttl(&self) -> u32 {
        self.ttl
    }

    /// Returns the decoded payload.
    #[inline]
    pub fn rdata(&self) -> &RData {
        &self.rdata
    }

    /// Returns true for A records.
    #[inline]
    pub fn is_a(&self) -> bool {
        self.rtype.is_a()
    }

    /// Returns true for NS records.
    #[inline]
    pub fn is_ns(&self) -> bool {
        self.rtype.is_ns()
    }

    /// Returns true for CNAME records.
    #[inline]
    pub fn is_cname(&self) -> bool {
        self.rtype.is_cname()
    }

    /// Returns a copy of this record with a different owner name, keeping
    /// type, TTL and payload. Used when an answer for an alias target is
    /// re-attributed to the name that was originally asked for.
    pub fn with_name(&self, name: Name) -> Self {
        Self {
            name,
            rtype: self.rtype,
            ttl: self.ttl,
            rdata: self.rdata.clone(),
        }
    }

    /// Returns true if the other record carries the same owner name, type
    /// and payload. TTL is not compared.
    pub fn same_data(&self, other: &Self) -> bool {
        self.rtype == other.rtype && self.name == other.name && self.rdata == other.rdata
    }

    /// Decodes one record at the reader's position.
    ///
    /// The reader and decoder view the same message buffer. On success the
    /// reader sits exactly past the record's RDATA, regardless of how much
    /// of the RDATA was actually decoded.
    pub fn decode(reader: &mut WireReader<'_>, decoder: &mut NameDecoder<'_>) -> Result<Self> {
        let (name, consumed) = decoder.decode_at(reader.position())?;
        reader.advance(consumed)?;

        let rtype = Type::from_u16(reader.read_u16()?);
        let _class = reader.read_u16()?;
        let ttl = reader.read_u32()?;
        let rdlength = reader.read_u16()? as usize;

        let rdata_start = reader.position();
        if rdata_start + rdlength > reader.data().len() {
            return Err(Error::rdata_overrun(
                rdata_start,
                rdlength,
                reader.data().len().saturating_sub(rdata_start),
            ));
        }

        let rdata = match rtype.as_known() {
            Some(RecordType::A) => {
                if rdlength != 4 {
                    return Err(Error::rdata_length_mismatch("A", 4, rdlength));
                }
                let octets: [u8; 4] = reader
                    .read_bytes(4)?
                    .try_into()
                    .map_err(|_| Error::unexpected_eof(rdata_start + 4))?;
                RData::A(Ipv4Addr::from(octets))
            }
            Some(RecordType::AAAA) => {
                if rdlength != 16 {
                    return Err(Error::rdata_length_mismatch("AAAA", 16, rdlength));
                }
                let octets: [u8; 16] = reader
                    .read_bytes(16)?
                    .try_into()
                    .map_err(|_| Error::unexpected_eof(rdata_start + 16))?;
                RData::Aaaa(Ipv6Addr::from(octets))
            }
            Some(RecordType::NS) => RData::Ns(Self::decode_rdata_name(reader, decoder)?),
            Some(RecordType::CNAME) => RData::Cname(Self::decode_rdata_name(reader, decoder)?),
            Some(RecordType::SOA) => {
                // Only the primary name server is kept. The remaining SOA
                // fields (RNAME and five 32-bit timers) are skipped by
                // realigning to RDLENGTH below.
                RData::Soa(Self::decode_rdata_name(reader, decoder)?)
            }
            Some(RecordType::MX) => {
                reader.advance(2)?; // preference
                RData::Mx(Self::decode_rdata_name(reader, decoder)?)
            }
            None => {
                reader.advance(rdlength)?;
                RData::Unsupported
            }
        };

        // RDLENGTH is authoritative for where the next record starts.
        reader.set_position(rdata_start + rdlength);

        Ok(Self {
            name,
            rtype,
            ttl,
            rdata,
        })
    }

    fn decode_rdata_name(
        reader: &mut WireReader<'_>,
        decoder: &mut NameDecoder<'_>,
    ) -> Result<Name> {
        let (name, consumed) = decoder.decode_at(reader.position())?;
        reader.advance(consumed)?;
        Ok(name)
    }
}

impl fmt::Display for ResourceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} IN {} {}",
            self.name, self.ttl, self.rtype, self.rdata
        )
    }
}
