//! DNS record types.
//!
//! The resolver understands the six classic types it can chase or cache
//! meaningfully; every other code still round-trips through [`Type`] so
//! unknown records can be skipped and displayed.

use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A supported DNS record type.
///
/// Wire codes per RFC 1035 (and RFC 3596 for AAAA). Codes outside this set
/// decode as [`Type::Other`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    IntoPrimitive,
    TryFromPrimitive,
    Serialize,
    Deserialize,
)]
#[repr(u16)]
pub enum RecordType {
    /// IPv4 address - RFC 1035
    A = 1,

    /// Authoritative name server - RFC 1035
    NS = 2,

    /// Canonical name (alias) - RFC 1035
    CNAME = 5,

    /// Start of authority - RFC 1035
    SOA = 6,

    /// Mail exchange - RFC 1035
    MX = 15,

    /// IPv6 address - RFC 3596
    AAAA = 28,
}

impl RecordType {
    /// Returns the numeric wire value of the record type.
    #[inline]
    pub const fn to_u16(self) -> u16 {
        self as u16
    }

    /// Creates a record type from its numeric value.
    #[inline]
    pub fn from_u16(value: u16) -> Option<Self> {
        Self::try_from(value).ok()
    }

    /// Returns the presentation name of the record type.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::NS => "NS",
            Self::CNAME => "CNAME",
            Self::SOA => "SOA",
            Self::MX => "MX",
            Self::AAAA => "AAAA",
        }
    }

    /// Returns true if this type's value is a domain name to follow or
    /// display (NS, CNAME, SOA primary, MX exchange).
    #[inline]
    pub const fn has_name_value(self) -> bool {
        matches!(self, Self::NS | Self::CNAME | Self::SOA | Self::MX)
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Default for RecordType {
    fn default() -> Self {
        Self::A
    }
}

impl FromStr for RecordType {
    type Err = UnknownTypeName;

    /// Parses a presentation-format type name, case-insensitively.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "A" => Ok(Self::A),
            "NS" => Ok(Self::NS),
            "CNAME" => Ok(Self::CNAME),
            "SOA" => Ok(Self::SOA),
            "MX" => Ok(Self::MX),
            "AAAA" => Ok(Self::AAAA),
            _ => Err(UnknownTypeName(s.to_string())),
        }
    }
}

/// Error returned when parsing an unrecognized type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTypeName(pub String);

impl fmt::Display for UnknownTypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown record type name: {}", self.0)
    }
}

impl std::error::Error for UnknownTypeName {}

/// A type value covering both supported types and arbitrary wire codes.
///
/// Responses may carry any 16-bit type code; codes outside [`RecordType`]
/// are preserved numerically so they can be cached, skipped and displayed
/// (TYPE#### format per RFC 3597) without being interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Type {
    /// A supported record type.
    Known(RecordType),
    /// An unrecognized type code, retained for display only.
    Other(u16),
}

impl Type {
    /// Creates a type from a u16 wire value.
    #[inline]
    pub fn from_u16(value: u16) -> Self {
        RecordType::from_u16(value)
            .map(Self::Known)
            .unwrap_or(Self::Other(value))
    }

    /// Returns the numeric wire value.
    #[inline]
    pub const fn to_u16(self) -> u16 {
        match self {
            Self::Known(t) => t.to_u16(),
            Self::Other(v) => v,
        }
    }

    /// Returns the supported type if known.
    #[inline]
    pub const fn as_known(self) -> Option<RecordType> {
        match self {
            Self::Known(t) => Some(t),
            Self::Other(_) => None,
        }
    }

    /// Returns true if this is an A record type.
    #[inline]
    pub const fn is_a(self) -> bool {
        matches!(self, Self::Known(RecordType::A))
    }

    /// Returns true if this is an NS record type.
    #[inline]
    pub const fn is_ns(self) -> bool {
        matches!(self, Self::Known(RecordType::NS))
    }

    /// Returns true if this is a CNAME record type.
    #[inline]
    pub const fn is_cname(self) -> bool {
        matches!(self, Self::Known(RecordType::CNAME))
    }
}

impl From<RecordType> for Type {
    fn from(t: RecordType) -> Self {
        Self::Known(t)
    }
}

impl From<u16> for Type {
    fn from(value: u16) -> Self {
        Self::from_u16(value)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(t) => write!(f, "{t}"),
            Self::Other(v) => write!(f, "TYPE{v}"),
        }
    }
}

impl Default for Type {
    fn default() -> Self {
        Self::Known(RecordType::A)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rtype_values() {
        assert_eq!(RecordType::A.to_u16(), 1);
        assert_eq!(RecordType::NS.to_u16(), 2);
        assert_eq!(RecordType::CNAME.to_u16(), 5);
        assert_eq!(RecordType::SOA.to_u16(), 6);
        assert_eq!(RecordType::MX.to_u16(), 15);
        assert_eq!(RecordType::AAAA.to_u16(), 28);
    }

    #[test]
    fn test_rtype_from_u16() {
        assert_eq!(RecordType::from_u16(1), Some(RecordType::A));
        assert_eq!(RecordType::from_u16(28), Some(RecordType::AAAA));
        assert_eq!(RecordType::from_u16(16), None); // TXT is not supported
        assert_eq!(RecordType::from_u16(65535), None);
    }

    #[test]
    fn test_rtype_name_parsing() {
        assert_eq!("a".parse::<RecordType>(), Ok(RecordType::A));
        assert_eq!("AAAA".parse::<RecordType>(), Ok(RecordType::AAAA));
        assert_eq!("Mx".parse::<RecordType>(), Ok(RecordType::MX));
        assert!("TXT".parse::<RecordType>().is_err());
    }

    #[test]
    fn test_generic_type() {
        let t = Type::from_u16(1);
        assert!(t.is_a());
        assert_eq!(t.as_known(), Some(RecordType::A));

        let t = Type::from_u16(16);
        assert_eq!(t, Type::Other(16));
        assert_eq!(t.as_known(), None);
        assert_eq!(t.to_u16(), 16);
        assert_eq!(t.to_string(), "TYPE16");
    }

    #[test]
    fn test_name_value_predicate() {
        assert!(RecordType::NS.has_name_value());
        assert!(RecordType::MX.has_name_value());
        assert!(!RecordType::A.has_name_value());
        assert!(!RecordType::AAAA.has_name_value());
    }
}
