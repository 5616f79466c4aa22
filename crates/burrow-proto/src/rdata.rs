//! Decoded RDATA payloads.
//!
//! Only the record types a stub resolver acts on carry a decoded value.
//! For SOA and MX the payload is just the embedded name — the serial/timer
//! fields and the MX preference are not used and are skipped on decode.

use crate::name::Name;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Decoded record payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RData {
    /// IPv4 host address.
    A(Ipv4Addr),

    /// IPv6 host address.
    Aaaa(Ipv6Addr),

    /// Authoritative name server for a zone.
    Ns(Name),

    /// Canonical name of an alias.
    Cname(Name),

    /// Primary name server from a start-of-authority record. The remaining
    /// SOA fields are skipped.
    Soa(Name),

    /// Mail exchange host. The preference value is skipped.
    Mx(Name),

    /// A record type this codec does not decode; the payload bytes were
    /// consumed and discarded.
    Unsupported,
}

impl RData {
    /// Returns the IPv4 address for A records.
    #[inline]
    pub fn as_ipv4(&self) -> Option<Ipv4Addr> {
        match self {
            Self::A(addr) => Some(*addr),
            _ => None,
        }
    }

    /// Returns the address for A and AAAA records.
    #[inline]
    pub fn as_ip(&self) -> Option<IpAddr> {
        match self {
            Self::A(addr) => Some(IpAddr::V4(*addr)),
            Self::Aaaa(addr) => Some(IpAddr::V6(*addr)),
            _ => None,
        }
    }

    /// Returns the embedded name for NS, CNAME, SOA and MX records.
    #[inline]
    pub fn as_name(&self) -> Option<&Name> {
        match self {
            Self::Ns(name) | Self::Cname(name) | Self::Soa(name) | Self::Mx(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for RData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A(addr) => write!(f, "{addr}"),
            Self::Aaaa(addr) => write!(f, "{addr}"),
            Self::Ns(name) | Self::Cname(name) | Self::Soa(name) | Self::Mx(name) => {
                write!(f, "{name}")
            }
            Self::Unsupported => write!(f, "<unsupported>"),
        }
    }
}
