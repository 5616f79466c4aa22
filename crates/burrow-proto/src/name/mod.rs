//! DNS domain name representation and operations.
//!
//! Names are stored in uncompressed wire format and compared
//! case-insensitively per RFC 1035. Decompression of names inside a message
//! lives in [`decode`].

mod decode;
mod label;

pub use decode::NameDecoder;
pub use label::{Label, LabelIter};

use crate::error::{Error, Result};
use crate::{MAX_LABEL_LENGTH, MAX_NAME_LENGTH};
use bytes::BytesMut;
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// A DNS domain name.
///
/// A name is a sequence of labels, each up to 63 bytes, with a total wire
/// length of at most 255 bytes including length prefixes and the root label.
///
/// # Wire Format
///
/// `www.example.com.` is stored as:
///
/// ```text
/// 03 'w' 'w' 'w' 07 'e' 'x' 'a' 'm' 'p' 'l' 'e' 03 'c' 'o' 'm' 00
/// ```
///
/// Compression pointers never appear in a stored name; they are resolved
/// during decoding.
///
/// # Comparison Semantics
///
/// Equality, hashing and ordering are case-insensitive, so names work as
/// cache keys regardless of the case a server echoed back.
#[derive(Clone)]
pub struct Name {
    /// The raw wire-format representation (without compression).
    ///
    /// Typical names fit the inline buffer without spilling to the heap.
    wire: SmallVec<[u8; 64]>,
    /// Number of labels (including root).
    label_count: u8,
}

impl Name {
    /// Creates a new empty (root) domain name.
    #[inline]
    pub const fn root() -> Self {
        Self {
            wire: SmallVec::new_const(),
            label_count: 1,
        }
    }

    /// Creates a domain name from a slice of uncompressed wire format
    /// bytes, copying the data.
    pub fn from_slice(slice: &[u8]) -> Result<Self> {
        let label_count = Self::validate_wire(slice)?;
        Ok(Self {
            wire: SmallVec::from_slice(slice),
            label_count,
        })
    }

    /// Validates wire format and returns the label count.
    fn validate_wire(bytes: &[u8]) -> Result<u8> {
        if bytes.is_empty() {
            // Empty is the root name (just the terminating 0)
            return Ok(1);
        }

        let mut pos = 0;
        let mut labels = 0u8;
        let mut total_len = 0usize;

        while pos < bytes.len() {
            let len = bytes[pos] as usize;

            if len == 0 {
                // Root label, end of name
                labels = labels.checked_add(1).ok_or(Error::NameTooLong {
                    length: MAX_NAME_LENGTH + 1,
                })?;
                break;
            }

            // Pointers are not allowed in stored names
            if len >= 0xC0 {
                return Err(Error::invalid_data(
                    pos,
                    "compression pointer in stored name",
                ));
            }

            if len > MAX_LABEL_LENGTH {
                return Err(Error::LabelTooLong { length: len });
            }

            total_len += 1 + len;
            if total_len > MAX_NAME_LENGTH {
                return Err(Error::NameTooLong { length: total_len });
            }

            pos += 1 + len;
            labels = labels.checked_add(1).ok_or(Error::NameTooLong {
                length: MAX_NAME_LENGTH + 1,
            })?;

            if pos > bytes.len() {
                return Err(Error::UnexpectedEof { offset: pos });
            }
        }

        Ok(labels)
    }

    /// Returns the wire format representation.
    #[inline]
    pub fn as_wire(&self) -> &[u8] {
        self.wire.as_slice()
    }

    /// Returns the wire format length (including the terminating zero).
    #[inline]
    pub fn wire_len(&self) -> usize {
        self.as_wire().len().max(1) // at least 1 for the root label
    }

    /// Returns the number of labels in the name (including root).
    #[inline]
    pub const fn label_count(&self) -> usize {
        self.label_count as usize
    }

    /// Returns true if this is the root domain.
    #[inline]
    pub fn is_root(&self) -> bool {
        let wire = self.as_wire();
        wire.is_empty() || (wire.len() == 1 && wire[0] == 0)
    }

    /// Returns an iterator over the labels in the name.
    #[inline]
    pub fn labels(&self) -> LabelIter<'_> {
        LabelIter::new(self.as_wire())
    }

    /// Converts to a dotted string representation.
    ///
    /// Allocates; for display purposes prefer the `Display` impl.
    pub fn to_string_representation(&self) -> CompactString {
        let mut result = CompactString::new("");

        for label in self.labels() {
            if !label.is_root() {
                result.push_str(label.as_str_lossy().as_ref());
                result.push('.');
            }
        }

        if result.is_empty() {
            result.push('.');
        }

        result
    }

    /// Lowercases the name in place.
    pub fn to_lowercase(&mut self) {
        for byte in self.wire.iter_mut() {
            if byte.is_ascii_uppercase() {
                *byte = byte.to_ascii_lowercase();
            }
        }
    }

    /// Returns a lowercased copy of the name.
    #[must_use]
    pub fn lowercased(&self) -> Self {
        let mut copy = self.clone();
        copy.to_lowercase();
        copy
    }

    /// Writes the name in wire format to a buffer.
    pub fn write_wire(&self, buf: &mut BytesMut) {
        let wire = self.as_wire();
        if wire.is_empty() {
            buf.extend_from_slice(&[0]); // root label
        } else {
            buf.extend_from_slice(wire);
        }
    }

    /// Calculates a hash over the lowercased labels.
    fn lowercase_hash<H: Hasher>(&self, state: &mut H) {
        for label in self.labels() {
            let lower: SmallVec<[u8; 64]> = label
                .as_bytes()
                .iter()
                .map(|b| b.to_ascii_lowercase())
                .collect();
            lower.hash(state);
        }
    }
}

impl FromStr for Name {
    type Err = Error;

    /// Parses a domain name from dotted presentation format.
    ///
    /// A trailing dot marks a fully-qualified name; if absent, one is
    /// implied.
    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() || s == "." {
            return Ok(Self::root());
        }

        let s = s.strip_suffix('.').unwrap_or(s);

        let mut wire = SmallVec::<[u8; 64]>::new();
        let mut label_count = 0u8;

        for part in s.split('.') {
            if part.len() > MAX_LABEL_LENGTH {
                return Err(Error::LabelTooLong { length: part.len() });
            }

            // Alphanumerics, hyphen, underscore and wildcard asterisk
            for (i, c) in part.chars().enumerate() {
                if !c.is_ascii_alphanumeric() && c != '-' && c != '_' && c != '*' {
                    return Err(Error::InvalidLabelChar {
                        character: c,
                        position: i,
                    });
                }
            }

            wire.push(part.len() as u8);
            wire.extend_from_slice(part.as_bytes());
            label_count = label_count.saturating_add(1);
        }

        // Root label
        wire.push(0);
        label_count = label_count.saturating_add(1);

        if wire.len() > MAX_NAME_LENGTH {
            return Err(Error::NameTooLong { length: wire.len() });
        }

        Ok(Self { wire, label_count })
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_representation())
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name(\"{}\")", self)
    }
}

impl PartialEq for Name {
    /// Case-insensitive comparison per DNS semantics.
    fn eq(&self, other: &Self) -> bool {
        if self.label_count != other.label_count {
            return false;
        }

        self.labels()
            .zip(other.labels())
            .all(|(a, b)| a.eq_ignore_ascii_case(&b))
    }
}

impl Eq for Name {}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.lowercase_hash(state);
    }
}

impl PartialOrd for Name {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Name {
    /// Canonical DNS name ordering per RFC 4034 (rightmost label first).
    fn cmp(&self, other: &Self) -> Ordering {
        let self_labels: Vec<_> = self.labels().collect();
        let other_labels: Vec<_> = other.labels().collect();

        let mut i = self_labels.len();
        let mut j = other_labels.len();

        while i > 0 && j > 0 {
            i -= 1;
            j -= 1;

            let cmp = self_labels[i].cmp_canonical(&other_labels[j]);
            if cmp != Ordering::Equal {
                return cmp;
            }
        }

        self_labels.len().cmp(&other_labels.len())
    }
}

impl Default for Name {
    fn default() -> Self {
        Self::root()
    }
}

impl Serialize for Name {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Name {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_name() {
        let root = Name::root();
        assert!(root.is_root());
        assert_eq!(root.label_count(), 1);
        assert_eq!(root.to_string(), ".");
    }

    #[test]
    fn test_name_parsing() {
        let name = Name::from_str("www.example.com.").unwrap();
        assert!(!name.is_root());
        assert_eq!(name.label_count(), 4);
        assert_eq!(name.to_string(), "www.example.com.");

        // Without trailing dot
        let name2 = Name::from_str("www.example.com").unwrap();
        assert_eq!(name, name2);
    }

    #[test]
    fn test_case_insensitive_comparison() {
        let lower = Name::from_str("www.example.com").unwrap();
        let upper = Name::from_str("WWW.EXAMPLE.COM").unwrap();
        let mixed = Name::from_str("Www.ExAmPlE.CoM").unwrap();

        assert_eq!(lower, upper);
        assert_eq!(lower, mixed);
        assert_eq!(upper, mixed);
    }

    #[test]
    fn test_case_insensitive_hash() {
        use std::collections::hash_map::DefaultHasher;

        let hash = |name: &Name| {
            let mut hasher = DefaultHasher::new();
            name.hash(&mut hasher);
            hasher.finish()
        };

        let lower = Name::from_str("www.example.com").unwrap();
        let upper = Name::from_str("WWW.EXAMPLE.COM").unwrap();
        assert_eq!(hash(&lower), hash(&upper));
    }

    #[test]
    fn test_label_iteration() {
        let name = Name::from_str("www.example.com").unwrap();
        let labels: Vec<_> = name.labels().map(|l| l.to_string()).collect();
        assert_eq!(labels, vec!["www", "example", "com", ""]);
    }

    #[test]
    fn test_label_too_long() {
        let long_label = "a".repeat(64);
        let result = Name::from_str(&long_label);
        assert!(matches!(result, Err(Error::LabelTooLong { .. })));

        let just_fits = "a".repeat(63);
        assert!(Name::from_str(&just_fits).is_ok());
    }

    #[test]
    fn test_name_too_long() {
        // Four 63-byte labels give a wire length of 4*64 + 1 = 257 > 255
        let label = "a".repeat(63);
        let long = [label.as_str(); 4].join(".");
        assert!(matches!(
            Name::from_str(&long),
            Err(Error::NameTooLong { .. })
        ));

        // Four 62-byte labels (4*63 + 1 = 253) still fit
        let label = "a".repeat(62);
        let fits = [label.as_str(); 4].join(".");
        assert!(Name::from_str(&fits).is_ok());
    }

    #[test]
    fn test_invalid_label_char() {
        assert!(matches!(
            Name::from_str("bad space.example.com"),
            Err(Error::InvalidLabelChar { .. })
        ));
    }

    #[test]
    fn test_wire_roundtrip() {
        let name = Name::from_str("cs.ubc.ca").unwrap();
        let copy = Name::from_slice(name.as_wire()).unwrap();
        assert_eq!(name, copy);
        assert_eq!(copy.wire_len(), 11); // 1+2 + 1+3 + 1+2 + 1
    }

    #[test]
    fn test_rejects_pointer_in_stored_name() {
        let wire = [3, b'w', b'w', b'w', 0xC0, 0x0C];
        assert!(Name::from_slice(&wire).is_err());
    }

    #[test]
    fn test_canonical_ordering() {
        let names: Vec<Name> = vec![
            "example.",
            "a.example.",
            "yljkjljk.a.example.",
            "Z.a.example.",
            "zABC.a.EXAMPLE.",
            "z.example.",
            "*.z.example.",
        ]
        .into_iter()
        .map(|s| Name::from_str(s).unwrap())
        .collect();

        let mut sorted = names.clone();
        sorted.sort();

        for i in 0..sorted.len() - 1 {
            assert!(sorted[i] <= sorted[i + 1]);
        }
    }
}
