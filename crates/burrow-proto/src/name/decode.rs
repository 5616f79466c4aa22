//! Domain name decompression (RFC 1035 Section 4.1.4).
//!
//! A [`NameDecoder`] is created once per message and shared across every
//! name decoded from it. It memoizes the fully-qualified suffix that starts
//! at each label offset, so a compression pointer whose target was already
//! walked resolves with a single table lookup instead of a re-parse.

use super::Name;
use crate::error::{Error, Result};
use crate::MAX_NAME_LENGTH;
use hashbrown::HashMap;
use smallvec::SmallVec;

/// Maximum pointer jumps while decoding a single name.
///
/// Backward-only pointers already rule out loops; the budget bounds
/// pathological chains that hop backward one byte at a time.
const MAX_POINTER_JUMPS: usize = 32;

/// Decodes compressed names from one DNS message.
///
/// The offset-indexed suffix table is scoped to a single decoder, and a
/// decoder is scoped to a single message; tables are never shared across
/// messages.
#[derive(Debug)]
pub struct NameDecoder<'a> {
    /// The complete message buffer (pointer targets are absolute offsets).
    message: &'a [u8],
    /// Offset of a label start, to the fully-qualified suffix beginning there.
    suffixes: HashMap<usize, Name>,
}

impl<'a> NameDecoder<'a> {
    /// Creates a decoder over a complete message buffer.
    #[inline]
    pub fn new(message: &'a [u8]) -> Self {
        Self {
            message,
            suffixes: HashMap::new(),
        }
    }

    /// Returns the message buffer this decoder reads from.
    #[inline]
    pub const fn message(&self) -> &'a [u8] {
        self.message
    }

    /// Decodes the name starting at `offset`.
    ///
    /// Returns the name and the number of bytes it occupies at `offset`
    /// itself (a terminating pointer counts as 2 bytes; targets followed
    /// through pointers are not counted).
    ///
    /// A pointer referring to itself or to any offset at or beyond its own
    /// position is rejected with [`Error::InvalidCompressionPointer`].
    pub fn decode_at(&mut self, offset: usize) -> Result<(Name, usize)> {
        let consumed = self.skip_at(offset)?;

        if let Some(name) = self.suffixes.get(&offset) {
            return Ok((name.clone(), consumed));
        }

        let mut wire = SmallVec::<[u8; 64]>::new();
        // Label starts seen along the walk, paired with where their suffix
        // begins in the assembled wire form.
        let mut starts: SmallVec<[(usize, usize); 8]> = SmallVec::new();
        let mut pos = offset;
        let mut jumps = 0;

        loop {
            if pos >= self.message.len() {
                return Err(Error::unexpected_eof(pos));
            }

            let len_byte = self.message[pos];

            if len_byte >= 0xC0 {
                if pos + 1 >= self.message.len() {
                    return Err(Error::unexpected_eof(pos + 1));
                }

                let target =
                    u16::from_be_bytes([len_byte & 0x3F, self.message[pos + 1]]) as usize;

                // Forward and self references can never be valid compression
                // and are the classic decompression-loop vector.
                if target >= pos {
                    return Err(Error::InvalidCompressionPointer {
                        offset: pos,
                        target,
                    });
                }

                jumps += 1;
                if jumps > MAX_POINTER_JUMPS {
                    return Err(Error::TooManyCompressionJumps {
                        max_jumps: MAX_POINTER_JUMPS,
                    });
                }

                if let Some(suffix) = self.suffixes.get(&target) {
                    let suffix_wire = suffix.as_wire();
                    if wire.len() + suffix_wire.len().max(1) > MAX_NAME_LENGTH {
                        return Err(Error::NameTooLong {
                            length: wire.len() + suffix_wire.len().max(1),
                        });
                    }
                    if suffix_wire.is_empty() {
                        wire.push(0);
                    } else {
                        wire.extend_from_slice(suffix_wire);
                    }
                    break;
                }

                pos = target;
                continue;
            }

            // Extended label types (01/10 high bits) are reserved.
            if len_byte >= 0x40 {
                return Err(Error::invalid_data(
                    pos,
                    format!("invalid label type 0x{len_byte:02X}"),
                ));
            }

            let len = len_byte as usize;

            if len == 0 {
                wire.push(0);
                break;
            }

            if pos + 1 + len > self.message.len() {
                return Err(Error::unexpected_eof(pos + 1 + len));
            }

            if wire.len() + 1 + len > MAX_NAME_LENGTH {
                return Err(Error::NameTooLong {
                    length: wire.len() + 1 + len,
                });
            }

            starts.push((pos, wire.len()));
            wire.push(len_byte);
            wire.extend_from_slice(&self.message[pos + 1..pos + 1 + len]);
            pos += 1 + len;
        }

        let name = Name::from_slice(&wire)?;

        // Every label start along the walk is a valid suffix origin for
        // later pointers; the whole-name entry covers empty first labels.
        for (msg_offset, wire_idx) in starts {
            let suffix = Name::from_slice(&wire[wire_idx..])?;
            self.suffixes.insert(msg_offset, suffix);
        }
        self.suffixes.insert(offset, name.clone());

        Ok((name, consumed))
    }

    /// Returns the number of bytes the name at `offset` occupies in place,
    /// without following pointers.
    fn skip_at(&self, offset: usize) -> Result<usize> {
        let mut pos = offset;

        loop {
            if pos >= self.message.len() {
                return Err(Error::unexpected_eof(pos));
            }

            let len_byte = self.message[pos];

            // A pointer is always 2 bytes and terminates the in-place name.
            if len_byte >= 0xC0 {
                if pos + 1 >= self.message.len() {
                    return Err(Error::unexpected_eof(pos + 1));
                }
                return Ok(pos + 2 - offset);
            }

            if len_byte >= 0x40 {
                return Err(Error::invalid_data(
                    pos,
                    format!("invalid label type 0x{len_byte:02X}"),
                ));
            }

            if len_byte == 0 {
                return Ok(pos + 1 - offset);
            }

            pos += 1 + len_byte as usize;
        }
    }
}
