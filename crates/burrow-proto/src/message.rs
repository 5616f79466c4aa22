//! Query encoding and response decoding.

use crate::error::{Error, Result};
use crate::header::Header;
use crate::name::{Name, NameDecoder};
use crate::record::ResourceRecord;
use crate::rtype::RecordType;
use crate::wire::WireReader;
use crate::{CLASS_IN, HEADER_LENGTH, MAX_UDP_MESSAGE_SIZE};
use bytes::{Bytes, BytesMut};
use std::fmt;

/// An outgoing query: one question, recursion desired.
///
/// The transaction ID is drawn at construction and never changes, so the
/// same encoded bytes can be resent on retry and the ID compared against
/// replies.
#[derive(Debug, Clone)]
pub struct Query {
    id: u16,
    name: Name,
    rtype: RecordType,
}

impl Query {
    /// Creates a query with a random transaction ID.
    pub fn new(name: Name, rtype: RecordType) -> Self {
        Self {
            id: rand::random(),
            name,
            rtype,
        }
    }

    /// Creates a query with a fixed transaction ID.
    pub fn with_id(id: u16, name: Name, rtype: RecordType) -> Self {
        Self { id, name, rtype }
    }

    /// Returns the transaction ID.
    #[inline]
    pub const fn id(&self) -> u16 {
        self.id
    }

    /// Returns the queried name.
    #[inline]
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Returns the queried type.
    #[inline]
    pub const fn rtype(&self) -> RecordType {
        self.rtype
    }

    /// Encodes the query to wire format.
    ///
    /// The question name is written uncompressed; a single question can
    /// never benefit from compression.
    pub fn encode(&self) -> Result<Bytes> {
        let mut buf = BytesMut::with_capacity(HEADER_LENGTH + self.name.wire_len() + 4);

        Header::query(self.id).write_to(&mut buf);
        self.name.write_wire(&mut buf);
        buf.extend_from_slice(&self.rtype.to_u16().to_be_bytes());
        buf.extend_from_slice(&CLASS_IN.to_be_bytes());

        if buf.len() > MAX_UDP_MESSAGE_SIZE {
            return Err(Error::MessageTooLarge {
                size: buf.len(),
                max_size: MAX_UDP_MESSAGE_SIZE,
            });
        }

        Ok(buf.freeze())
    }
}

/// A decoded response message.
#[derive(Debug, Clone)]
pub struct Response {
    header: Header,
    answers: Vec<ResourceRecord>,
    authority: Vec<ResourceRecord>,
    additional: Vec<ResourceRecord>,
}

/// The outcome of decoding a received datagram.
///
/// Decoding either fully succeeds, rejects the datagram as belonging to a
/// different transaction, or fails partway. In the last case every record
/// decoded before the failure is kept; the records are individually valid
/// even though the message as a whole is not.
#[derive(Debug)]
pub enum DecodeOutcome {
    /// The full message decoded and its ID matched.
    Valid(Response),

    /// The transaction ID did not match; the datagram answers some other
    /// query and carries no usable data for this one.
    Discarded {
        /// The ID we were waiting for.
        expected: u16,
        /// The ID the datagram carried.
        actual: u16,
    },

    /// Decoding failed partway through.
    Malformed {
        /// Records fully decoded before the failure, in message order.
        salvaged: Vec<ResourceRecord>,
        /// The error that stopped decoding.
        error: Error,
    },
}

impl Response {
    /// Decodes a received datagram, checking its transaction ID.
    pub fn decode(data: &[u8], expected_id: u16) -> DecodeOutcome {
        let header = match Header::parse(data) {
            Ok(header) => header,
            Err(error) => {
                return DecodeOutcome::Malformed {
                    salvaged: Vec::new(),
                    error,
                }
            }
        };

        if header.id != expected_id {
            return DecodeOutcome::Discarded {
                expected: expected_id,
                actual: header.id,
            };
        }

        let mut reader = WireReader::new(data);
        reader.set_position(HEADER_LENGTH);
        let mut decoder = NameDecoder::new(data);

        // Question names are decoded (priming the suffix table, which
        // compression pointers in later sections usually target) but the
        // echoed questions themselves are not kept.
        for _ in 0..header.qd_count {
            if let Err(error) = Self::skip_question(&mut reader, &mut decoder) {
                return DecodeOutcome::Malformed {
                    salvaged: Vec::new(),
                    error,
                };
            }
        }

        let counts = [header.an_count, header.ns_count, header.ar_count];
        let mut sections: [Vec<ResourceRecord>; 3] = Default::default();

        for (index, &count) in counts.iter().enumerate() {
            for _ in 0..count {
                match ResourceRecord::decode(&mut reader, &mut decoder) {
                    Ok(record) => sections[index].push(record),
                    Err(error) => {
                        return DecodeOutcome::Malformed {
                            salvaged: sections.into_iter().flatten().collect(),
                            error,
                        }
                    }
                }
            }
        }

        let [answers, authority, additional] = sections;

        DecodeOutcome::Valid(Self {
            header,
            answers,
            authority,
            additional,
        })
    }

    fn skip_question(reader: &mut WireReader<'_>, decoder: &mut NameDecoder<'_>) -> Result<()> {
        let (_, consumed) = decoder.decode_at(reader.position())?;
        reader.advance(consumed)?;
        reader.advance(4) // QTYPE + QCLASS
    }

    /// Returns the message header.
    #[inline]
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Returns the transaction ID.
    #[inline]
    pub fn id(&self) -> u16 {
        self.header.id
    }

    /// Returns true if the responding server is authoritative.
    #[inline]
    pub fn is_authoritative(&self) -> bool {
        self.header.is_authoritative()
    }

    /// Returns the answer section.
    #[inline]
    pub fn answers(&self) -> &[ResourceRecord] {
        &self.answers
    }

    /// Returns the authority section.
    #[inline]
    pub fn authority(&self) -> &[ResourceRecord] {
        &self.authority
    }

    /// Returns the additional section.
    #[inline]
    pub fn additional(&self) -> &[ResourceRecord] {
        &self.additional
    }

    /// Returns the NS records in the authority section: the delegations a
    /// non-authoritative response refers the client to.
    pub fn referrals(&self) -> impl Iterator<Item = &ResourceRecord> {
        self.authority.iter().filter(|record| record.is_ns())
    }

    /// Returns every record in all three sections, in message order.
    pub fn all_records(&self) -> impl Iterator<Item = &ResourceRecord> {
        self.answers
            .iter()
            .chain(self.authority.iter())
            .chain(self.additional.iter())
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, ";; {}", self.header)?;

        for (label, records) in [
            ("ANSWER", &self.answers),
            ("AUTHORITY", &self.authority),
            ("ADDITIONAL", &self.additional),
        ] {
            if records.is_empty() {
                continue;
            }
            writeln!(f, ";; {label}")?;
            for record in records {
                writeln!(f, "{record}")?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdata::RData;
    use std::net::Ipv4Addr;
    use std::str::FromStr;

    fn name(s: &str) -> Name {
        Name::from_str(s).unwrap()
    }

    #[test]
    fn test_query_encode_wire_layout() {
        let query = Query::with_id(0x1234, name("www.example.com."), RecordType::A);
        let wire = query.encode().unwrap();

        #[rustfmt::skip]
        let expected = [
            0x12, 0x34,             // ID
            0x01, 0x00,             // flags: RD only
            0x00, 0x01,             // QDCOUNT
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            3, b'w', b'w', b'w',
            7, b'e', b'x', b'a', b'm', b'p', b'l', b'e',
            3, b'c', b'o', b'm',
            0,
            0x00, 0x01,             // QTYPE A
            0x00, 0x01,             // QCLASS IN
        ];
        assert_eq!(&wire[..], &expected[..]);
    }

    #[test]
    fn test_random_ids_differ() {
        // Not a randomness test, just a guard against a constant ID.
        let ids: Vec<u16> = (0..16)
            .map(|_| Query::new(name("a."), RecordType::A).id())
            .collect();
        assert!(ids.windows(2).any(|pair| pair[0] != pair[1]));
    }

    /// Builds a response: question www.example.com A, one CNAME answer
    /// pointing at a compressed suffix, one A answer for the target.
    fn sample_response(id: u16) -> Vec<u8> {
        #[rustfmt::skip]
        let mut message = vec![
            (id >> 8) as u8, (id & 0xFF) as u8,
            0x84, 0x00,             // QR + AA
            0x00, 0x01,             // QDCOUNT
            0x00, 0x02,             // ANCOUNT
            0x00, 0x00,
            0x00, 0x00,
            // question at offset 12: WWW.example.com (mixed case)
            3, b'W', b'W', b'W',
            7, b'e', b'x', b'a', b'm', b'p', b'l', b'e',
            3, b'c', b'o', b'm',
            0,
            0x00, 0x01, 0x00, 0x01,
        ];

        // CNAME www.example.com -> web.example.com
        message.extend_from_slice(&[0xC0, 12]); // pointer to question name
        message.extend_from_slice(&[0, 5, 0, 1, 0, 0, 1, 0x2C, 0, 6]);
        message.extend_from_slice(&[3, b'w', b'e', b'b', 0xC0, 16]);

        // A web.example.com
        message.extend_from_slice(&[3, b'w', b'e', b'b', 0xC0, 16]);
        message.extend_from_slice(&[0, 1, 0, 1, 0, 0, 0, 0x3C, 0, 4]);
        message.extend_from_slice(&[192, 0, 2, 80]);

        message
    }

    #[test]
    fn test_decode_valid_response() {
        let message = sample_response(0xABCD);
        let response = match Response::decode(&message, 0xABCD) {
            DecodeOutcome::Valid(response) => response,
            other => panic!("expected Valid, got {other:?}"),
        };

        assert!(response.is_authoritative());
        assert_eq!(response.answers().len(), 2);

        let cname = &response.answers()[0];
        // Name equality is case-insensitive; the original casing from the
        // question is preserved through the compression pointer.
        assert_eq!(cname.name(), &name("www.example.com."));
        assert_eq!(cname.name().to_string(), "WWW.example.com.");
        assert_eq!(
            cname.rdata(),
            &RData::Cname(name("web.example.com."))
        );

        let a = &response.answers()[1];
        assert_eq!(a.name(), &name("web.example.com."));
        assert_eq!(a.rdata().as_ipv4(), Some(Ipv4Addr::new(192, 0, 2, 80)));
    }

    #[test]
    fn test_decode_id_mismatch_is_discarded() {
        let message = sample_response(0x1111);
        assert!(matches!(
            Response::decode(&message, 0x2222),
            DecodeOutcome::Discarded {
                expected: 0x2222,
                actual: 0x1111,
            }
        ));
    }

    #[test]
    fn test_decode_truncated_message_salvages_records() {
        let mut message = sample_response(0xABCD);
        // Cut into the final A record's RDATA.
        message.truncate(message.len() - 2);

        match Response::decode(&message, 0xABCD) {
            DecodeOutcome::Malformed { salvaged, error } => {
                assert_eq!(salvaged.len(), 1);
                assert!(salvaged[0].is_cname());
                assert!(error.is_malformed());
            }
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_short_datagram() {
        match Response::decode(&[0xAB], 0xABCD) {
            DecodeOutcome::Malformed { salvaged, error } => {
                assert!(salvaged.is_empty());
                assert!(matches!(error, Error::TruncatedHeader { length: 1 }));
            }
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn test_forward_pointer_rejected() {
        let mut message = sample_response(0xABCD);
        // Redirect the CNAME record's owner-name pointer past itself.
        let pointer_at = 33; // first answer's name pointer
        assert_eq!(message[pointer_at], 0xC0);
        message[pointer_at] = 0xC0 | 0x3F;
        message[pointer_at + 1] = 0xFF; // offset 0x3FFF

        match Response::decode(&message, 0xABCD) {
            DecodeOutcome::Malformed { salvaged, error } => {
                assert!(salvaged.is_empty());
                assert!(matches!(error, Error::InvalidCompressionPointer { .. }));
            }
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn test_referrals_filters_ns() {
        #[rustfmt::skip]
        let mut message = vec![
            0x00, 0x42,
            0x80, 0x00,             // QR, not AA
            0x00, 0x01,
            0x00, 0x00,
            0x00, 0x02,             // NSCOUNT: one NS, one SOA
            0x00, 0x01,             // ARCOUNT: glue
            // question at 12: example.com A
            7, b'e', b'x', b'a', b'm', b'p', b'l', b'e',
            3, b'c', b'o', b'm',
            0,
            0x00, 0x01, 0x00, 0x01,
        ];

        // NS example.com -> ns1.example.com
        message.extend_from_slice(&[0xC0, 12]);
        message.extend_from_slice(&[0, 2, 0, 1, 0, 1, 0x51, 0x80, 0, 6]);
        let ns1_offset = message.len() as u8;
        message.extend_from_slice(&[3, b'n', b's', b'1', 0xC0, 12]);

        // SOA example.com
        message.extend_from_slice(&[0xC0, 12]);
        message.extend_from_slice(&[0, 6, 0, 1, 0, 0, 0, 60, 0, 24]);
        message.extend_from_slice(&[0xC0, ns1_offset]); // MNAME
        message.extend_from_slice(&[0xC0, 12]); // RNAME
        message.extend_from_slice(&[0; 20]);

        // glue: A ns1.example.com
        message.extend_from_slice(&[0xC0, ns1_offset]);
        message.extend_from_slice(&[0, 1, 0, 1, 0, 1, 0x51, 0x80, 0, 4]);
        message.extend_from_slice(&[192, 0, 2, 53]);

        let response = match Response::decode(&message, 0x0042) {
            DecodeOutcome::Valid(response) => response,
            other => panic!("expected Valid, got {other:?}"),
        };

        assert!(!response.is_authoritative());
        let referrals: Vec<_> = response.referrals().collect();
        assert_eq!(referrals.len(), 1);
        assert_eq!(
            referrals[0].rdata().as_name().unwrap(),
            &name("ns1.example.com.")
        );
        assert_eq!(response.additional().len(), 1);
        assert_eq!(
            response.additional()[0].rdata().as_ipv4(),
            Some(Ipv4Addr::new(192, 0, 2, 53))
        );
        assert_eq!(response.all_records().count(), 3);
    }
}
