//! Test doubles: a scripted transport and a reply builder.

use async_trait::async_trait;
use burrow_proto::Name;
use burrow_resolver::{Transport, TransportError};
use bytes::BytesMut;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

type ReplyFn = Box<dyn Fn(&[u8]) -> Option<Vec<u8>> + Send>;

/// A transport that answers each send from a scripted queue of reply
/// builders. Each builder sees the sent datagram (so it can echo the
/// transaction ID) and returns the reply, or `None` to simulate a lost
/// datagram: the following receive then reports a timeout.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<ReplyFn>>,
    pending: Mutex<Option<Vec<u8>>>,
    sent: Mutex<Vec<(Vec<u8>, SocketAddr)>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a reply builder for the next unanswered send.
    pub fn reply(self, build: impl Fn(&[u8]) -> Option<Vec<u8>> + Send + 'static) -> Self {
        self.replies.lock().push_back(Box::new(build));
        self
    }

    /// Queues a dropped datagram.
    pub fn drop_next(self) -> Self {
        self.reply(|_| None)
    }

    /// Returns the addresses queried so far, in order.
    pub fn sent_addrs(&self) -> Vec<SocketAddr> {
        self.sent.lock().iter().map(|(_, addr)| *addr).collect()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, payload: &[u8], server: SocketAddr) -> Result<(), TransportError> {
        self.sent.lock().push((payload.to_vec(), server));

        let reply = self
            .replies
            .lock()
            .pop_front()
            .and_then(|build| build(payload));
        *self.pending.lock() = reply;
        Ok(())
    }

    async fn receive(&self, buf: &mut [u8]) -> Result<usize, TransportError> {
        match self.pending.lock().take() {
            Some(reply) => {
                buf[..reply.len()].copy_from_slice(&reply);
                Ok(reply.len())
            }
            None => Err(TransportError::Timeout {
                after: Duration::ZERO,
            }),
        }
    }
}

/// Builds a reply to a sent query: echoes the request's header and
/// question, sets the response bit, and appends records with uncompressed
/// names. Section counts are patched in `build`.
pub struct Reply {
    buf: BytesMut,
    an: u16,
    ns: u16,
    ar: u16,
}

impl Reply {
    /// Starts a reply to the given request datagram.
    pub fn to(request: &[u8]) -> Self {
        let mut buf = BytesMut::from(request);
        buf[2] |= 0x80; // QR
        Self {
            buf,
            an: 0,
            ns: 0,
            ar: 0,
        }
    }

    pub fn authoritative(mut self) -> Self {
        self.buf[2] |= 0x04; // AA
        self
    }

    pub fn answer_a(mut self, owner: &str, ttl: u32, addr: [u8; 4]) -> Self {
        self.an += 1;
        self.record(owner, 1, ttl, &addr);
        self
    }

    pub fn answer_cname(mut self, owner: &str, ttl: u32, target: &str) -> Self {
        self.an += 1;
        let rdata = name_wire(target);
        self.record(owner, 5, ttl, &rdata);
        self
    }

    pub fn authority_ns(mut self, zone: &str, ttl: u32, ns: &str) -> Self {
        self.ns += 1;
        let rdata = name_wire(ns);
        self.record(zone, 2, ttl, &rdata);
        self
    }

    pub fn additional_a(mut self, owner: &str, ttl: u32, addr: [u8; 4]) -> Self {
        self.ar += 1;
        self.record(owner, 1, ttl, &addr);
        self
    }

    fn record(&mut self, owner: &str, rtype: u16, ttl: u32, rdata: &[u8]) {
        let owner = Name::from_str(owner).expect("valid owner name");
        owner.write_wire(&mut self.buf);
        self.buf.extend_from_slice(&rtype.to_be_bytes());
        self.buf.extend_from_slice(&1u16.to_be_bytes()); // IN
        self.buf.extend_from_slice(&ttl.to_be_bytes());
        self.buf
            .extend_from_slice(&(rdata.len() as u16).to_be_bytes());
        self.buf.extend_from_slice(rdata);
    }

    pub fn build(mut self) -> Vec<u8> {
        self.buf[6..8].copy_from_slice(&self.an.to_be_bytes());
        self.buf[8..10].copy_from_slice(&self.ns.to_be_bytes());
        self.buf[10..12].copy_from_slice(&self.ar.to_be_bytes());
        self.buf.to_vec()
    }
}

fn name_wire(s: &str) -> Vec<u8> {
    let name = Name::from_str(s).expect("valid name");
    let mut buf = BytesMut::new();
    name.write_wire(&mut buf);
    buf.to_vec()
}
