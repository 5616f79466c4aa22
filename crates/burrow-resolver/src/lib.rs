//! # Burrow Resolution Engine
//!
//! Iterative (stub-driven) DNS resolution: starting from a configured root
//! server, follow referrals downward and chase CNAME aliases until an
//! answer is found or an indirection bound is exhausted. All results flow
//! through the shared [`burrow_cache::RecordCache`]; resolution returns
//! whatever the cache holds for the query once the walk settles.
//!
//! Datagram I/O goes through the [`Transport`] trait so the engine can be
//! exercised against a scripted transport in tests.

#![warn(missing_docs)]
#![warn(clippy::all)]

use std::time::Duration;

pub mod engine;
pub mod trace;
pub mod transport;

pub use engine::Resolver;
pub use transport::{Transport, TransportError, UdpTransport};

/// Maximum combined depth of CNAME chasing and referral descent for one
/// lookup. Past this the walk is treated as a loop and abandoned.
pub const MAX_INDIRECTION: u8 = 10;

/// Per-attempt receive timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Send attempts per (question, server) transaction.
pub const DEFAULT_ATTEMPTS: u32 = 2;

/// Resolver tuning knobs.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Receive timeout per attempt.
    pub timeout: Duration,

    /// Send attempts per transaction. A received datagram, even a rejected
    /// one, settles the transaction; only a timeout triggers a resend.
    pub attempts: u32,

    /// Combined CNAME/referral depth bound.
    pub max_indirection: u8,

    /// Destination port for queries.
    pub port: u16,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            attempts: DEFAULT_ATTEMPTS,
            max_indirection: MAX_INDIRECTION,
            port: burrow_proto::DNS_PORT,
        }
    }
}
