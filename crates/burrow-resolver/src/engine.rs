//! Iterative resolution engine.
//!
//! One lookup is a walk: ask the root server, cache everything the reply
//! carried, then either answer from the cache, follow a CNAME alias, or
//! descend into a referral. CNAME chasing and referral descent share one
//! depth counter per lookup; when it runs out the walk is abandoned and
//! whatever made it into the cache is the result.

use crate::trace;
use crate::transport::Transport;
use crate::ResolverConfig;
use burrow_cache::RecordCache;
use burrow_proto::{
    DecodeOutcome, Name, Query, RecordType, ResourceRecord, Response, Type, MAX_UDP_MESSAGE_SIZE,
};
use futures::future::BoxFuture;
use futures::FutureExt;
use parking_lot::RwLock;
use std::net::{IpAddr, SocketAddr};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// The resolution engine.
pub struct Resolver {
    config: ResolverConfig,
    cache: Arc<RecordCache>,
    transport: Arc<dyn Transport>,
    root_server: RwLock<IpAddr>,
    verbose: AtomicBool,
}

impl Resolver {
    /// Creates a resolver that starts every walk at `root_server`.
    pub fn new(transport: Arc<dyn Transport>, root_server: IpAddr, config: ResolverConfig) -> Self {
        Self {
            config,
            cache: Arc::new(RecordCache::new()),
            transport,
            root_server: RwLock::new(root_server),
            verbose: AtomicBool::new(false),
        }
    }

    /// Returns the shared record cache.
    pub fn cache(&self) -> &Arc<RecordCache> {
        &self.cache
    }

    /// Returns the current start-of-walk server.
    pub fn root_server(&self) -> IpAddr {
        *self.root_server.read()
    }

    /// Changes the start-of-walk server for subsequent lookups.
    pub fn set_root_server(&self, server: IpAddr) {
        *self.root_server.write() = server;
    }

    /// Enables or disables per-transaction trace output.
    pub fn set_verbose(&self, verbose: bool) {
        self.verbose.store(verbose, Ordering::Relaxed);
    }

    /// Returns true if trace output is enabled.
    pub fn verbose(&self) -> bool {
        self.verbose.load(Ordering::Relaxed)
    }

    /// Resolves a name to its records of the given type.
    ///
    /// Never fails: every per-server problem (timeout, malformed reply,
    /// dead referral) is absorbed and the walk continues elsewhere. An
    /// unresolvable name yields an empty result.
    pub async fn resolve(&self, name: &Name, rtype: RecordType) -> Vec<ResourceRecord> {
        self.resolve_at(name, rtype, 0).await
    }

    /// Cache-first lookup: answer from the cache, chase an alias, or walk
    /// from the root. `depth` is the indirection budget already spent.
    fn resolve_at<'a>(
        &'a self,
        name: &'a Name,
        rtype: RecordType,
        depth: u8,
    ) -> BoxFuture<'a, Vec<ResourceRecord>> {
        async move {
            if depth > self.config.max_indirection {
                warn!(%name, depth, "maximum indirection depth reached, abandoning lookup");
                return Vec::new();
            }

            let cached = self.cache.lookup_records(name, Type::Known(rtype));
            if !cached.is_empty() {
                return cached;
            }

            if let Some(records) = self.chase_cname(name, rtype, depth).await {
                return records;
            }

            let root = self.root_server();
            self.query_server(name, rtype, root, depth).await
        }
        .boxed()
    }

    /// Follows a cached CNAME for `name`, if one exists. Records resolved
    /// for the alias target are re-attributed to `name` and cached, so the
    /// caller's own cache lookup also answers next time.
    ///
    /// The first alias whose target resolves wins. Returns `None` when no
    /// alias produced records, letting the caller fall through to querying
    /// a server for `name` directly.
    async fn chase_cname(
        &self,
        name: &Name,
        rtype: RecordType,
        depth: u8,
    ) -> Option<Vec<ResourceRecord>> {
        if rtype == RecordType::CNAME {
            return None;
        }

        let aliases = self
            .cache
            .lookup_records(name, Type::Known(RecordType::CNAME));

        for alias in &aliases {
            let Some(target) = alias.rdata().as_name() else {
                continue;
            };

            debug!(%name, %target, "following alias");
            let resolved = self.resolve_at(target, rtype, depth + 1).await;
            if resolved.is_empty() {
                continue;
            }

            let mut results = Vec::with_capacity(resolved.len());
            for record in resolved {
                let renamed = record.with_name(name.clone());
                self.cache.insert(renamed.clone());
                results.push(renamed);
            }
            return Some(results);
        }

        None
    }

    /// Asks one server, then answers from the cache, follows an alias the
    /// reply revealed, or descends into its referral.
    fn query_server<'a>(
        &'a self,
        name: &'a Name,
        rtype: RecordType,
        server: IpAddr,
        depth: u8,
    ) -> BoxFuture<'a, Vec<ResourceRecord>> {
        async move {
            if depth > self.config.max_indirection {
                warn!(%name, depth, "maximum indirection depth reached, abandoning lookup");
                return Vec::new();
            }

            let response = self.exchange(name, rtype, server).await;

            let cached = self.cache.lookup_records(name, Type::Known(rtype));
            if !cached.is_empty() {
                return cached;
            }

            if let Some(records) = self.chase_cname(name, rtype, depth).await {
                return records;
            }

            let Some(response) = response else {
                return Vec::new();
            };

            // Referral descent. Glued nameservers (address already in the
            // cache, typically from the additional section) are tried
            // first; servers we would have to resolve ourselves only when
            // every glued one failed.
            let mut unglued = Vec::new();
            for referral in response.referrals() {
                let Some(ns_name) = referral.rdata().as_name() else {
                    continue;
                };

                let glue = self
                    .cache
                    .lookup_records(ns_name, Type::Known(RecordType::A));
                if glue.is_empty() {
                    unglued.push(ns_name.clone());
                    continue;
                }

                for addr in glue.iter().filter_map(|record| record.rdata().as_ip()) {
                    let results = self.query_server(name, rtype, addr, depth + 1).await;
                    if !results.is_empty() {
                        return results;
                    }
                }
            }

            for ns_name in unglued {
                debug!(%ns_name, "resolving unglued nameserver");
                let addresses = self.resolve_at(&ns_name, RecordType::A, depth + 1).await;

                for addr in addresses.iter().filter_map(|record| record.rdata().as_ip()) {
                    let results = self.query_server(name, rtype, addr, depth + 1).await;
                    if !results.is_empty() {
                        return results;
                    }
                }
            }

            Vec::new()
        }
        .boxed()
    }

    /// Runs one query transaction against one server and caches whatever
    /// the reply carried.
    ///
    /// Returns the decoded response, or `None` if the transaction yielded
    /// nothing usable. A datagram that arrives but is rejected (wrong ID,
    /// malformed) still settles the transaction; only a timeout spends
    /// another send attempt. Records salvaged from a malformed reply are
    /// cached even though `None` is returned.
    async fn exchange(&self, name: &Name, rtype: RecordType, server: IpAddr) -> Option<Response> {
        let query = Query::new(name.clone(), rtype);
        let wire = match query.encode() {
            Ok(wire) => wire,
            Err(error) => {
                warn!(%name, %error, "failed to encode query");
                return None;
            }
        };

        let addr = SocketAddr::new(server, self.config.port);
        let mut buf = [0u8; MAX_UDP_MESSAGE_SIZE];

        for attempt in 0..self.config.attempts {
            if self.verbose() {
                trace::print_query(&query, server);
            }

            if let Err(error) = self.transport.send(&wire, addr).await {
                warn!(%server, %error, "send failed");
                return None;
            }

            let len = match self.transport.receive(&mut buf).await {
                Ok(len) => len,
                Err(error) if error.is_timeout() => {
                    debug!(%server, attempt, "receive timed out");
                    continue;
                }
                Err(error) => {
                    warn!(%server, %error, "receive failed");
                    return None;
                }
            };

            match Response::decode(&buf[..len], query.id()) {
                DecodeOutcome::Valid(response) => {
                    if self.verbose() {
                        trace::print_response(&response);
                    }
                    for record in response.all_records() {
                        self.cache.insert(record.clone());
                    }
                    return Some(response);
                }
                DecodeOutcome::Discarded { expected, actual } => {
                    debug!(%server, expected, actual, "discarding response for another transaction");
                    return None;
                }
                DecodeOutcome::Malformed { salvaged, error } => {
                    debug!(%server, %error, salvaged = salvaged.len(), "malformed response");
                    for record in salvaged {
                        self.cache.insert(record);
                    }
                    return None;
                }
            }
        }

        debug!(%server, attempts = self.config.attempts, "no response from server");
        None
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("config", &self.config)
            .field("root_server", &self.root_server())
            .field("cache_entries", &self.cache.len())
            .finish_non_exhaustive()
    }
}
