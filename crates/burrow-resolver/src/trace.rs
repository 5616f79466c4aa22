//! Human-readable query/response tracing.
//!
//! When tracing is enabled the engine prints every transaction to stdout
//! as dig-style `;;` comment lines, one block per query/response pair.
//! This is user-facing output, deliberately separate from the `tracing`
//! diagnostic logs and unaffected by the log level.

use burrow_proto::{Query, Response, ResourceRecord};
use std::net::IpAddr;

/// Prints the query line for a transaction. Repeated on resend.
pub fn print_query(query: &Query, server: IpAddr) {
    println!();
    println!(
        ";; query id {} {} {} --> {}",
        query.id(),
        query.name(),
        query.rtype().name(),
        server
    );
}

/// Prints a decoded response: header line plus all three sections.
pub fn print_response(response: &Response) {
    println!(
        ";; response id {} authoritative = {}",
        response.id(),
        response.is_authoritative()
    );

    print_section("ANSWER", response.answers());
    print_section("AUTHORITY", response.authority());
    print_section("ADDITIONAL", response.additional());
}

fn print_section(label: &str, records: &[ResourceRecord]) {
    println!(";; {} ({})", label, records.len());
    for record in records {
        println!(
            ";;   {:<30} {:<10} {:<5} {}",
            record.name().to_string(),
            record.ttl(),
            record.rtype().to_string(),
            record.rdata()
        );
    }
}
