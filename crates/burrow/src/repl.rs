//! Line-oriented command interpreter.
//!
//! Reads commands from stdin until `quit` or EOF. Malformed input prints a
//! hint and the loop continues; nothing the user types can terminate the
//! process other than the quit commands.

use anyhow::Result;
use burrow_proto::{Name, RecordType, ResourceRecord};
use burrow_resolver::Resolver;
use console::style;
use std::io::{BufRead, Write};
use std::net::IpAddr;
use std::str::FromStr;
use tokio::runtime::Runtime;

const PROMPT: &str = "BURROW> ";

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Lookup { name: Name, rtype: RecordType },
    Server(IpAddr),
    Trace(bool),
    Dump,
    Help,
    Quit,
}

/// Parses one input line. `Ok(None)` means there is nothing to do (blank
/// line or comment); `Err` carries the hint to print.
fn parse_command(line: &str) -> std::result::Result<Option<Command>, String> {
    // A '#' starts a comment that runs to the end of the line
    let line = line.split('#').next().unwrap_or_default().trim();
    if line.is_empty() {
        return Ok(None);
    }

    let mut words = line.split_whitespace();
    let command = words.next().unwrap_or_default();

    let parsed = match command.to_ascii_lowercase().as_str() {
        "lookup" | "l" => {
            let name = words
                .next()
                .ok_or_else(|| "usage: lookup HOSTNAME [TYPE]".to_string())?;
            let name = Name::from_str(name).map_err(|error| format!("bad hostname: {error}"))?;

            let rtype = match words.next() {
                Some(rtype) => RecordType::from_str(rtype)
                    .map_err(|_| format!("unknown record type: {rtype}"))?,
                None => RecordType::A,
            };

            Command::Lookup { name, rtype }
        }
        "server" => {
            let server = words
                .next()
                .ok_or_else(|| "usage: server IP".to_string())?;
            let server = server
                .parse()
                .map_err(|_| format!("not an IP address: {server}"))?;
            Command::Server(server)
        }
        "trace" => match words.next() {
            Some("on") => Command::Trace(true),
            Some("off") => Command::Trace(false),
            _ => return Err("usage: trace on|off".to_string()),
        },
        "dump" => Command::Dump,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command: {other} (try 'help')")),
    };

    if words.next().is_some() {
        return Err(format!("too many arguments for '{command}'"));
    }

    Ok(Some(parsed))
}

/// Runs the interpreter loop to completion.
pub fn run(runtime: &Runtime, resolver: &Resolver) -> Result<()> {
    let attended = console::user_attended();
    let stdin = std::io::stdin();
    let mut line = String::new();

    loop {
        if attended {
            print!("{PROMPT}");
            std::io::stdout().flush()?;
        }

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(hint) => {
                println!("{}", style(hint).yellow());
                continue;
            }
        };

        match command {
            Command::Lookup { name, rtype } => {
                let results = runtime.block_on(resolver.resolve(&name, rtype));
                print_results(&name, rtype, &results);
            }
            Command::Server(server) => {
                resolver.set_root_server(server);
                println!("root server is now {server}");
            }
            Command::Trace(enabled) => {
                resolver.set_verbose(enabled);
                println!("tracing {}", if enabled { "on" } else { "off" });
            }
            Command::Dump => print_dump(resolver),
            Command::Help => print_help(),
            Command::Quit => break,
        }
    }

    println!("Goodbye!");
    Ok(())
}

fn print_results(name: &Name, rtype: RecordType, results: &[ResourceRecord]) {
    if results.is_empty() {
        println!("no results for {name} {}", rtype.name());
        return;
    }

    for record in results {
        println!(
            "{:<30} {:<5} {:<8} {}",
            record.name().to_string(),
            record.rtype().to_string(),
            record.ttl(),
            record.rdata()
        );
    }
}

fn print_dump(resolver: &Resolver) {
    let cache = resolver.cache();

    let mut entries: Vec<(Name, u16, Vec<ResourceRecord>)> = Vec::new();
    cache.for_each(|key, records| {
        entries.push((key.name().clone(), key.rtype().to_u16(), records.to_vec()));
    });
    entries.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));

    for (_, _, records) in &entries {
        for record in records {
            println!(
                "{:<30} {:<5} {:<8} {}",
                record.name().to_string(),
                record.rtype().to_string(),
                record.ttl(),
                record.rdata()
            );
        }
    }

    let stats = cache.stats();
    println!(
        "{} keys, {} hits, {} misses ({:.0}% hit rate)",
        cache.len(),
        stats.hits(),
        stats.misses(),
        stats.hit_rate() * 100.0
    );
}

fn print_help() {
    println!("commands:");
    println!("  lookup HOSTNAME [TYPE]   resolve a name (alias: l); TYPE defaults to A");
    println!("  server IP                change the root server for subsequent lookups");
    println!("  trace on|off             toggle verbose query/response tracing");
    println!("  dump                     print the cache contents and hit statistics");
    println!("  quit | exit              leave");
    println!("lines starting with # are ignored");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lookup_defaults_to_a() {
        let command = parse_command("lookup www.example.com").unwrap().unwrap();
        assert_eq!(
            command,
            Command::Lookup {
                name: Name::from_str("www.example.com").unwrap(),
                rtype: RecordType::A,
            }
        );
    }

    #[test]
    fn test_parse_lookup_alias_and_type() {
        let command = parse_command("l example.com MX").unwrap().unwrap();
        assert_eq!(
            command,
            Command::Lookup {
                name: Name::from_str("example.com").unwrap(),
                rtype: RecordType::MX,
            }
        );
    }

    #[test]
    fn test_parse_blank_and_comment() {
        assert_eq!(parse_command("").unwrap(), None);
        assert_eq!(parse_command("   ").unwrap(), None);
        assert_eq!(parse_command("# a comment").unwrap(), None);
    }

    #[test]
    fn test_parse_trailing_comment() {
        let command = parse_command("lookup example.com # the usual").unwrap().unwrap();
        assert_eq!(
            command,
            Command::Lookup {
                name: Name::from_str("example.com").unwrap(),
                rtype: RecordType::A,
            }
        );

        // Comment text never counts as extra arguments
        let command = parse_command("dump# cache contents").unwrap().unwrap();
        assert_eq!(command, Command::Dump);
    }

    #[test]
    fn test_parse_server() {
        let command = parse_command("server 198.41.0.4").unwrap().unwrap();
        assert_eq!(command, Command::Server("198.41.0.4".parse().unwrap()));

        let command = parse_command("server 2001:503:ba3e::2:30").unwrap().unwrap();
        assert!(matches!(command, Command::Server(IpAddr::V6(_))));
    }

    #[test]
    fn test_parse_trace() {
        assert_eq!(parse_command("trace on").unwrap().unwrap(), Command::Trace(true));
        assert_eq!(parse_command("trace off").unwrap().unwrap(), Command::Trace(false));
        assert!(parse_command("trace sideways").is_err());
    }

    #[test]
    fn test_parse_errors_do_not_panic() {
        assert!(parse_command("lookup").is_err());
        assert!(parse_command("lookup example.com TXT").is_err());
        assert!(parse_command("server not-an-ip").is_err());
        assert!(parse_command("frobnicate").is_err());
        assert!(parse_command("dump extra").is_err());
    }

    #[test]
    fn test_parse_quit_variants() {
        assert_eq!(parse_command("quit").unwrap().unwrap(), Command::Quit);
        assert_eq!(parse_command("exit").unwrap().unwrap(), Command::Quit);
        assert_eq!(parse_command("QUIT").unwrap().unwrap(), Command::Quit);
    }
}
