//! Hosts file parser
//!
//! One entry per line: an address followed by one or more names. `#` starts
//! a comment. A name written as `*.example.com` is a wildcard entry for
//! `example.com` and everything below it.

use super::entry::HostEntry;
use crate::errors::DomainError;
use std::net::IpAddr;

const WILDCARD_PREFIX: &str = "*.";

pub fn parse_hosts(text: &str) -> Result<Vec<HostEntry>, DomainError> {
    let mut entries = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = match raw.find('#') {
            Some(pos) => &raw[..pos],
            None => raw,
        }
        .trim();

        if line.is_empty() {
            continue;
        }

        let mut fields = line.split_whitespace();
        let Some(address) = fields.next() else {
            continue;
        };

        let ip = parse_address(address).ok_or_else(|| DomainError::InvalidHostsFile {
            line: line_no,
            reason: format!("'{}' is not an IP address", address),
        })?;

        let before = entries.len();
        for name in fields {
            entries.push(parse_name(name, ip, line_no)?);
        }

        if entries.len() == before {
            return Err(DomainError::InvalidHostsFile {
                line: line_no,
                reason: format!("no hostname for {}", ip),
            });
        }
    }

    Ok(entries)
}

fn parse_address(field: &str) -> Option<IpAddr> {
    // Scoped IPv6 addresses (fe80::1%eth0) carry an interface we cannot use.
    let address = field.split('%').next().unwrap_or(field);
    address.parse().ok()
}

fn parse_name(field: &str, ip: IpAddr, line_no: usize) -> Result<HostEntry, DomainError> {
    let name = field.trim_end_matches('.').to_ascii_lowercase();

    let (domain, wildcard) = match name.strip_prefix(WILDCARD_PREFIX) {
        Some(rest) => (rest.to_string(), true),
        None => (name, false),
    };

    if domain.is_empty() || domain.starts_with('.') {
        return Err(DomainError::InvalidHostsFile {
            line: line_no,
            reason: format!("invalid hostname '{}'", field),
        });
    }

    Ok(HostEntry::new(domain, ip, wildcard))
}
