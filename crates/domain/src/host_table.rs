pub mod entry;
pub mod parser;
pub mod reverse;

pub use entry::HostEntry;
pub use reverse::reverse_name;

use crate::errors::DomainError;
use crate::fqdn;
use std::net::IpAddr;

/// Immutable snapshot of a hosts file.
///
/// A reload builds a new table and replaces the old one as a whole.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostTable {
    entries: Vec<HostEntry>,
}

impl HostTable {
    pub fn new(entries: Vec<HostEntry>) -> Self {
        Self { entries }
    }

    pub fn parse(text: &str) -> Result<Self, DomainError> {
        parser::parse_hosts(text).map(Self::new)
    }

    pub fn entries(&self) -> &[HostEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact entries win; otherwise the longest wildcard domain covering `name`.
    pub fn find_hosts(&self, name: &str) -> Vec<IpAddr> {
        let name = normalize(name);

        let exact = collect_ips(
            self.entries
                .iter()
                .filter(|e| !e.wildcard && e.domain == name),
        );
        if !exact.is_empty() {
            return exact;
        }

        let best = self
            .entries
            .iter()
            .filter(|e| e.wildcard && e.covers(&name))
            .map(|e| e.domain.len())
            .max();

        match best {
            Some(len) => collect_ips(
                self.entries
                    .iter()
                    .filter(|e| e.wildcard && e.domain.len() == len && e.covers(&name)),
            ),
            None => Vec::new(),
        }
    }

    /// Domain (fully qualified) of the first entry whose address reverses to `name`.
    pub fn find_reverse(&self, name: &str) -> Option<String> {
        let name = fqdn(&name.to_ascii_lowercase());

        self.entries
            .iter()
            .find(|e| reverse_name(e.ip) == name)
            .map(|e| fqdn(&e.domain))
    }
}

fn normalize(name: &str) -> String {
    name.trim_end_matches('.').to_ascii_lowercase()
}

fn collect_ips<'a>(entries: impl Iterator<Item = &'a HostEntry>) -> Vec<IpAddr> {
    let mut ips: Vec<IpAddr> = Vec::new();
    for entry in entries {
        if !ips.contains(&entry.ip) {
            ips.push(entry.ip);
        }
    }
    ips
}
