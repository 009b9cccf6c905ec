use dnsproxy_domain::HostTable;
use std::net::IpAddr;

/// Read side of the local host table.
pub trait HostsLookup: Send + Sync {
    fn find_hosts(&self, name: &str) -> Vec<IpAddr>;

    /// `name` is a reverse-zone name; returns the fully qualified domain.
    fn find_reverse(&self, name: &str) -> Option<String>;
}

impl HostsLookup for HostTable {
    fn find_hosts(&self, name: &str) -> Vec<IpAddr> {
        HostTable::find_hosts(self, name)
    }

    fn find_reverse(&self, name: &str) -> Option<String> {
        HostTable::find_reverse(self, name)
    }
}
