use std::net::IpAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEntry {
    /// Lowercase, without the trailing dot
    pub domain: String,

    pub ip: IpAddr,

    /// Matches `domain` and every name below it
    pub wildcard: bool,
}

impl HostEntry {
    pub fn new(domain: impl Into<String>, ip: IpAddr, wildcard: bool) -> Self {
        Self {
            domain: domain.into(),
            ip,
            wildcard,
        }
    }

    /// `name` must already be lowercase and stripped of its trailing dot.
    pub(crate) fn covers(&self, name: &str) -> bool {
        match name.strip_suffix(self.domain.as_str()) {
            Some(rest) => rest.is_empty() || rest.ends_with('.'),
            None => false,
        }
    }
}
