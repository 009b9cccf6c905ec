use crate::errors::DomainError;
use crate::fqdn;
use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// An upstream resolver queries may be forwarded to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authority {
    pub address: SocketAddr,
    /// Lowercase, fully qualified. `None` puts the authority in the default tier.
    pub domain_suffix: Option<Arc<str>>,
    pub timeout: Duration,
}

impl Authority {
    pub fn new(address: SocketAddr, domain_suffix: Option<&str>, timeout: Duration) -> Self {
        let domain_suffix = domain_suffix
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| Arc::from(fqdn(&s.to_ascii_lowercase())));

        Self {
            address,
            domain_suffix,
            timeout,
        }
    }

    pub fn is_default(&self) -> bool {
        self.domain_suffix.is_none()
    }

    fn serves(&self, domain: &str) -> bool {
        match &self.domain_suffix {
            Some(suffix) => domain.ends_with(suffix.as_ref()),
            None => false,
        }
    }
}

impl fmt::Display for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.domain_suffix {
            Some(suffix) => write!(f, "{} ({})", self.address, suffix),
            None => write!(f, "{}", self.address),
        }
    }
}

/// Picks the authorities responsible for a domain.
///
/// Every authority whose suffix ends the domain is returned, in configuration
/// order. Only when none matches does the default tier apply. Overlapping
/// suffixes are not ranked against each other; failover order settles it.
#[derive(Debug, Clone)]
pub struct AuthoritySelector {
    authorities: Arc<[Authority]>,
}

impl AuthoritySelector {
    pub fn new(authorities: Vec<Authority>) -> Self {
        Self {
            authorities: authorities.into(),
        }
    }

    pub fn authorities(&self) -> &[Authority] {
        &self.authorities
    }

    pub fn lead_authority(&self, domain: &str) -> Result<Vec<Authority>, DomainError> {
        let domain = fqdn(&domain.to_ascii_lowercase());

        let matching: Vec<Authority> = self
            .authorities
            .iter()
            .filter(|a| a.serves(&domain))
            .cloned()
            .collect();

        if !matching.is_empty() {
            return Ok(matching);
        }

        let defaults: Vec<Authority> = self
            .authorities
            .iter()
            .filter(|a| a.is_default())
            .cloned()
            .collect();

        if defaults.is_empty() {
            return Err(DomainError::NoAuthority(domain));
        }

        Ok(defaults)
    }
}
