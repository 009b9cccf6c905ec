use async_trait::async_trait;
use dnsproxy_domain::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    Unchanged,
    Reloaded { entries: usize },
}

#[async_trait]
pub trait HostsReloadPort: Send + Sync {
    /// Re-reads the hosts file if its modification time or size changed.
    ///
    /// On error the previously loaded table stays in place.
    async fn reload_if_changed(&self) -> Result<ReloadOutcome, DomainError>;
}
