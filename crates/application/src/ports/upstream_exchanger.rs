use async_trait::async_trait;
use dnsproxy_domain::{Authority, DomainError, NetProtocol};
use hickory_proto::op::Message;
use std::sync::Arc;

#[async_trait]
pub trait UpstreamExchanger: Send + Sync {
    /// Sends `request` to the given authorities, most preferred first.
    async fn exchange(
        &self,
        request: &Message,
        authorities: &[Authority],
        protocol: NetProtocol,
    ) -> Result<Arc<Message>, DomainError>;
}
