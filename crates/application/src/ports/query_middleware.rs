use async_trait::async_trait;
use dnsproxy_domain::{DomainError, NetProtocol};
use hickory_proto::op::Query;
use hickory_proto::rr::Record;

/// First stage of the resolution pipeline.
///
/// Returning records answers the question; an empty list or an error lets the
/// rest of the pipeline handle it.
#[async_trait]
pub trait QueryMiddleware: Send + Sync {
    async fn resolve(
        &self,
        query: &Query,
        protocol: NetProtocol,
    ) -> Result<Vec<Record>, DomainError>;
}

pub struct NoopMiddleware;

#[async_trait]
impl QueryMiddleware for NoopMiddleware {
    async fn resolve(
        &self,
        _query: &Query,
        _protocol: NetProtocol,
    ) -> Result<Vec<Record>, DomainError> {
        Ok(Vec::new())
    }
}
