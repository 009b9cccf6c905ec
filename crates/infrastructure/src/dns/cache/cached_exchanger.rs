use super::response_cache::ResponseCache;
use async_trait::async_trait;
use dnsproxy_application::ports::UpstreamExchanger;
use dnsproxy_domain::{Authority, DomainError, NetProtocol};
use hickory_proto::op::{Message, Query};
use std::sync::Arc;
use std::time::Duration;

/// Routes single-question exchanges through a [`ResponseCache`].
pub struct CachedExchanger {
    inner: Arc<dyn UpstreamExchanger>,
    cache: Arc<ResponseCache<Arc<Message>>>,
    ttl: Duration,
}

impl CachedExchanger {
    pub fn new(
        inner: Arc<dyn UpstreamExchanger>,
        cache: Arc<ResponseCache<Arc<Message>>>,
        ttl: Duration,
    ) -> Self {
        Self { inner, cache, ttl }
    }

    pub fn cache(&self) -> &Arc<ResponseCache<Arc<Message>>> {
        &self.cache
    }
}

/// `question:<protocol>:<name>:<type>:<class>`, name lowercased.
pub fn cache_key(query: &Query, protocol: NetProtocol) -> String {
    format!(
        "question:{}:{}:{}:{}",
        protocol,
        query.name().to_ascii().to_ascii_lowercase(),
        query.query_type(),
        query.query_class()
    )
}

#[async_trait]
impl UpstreamExchanger for CachedExchanger {
    async fn exchange(
        &self,
        request: &Message,
        authorities: &[Authority],
        protocol: NetProtocol,
    ) -> Result<Arc<Message>, DomainError> {
        let Some(query) = request.queries().first() else {
            return self.inner.exchange(request, authorities, protocol).await;
        };

        let key = cache_key(query, protocol);
        self.cache
            .fetch(&key, self.ttl, || {
                self.inner.exchange(request, authorities, protocol)
            })
            .await
    }
}
