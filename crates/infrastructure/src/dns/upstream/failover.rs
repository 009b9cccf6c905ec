use super::client::UpstreamClient;
use async_trait::async_trait;
use dnsproxy_application::ports::UpstreamExchanger;
use dnsproxy_domain::{Authority, DomainError, NetProtocol};
use hickory_proto::op::{Message, ResponseCode};
use std::sync::Arc;
use tracing::{debug, warn};

/// Sequential failover across an ordered authority list.
///
/// Starts at the first authority on every call and makes at most
/// `authorities.len() + 1` attempts, wrapping around after the last one.
pub struct FailoverExchanger {
    client: Arc<dyn UpstreamClient>,
}

impl FailoverExchanger {
    pub fn new(client: Arc<dyn UpstreamClient>) -> Self {
        Self { client }
    }

    async fn attempt(
        &self,
        request: &Message,
        authority: &Authority,
        protocol: NetProtocol,
    ) -> Result<Message, DomainError> {
        match tokio::time::timeout(
            authority.timeout,
            self.client.exchange(request, authority, protocol),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(DomainError::TransportTimeout {
                server: authority.address.to_string(),
            }),
        }
    }
}

/// Response codes that end failover: the authority gave a definitive answer.
pub fn is_terminal(code: ResponseCode) -> bool {
    matches!(
        code,
        ResponseCode::NoError
            | ResponseCode::NXDomain
            | ResponseCode::FormErr
            | ResponseCode::Refused
            | ResponseCode::NotImp
    )
}

#[async_trait]
impl UpstreamExchanger for FailoverExchanger {
    async fn exchange(
        &self,
        request: &Message,
        authorities: &[Authority],
        protocol: NetProtocol,
    ) -> Result<Arc<Message>, DomainError> {
        if authorities.is_empty() {
            let domain = request
                .queries()
                .first()
                .map(|q| q.name().to_ascii())
                .unwrap_or_default();
            return Err(DomainError::NoAuthority(domain));
        }

        let max_attempts = authorities.len() + 1;
        let mut cursor = 0;
        let mut attempt = 1;

        loop {
            let authority = &authorities[cursor];
            let result = self.attempt(request, authority, protocol).await;

            let retry = match &result {
                Ok(response) if is_terminal(response.response_code()) => {
                    debug!(
                        server = %authority.address,
                        attempt = attempt,
                        code = %response.response_code(),
                        "Authority responded"
                    );
                    false
                }
                Ok(response) => {
                    warn!(
                        server = %authority.address,
                        attempt = attempt,
                        code = %response.response_code(),
                        "Non-terminal response, failing over"
                    );
                    true
                }
                Err(e) => {
                    warn!(
                        server = %authority.address,
                        attempt = attempt,
                        error = %e,
                        "Exchange failed, failing over"
                    );
                    true
                }
            };

            if !retry || attempt == max_attempts {
                return result.map(Arc::new);
            }

            attempt += 1;
            cursor = (cursor + 1) % authorities.len();
        }
    }
}
