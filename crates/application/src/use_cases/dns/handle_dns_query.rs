use super::resolve_questions::ResolveQuestionsUseCase;
use dnsproxy_domain::{AuthoritySelector, DomainError, NetProtocol};
use hickory_proto::op::Message;
use std::sync::Arc;
use tracing::debug;

/// Resolves every question of an inbound message against the authorities
/// selected by its first question.
pub struct HandleDnsQueryUseCase {
    selector: Arc<AuthoritySelector>,
    resolver: Arc<ResolveQuestionsUseCase>,
}

impl HandleDnsQueryUseCase {
    pub fn new(selector: Arc<AuthoritySelector>, resolver: Arc<ResolveQuestionsUseCase>) -> Self {
        Self { selector, resolver }
    }

    pub async fn execute(
        &self,
        request: &Message,
        protocol: NetProtocol,
    ) -> Result<Message, DomainError> {
        let first = request.queries().first().ok_or(DomainError::EmptyQuestion)?;
        let domain = first.name().to_ascii();

        let authorities = self.selector.lead_authority(&domain)?;
        debug!(
            id = request.id(),
            domain = %domain,
            protocol = %protocol,
            authorities = authorities.len(),
            "Selected authorities"
        );

        Ok(self
            .resolver
            .execute(request, &authorities, protocol)
            .await)
    }
}
