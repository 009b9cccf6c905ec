mod chaos;
mod handle_dns_query;
mod records;
mod resolve_questions;

pub use chaos::ChaosIdentity;
pub use handle_dns_query::HandleDnsQueryUseCase;
pub use records::{reply_to, upstream_request, UPSTREAM_MAX_PAYLOAD};
pub use resolve_questions::{ResolveQuestionsUseCase, DEFAULT_HOSTS_TTL};
