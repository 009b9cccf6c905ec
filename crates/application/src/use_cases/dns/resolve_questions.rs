use super::chaos::ChaosIdentity;
use super::records::{address_records, ptr_record, reply_to, upstream_request};
use crate::ports::{HostsLookup, NoopMiddleware, QueryMiddleware, UpstreamExchanger};
use dnsproxy_domain::{Authority, DomainError, NetProtocol};
use hickory_proto::op::{Message, Query, ResponseCode};
use hickory_proto::rr::{DNSClass, Name, Record, RecordType};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// TTL on records synthesized from the hosts file
pub const DEFAULT_HOSTS_TTL: u32 = 10;

const IPV4_REVERSE_ZONE: &str = ".in-addr.arpa.";
const IPV6_REVERSE_ZONE: &str = ".ip6.arpa.";

/// Per-question resolution pipeline.
///
/// Stages, first producer wins: middleware, hosts file addresses, hosts file
/// reverse lookup, CHAOS introspection, cached upstream exchange. A failed
/// upstream exchange turns the whole reply into NXDOMAIN and stops at that
/// question.
pub struct ResolveQuestionsUseCase {
    hosts: Arc<dyn HostsLookup>,
    exchanger: Arc<dyn UpstreamExchanger>,
    middleware: Arc<dyn QueryMiddleware>,
    identity: ChaosIdentity,
    hosts_ttl: u32,
}

impl ResolveQuestionsUseCase {
    pub fn new(hosts: Arc<dyn HostsLookup>, exchanger: Arc<dyn UpstreamExchanger>) -> Self {
        Self {
            hosts,
            exchanger,
            middleware: Arc::new(NoopMiddleware),
            identity: ChaosIdentity::default(),
            hosts_ttl: DEFAULT_HOSTS_TTL,
        }
    }

    pub fn with_middleware(mut self, middleware: Arc<dyn QueryMiddleware>) -> Self {
        self.middleware = middleware;
        self
    }

    pub fn with_identity(mut self, identity: ChaosIdentity) -> Self {
        self.identity = identity;
        self
    }

    pub fn with_hosts_ttl(mut self, ttl: u32) -> Self {
        self.hosts_ttl = ttl;
        self
    }

    pub async fn execute(
        &self,
        request: &Message,
        authorities: &[Authority],
        protocol: NetProtocol,
    ) -> Message {
        let mut reply = reply_to(request);

        for query in request.queries() {
            if let Err(e) = self
                .resolve_question(request, query, authorities, protocol, &mut reply)
                .await
            {
                error!(
                    id = request.id(),
                    name = %query.name(),
                    record_type = %query.query_type(),
                    error = %e,
                    "Upstream resolution failed, answering NXDOMAIN"
                );
                reply.set_response_code(ResponseCode::NXDomain);
                break;
            }
        }

        reply
    }

    async fn resolve_question(
        &self,
        request: &Message,
        query: &Query,
        authorities: &[Authority],
        protocol: NetProtocol,
        reply: &mut Message,
    ) -> Result<(), DomainError> {
        if let Some(records) = self.from_middleware(query, protocol).await {
            debug!(id = request.id(), name = %query.name(), "Answered by middleware");
            reply.add_answers(records);
            return Ok(());
        }

        if let Some(records) = self.from_hosts(query) {
            debug!(id = request.id(), name = %query.name(), "Found name in hosts file");
            reply.add_answers(records);
            return Ok(());
        }

        if let Some(record) = self.from_reverse(query) {
            debug!(id = request.id(), name = %query.name(), "Found address in hosts file");
            reply.add_answer(record);
            return Ok(());
        }

        if query.query_class() == DNSClass::CH {
            reply.set_authoritative(true);
            if let Some(record) = self.identity.answer(query) {
                reply.add_answer(record);
            }
            return Ok(());
        }

        let upstream = upstream_request(request, query);
        let response = self
            .exchanger
            .exchange(&upstream, authorities, protocol)
            .await?;

        reply.add_answers(response.answers().iter().cloned());
        reply.add_additionals(response.additionals().iter().cloned());
        Ok(())
    }

    async fn from_middleware(&self, query: &Query, protocol: NetProtocol) -> Option<Vec<Record>> {
        match self.middleware.resolve(query, protocol).await {
            Ok(records) if !records.is_empty() => Some(records),
            Ok(_) => None,
            Err(e) => {
                debug!(name = %query.name(), error = %e, "Middleware declined");
                None
            }
        }
    }

    fn from_hosts(&self, query: &Query) -> Option<Vec<Record>> {
        if !matches!(
            query.query_type(),
            RecordType::A | RecordType::AAAA | RecordType::ANY
        ) {
            return None;
        }

        let ips = self.hosts.find_hosts(&query.name().to_ascii());
        let records = address_records(query, &ips, self.hosts_ttl);
        (!records.is_empty()).then_some(records)
    }

    fn from_reverse(&self, query: &Query) -> Option<Record> {
        if query.query_type() != RecordType::PTR {
            return None;
        }

        let name = query.name().to_ascii().to_ascii_lowercase();
        if !name.ends_with(IPV4_REVERSE_ZONE) && !name.ends_with(IPV6_REVERSE_ZONE) {
            return None;
        }

        let domain = self.hosts.find_reverse(&name)?;
        match Name::from_str(&domain) {
            Ok(target) => Some(ptr_record(query, target, self.hosts_ttl)),
            Err(e) => {
                warn!(domain = %domain, error = %e, "Hosts entry is not a valid DNS name");
                None
            }
        }
    }
}
