use async_trait::async_trait;
use dnsproxy_application::ports::{QueryMiddleware, UpstreamExchanger};
use dnsproxy_domain::{Authority, DomainError, NetProtocol};
use hickory_proto::op::{Message, MessageType, Query, ResponseCode};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{Name, RData, Record};
use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::{Arc, Mutex};

pub struct ExchangeCall {
    pub request: Message,
    pub authorities: Vec<Authority>,
    pub protocol: NetProtocol,
}

/// Upstream that answers from a table keyed by lowercase question name.
pub struct MockExchanger {
    responses: Mutex<HashMap<String, Result<Message, DomainError>>>,
    calls: Mutex<Vec<ExchangeCall>>,
}

impl MockExchanger {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn set_a_response(&self, name: &str, ip: Ipv4Addr) {
        let mut response = Message::new();
        response
            .set_message_type(MessageType::Response)
            .set_response_code(ResponseCode::NoError);
        response.add_answer(Record::from_rdata(
            Name::from_ascii(name).unwrap(),
            300,
            RData::A(A(ip)),
        ));
        self.set_response(name, response);
    }

    pub fn set_response(&self, name: &str, response: Message) {
        self.responses
            .lock()
            .unwrap()
            .insert(name.to_ascii_lowercase(), Ok(response));
    }

    pub fn set_error(&self, name: &str, error: DomainError) {
        self.responses
            .lock()
            .unwrap()
            .insert(name.to_ascii_lowercase(), Err(error));
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn take_calls(&self) -> Vec<ExchangeCall> {
        std::mem::take(&mut *self.calls.lock().unwrap())
    }
}

#[async_trait]
impl UpstreamExchanger for MockExchanger {
    async fn exchange(
        &self,
        request: &Message,
        authorities: &[Authority],
        protocol: NetProtocol,
    ) -> Result<Arc<Message>, DomainError> {
        self.calls.lock().unwrap().push(ExchangeCall {
            request: request.clone(),
            authorities: authorities.to_vec(),
            protocol,
        });

        let name = request.queries()[0].name().to_ascii().to_ascii_lowercase();
        match self.responses.lock().unwrap().get(&name) {
            Some(Ok(response)) => Ok(Arc::new(response.clone())),
            Some(Err(e)) => Err(e.clone()),
            None => Err(DomainError::TransportTimeout {
                server: "mock".to_string(),
            }),
        }
    }
}

/// Middleware answering a single name with a fixed address.
pub struct MockMiddleware {
    pub name: String,
    pub ip: Ipv4Addr,
    pub calls: Mutex<Vec<NetProtocol>>,
}

impl MockMiddleware {
    pub fn new(name: &str, ip: Ipv4Addr) -> Self {
        Self {
            name: name.to_string(),
            ip,
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl QueryMiddleware for MockMiddleware {
    async fn resolve(
        &self,
        query: &Query,
        protocol: NetProtocol,
    ) -> Result<Vec<Record>, DomainError> {
        self.calls.lock().unwrap().push(protocol);
        if query.name().to_ascii() == self.name {
            Ok(vec![Record::from_rdata(
                query.name().clone(),
                1,
                RData::A(A(self.ip)),
            )])
        } else {
            Ok(Vec::new())
        }
    }
}

pub struct FailingMiddleware;

#[async_trait]
impl QueryMiddleware for FailingMiddleware {
    async fn resolve(
        &self,
        _query: &Query,
        _protocol: NetProtocol,
    ) -> Result<Vec<Record>, DomainError> {
        Err(DomainError::InvalidDnsMessage("rejected".to_string()))
    }
}
