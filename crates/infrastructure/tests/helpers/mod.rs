#![allow(dead_code)]

mod dns_server_mock;
mod mock_client;

pub use dns_server_mock::{MockBehavior, MockDnsServer};
pub use mock_client::{MockUpstreamClient, Scripted};

use dnsproxy_domain::Authority;
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{Name, RData, RecordType};
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

pub fn authority(addr: &str, timeout_ms: u64) -> Authority {
    Authority::new(addr.parse().unwrap(), None, Duration::from_millis(timeout_ms))
}

pub fn suffix_authority(addr: &str, suffix: &str) -> Authority {
    Authority::new(addr.parse().unwrap(), Some(suffix), Duration::from_secs(1))
}

pub fn addr(s: &str) -> SocketAddr {
    s.parse().unwrap()
}

pub fn query_message(id: u16, name: &str, record_type: RecordType) -> Message {
    let mut message = Message::new();
    message
        .set_id(id)
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(true);
    message.add_query(Query::query(Name::from_ascii(name).unwrap(), record_type));
    message
}

pub fn answer_ips(message: &Message) -> Vec<IpAddr> {
    message
        .answers()
        .iter()
        .filter_map(|r| r.data().and_then(RData::ip_addr))
        .collect()
}
