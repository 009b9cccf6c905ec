#![allow(dead_code)]

mod mock_ports;

pub use mock_ports::*;

use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{DNSClass, Name, RecordType};

pub fn question(name: &str, record_type: RecordType) -> Query {
    Query::query(Name::from_ascii(name).unwrap(), record_type)
}

pub fn chaos_question(name: &str) -> Query {
    let mut query = question(name, RecordType::TXT);
    query.set_query_class(DNSClass::CH);
    query
}

pub fn request(queries: Vec<Query>) -> Message {
    let mut message = Message::new();
    message
        .set_id(4242)
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(true);
    for query in queries {
        message.add_query(query);
    }
    message
}
