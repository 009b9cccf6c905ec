use hickory_proto::op::{Edns, Message, MessageType, Query, ResponseCode};
use hickory_proto::rr::rdata::{A, AAAA, PTR};
use hickory_proto::rr::{Name, RData, Record, RecordType};
use std::net::IpAddr;

/// EDNS0 payload size advertised on forwarded queries
pub const UPSTREAM_MAX_PAYLOAD: u16 = 4096;

/// Empty reply carrying the request's id, opcode, flags and questions.
pub fn reply_to(request: &Message) -> Message {
    let mut reply = Message::new();
    reply
        .set_id(request.id())
        .set_message_type(MessageType::Response)
        .set_op_code(request.op_code())
        .set_recursion_desired(request.recursion_desired())
        .set_recursion_available(true)
        .set_checking_disabled(request.checking_disabled())
        .set_response_code(ResponseCode::NoError);
    reply.add_queries(request.queries().iter().cloned());
    reply
}

/// Single-question copy of `request` for forwarding.
///
/// Recursion desired is cleared and an EDNS0 OPT with the DO bit is attached.
pub fn upstream_request(request: &Message, query: &Query) -> Message {
    let mut upstream = Message::new();
    upstream
        .set_id(fastrand::u16(..))
        .set_message_type(MessageType::Query)
        .set_op_code(request.op_code())
        .set_recursion_desired(false)
        .set_checking_disabled(request.checking_disabled());
    upstream.add_query(query.clone());

    let mut edns = Edns::new();
    edns.set_max_payload(UPSTREAM_MAX_PAYLOAD);
    edns.set_dnssec_ok(true);
    upstream.set_edns(edns);

    upstream
}

/// A/AAAA records for `ips` that the question type asks for.
pub(crate) fn address_records(query: &Query, ips: &[IpAddr], ttl: u32) -> Vec<Record> {
    let query_type = query.query_type();
    let wants_v4 = matches!(query_type, RecordType::A | RecordType::ANY);
    let wants_v6 = matches!(query_type, RecordType::AAAA | RecordType::ANY);

    ips.iter()
        .filter_map(|ip| match ip {
            IpAddr::V4(v4) if wants_v4 => Some(RData::A(A(*v4))),
            IpAddr::V6(v6) if wants_v6 => Some(RData::AAAA(AAAA(*v6))),
            _ => None,
        })
        .map(|rdata| Record::from_rdata(query.name().clone(), ttl, rdata))
        .collect()
}

pub(crate) fn ptr_record(query: &Query, target: Name, ttl: u32) -> Record {
    Record::from_rdata(query.name().clone(), ttl, RData::PTR(PTR(target)))
}
