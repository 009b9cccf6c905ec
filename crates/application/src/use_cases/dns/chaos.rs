use hickory_proto::op::Query;
use hickory_proto::rr::rdata::TXT;
use hickory_proto::rr::{DNSClass, RData, Record, RecordType};
use std::sync::Arc;

/// Answers for CHAOS-class TXT introspection queries.
#[derive(Debug, Clone)]
pub struct ChaosIdentity {
    pub version: Arc<str>,
    pub hostname: Arc<str>,
}

impl ChaosIdentity {
    pub fn new(version: impl Into<Arc<str>>, hostname: impl Into<Arc<str>>) -> Self {
        Self {
            version: version.into(),
            hostname: hostname.into(),
        }
    }

    /// TXT record for a well-known introspection name, if `query` asks for one.
    pub fn answer(&self, query: &Query) -> Option<Record> {
        if query.query_type() != RecordType::TXT {
            return None;
        }

        let text = match query.name().to_ascii().to_ascii_lowercase().as_str() {
            "version.bind." | "version.server." => &self.version,
            "hostname.bind." | "id.server." => &self.hostname,
            _ => return None,
        };

        let mut record = Record::from_rdata(
            query.name().clone(),
            0,
            RData::TXT(TXT::new(vec![text.to_string()])),
        );
        record.set_dns_class(DNSClass::CH);
        Some(record)
    }
}

impl Default for ChaosIdentity {
    fn default() -> Self {
        Self::new(
            concat!("dnsproxy-", env!("CARGO_PKG_VERSION")),
            "localhost",
        )
    }
}
