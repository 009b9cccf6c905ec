//! dnsproxy application layer: ports and the query resolution use cases
pub mod ports;
pub mod use_cases;
