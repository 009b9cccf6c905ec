pub mod dns;

pub use dns::DnsServer;
