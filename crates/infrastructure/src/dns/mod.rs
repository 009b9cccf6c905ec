pub mod cache;
pub mod hosts;
pub mod server;
pub mod transport;
pub mod upstream;

pub use cache::{CachedExchanger, ResponseCache};
pub use hosts::HostsFile;
pub use server::DnsServerHandler;
pub use upstream::{FailoverExchanger, UpstreamClient, WireClient};
