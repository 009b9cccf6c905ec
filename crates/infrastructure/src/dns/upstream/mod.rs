pub mod client;
pub mod failover;

pub use client::{UpstreamClient, WireClient};
pub use failover::FailoverExchanger;
