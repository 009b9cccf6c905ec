mod hosts_lookup;
mod hosts_reload_port;
mod query_middleware;
mod upstream_exchanger;

pub use hosts_lookup::HostsLookup;
pub use hosts_reload_port::{HostsReloadPort, ReloadOutcome};
pub use query_middleware::{NoopMiddleware, QueryMiddleware};
pub use upstream_exchanger::UpstreamExchanger;
