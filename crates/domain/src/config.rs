pub mod authority;
pub mod cache;
pub mod errors;
pub mod hosts;
pub mod logging;
pub mod root;
pub mod server;

pub use authority::AuthorityConfig;
pub use cache::CacheConfig;
pub use errors::ConfigError;
pub use hosts::HostsConfig;
pub use logging::LoggingConfig;
pub use root::{CliOverrides, Config};
pub use server::ServerConfig;
