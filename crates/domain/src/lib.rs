//! dnsproxy domain layer
pub mod authority;
pub mod config;
pub mod errors;
pub mod host_table;
pub mod protocol;

pub use authority::{Authority, AuthoritySelector};
pub use config::{CliOverrides, Config, ConfigError};
pub use errors::DomainError;
pub use host_table::{reverse_name, HostEntry, HostTable};
pub use protocol::NetProtocol;

/// Appends the root label if `name` does not already end with one.
pub fn fqdn(name: &str) -> String {
    if name.ends_with('.') {
        name.to_string()
    } else {
        format!("{}.", name)
    }
}
