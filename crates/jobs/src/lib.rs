pub mod hosts_reload;
pub mod runner;

pub use hosts_reload::HostsReloadJob;
pub use runner::JobRunner;
