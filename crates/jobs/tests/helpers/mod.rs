#![allow(dead_code)]

mod mock_reload_port;

pub use mock_reload_port::MockHostsReloadPort;
