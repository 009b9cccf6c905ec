use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("No authority found for {0}")]
    NoAuthority(String),

    #[error("DNS message has no question")]
    EmptyQuestion,

    #[error("Invalid DNS message: {0}")]
    InvalidDnsMessage(String),

    #[error("Transport timeout connecting to {server}")]
    TransportTimeout { server: String },

    #[error("Transport connection refused by {server}")]
    TransportConnectionRefused { server: String },

    #[error("Transport error talking to {server}: {reason}")]
    TransportError { server: String, reason: String },

    #[error("Response id from {server} does not match the query")]
    UpstreamIdMismatch { server: String },

    #[error("Invalid hosts file at line {line}: {reason}")]
    InvalidHostsFile { line: usize, reason: String },

    #[error("I/O error: {0}")]
    IoError(String),
}
