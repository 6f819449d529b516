//! Error types.
//!
//! [`Unpriced`] is not a failure of the engine: it is the typed form of
//! the "cannot quote" outcome, which callers see as a price of 0.
//! [`ConfigError`] covers startup configuration problems.

use thiserror::Error;

/// Why a request could not be turned into a real price.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Unpriced {
    #[error("no like-new base price for storage {storage:?}")]
    MissingBasePrice { storage: String },
    #[error("base price {price} for storage {storage:?} is not a usable amount")]
    InvalidBasePrice { storage: String, price: f64 },
    #[error("no repair issues selected")]
    NoIssues,
    #[error("diagnostic request needs inspection before it can be quoted")]
    NeedsInspection,
    #[error("no price known for issue {issue:?}")]
    MissingIssuePrice { issue: String },
    #[error("device {0} is not in the price catalog")]
    UnknownDevice(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid bind address {value:?}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
}
