//! Error types for dhcpstarve.
//!
//! Every error is fatal to a flood run; nothing here is meant to be
//! recovered from locally.

use std::io;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No interface with that name exists on this host.
    #[error("Interface '{0}' not found")]
    InterfaceNotFound(String),

    /// The interface exists but has no Ethernet hardware address.
    #[error("Interface '{0}' has no hardware address")]
    NoHardwareAddress(String),

    /// A textual hardware address did not parse.
    #[error("Invalid hardware address '{0}'")]
    InvalidMacAddress(String),

    /// Hardware address lookup failed at the OS level.
    #[error("Interface error: {0}")]
    Interface(String),

    /// The raw link-layer channel could not be opened.
    #[error("Failed to open datalink channel: {0}")]
    Channel(#[source] io::Error),

    /// The OS handed back something other than an Ethernet channel.
    #[error("Unhandled datalink channel type")]
    UnsupportedChannel,

    /// A frame could not be transmitted. `sent` counts the frames that
    /// went out before the failure.
    #[error("Failed to send frame after {sent} frames: {source}")]
    Send {
        sent: u64,
        #[source]
        source: io::Error,
    },

    /// Input ended before a fixed-size structure was complete.
    #[error("{what} truncated: need {needed} bytes, got {actual}")]
    Truncated {
        what: &'static str,
        needed: usize,
        actual: usize,
    },

    /// A field that is fixed by the wire format held another value.
    #[error("Invalid {field}: {value:#x}")]
    InvalidField { field: &'static str, value: u32 },
}

impl Error {
    pub(crate) fn truncated(what: &'static str, needed: usize, actual: usize) -> Self {
        Error::Truncated {
            what,
            needed,
            actual,
        }
    }

    pub(crate) fn invalid(field: &'static str, value: impl Into<u32>) -> Self {
        Error::InvalidField {
            field,
            value: value.into(),
        }
    }
}
