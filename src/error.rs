use crate::network::SocketError;
use std::{io, net::Ipv4Addr, time::Duration};
use thiserror::Error;

/// Reasons an inbound payload is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Buffer too short: expected at least {expected} bytes, got {actual}")]
    BufferTooShort { expected: usize, actual: usize },

    #[error("Bad magic cookie {0:02x?}, not a DHCP payload")]
    BadMagicCookie([u8; 4]),

    #[error("Unknown DHCP message type: {0:?}")]
    UnknownMessageType(Option<u8>),

    #[error("Option {code} at offset {offset} declares {declared} bytes but only {available} remain")]
    TruncatedOption {
        offset: usize,
        code: u8,
        declared: u8,
        available: usize,
    },
}

#[derive(Error, Debug)]
pub enum CourierError {
    #[error("Socket operation failed")]
    Socket(#[from] SocketError),

    #[error("I/O error")]
    Io(#[from] io::Error),

    #[error("DHCP decode error")]
    Decode(#[from] DecodeError),

    #[error("Failed to parse MAC address: {0}")]
    MacParse(String),

    #[error("Interface '{0}' not found or has no MAC address")]
    InterfaceInvalid(String),

    #[error("No usable reply within {0:?}")]
    Timeout(Duration),

    #[error("Server {server} refused the request")]
    Nak { server: Ipv4Addr },

    #[error("Client reached a critical failure: {0}")]
    Critical(String),
}
