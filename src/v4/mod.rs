//! DHCPv4 wire format and reply handling
//!
//! This module contains:
//! - Address, option and header codecs
//! - Builders for the messages a client sends
//! - Classification of server replies

pub mod address;
pub mod builder;
pub mod handler;
pub mod message;
pub mod options;

#[cfg(test)]
mod tests;

pub use address::HardwareAddress;
pub use builder::{
    build_dhcp_discover, build_dhcp_release, build_dhcp_request, AckMessage, ClientMessage,
    Outbound,
};
pub use handler::{classify, dispatch, handle_packet, Classification, ClientState, ReplyHandler};
pub use message::{Message, MessageType, Opcode};
pub use options::DhcpOption;
