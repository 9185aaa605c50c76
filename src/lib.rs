//! # Courier - DHCPv4 client codec
//!
//! Courier encodes the messages a DHCPv4 client sends (Discover, Request,
//! Release), decodes the server's replies into a fixed header plus an ordered
//! option list, and classifies each Boot Reply as Offer, Ack or Nak before
//! handing it to the client.
//!
//! The codec in [`v4`] performs no I/O. [`client::DhcpClient`] is a small
//! driver that runs one exchange over a UDP socket bound to an interface.
//!
//! ## Example
//!
//! ```rust
//! use courier::v4::{build_dhcp_discover, HardwareAddress, Message, MessageType};
//!
//! let mac: HardwareAddress = "00:0c:29:a8:92:f4".parse().unwrap();
//! let discover = build_dhcp_discover(mac);
//!
//! let msg = Message::decode(&discover.payload).unwrap();
//! assert_eq!(msg.xid(), discover.xid);
//! assert_eq!(msg.message_type(), Ok(MessageType::Discover));
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod network;
pub mod v4;

pub use client::{DhcpClient, Lease, Session};
pub use config::{Args, ClientConfig, Command};
pub use error::{CourierError, DecodeError};
