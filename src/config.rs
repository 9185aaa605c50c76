use crate::v4::{
    message::{CLIENT_PORT, SERVER_PORT},
    HardwareAddress,
};
use clap::{Parser, Subcommand};
use std::{
    net::{Ipv4Addr, SocketAddrV4},
    time::Duration,
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// The network interface to bind to (e.g., 'eth0', 'lo')
    #[arg(short, long)]
    pub interface: String,

    /// Seconds to wait for server replies before giving up
    #[arg(short, long, default_value_t = 10)]
    pub timeout: u64,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Obtain a lease (Discover, Offer, Request, Ack)
    Obtain,
    /// Give a leased address back to its server
    Release {
        /// The leased client address
        #[arg(long)]
        client: Ipv4Addr,
        /// The server that granted the lease
        #[arg(long)]
        server: Ipv4Addr,
    },
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub interface: String,
    pub hardware_address: HardwareAddress,
    pub client_port: u16,
    pub server_port: u16,
    pub broadcast_address: Ipv4Addr,
    pub reply_timeout: Duration,
}

impl ClientConfig {
    pub fn new(interface: String, hardware_address: HardwareAddress) -> Self {
        Self {
            interface,
            hardware_address,
            client_port: CLIENT_PORT,
            server_port: SERVER_PORT,
            broadcast_address: Ipv4Addr::BROADCAST,
            reply_timeout: Duration::from_secs(10),
        }
    }

    pub fn with_reply_timeout(mut self, reply_timeout: Duration) -> Self {
        self.reply_timeout = reply_timeout;
        self
    }

    /// Where to send a message built for `target`.
    ///
    /// Broadcast targets go to `broadcast_address`; every target uses
    /// `server_port`.
    pub fn destination(&self, target: SocketAddrV4) -> SocketAddrV4 {
        let ip = if target.ip().is_broadcast() {
            self.broadcast_address
        } else {
            *target.ip()
        };
        SocketAddrV4::new(ip, self.server_port)
    }
}
