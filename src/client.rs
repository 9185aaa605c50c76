//! DHCP client implementation
//!
//! `Session` is the client-side collaborator of the reply dispatcher: it
//! owns the outstanding transaction id and turns dispatcher callbacks into
//! actions. `DhcpClient` drives a session over a UDP socket.

use crate::{
    config::ClientConfig,
    error::CourierError,
    network,
    v4::{
        self, build_dhcp_discover, build_dhcp_release, build_dhcp_request, AckMessage,
        ClientState, HardwareAddress, Message, Outbound, ReplyHandler,
    },
};
use std::{
    net::{Ipv4Addr, SocketAddr},
    time::Duration,
};
use tokio::{
    net::UdpSocket,
    time::{self, Instant},
};

/// Work the driver performs on behalf of the session.
#[derive(Debug)]
pub enum Action {
    Send(Outbound),
    StoreLease(Lease),
    Refused { server: Ipv4Addr },
}

/// Configuration handed out by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lease {
    pub address: Ipv4Addr,
    pub subnet_mask: Option<Ipv4Addr>,
    pub router: Option<Ipv4Addr>,
    pub dns_server: Option<Ipv4Addr>,
    pub lease_duration: Option<Duration>,
    pub server_identifier: Option<Ipv4Addr>,
}

impl From<&AckMessage> for Lease {
    fn from(ack: &AckMessage) -> Self {
        Self {
            address: ack.address(),
            subnet_mask: ack.subnet_mask(),
            router: ack.router(),
            dns_server: ack.dns_server(),
            lease_duration: ack.lease_time(),
            server_identifier: ack.server_identifier(),
        }
    }
}

/// Client state for a single Discover/Offer/Request/Ack exchange.
///
/// Only one transaction is outstanding at a time; replies carrying any
/// other transaction id are dropped before dispatch. The renewal flag passed
/// to `apply` is informational only; renewals are not scheduled here.
pub struct Session {
    hardware_address: HardwareAddress,
    xid: Option<u32>,
    request_outstanding: bool,
    actions: Vec<Action>,
}

impl Session {
    pub fn new(hardware_address: HardwareAddress) -> Self {
        Self {
            hardware_address,
            xid: None,
            request_outstanding: false,
            actions: Vec::new(),
        }
    }

    /// Starts a new exchange and returns the Discover to broadcast.
    pub fn discover(&mut self) -> Outbound {
        let discover = build_dhcp_discover(self.hardware_address);
        self.xid = Some(discover.xid);
        self.request_outstanding = false;
        self.actions.clear();
        discover
    }

    pub fn state(&self) -> ClientState {
        ClientState {
            request_outstanding: self.request_outstanding,
        }
    }

    pub fn xid(&self) -> Option<u32> {
        self.xid
    }

    /// Decodes and dispatches one inbound payload, returning the resulting
    /// actions. Undecodable or unrelated packets yield no actions.
    pub fn receive(&mut self, packet: &[u8]) -> Vec<Action> {
        let msg = match Message::decode(packet) {
            Ok(msg) => msg,
            Err(e) => {
                tracing::debug!("Dropping undecodable packet: {}", e);
                return Vec::new();
            }
        };

        if Some(msg.xid()) != self.xid {
            tracing::debug!(
                "XID mismatch, ignoring packet: XID={:x}, our XID={:?}",
                msg.xid(),
                self.xid
            );
            return Vec::new();
        }

        let state = self.state();
        v4::dispatch(msg, state, self);
        std::mem::take(&mut self.actions)
    }
}

impl ReplyHandler for Session {
    fn send_request(&mut self, offered: Ipv4Addr, server: Ipv4Addr) {
        if self.request_outstanding {
            tracing::debug!("Request already outstanding, ignoring offer from {}", server);
            return;
        }
        let request = build_dhcp_request(self.hardware_address, offered, server);
        self.xid = Some(request.xid);
        self.request_outstanding = true;
        self.actions.push(Action::Send(request));
    }

    fn apply(&mut self, ack: AckMessage, is_renewal: bool) {
        let server = ack
            .server_identifier()
            .unwrap_or_else(|| ack.message().siaddr());

        if ack.is_nak() {
            tracing::warn!("Received DHCP NAK from {}", server);
            self.request_outstanding = false;
            self.xid = None;
            self.actions.push(Action::Refused { server });
            return;
        }

        let lease = Lease::from(&ack);
        tracing::debug!("Applying ACK, renewal flag: {}", is_renewal);
        tracing::info!("Received DHCP ACK for {} from {}", lease.address, server);
        self.request_outstanding = false;
        self.actions.push(Action::StoreLease(lease));
    }
}

pub struct DhcpClient {
    config: ClientConfig,
    socket: UdpSocket,
}

impl DhcpClient {
    pub async fn new(config: ClientConfig) -> Result<Self, CourierError> {
        let socket = network::bind_client_socket(&config)?;
        Ok(Self { config, socket })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn send(&self, outbound: &Outbound) -> Result<(), CourierError> {
        let target = SocketAddr::V4(self.config.destination(outbound.target));
        tracing::debug!(
            "Sending {} bytes to {}, XID={:x}",
            outbound.payload.len(),
            target,
            outbound.xid
        );
        self.socket.send_to(&outbound.payload, target).await?;
        Ok(())
    }

    /// Runs one exchange and returns the acknowledged lease.
    ///
    /// Nothing is retransmitted: if no Ack arrives before the reply timeout
    /// expires, the exchange fails with `CourierError::Timeout`.
    pub async fn obtain(&mut self) -> Result<Lease, CourierError> {
        let mut session = Session::new(self.config.hardware_address);
        let discover = session.discover();
        tracing::info!("Broadcasting DHCP DISCOVER, XID={:x}", discover.xid);
        self.send(&discover).await?;

        let deadline = Instant::now() + self.config.reply_timeout;
        let mut buf = [0u8; 1500];
        loop {
            let received = time::timeout_at(deadline, self.socket.recv_from(&mut buf)).await;
            let (len, addr) = match received {
                Ok(result) => result?,
                Err(_) => {
                    tracing::debug!("Timeout waiting for response");
                    return Err(CourierError::Timeout(self.config.reply_timeout));
                }
            };
            tracing::debug!("Received {} bytes from {}", len, addr);

            for action in session.receive(&buf[..len]) {
                match action {
                    Action::Send(request) => {
                        tracing::info!("Sending DHCP REQUEST, XID={:x}", request.xid);
                        self.send(&request).await?;
                    }
                    Action::StoreLease(lease) => {
                        tracing::info!("DHCP bind successful, lease: {:?}", lease);
                        return Ok(lease);
                    }
                    Action::Refused { server } => return Err(CourierError::Nak { server }),
                }
            }
        }
    }

    /// Sends a single unicast Release of `client` to `server`.
    pub async fn release(&self, client: Ipv4Addr, server: Ipv4Addr) -> Result<(), CourierError> {
        let release = build_dhcp_release(self.config.hardware_address, client, server);
        tracing::info!("Releasing {} to {}", client, server);
        self.send(&release).await
    }
}
