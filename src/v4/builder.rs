//! Client message shapes.
//!
//! Every outbound message is the same Boot Request header with a
//! kind-specific option list. `AckMessage` is the decode-only counterpart
//! used for Ack and Nak replies.

use super::{
    address::{read_address, HardwareAddress},
    message::{encode_request, Message, MessageType, SERVER_PORT},
    options::{codes, DhcpOption},
};
use crate::error::DecodeError;
use bytes::Bytes;
use std::{
    net::{Ipv4Addr, SocketAddrV4},
    time::Duration,
};

/// Options requested from the server: subnet mask, router, domain name, DNS.
pub const PARAMETER_REQUEST_LIST: [u8; 4] = [
    codes::SUBNET_MASK,
    codes::ROUTER,
    codes::DOMAIN_NAME,
    codes::DOMAIN_NAME_SERVER,
];

/// Ethernet hardware type, used as the client identifier prefix.
const CLIENT_ID_HTYPE: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientMessage {
    Discover {
        chaddr: HardwareAddress,
    },
    Request {
        chaddr: HardwareAddress,
        requested: Ipv4Addr,
        server: Ipv4Addr,
    },
    /// Unicast release of `client`, addressed to `server`.
    Release {
        chaddr: HardwareAddress,
        client: Ipv4Addr,
        server: Ipv4Addr,
    },
}

/// An encoded message ready to hand to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbound {
    pub xid: u32,
    pub payload: Bytes,
    pub target: SocketAddrV4,
}

impl ClientMessage {
    pub fn message_type(&self) -> MessageType {
        match self {
            Self::Discover { .. } => MessageType::Discover,
            Self::Request { .. } => MessageType::Request,
            Self::Release { .. } => MessageType::Release,
        }
    }

    /// Option list appended after the header, in wire order.
    pub fn options(&self) -> Vec<DhcpOption> {
        let message_type = DhcpOption::new(codes::MESSAGE_TYPE, [u8::from(self.message_type())]);
        match *self {
            Self::Discover { .. } => vec![
                message_type,
                DhcpOption::new(codes::PARAMETER_REQUEST_LIST, PARAMETER_REQUEST_LIST),
            ],
            Self::Request {
                requested, server, ..
            } => vec![
                message_type,
                DhcpOption::new(codes::REQUESTED_IP, requested.octets()),
                DhcpOption::new(codes::SERVER_ID, server.octets()),
                DhcpOption::new(codes::PARAMETER_REQUEST_LIST, PARAMETER_REQUEST_LIST),
            ],
            Self::Release { chaddr, server, .. } => {
                let mut client_id = Vec::with_capacity(1 + chaddr.octets().len());
                client_id.push(CLIENT_ID_HTYPE);
                client_id.extend_from_slice(&chaddr.octets());
                vec![
                    message_type,
                    DhcpOption::new(codes::SERVER_ID, server.octets()),
                    DhcpOption::new(codes::CLIENT_ID, client_id),
                ]
            }
        }
    }

    /// Address written to the client-address field.
    pub fn client_address(&self) -> Ipv4Addr {
        match *self {
            Self::Discover { .. } | Self::Request { .. } => Ipv4Addr::UNSPECIFIED,
            Self::Release { client, .. } => client,
        }
    }

    pub fn target(&self) -> SocketAddrV4 {
        match *self {
            Self::Discover { .. } | Self::Request { .. } => {
                SocketAddrV4::new(Ipv4Addr::BROADCAST, SERVER_PORT)
            }
            Self::Release { server, .. } => SocketAddrV4::new(server, SERVER_PORT),
        }
    }

    fn chaddr(&self) -> HardwareAddress {
        match *self {
            Self::Discover { chaddr }
            | Self::Request { chaddr, .. }
            | Self::Release { chaddr, .. } => chaddr,
        }
    }

    /// Encodes the message under a fresh random transaction id.
    pub fn encode(&self) -> Outbound {
        self.encode_with_xid(rand::random())
    }

    pub fn encode_with_xid(&self, xid: u32) -> Outbound {
        let payload = encode_request(xid, self.client_address(), self.chaddr(), &self.options());
        tracing::debug!(
            "Encoded DHCP {} ({} bytes), XID={:x}",
            self.message_type(),
            payload.len(),
            xid
        );
        Outbound {
            xid,
            payload,
            target: self.target(),
        }
    }
}

/// Constructs a DHCP Discover message.
pub fn build_dhcp_discover(chaddr: HardwareAddress) -> Outbound {
    ClientMessage::Discover { chaddr }.encode()
}

/// Constructs a DHCP Request for the address offered by `server`.
pub fn build_dhcp_request(
    chaddr: HardwareAddress,
    requested: Ipv4Addr,
    server: Ipv4Addr,
) -> Outbound {
    ClientMessage::Request {
        chaddr,
        requested,
        server,
    }
    .encode()
}

/// Constructs a DHCP Release giving `client` back to `server`.
pub fn build_dhcp_release(
    chaddr: HardwareAddress,
    client: Ipv4Addr,
    server: Ipv4Addr,
) -> Outbound {
    ClientMessage::Release {
        chaddr,
        client,
        server,
    }
    .encode()
}

/// An Ack or Nak reply with the configuration options pulled out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AckMessage {
    message: Message,
    subnet_mask: Option<Ipv4Addr>,
    dns_server: Option<Ipv4Addr>,
    router: Option<Ipv4Addr>,
    lease_time: Option<Duration>,
    server_identifier: Option<Ipv4Addr>,
}

impl AckMessage {
    pub fn decode(buffer: &[u8]) -> Result<Self, DecodeError> {
        Message::decode(buffer).map(Self::from_message)
    }

    /// Scans the option list without modifying it. When an option repeats,
    /// the last occurrence wins; options too short for an address are skipped.
    pub fn from_message(message: Message) -> Self {
        let mut ack = Self {
            message,
            subnet_mask: None,
            dns_server: None,
            router: None,
            lease_time: None,
            server_identifier: None,
        };

        for opt in ack.message.opts() {
            let data = opt.data();
            match opt.code() {
                codes::SUBNET_MASK if data.len() >= 4 => {
                    ack.subnet_mask = Some(read_address(data, 0))
                }
                codes::DOMAIN_NAME_SERVER if data.len() >= 4 => {
                    ack.dns_server = Some(read_address(data, 0))
                }
                codes::ROUTER if data.len() >= 4 => ack.router = Some(read_address(data, 0)),
                codes::SERVER_ID if data.len() >= 4 => {
                    ack.server_identifier = Some(read_address(data, 0))
                }
                codes::LEASE_TIME if data.len() >= 4 => {
                    let secs = u32::from_be_bytes([data[0], data[1], data[2], data[3]]);
                    ack.lease_time = Some(Duration::from_secs(secs.into()));
                }
                _ => {}
            }
        }
        ack
    }

    pub fn message(&self) -> &Message {
        &self.message
    }

    /// Whether the server acknowledged or refused.
    pub fn kind(&self) -> Result<MessageType, DecodeError> {
        self.message.message_type()
    }

    pub fn is_nak(&self) -> bool {
        matches!(self.kind(), Ok(MessageType::Nak))
    }

    pub fn address(&self) -> Ipv4Addr {
        self.message.yiaddr()
    }

    pub fn subnet_mask(&self) -> Option<Ipv4Addr> {
        self.subnet_mask
    }

    /// First DNS server listed.
    pub fn dns_server(&self) -> Option<Ipv4Addr> {
        self.dns_server
    }

    pub fn router(&self) -> Option<Ipv4Addr> {
        self.router
    }

    pub fn lease_time(&self) -> Option<Duration> {
        self.lease_time
    }

    pub fn server_identifier(&self) -> Option<Ipv4Addr> {
        self.server_identifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::v4::message::{Opcode, HEADER_LEN, MAGIC_COOKIE};

    const MAC: HardwareAddress = HardwareAddress::new([0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]);

    fn ack_packet(options: &[u8]) -> Vec<u8> {
        let mut packet = vec![0u8; HEADER_LEN];
        packet[0] = 2;
        packet[16..20].copy_from_slice(&[192, 168, 1, 100]);
        packet[236..240].copy_from_slice(&MAGIC_COOKIE);
        packet.extend_from_slice(options);
        packet
    }

    #[test]
    fn test_discover_round_trip() {
        let out = build_dhcp_discover(MAC);
        let msg = Message::decode(&out.payload).unwrap();

        assert_eq!(out.payload.len(), HEADER_LEN + 10);
        assert_eq!(msg.opcode(), Opcode::BootRequest);
        assert_eq!(msg.xid(), out.xid);
        assert_eq!(msg.chaddr(), MAC);
        assert_eq!(msg.ciaddr(), Ipv4Addr::UNSPECIFIED);
        assert_eq!(msg.message_type(), Ok(MessageType::Discover));
        assert_eq!(
            msg.option(codes::PARAMETER_REQUEST_LIST).map(DhcpOption::data),
            Some(&[1u8, 3, 15, 6][..])
        );
        assert_eq!(out.target, SocketAddrV4::new(Ipv4Addr::BROADCAST, 67));
    }

    #[test]
    fn test_request_options_in_order() {
        let offered = Ipv4Addr::new(10, 0, 0, 5);
        let server = Ipv4Addr::new(10, 0, 0, 1);
        let out = ClientMessage::Request {
            chaddr: MAC,
            requested: offered,
            server,
        }
        .encode_with_xid(0x87654321);

        assert_eq!(out.xid, 0x87654321);
        assert_eq!(out.payload.len(), HEADER_LEN + 22);
        assert_eq!(
            &out.payload[HEADER_LEN..],
            &[53, 1, 3, 50, 4, 10, 0, 0, 5, 54, 4, 10, 0, 0, 1, 55, 4, 1, 3, 15, 6, 255]
        );
        assert_eq!(out.target.ip(), &Ipv4Addr::BROADCAST);
    }

    #[test]
    fn test_release_options() {
        let client = Ipv4Addr::new(10, 0, 0, 5);
        let server = Ipv4Addr::new(10, 0, 0, 1);
        let out = build_dhcp_release(MAC, client, server);
        let msg = Message::decode(&out.payload).unwrap();

        assert_eq!(out.payload.len(), HEADER_LEN + 19);
        assert_eq!(msg.ciaddr(), client);
        assert_eq!(msg.message_type(), Ok(MessageType::Release));
        assert_eq!(msg.option(codes::SERVER_ID).unwrap().data(), &[10, 0, 0, 1]);
        assert_eq!(
            msg.option(codes::CLIENT_ID).unwrap().data(),
            &[0x01, 0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]
        );
        assert_eq!(out.target, SocketAddrV4::new(server, 67));
    }

    #[test]
    fn test_fresh_xid_per_encode() {
        let msg = ClientMessage::Discover { chaddr: MAC };
        let xids: Vec<u32> = (0..8).map(|_| msg.encode().xid).collect();
        assert!(xids.windows(2).any(|w| w[0] != w[1]));
    }

    #[test]
    fn test_ack_extracts_subnet_and_dns() {
        let packet = ack_packet(&[53, 1, 5, 1, 4, 255, 255, 255, 0, 6, 4, 8, 8, 8, 8, 255]);
        let ack = AckMessage::decode(&packet).unwrap();

        assert_eq!(ack.kind(), Ok(MessageType::Ack));
        assert_eq!(ack.subnet_mask(), Some(Ipv4Addr::new(255, 255, 255, 0)));
        assert_eq!(ack.dns_server(), Some(Ipv4Addr::new(8, 8, 8, 8)));
        assert_eq!(ack.address(), Ipv4Addr::new(192, 168, 1, 100));
        assert_eq!(ack.message().opts().len(), 3);
        assert!(!ack.is_nak());
    }

    #[test]
    fn test_ack_extra_fields() {
        let packet = ack_packet(&[
            53, 1, 5, 3, 4, 192, 168, 1, 1, 51, 4, 0, 0, 0x0e, 0x10, 54, 4, 192, 168, 1, 2, 6, 8,
            1, 1, 1, 1, 9, 9, 9, 9, 255,
        ]);
        let ack = AckMessage::decode(&packet).unwrap();

        assert_eq!(ack.router(), Some(Ipv4Addr::new(192, 168, 1, 1)));
        assert_eq!(ack.lease_time(), Some(Duration::from_secs(3600)));
        assert_eq!(ack.server_identifier(), Some(Ipv4Addr::new(192, 168, 1, 2)));
        assert_eq!(ack.dns_server(), Some(Ipv4Addr::new(1, 1, 1, 1)));
        assert_eq!(ack.subnet_mask(), None);
    }

    #[test]
    fn test_nak_without_config_options() {
        let packet = ack_packet(&[53, 1, 6, 255]);
        let ack = AckMessage::decode(&packet).unwrap();

        assert!(ack.is_nak());
        assert_eq!(ack.subnet_mask(), None);
        assert_eq!(ack.dns_server(), None);
    }

    #[test]
    fn test_ack_skips_short_address_option() {
        let packet = ack_packet(&[53, 1, 5, 1, 2, 255, 255, 255]);
        let ack = AckMessage::decode(&packet).unwrap();
        assert_eq!(ack.subnet_mask(), None);
    }
}
