//! Fixed BOOTP/DHCP header layout.
//!
//! Offsets are relative to the start of the UDP payload.

use super::{
    address::{
        read_address, read_hardware_address, write_address, write_hardware_address,
        HardwareAddress,
    },
    options::{self, codes, DhcpOption},
};
use crate::error::DecodeError;
use bytes::{Bytes, BytesMut};
use std::{fmt, net::Ipv4Addr};

pub const CLIENT_PORT: u16 = 68;
pub const SERVER_PORT: u16 = 67;

pub const MAGIC_COOKIE: [u8; 4] = [0x63, 0x82, 0x53, 0x63];

/// Header plus magic cookie; the options region starts here.
pub const HEADER_LEN: usize = 240;

const OP: usize = 0;
const HTYPE: usize = 1;
const HLEN: usize = 2;
const HOPS: usize = 3;
const XID: usize = 4;
const SECS: usize = 8;
const FLAGS: usize = 10;
const CIADDR: usize = 12;
const YIADDR: usize = 16;
const SIADDR: usize = 20;
const GIADDR: usize = 24;
const CHADDR: usize = 28;
const COOKIE: usize = 236;
pub const OPTIONS: usize = HEADER_LEN;

const HTYPE_ETHERNET: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    BootRequest,
    BootReply,
    Unknown(u8),
}

impl From<u8> for Opcode {
    fn from(value: u8) -> Self {
        match value {
            1 => Self::BootRequest,
            2 => Self::BootReply,
            other => Self::Unknown(other),
        }
    }
}

impl From<Opcode> for u8 {
    fn from(op: Opcode) -> Self {
        match op {
            Opcode::BootRequest => 1,
            Opcode::BootReply => 2,
            Opcode::Unknown(other) => other,
        }
    }
}

/// Value carried by option 53.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Discover,
    Offer,
    Request,
    Decline,
    Ack,
    Nak,
    Release,
    Inform,
}

impl TryFrom<u8> for MessageType {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            1 => Self::Discover,
            2 => Self::Offer,
            3 => Self::Request,
            4 => Self::Decline,
            5 => Self::Ack,
            6 => Self::Nak,
            7 => Self::Release,
            8 => Self::Inform,
            other => return Err(DecodeError::UnknownMessageType(Some(other))),
        })
    }
}

impl From<MessageType> for u8 {
    fn from(kind: MessageType) -> Self {
        match kind {
            MessageType::Discover => 1,
            MessageType::Offer => 2,
            MessageType::Request => 3,
            MessageType::Decline => 4,
            MessageType::Ack => 5,
            MessageType::Nak => 6,
            MessageType::Release => 7,
            MessageType::Inform => 8,
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Discover => "DISCOVER",
            Self::Offer => "OFFER",
            Self::Request => "REQUEST",
            Self::Decline => "DECLINE",
            Self::Ack => "ACK",
            Self::Nak => "NAK",
            Self::Release => "RELEASE",
            Self::Inform => "INFORM",
        };
        f.write_str(name)
    }
}

/// A decoded DHCP message. Read-only once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    opcode: Opcode,
    htype: u8,
    hlen: u8,
    hops: u8,
    xid: u32,
    secs: u16,
    flags: u16,
    ciaddr: Ipv4Addr,
    yiaddr: Ipv4Addr,
    siaddr: Ipv4Addr,
    giaddr: Ipv4Addr,
    chaddr: HardwareAddress,
    options: Vec<DhcpOption>,
}

impl Message {
    /// Decodes a UDP payload.
    ///
    /// Fails without producing a partial message if the payload is shorter
    /// than the fixed header, carries the wrong magic cookie, or has an option
    /// running past the end of the buffer.
    pub fn decode(buffer: &[u8]) -> Result<Self, DecodeError> {
        if buffer.len() < HEADER_LEN {
            return Err(DecodeError::BufferTooShort {
                expected: HEADER_LEN,
                actual: buffer.len(),
            });
        }

        let mut cookie = [0u8; 4];
        cookie.copy_from_slice(&buffer[COOKIE..COOKIE + 4]);
        if cookie != MAGIC_COOKIE {
            return Err(DecodeError::BadMagicCookie(cookie));
        }

        Ok(Self {
            opcode: Opcode::from(buffer[OP]),
            htype: buffer[HTYPE],
            hlen: buffer[HLEN],
            hops: buffer[HOPS],
            xid: u32::from_be_bytes([
                buffer[XID],
                buffer[XID + 1],
                buffer[XID + 2],
                buffer[XID + 3],
            ]),
            secs: u16::from_be_bytes([buffer[SECS], buffer[SECS + 1]]),
            flags: u16::from_be_bytes([buffer[FLAGS], buffer[FLAGS + 1]]),
            ciaddr: read_address(buffer, CIADDR),
            yiaddr: read_address(buffer, YIADDR),
            siaddr: read_address(buffer, SIADDR),
            giaddr: read_address(buffer, GIADDR),
            chaddr: read_hardware_address(buffer, CHADDR),
            options: options::decode_options(buffer, OPTIONS)?,
        })
    }

    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    pub fn htype(&self) -> u8 {
        self.htype
    }

    pub fn hlen(&self) -> u8 {
        self.hlen
    }

    pub fn hops(&self) -> u8 {
        self.hops
    }

    pub fn xid(&self) -> u32 {
        self.xid
    }

    pub fn secs(&self) -> u16 {
        self.secs
    }

    pub fn flags(&self) -> u16 {
        self.flags
    }

    /// Client address
    pub fn ciaddr(&self) -> Ipv4Addr {
        self.ciaddr
    }

    /// "Your" address, offered or assigned by the server
    pub fn yiaddr(&self) -> Ipv4Addr {
        self.yiaddr
    }

    /// Next-server address
    pub fn siaddr(&self) -> Ipv4Addr {
        self.siaddr
    }

    /// Relay agent address
    pub fn giaddr(&self) -> Ipv4Addr {
        self.giaddr
    }

    pub fn chaddr(&self) -> HardwareAddress {
        self.chaddr
    }

    /// Options in the order they were received.
    pub fn opts(&self) -> &[DhcpOption] {
        &self.options
    }

    pub fn option(&self, code: u8) -> Option<&DhcpOption> {
        options::find(&self.options, code)
    }

    /// Looks up option 53 anywhere in the option list.
    pub fn message_type(&self) -> Result<MessageType, DecodeError> {
        match self.option(codes::MESSAGE_TYPE).and_then(|opt| opt.data().first()) {
            Some(&value) => MessageType::try_from(value),
            None => Err(DecodeError::UnknownMessageType(None)),
        }
    }
}

/// Encodes a Boot Request carrying `opts`.
///
/// The buffer is sized to exactly the header plus the encoded options. The
/// secs and flags fields and the your/next/relay addresses are left zero.
pub fn encode_request(
    xid: u32,
    client: Ipv4Addr,
    chaddr: HardwareAddress,
    opts: &[DhcpOption],
) -> Bytes {
    let mut buf = BytesMut::with_capacity(HEADER_LEN + options::encoded_len(opts));
    buf.resize(HEADER_LEN, 0);

    buf[OP] = Opcode::BootRequest.into();
    buf[HTYPE] = HTYPE_ETHERNET;
    buf[HLEN] = chaddr.octets().len() as u8;
    buf[HOPS] = 0;
    buf[XID..XID + 4].copy_from_slice(&xid.to_be_bytes());
    write_address(&mut buf, CIADDR, client);
    write_hardware_address(&mut buf, CHADDR, chaddr);
    buf[COOKIE..COOKIE + 4].copy_from_slice(&MAGIC_COOKIE);

    options::encode_options(opts, &mut buf);
    buf.freeze()
}
