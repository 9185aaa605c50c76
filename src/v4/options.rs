//! Type-length-value option list that follows the fixed DHCP header.

use crate::error::DecodeError;
use bytes::BufMut;

/// DHCP option codes used by the client.
pub mod codes {
    pub const PAD: u8 = 0;
    pub const SUBNET_MASK: u8 = 1;
    pub const ROUTER: u8 = 3;
    pub const DOMAIN_NAME_SERVER: u8 = 6;
    pub const DOMAIN_NAME: u8 = 15;
    pub const REQUESTED_IP: u8 = 50;
    pub const LEASE_TIME: u8 = 51;
    pub const MESSAGE_TYPE: u8 = 53;
    pub const SERVER_ID: u8 = 54;
    pub const PARAMETER_REQUEST_LIST: u8 = 55;
    pub const CLIENT_ID: u8 = 61;
    pub const END: u8 = 255;
}

/// A single option as it appears on the wire.
///
/// The length byte is not stored; it is always `data.len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DhcpOption {
    code: u8,
    data: Vec<u8>,
}

impl DhcpOption {
    /// Creates an option. Panics if `data` does not fit a one-byte length.
    pub fn new(code: u8, data: impl Into<Vec<u8>>) -> Self {
        let data = data.into();
        assert!(
            data.len() <= u8::MAX as usize,
            "option {code} data is {} bytes, limit is 255",
            data.len()
        );
        Self { code, data }
    }

    pub fn code(&self) -> u8 {
        self.code
    }

    pub fn len(&self) -> u8 {
        self.data.len() as u8
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Bytes this option occupies when encoded, header included.
    pub fn encoded_len(&self) -> usize {
        2 + self.data.len()
    }
}

/// Decodes the option list starting at `offset`.
///
/// Decoding stops at the end marker or at the end of the buffer. A zero byte
/// at `offset` means the packet carries no options at all.
pub fn decode_options(buffer: &[u8], offset: usize) -> Result<Vec<DhcpOption>, DecodeError> {
    let mut options = Vec::new();

    if buffer.get(offset) == Some(&codes::PAD) {
        return Ok(options);
    }

    let mut cursor = offset;
    while cursor < buffer.len() {
        let code = buffer[cursor];
        if code == codes::END {
            break;
        }

        let Some(&declared) = buffer.get(cursor + 1) else {
            return Err(DecodeError::BufferTooShort {
                expected: cursor + 2,
                actual: buffer.len(),
            });
        };

        let start = cursor + 2;
        let end = start + declared as usize;
        if end > buffer.len() {
            return Err(DecodeError::TruncatedOption {
                offset: cursor,
                code,
                declared,
                available: buffer.len() - start,
            });
        }

        options.push(DhcpOption {
            code,
            data: buffer[start..end].to_vec(),
        });
        cursor = end;
    }

    Ok(options)
}

/// Appends `options` in order, followed by the end marker.
pub fn encode_options<B: BufMut>(options: &[DhcpOption], dst: &mut B) {
    for option in options {
        dst.put_u8(option.code);
        dst.put_u8(option.len());
        dst.put_slice(&option.data);
    }
    dst.put_u8(codes::END);
}

/// Size of the encoded option region, end marker included.
pub fn encoded_len(options: &[DhcpOption]) -> usize {
    options.iter().map(DhcpOption::encoded_len).sum::<usize>() + 1
}

/// Returns the first option carrying `code`.
pub fn find(options: &[DhcpOption], code: u8) -> Option<&DhcpOption> {
    options.iter().find(|opt| opt.code == code)
}
