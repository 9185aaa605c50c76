//! Fixed-width IPv4 and hardware address fields.
//!
//! All readers and writers index the buffer directly. Callers compute the
//! offsets from the wire layout, so an out-of-range offset is a bug and
//! panics instead of producing an error.

use crate::error::CourierError;
use std::{fmt, net::Ipv4Addr, str::FromStr};

/// Length of an Ethernet hardware address.
pub const HARDWARE_ADDRESS_LEN: usize = 6;

/// A 6-byte link-layer (MAC) address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HardwareAddress([u8; HARDWARE_ADDRESS_LEN]);

impl HardwareAddress {
    pub const ZERO: Self = Self([0; HARDWARE_ADDRESS_LEN]);
    pub const BROADCAST: Self = Self([0xff; HARDWARE_ADDRESS_LEN]);

    pub const fn new(octets: [u8; HARDWARE_ADDRESS_LEN]) -> Self {
        Self(octets)
    }

    pub const fn octets(&self) -> [u8; HARDWARE_ADDRESS_LEN] {
        self.0
    }

    pub fn is_broadcast(&self) -> bool {
        *self == Self::BROADCAST
    }
}

impl From<[u8; HARDWARE_ADDRESS_LEN]> for HardwareAddress {
    fn from(octets: [u8; HARDWARE_ADDRESS_LEN]) -> Self {
        Self(octets)
    }
}

impl fmt::Display for HardwareAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

/// Parses a MAC address string such as `0a:1b:2c:3d:4e:5f`.
impl FromStr for HardwareAddress {
    type Err = CourierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut octets = [0u8; HARDWARE_ADDRESS_LEN];
        let mut parts = s.trim().split(':');

        for octet in octets.iter_mut() {
            let part = parts
                .next()
                .ok_or_else(|| CourierError::MacParse(format!("too few octets in '{s}'")))?;
            *octet = u8::from_str_radix(part, 16)
                .map_err(|e| CourierError::MacParse(format!("'{part}' in '{s}': {e}")))?;
        }

        if parts.next().is_some() {
            return Err(CourierError::MacParse(format!("too many octets in '{s}'")));
        }
        Ok(Self(octets))
    }
}

/// Reads a 4-byte IPv4 address at `offset`. Every bit pattern is accepted.
pub fn read_address(buffer: &[u8], offset: usize) -> Ipv4Addr {
    let mut octets = [0u8; 4];
    octets.copy_from_slice(&buffer[offset..offset + 4]);
    Ipv4Addr::from(octets)
}

/// Reads a 6-byte hardware address at `offset`.
pub fn read_hardware_address(buffer: &[u8], offset: usize) -> HardwareAddress {
    let mut octets = [0u8; HARDWARE_ADDRESS_LEN];
    octets.copy_from_slice(&buffer[offset..offset + HARDWARE_ADDRESS_LEN]);
    HardwareAddress(octets)
}

pub fn write_address(buffer: &mut [u8], offset: usize, address: Ipv4Addr) {
    buffer[offset..offset + 4].copy_from_slice(&address.octets());
}

pub fn write_hardware_address(buffer: &mut [u8], offset: usize, address: HardwareAddress) {
    buffer[offset..offset + HARDWARE_ADDRESS_LEN].copy_from_slice(&address.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_write_address_at_offset() {
        let mut buf = [0u8; 12];
        write_address(&mut buf, 5, Ipv4Addr::new(10, 0, 0, 5));

        assert_eq!(&buf[5..9], &[10, 0, 0, 5]);
        assert_eq!(read_address(&buf, 5), Ipv4Addr::new(10, 0, 0, 5));
        assert_eq!(read_address(&buf, 0), Ipv4Addr::UNSPECIFIED);
    }

    #[test]
    fn test_read_broadcast_address() {
        let buf = [0xffu8; 4];
        assert_eq!(read_address(&buf, 0), Ipv4Addr::BROADCAST);
    }

    #[test]
    fn test_read_write_hardware_address() {
        let mac = HardwareAddress::new([0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]);
        let mut buf = [0u8; 8];
        write_hardware_address(&mut buf, 2, mac);

        assert_eq!(buf, [0, 0, 0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]);
        assert_eq!(read_hardware_address(&buf, 2), mac);
    }

    #[test]
    #[should_panic]
    fn test_write_past_end_panics() {
        let mut buf = [0u8; 3];
        write_address(&mut buf, 0, Ipv4Addr::LOCALHOST);
    }

    #[test]
    fn test_parse_and_display_mac() {
        let mac: HardwareAddress = "00:0c:29:A8:92:f4\n".parse().unwrap();
        assert_eq!(mac.octets(), [0x00, 0x0c, 0x29, 0xa8, 0x92, 0xf4]);
        assert_eq!(mac.to_string(), "00:0c:29:a8:92:f4");
        assert!(HardwareAddress::BROADCAST.is_broadcast());
    }

    #[test]
    fn test_parse_mac_rejects_bad_input() {
        assert!(matches!(
            "00:0c:29".parse::<HardwareAddress>(),
            Err(CourierError::MacParse(_))
        ));
        assert!(matches!(
            "00:0c:29:a8:92:f4:01".parse::<HardwareAddress>(),
            Err(CourierError::MacParse(_))
        ));
        assert!(matches!(
            "zz:0c:29:a8:92:f4".parse::<HardwareAddress>(),
            Err(CourierError::MacParse(_))
        ));
    }
}
