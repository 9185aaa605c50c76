//! Cross-checks of the encoded client messages against an independent decoder.

use super::*;
use dhcproto::{v4, Decodable, Decoder};
use std::net::Ipv4Addr;

const MAC: HardwareAddress = HardwareAddress::new([0x00, 0x0c, 0x29, 0xa8, 0x92, 0xf4]);

fn decode(packet: &[u8]) -> v4::Message {
    v4::Message::decode(&mut Decoder::new(packet)).unwrap()
}

#[test]
fn test_build_dhcp_discover() {
    let out = build_dhcp_discover(MAC);
    let msg = decode(&out.payload);

    assert_eq!(msg.xid(), out.xid);
    assert_eq!(msg.chaddr(), &MAC.octets()[..]);
    assert_eq!(msg.opcode(), v4::Opcode::BootRequest);
    assert_eq!(msg.ciaddr(), Ipv4Addr::UNSPECIFIED);

    let msg_type = msg.opts().get(v4::OptionCode::MessageType);
    assert!(matches!(
        msg_type,
        Some(v4::DhcpOption::MessageType(v4::MessageType::Discover))
    ));

    let params = msg.opts().get(v4::OptionCode::ParameterRequestList);
    assert!(matches!(
        params,
        Some(v4::DhcpOption::ParameterRequestList(list)) if list == &vec![
            v4::OptionCode::SubnetMask,
            v4::OptionCode::Router,
            v4::OptionCode::DomainName,
            v4::OptionCode::DomainNameServer,
        ]
    ));
}

#[test]
fn test_build_dhcp_request() {
    let offered_ip = Ipv4Addr::new(192, 168, 1, 100);
    let server_ip = Ipv4Addr::new(192, 168, 1, 1);

    let out = build_dhcp_request(MAC, offered_ip, server_ip);
    let msg = decode(&out.payload);

    assert_eq!(msg.xid(), out.xid);
    assert_eq!(msg.chaddr(), &MAC.octets()[..]);

    let msg_type = msg.opts().get(v4::OptionCode::MessageType);
    assert!(matches!(
        msg_type,
        Some(v4::DhcpOption::MessageType(v4::MessageType::Request))
    ));

    let requested_ip = msg.opts().get(v4::OptionCode::RequestedIpAddress);
    assert!(matches!(
        requested_ip,
        Some(v4::DhcpOption::RequestedIpAddress(ip)) if *ip == offered_ip
    ));

    let server_id = msg.opts().get(v4::OptionCode::ServerIdentifier);
    assert!(matches!(server_id, Some(v4::DhcpOption::ServerIdentifier(ip)) if *ip == server_ip));

    // Flags stay zero, the broadcast bit is not set
    assert!(!msg.flags().broadcast());
}

#[test]
fn test_build_dhcp_release() {
    let client_ip = Ipv4Addr::new(10, 0, 0, 5);
    let server_ip = Ipv4Addr::new(10, 0, 0, 1);

    let out = build_dhcp_release(MAC, client_ip, server_ip);
    let msg = decode(&out.payload);

    assert_eq!(msg.ciaddr(), client_ip);
    assert!(matches!(
        msg.opts().get(v4::OptionCode::MessageType),
        Some(v4::DhcpOption::MessageType(v4::MessageType::Release))
    ));

    let client_id = msg.opts().get(v4::OptionCode::ClientIdentifier);
    assert!(matches!(
        client_id,
        Some(v4::DhcpOption::ClientIdentifier(id)) if id == &[1, 0x00, 0x0c, 0x29, 0xa8, 0x92, 0xf4]
    ));
}
