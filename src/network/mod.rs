//! UDP transport for the client: a broadcast-capable socket on port 68,
//! pinned to one interface, and the interface's hardware address.

use crate::{config::ClientConfig, error::CourierError, v4::HardwareAddress};
use std::{
    io,
    net::{Ipv4Addr, SocketAddr, SocketAddrV4, UdpSocket as StdUdpSocket},
};
use thiserror::Error;
use tokio::net::UdpSocket as TokioUdpSocket;

#[derive(Error, Debug)]
pub enum SocketError {
    #[error("Failed to create a new socket")]
    CreateSocket(#[source] io::Error),

    #[error("Failed to enable broadcast on socket")]
    SetBroadcast(#[source] io::Error),

    #[error("Failed to set SO_REUSEADDR on socket")]
    SetReuseAddress(#[source] io::Error),

    #[error("Failed to set SO_BINDTODEVICE on interface '{interface}'")]
    BindToDevice {
        interface: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to bind socket to {addr}")]
    BindSocket {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("Failed to hand socket to the runtime")]
    ConvertToTokio(#[source] io::Error),

    #[allow(dead_code)]
    #[error("Binding to a specific device is not implemented on this platform")]
    NotImplemented,
}

/// Opens the client socket described by `config`.
pub fn bind_client_socket(config: &ClientConfig) -> Result<TokioUdpSocket, SocketError> {
    use socket2::{Domain, Socket, Type};

    let socket = Socket::new(Domain::IPV4, Type::DGRAM, None).map_err(SocketError::CreateSocket)?;
    socket
        .set_broadcast(true)
        .map_err(SocketError::SetBroadcast)?;
    socket
        .set_reuse_address(true)
        .map_err(SocketError::SetReuseAddress)?;
    bind_to_device(&socket, &config.interface)?;

    let addr = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, config.client_port));
    socket
        .bind(&addr.into())
        .map_err(|source| SocketError::BindSocket { addr, source })?;
    socket
        .set_nonblocking(true)
        .map_err(SocketError::ConvertToTokio)?;

    tracing::debug!("Bound {} on interface '{}'", addr, config.interface);
    TokioUdpSocket::from_std(StdUdpSocket::from(socket)).map_err(SocketError::ConvertToTokio)
}

#[cfg(target_os = "linux")]
fn bind_to_device(socket: &socket2::Socket, interface: &str) -> Result<(), SocketError> {
    use std::os::fd::AsRawFd;

    // SAFETY: the fd is owned by `socket` and the option value is a valid
    // byte buffer of the given length.
    let ret = unsafe {
        libc::setsockopt(
            socket.as_raw_fd(),
            libc::SOL_SOCKET,
            libc::SO_BINDTODEVICE,
            interface.as_ptr() as *const libc::c_void,
            interface.len() as libc::socklen_t,
        )
    };
    if ret < 0 {
        return Err(SocketError::BindToDevice {
            interface: interface.to_string(),
            source: io::Error::last_os_error(),
        });
    }
    Ok(())
}

#[cfg(not(target_os = "linux"))]
fn bind_to_device(_socket: &socket2::Socket, _interface: &str) -> Result<(), SocketError> {
    Err(SocketError::NotImplemented)
}

/// Reads the interface's MAC address from sysfs.
pub async fn interface_hardware_address(interface: &str) -> Result<HardwareAddress, CourierError> {
    let path = format!("/sys/class/net/{interface}/address");
    let contents = tokio::fs::read_to_string(&path)
        .await
        .map_err(|_| CourierError::InterfaceInvalid(interface.to_string()))?;
    parse_interface_address(interface, &contents)
}

/// Parses the contents of a sysfs `address` file. An all-zero address means
/// the interface has no usable MAC.
fn parse_interface_address(
    interface: &str,
    contents: &str,
) -> Result<HardwareAddress, CourierError> {
    let mac: HardwareAddress = contents.parse()?;
    if mac == HardwareAddress::ZERO {
        return Err(CourierError::InterfaceInvalid(interface.to_string()));
    }
    Ok(mac)
}
