//! Boot Reply classification
//!
//! Each inbound packet is classified on its own: Offers turn into a request
//! toward the client, Acks and Naks are handed to the client to apply.
//! The Discover/Offer/Request/Ack progression itself belongs to the client.

use super::{
    builder::AckMessage,
    message::{Message, MessageType, Opcode},
    options::codes,
};
use crate::error::DecodeError;
use std::net::Ipv4Addr;

/// The client side of the exchange.
///
/// Implementors must keep at most one request outstanding at a time:
/// transaction ids are drawn at random with no collision check, so replies
/// can only be matched reliably against a single pending xid.
pub trait ReplyHandler {
    /// An offer arrived; ask `server` for `offered`.
    fn send_request(&mut self, offered: Ipv4Addr, server: Ipv4Addr);

    /// An Ack or Nak arrived.
    fn apply(&mut self, ack: AckMessage, is_renewal: bool);
}

/// Client state read by the dispatcher, owned by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClientState {
    /// Set once the client has asked for a lease; replies applied while set
    /// are reported as renewals.
    pub request_outstanding: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Offer { offered: Ipv4Addr, server: Ipv4Addr },
    Ack,
    Nak,
    /// Not a Boot Reply, or option 53 missing or of no interest.
    Ignored,
}

/// Classifies a decoded message without acting on it.
pub fn classify(msg: &Message) -> Classification {
    if msg.opcode() != Opcode::BootReply {
        tracing::debug!("Ignoring non-reply opcode {:?}", msg.opcode());
        return Classification::Ignored;
    }

    match msg.message_type() {
        Ok(MessageType::Offer) => Classification::Offer {
            offered: msg.yiaddr(),
            server: offering_server(msg),
        },
        Ok(MessageType::Ack) => Classification::Ack,
        Ok(MessageType::Nak) => Classification::Nak,
        Ok(other) => {
            tracing::debug!("Ignoring DHCP {} reply", other);
            Classification::Ignored
        }
        Err(e) => {
            tracing::debug!("Ignoring reply: {}", e);
            Classification::Ignored
        }
    }
}

/// Next-server address, or the server identifier when next-server is unset.
fn offering_server(msg: &Message) -> Ipv4Addr {
    if !msg.siaddr().is_unspecified() {
        return msg.siaddr();
    }
    msg.option(codes::SERVER_ID)
        .map(|opt| opt.data())
        .filter(|data| data.len() >= 4)
        .map(|data| super::address::read_address(data, 0))
        .unwrap_or(msg.siaddr())
}

/// Classifies `msg` and invokes the matching client action.
pub fn dispatch<C>(msg: Message, state: ClientState, client: &mut C) -> Classification
where
    C: ReplyHandler + ?Sized,
{
    let classification = classify(&msg);
    tracing::debug!("Classified XID={:x} as {:?}", msg.xid(), classification);

    match classification {
        Classification::Offer { offered, server } => {
            tracing::info!("Received DHCP OFFER of {} from {}", offered, server);
            client.send_request(offered, server);
        }
        Classification::Ack | Classification::Nak => {
            client.apply(AckMessage::from_message(msg), state.request_outstanding);
        }
        Classification::Ignored => {}
    }
    classification
}

/// Decodes a UDP payload and dispatches it.
///
/// Decode errors are returned before the client sees anything.
pub fn handle_packet<C>(
    packet: &[u8],
    state: ClientState,
    client: &mut C,
) -> Result<Classification, DecodeError>
where
    C: ReplyHandler + ?Sized,
{
    let msg = Message::decode(packet).map_err(|e| {
        tracing::debug!("Failed to decode DHCP message: {}", e);
        e
    })?;
    Ok(dispatch(msg, state, client))
}
