// Transport seam for the handshake and message traffic

use std::sync::mpsc::{channel, Receiver, Sender};

use tracing::trace;

use super::envelope::ProtocolMessage;
use crate::error::{CryptoError, Result};

/// A bidirectional link to the peer, owned by the caller's session context
pub trait Channel {
    fn send(&mut self, message: &ProtocolMessage) -> Result<()>;
    fn recv(&mut self) -> Result<ProtocolMessage>;
}

/// In-process duplex channel carrying the JSON wire text
pub struct MemoryChannel {
    tx: Sender<String>,
    rx: Receiver<String>,
}

impl MemoryChannel {
    /// Two connected endpoints
    pub fn pair() -> (Self, Self) {
        let (a_tx, b_rx) = channel();
        let (b_tx, a_rx) = channel();
        (
            Self { tx: a_tx, rx: a_rx },
            Self { tx: b_tx, rx: b_rx },
        )
    }
}

impl Channel for MemoryChannel {
    fn send(&mut self, message: &ProtocolMessage) -> Result<()> {
        let wire = message.to_wire()?;
        trace!(kind = message.kind(), len = wire.len(), "channel send");
        self.tx
            .send(wire)
            .map_err(|_| CryptoError::Channel("peer disconnected".to_string()))
    }

    fn recv(&mut self) -> Result<ProtocolMessage> {
        let wire = self
            .rx
            .recv()
            .map_err(|_| CryptoError::Channel("peer disconnected".to_string()))?;
        let message = ProtocolMessage::from_wire(&wire)?;
        trace!(kind = message.kind(), len = wire.len(), "channel recv");
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::envelope::WrappedKey;

    #[test]
    fn test_pair_is_duplex() {
        let (mut a, mut b) = MemoryChannel::pair();
        let message = ProtocolMessage::SessionKey {
            wrapped_key: WrappedKey("AQAB".to_string()),
        };

        a.send(&message).unwrap();
        assert_eq!(b.recv().unwrap(), message);

        b.send(&message).unwrap();
        assert_eq!(a.recv().unwrap(), message);
    }

    #[test]
    fn test_disconnected_peer() {
        let (mut a, b) = MemoryChannel::pair();
        drop(b);
        assert!(matches!(a.recv(), Err(CryptoError::Channel(_))));
    }
}
