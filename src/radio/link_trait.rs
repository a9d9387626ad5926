//! Trait abstraction for the radio link to enable testing

use async_trait::async_trait;

use crate::error::Result;

/// Fire-and-forget transmission boundary.
///
/// One call attempts one transmission; no acknowledgment is awaited and no
/// retry occurs on failure. The caller treats a failed send and a successful
/// one the same way, superseding both with the next scheduled packet.
#[async_trait]
pub trait RadioLink: Send {
    /// Push one encoded control packet to the modem.
    async fn send_packet(&mut self, packet: &[u8]) -> Result<()>;
}
