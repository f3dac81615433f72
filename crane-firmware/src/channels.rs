//! Inter-task communication channels
//!
//! The bus receive task runs on the interrupt executor and hands raw
//! messages to the node task through a critical-section channel.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use crane_core::transport::{Inbox, RawMessage};

/// Channel capacity for inbound bus messages
const BUS_RX_SIZE: usize = 8;

/// Raw bus writes addressed to this node
pub static BUS_RX: Channel<CriticalSectionRawMutex, RawMessage, BUS_RX_SIZE> = Channel::new();

/// [`Inbox`] view of [`BUS_RX`] for the node runtime
pub struct ChannelInbox;

impl Inbox for ChannelInbox {
    fn poll_message(&mut self) -> Option<RawMessage> {
        BUS_RX.try_receive().ok()
    }
}
