//! Verification protocol
//!
//! The coordinator's handshake round and its bluetooth identification
//! probe. Responder behaviour (queueing a subscribed ack on `Ping`) lives
//! in the node's receive path.

pub mod handshake;
pub mod link;

pub use handshake::{AckFlags, Handshake, HandshakeAction, HandshakePhase};
pub use link::{classify, LinkProbe};
