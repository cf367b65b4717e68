//! Networking for the camera channel.
//!
//! SYSTEM CONTEXT
//! ==============
//! `sync_channel` routes decoded events to subscribed components and encodes
//! outbound edits; `ws` owns the websocket lifecycle in the browser and paces
//! reconnects with `backoff`.

pub mod backoff;
pub mod sync_channel;
#[cfg(feature = "csr")]
pub mod ws;
