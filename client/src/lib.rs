//! # client
//!
//! Leptos + WASM dashboard for the occupancy hub.
//!
//! The crate renders a camera's live view, hosts the `overlay` engine on a
//! canvas above the video, and keeps one binary websocket to the hub through
//! [`net::sync_channel::SyncChannel`]. Browser-only code sits behind the
//! `csr` feature so the state and channel logic build and test natively.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: install panic and log hooks, then mount the app.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        leptos::logging::warn!("console log init failed: {e}");
    }
    leptos::mount::mount_to_body(app::App);
}
