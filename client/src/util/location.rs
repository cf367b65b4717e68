//! Page location helpers: websocket endpoint and camera selection.

#[cfg(test)]
#[path = "location_test.rs"]
mod location_test;

/// Path of the hub's websocket endpoint.
pub const WS_PATH: &str = "/api/ws";

/// Websocket URL for the page's own host, `wss` when served over https.
#[must_use]
pub fn ws_url(page_protocol: &str, host: &str) -> String {
    let scheme = if page_protocol.starts_with("https") { "wss" } else { "ws" };
    format!("{scheme}://{host}{WS_PATH}")
}

/// Normalize the `?camera=` query value; blank means no camera selected.
#[must_use]
pub fn camera_param(raw: Option<String>) -> Option<String> {
    raw.map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}
