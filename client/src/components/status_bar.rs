//! Connection indicator for the hub websocket.

#[cfg(test)]
#[path = "status_bar_test.rs"]
mod status_bar_test;

use leptos::prelude::*;

use crate::net::sync_channel::ConnectionStatus;

/// Dot and label reflecting the current [`ConnectionStatus`].
#[component]
pub fn StatusBar() -> impl IntoView {
    let status = expect_context::<RwSignal<ConnectionStatus>>();

    view! {
        <div class="status-bar">
            <span class=move || connection_status_class(status.get())></span>
            <span class="status-bar__label">{move || connection_status_label(status.get())}</span>
        </div>
    }
}

fn connection_status_class(status: ConnectionStatus) -> &'static str {
    match status {
        ConnectionStatus::Connected => "status-bar__dot status-bar__dot--connected",
        ConnectionStatus::Connecting => "status-bar__dot status-bar__dot--connecting",
        ConnectionStatus::Disconnected => "status-bar__dot status-bar__dot--disconnected",
    }
}

fn connection_status_label(status: ConnectionStatus) -> &'static str {
    match status {
        ConnectionStatus::Connected => "Live",
        ConnectionStatus::Connecting => "Connecting...",
        ConnectionStatus::Disconnected => "Offline",
    }
}
