//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::net::sync_channel::{ConnectionStatus, SyncChannel};
use crate::pages::dashboard::DashboardPage;

/// Context handle to the app-wide [`SyncChannel`].
///
/// The channel is `Rc`-based, so it lives in local arena storage; the handle
/// itself is `Copy` and can move into any closure.
pub type ChannelHandle = StoredValue<SyncChannel, LocalStorage>;

/// Root application component.
///
/// Opens the hub connection once and provides it, with its status signal, to
/// every page.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let status = RwSignal::new(ConnectionStatus::default());
    let channel: ChannelHandle = StoredValue::new_local(open_channel(status));

    provide_context(status);
    provide_context(channel);

    view! {
        <Title text="Occupancy"/>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("") view=DashboardPage/>
            </Routes>
        </Router>
    }
}

#[cfg(feature = "csr")]
fn open_channel(status: RwSignal<ConnectionStatus>) -> SyncChannel {
    crate::net::ws::spawn_sync_channel(status)
}

#[cfg(not(feature = "csr"))]
fn open_channel(_status: RwSignal<ConnectionStatus>) -> SyncChannel {
    SyncChannel::new(crate::net::sync_channel::Detached)
}
