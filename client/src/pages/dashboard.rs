//! Dashboard page: camera roster with a side panel for the open camera.
//!
//! SYSTEM CONTEXT
//! ==============
//! The roster lives in an `RwSignal<CameraListState>` owned by this page. Its
//! selection drives the live view, which stays mounted so closing the panel
//! reaches the overlay as a deselect. A `?camera=` link lists and opens that
//! camera on arrival.

use leptos::prelude::*;
use leptos_router::hooks::use_query_map;

use crate::app::ChannelHandle;
use crate::components::camera_grid::CameraGrid;
use crate::components::live_view::LiveView;
use crate::components::status_bar::StatusBar;
use crate::state::cameras::CameraListState;
use crate::util::location::camera_param;

/// Dashboard page: connection status, camera grid, and the live view panel.
#[component]
pub fn DashboardPage() -> impl IntoView {
    let channel = expect_context::<ChannelHandle>();
    let query = use_query_map();
    let cameras = RwSignal::new(CameraListState::default());

    let linked = Memo::new(move |_| camera_param(query.with(|q| q.get("camera"))));
    Effect::new(move || {
        if let Some(address) = linked.get() {
            cameras.update(|s| {
                s.open(&address);
            });
        }
    });

    // Tiles show counts for every listed camera, not just the open one.
    channel.with_value(|c| {
        c.observe_counts(move |counts| {
            cameras.maybe_update(|s| s.apply_counts(counts));
        });
    });
    on_cleanup(move || {
        let _ = channel.try_with_value(|c| c.clear_counts_observer());
    });

    let selected = Memo::new(move |_| cameras.with(|s| s.selected.clone()));
    let panel_title = move || {
        cameras.with(|s| {
            s.selected_entry()
                .map(|c| format!("Camera {} ({})", c.number, c.address))
                .unwrap_or_default()
        })
    };

    view! {
        <div class="dashboard">
            <header class="dashboard__header">
                <h1 class="dashboard__title">"Occupancy"</h1>
                <span class="dashboard__total">
                    {move || format!("Total occupancy: {}", cameras.with(CameraListState::total_occupancy))}
                </span>
                <StatusBar/>
            </header>
            <div class="dashboard__body">
                <CameraGrid cameras=cameras/>
                <aside class="dashboard__panel" class:dashboard__panel--open=move || selected.with(Option::is_some)>
                    <div class="dashboard__panel-header">
                        <span class="dashboard__panel-title">{panel_title}</span>
                        <button
                            class="btn dashboard__panel-close"
                            on:click=move |_| cameras.update(CameraListState::close)
                            title="Close camera"
                            aria-label="Close camera"
                        >
                            "✕"
                        </button>
                    </div>
                    <LiveView camera=selected/>
                </aside>
            </div>
        </div>
    }
}
