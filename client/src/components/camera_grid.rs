//! Paged grid of camera tiles with an add tile after the last camera.
//!
//! DESIGN
//! ======
//! Tiles only edit the shared `CameraListState`; opening the live view is the
//! dashboard's job, driven by the roster's selection.

use leptos::prelude::*;

use crate::state::cameras::{AddCameraError, CameraEntry, CameraListState};

/// Camera roster grid.
#[component]
pub fn CameraGrid(cameras: RwSignal<CameraListState>) -> impl IntoView {
    let on_select = Callback::new(move |address: String| {
        cameras.update(|s| {
            s.select(&address);
        });
    });
    let on_remove = Callback::new(move |address: String| {
        cameras.update(|s| {
            s.remove(&address);
        });
    });

    let page_label = move || cameras.with(|s| format!("Page {} of {}", s.page + 1, s.total_pages()));

    view! {
        <section class="camera-grid">
            <div class="camera-grid__tiles">
                {move || {
                    let selected = cameras.with(|s| s.selected.clone());
                    cameras
                        .with(|s| s.page_cameras().to_vec())
                        .into_iter()
                        .map(|entry| {
                            let active = selected.as_deref() == Some(entry.address.as_str());
                            view! { <CameraTile entry=entry active=active on_select=on_select on_remove=on_remove/> }
                        })
                        .collect::<Vec<_>>()
                }}
                <Show when=move || cameras.with(CameraListState::shows_add_tile)>
                    <AddCameraTile cameras=cameras/>
                </Show>
            </div>
            <Show when=move || cameras.with(|s| s.total_pages() > 1)>
                <nav class="camera-grid__pager">
                    <button
                        class="btn"
                        on:click=move |_| cameras.update(CameraListState::prev_page)
                        disabled=move || cameras.with(|s| s.page == 0)
                    >
                        "Previous"
                    </button>
                    <span class="camera-grid__page">{page_label}</span>
                    <button
                        class="btn"
                        on:click=move |_| cameras.update(CameraListState::next_page)
                        disabled=move || cameras.with(|s| s.page + 1 == s.total_pages())
                    >
                        "Next"
                    </button>
                </nav>
            </Show>
        </section>
    }
}

/// One camera: number, address, and its latest counts.
#[component]
fn CameraTile(
    entry: CameraEntry,
    active: bool,
    on_select: Callback<String>,
    on_remove: Callback<String>,
) -> impl IntoView {
    let select_address = entry.address.clone();
    let remove_address = entry.address.clone();
    let counts = entry.counts;

    view! {
        <div
            class="camera-tile"
            class:camera-tile--active=active
            on:click=move |_| on_select.run(select_address.clone())
        >
            <span class="camera-tile__number">{format!("Camera {}", entry.number)}</span>
            <span class="camera-tile__address">{entry.address}</span>
            <span class="camera-tile__counts">
                {format!("In {} / Out {} / Now {}", counts.entered, counts.exited, counts.current)}
            </span>
            <button
                class="camera-tile__remove"
                on:click=move |ev: leptos::ev::MouseEvent| {
                    ev.stop_propagation();
                    on_remove.run(remove_address.clone());
                }
                title="Remove camera"
                aria-label="Remove camera"
            >
                "✕"
            </button>
        </div>
    }
}

/// Address input that lists a new camera on Enter or Add.
#[component]
fn AddCameraTile(cameras: RwSignal<CameraListState>) -> impl IntoView {
    let address = RwSignal::new(String::new());
    let error = RwSignal::new(None::<&'static str>);

    let submit = Callback::new(move |()| {
        let result = cameras.try_update(|s| s.add(&address.get_untracked()));
        match result {
            Some(Ok(_)) => {
                address.set(String::new());
                error.set(None);
            }
            Some(Err(AddCameraError::Blank)) => error.set(Some("Enter a camera address")),
            Some(Err(AddCameraError::Duplicate)) => error.set(Some("Camera already added")),
            None => {}
        }
    });

    view! {
        <div class="camera-tile camera-tile--add">
            <input
                class="camera-tile__input"
                type="text"
                placeholder="Camera IP"
                prop:value=move || address.get()
                on:input=move |ev| address.set(event_target_value(&ev))
                on:keydown=move |ev: leptos::ev::KeyboardEvent| {
                    if ev.key() == "Enter" {
                        ev.prevent_default();
                        submit.run(());
                    }
                }
            />
            <button class="btn btn--primary" on:click=move |_| submit.run(())>
                "Add"
            </button>
            <Show when=move || error.with(Option::is_some)>
                <span class="camera-tile__error">{move || error.get().unwrap_or_default()}</span>
            </Show>
        </div>
    }
}
