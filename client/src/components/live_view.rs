//! Live camera panel: stream control, occupancy counts, and the video stage.
//!
//! SYSTEM CONTEXT
//! ==============
//! Holds the `Frames` and `Counts` subscriptions and the stream request for
//! the selected camera, releasing all three when the camera changes, and
//! hosts [`TripwireOverlay`] above the video. Inline and fullscreen layouts
//! share one stage and one overlay engine, so geometry never mixes
//! reference spaces between the two.

use frames::Event;
use leptos::prelude::*;

use crate::app::ChannelHandle;
use crate::components::tripwire_overlay::TripwireOverlay;
use crate::net::sync_channel::Topic;
use crate::state::live_view::LiveViewState;

/// Live view for the camera in `camera`.
#[component]
pub fn LiveView(#[prop(into)] camera: Signal<Option<String>>) -> impl IntoView {
    let channel = expect_context::<ChannelHandle>();
    let state = RwSignal::new(LiveViewState::default());
    let video_ref = NodeRef::<leptos::html::Img>::new();
    let subscribed = StoredValue::new(None::<String>);

    Effect::new(move |prev: Option<Option<String>>| {
        let next = camera.get();
        let prev = prev.flatten();
        if prev == next {
            return next;
        }
        state.update(|s| s.select_camera(next.clone()));
        channel.with_value(|c| {
            if let Some(old) = prev.as_deref() {
                c.unsubscribe(Topic::Frames, old);
                c.unsubscribe(Topic::Counts, old);
                c.stop_stream(old);
            }
            if let Some(cam) = next.as_deref() {
                c.subscribe(Topic::Frames, cam, move |event| {
                    if let Event::VideoFrame(frame) = event {
                        state.maybe_update(|s| s.apply_frame(frame));
                    }
                });
                c.subscribe(Topic::Counts, cam, move |event| {
                    if let Event::UpdateCounts(counts) = event {
                        state.maybe_update(|s| s.apply_counts(counts));
                    }
                });
            }
        });
        subscribed.set_value(next.clone());
        next
    });

    on_cleanup(move || {
        if let Some(Some(camera)) = subscribed.try_get_value() {
            let _ = channel.try_with_value(|c| {
                c.unsubscribe(Topic::Frames, &camera);
                c.unsubscribe(Topic::Counts, &camera);
                c.stop_stream(&camera);
            });
        }
    });

    let on_start_stream = move |_| {
        let Some(cam) = state.with_untracked(|s| s.camera.clone()) else {
            return;
        };
        if !channel.with_value(|c| c.start_stream(&cam)) {
            log::info!("live view: stream request for {cam} queued until the hub connects");
        }
        state.update(LiveViewState::mark_streaming);
    };
    let on_toggle_fullscreen = move |_| state.update(LiveViewState::toggle_fullscreen);

    #[cfg(feature = "csr")]
    {
        let escape = window_event_listener(leptos::ev::keydown, move |ev| {
            if ev.key() == "Escape" && state.with_untracked(|s| s.fullscreen) {
                state.update(|s| s.set_fullscreen(false));
            }
        });
        on_cleanup(move || escape.remove());
    }

    let fullscreen = Signal::derive(move || state.with(|s| s.fullscreen));

    view! {
        <section class="live-view">
            <div class="live-view__toolbar">
                <span class="live-view__camera">{move || state.with(|s| s.camera.clone().unwrap_or_default())}</span>
                <button
                    class="live-view__button"
                    on:click=on_start_stream
                    disabled=move || state.with(|s| s.camera.is_none() || s.streaming)
                >
                    {move || if state.with(|s| s.streaming) { "Streaming" } else { "Start stream" }}
                </button>
            </div>
            <dl class="live-view__counts">
                <dt>"In"</dt>
                <dd>{move || state.with(|s| s.counts.entered)}</dd>
                <dt>"Out"</dt>
                <dd>{move || state.with(|s| s.counts.exited)}</dd>
                <dt>"Current"</dt>
                <dd>{move || state.with(|s| s.counts.current)}</dd>
            </dl>
            <div class=move || stage_class(fullscreen.get())>
                <img
                    class="live-view__video"
                    node_ref=video_ref
                    src=move || state.with(|s| s.frame_url.clone())
                    alt="Live camera feed"
                    draggable="false"
                />
                <TripwireOverlay camera=camera video_ref=video_ref fullscreen=fullscreen/>
                <button class="live-view__fullscreen" on:click=on_toggle_fullscreen>
                    {move || if fullscreen.get() { "Exit fullscreen" } else { "Fullscreen" }}
                </button>
            </div>
        </section>
    }
}

fn stage_class(fullscreen: bool) -> &'static str {
    if fullscreen { "live-view__stage live-view__stage--fullscreen" } else { "live-view__stage" }
}
