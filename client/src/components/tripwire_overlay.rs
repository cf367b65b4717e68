//! Bridge component between Leptos state and the imperative `overlay::Engine`.
//!
//! ARCHITECTURE
//! ============
//! The overlay crate owns gesture, mapping, and drawing rules. This host feeds
//! it DOM pointer events together with the video's current on-screen bounds,
//! executes the returned actions in order, and keeps one `Tripwire`
//! subscription for the selected camera so hub pushes reach the working copy.

use leptos::prelude::*;

use crate::app::ChannelHandle;

#[cfg(feature = "csr")]
use std::cell::RefCell;
#[cfg(feature = "csr")]
use std::rc::Rc;

#[cfg(feature = "csr")]
use frames::Event;
#[cfg(feature = "csr")]
use overlay::engine::{Action, Engine};
#[cfg(feature = "csr")]
use overlay::input::Button;
#[cfg(feature = "csr")]
use overlay::mapper::ReferenceSpace;

#[cfg(feature = "csr")]
use crate::net::sync_channel::{SyncChannel, Topic};
#[cfg(feature = "csr")]
use crate::util::overlay_input::{client_point, client_rect, commit_payload, remote_update};

#[cfg(feature = "csr")]
type EngineSlot = Rc<RefCell<Option<Engine>>>;

/// Refresh the engine's view of where the video sits and how large it decodes.
#[cfg(feature = "csr")]
fn sync_layout(engine: &mut Engine, video_ref: NodeRef<leptos::html::Img>) {
    let Some(video) = video_ref.get_untracked() else {
        return;
    };
    let natural = (f64::from(video.natural_width()), f64::from(video.natural_height()));
    engine.sync_layout(client_rect(&video), Some(natural));
}

#[cfg(feature = "csr")]
fn render(engine: &Engine) {
    if let Err(e) = engine.render() {
        log::warn!("overlay: render failed: {e:?}");
    }
}

/// Execute engine actions in the order they were returned.
#[cfg(feature = "csr")]
fn process_actions(actions: Vec<Action>, engine: &Engine, channel: &SyncChannel, ev: Option<&web_sys::Event>) {
    for action in actions {
        match action {
            Action::PreventDefault => {
                if let Some(ev) = ev {
                    ev.prevent_default();
                }
            }
            Action::RenderNeeded => render(engine),
            Action::Publish(commit) => {
                let (camera, line, flip_direction) = commit_payload(&commit);
                if !channel.publish(camera, line, flip_direction) {
                    log::info!("overlay: tripwire for {camera} not sent, hub not connected");
                }
            }
        }
    }
}

/// Route inbound `tripwire-update` pushes for `camera` into the engine.
#[cfg(feature = "csr")]
fn subscribe_updates(channel: &SyncChannel, camera: &str, engine: EngineSlot, handle: ChannelHandle) {
    channel.subscribe(Topic::Tripwire, camera, move |event| {
        let Event::TripwireUpdate(update) = event else {
            return;
        };
        if let Some(engine) = engine.borrow_mut().as_mut() {
            let actions = engine.apply_remote(remote_update(update));
            let _ = handle.try_with_value(|c| process_actions(actions, engine, c, None));
        }
    });
}

/// Transparent canvas layered over the live video.
///
/// `video_ref` is the element the tripwire is drawn against; pointer input
/// is mapped relative to its bounds. `fullscreen` changes trigger a layout
/// re-sync the same way window resizes do.
#[component]
pub fn TripwireOverlay(
    #[prop(into)] camera: Signal<Option<String>>,
    video_ref: NodeRef<leptos::html::Img>,
    #[prop(into)] fullscreen: Signal<bool>,
) -> impl IntoView {
    let channel = expect_context::<ChannelHandle>();
    let canvas_ref = NodeRef::<leptos::html::Canvas>::new();

    #[cfg(feature = "csr")]
    let engine: EngineSlot = Rc::new(RefCell::new(None));

    // Mount the engine once the canvas exists.
    #[cfg(feature = "csr")]
    {
        let engine = Rc::clone(&engine);
        Effect::new(move || {
            let Some(canvas) = canvas_ref.get() else {
                return;
            };
            if engine.borrow().is_some() {
                return;
            }
            let mut instance = Engine::new(canvas, ReferenceSpace::default());
            sync_layout(&mut instance, video_ref);
            if let Some(camera) = camera.get_untracked() {
                let actions = instance.select_camera(&camera);
                channel.with_value(|c| process_actions(actions, &instance, c, None));
            } else {
                render(&instance);
            }
            *engine.borrow_mut() = Some(instance);
        });
    }

    // Follow the selected camera: move the subscription, then rescope the engine.
    #[cfg(feature = "csr")]
    let subscribed = StoredValue::new(None::<String>);
    #[cfg(feature = "csr")]
    {
        let engine = Rc::clone(&engine);
        Effect::new(move |prev: Option<Option<String>>| {
            let next = camera.get();
            let prev = prev.flatten();
            if prev == next {
                return next;
            }
            channel.with_value(|c| {
                if let Some(old) = prev.as_deref() {
                    c.unsubscribe(Topic::Tripwire, old);
                }
                if let Some(cam) = next.as_deref() {
                    subscribe_updates(c, cam, Rc::clone(&engine), channel);
                }
            });
            subscribed.set_value(next.clone());

            if let Some(engine) = engine.borrow_mut().as_mut() {
                let actions = match next.as_deref() {
                    Some(cam) => engine.select_camera(cam),
                    None => engine.deselect_camera(),
                };
                channel.with_value(|c| process_actions(actions, engine, c, None));
            }
            next
        });

        on_cleanup(move || {
            if let Some(Some(camera)) = subscribed.try_get_value() {
                let _ = channel.try_with_value(|c| c.unsubscribe(Topic::Tripwire, &camera));
            }
        });
    }

    // Layout changes: window resize and fullscreen toggles.
    #[cfg(feature = "csr")]
    {
        let engine_resize = Rc::clone(&engine);
        let resize = window_event_listener(leptos::ev::resize, move |_| {
            if let Some(engine) = engine_resize.borrow_mut().as_mut() {
                sync_layout(engine, video_ref);
                render(engine);
            }
        });
        on_cleanup(move || resize.remove());

        let engine = Rc::clone(&engine);
        Effect::new(move || {
            fullscreen.track();
            if let Some(engine) = engine.borrow_mut().as_mut() {
                sync_layout(engine, video_ref);
                render(engine);
            }
        });
    }
    #[cfg(not(feature = "csr"))]
    let _ = (camera, fullscreen, video_ref, channel);

    let on_pointer_down = {
        #[cfg(feature = "csr")]
        {
            let engine = Rc::clone(&engine);
            move |ev: leptos::ev::PointerEvent| {
                let Some(button) = Button::from_dom(ev.button()) else {
                    return;
                };
                if button == Button::Middle {
                    // Keep the browser from entering autoscroll before auxclick.
                    ev.prevent_default();
                }
                if button == Button::Primary {
                    if let Some(canvas) = canvas_ref.get_untracked() {
                        if let Err(e) = canvas.set_pointer_capture(ev.pointer_id()) {
                            log::warn!("overlay: pointer capture failed: {e:?}");
                        }
                    }
                }
                if let Some(engine) = engine.borrow_mut().as_mut() {
                    sync_layout(engine, video_ref);
                    let actions = engine.on_pointer_down(client_point(&ev), button);
                    let dom_event: &web_sys::Event = &ev;
                    channel.with_value(|c| process_actions(actions, engine, c, Some(dom_event)));
                }
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            move |_ev: leptos::ev::PointerEvent| {}
        }
    };

    let on_pointer_move = {
        #[cfg(feature = "csr")]
        {
            let engine = Rc::clone(&engine);
            move |ev: leptos::ev::PointerEvent| {
                if let Some(engine) = engine.borrow_mut().as_mut() {
                    if !engine.core().is_dragging() {
                        return;
                    }
                    sync_layout(engine, video_ref);
                    let actions = engine.on_pointer_move(client_point(&ev));
                    channel.with_value(|c| process_actions(actions, engine, c, None));
                }
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            move |_ev: leptos::ev::PointerEvent| {}
        }
    };

    let on_pointer_up = {
        #[cfg(feature = "csr")]
        {
            let engine = Rc::clone(&engine);
            move |ev: leptos::ev::PointerEvent| {
                let Some(button) = Button::from_dom(ev.button()) else {
                    return;
                };
                if let Some(engine) = engine.borrow_mut().as_mut() {
                    sync_layout(engine, video_ref);
                    let actions = engine.on_pointer_up(client_point(&ev), button);
                    channel.with_value(|c| process_actions(actions, engine, c, None));
                }
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            move |_ev: leptos::ev::PointerEvent| {}
        }
    };

    let on_context_menu = {
        #[cfg(feature = "csr")]
        {
            let engine = Rc::clone(&engine);
            move |ev: leptos::ev::MouseEvent| {
                if let Some(engine) = engine.borrow_mut().as_mut() {
                    let actions = engine.on_context_menu();
                    let dom_event: &web_sys::Event = &ev;
                    channel.with_value(|c| process_actions(actions, engine, c, Some(dom_event)));
                } else {
                    ev.prevent_default();
                }
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            move |_ev: leptos::ev::MouseEvent| {}
        }
    };

    let on_aux_click = {
        #[cfg(feature = "csr")]
        {
            let engine = Rc::clone(&engine);
            move |ev: leptos::ev::MouseEvent| {
                let Some(button) = Button::from_dom(ev.button()) else {
                    return;
                };
                if let Some(engine) = engine.borrow_mut().as_mut() {
                    let actions = engine.on_aux_click(button);
                    let dom_event: &web_sys::Event = &ev;
                    channel.with_value(|c| process_actions(actions, engine, c, Some(dom_event)));
                }
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            move |_ev: leptos::ev::MouseEvent| {}
        }
    };

    view! {
        <canvas
            class="tripwire-overlay"
            node_ref=canvas_ref
            on:pointerdown=on_pointer_down
            on:pointermove=on_pointer_move
            on:pointerup=on_pointer_up
            on:contextmenu=on_context_menu
            on:auxclick=on_aux_click
        />
    }
}
