//! Realtime camera channel shared by the whole dashboard.
//!
//! DESIGN
//! ======
//! One `SyncChannel` is created at the app root and handed to components
//! through context. Components subscribe per topic with the camera they
//! display; inbound frames are decoded once here and delivered only to the
//! subscription whose camera matches. Each topic holds at most one
//! subscription, so selecting another camera replaces the old handler
//! instead of stacking a second one.
//!
//! Outbound frames go through the [`Outbound`] seam. In the browser that is
//! the websocket loop's queue; tests substitute a recorder.
//!
//! ERROR HANDLING
//! ==============
//! Publishing is best-effort: when the socket is not connected the publish
//! is dropped and reported as `false`. Nothing is retried here except the
//! stream requests, which are replayed on every reconnect.

#[cfg(test)]
#[path = "sync_channel_test.rs"]
mod sync_channel_test;

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

use frames::{Event, SetTripwire, StartStream, UpdateCounts, WireLine, decode_event, encode_event};

/// Sink for encoded frames bound for the hub.
pub trait Outbound {
    /// Queue bytes for the socket; `false` when the transport is gone.
    fn send(&self, bytes: Vec<u8>) -> bool;
}

/// Transport for renders without a socket; every send is refused.
#[derive(Debug, Clone, Copy, Default)]
pub struct Detached;

impl Outbound for Detached {
    fn send(&self, _bytes: Vec<u8>) -> bool {
        false
    }
}

#[cfg(feature = "csr")]
impl Outbound for futures::channel::mpsc::UnboundedSender<Vec<u8>> {
    fn send(&self, bytes: Vec<u8>) -> bool {
        self.unbounded_send(bytes).is_ok()
    }
}

/// Websocket connection state as seen by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

/// Inbound event families a component can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// `tripwire-update`
    Tripwire,
    /// `frame`
    Frames,
    /// `update-counts`
    Counts,
}

impl Topic {
    /// Topic an inbound event is delivered on; `None` for outbound-only events.
    #[must_use]
    pub fn of(event: &Event) -> Option<Self> {
        match event {
            Event::TripwireUpdate(_) => Some(Self::Tripwire),
            Event::VideoFrame(_) => Some(Self::Frames),
            Event::UpdateCounts(_) => Some(Self::Counts),
            Event::SetTripwire(_) | Event::StartStream(_) => None,
        }
    }
}

type Handler = Rc<dyn Fn(&Event)>;
type CountsObserver = Rc<dyn Fn(&UpdateCounts)>;

struct Subscription {
    camera: String,
    handler: Handler,
}

struct Inner {
    outbound: Box<dyn Outbound>,
    status: ConnectionStatus,
    subscriptions: HashMap<Topic, Subscription>,
    /// Sees every `update-counts`, whatever camera is selected.
    counts_observer: Option<CountsObserver>,
    /// Cameras a stream was requested for, replayed after reconnect.
    streams: BTreeSet<String>,
}

/// Cloneable handle to the dashboard's camera channel.
#[derive(Clone)]
pub struct SyncChannel {
    inner: Rc<RefCell<Inner>>,
}

impl SyncChannel {
    pub fn new(outbound: impl Outbound + 'static) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                outbound: Box::new(outbound),
                status: ConnectionStatus::Disconnected,
                subscriptions: HashMap::new(),
                counts_observer: None,
                streams: BTreeSet::new(),
            })),
        }
    }

    // --- Subscriptions ---

    /// Deliver `topic` events for `camera` to `handler`.
    ///
    /// Returns `true` when an earlier subscription on the topic was replaced.
    pub fn subscribe(&self, topic: Topic, camera: &str, handler: impl Fn(&Event) + 'static) -> bool {
        let sub = Subscription { camera: camera.to_owned(), handler: Rc::new(handler) };
        self.inner.borrow_mut().subscriptions.insert(topic, sub).is_some()
    }

    /// Drop the `topic` subscription if it still belongs to `camera`.
    ///
    /// A cleanup that runs after another camera already subscribed leaves
    /// the newer subscription in place.
    pub fn unsubscribe(&self, topic: Topic, camera: &str) -> bool {
        let mut inner = self.inner.borrow_mut();
        if inner.subscriptions.get(&topic).is_some_and(|sub| sub.camera == camera) {
            inner.subscriptions.remove(&topic);
            true
        } else {
            false
        }
    }

    /// Receive counts for every camera, alongside the scoped `Counts`
    /// subscription. Replaces any earlier observer.
    pub fn observe_counts(&self, observer: impl Fn(&UpdateCounts) + 'static) {
        self.inner.borrow_mut().counts_observer = Some(Rc::new(observer));
    }

    pub fn clear_counts_observer(&self) {
        self.inner.borrow_mut().counts_observer = None;
    }

    #[must_use]
    pub fn subscribed_camera(&self, topic: Topic) -> Option<String> {
        self.inner
            .borrow()
            .subscriptions
            .get(&topic)
            .map(|sub| sub.camera.clone())
    }

    // --- Outbound ---

    /// Send `set-tripwire` for `camera`. Returns `false` when not connected.
    pub fn publish(&self, camera: &str, line: Option<WireLine>, flip_direction: bool) -> bool {
        let event = Event::SetTripwire(SetTripwire { camera: camera.to_owned(), line, flip_direction });
        self.send_event(&event)
    }

    /// Ask the hub to stream `camera`. The request is remembered and
    /// re-sent after every reconnect.
    pub fn start_stream(&self, camera: &str) -> bool {
        self.inner.borrow_mut().streams.insert(camera.to_owned());
        self.send_event(&Event::StartStream(StartStream { camera: camera.to_owned() }))
    }

    /// Forget the stream request for `camera` so reconnects stop replaying it.
    ///
    /// Nothing is sent; the hub has no stop event. Returns `true` when a
    /// request was remembered.
    pub fn stop_stream(&self, camera: &str) -> bool {
        self.inner.borrow_mut().streams.remove(camera)
    }

    /// Cameras whose stream requests are replayed after reconnect.
    #[must_use]
    pub fn active_streams(&self) -> Vec<String> {
        self.inner.borrow().streams.iter().cloned().collect()
    }

    fn send_event(&self, event: &Event) -> bool {
        let inner = self.inner.borrow();
        if inner.status != ConnectionStatus::Connected {
            log::debug!("sync: dropped {} for {} while {:?}", event.name(), event.camera(), inner.status);
            return false;
        }
        inner.outbound.send(encode_event(event))
    }

    // --- Inbound ---

    /// Decode one binary frame from the hub and deliver it.
    ///
    /// Returns `true` when a subscriber received the event.
    pub fn dispatch_bytes(&self, bytes: &[u8]) -> bool {
        match decode_event(bytes) {
            Ok(event) => self.dispatch(&event),
            Err(e) => {
                log::warn!("sync: dropped inbound frame: {e}");
                false
            }
        }
    }

    /// Deliver a decoded event to the counts observer and the matching
    /// subscription, if any.
    pub fn dispatch(&self, event: &Event) -> bool {
        let Some(topic) = Topic::of(event) else {
            return false;
        };
        let (observer, handler) = {
            let inner = self.inner.borrow();
            let observer = match event {
                Event::UpdateCounts(_) => inner.counts_observer.clone(),
                _ => None,
            };
            let handler = inner
                .subscriptions
                .get(&topic)
                .filter(|sub| sub.camera == event.camera())
                .map(|sub| Rc::clone(&sub.handler));
            (observer, handler)
        };
        // Borrow released: handlers may publish or resubscribe.
        let mut delivered = false;
        if let (Some(observer), Event::UpdateCounts(counts)) = (observer, event) {
            observer(counts);
            delivered = true;
        }
        if let Some(handler) = handler {
            handler(event);
            delivered = true;
        }
        delivered
    }

    // --- Connection ---

    #[must_use]
    pub fn connection_status(&self) -> ConnectionStatus {
        self.inner.borrow().status
    }

    /// Record a transport state change. Entering `Connected` replays the
    /// remembered stream requests.
    pub fn set_connection_status(&self, status: ConnectionStatus) {
        let streams = {
            let mut inner = self.inner.borrow_mut();
            let was = inner.status;
            inner.status = status;
            if status != ConnectionStatus::Connected || was == ConnectionStatus::Connected {
                return;
            }
            inner.streams.iter().cloned().collect::<Vec<_>>()
        };
        for camera in streams {
            self.send_event(&Event::StartStream(StartStream { camera }));
        }
    }
}
