use super::*;
use frames::{TripwireUpdate, UpdateCounts, VideoFrame};
use std::cell::Cell;

const CAM: &str = "192.168.1.10";
const OTHER_CAM: &str = "192.168.1.11";

// =============================================================
// Helpers
// =============================================================

/// Outbound sink that keeps every frame it is handed.
#[derive(Clone, Default)]
struct Recorder {
    sent: Rc<RefCell<Vec<Vec<u8>>>>,
    closed: Rc<Cell<bool>>,
}

impl Recorder {
    fn events(&self) -> Vec<Event> {
        self.sent
            .borrow()
            .iter()
            .map(|bytes| decode_event(bytes).unwrap())
            .collect()
    }
}

impl Outbound for Recorder {
    fn send(&self, bytes: Vec<u8>) -> bool {
        if self.closed.get() {
            return false;
        }
        self.sent.borrow_mut().push(bytes);
        true
    }
}

fn connected_channel() -> (SyncChannel, Recorder) {
    let recorder = Recorder::default();
    let channel = SyncChannel::new(recorder.clone());
    channel.set_connection_status(ConnectionStatus::Connected);
    (channel, recorder)
}

fn update_bytes(camera: &str, tripwire: Option<WireLine>) -> Vec<u8> {
    encode_event(&Event::TripwireUpdate(TripwireUpdate { camera: camera.into(), tripwire, flip_direction: false }))
}

fn line() -> WireLine {
    WireLine { x1: 1.0, y1: 2.0, x2: 3.0, y2: 4.0 }
}

/// Subscribe a handler that counts deliveries.
fn counting(channel: &SyncChannel, topic: Topic, camera: &str) -> Rc<Cell<u32>> {
    let hits = Rc::new(Cell::new(0));
    let hits_in = Rc::clone(&hits);
    channel.subscribe(topic, camera, move |_| hits_in.set(hits_in.get() + 1));
    hits
}

// =============================================================
// Subscriptions
// =============================================================

#[test]
fn delivers_to_matching_camera() {
    let (channel, _) = connected_channel();
    let received = Rc::new(RefCell::new(None));
    let received_in = Rc::clone(&received);
    channel.subscribe(Topic::Tripwire, CAM, move |event| {
        *received_in.borrow_mut() = Some(event.clone());
    });

    assert!(channel.dispatch_bytes(&update_bytes(CAM, Some(line()))));
    assert_eq!(
        *received.borrow(),
        Some(Event::TripwireUpdate(TripwireUpdate { camera: CAM.into(), tripwire: Some(line()), flip_direction: false }))
    );
}

#[test]
fn filters_other_cameras() {
    let (channel, _) = connected_channel();
    let hits = counting(&channel, Topic::Tripwire, CAM);

    assert!(!channel.dispatch_bytes(&update_bytes(OTHER_CAM, Some(line()))));
    assert_eq!(hits.get(), 0);
}

#[test]
fn resubscribe_replaces_previous_camera() {
    let (channel, _) = connected_channel();
    let old_hits = counting(&channel, Topic::Tripwire, CAM);
    let new_hits = Rc::new(Cell::new(0));
    let new_in = Rc::clone(&new_hits);

    assert!(channel.subscribe(Topic::Tripwire, OTHER_CAM, move |_| new_in.set(new_in.get() + 1)));

    channel.dispatch_bytes(&update_bytes(CAM, None));
    channel.dispatch_bytes(&update_bytes(OTHER_CAM, None));
    assert_eq!(old_hits.get(), 0);
    assert_eq!(new_hits.get(), 1);
    assert_eq!(channel.subscribed_camera(Topic::Tripwire), Some(OTHER_CAM.to_owned()));
}

#[test]
fn stale_unsubscribe_keeps_newer_subscription() {
    let (channel, _) = connected_channel();
    counting(&channel, Topic::Tripwire, CAM);
    let hits = counting(&channel, Topic::Tripwire, OTHER_CAM);

    assert!(!channel.unsubscribe(Topic::Tripwire, CAM));
    channel.dispatch_bytes(&update_bytes(OTHER_CAM, None));
    assert_eq!(hits.get(), 1);
}

#[test]
fn unsubscribe_stops_delivery() {
    let (channel, _) = connected_channel();
    let hits = counting(&channel, Topic::Tripwire, CAM);

    assert!(channel.unsubscribe(Topic::Tripwire, CAM));
    assert!(!channel.dispatch_bytes(&update_bytes(CAM, None)));
    assert_eq!(hits.get(), 0);
    assert_eq!(channel.subscribed_camera(Topic::Tripwire), None);
}

#[test]
fn topics_are_independent() {
    let (channel, _) = connected_channel();
    let tripwire_hits = counting(&channel, Topic::Tripwire, CAM);
    let frame_hits = counting(&channel, Topic::Frames, CAM);
    let count_hits = counting(&channel, Topic::Counts, CAM);

    channel.dispatch(&Event::VideoFrame(VideoFrame { camera: CAM.into(), image: "AAAA".into() }));
    channel.dispatch(&Event::UpdateCounts(UpdateCounts { camera: CAM.into(), entered: 1, exited: 0, current: None }));

    assert_eq!(tripwire_hits.get(), 0);
    assert_eq!(frame_hits.get(), 1);
    assert_eq!(count_hits.get(), 1);
}

#[test]
fn outbound_only_events_are_not_delivered() {
    let (channel, _) = connected_channel();
    counting(&channel, Topic::Tripwire, CAM);
    let event = Event::SetTripwire(SetTripwire { camera: CAM.into(), line: None, flip_direction: false });
    assert!(!channel.dispatch(&event));
}

#[test]
fn malformed_bytes_are_dropped() {
    let (channel, _) = connected_channel();
    let hits = counting(&channel, Topic::Tripwire, CAM);
    assert!(!channel.dispatch_bytes(&[0xff, 0x00, 0x13]));
    assert_eq!(hits.get(), 0);
}

#[test]
fn handler_may_publish_during_dispatch() {
    let (channel, recorder) = connected_channel();
    let inner = channel.clone();
    channel.subscribe(Topic::Tripwire, CAM, move |_| {
        inner.publish(CAM, None, true);
    });

    channel.dispatch_bytes(&update_bytes(CAM, None));
    assert_eq!(recorder.events().len(), 1);
}

// =============================================================
// Publishing
// =============================================================

#[test]
fn publish_encodes_set_tripwire() {
    let (channel, recorder) = connected_channel();

    assert!(channel.publish(CAM, Some(line()), true));
    assert_eq!(
        recorder.events(),
        vec![Event::SetTripwire(SetTripwire { camera: CAM.into(), line: Some(line()), flip_direction: true })]
    );
}

#[test]
fn publish_clear_sends_null_line() {
    let (channel, recorder) = connected_channel();
    channel.publish(CAM, None, false);
    let frame = frames::decode_frame(&recorder.sent.borrow()[0]).unwrap();
    assert_eq!(frame.event, "set-tripwire");
    assert!(frame.data["line"].is_null());
    assert_eq!(frame.data["flipDirection"].as_bool(), Some(false));
}

#[test]
fn publish_while_disconnected_is_dropped() {
    let recorder = Recorder::default();
    let channel = SyncChannel::new(recorder.clone());

    assert_eq!(channel.connection_status(), ConnectionStatus::Disconnected);
    assert!(!channel.publish(CAM, Some(line()), false));
    assert!(recorder.events().is_empty());
}

#[test]
fn publish_reports_closed_transport() {
    let (channel, recorder) = connected_channel();
    recorder.closed.set(true);
    assert!(!channel.publish(CAM, Some(line()), false));
}

// =============================================================
// Streams and reconnect
// =============================================================

#[test]
fn start_stream_sends_request() {
    let (channel, recorder) = connected_channel();
    assert!(channel.start_stream(CAM));
    assert_eq!(recorder.events(), vec![Event::StartStream(StartStream { camera: CAM.into() })]);
}

#[test]
fn stream_requested_offline_is_sent_on_connect() {
    let recorder = Recorder::default();
    let channel = SyncChannel::new(recorder.clone());

    assert!(!channel.start_stream(CAM));
    channel.set_connection_status(ConnectionStatus::Connecting);
    assert!(recorder.events().is_empty());

    channel.set_connection_status(ConnectionStatus::Connected);
    assert_eq!(recorder.events(), vec![Event::StartStream(StartStream { camera: CAM.into() })]);
}

#[test]
fn reconnect_replays_each_active_stream_once() {
    let (channel, recorder) = connected_channel();
    channel.start_stream(CAM);
    channel.start_stream(OTHER_CAM);

    channel.set_connection_status(ConnectionStatus::Connected);
    assert_eq!(recorder.events().len(), 2);

    channel.set_connection_status(ConnectionStatus::Disconnected);
    channel.set_connection_status(ConnectionStatus::Connected);
    assert_eq!(recorder.events().len(), 4);
}

#[test]
fn switching_cameras_stops_replaying_the_old_stream() {
    let (channel, recorder) = connected_channel();
    channel.subscribe(Topic::Frames, CAM, |_| {});
    channel.start_stream(CAM);

    assert!(channel.unsubscribe(Topic::Frames, CAM));
    assert!(channel.stop_stream(CAM));
    channel.subscribe(Topic::Frames, OTHER_CAM, |_| {});
    channel.start_stream(OTHER_CAM);
    recorder.sent.borrow_mut().clear();

    channel.set_connection_status(ConnectionStatus::Disconnected);
    channel.set_connection_status(ConnectionStatus::Connected);

    let replayed: Vec<String> = recorder
        .events()
        .iter()
        .map(|event| event.camera().to_owned())
        .collect();
    assert_eq!(replayed, vec![OTHER_CAM.to_owned()]);
    assert_eq!(channel.active_streams(), vec![OTHER_CAM.to_owned()]);
}

#[test]
fn stop_stream_without_request_is_noop() {
    let (channel, recorder) = connected_channel();
    assert!(!channel.stop_stream(CAM));
    assert!(recorder.events().is_empty());
    assert!(channel.active_streams().is_empty());
}

#[test]
fn detached_channel_refuses_publish_but_still_dispatches() {
    let channel = SyncChannel::new(Detached);
    channel.set_connection_status(ConnectionStatus::Connected);
    assert!(!channel.publish(CAM, Some(line()), false));

    let hits = counting(&channel, Topic::Tripwire, CAM);
    assert!(channel.dispatch_bytes(&update_bytes(CAM, None)));
    assert_eq!(hits.get(), 1);
}

#[test]
fn counts_observer_sees_every_camera() {
    let (channel, _) = connected_channel();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let seen_in = Rc::clone(&seen);
    channel.observe_counts(move |counts| seen_in.borrow_mut().push((counts.camera.clone(), counts.occupancy())));
    let scoped = counting(&channel, Topic::Counts, CAM);

    for (camera, entered) in [(CAM, 4), (OTHER_CAM, 9)] {
        let event = Event::UpdateCounts(UpdateCounts { camera: camera.into(), entered, exited: 1, current: None });
        assert!(channel.dispatch(&event));
    }

    assert_eq!(*seen.borrow(), vec![(CAM.to_owned(), 3), (OTHER_CAM.to_owned(), 8)]);
    assert_eq!(scoped.get(), 1);
}

#[test]
fn counts_observer_ignores_other_topics_and_can_be_cleared() {
    let (channel, _) = connected_channel();
    let hits = Rc::new(Cell::new(0));
    let hits_in = Rc::clone(&hits);
    channel.observe_counts(move |_| hits_in.set(hits_in.get() + 1));

    assert!(!channel.dispatch_bytes(&update_bytes(CAM, None)));
    assert_eq!(hits.get(), 0);

    channel.clear_counts_observer();
    let event = Event::UpdateCounts(UpdateCounts { camera: CAM.into(), entered: 1, exited: 0, current: None });
    assert!(!channel.dispatch(&event));
    assert_eq!(hits.get(), 0);
}
