#![allow(clippy::float_cmp)]

use super::*;

const CAM: &str = "192.168.1.10";

#[test]
fn wire_line_conversion_keeps_endpoint_order() {
    let line = TripwireLine::new(10.5, 20.0, 300.0, 40.25);
    let wire = to_wire(line);
    assert_eq!(wire, WireLine { x1: 10.5, y1: 20.0, x2: 300.0, y2: 40.25 });
    assert_eq!(from_wire(wire), line);
}

#[test]
fn remote_update_maps_tripwire_and_flip() {
    let update = TripwireUpdate {
        camera: CAM.into(),
        tripwire: Some(WireLine { x1: 1.0, y1: 2.0, x2: 3.0, y2: 4.0 }),
        flip_direction: true,
    };
    assert_eq!(
        remote_update(&update),
        RemoteUpdate { camera: CAM.into(), line: Some(TripwireLine::new(1.0, 2.0, 3.0, 4.0)), flip_direction: true }
    );
}

#[test]
fn remote_update_keeps_null_tripwire() {
    let update = TripwireUpdate { camera: CAM.into(), tripwire: None, flip_direction: false };
    assert_eq!(remote_update(&update).line, None);
}

#[test]
fn commit_payload_carries_cleared_line() {
    let commit = Commit { camera: CAM.into(), line: None, flip_direction: true };
    assert_eq!(commit_payload(&commit), (CAM, None, true));
}

#[test]
fn commit_payload_converts_line() {
    let commit = Commit { camera: CAM.into(), line: Some(TripwireLine::new(5.0, 6.0, 7.0, 8.0)), flip_direction: false };
    let (camera, line, flip) = commit_payload(&commit);
    assert_eq!(camera, CAM);
    assert_eq!(line, Some(WireLine { x1: 5.0, y1: 6.0, x2: 7.0, y2: 8.0 }));
    assert!(!flip);
}
