//! Mapping between DOM events, wire payloads, and overlay engine types.

#[cfg(test)]
#[path = "overlay_input_test.rs"]
mod overlay_input_test;

use frames::{TripwireUpdate, WireLine};
use overlay::engine::{Commit, RemoteUpdate};
use overlay::geometry::TripwireLine;
#[cfg(feature = "csr")]
use overlay::geometry::Point;
#[cfg(feature = "csr")]
use overlay::mapper::Rect;

#[must_use]
pub fn to_wire(line: TripwireLine) -> WireLine {
    WireLine { x1: line.x1, y1: line.y1, x2: line.x2, y2: line.y2 }
}

#[must_use]
pub fn from_wire(line: WireLine) -> TripwireLine {
    TripwireLine::new(line.x1, line.y1, line.x2, line.y2)
}

/// Engine input for an inbound `tripwire-update`.
#[must_use]
pub fn remote_update(update: &TripwireUpdate) -> RemoteUpdate {
    RemoteUpdate {
        camera: update.camera.clone(),
        line: update.tripwire.map(from_wire),
        flip_direction: update.flip_direction,
    }
}

/// Wire payload for an engine commit: `(camera, line, flip_direction)`.
#[must_use]
pub fn commit_payload(commit: &Commit) -> (&str, Option<WireLine>, bool) {
    (commit.camera.as_str(), commit.line.map(to_wire), commit.flip_direction)
}

#[cfg(feature = "csr")]
pub fn client_point(ev: &web_sys::MouseEvent) -> Point {
    Point::new(f64::from(ev.client_x()), f64::from(ev.client_y()))
}

/// On-screen bounds of `element` in client coordinates.
#[cfg(feature = "csr")]
pub fn client_rect(element: &web_sys::Element) -> Rect {
    let rect = element.get_bounding_client_rect();
    Rect::new(rect.left(), rect.top(), rect.width(), rect.height())
}
