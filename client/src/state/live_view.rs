//! Live view state for the selected camera: counts, latest frame, and view flags.

#[cfg(test)]
#[path = "live_view_test.rs"]
mod live_view_test;

use frames::{UpdateCounts, VideoFrame};

/// Occupancy counters shown next to the video.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CameraCounts {
    pub entered: i64,
    pub exited: i64,
    pub current: i64,
}

/// State backing the live view panel.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LiveViewState {
    pub camera: Option<String>,
    pub counts: CameraCounts,
    /// Latest frame as a `data:` URL ready for an `<img>` source.
    pub frame_url: Option<String>,
    pub streaming: bool,
    pub fullscreen: bool,
}

impl LiveViewState {
    /// Switch to `camera`, discarding everything shown for the previous one.
    pub fn select_camera(&mut self, camera: Option<String>) {
        if self.camera == camera {
            return;
        }
        *self = Self { camera, ..Self::default() };
    }

    pub fn mark_streaming(&mut self) {
        self.streaming = self.camera.is_some();
    }

    pub fn set_fullscreen(&mut self, fullscreen: bool) {
        self.fullscreen = fullscreen && self.camera.is_some();
    }

    pub fn toggle_fullscreen(&mut self) {
        self.set_fullscreen(!self.fullscreen);
    }

    /// Show a decoded frame if it belongs to the selected camera.
    pub fn apply_frame(&mut self, frame: &VideoFrame) -> bool {
        if !self.is_selected(&frame.camera) || frame.image.is_empty() {
            return false;
        }
        self.frame_url = Some(frame_data_url(&frame.image));
        true
    }

    /// Update the counters if the report belongs to the selected camera.
    pub fn apply_counts(&mut self, counts: &UpdateCounts) -> bool {
        if !self.is_selected(&counts.camera) {
            return false;
        }
        self.counts = CameraCounts { entered: counts.entered, exited: counts.exited, current: counts.occupancy() };
        true
    }

    fn is_selected(&self, camera: &str) -> bool {
        self.camera.as_deref() == Some(camera)
    }
}

/// Wrap base64 JPEG bytes as an image `data:` URL.
#[must_use]
pub fn frame_data_url(image_base64: &str) -> String {
    format!("data:image/jpeg;base64,{image_base64}")
}
