//! Camera roster: the tiles on the dashboard and which one is open.
//!
//! Cameras are keyed by their address, which is also the id every frame on
//! the hub carries. Tiles get a stable display number that is never reused,
//! so removing a camera does not renumber the others.

#[cfg(test)]
#[path = "cameras_test.rs"]
mod cameras_test;

use frames::UpdateCounts;

use crate::state::live_view::CameraCounts;

/// Tiles per grid page, the add tile included.
pub const CAMERAS_PER_PAGE: usize = 20;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CameraEntry {
    /// Display number shown on the tile.
    pub number: u32,
    /// Camera address, used as the camera id on the wire.
    pub address: String,
    pub counts: CameraCounts,
}

/// Why an address was not added.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddCameraError {
    Blank,
    Duplicate,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CameraListState {
    pub cameras: Vec<CameraEntry>,
    /// Address of the camera whose panel is open.
    pub selected: Option<String>,
    /// Zero-based grid page.
    pub page: usize,
    next_number: u32,
}

impl Default for CameraListState {
    fn default() -> Self {
        Self { cameras: Vec::new(), selected: None, page: 0, next_number: 1 }
    }
}

impl CameraListState {
    /// Add a camera by address. Surrounding whitespace is dropped before the
    /// address becomes an id.
    ///
    /// # Errors
    ///
    /// [`AddCameraError::Blank`] for an empty address and
    /// [`AddCameraError::Duplicate`] when the address is already listed.
    pub fn add(&mut self, address: &str) -> Result<u32, AddCameraError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(AddCameraError::Blank);
        }
        if self.contains(address) {
            return Err(AddCameraError::Duplicate);
        }
        let number = self.next_number;
        self.next_number += 1;
        self.cameras.push(CameraEntry { number, address: address.to_owned(), counts: CameraCounts::default() });
        Ok(number)
    }

    /// Remove a camera, closing its panel if it was open.
    pub fn remove(&mut self, address: &str) -> bool {
        let before = self.cameras.len();
        self.cameras.retain(|c| c.address != address);
        if self.cameras.len() == before {
            return false;
        }
        if self.selected.as_deref() == Some(address) {
            self.selected = None;
        }
        self.page = self.page.min(self.total_pages() - 1);
        true
    }

    /// Open the panel for a listed camera.
    pub fn select(&mut self, address: &str) -> bool {
        if !self.contains(address) {
            return false;
        }
        self.selected = Some(address.to_owned());
        true
    }

    /// Open `address`, listing it first if needed. Used for `?camera=` links.
    pub fn open(&mut self, address: &str) -> bool {
        let address = address.trim();
        match self.add(address) {
            Ok(_) | Err(AddCameraError::Duplicate) => self.select(address),
            Err(AddCameraError::Blank) => false,
        }
    }

    pub fn close(&mut self) {
        self.selected = None;
    }

    #[must_use]
    pub fn contains(&self, address: &str) -> bool {
        self.cameras.iter().any(|c| c.address == address)
    }

    #[must_use]
    pub fn selected_entry(&self) -> Option<&CameraEntry> {
        let selected = self.selected.as_deref()?;
        self.cameras.iter().find(|c| c.address == selected)
    }

    /// Update a tile's counters; `false` for unlisted cameras.
    pub fn apply_counts(&mut self, counts: &UpdateCounts) -> bool {
        let Some(entry) = self.cameras.iter_mut().find(|c| c.address == counts.camera) else {
            return false;
        };
        entry.counts = CameraCounts { entered: counts.entered, exited: counts.exited, current: counts.occupancy() };
        true
    }

    /// Sum of current occupancy across every listed camera.
    #[must_use]
    pub fn total_occupancy(&self) -> i64 {
        self.cameras.iter().map(|c| c.counts.current).sum()
    }

    // --- Pagination ---

    /// Pages needed for every camera plus the trailing add tile.
    #[must_use]
    pub fn total_pages(&self) -> usize {
        (self.cameras.len() + 1).div_ceil(CAMERAS_PER_PAGE)
    }

    /// Cameras on the current page.
    #[must_use]
    pub fn page_cameras(&self) -> &[CameraEntry] {
        let start = (self.page * CAMERAS_PER_PAGE).min(self.cameras.len());
        let end = (start + CAMERAS_PER_PAGE).min(self.cameras.len());
        &self.cameras[start..end]
    }

    /// The add tile sits after the last camera, on the last page.
    #[must_use]
    pub fn shows_add_tile(&self) -> bool {
        self.page + 1 == self.total_pages()
    }

    pub fn next_page(&mut self) {
        self.page = (self.page + 1).min(self.total_pages() - 1);
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1);
    }
}
