//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render the dashboard surfaces while reading the shared
//! channel and connection status from Leptos context providers.

pub mod camera_grid;
pub mod live_view;
pub mod status_bar;
pub mod tripwire_overlay;
