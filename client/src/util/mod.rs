//! Utility helpers shared across client UI modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser/environment concerns from component
//! logic so the mapping rules stay testable off the browser.

pub mod location;
pub mod overlay_input;
