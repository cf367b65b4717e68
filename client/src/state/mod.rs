//! Reactive UI state models.
//!
//! SYSTEM CONTEXT
//! ==============
//! State structs are plain data held in `RwSignal`s and updated from
//! channel handlers, so their transition rules are testable natively.

pub mod cameras;
pub mod live_view;
