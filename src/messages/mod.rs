//! Message types for inter-layer communication in the actor-based architecture.
//!
//! This module defines all messages that flow between the UI, App, and Lookup layers.

pub mod ui_events;
pub mod lookup;
pub mod render;

pub use ui_events::UiEvent;
pub use lookup::{LookupCommand, LookupResponse};
pub use render::RenderState;
