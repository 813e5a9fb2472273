//! # Country Picker
//!
//! A terminal country picker: type a name, get debounced suggestions from
//! the REST Countries service, add the country to a list and to a small
//! node/edge diagram.
//!
//! ## Features
//! - Generic async [`debounce::Debouncer`]
//! - Country lookup with failures normalized to "no suggestions"
//! - Added-countries list
//! - Diagram with movable, connectable nodes
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Lookup Layer (Tokio runtime, debounced)

pub mod constants;
pub mod config;
pub mod debounce;
pub mod models;
pub mod diagram;
pub mod ui;
pub mod messages;
pub mod app;
pub mod lookup;

// Re-export commonly used types
pub use config::{Config, LookupConfig};
pub use debounce::{DebounceError, Debouncer, Pending};
pub use models::{Country, CountryOption, AddedCountry};
pub use diagram::{Diagram, Edge, Node, Position};
pub use messages::{UiEvent, LookupCommand, LookupResponse, RenderState};
pub use app::{AppState, AppActor};
pub use lookup::{CountryLookup, LookupActor, LookupError, RestCountriesClient};
