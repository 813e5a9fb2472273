//! Lookup layer - debounced country search
//!
//! The Lookup actor receives search commands, funnels them through one
//! debouncer and sends back suggestions.

pub mod actor;
pub mod client;

pub use actor::{LookupActor, SearchOutcome};
pub use client::{load_options, CountryLookup, LookupError, RestCountriesClient};
