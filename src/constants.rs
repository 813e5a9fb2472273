//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

use crate::diagram::Position;

/// Base URL of the REST Countries v3.1 API
pub const DEFAULT_API_BASE_URL: &str = "https://restcountries.com/v3.1";

/// Fields requested from the lookup service
pub const LOOKUP_FIELDS: &[&str] = &["name", "flag"];

/// Quiet period before a search is sent
pub const DEFAULT_DEBOUNCE_MS: u64 = 600;

/// Per-request timeout for lookups
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Log file written next to the working directory
pub const DEFAULT_LOG_FILE: &str = "country-picker.log";

/// Directory under $HOME holding config.yaml
pub const CONFIG_DIR_NAME: &str = ".country-picker";
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Where the seed node sits
pub const INITIAL_NODE_POSITION: Position = Position::new(250.0, 5.0);

/// Where newly added countries are dropped
pub const NEW_NODE_POSITION: Position = Position::new(50.0, 50.0);

/// Distance a node moves per key press
pub const NODE_MOVE_STEP: f64 = 10.0;

/// Empty-state message of the suggestion list
pub const HINT_TYPE_TO_SEARCH: &str = "Type to search countries";

/// Application name
pub const APP_NAME: &str = "Country Picker";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
