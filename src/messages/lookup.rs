//! Lookup messages - communication between App and Lookup layers

use crate::models::CountryOption;

/// Commands sent from App layer to Lookup layer
#[derive(Debug, Clone)]
pub enum LookupCommand {
    /// Search countries by name. Goes through the debouncer, so a burst of
    /// searches is answered by a single lookup for the last query.
    Search { id: u64, query: String },
    /// Cancel anything pending and stop the actor
    Shutdown,
}

/// Responses sent from Lookup layer to App layer
#[derive(Debug, Clone)]
pub enum LookupResponse {
    /// Lookup finished; `query` is the input the lookup actually ran with
    Suggestions {
        id: u64,
        query: String,
        options: Vec<CountryOption>,
    },
    /// Lookup failed; the app shows no suggestions
    Failed {
        id: u64,
        query: String,
        message: String,
    },
}

impl LookupResponse {
    /// Get the search ID from the response
    pub fn id(&self) -> u64 {
        match self {
            LookupResponse::Suggestions { id, .. } => *id,
            LookupResponse::Failed { id, .. } => *id,
        }
    }
}
