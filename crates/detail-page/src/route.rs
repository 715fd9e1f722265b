//! # Routes & Keys
//!
//! Structured navigation data handed to the page controller by the routing
//! collaborator. The routing mechanism itself (URL parsing, history) is out
//! of scope; the controller only reads identifiers and writes canonical URLs.

/// One navigation event as seen by the page controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Opaque key identifying the history location. Two events with the same
    /// key describe a re-render of the same location, not a route change.
    pub location_key: String,
    /// The identifier from the detail path (`entity_url/<code>`), if any.
    pub path_code: Option<String>,
    /// The optional `code` query parameter. When present on mount, it takes
    /// precedence over the path identifier for one canonicalizing redirect.
    pub query_code: Option<String>,
}

impl Route {
    pub fn new(location_key: impl Into<String>) -> Self {
        Self {
            location_key: location_key.into(),
            path_code: None,
            query_code: None,
        }
    }

    pub fn with_path_code(mut self, code: impl Into<String>) -> Self {
        self.path_code = Some(code.into());
        self
    }

    pub fn with_query_code(mut self, code: impl Into<String>) -> Self {
        self.query_code = Some(code.into());
        self
    }
}

/// Canonical detail URL for one entity identifier.
pub fn canonical_url(entity_url: &str, code: &str) -> String {
    format!("{entity_url}{code}")
}

/// Key events forwarded from the focus-capturing form container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKey {
    Enter,
    F10,
    Other,
}

impl PageKey {
    /// Whether this key is a designated "confirm" key that triggers save.
    pub fn is_confirm(self) -> bool {
        matches!(self, Self::Enter | Self::F10)
    }
}
