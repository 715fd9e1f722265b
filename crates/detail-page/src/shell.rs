//! # Page Shell
//!
//! The collaborator surface surrounding a detail page: toast notifications,
//! the generic error presenter, and the two navigation writes. Rendering of
//! toasts and dialogs, and the history mechanism itself, live behind this
//! trait and are out of scope for the controller.

use crate::error::ServiceError;

pub trait PageShell: Send + Sync + 'static {
    /// Show a success toast.
    fn show_notification(&self, text: &str);

    /// Show a validation-failure toast.
    fn show_error(&self, text: &str);

    /// Present an operation error to the user and return the normalized
    /// message list for optional page-level display.
    fn handle_error(&self, error: &ServiceError) -> Vec<String>;

    /// Navigate to a URL, triggering a full navigation cycle.
    fn navigate(&self, url: &str);

    /// Rewrite the address bar to a URL without triggering a navigation
    /// cycle. Used after create so the new identifier is not re-read.
    fn rewrite_location(&self, url: &str);
}
