//! # Console Shell
//!
//! A [`PageShell`] for headless demos: toasts and navigations become
//! structured log lines instead of rendered UI.

use detail_page::{PageShell, ServiceError};
use tracing::{error, info};

#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleShell;

impl PageShell for ConsoleShell {
    fn show_notification(&self, text: &str) {
        info!(toast = text, "notification");
    }

    fn show_error(&self, text: &str) {
        error!(toast = text, "error notice");
    }

    fn handle_error(&self, err: &ServiceError) -> Vec<String> {
        let message = err.to_string();
        error!(%err, "operation failed");
        vec![message]
    }

    fn navigate(&self, url: &str) {
        info!(url, "navigate");
    }

    fn rewrite_location(&self, url: &str) {
        info!(url, "address bar rewritten");
    }
}
