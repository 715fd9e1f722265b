//! # Page Events
//!
//! This module defines the event types flowing into the page controller's
//! loop: navigation and mount events from the router glue, user actions from
//! the render layer, child registration, state queries, and the internal
//! load-completion events posted back by spawned read tasks.

use crate::children::ChildHandle;
use crate::error::ServiceError;
use crate::layout::{LayoutState, PageView};
use crate::route::{PageKey, Route};
use crate::settings::EntitySettings;
use serde_json::Value;
use tokio::sync::oneshot;

/// One-shot response channel for page queries.
pub type Response<T> = oneshot::Sender<T>;

/// Point-in-time copy of the observable page state, for render layers and
/// tests.
#[derive(Debug, Clone)]
pub struct PageSnapshot<R> {
    pub layout: LayoutState,
    pub record: Option<R>,
    pub read_error: Option<Vec<String>>,
    pub view: PageView<R>,
}

/// Completion of a load (read or init-new) spawned off the event loop.
///
/// Tagged with the coordinator generation it belongs to; a stale generation
/// means the load was superseded and its outcome must not touch state.
#[derive(Debug)]
pub enum LoadOutcome<R> {
    Init(Result<R, ServiceError>),
    Read {
        code: String,
        result: Result<R, ServiceError>,
    },
}

/// Events processed sequentially by [`EntityPage`](crate::page::EntityPage).
pub enum PageRequest<S: EntitySettings> {
    /// The page was mounted at a route.
    Mount { route: Route },
    /// The location changed while the page stayed mounted.
    Navigate { route: Route },
    /// A child field reported one edited value.
    UpdateField { key: String, value: Value },
    /// The user asked to save (button or confirm key path).
    Save,
    /// The user asked to delete the record identified by `code`.
    Delete { code: String },
    /// A key event from the focus-capturing form container.
    Key { key: PageKey },
    /// A child field mounted and registers itself.
    RegisterChild { key: String, child: ChildHandle },
    /// A child field unmounted.
    DeregisterChild { key: String },
    /// Query the current observable state.
    Snapshot {
        respond_to: Response<PageSnapshot<S::Record>>,
    },
    /// Internal: a spawned load task finished.
    LoadDone {
        generation: u64,
        outcome: LoadOutcome<S::Record>,
    },
}
