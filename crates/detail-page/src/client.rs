//! # Page Client
//!
//! This module defines the typed handle used by the router glue, the render
//! layer, and tests to talk to a running [`EntityPage`](crate::page::EntityPage).
//! It forwards events over the page's mpsc channel and reads state back via
//! oneshot queries. The client holds only a sender, so cloning is cheap and
//! handles can be shared freely across tasks.

use crate::children::ChildHandle;
use crate::error::PageError;
use crate::message::{PageRequest, PageSnapshot};
use crate::route::{PageKey, Route};
use crate::settings::EntitySettings;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};

pub struct PageClient<S: EntitySettings> {
    sender: mpsc::Sender<PageRequest<S>>,
}

impl<S: EntitySettings> Clone for PageClient<S> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<S: EntitySettings> PageClient<S> {
    pub fn new(sender: mpsc::Sender<PageRequest<S>>) -> Self {
        Self { sender }
    }

    async fn send(&self, request: PageRequest<S>) -> Result<(), PageError> {
        self.sender
            .send(request)
            .await
            .map_err(|_| PageError::PageClosed)
    }

    /// The page was mounted at `route`.
    pub async fn mount(&self, route: Route) -> Result<(), PageError> {
        self.send(PageRequest::Mount { route }).await
    }

    /// The location changed while the page stayed mounted.
    pub async fn navigate(&self, route: Route) -> Result<(), PageError> {
        self.send(PageRequest::Navigate { route }).await
    }

    /// Forward one edited field value from a child.
    pub async fn update_field(
        &self,
        key: impl Into<String>,
        value: Value,
    ) -> Result<(), PageError> {
        self.send(PageRequest::UpdateField {
            key: key.into(),
            value,
        })
        .await
    }

    /// Trigger the save flow (validation, then create or update).
    pub async fn save(&self) -> Result<(), PageError> {
        self.send(PageRequest::Save).await
    }

    /// Delete the record identified by `code`.
    pub async fn delete(&self, code: impl Into<String>) -> Result<(), PageError> {
        self.send(PageRequest::Delete { code: code.into() }).await
    }

    /// Forward a key event from the form container.
    pub async fn press_key(&self, key: PageKey) -> Result<(), PageError> {
        self.send(PageRequest::Key { key }).await
    }

    /// Register a mounted child field under a stable key.
    pub async fn register_child(
        &self,
        key: impl Into<String>,
        child: ChildHandle,
    ) -> Result<(), PageError> {
        self.send(PageRequest::RegisterChild {
            key: key.into(),
            child,
        })
        .await
    }

    /// Deregister an unmounted child field.
    pub async fn deregister_child(&self, key: impl Into<String>) -> Result<(), PageError> {
        self.send(PageRequest::DeregisterChild { key: key.into() })
            .await
    }

    /// Read a point-in-time copy of the observable page state.
    pub async fn snapshot(&self) -> Result<PageSnapshot<S::Record>, PageError> {
        let (respond_to, response) = oneshot::channel();
        self.send(PageRequest::Snapshot { respond_to }).await?;
        response.await.map_err(|_| PageError::PageDropped)
    }
}
