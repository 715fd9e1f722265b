//! # Generic Page Controller
//!
//! This module defines `EntityPage`, the lifecycle controller for a detail
//! page of one entity type. It is the "server" half of the page: it owns the
//! record, the layout state, the child registry and the read slot, and
//! processes page events sequentially from an mpsc channel.
//!
//! **Concurrency model**: all state mutation happens inside one event loop,
//! so no locking is needed anywhere. Loads (reads and new-entity inits) run
//! as spawned tasks whose completions are posted back into the queue tagged
//! with a coordinator generation; a stale generation identifies a superseded
//! load whose outcome is dropped. Writes (create/update/delete) are awaited
//! inline: they are user-triggered single actions and are never superseded.
//!
//! ## Lifecycle
//!
//! 1. **Mount** — a `code` query parameter redirects to the canonical detail
//!    URL and ends the cycle; otherwise a path identifier starts a read and
//!    its absence starts a new-entity initialization.
//! 2. **Edit** — field edits merge into the record one key at a time and mark
//!    the layout modified.
//! 3. **Save** — child validation gates the network call, then create or
//!    update is dispatched on `is_new_entity`; a successful create rewrites
//!    the address bar to the new identifier without a navigation cycle.
//! 4. **Delete** — navigates back to the entity type's listing URL.

use crate::children::ChildRegistry;
use crate::client::PageClient;
use crate::coordinator::ReadCoordinator;
use crate::layout::{LayoutState, PageView};
use crate::message::{LoadOutcome, PageRequest, PageSnapshot};
use crate::record::EntityRecord;
use crate::route::{canonical_url, Route};
use crate::settings::EntitySettings;
use crate::shell::PageShell;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Notice shown when save-time child validation fails.
const VALIDATION_NOTICE: &str = "Several errors have occurred";

/// The lifecycle controller for one mounted detail page.
///
/// Constructed per page mount together with its [`PageClient`]; all state is
/// owned exclusively by this instance, with no cross-instance sharing.
pub struct EntityPage<S: EntitySettings> {
    receiver: mpsc::Receiver<PageRequest<S>>,
    /// Used by spawned load tasks to post their completions back.
    self_sender: mpsc::Sender<PageRequest<S>>,
    settings: Arc<S>,
    shell: Arc<dyn PageShell>,
    layout: LayoutState,
    record: Option<S::Record>,
    read_error: Option<Vec<String>>,
    children: ChildRegistry,
    coordinator: ReadCoordinator,
    route: Option<Route>,
}

impl<S: EntitySettings> EntityPage<S> {
    /// Creates a page controller and its client.
    ///
    /// `buffer_size` is the capacity of the event channel; senders wait when
    /// it is full.
    pub fn new(
        settings: S,
        shell: Arc<dyn PageShell>,
        buffer_size: usize,
    ) -> (Self, PageClient<S>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let page = Self {
            receiver,
            self_sender: sender.clone(),
            settings: Arc::new(settings),
            shell,
            layout: LayoutState::default(),
            record: None,
            read_error: None,
            children: ChildRegistry::new(),
            coordinator: ReadCoordinator::new(),
            route: None,
        };
        (page, PageClient::new(sender))
    }

    /// Runs the page's event loop until every client handle is dropped.
    pub async fn run(mut self) {
        let entity = self.settings.entity_desc().to_owned();
        info!(entity = %entity, "Page started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                PageRequest::Mount { route } => self.on_mount(route),
                PageRequest::Navigate { route } => self.on_navigation(route),
                PageRequest::UpdateField { key, value } => self.update_field(&key, value),
                PageRequest::Save => self.save().await,
                PageRequest::Delete { code } => self.delete_entity(&code).await,
                PageRequest::Key { key } => {
                    if key.is_confirm() {
                        self.save().await;
                    }
                }
                PageRequest::RegisterChild { key, child } => self.children.register(key, child),
                PageRequest::DeregisterChild { key } => self.children.deregister(&key),
                PageRequest::Snapshot { respond_to } => {
                    let _ = respond_to.send(self.snapshot());
                }
                PageRequest::LoadDone {
                    generation,
                    outcome,
                } => self.on_load_done(generation, outcome).await,
            }
        }

        info!(entity = %entity, "Page shut down");
    }

    // --- Navigation ---

    /// Mount-time routing: a `code` query parameter redirects to the
    /// canonical detail URL and performs no further work this cycle;
    /// otherwise the path identifier decides read-vs-init-new.
    fn on_mount(&mut self, route: Route) {
        debug!(entity = self.settings.entity_desc(), ?route, "Mount");
        if let Some(code) = route.query_code.clone() {
            let url = canonical_url(self.settings.entity_url(), &code);
            self.route = Some(route);
            self.shell.navigate(&url);
            return;
        }

        let code = route.path_code.clone();
        self.route = Some(route);
        match code {
            Some(code) => self.read_entity(code),
            None => self.init_new_entity(),
        }
    }

    /// Reacts only to genuine route changes; a re-render of the same
    /// location (same key) is a no-op, as is an unchanged identifier.
    fn on_navigation(&mut self, route: Route) {
        let previous = match &self.route {
            Some(previous) if previous.location_key == route.location_key => return,
            previous => previous.as_ref().and_then(|r| r.path_code.clone()),
        };

        let next = route.path_code.clone();
        self.route = Some(route);
        match next {
            Some(next) if Some(&next) != previous.as_ref() => self.read_entity(next),
            Some(_) => {}
            None => self.init_new_entity(),
        }
    }

    // --- Loads (read slot) ---

    /// Begin "initialize new entity". No-op when access is denied.
    fn init_new_entity(&mut self) {
        if self.settings.entity_screen().is_none() {
            return;
        }
        self.children.reset_validation();
        self.layout.blocking = true;

        let (generation, _token) = self.coordinator.begin();
        let settings = Arc::clone(&self.settings);
        let sender = self.self_sender.clone();
        tokio::spawn(async move {
            let result = settings.init_new_entity().await;
            let _ = sender
                .send(PageRequest::LoadDone {
                    generation,
                    outcome: LoadOutcome::Init(result),
                })
                .await;
        });
    }

    /// Begin a read for `code`, cancelling any outstanding load first.
    /// No-op when access is denied.
    fn read_entity(&mut self, code: String) {
        if self.settings.entity_screen().is_none() {
            return;
        }
        self.children.reset_validation();
        self.layout.blocking = true;

        let (generation, token) = self.coordinator.begin();
        let settings = Arc::clone(&self.settings);
        let sender = self.self_sender.clone();
        tokio::spawn(async move {
            let result = settings.read_entity(&code, token).await;
            let _ = sender
                .send(PageRequest::LoadDone {
                    generation,
                    outcome: LoadOutcome::Read { code, result },
                })
                .await;
        });
    }

    async fn on_load_done(&mut self, generation: u64, outcome: LoadOutcome<S::Record>) {
        let entity = self.settings.entity_desc();
        if !self.coordinator.is_current(generation) {
            debug!(entity, generation, "Superseded load dropped");
            return;
        }
        self.coordinator.finish(generation);

        match outcome {
            LoadOutcome::Init(Ok(record)) => {
                info!(entity = %entity, "Initialized new entity");
                self.record = Some(record);
                self.read_error = None;
                self.layout = LayoutState::loaded(true);
                let settings = Arc::clone(&self.settings);
                settings.post_init().await;
            }
            LoadOutcome::Init(Err(error)) => {
                if error.is_cancelled() {
                    return;
                }
                warn!(entity = %entity, %error, "Init failed");
                self.shell.handle_error(&error);
                self.layout.blocking = false;
            }
            LoadOutcome::Read {
                code,
                result: Ok(record),
            } => {
                info!(entity = %entity, %code, "Read");
                self.record = Some(record);
                self.read_error = None;
                self.layout = LayoutState::loaded(false);
                let settings = Arc::clone(&self.settings);
                if let Some(record) = self.record.as_ref() {
                    settings.post_read(record).await;
                }
                // Read-only screens leave every child disabled.
                if !settings.entity_screen().map_or(false, |s| s.update_allowed) {
                    self.children.set_all_enabled(false);
                }
            }
            LoadOutcome::Read {
                code,
                result: Err(error),
            } => {
                if error.is_cancelled() {
                    return;
                }
                warn!(entity = %entity, %code, %error, "Read failed");
                let messages = self.shell.handle_error(&error);
                self.read_error = Some(messages);
                self.layout.blocking = false;
            }
        }
    }

    // --- Writes ---

    /// Validate all children, then dispatch create or update. Ignored while
    /// another request is outstanding so a double-triggered save cannot
    /// submit twice.
    async fn save(&mut self) {
        if self.layout.blocking {
            debug!(entity = self.settings.entity_desc(), "Save ignored while blocking");
            return;
        }
        if !self.children.validate_fields() {
            self.shell.show_error(VALIDATION_NOTICE);
            return;
        }
        let Some(record) = self.record.clone() else {
            return;
        };
        if self.layout.is_new_entity {
            self.create_entity(record).await;
        } else {
            self.update_entity(record).await;
        }
    }

    async fn create_entity(&mut self, record: S::Record) {
        let entity = self.settings.entity_desc().to_owned();
        self.layout.blocking = true;
        let record = self.settings.pre_create_entity(record);

        match self.settings.create_entity(record).await {
            Ok(created) => {
                let code = created.code().unwrap_or_default();
                info!(entity = %entity, %code, "Created");
                self.record = Some(created);
                self.layout = LayoutState::loaded(false);
                // The address-bar rewrite must not trigger a navigation
                // cycle, or the fresh record would be read right back.
                self.shell
                    .rewrite_location(&canonical_url(self.settings.entity_url(), &code));
                self.shell.show_notification(&format!(
                    "{entity} {code} has been successfully created."
                ));
                let settings = Arc::clone(&self.settings);
                settings.post_create().await;
            }
            Err(error) => {
                warn!(entity = %entity, %error, "Create failed");
                self.children.map_server_errors(error.field_errors());
                self.shell.handle_error(&error);
                self.layout.blocking = false;
            }
        }
    }

    async fn update_entity(&mut self, record: S::Record) {
        let entity = self.settings.entity_desc().to_owned();
        self.layout.blocking = true;
        let record = self.settings.pre_update_entity(record);

        match self.settings.update_entity(record).await {
            Ok(updated) => {
                let code = updated.code().unwrap_or_default();
                info!(entity = %entity, %code, "Updated");
                self.record = Some(updated);
                self.layout = LayoutState::loaded(false);
                self.shell.show_notification(&format!(
                    "{entity} {code} has been successfully updated."
                ));
                let settings = Arc::clone(&self.settings);
                settings.post_update().await;
            }
            Err(error) => {
                warn!(entity = %entity, %error, "Update failed");
                self.children.map_server_errors(error.field_errors());
                self.shell.handle_error(&error);
                self.layout.blocking = false;
            }
        }
    }

    async fn delete_entity(&mut self, code: &str) {
        let entity = self.settings.entity_desc().to_owned();
        self.layout.blocking = true;

        match self.settings.delete_entity(code).await {
            Ok(()) => {
                info!(entity = %entity, %code, "Deleted");
                self.shell.show_notification(&format!(
                    "{entity} {code} has been successfully deleted."
                ));
                self.shell.navigate(self.settings.entity_url());
            }
            Err(error) => {
                warn!(entity = %entity, %code, %error, "Delete failed");
                self.shell.handle_error(&error);
                self.layout.blocking = false;
            }
        }
    }

    // --- Edits ---

    /// Merge one field edit into the record and mark the layout modified.
    /// Always a pure merge; the record is never replaced wholesale here.
    fn update_field(&mut self, key: &str, value: Value) {
        self.layout.is_modified = true;
        if let Some(record) = self.record.as_mut() {
            record.apply_field(key, value);
        }
    }

    // --- Render State ---

    /// Pure function of state, no side effects.
    fn view(&self) -> PageView<S::Record> {
        if self.settings.entity_screen().is_none() {
            return PageView::AccessDenied {
                entity_desc: self.settings.entity_desc().to_owned(),
            };
        }
        if let Some(messages) = &self.read_error {
            return PageView::ReadError(messages.clone());
        }
        match &self.record {
            None => PageView::Loading,
            Some(record) => PageView::Form(record.clone()),
        }
    }

    fn snapshot(&self) -> PageSnapshot<S::Record> {
        PageSnapshot {
            layout: self.layout,
            record: self.record.clone(),
            read_error: self.read_error.clone(),
            view: self.view(),
        }
    }
}
