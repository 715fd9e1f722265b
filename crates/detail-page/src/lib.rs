//! # Detail-Page Framework
//!
//! This crate provides a generic controller for the "detail page" of a single
//! addressable business record ("entity") inside an interactive application:
//! create it, read it by identifier, edit it, save it, delete it. The same
//! controller is reused for every entity type by parameterizing it with a
//! small settings object supplying the entity's name, its CRUD operations,
//! and a render hook for its fields.
//!
//! ## Architecture Overview
//!
//! The crate separates concerns into three layers:
//!
//! 1. **Settings Layer** ([`EntitySettings`]) - per-entity-type configuration
//!    and CRUD operations
//! 2. **Controller Layer** ([`EntityPage`]) - the lifecycle state machine and
//!    event processing
//! 3. **Interface Layer** ([`PageClient`]) - type-safe communication for the
//!    router glue, the render layer, and tests
//!
//! You describe your entity type **once** in the settings trait, and the
//! framework handles routing decisions, request cancellation, validation
//! orchestration, and error mapping.
//!
//! ## Concurrency Model
//!
//! Each mounted page runs in its own Tokio task and processes events
//! **sequentially**, so the record, the layout state, and the child registry
//! need no locks. Reads are spawned as separate tasks whose completions are
//! posted back into the event queue; at most one read is ever live, because
//! starting a new one cancels the previous token. Writes are never superseded
//! and are awaited inline.
//!
//! ## Core Abstractions
//!
//! ### [`EntitySettings`] - The Entity Type
//!
//! ```rust
//! use async_trait::async_trait;
//! use detail_page::{
//!     DynamicRecord, EntityPage, EntityScreen, EntitySettings, Route, ServiceError,
//! };
//! use detail_page::mock::RecordingShell;
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! struct AssetSettings;
//!
//! #[async_trait]
//! impl EntitySettings for AssetSettings {
//!     type Record = DynamicRecord;
//!
//!     fn entity_screen(&self) -> Option<EntityScreen> {
//!         Some(EntityScreen { update_allowed: true })
//!     }
//!     fn entity_desc(&self) -> &str { "Asset" }
//!     fn entity_url(&self) -> &str { "/assets/" }
//!
//!     async fn init_new_entity(&self) -> Result<DynamicRecord, ServiceError> {
//!         Ok(DynamicRecord::new("code"))
//!     }
//!     async fn read_entity(
//!         &self,
//!         code: &str,
//!         _cancel: CancellationToken,
//!     ) -> Result<DynamicRecord, ServiceError> {
//!         Err(ServiceError::rejected(format!("Asset {code} not found")))
//!     }
//!     async fn create_entity(&self, record: DynamicRecord) -> Result<DynamicRecord, ServiceError> {
//!         Ok(record)
//!     }
//!     async fn update_entity(&self, record: DynamicRecord) -> Result<DynamicRecord, ServiceError> {
//!         Ok(record)
//!     }
//!     async fn delete_entity(&self, _code: &str) -> Result<(), ServiceError> {
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     // Create the controller and its client
//!     let shell = Arc::new(RecordingShell::new());
//!     let (page, client) = EntityPage::new(AssetSettings, shell, 16);
//!
//!     // Spawn the controller
//!     tokio::spawn(page.run());
//!
//!     // Drive it the way the router glue would
//!     client.mount(Route::new("loc-1")).await.unwrap();
//! }
//! ```
//!
//! ### [`EntityPage`] - The Lifecycle Controller
//!
//! Reacts to mount/navigation events, drives the record and the layout state
//! through the four CRUD operations, and mediates between the child registry
//! and the external collaborators ([`PageShell`]).
//!
//! ### [`ChildRegistry`] - Validation & Error Mapping
//!
//! Child field handles register themselves as they mount. Validation is a
//! logical AND over all registered full fields; server-reported field errors
//! are mapped back onto the child registered under the matching key.
//!
//! ## Testing
//!
//! The [`mock`] module ships a scripted [`MockSettings`](mock::MockSettings)
//! (with holdable responses for cancellation tests), a
//! [`RecordingShell`](mock::RecordingShell), and observable mock child
//! fields. See the crate's integration tests for usage patterns.

pub mod children;
pub mod client;
pub mod coordinator;
pub mod error;
pub mod layout;
pub mod message;
pub mod mock;
pub mod page;
pub mod record;
pub mod route;
pub mod settings;
pub mod shell;
pub mod tracing;

// Re-export core types for convenience
pub use children::{ChildField, ChildHandle, ChildRegistry};
pub use client::PageClient;
pub use error::{FieldError, PageError, ServiceError};
pub use layout::{LayoutState, PageView};
pub use message::{PageRequest, PageSnapshot};
pub use page::EntityPage;
pub use record::{DynamicRecord, EntityRecord, USER_DEFINED_FIELDS};
pub use route::{canonical_url, PageKey, Route};
pub use settings::{EntityScreen, EntitySettings};
pub use shell::PageShell;
