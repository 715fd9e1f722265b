//! # EntitySettings Trait
//!
//! The `EntitySettings` trait is the per-entity-type configuration that
//! parameterizes the generic page controller. One implementation exists per
//! entity kind (asset, work order, ...) and supplies the entity's name, its
//! access screen, its CRUD operations, and optional lifecycle hooks.
//!
//! # Architecture Note
//! By defining this contract once, the [`EntityPage`](crate::page::EntityPage)
//! logic is written once and reused for every entity type in the application.
//! Associated types enforce that an asset page can only be fed asset records;
//! the compiler rules out cross-entity mix-ups entirely.
//!
//! # Provided Methods (Hooks)
//! The `pre_*` transforms and `post_*` hooks have default implementations
//! that do nothing. Implement them only where an entity type needs custom
//! behavior at those points.

use crate::error::ServiceError;
use crate::record::EntityRecord;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Access-control configuration for one entity type.
///
/// Its presence on the settings gates all read/write operations for the
/// page; `update_allowed` decides whether children stay enabled after a read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityScreen {
    pub update_allowed: bool,
}

/// Per-entity-type configuration consumed by the generic page controller.
#[async_trait]
pub trait EntitySettings: Send + Sync + 'static {
    /// The record type of this entity kind.
    type Record: EntityRecord;

    /// Access screen for the current user; `None` denies the whole page.
    fn entity_screen(&self) -> Option<EntityScreen>;

    /// Human-readable entity-type name used in notifications.
    fn entity_desc(&self) -> &str;

    /// Base path for this entity type's canonical detail/listing URLs.
    fn entity_url(&self) -> &str;

    // --- CRUD Operations (Async) ---

    /// Produce a blank record for "new entity" mode.
    async fn init_new_entity(&self) -> Result<Self::Record, ServiceError>;

    /// Read the record identified by `code`. The cancellation token is
    /// cancelled when the read is superseded; a cancelled read should
    /// resolve to [`ServiceError::Cancelled`].
    async fn read_entity(
        &self,
        code: &str,
        cancel: CancellationToken,
    ) -> Result<Self::Record, ServiceError>;

    /// Persist a new record; returns the server's version of it, including
    /// the newly assigned identifier.
    async fn create_entity(&self, record: Self::Record) -> Result<Self::Record, ServiceError>;

    /// Persist changes to an existing record; returns the server's version.
    async fn update_entity(&self, record: Self::Record) -> Result<Self::Record, ServiceError>;

    /// Delete the record identified by `code`.
    async fn delete_entity(&self, code: &str) -> Result<(), ServiceError>;

    // --- Pre-Submit Transforms ---

    /// Transform a copy of the record just before create is issued. The
    /// page's own record is never handed over, so edits here cannot leak
    /// back into page state.
    fn pre_create_entity(&self, record: Self::Record) -> Self::Record {
        record
    }

    /// Transform a copy of the record just before update is issued.
    fn pre_update_entity(&self, record: Self::Record) -> Self::Record {
        record
    }

    // --- Lifecycle Hooks (Async) ---

    /// Called after a successful new-entity initialization.
    async fn post_init(&self) {}

    /// Called after a successful read, with the freshly stored record.
    async fn post_read(&self, _record: &Self::Record) {}

    /// Called after a successful create.
    async fn post_create(&self) {}

    /// Called after a successful update.
    async fn post_update(&self) {}
}
