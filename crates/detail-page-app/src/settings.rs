//! # Asset Page Settings
//!
//! Wires the generic page controller to the asset service: metadata, CRUD
//! operations, and the asset-specific lifecycle hooks.

use crate::model::Asset;
use crate::service::AssetService;
use async_trait::async_trait;
use detail_page::{EntityScreen, EntitySettings, ServiceError};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub struct AssetSettings {
    service: Arc<AssetService>,
    screen: Option<EntityScreen>,
}

impl AssetSettings {
    pub fn new(service: Arc<AssetService>) -> Self {
        Self {
            service,
            screen: Some(EntityScreen {
                update_allowed: true,
            }),
        }
    }

    /// Override the access screen (deny with `None`, or read-only).
    pub fn with_screen(mut self, screen: Option<EntityScreen>) -> Self {
        self.screen = screen;
        self
    }
}

#[async_trait]
impl EntitySettings for AssetSettings {
    type Record = Asset;

    fn entity_screen(&self) -> Option<EntityScreen> {
        self.screen
    }

    fn entity_desc(&self) -> &str {
        "Asset"
    }

    fn entity_url(&self) -> &str {
        "/assets/"
    }

    async fn init_new_entity(&self) -> Result<Asset, ServiceError> {
        Ok(Asset::default())
    }

    async fn read_entity(
        &self,
        code: &str,
        cancel: CancellationToken,
    ) -> Result<Asset, ServiceError> {
        if cancel.is_cancelled() {
            return Err(ServiceError::Cancelled);
        }
        self.service.read(code)
    }

    async fn create_entity(&self, asset: Asset) -> Result<Asset, ServiceError> {
        self.service.create(asset)
    }

    async fn update_entity(&self, asset: Asset) -> Result<Asset, ServiceError> {
        self.service.update(asset)
    }

    async fn delete_entity(&self, code: &str) -> Result<(), ServiceError> {
        self.service.delete(code)
    }

    // Backends reject trailing whitespace; tidy the copy before submitting.
    fn pre_create_entity(&self, mut asset: Asset) -> Asset {
        asset.description = asset.description.trim().to_owned();
        asset.department = asset.department.trim().to_owned();
        asset
    }

    fn pre_update_entity(&self, asset: Asset) -> Asset {
        self.pre_create_entity(asset)
    }

    async fn post_read(&self, asset: &Asset) {
        debug!(code = ?asset.code, "Asset loaded into page");
    }
}
