//! # Asset Service
//!
//! In-memory stand-in for the asset REST backend. Assigns codes on create,
//! rejects unknown codes, and reports field-located validation errors the
//! way a real backend would.

use crate::model::Asset;
use detail_page::{FieldError, ServiceError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct AssetService {
    store: Mutex<HashMap<String, Asset>>,
    next_code: AtomicU32,
}

impl AssetService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(&self, code: &str) -> Result<Asset, ServiceError> {
        self.store
            .lock()
            .unwrap()
            .get(code)
            .cloned()
            .ok_or_else(|| ServiceError::rejected(format!("Asset {code} not found")))
    }

    pub fn create(&self, mut asset: Asset) -> Result<Asset, ServiceError> {
        self.validate(&asset)?;
        let code = format!("A{:04}", self.next_code.fetch_add(1, Ordering::Relaxed) + 1);
        asset.code = Some(code.clone());
        self.store.lock().unwrap().insert(code, asset.clone());
        Ok(asset)
    }

    pub fn update(&self, asset: Asset) -> Result<Asset, ServiceError> {
        self.validate(&asset)?;
        let code = asset
            .code
            .clone()
            .ok_or_else(|| ServiceError::rejected("Asset has no code"))?;
        let mut store = self.store.lock().unwrap();
        if !store.contains_key(&code) {
            return Err(ServiceError::rejected(format!("Asset {code} not found")));
        }
        store.insert(code, asset.clone());
        Ok(asset)
    }

    pub fn delete(&self, code: &str) -> Result<(), ServiceError> {
        self.store
            .lock()
            .unwrap()
            .remove(code)
            .map(|_| ())
            .ok_or_else(|| ServiceError::rejected(format!("Asset {code} not found")))
    }

    fn validate(&self, asset: &Asset) -> Result<(), ServiceError> {
        let mut errors = Vec::new();
        if asset.description.trim().is_empty() {
            errors.push(FieldError::new("description", "Description is mandatory"));
        }
        if asset.department.trim().is_empty() {
            errors.push(FieldError::new("department", "Department is mandatory"));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::Rejected {
                message: "Asset could not be saved".to_owned(),
                errors,
            })
        }
    }
}
