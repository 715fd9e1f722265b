//! # Child Field Registry
//!
//! Child field handles register themselves under a stable key as they mount;
//! the registry broadcasts validation resets, runs save-time validation, maps
//! server-reported field errors back onto the matching child, and toggles
//! enablement when the record is read-only for the current user.
//!
//! Instead of probing children for capabilities at runtime, registration is a
//! tagged variant: [`ChildHandle::Full`] children take part in validation,
//! [`ChildHandle::DisplayOnly`] children are always considered valid.

use crate::error::FieldError;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// Capability set every registered child field must satisfy.
///
/// Each child owns its own visual and validation state; the controller only
/// invokes these operations, never concrete widget types.
pub trait ChildField: Send + 'static {
    /// Run the child's own validation; `true` means the field passes.
    fn validate(&mut self) -> bool;

    /// Set or clear the error flag and helper message shown by the child.
    fn set_validation_error(&mut self, error: bool, message: Option<String>);

    /// Enable or disable user interaction with the child.
    fn set_enabled(&mut self, enabled: bool);
}

/// A registered child, tagged by whether it takes part in validation.
pub enum ChildHandle {
    /// An editable field whose `validate()` gates saving.
    Full(Box<dyn ChildField>),
    /// A display-only field; vacuously valid.
    DisplayOnly(Box<dyn ChildField>),
}

impl ChildHandle {
    fn field_mut(&mut self) -> &mut dyn ChildField {
        match self {
            Self::Full(field) | Self::DisplayOnly(field) => field.as_mut(),
        }
    }
}

impl fmt::Debug for ChildHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full(_) => f.write_str("ChildHandle::Full"),
            Self::DisplayOnly(_) => f.write_str("ChildHandle::DisplayOnly"),
        }
    }
}

/// Mutable mapping from field registration key to child handle.
///
/// Registration is push-based: the registry never discovers children itself.
#[derive(Default)]
pub struct ChildRegistry {
    children: HashMap<String, ChildHandle>,
}

impl ChildRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a child under a stable key, replacing any previous handle.
    pub fn register(&mut self, key: impl Into<String>, child: ChildHandle) {
        let key = key.into();
        debug!(field = %key, ?child, "Child registered");
        self.children.insert(key, child);
    }

    /// Remove a child on unmount. Unknown keys are ignored.
    pub fn deregister(&mut self, key: &str) {
        if self.children.remove(key).is_some() {
            debug!(field = %key, "Child deregistered");
        }
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Clear error flag and helper message on every registered child.
    ///
    /// Runs before every read and every new-entity initialization so stale
    /// validation state never leaks across records.
    pub fn reset_validation(&mut self) {
        for child in self.children.values_mut() {
            child.field_mut().set_validation_error(false, None);
        }
    }

    /// Logical AND of `validate()` over all full children.
    ///
    /// Display-only children are vacuously valid, as is an empty registry.
    pub fn validate_fields(&mut self) -> bool {
        let mut passed = true;
        for (key, child) in &mut self.children {
            if let ChildHandle::Full(field) = child {
                if !field.validate() {
                    debug!(field = %key, "Validation failed");
                    passed = false;
                }
            }
        }
        passed
    }

    /// Display each server-reported field error on the matching child.
    ///
    /// Errors whose location has no registered child are dropped at this
    /// layer; they remain visible through the generic error presenter.
    pub fn map_server_errors(&mut self, errors: &[FieldError]) {
        for error in errors {
            if let Some(child) = self.children.get_mut(&error.location) {
                child
                    .field_mut()
                    .set_validation_error(true, Some(error.message.clone()));
            } else {
                debug!(field = %error.location, "No child registered for server error");
            }
        }
    }

    /// Broadcast an enable/disable call to every registered child.
    pub fn set_all_enabled(&mut self, enabled: bool) {
        for child in self.children.values_mut() {
            child.field_mut().set_enabled(enabled);
        }
    }
}
