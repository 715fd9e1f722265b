//! # Errors
//!
//! This module defines the common error types used throughout the detail-page
//! framework. By centralizing error definitions, we ensure consistent error
//! handling across the page controller, its clients, and the entity services.

use serde::{Deserialize, Serialize};

/// A server-reported error located at a specific field of the record.
///
/// The `location` is the registration key of a child field (a plain attribute
/// name or a dotted `userDefinedFields.X` path). Errors whose location matches
/// a registered child are displayed inline on that child; the rest are only
/// visible through the generic error presenter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub location: String,
    pub message: String,
}

impl FieldError {
    pub fn new(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            message: message.into(),
        }
    }
}

/// Errors produced by the entity-type CRUD operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// The request was deliberately cancelled because it was superseded.
    /// Never surfaced to the user and never mutates page state.
    #[error("request cancelled")]
    Cancelled,

    /// The server rejected the request, optionally with field-located
    /// sub-errors to be mapped back onto registered children.
    #[error("{message}")]
    Rejected {
        message: String,
        errors: Vec<FieldError>,
    },

    /// Any other failure reaching the entity service (network, timeouts, ...).
    #[error("transport failure: {0}")]
    Transport(String),
}

impl ServiceError {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
            errors: Vec::new(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Field-located sub-errors, if the server reported any.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::Rejected { errors, .. } => errors,
            _ => &[],
        }
    }
}

/// Errors that can occur when talking to a page controller through its client.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("page closed")]
    PageClosed,
    #[error("page dropped response channel")]
    PageDropped,
}
