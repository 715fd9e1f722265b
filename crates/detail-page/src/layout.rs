//! # Layout State & Render Modes
//!
//! The small state record governing render mode and interaction gating, and
//! the pure render-state function output consumed by the render layer.

/// Render/interaction gating state for one detail page.
///
/// Invariants:
/// - `blocking` is true only while exactly one CRUD request for this page is
///   outstanding.
/// - `is_new_entity` is true iff no persisted identifier exists yet.
/// - `is_modified` becomes true on the first field edit after a load and
///   resets to false immediately after any successful load/create/update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutState {
    pub blocking: bool,
    pub is_new_entity: bool,
    pub is_modified: bool,
}

impl Default for LayoutState {
    // A freshly mounted page has no persisted identifier yet.
    fn default() -> Self {
        Self {
            blocking: false,
            is_new_entity: true,
            is_modified: false,
        }
    }
}

impl LayoutState {
    /// State after any successful load (read or init-new).
    pub fn loaded(is_new_entity: bool) -> Self {
        Self {
            blocking: false,
            is_new_entity,
            is_modified: false,
        }
    }
}

/// What the render layer should show, as a pure function of page state.
///
/// Checked in order: access denial, page-level read error, record still
/// absent, and finally the entity form. The form variant carries a snapshot
/// of the record for the entity-type-specific render hook; the controller
/// never produces it while the record is absent.
#[derive(Debug, Clone, PartialEq)]
pub enum PageView<R> {
    /// Access to this entity type is not granted by configuration.
    AccessDenied { entity_desc: String },
    /// A read failed; these messages replace the form render.
    ReadError(Vec<String>),
    /// No record yet: full-area blocking indicator.
    Loading,
    /// The entity form, fed by the current record.
    Form(R),
}
