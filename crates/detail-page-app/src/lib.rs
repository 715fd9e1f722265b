//! # Asset Detail-Page Application
//!
//! Sample wiring of the generic [`detail_page`] controller to one concrete
//! entity type: an [`Asset`](model::Asset) with a structured record, an
//! in-memory [`AssetService`](service::AssetService), and a console shell.

pub mod model;
pub mod service;
pub mod settings;
pub mod shell;
