//! CRM Core Library
//!
//! Entity schema tables, payload validation and the error taxonomy shared
//! by the graph and web layers. Nothing in here performs I/O.

pub mod entity;
pub mod error;
pub mod link;

pub use entity::model::{EntityPatch, EntityRecord, FieldValue, NewEntity};
pub use entity::{EntityKind, FieldKind, FieldSpec, RefPolicy, RefSpec};
pub use error::{CrmError, CrmResult};
pub use link::{LinkConfirmation, LinkKind};
