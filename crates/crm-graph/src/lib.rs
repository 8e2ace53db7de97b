//! # CRM Graph
//!
//! Neo4j storage for the CRM API.
//!
//! Builds parameterized Cypher statements from the entity schema in
//! `crm-core`, runs them through a [`GraphSession`], and maps result rows
//! back into [`crm_core::EntityRecord`]s.

pub mod client;
pub mod queries;
pub mod repository;
pub mod schema;
pub mod session;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use client::{GraphClient, GraphConfig};
pub use repository::CrmGraph;
pub use session::{GraphSession, Row, Statement};
