//! Get, list and name-search statements.

use crm_core::EntityKind;

use super::{ident, projection};
use crate::session::Statement;

pub fn get_statement(kind: EntityKind, id: &str) -> Statement {
    Statement::new(format!(
        "MATCH (n:{} {{id: $id}})\nRETURN {}\nLIMIT 1",
        ident(kind.label()),
        projection(kind)
    ))
    .param("id", id)
    .returning(kind.columns())
}

pub fn list_statement(kind: EntityKind) -> Statement {
    Statement::new(format!("MATCH (n:{})\nRETURN {}", ident(kind.label()), projection(kind)))
        .returning(kind.columns())
}

/// Case-insensitive substring match on `name`.
///
/// Callers check [`EntityKind::is_searchable`] first.
pub fn search_statement(kind: EntityKind, name: &str) -> Statement {
    Statement::new(format!(
        "MATCH (n:{})\nWHERE toLower(n.`name`) CONTAINS toLower($name)\nRETURN {}",
        ident(kind.label()),
        projection(kind)
    ))
    .param("name", name)
    .returning(kind.columns())
}
