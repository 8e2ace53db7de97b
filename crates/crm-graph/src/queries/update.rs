//! Partial-update statements.
//!
//! The `SET` clause is built from the patch's supplied fields only, so
//! properties the caller did not mention keep their stored values.

use crm_core::EntityPatch;

use super::{ident, projection};
use crate::session::Statement;

/// `MATCH` the node by id, `SET` each supplied field, return the full record.
///
/// Zero rows back means the node does not exist.
pub fn update_statement(id: &str, patch: &EntityPatch) -> Statement {
    let kind = patch.kind;
    let assignments: Vec<String> = patch
        .changes
        .iter()
        .map(|(spec, _)| format!("n.{} = $p_{}", ident(spec.name), spec.name))
        .collect();

    let text = format!(
        "MATCH (n:{label} {{id: $id}})\nSET {assignments}\nRETURN {projection}",
        label = ident(kind.label()),
        assignments = assignments.join(", "),
        projection = projection(kind),
    );

    patch
        .changes
        .iter()
        .fold(Statement::new(text).param("id", id), |stmt, (spec, value)| {
            stmt.param(format!("p_{}", spec.name), value.clone())
        })
        .returning(kind.columns())
}
