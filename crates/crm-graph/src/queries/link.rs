//! Out-of-band relationship statements.

use crm_core::LinkKind;

use super::{drop_other_edges, ident};
use crate::session::Statement;

/// Merge `(source)-[:REL]->(target)` only if both nodes exist, replacing
/// any edge the source already had to another node of the target's label.
///
/// Zero rows back means at least one endpoint is missing and nothing was
/// written.
pub fn link_statement(kind: LinkKind, source_id: &str, target_id: &str) -> Statement {
    Statement::new(format!(
        "MATCH (s:{source} {{id: $source_id}}), (t:{target} {{id: $target_id}})\n\
         {replace}\n\
         MERGE (s)-[:{rel}]->(t)\n\
         RETURN s.id AS source_id, t.id AS target_id",
        source = ident(kind.source().label()),
        target = ident(kind.target().label()),
        replace = drop_other_edges("s", kind.relationship(), kind.target().label(), "t"),
        rel = ident(kind.relationship()),
    ))
    .param("source_id", source_id)
    .param("target_id", target_id)
    .returning(["source_id", "target_id"])
}
