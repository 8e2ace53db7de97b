//! Upsert-with-links statements.
//!
//! One statement per creation:
//!
//! ```cypher
//! MATCH (r0:`Lead` {id: $ref_lead_id})              // each required parent
//! MERGE (n:`Opportunity` {id: $id})
//! SET n.`name` = $p_name, ...
//! FOREACH (stale IN [(n)-[edge:`FOR_LEAD`]->(other:`Lead`) WHERE other <> r0 | edge] | DELETE stale)
//! MERGE (n)-[:`FOR_LEAD`]->(r0)
//! WITH n
//! OPTIONAL MATCH (o0:`Account` {id: $ref_account_id})   // each optional slot supplied
//! FOREACH (stale IN CASE WHEN o0 IS NULL THEN [] ELSE [...] END | DELETE stale)
//! FOREACH (ignored IN CASE WHEN o0 IS NULL THEN [] ELSE [1] END |
//!     MERGE (n)-[:`BELONGS_TO`]->(o0))
//! WITH DISTINCT n
//! RETURN ...
//! ```
//!
//! Required parents are matched before the `MERGE`, so a missing parent
//! produces zero rows and writes nothing. A supplied slot replaces the
//! node's previous edge for that slot; an unresolved optional target
//! leaves the previous edge alone.

use crm_core::NewEntity;

use super::{drop_other_edges, drop_other_edges_if_bound, ident, projection};
use crate::session::Statement;

pub fn create_statement(entity: &NewEntity) -> Statement {
    let kind = entity.kind;
    let mut lines = Vec::new();
    let mut stmt = Statement::new(String::new()).param("id", entity.id.as_str());

    let (required, optional): (Vec<_>, Vec<_>) =
        entity.references.iter().partition(|(spec, _)| spec.is_required());

    for (i, (spec, target)) in required.iter().enumerate() {
        lines.push(format!(
            "MATCH (r{i}:{label} {{id: $ref_{name}}})",
            label = ident(spec.target.label()),
            name = spec.name,
        ));
        stmt = stmt.param(format!("ref_{}", spec.name), target.as_str());
    }

    lines.push(format!("MERGE (n:{} {{id: $id}})", ident(kind.label())));

    let assignments: Vec<String> = entity
        .attributes
        .iter()
        .map(|(spec, _)| format!("n.{} = $p_{}", ident(spec.name), spec.name))
        .collect();
    if !assignments.is_empty() {
        lines.push(format!("SET {}", assignments.join(", ")));
    }
    for (spec, value) in &entity.attributes {
        stmt = stmt.param(format!("p_{}", spec.name), value.clone());
    }

    for (i, (spec, _)) in required.iter().enumerate() {
        let parent = format!("r{i}");
        lines.push(drop_other_edges("n", spec.relationship, spec.target.label(), &parent));
        lines.push(format!("MERGE (n)-[:{}]->({parent})", ident(spec.relationship)));
    }

    for (i, (spec, target)) in optional.iter().enumerate() {
        lines.push("WITH n".to_string());
        lines.push(format!(
            "OPTIONAL MATCH (o{i}:{label} {{id: $ref_{name}}})",
            label = ident(spec.target.label()),
            name = spec.name,
        ));
        lines.push(drop_other_edges_if_bound(
            "n",
            spec.relationship,
            spec.target.label(),
            &format!("o{i}"),
        ));
        lines.push(format!(
            "FOREACH (ignored IN CASE WHEN o{i} IS NULL THEN [] ELSE [1] END | MERGE (n)-[:{rel}]->(o{i}))",
            rel = ident(spec.relationship),
        ));
        stmt = stmt.param(format!("ref_{}", spec.name), target.as_str());
    }

    lines.push("WITH DISTINCT n".to_string());
    lines.push(format!("RETURN {}", projection(kind)));

    stmt.text = lines.join("\n");
    stmt.returning(kind.columns())
}

/// Human-readable description of the parents a creation depends on,
/// used when the statement comes back empty.
pub fn missing_parent_message(entity: &NewEntity) -> Option<String> {
    let parents: Vec<&str> = entity
        .references
        .iter()
        .filter(|(spec, _)| spec.is_required())
        .map(|(spec, _)| spec.target.label())
        .collect();

    if parents.is_empty() {
        None
    } else {
        Some(format!("{} not found for this {}", parents.join(" or "), entity.kind))
    }
}
