//! Cypher statement builders.
//!
//! Labels, property names and relationship types are spliced into the text
//! only from the static schema in `crm-core`; every caller-supplied value
//! is bound as a parameter.

pub mod create;
pub mod link;
pub mod read;
pub mod update;

use crm_core::EntityKind;

/// Backtick-quote an identifier taken from the schema.
pub(crate) fn ident(name: &str) -> String {
    format!("`{name}`")
}

/// `FOREACH` clause deleting `node`'s `rel` edges to any `label` node other
/// than `keep`. Issued ahead of each edge `MERGE` so a reference slot never
/// holds more than one edge.
pub(crate) fn drop_other_edges(node: &str, rel: &str, label: &str, keep: &str) -> String {
    format!(
        "FOREACH (stale IN {} | DELETE stale)",
        other_edges(node, rel, label, keep)
    )
}

/// Like [`drop_other_edges`], but a no-op when `keep` did not resolve.
pub(crate) fn drop_other_edges_if_bound(node: &str, rel: &str, label: &str, keep: &str) -> String {
    format!(
        "FOREACH (stale IN CASE WHEN {keep} IS NULL THEN [] ELSE {} END | DELETE stale)",
        other_edges(node, rel, label, keep)
    )
}

fn other_edges(node: &str, rel: &str, label: &str, keep: &str) -> String {
    format!(
        "[({node})-[edge:{rel}]->(other:{label}) WHERE other <> {keep} | edge]",
        rel = ident(rel),
        label = ident(label),
    )
}

/// `RETURN` body for `kind` bound as `n`.
///
/// Reference slots are re-derived from relationships at read time rather
/// than stored as properties.
pub(crate) fn projection(kind: EntityKind) -> String {
    let mut columns = vec!["n.id AS id".to_string()];
    columns.extend(
        kind.fields()
            .iter()
            .map(|f| format!("n.{0} AS {0}", ident(f.name))),
    );
    columns.extend(kind.references().iter().map(|r| {
        format!(
            "head([(n)-[:{rel}]->(t:{label}) | t.id]) AS {name}",
            rel = ident(r.relationship),
            label = ident(r.target.label()),
            name = ident(r.name),
        )
    }));
    columns.join(", ")
}
