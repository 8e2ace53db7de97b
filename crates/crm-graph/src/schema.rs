//! Neo4j schema initialization (constraints and indexes).

use anyhow::Result;
use crm_core::EntityKind;
use tracing::info;

use crate::session::{GraphSession, Statement};

/// Uniqueness constraint on `id` for every label, plus a `name` text index
/// for searchable labels.
pub fn schema_statements() -> Vec<String> {
    let mut statements = Vec::new();
    for kind in EntityKind::ALL {
        let prefix = kind.label().to_lowercase();
        statements.push(format!(
            "CREATE CONSTRAINT {prefix}_id IF NOT EXISTS FOR (n:{label}) REQUIRE n.id IS UNIQUE",
            label = kind.label(),
        ));
        if kind.is_searchable() {
            statements.push(format!(
                "CREATE TEXT INDEX {prefix}_name IF NOT EXISTS FOR (n:{label}) ON (n.name)",
                label = kind.label(),
            ));
        }
    }
    statements
}

/// Initialize Neo4j schema with constraints and indexes.
///
/// Safe to run multiple times - uses IF NOT EXISTS clauses.
pub async fn initialize_schema(session: &dyn GraphSession) -> Result<usize> {
    info!("Initializing Neo4j schema...");

    let statements = schema_statements();
    for statement in &statements {
        session.run(Statement::new(statement.as_str())).await?;
    }

    info!("Neo4j schema initialized ({} statements)", statements.len());
    Ok(statements.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedSession;

    #[test]
    fn test_schema_covers_every_label() {
        let statements = schema_statements();
        // six constraints, five name indexes (Activity has no name)
        assert_eq!(statements.len(), 11);
        assert!(statements.contains(
            &"CREATE CONSTRAINT opportunity_id IF NOT EXISTS FOR (n:Opportunity) REQUIRE n.id IS UNIQUE".to_string()
        ));
        assert!(statements.contains(
            &"CREATE TEXT INDEX lead_name IF NOT EXISTS FOR (n:Lead) ON (n.name)".to_string()
        ));
        assert!(!statements.iter().any(|s| s.contains("activity_name")));
    }

    #[tokio::test]
    async fn test_initialize_runs_each_statement() {
        let session = ScriptedSession::new();
        let count = initialize_schema(&session).await.unwrap();
        assert_eq!(count, 11);
        assert_eq!(session.statements().len(), 11);
    }
}
