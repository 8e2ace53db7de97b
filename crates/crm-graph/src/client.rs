//! Neo4j connection client.

use anyhow::{Context, Result};
use async_trait::async_trait;
use crm_core::FieldValue;
use neo4rs::{BoltNull, BoltType, ConfigBuilder, Graph, Query};
use serde::Deserialize;
use tracing::debug;

use crate::session::{GraphSession, Row, Statement};

/// Configuration for connecting to Neo4j.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_connections: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: "neo4j".to_string(),
            database: "neo4j".to_string(),
            max_connections: 16,
        }
    }
}

/// Client for Neo4j operations.
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
}

impl GraphClient {
    /// Create a new GraphClient from config.
    ///
    /// `Graph::connect` only builds the pool, so a `RETURN 1` ping follows to
    /// force a real bolt handshake and fail fast when Neo4j is unreachable.
    pub async fn connect(config: &GraphConfig) -> Result<Self> {
        let neo4j_config = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .db(config.database.as_str())
            .max_connections(config.max_connections)
            .fetch_size(200)
            .build()
            .context("Failed to build Neo4j config")?;

        let graph = Graph::connect(neo4j_config)
            .await
            .context("Failed to create Neo4j connection pool")?;

        graph
            .run(Query::new("RETURN 1".to_string()))
            .await
            .context("Neo4j is not responding to queries")?;

        Ok(Self { graph })
    }

    /// Execute a Cypher query and return results as rows.
    pub async fn query(&self, query: Query) -> Result<Vec<neo4rs::Row>> {
        let mut result = self.graph.execute(query).await.context("Neo4j query failed")?;

        let mut rows = Vec::new();
        while let Some(row) = result.next().await.context("Failed to fetch Neo4j result row")? {
            rows.push(row);
        }
        Ok(rows)
    }
}

#[async_trait]
impl GraphSession for GraphClient {
    async fn run(&self, statement: Statement) -> Result<Vec<Row>> {
        debug!(cypher = %statement.text, params = statement.params.len(), "Running statement");

        let rows = self.query(to_query(&statement)).await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let mut named = Row::new();
            for column in &statement.columns {
                let value: serde_json::Value = row
                    .get(column)
                    .map_err(|e| anyhow::anyhow!("Failed to get field '{}': {:?}", column, e))?;
                named.insert(column.clone(), value);
            }
            out.push(named);
        }
        Ok(out)
    }
}

fn to_query(statement: &Statement) -> Query {
    statement
        .params
        .iter()
        .fold(Query::new(statement.text.clone()), |query, (key, value)| match value {
            FieldValue::Text(s) => query.param(key, s.as_str()),
            FieldValue::Number(n) => query.param(key, *n),
            FieldValue::Null => query.param(key, BoltType::Null(BoltNull)),
        })
}
