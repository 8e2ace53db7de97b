//! CLI command definitions and handlers.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use crm_graph::{GraphClient, GraphConfig};

pub mod ping;
pub mod schema;
pub mod serve;

/// CRM graph API
#[derive(Parser)]
#[command(name = "crm")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Also write logs to a daily-rolling file in this directory
    #[arg(long, global = true, env = "CRM_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    #[command(flatten)]
    pub graph: GraphArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Neo4j connection settings.
#[derive(Args, Debug, Clone)]
pub struct GraphArgs {
    /// Bolt URI of the Neo4j server
    #[arg(long, global = true, env = "NEO4J_URI", default_value = "bolt://localhost:7687")]
    pub neo4j_uri: String,

    /// Neo4j user
    #[arg(long, global = true, env = "NEO4J_USER", default_value = "neo4j")]
    pub neo4j_user: String,

    /// Neo4j password
    #[arg(long, global = true, env = "NEO4J_PASSWORD", default_value = "neo4j", hide_env_values = true)]
    pub neo4j_password: String,

    /// Neo4j database name
    #[arg(long, global = true, env = "NEO4J_DATABASE", default_value = "neo4j")]
    pub neo4j_database: String,

    /// Connection pool size
    #[arg(long, global = true, env = "NEO4J_MAX_CONNECTIONS", default_value = "16")]
    pub neo4j_max_connections: usize,
}

impl GraphArgs {
    pub fn config(&self) -> GraphConfig {
        GraphConfig {
            uri: self.neo4j_uri.clone(),
            user: self.neo4j_user.clone(),
            password: self.neo4j_password.clone(),
            database: self.neo4j_database.clone(),
            max_connections: self.neo4j_max_connections,
        }
    }

    /// Connect and ping; fails fast when Neo4j is unreachable.
    pub async fn connect(&self) -> Result<GraphClient> {
        let config = self.config();
        tracing::info!(uri = %config.uri, database = %config.database, "Connecting to Neo4j");
        GraphClient::connect(&config).await
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API
    Serve(serve::ServeArgs),

    /// Create constraints and indexes
    Schema,

    /// Check that Neo4j is reachable
    Ping,
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Serve(args) => serve::execute(args, &self.graph).await,
            Commands::Schema => schema::execute(&self.graph).await,
            Commands::Ping => ping::execute(&self.graph).await,
        }
    }
}
