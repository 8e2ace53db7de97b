//! Web server command.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use crm_graph::CrmGraph;

use super::GraphArgs;

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(long, env = "CRM_PORT", default_value = "8000")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, env = "CRM_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Do not create constraints and indexes at startup
    #[arg(long)]
    pub skip_schema: bool,
}

impl ServeArgs {
    fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid bind address {}:{}", self.host, self.port))
    }
}

pub async fn execute(args: ServeArgs, graph_args: &GraphArgs) -> Result<()> {
    let addr = args.addr()?;
    let client = graph_args
        .connect()
        .await
        .with_context(|| format!("Could not reach Neo4j at {}", graph_args.neo4j_uri))?;

    if !args.skip_schema {
        crm_graph::schema::initialize_schema(&client).await?;
    }

    println!();
    println!("  {} {}", "CRM".cyan().bold(), "API Server".bold());
    println!();
    println!("  {}      http://{}", "API".green(), addr);
    println!("  {}    {}", "Neo4j".green(), graph_args.neo4j_uri);
    println!();
    println!("  {}", "Ctrl+C to stop".dimmed());
    println!();

    crm_web::run_server(CrmGraph::new(Arc::new(client)), addr).await
}
