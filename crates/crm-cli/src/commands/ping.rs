//! Connectivity check command.

use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use crm_graph::CrmGraph;

use super::GraphArgs;

pub async fn execute(graph_args: &GraphArgs) -> Result<()> {
    let client = graph_args.connect().await?;
    let graph = CrmGraph::new(Arc::new(client));

    match graph.ping().await {
        Ok(message) => {
            println!("{} {}", "✓".green(), message);
            Ok(())
        }
        Err(e) => {
            println!("{} {}", "✗".red(), e);
            Err(anyhow::anyhow!("Neo4j ping failed"))
        }
    }
}
