//! Schema initialization command.

use anyhow::Result;
use colored::Colorize;

use super::GraphArgs;

pub async fn execute(graph_args: &GraphArgs) -> Result<()> {
    let client = graph_args.connect().await?;

    println!("{}", "Initializing graph schema...".bold());
    let count = crm_graph::schema::initialize_schema(&client).await?;
    println!("{} {} constraints and indexes ensured", "✓".green(), count);

    Ok(())
}
