use cafe_core::TableStatus;
use cafe_db::Database;
use clap::{Args, Subcommand};
use serde_json::{json, Value};
use uuid::Uuid;

use super::to_json;
use crate::error::ApiError;

#[derive(Debug, Args)]
pub struct TablesCommand {
    #[command(subcommand)]
    command: TablesSubcommand,
}

#[derive(Debug, Subcommand)]
enum TablesSubcommand {
    /// Show the floor plan
    List,
    Add {
        #[arg(long)]
        name: String,
    },
    Rename {
        id: String,
        #[arg(long)]
        name: String,
    },
    /// Change occupancy: available, occupied or reserved
    SetStatus(SetStatusArgs),
    Delete { id: String },
}

#[derive(Debug, Args)]
struct SetStatusArgs {
    id: String,

    status: TableStatus,

    /// Order reference for an occupied table; generated when omitted
    #[arg(long)]
    order: Option<String>,
}

pub(crate) async fn run(db: &Database, command: TablesCommand) -> Result<Value, ApiError> {
    let tables = db.tables();

    match command.command {
        TablesSubcommand::List => to_json(&tables.list().await?),
        TablesSubcommand::Add { name } => to_json(&tables.create(&name).await?),
        TablesSubcommand::Rename { id, name } => to_json(&tables.update(&id, &name).await?),
        TablesSubcommand::SetStatus(args) => {
            let order_ref = order_ref_for(args.status, args.order);
            to_json(&tables.set_status(&args.id, args.status, order_ref.as_deref()).await?)
        }
        TablesSubcommand::Delete { id } => {
            tables.delete(&id).await?;
            Ok(json!({ "deleted": id }))
        }
    }
}

/// Only occupied tables carry an order reference.
fn order_ref_for(status: TableStatus, given: Option<String>) -> Option<String> {
    match status {
        TableStatus::Occupied => {
            Some(given.unwrap_or_else(|| format!("order-{}", Uuid::new_v4())))
        }
        TableStatus::Available | TableStatus::Reserved => None,
    }
}
