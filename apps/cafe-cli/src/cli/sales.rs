use cafe_db::{Database, DbError};
use clap::{Args, Subcommand};
use serde_json::Value;

use super::to_json;
use crate::error::ApiError;

#[derive(Debug, Args)]
pub struct SalesCommand {
    #[command(subcommand)]
    command: SalesSubcommand,
}

#[derive(Debug, Subcommand)]
enum SalesSubcommand {
    /// Committed sales, newest first
    List,
    Show { id: String },
}

pub(crate) async fn run(db: &Database, command: SalesCommand) -> Result<Value, ApiError> {
    let sales = db.sales();

    match command.command {
        SalesSubcommand::List => to_json(&sales.list().await?),
        SalesSubcommand::Show { id } => {
            let sale = sales
                .get_by_id(&id)
                .await?
                .ok_or_else(|| DbError::not_found("Sale", &id))?;
            to_json(&sale)
        }
    }
}
