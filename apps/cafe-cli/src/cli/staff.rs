use cafe_core::{Rate, StaffDraft};
use cafe_db::Database;
use clap::{Args, Subcommand};
use serde_json::{json, Value};

use super::to_json;
use crate::error::ApiError;

#[derive(Debug, Args)]
pub struct StaffCommand {
    #[command(subcommand)]
    command: StaffSubcommand,
}

#[derive(Debug, Subcommand)]
enum StaffSubcommand {
    List,
    Add(AddStaffArgs),
    Update(UpdateStaffArgs),
    Delete { id: String },
}

#[derive(Debug, Args)]
struct AddStaffArgs {
    #[arg(long)]
    name: String,

    /// Commission as a percentage, e.g. 5 or 6.5
    #[arg(long, value_parser = Rate::parse_percentage, default_value = "0")]
    commission: Rate,
}

#[derive(Debug, Args)]
struct UpdateStaffArgs {
    id: String,

    #[arg(long)]
    name: Option<String>,

    #[arg(long, value_parser = Rate::parse_percentage)]
    commission: Option<Rate>,
}

pub(crate) async fn run(db: &Database, command: StaffCommand) -> Result<Value, ApiError> {
    let staff = db.staff();

    match command.command {
        StaffSubcommand::List => to_json(&staff.list().await?),
        StaffSubcommand::Add(args) => {
            let draft = StaffDraft {
                name: args.name,
                commission_rate: args.commission,
            };
            to_json(&staff.create(&draft).await?)
        }
        StaffSubcommand::Update(args) => {
            let current = staff.get(&args.id).await?;
            let draft = StaffDraft {
                name: args.name.unwrap_or(current.name),
                commission_rate: args.commission.unwrap_or(current.commission_rate),
            };
            to_json(&staff.update(&args.id, &draft).await?)
        }
        StaffSubcommand::Delete { id } => {
            staff.delete(&id).await?;
            Ok(json!({ "deleted": id }))
        }
    }
}
