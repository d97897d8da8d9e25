use cafe_core::{OrderLine, SaleRequest};
use cafe_db::Database;
use clap::{Args, Subcommand};
use serde_json::{json, Value};

use crate::config::AppConfig;
use crate::error::ApiError;

#[derive(Debug, Args)]
pub struct SaleCommand {
    #[command(subcommand)]
    command: SaleSubcommand,
}

#[derive(Debug, Subcommand)]
enum SaleSubcommand {
    /// Charge a table's order, decrement stock and free the table
    Finalize(FinalizeArgs),
}

#[derive(Debug, Args)]
struct FinalizeArgs {
    #[arg(long)]
    table: String,

    #[arg(long)]
    staff: String,

    /// Order line as PRODUCT:QTY; repeat for more lines
    #[arg(long = "item", value_parser = parse_item, required = true)]
    items: Vec<OrderLine>,
}

pub(crate) async fn run(
    db: &Database,
    config: &AppConfig,
    command: SaleCommand,
) -> Result<Value, ApiError> {
    match command.command {
        SaleSubcommand::Finalize(args) => {
            let request = SaleRequest {
                table_id: args.table,
                staff_id: args.staff,
                items: args.items,
            };

            let sale = db.sale_engine().finalize_sale(&request).await?;

            Ok(json!({
                "formattedTotal": config.format_currency(sale.total),
                "sale": sale,
            }))
        }
    }
}

fn parse_item(raw: &str) -> Result<OrderLine, String> {
    let (product_id, quantity) = raw
        .rsplit_once(':')
        .ok_or_else(|| format!("expected PRODUCT:QTY, got '{raw}'"))?;

    let quantity = quantity
        .trim()
        .parse::<i64>()
        .map_err(|error| format!("invalid quantity in '{raw}': {error}"))?;

    Ok(OrderLine::new(product_id.trim(), quantity))
}
