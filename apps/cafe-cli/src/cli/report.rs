use cafe_core::reports::{commission_report, dashboard_summary, inventory_report, sales_report};
use cafe_core::Money;
use cafe_db::Database;
use chrono::Utc;
use clap::{Args, Subcommand};
use serde::Serialize;
use serde_json::{json, Value};

use crate::config::AppConfig;
use crate::error::ApiError;

#[derive(Debug, Args)]
pub struct ReportCommand {
    #[command(subcommand)]
    command: ReportSubcommand,
}

#[derive(Debug, Subcommand)]
enum ReportSubcommand {
    /// Every sale with staff name and item summary
    Sales,
    /// Units sold per product, busiest first
    Inventory,
    /// Commission owed per staff member
    Commissions {
        /// Only this staff member
        #[arg(long)]
        staff: Option<String>,
    },
    /// Today's revenue, occupied tables, top product and the last week
    Dashboard,
}

pub(crate) async fn run(
    db: &Database,
    config: &AppConfig,
    command: ReportCommand,
) -> Result<Value, ApiError> {
    let sales = db.sales().list().await?;

    match command.command {
        ReportSubcommand::Sales => {
            let products = db.products().list().await?;
            let staff = db.staff().list().await?;
            let rows = sales_report(&sales, &products, &staff);

            let revenue: Money = rows.iter().map(|row| row.total).sum();
            envelope(
                config,
                &rows,
                json!({ "sales": rows.len(), "revenue": config.format_currency(revenue) }),
            )
        }
        ReportSubcommand::Inventory => {
            let products = db.products().list().await?;
            envelope(config, &inventory_report(&products, &sales), Value::Null)
        }
        ReportSubcommand::Commissions { staff: only } => {
            let staff = db.staff().list().await?;
            let rows = commission_report(&staff, &sales, only.as_deref())?;

            let owed: Money = rows.iter().map(|row| row.commission).sum();
            envelope(
                config,
                &rows,
                json!({ "commissionOwed": config.format_currency(owed) }),
            )
        }
        ReportSubcommand::Dashboard => {
            let products = db.products().list().await?;
            let tables = db.tables().list().await?;
            let today = Utc::now().date_naive();
            let summary = dashboard_summary(&sales, &tables, &products, today)?;

            let revenue = config.format_currency(summary.todays_revenue);
            envelope(config, &summary, json!({ "todaysRevenue": revenue }))
        }
    }
}

/// Wraps report data with the store name and human-readable totals.
fn envelope<T: Serialize>(config: &AppConfig, report: &T, formatted: Value) -> Result<Value, ApiError> {
    let mut out = json!({
        "storeName": config.store_name,
        "generatedAt": Utc::now().to_rfc3339(),
        "report": serde_json::to_value(report)?,
    });
    if !formatted.is_null() {
        out["formatted"] = formatted;
    }
    Ok(out)
}
