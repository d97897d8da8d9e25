//! # Command Layer
//!
//! Argument parsing and dispatch. Every command returns a JSON value that
//! the entry point prints to stdout.
//!
//! ```text
//! cafe-pos [--db PATH] <command>
//!   seed
//!   products  list | get | add | update | delete | set-stock
//!   staff     list | add | update | delete
//!   tables    list | add | rename | set-status | delete
//!   sale      finalize --table T --staff S --item PRODUCT:QTY ...
//!   sales     list | show
//!   report    sales | inventory | commissions [--staff ID] | dashboard
//! ```

use std::path::PathBuf;

use cafe_db::Database;
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::{json, Value};

use crate::config::AppConfig;
use crate::error::ApiError;

mod products;
mod report;
mod sale;
mod sales;
mod staff;
mod tables;

#[derive(Debug, Parser)]
#[command(name = "cafe-pos", about = "Café POS ledger", version, long_about = None)]
pub struct Cli {
    /// SQLite database file (overrides CAFE_DB_PATH)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Insert the default catalog into a fresh database
    Seed,
    Products(products::ProductsCommand),
    Staff(staff::StaffCommand),
    Tables(tables::TablesCommand),
    Sale(sale::SaleCommand),
    Sales(sales::SalesCommand),
    Report(report::ReportCommand),
}

impl Commands {
    pub async fn run(self, db: &Database, config: &AppConfig) -> Result<Value, ApiError> {
        match self {
            Commands::Seed => {
                let seeded = db.seed_initial_data().await?;
                Ok(json!({ "seeded": seeded }))
            }
            Commands::Products(command) => products::run(db, command).await,
            Commands::Staff(command) => staff::run(db, command).await,
            Commands::Tables(command) => tables::run(db, command).await,
            Commands::Sale(command) => sale::run(db, config, command).await,
            Commands::Sales(command) => sales::run(db, command).await,
            Commands::Report(command) => report::run(db, config, command).await,
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, ApiError> {
    Ok(serde_json::to_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cafe_db::DbConfig;

    async fn seeded() -> (Database, AppConfig) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.seed_initial_data().await.unwrap();
        (db, AppConfig::default())
    }

    async fn exec(db: &Database, config: &AppConfig, args: &[&str]) -> Result<Value, ApiError> {
        let cli = Cli::try_parse_from(std::iter::once("cafe-pos").chain(args.iter().copied()))
            .unwrap();
        cli.command.run(db, config).await
    }

    #[test]
    fn test_global_db_flag() {
        let cli = Cli::try_parse_from(["cafe-pos", "products", "list", "--db", "/tmp/x.db"]).unwrap();
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/x.db")));
    }

    #[test]
    fn test_bad_item_is_rejected_by_parser() {
        let result = Cli::try_parse_from([
            "cafe-pos", "sale", "finalize", "--table", "table-1", "--staff", "staff-1", "--item",
            "prod-1",
        ]);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_seed_twice() {
        let (db, config) = seeded().await;
        let out = exec(&db, &config, &["seed"]).await.unwrap();
        assert_eq!(out["seeded"], false);
    }

    #[tokio::test]
    async fn test_finalize_sale_command() {
        let (db, config) = seeded().await;

        let out = exec(
            &db,
            &config,
            &[
                "sale", "finalize", "--table", "table-3", "--staff", "staff-1", "--item",
                "prod-2:2", "--item", "prod-7:3",
            ],
        )
        .await
        .unwrap();

        assert_eq!(out["sale"]["total"], 2900);
        assert_eq!(out["formattedTotal"], "R$ 29.00");
        assert_eq!(out["sale"]["items"].as_array().unwrap().len(), 2);

        let table = db.tables().get("table-3").await.unwrap();
        assert_eq!(table.status, cafe_core::TableStatus::Available);
    }

    #[tokio::test]
    async fn test_insufficient_stock_command() {
        let (db, config) = seeded().await;

        let err = exec(
            &db,
            &config,
            &["sale", "finalize", "--table", "table-1", "--staff", "staff-1", "--item", "prod-8:31"],
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, crate::error::ErrorCode::InsufficientStock);
        assert_eq!(db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_product_lifecycle() {
        let (db, config) = seeded().await;

        let created = exec(
            &db,
            &config,
            &["products", "add", "--name", "Mocha", "--category", "Bebidas Quentes", "--price", "9.50", "--stock", "12"],
        )
        .await
        .unwrap();
        assert_eq!(created["price"], 950);
        let id = created["id"].as_str().unwrap().to_string();

        let updated = exec(&db, &config, &["products", "update", &id, "--price", "10"])
            .await
            .unwrap();
        assert_eq!(updated["price"], 1000);
        assert_eq!(updated["name"], "Mocha");
        assert_eq!(updated["stock"], 12);

        let err = exec(&db, &config, &["products", "set-stock", &id, "-3"])
            .await
            .unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::InvalidState);

        exec(&db, &config, &["products", "delete", &id]).await.unwrap();
        let err = exec(&db, &config, &["products", "get", &id]).await.unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_occupy_generates_order_ref() {
        let (db, config) = seeded().await;

        let out = exec(&db, &config, &["tables", "set-status", "table-1", "occupied"])
            .await
            .unwrap();

        assert_eq!(out["status"], "occupied");
        assert!(out["currentOrderId"].as_str().unwrap().starts_with("order-"));

        let out = exec(&db, &config, &["tables", "set-status", "table-1", "available"])
            .await
            .unwrap();
        assert!(out["currentOrderId"].is_null());
    }

    #[tokio::test]
    async fn test_dashboard_report() {
        let (db, config) = seeded().await;
        exec(
            &db,
            &config,
            &["sale", "finalize", "--table", "table-3", "--staff", "staff-2", "--item", "prod-1:2"],
        )
        .await
        .unwrap();

        let out = exec(&db, &config, &["report", "dashboard"]).await.unwrap();

        assert_eq!(out["storeName"], "Café POS");
        assert_eq!(out["report"]["todaysRevenue"], 1000);
        assert_eq!(out["report"]["topProduct"], "Espresso");
        assert_eq!(out["report"]["lastDays"].as_array().unwrap().len(), 7);
    }

    #[tokio::test]
    async fn test_commission_report_for_one_member() {
        let (db, config) = seeded().await;
        exec(
            &db,
            &config,
            &["sale", "finalize", "--table", "table-2", "--staff", "staff-3", "--item", "prod-2:2"],
        )
        .await
        .unwrap();

        let out = exec(&db, &config, &["report", "commissions", "--staff", "staff-3"])
            .await
            .unwrap();

        let rows = out["report"].as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["totalSold"], 1700);
        assert_eq!(rows[0]["commission"], 102);
    }
}
