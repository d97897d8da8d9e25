use cafe_core::{Money, ProductDraft};
use cafe_db::Database;
use clap::{Args, Subcommand};
use serde_json::{json, Value};

use super::to_json;
use crate::error::ApiError;

#[derive(Debug, Args)]
pub struct ProductsCommand {
    #[command(subcommand)]
    command: ProductsSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProductsSubcommand {
    /// List the menu, grouped by category
    List,
    /// Show one product
    Get { id: String },
    Add(AddProductArgs),
    Update(UpdateProductArgs),
    /// Remove a product (past sales keep their lines)
    Delete { id: String },
    /// Set stock to an absolute value
    SetStock {
        id: String,
        #[arg(allow_negative_numbers = true)]
        stock: i64,
    },
}

/// Create a product
#[derive(Debug, Args)]
struct AddProductArgs {
    #[arg(long)]
    name: String,

    #[arg(long)]
    category: String,

    /// Unit price as a decimal, e.g. 8.50
    #[arg(long, value_parser = Money::parse_decimal)]
    price: Money,

    #[arg(long, default_value_t = 0)]
    stock: i64,
}

/// Edit a product; omitted fields keep their current value
#[derive(Debug, Args)]
struct UpdateProductArgs {
    id: String,

    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    category: Option<String>,

    #[arg(long, value_parser = Money::parse_decimal)]
    price: Option<Money>,

    #[arg(long)]
    stock: Option<i64>,
}

pub(crate) async fn run(db: &Database, command: ProductsCommand) -> Result<Value, ApiError> {
    let products = db.products();

    match command.command {
        ProductsSubcommand::List => to_json(&products.list().await?),
        ProductsSubcommand::Get { id } => to_json(&products.get(&id).await?),
        ProductsSubcommand::Add(args) => {
            let draft = ProductDraft {
                name: args.name,
                category: args.category,
                price: args.price,
                stock: args.stock,
            };
            to_json(&products.create(&draft).await?)
        }
        ProductsSubcommand::Update(args) => {
            let current = products.get(&args.id).await?;
            let draft = ProductDraft {
                name: args.name.unwrap_or(current.name),
                category: args.category.unwrap_or(current.category),
                price: args.price.unwrap_or(current.price),
                stock: args.stock.unwrap_or(current.stock),
            };
            to_json(&products.update(&args.id, &draft).await?)
        }
        ProductsSubcommand::Delete { id } => {
            products.delete(&id).await?;
            Ok(json!({ "deleted": id }))
        }
        ProductsSubcommand::SetStock { id, stock } => to_json(&products.set_stock(&id, stock).await?),
    }
}
