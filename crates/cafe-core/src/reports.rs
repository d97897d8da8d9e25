//! # Reports Module
//!
//! Read-side aggregations over sales history. Everything here is computed
//! from already-loaded ledger snapshots; nothing is persisted.
//!
//! ## Reports
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                            Reports                                      │
//! │                                                                         │
//! │  sales_report       one row per sale: date, staff, total, item summary │
//! │  inventory_report   units sold per product, busiest first              │
//! │  commission_report  total sold × commission rate, per staff member     │
//! │  dashboard_summary  today's revenue, occupied tables, top product,     │
//! │                     revenue for the last seven days                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sales may reference products or staff that were deleted after the sale was
//! recorded. Those render as [`UNKNOWN_LABEL`].

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{CafeTable, Product, Rate, Sale, StaffMember, TableStatus};
use crate::{DASHBOARD_DAYS, UNKNOWN_LABEL};

// =============================================================================
// Sales Report
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SalesReportRow {
    pub sale_id: String,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub staff_name: String,
    pub total: Money,
    /// `"2x Espresso, 1x Latte"`
    pub items: String,
}

/// One row per sale, in the order the sales are given.
pub fn sales_report(sales: &[Sale], products: &[Product], staff: &[StaffMember]) -> Vec<SalesReportRow> {
    let product_names = product_names(products);
    let staff_names: HashMap<&str, &str> = staff
        .iter()
        .map(|member| (member.id.as_str(), member.name.as_str()))
        .collect();

    sales
        .iter()
        .map(|sale| SalesReportRow {
            sale_id: sale.id.clone(),
            date: sale.created_at,
            staff_name: staff_names
                .get(sale.staff_id.as_str())
                .copied()
                .unwrap_or(UNKNOWN_LABEL)
                .to_string(),
            total: sale.total,
            items: sale
                .items
                .iter()
                .map(|item| {
                    let name = product_names
                        .get(item.product_id.as_str())
                        .copied()
                        .unwrap_or(UNKNOWN_LABEL);
                    format!("{}x {}", item.quantity, name)
                })
                .collect::<Vec<_>>()
                .join(", "),
        })
        .collect()
}

// =============================================================================
// Inventory Report
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InventoryReportRow {
    pub product_id: String,
    pub name: String,
    pub category: String,
    pub units_sold: i64,
    pub stock: i64,
    pub price: Money,
}

/// Units sold per current product, sorted by units sold (descending).
///
/// Products with equal sales keep their catalog order.
pub fn inventory_report(products: &[Product], sales: &[Sale]) -> Vec<InventoryReportRow> {
    let units = units_by_product(sales);

    let mut rows: Vec<InventoryReportRow> = products
        .iter()
        .map(|product| InventoryReportRow {
            product_id: product.id.clone(),
            name: product.name.clone(),
            category: product.category.clone(),
            units_sold: units.get(product.id.as_str()).copied().unwrap_or(0),
            stock: product.stock,
            price: product.price,
        })
        .collect();

    rows.sort_by(|a, b| b.units_sold.cmp(&a.units_sold));
    rows
}

// =============================================================================
// Commission Report
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CommissionReportRow {
    pub staff_id: String,
    pub name: String,
    pub commission_rate: Rate,
    pub total_sold: Money,
    /// `total_sold × commission_rate`, rounded half-up to the cent.
    pub commission: Money,
    pub sales_count: usize,
}

/// Commission owed to each staff member (or only `only_staff` when given).
///
/// ## Example
/// ```rust
/// use cafe_core::reports::commission_report;
/// use cafe_core::types::{Rate, StaffMember};
///
/// let staff = vec![StaffMember {
///     id: "staff-1".into(),
///     name: "Ana Silva".into(),
///     commission_rate: Rate::from_bps(500),
/// }];
/// let rows = commission_report(&staff, &[], None).unwrap();
/// assert_eq!(rows[0].sales_count, 0);
/// assert!(rows[0].commission.is_zero());
/// ```
pub fn commission_report(
    staff: &[StaffMember],
    sales: &[Sale],
    only_staff: Option<&str>,
) -> CoreResult<Vec<CommissionReportRow>> {
    staff
        .iter()
        .filter(|member| only_staff.map_or(true, |id| member.id == id))
        .map(|member| {
            let mut total_sold = Money::zero();
            let mut sales_count = 0;

            for sale in sales.iter().filter(|sale| sale.staff_id == member.id) {
                total_sold = total_sold
                    .checked_add(sale.total)
                    .ok_or_else(|| overflow(format!("total sold by {}", member.name)))?;
                sales_count += 1;
            }

            Ok(CommissionReportRow {
                staff_id: member.id.clone(),
                name: member.name.clone(),
                commission_rate: member.commission_rate,
                total_sold,
                commission: total_sold.apply_rate(member.commission_rate),
                sales_count,
            })
        })
        .collect()
}

// =============================================================================
// Dashboard
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DailyRevenue {
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub total: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DashboardSummary {
    pub todays_revenue: Money,
    pub occupied_tables: usize,
    /// Name of the best-selling product, or [`UNKNOWN_LABEL`].
    pub top_product: String,
    /// Oldest day first, ending with `today`.
    pub last_days: Vec<DailyRevenue>,
}

/// Builds the dashboard figures for the UTC calendar day `today`.
///
/// The caller supplies `today` so the computation stays clock-free.
pub fn dashboard_summary(
    sales: &[Sale],
    tables: &[CafeTable],
    products: &[Product],
    today: NaiveDate,
) -> CoreResult<DashboardSummary> {
    let mut last_days: Vec<DailyRevenue> = (0..DASHBOARD_DAYS as i64)
        .rev()
        .map(|offset| DailyRevenue {
            date: today - Duration::days(offset),
            total: Money::zero(),
        })
        .collect();

    for sale in sales {
        let day = sale.created_at.date_naive();
        if let Some(slot) = last_days.iter_mut().find(|slot| slot.date == day) {
            slot.total = slot
                .total
                .checked_add(sale.total)
                .ok_or_else(|| overflow(format!("revenue for {}", day)))?;
        }
    }

    let todays_revenue = last_days
        .last()
        .map(|slot| slot.total)
        .unwrap_or_default();

    let occupied_tables = tables
        .iter()
        .filter(|table| table.status == TableStatus::Occupied)
        .count();

    Ok(DashboardSummary {
        todays_revenue,
        occupied_tables,
        top_product: top_product(products, sales),
        last_days,
    })
}

/// Highest units sold wins; ties go to the smaller product id.
fn top_product(products: &[Product], sales: &[Sale]) -> String {
    let units = units_by_product(sales);
    let names = product_names(products);

    units
        .into_iter()
        .max_by(|(id_a, a), (id_b, b)| a.cmp(b).then_with(|| id_b.cmp(id_a)))
        .and_then(|(id, _)| names.get(id).copied())
        .unwrap_or(UNKNOWN_LABEL)
        .to_string()
}

// =============================================================================
// Helpers
// =============================================================================

fn product_names(products: &[Product]) -> HashMap<&str, &str> {
    products
        .iter()
        .map(|product| (product.id.as_str(), product.name.as_str()))
        .collect()
}

fn units_by_product(sales: &[Sale]) -> HashMap<&str, i64> {
    let mut units: HashMap<&str, i64> = HashMap::new();
    for item in sales.iter().flat_map(|sale| &sale.items) {
        *units.entry(item.product_id.as_str()).or_default() += item.quantity;
    }
    units
}

fn overflow(context: String) -> CoreError {
    CoreError::AmountOverflow { context }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OrderItem;
    use chrono::TimeZone;

    fn product(id: &str, name: &str, cents: i64, stock: i64) -> Product {
        let now = Utc::now();
        Product {
            id: id.to_string(),
            name: name.to_string(),
            category: "Bebidas Quentes".to_string(),
            price: Money::from_cents(cents),
            stock,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    fn staff(id: &str, name: &str, bps: u32) -> StaffMember {
        StaffMember {
            id: id.to_string(),
            name: name.to_string(),
            commission_rate: Rate::from_bps(bps),
        }
    }

    fn table(id: &str, status: TableStatus) -> CafeTable {
        CafeTable {
            id: id.to_string(),
            name: format!("Mesa {}", id),
            status,
            current_order_id: None,
            version: 0,
        }
    }

    fn sale(id: &str, staff_id: &str, day: u32, lines: &[(&str, i64, i64)]) -> Sale {
        let items: Vec<OrderItem> = lines
            .iter()
            .map(|(product_id, quantity, cents)| OrderItem {
                product_id: product_id.to_string(),
                quantity: *quantity,
                price_at_sale: Money::from_cents(*cents),
            })
            .collect();
        let total = crate::order::order_total(&items).unwrap();
        Sale {
            id: id.to_string(),
            table_id: "table-1".to_string(),
            staff_id: staff_id.to_string(),
            items,
            total,
            created_at: Utc.with_ymd_and_hms(2026, 10, day, 15, 0, 0).unwrap(),
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product("prod-1", "Espresso", 500, 100),
            product("prod-2", "Cappuccino", 850, 80),
            product("prod-3", "Latte", 900, 75),
        ]
    }

    #[test]
    fn test_sales_report_summarizes_items() {
        let sales = vec![sale("s1", "staff-1", 17, &[("prod-1", 2, 500), ("prod-3", 1, 900)])];
        let rows = sales_report(&sales, &catalog(), &[staff("staff-1", "Ana Silva", 500)]);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].staff_name, "Ana Silva");
        assert_eq!(rows[0].items, "2x Espresso, 1x Latte");
        assert_eq!(rows[0].total, Money::from_cents(1_900));
    }

    #[test]
    fn test_sales_report_unknown_references() {
        let sales = vec![sale("s1", "staff-gone", 17, &[("prod-gone", 1, 300)])];
        let rows = sales_report(&sales, &catalog(), &[]);

        assert_eq!(rows[0].staff_name, UNKNOWN_LABEL);
        assert_eq!(rows[0].items, "1x N/A");
    }

    #[test]
    fn test_inventory_report_sorted_by_units_sold() {
        let sales = vec![
            sale("s1", "staff-1", 16, &[("prod-2", 2, 850)]),
            sale("s2", "staff-1", 17, &[("prod-2", 3, 850), ("prod-3", 1, 900), ("prod-2", 1, 850)]),
        ];
        let rows = inventory_report(&catalog(), &sales);

        let order: Vec<(&str, i64)> = rows.iter().map(|r| (r.product_id.as_str(), r.units_sold)).collect();
        assert_eq!(order, vec![("prod-2", 6), ("prod-3", 1), ("prod-1", 0)]);
    }

    #[test]
    fn test_commission_report() {
        let team = vec![staff("staff-1", "Ana Silva", 500), staff("staff-3", "Maria Oliveira", 600)];
        let sales = vec![
            sale("s1", "staff-1", 17, &[("prod-2", 2, 850), ("prod-7", 3, 400)]),
            sale("s2", "staff-1", 17, &[("prod-1", 1, 500)]),
            sale("s3", "staff-3", 17, &[("prod-3", 1, 900)]),
        ];

        let rows = commission_report(&team, &sales, None).unwrap();
        assert_eq!(rows.len(), 2);

        // 34.00 × 5% = 1.70
        assert_eq!(rows[0].total_sold, Money::from_cents(3_400));
        assert_eq!(rows[0].commission, Money::from_cents(170));
        assert_eq!(rows[0].sales_count, 2);

        // 9.00 × 6% = 0.54
        assert_eq!(rows[1].commission, Money::from_cents(54));
    }

    #[test]
    fn test_commission_report_single_staff_and_rounding() {
        let team = vec![staff("staff-1", "Ana Silva", 500), staff("staff-2", "João Santos", 650)];
        let sales = vec![sale("s1", "staff-2", 17, &[("prod-1", 1, 7)])];

        let rows = commission_report(&team, &sales, Some("staff-2")).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "João Santos");
        // 0.07 × 6.5% = 0.00455 → 0.00
        assert_eq!(rows[0].commission, Money::zero());

        let sales = vec![sale("s2", "staff-2", 17, &[("prod-1", 1, 100)])];
        let rows = commission_report(&team, &sales, Some("staff-2")).unwrap();
        // 1.00 × 6.5% = 0.065 → 0.07
        assert_eq!(rows[0].commission, Money::from_cents(7));
    }

    #[test]
    fn test_dashboard_summary() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        let sales = vec![
            sale("s1", "staff-1", 17, &[("prod-2", 2, 850), ("prod-7", 3, 400)]),
            sale("s2", "staff-1", 15, &[("prod-1", 4, 500)]),
            sale("s3", "staff-1", 1, &[("prod-1", 10, 500)]),
        ];
        let tables = vec![
            table("table-1", TableStatus::Available),
            table("table-3", TableStatus::Occupied),
            table("table-6", TableStatus::Reserved),
        ];

        let summary = dashboard_summary(&sales, &tables, &catalog(), today).unwrap();

        assert_eq!(summary.todays_revenue, Money::from_cents(2_900));
        assert_eq!(summary.occupied_tables, 1);
        assert_eq!(summary.top_product, "Espresso");

        assert_eq!(summary.last_days.len(), DASHBOARD_DAYS);
        assert_eq!(summary.last_days[0].date, NaiveDate::from_ymd_opt(2026, 10, 11).unwrap());
        assert_eq!(summary.last_days[4].total, Money::from_cents(2_000));
        assert_eq!(summary.last_days[6].date, today);
    }

    #[test]
    fn test_dashboard_summary_without_sales() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        let summary = dashboard_summary(&[], &[], &catalog(), today).unwrap();

        assert!(summary.todays_revenue.is_zero());
        assert_eq!(summary.top_product, UNKNOWN_LABEL);
        assert!(summary.last_days.iter().all(|day| day.total.is_zero()));
    }
}
