use crate::util::{format_money, format_ratio};
use chrono::NaiveDate;
use serde::Serialize;
use tabled::Tabled;

/// A single cell as it came out of the workbook.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Number(f64),
    Text(String),
    Date(NaiveDate),
    Missing,
}

/// A row of the project sheet after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct ProjectRecord {
    #[serde(rename = "ProjectCode")]
    #[tabled(rename = "ProjectCode")]
    pub project_code: String,
    #[serde(rename = "Counterparty")]
    #[tabled(rename = "Counterparty", display_with = "display_opt")]
    pub counterparty: Option<String>,
    #[serde(rename = "Company")]
    #[tabled(rename = "Company", display_with = "display_opt")]
    pub company: Option<String>,
    #[serde(rename = "Country")]
    #[tabled(rename = "Country", display_with = "display_opt")]
    pub country: Option<String>,
    #[serde(rename = "OrderAmount")]
    #[tabled(rename = "Order", display_with = "display_money")]
    pub order_amount: f64,
    #[serde(rename = "SalesAmount")]
    #[tabled(rename = "Sales", display_with = "display_money")]
    pub sales_amount: f64,
    #[serde(rename = "CostAmount")]
    #[tabled(rename = "Cost", display_with = "display_money")]
    pub cost_amount: f64,
    #[serde(rename = "CollectionAmount")]
    #[tabled(rename = "Collection", display_with = "display_money")]
    pub collection_amount: f64,
    #[serde(rename = "Profit")]
    #[tabled(rename = "Profit", display_with = "display_money")]
    pub profit: f64,
    #[serde(rename = "ProfitRatio")]
    #[tabled(rename = "ProfitRatio", display_with = "display_ratio")]
    pub profit_ratio: f64,
    #[serde(rename = "DeliveryDate")]
    #[tabled(rename = "DeliveryDate", display_with = "display_date")]
    pub delivery_date: Option<NaiveDate>,
    #[serde(rename = "Description")]
    #[tabled(skip)]
    pub description: String,
}

/// One row of the cost-detail sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct CostRow {
    pub project_code: String,
    pub cost_type: Option<String>,
    pub stock_name: Option<String>,
    pub equipment_name: Option<String>,
    pub cost_amount: f64,
}

/// One row per project after deduplication.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionRow {
    pub project_code: Option<String>,
    pub company: Option<String>,
    pub counterparty: Option<String>,
}

/// A cost row carrying its project's company and counterparty, if known.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedCostRow {
    pub cost: CostRow,
    pub company: Option<String>,
    pub counterparty: Option<String>,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct ProjectOrderRow {
    #[serde(rename = "ProjectCode")]
    #[tabled(rename = "ProjectCode")]
    pub project_code: String,
    #[serde(rename = "Counterparty")]
    #[tabled(rename = "Counterparty", display_with = "display_opt")]
    pub counterparty: Option<String>,
    #[serde(rename = "TotalOrder")]
    #[tabled(rename = "TotalOrder", display_with = "display_money")]
    pub total_order: f64,
    #[serde(rename = "TotalSales")]
    #[tabled(rename = "TotalSales", display_with = "display_money")]
    pub total_sales: f64,
    #[serde(rename = "TotalCost")]
    #[tabled(rename = "TotalCost", display_with = "display_money")]
    pub total_cost: f64,
    #[serde(rename = "TotalCollection")]
    #[tabled(rename = "TotalCollection", display_with = "display_money")]
    pub total_collection: f64,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct CounterpartySalesRow {
    #[serde(rename = "Counterparty")]
    #[tabled(rename = "Counterparty", display_with = "display_opt")]
    pub counterparty: Option<String>,
    #[serde(rename = "TotalSales")]
    #[tabled(rename = "TotalSales", display_with = "display_money")]
    pub total_sales: f64,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct ProjectCostRow {
    #[serde(rename = "ProjectCode")]
    #[tabled(rename = "ProjectCode")]
    pub project_code: String,
    #[serde(rename = "TotalCost")]
    #[tabled(rename = "TotalCost", display_with = "display_money")]
    pub total_cost: f64,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct CostBreakdownRow {
    #[serde(rename = "Equipment")]
    #[tabled(rename = "Equipment", display_with = "display_opt")]
    pub equipment_name: Option<String>,
    #[serde(rename = "CostType")]
    #[tabled(rename = "CostType", display_with = "display_opt")]
    pub cost_type: Option<String>,
    #[serde(rename = "StockName")]
    #[tabled(rename = "StockName", display_with = "display_opt")]
    pub stock_name: Option<String>,
    #[serde(rename = "Cost")]
    #[tabled(rename = "Cost", display_with = "display_money")]
    pub cost_amount: f64,
}

/// Totals and ratios over a whole (filtered) record set.
#[derive(Debug, Serialize, Clone, PartialEq, Default)]
pub struct Kpi {
    pub project_count: usize,
    pub order: f64,
    pub sales: f64,
    pub cost: f64,
    pub collection: f64,
    pub profit: f64,
    pub profit_ratio: f64,
}

#[derive(Debug, Serialize)]
pub struct SummaryStats {
    pub projects: Kpi,
    pub costs: Kpi,
    pub cost_rows: usize,
    pub total_cost_detail: f64,
}

fn display_opt(v: &Option<String>) -> String {
    v.clone().unwrap_or_default()
}

fn display_money(v: &f64) -> String {
    format_money(*v)
}

fn display_ratio(v: &f64) -> String {
    format_ratio(*v)
}

fn display_date(v: &Option<NaiveDate>) -> String {
    v.map(|d| d.format("%d.%m.%Y").to_string()).unwrap_or_default()
}
