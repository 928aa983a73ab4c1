use crate::config::{CostSheetConfig, ProjectSheetConfig, ReportConfig};
use crate::error::{ReportError, Result};
use crate::join::{join_costs, JoinReport};
use crate::metrics;
use crate::schema::{CostColumns, ProjectColumns};
use crate::types::{CostRow, DimensionRow, JoinedCostRow, ProjectRecord, RawValue};
use crate::util::{clean_text, normalize_column, parse_date_safe};
use crate::workbook::{read_sheets, Table};
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub project_rows: usize,
    pub cost_rows: usize,
    /// Non-empty amount cells that could not be read and count as zero.
    pub zeroed_amounts: usize,
    pub join: JoinReport,
}

/// Everything the reports need, built fresh on every load.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub projects: Vec<ProjectRecord>,
    pub costs: Vec<JoinedCostRow>,
    pub report: LoadReport,
}

static MISSING: RawValue = RawValue::Missing;

fn cell(row: &[RawValue], idx: usize) -> &RawValue {
    row.get(idx).unwrap_or(&MISSING)
}

pub fn build_projects(table: &Table, cfg: &ProjectSheetConfig) -> Result<(Vec<ProjectRecord>, usize)> {
    let cols = ProjectColumns::resolve(table, cfg)?;

    let order = normalize_column(&table.column(cols.order_amount), cfg.number_mode);
    let sales = normalize_column(&table.column(cols.sales_amount), cfg.number_mode);
    let cost = normalize_column(&table.column(cols.cost_amount), cfg.number_mode);
    let collection = normalize_column(&table.column(cols.collection_amount), cfg.number_mode);
    let zeroed = order.zeroed + sales.zeroed + cost.zeroed + collection.zeroed;

    let records = table
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let sales_amount = sales.values[i];
            let cost_amount = cost.values[i];
            let (profit, profit_ratio) = metrics::derive(sales_amount, cost_amount);
            ProjectRecord {
                project_code: clean_text(cell(row, cols.project_code)).unwrap_or_default(),
                counterparty: clean_text(cell(row, cols.counterparty)),
                company: clean_text(cell(row, cols.company)),
                country: clean_text(cell(row, cols.country)),
                order_amount: order.values[i],
                sales_amount,
                cost_amount,
                collection_amount: collection.values[i],
                profit,
                profit_ratio,
                delivery_date: cols.delivery_date.and_then(|c| parse_date_safe(cell(row, c))),
                description: cols
                    .description
                    .and_then(|c| clean_text(cell(row, c)))
                    .unwrap_or_default(),
            }
        })
        .collect();
    Ok((records, zeroed))
}

pub fn build_costs(table: &Table, cfg: &CostSheetConfig) -> Result<(Vec<CostRow>, usize)> {
    let cols = CostColumns::resolve(table, cfg)?;
    let amounts = normalize_column(&table.column(cols.cost_amount), cfg.number_mode);

    let rows = table
        .rows
        .iter()
        .zip(amounts.values)
        .map(|(row, cost_amount)| CostRow {
            project_code: clean_text(cell(row, cols.project_code)).unwrap_or_default(),
            cost_type: clean_text(cell(row, cols.cost_type)),
            stock_name: clean_text(cell(row, cols.stock_name)),
            equipment_name: clean_text(cell(row, cols.equipment_name)),
            cost_amount,
        })
        .collect();
    Ok((rows, amounts.zeroed))
}

/// The project sheet doubles as the dimension table for cost rows.
pub fn dimension_rows(projects: &[ProjectRecord]) -> Vec<DimensionRow> {
    projects
        .iter()
        .map(|p| DimensionRow {
            project_code: Some(p.project_code.clone()).filter(|c| !c.is_empty()),
            company: p.company.clone(),
            counterparty: p.counterparty.clone(),
        })
        .collect()
}

/// Build the dataset from already-read sheets. Both sheets are validated
/// before any rows are joined.
pub fn assemble(project_table: &Table, cost_table: &Table, cfg: &ReportConfig) -> Result<Dataset> {
    let (projects, zeroed_projects) = build_projects(project_table, &cfg.project_sheet)?;
    let (cost_rows, zeroed_costs) = build_costs(cost_table, &cfg.cost_sheet)?;
    let cost_count = cost_rows.len();

    let (costs, join) = join_costs(cost_rows, dimension_rows(&projects))?;

    let report = LoadReport {
        project_rows: projects.len(),
        cost_rows: cost_count,
        zeroed_amounts: zeroed_projects + zeroed_costs,
        join,
    };
    if report.zeroed_amounts > 0 {
        warn!(values = report.zeroed_amounts, "unreadable amounts counted as zero");
    }
    Ok(Dataset { projects, costs, report })
}

pub fn load_dataset(cfg: &ReportConfig) -> Result<Dataset> {
    info!(path = %cfg.workbook_path.display(), "loading workbook");
    let mut tables = read_sheets(
        &cfg.workbook_path,
        &[cfg.project_sheet.sheet.as_str(), cfg.cost_sheet.sheet.as_str()],
    )?
    .into_iter();
    let (project_table, cost_table) = match (tables.next(), tables.next()) {
        (Some(p), Some(c)) => (p, c),
        _ => return Err(ReportError::EmptySheet(cfg.cost_sheet.sheet.clone())),
    };

    let dataset = assemble(&project_table, &cost_table, cfg)?;
    info!(
        projects = dataset.report.project_rows,
        cost_rows = dataset.report.cost_rows,
        "workbook loaded"
    );
    Ok(dataset)
}
