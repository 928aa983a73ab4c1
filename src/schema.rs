// Header names resolved to column positions once per load.
use crate::config::{CostSheetConfig, ProjectSheetConfig};
use crate::error::{ReportError, Result};
use crate::workbook::Table;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectColumns {
    pub project_code: usize,
    pub company: usize,
    pub counterparty: usize,
    pub country: usize,
    pub order_amount: usize,
    pub sales_amount: usize,
    pub cost_amount: usize,
    pub collection_amount: usize,
    pub delivery_date: Option<usize>,
    pub description: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostColumns {
    pub project_code: usize,
    pub cost_type: usize,
    pub stock_name: usize,
    pub equipment_name: usize,
    pub cost_amount: usize,
}

/// Collects every missing required column before failing, so one error
/// names them all.
struct Resolver<'a> {
    table: &'a Table,
    missing: Vec<String>,
}

impl<'a> Resolver<'a> {
    fn new(table: &'a Table) -> Self {
        Resolver { table, missing: Vec::new() }
    }

    fn required(&mut self, name: &str) -> usize {
        match self.table.column_index(name) {
            Some(i) => i,
            None => {
                self.missing.push(name.trim().to_string());
                0
            }
        }
    }

    fn optional(&self, name: &str) -> Option<usize> {
        self.table.column_index(name)
    }

    fn finish<T>(self, value: T) -> Result<T> {
        if self.missing.is_empty() {
            Ok(value)
        } else {
            Err(ReportError::MissingColumns {
                sheet: self.table.sheet.clone(),
                columns: self.missing,
            })
        }
    }
}

impl ProjectColumns {
    pub fn resolve(table: &Table, cfg: &ProjectSheetConfig) -> Result<Self> {
        let mut r = Resolver::new(table);
        let cols = ProjectColumns {
            project_code: r.required(&cfg.project_code),
            company: r.required(&cfg.company),
            counterparty: r.required(&cfg.counterparty),
            country: r.required(&cfg.country),
            order_amount: r.required(&cfg.order_amount),
            sales_amount: r.required(&cfg.sales_amount),
            cost_amount: r.required(&cfg.cost_amount),
            collection_amount: r.required(&cfg.collection_amount),
            delivery_date: r.optional(&cfg.delivery_date),
            description: r.optional(&cfg.description),
        };
        r.finish(cols)
    }
}

impl CostColumns {
    pub fn resolve(table: &Table, cfg: &CostSheetConfig) -> Result<Self> {
        let mut r = Resolver::new(table);
        let cols = CostColumns {
            project_code: r.required(&cfg.project_code),
            cost_type: r.required(&cfg.cost_type),
            stock_name: r.required(&cfg.stock_name),
            equipment_name: r.required(&cfg.equipment_name),
            cost_amount: r.required(&cfg.cost_amount),
        };
        r.finish(cols)
    }
}
