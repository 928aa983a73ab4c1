// Attaching company/counterparty from the project sheet to cost rows.
use crate::error::{ReportError, Result};
use crate::types::{CostRow, DimensionRow, JoinedCostRow};
use std::collections::HashMap;
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JoinReport {
    pub dimension_rows: usize,
    pub duplicates_dropped: usize,
    pub missing_codes_dropped: usize,
    pub unmatched_detail_rows: usize,
}

/// One row per project code: rows without a code are dropped, the rest are
/// sorted by code and the first row of each code is kept.
pub fn dedup_dimensions(rows: Vec<DimensionRow>) -> (Vec<DimensionRow>, JoinReport) {
    let before = rows.len();
    let mut rows: Vec<DimensionRow> = rows.into_iter().filter(|r| r.project_code.is_some()).collect();
    let missing_codes_dropped = before - rows.len();

    // Stable, so equal codes keep their sheet order.
    rows.sort_by(|a, b| a.project_code.cmp(&b.project_code));
    let with_codes = rows.len();
    rows.dedup_by(|later, first| later.project_code == first.project_code);

    let report = JoinReport {
        dimension_rows: rows.len(),
        duplicates_dropped: with_codes - rows.len(),
        missing_codes_dropped,
        unmatched_detail_rows: 0,
    };
    (rows, report)
}

/// Left join of detail rows onto dimension rows. Every detail row survives;
/// a project code appearing on more than one dimension row is an error.
pub fn left_join(details: Vec<CostRow>, dims: &[DimensionRow]) -> Result<(Vec<JoinedCostRow>, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for d in dims {
        if let Some(code) = d.project_code.as_deref() {
            *counts.entry(code).or_insert(0) += 1;
        }
    }
    if let Some((code, rows)) = counts.iter().find(|(_, n)| **n > 1) {
        return Err(ReportError::JoinCardinality {
            project_code: code.to_string(),
            rows: *rows,
        });
    }

    let by_code: HashMap<&str, &DimensionRow> = dims
        .iter()
        .filter_map(|d| d.project_code.as_deref().map(|c| (c, d)))
        .collect();

    let mut unmatched = 0usize;
    let joined = details
        .into_iter()
        .map(|cost| match by_code.get(cost.project_code.as_str()) {
            Some(dim) => JoinedCostRow {
                company: dim.company.clone(),
                counterparty: dim.counterparty.clone(),
                cost,
            },
            None => {
                unmatched += 1;
                JoinedCostRow {
                    cost,
                    company: None,
                    counterparty: None,
                }
            }
        })
        .collect();
    Ok((joined, unmatched))
}

/// Deduplicate the dimension rows, then left-join the cost rows onto them.
pub fn join_costs(details: Vec<CostRow>, dims: Vec<DimensionRow>) -> Result<(Vec<JoinedCostRow>, JoinReport)> {
    let (dims, mut report) = dedup_dimensions(dims);
    if report.duplicates_dropped > 0 {
        warn!(
            dropped = report.duplicates_dropped,
            "duplicate project codes in dimension sheet, kept first by code order"
        );
    }
    let (joined, unmatched) = left_join(details, &dims)?;
    if unmatched > 0 {
        warn!(rows = unmatched, "cost rows without a matching project");
    }
    report.unmatched_detail_rows = unmatched;
    Ok((joined, report))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dim(code: Option<&str>, company: &str) -> DimensionRow {
        DimensionRow {
            project_code: code.map(str::to_string),
            company: Some(company.to_string()),
            counterparty: Some(format!("{} Ltd", company)),
        }
    }

    fn cost(code: &str, amount: f64) -> CostRow {
        CostRow {
            project_code: code.to_string(),
            cost_type: Some("Material".to_string()),
            stock_name: None,
            equipment_name: None,
            cost_amount: amount,
        }
    }

    #[test]
    fn dedup_keeps_first_row_in_code_order() {
        let rows = vec![dim(Some("C30"), "X"), dim(Some("C25"), "A"), dim(Some("C25"), "B")];
        let (out, report) = dedup_dimensions(rows);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].project_code.as_deref(), Some("C25"));
        assert_eq!(out[0].company.as_deref(), Some("A"));
        assert_eq!(out[1].project_code.as_deref(), Some("C30"));
        assert_eq!(report.duplicates_dropped, 1);
    }

    #[test]
    fn dedup_drops_rows_without_code() {
        let (out, report) = dedup_dimensions(vec![dim(None, "A"), dim(Some("C1"), "B")]);
        assert_eq!(out.len(), 1);
        assert_eq!(report.missing_codes_dropped, 1);
    }

    #[test]
    fn many_details_to_one_dimension() {
        let details = vec![cost("C25", 1.0), cost("C25", 2.0), cost("C25", 3.0)];
        let (joined, report) = join_costs(details, vec![dim(Some("C25"), "A")]).unwrap();
        assert_eq!(joined.len(), 3);
        assert!(joined.iter().all(|j| j.company.as_deref() == Some("A")));
        assert!(joined.iter().all(|j| j.counterparty.as_deref() == Some("A Ltd")));
        assert_eq!(report.unmatched_detail_rows, 0);
    }

    #[test]
    fn unmatched_details_are_kept_with_nulls() {
        let details = vec![cost("C25", 1.0), cost("C99", 2.0)];
        let (joined, report) = join_costs(details, vec![dim(Some("C25"), "A")]).unwrap();
        assert_eq!(joined.len(), 2);
        assert_eq!(joined[1].cost.project_code, "C99");
        assert_eq!(joined[1].company, None);
        assert_eq!(joined[1].counterparty, None);
        assert_eq!(report.unmatched_detail_rows, 1);
    }

    #[test]
    fn duplicate_dimension_keys_fail_the_join() {
        let dims = vec![dim(Some("C25"), "A"), dim(Some("C25"), "B")];
        let err = left_join(vec![cost("C25", 1.0)], &dims).unwrap_err();
        match err {
            ReportError::JoinCardinality { project_code, rows } => {
                assert_eq!(project_code, "C25");
                assert_eq!(rows, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
