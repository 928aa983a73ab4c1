use crate::error::Result;
use serde::Serialize;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

/// Markdown table of the first `max_rows` rows.
pub fn render_preview<T>(rows: &[T], max_rows: usize) -> String
where
    T: Tabled + Clone,
{
    if rows.is_empty() {
        return "(no rows)".to_string();
    }
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    Table::new(slice).with(Style::markdown()).to_string()
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    println!("{}\n", render_preview(rows, max_rows));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Kpi, ProjectCostRow};

    fn rows() -> Vec<ProjectCostRow> {
        vec![
            ProjectCostRow { project_code: "C30".into(), total_cost: 2000.0 },
            ProjectCostRow { project_code: "C25".into(), total_cost: 1500.5 },
        ]
    }

    #[test]
    fn csv_keeps_raw_numbers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("costs.csv");
        write_csv(&path, &rows()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "ProjectCode,TotalCost\nC30,2000.0\nC25,1500.5\n");
    }

    #[test]
    fn json_summary_is_keyed_by_metric() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        write_json(&path, &Kpi { project_count: 2, sales: 10.0, ..Kpi::default() }).unwrap();
        let v: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(v["project_count"], 2);
        assert_eq!(v["sales"], 10.0);
        assert_eq!(v["profit_ratio"], 0.0);
    }

    #[test]
    fn preview_formats_money_and_limits_rows() {
        let out = render_preview(&rows(), 1);
        assert!(out.contains("| C30"));
        assert!(out.contains("2.000"));
        assert!(!out.contains("C25"));
        assert_eq!(render_preview::<ProjectCostRow>(&[], 3), "(no rows)");
    }
}
