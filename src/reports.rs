use crate::metrics;
use crate::types::{
    CostBreakdownRow, CounterpartySalesRow, JoinedCostRow, Kpi, ProjectCostRow, ProjectOrderRow,
    ProjectRecord, SummaryStats,
};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Summed amounts of one group.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub order: f64,
    pub sales: f64,
    pub cost: f64,
    pub collection: f64,
}

impl Totals {
    fn add(&mut self, other: Totals) {
        self.order += other.order;
        self.sales += other.sales;
        self.cost += other.cost;
        self.collection += other.collection;
    }

    fn of_project(r: &ProjectRecord) -> Totals {
        Totals {
            order: r.order_amount,
            sales: r.sales_amount,
            cost: r.cost_amount,
            collection: r.collection_amount,
        }
    }
}

/// Sum amounts per key. Groups come back in the order their key was first
/// seen.
pub fn group_totals<T, K>(rows: &[&T], key: impl Fn(&T) -> K, amounts: impl Fn(&T) -> Totals) -> Vec<(K, Totals)>
where
    K: Eq + Hash + Clone,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Totals)> = Vec::new();
    for r in rows {
        let k = key(*r);
        let slot = *index.entry(k.clone()).or_insert_with(|| {
            groups.push((k, Totals::default()));
            groups.len() - 1
        });
        groups[slot].1.add(amounts(*r));
    }
    groups
}

/// Descending by one metric. The sort is stable, so ties keep first-seen order.
pub fn rank_desc<K>(groups: &mut [(K, Totals)], metric: impl Fn(&Totals) -> f64) {
    groups.sort_by(|a, b| metric(&b.1).partial_cmp(&metric(&a.1)).unwrap_or(Ordering::Equal));
}

pub fn project_order_ranking(data: &[&ProjectRecord]) -> Vec<ProjectOrderRow> {
    let mut groups = group_totals(
        data,
        |r| (r.project_code.clone(), r.counterparty.clone()),
        Totals::of_project,
    );
    rank_desc(&mut groups, |t| t.order);
    groups
        .into_iter()
        .map(|((project_code, counterparty), t)| ProjectOrderRow {
            project_code,
            counterparty,
            total_order: t.order,
            total_sales: t.sales,
            total_cost: t.cost,
            total_collection: t.collection,
        })
        .collect()
}

pub fn counterparty_sales_ranking(data: &[&ProjectRecord]) -> Vec<CounterpartySalesRow> {
    let mut groups = group_totals(data, |r| r.counterparty.clone(), Totals::of_project);
    rank_desc(&mut groups, |t| t.sales);
    groups
        .into_iter()
        .map(|(counterparty, t)| CounterpartySalesRow {
            counterparty,
            total_sales: t.sales,
        })
        .collect()
}

pub fn project_cost_ranking(costs: &[&JoinedCostRow]) -> Vec<ProjectCostRow> {
    let mut groups = group_totals(
        costs,
        |r| r.cost.project_code.clone(),
        |r| Totals {
            cost: r.cost.cost_amount,
            ..Totals::default()
        },
    );
    rank_desc(&mut groups, |t| t.cost);
    groups
        .into_iter()
        .map(|(project_code, t)| ProjectCostRow {
            project_code,
            total_cost: t.cost,
        })
        .collect()
}

/// Cost lines of one project in sheet order.
pub fn cost_breakdown(costs: &[&JoinedCostRow], project_code: &str) -> Vec<CostBreakdownRow> {
    costs
        .iter()
        .filter(|r| r.cost.project_code == project_code)
        .map(|r| CostBreakdownRow {
            equipment_name: r.cost.equipment_name.clone(),
            cost_type: r.cost.cost_type.clone(),
            stock_name: r.cost.stock_name.clone(),
            cost_amount: r.cost.cost_amount,
        })
        .collect()
}

/// Totals over the whole set; profit ratio is taken from the sums.
pub fn compute_kpi(data: &[&ProjectRecord]) -> Kpi {
    let mut totals = Totals::default();
    for r in data {
        totals.add(Totals::of_project(r));
    }
    let projects: HashSet<&str> = data
        .iter()
        .map(|r| r.project_code.as_str())
        .filter(|c| !c.is_empty())
        .collect();
    let (profit, profit_ratio) = metrics::derive(totals.sales, totals.cost);
    Kpi {
        project_count: projects.len(),
        order: totals.order,
        sales: totals.sales,
        cost: totals.cost,
        collection: totals.collection,
        profit,
        profit_ratio,
    }
}

/// The last `n` rows in sheet order that name a company.
pub fn recent_projects<'a>(data: &[&'a ProjectRecord], n: usize) -> Vec<&'a ProjectRecord> {
    let with_company: Vec<&ProjectRecord> = data.iter().copied().filter(|r| r.company.is_some()).collect();
    let skip = with_company.len().saturating_sub(n);
    with_company.into_iter().skip(skip).collect()
}

pub fn generate_summary(projects: &[&ProjectRecord], cost_kpi_projects: &[&ProjectRecord], costs: &[&JoinedCostRow]) -> SummaryStats {
    SummaryStats {
        projects: compute_kpi(projects),
        costs: compute_kpi(cost_kpi_projects),
        cost_rows: costs.len(),
        total_cost_detail: costs.iter().map(|r| r.cost.cost_amount).sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CostRow;

    fn record(code: &str, counterparty: &str, company: Option<&str>, order: f64, sales: f64, cost: f64) -> ProjectRecord {
        let (profit, profit_ratio) = metrics::derive(sales, cost);
        ProjectRecord {
            project_code: code.to_string(),
            counterparty: Some(counterparty.to_string()),
            company: company.map(str::to_string),
            country: None,
            order_amount: order,
            sales_amount: sales,
            cost_amount: cost,
            collection_amount: order / 2.0,
            profit,
            profit_ratio,
            delivery_date: None,
            description: String::new(),
        }
    }

    fn cost(code: &str, amount: f64) -> JoinedCostRow {
        JoinedCostRow {
            cost: CostRow {
                project_code: code.to_string(),
                cost_type: Some("Material".to_string()),
                stock_name: Some("Steel".to_string()),
                equipment_name: Some(format!("{}-eq", code)),
                cost_amount: amount,
            },
            company: None,
            counterparty: None,
        }
    }

    #[test]
    fn costs_grouped_by_project_and_ranked() {
        let rows = vec![cost("C25", 1000.5), cost("C25", 500.0), cost("C30", 2000.0)];
        let refs: Vec<&JoinedCostRow> = rows.iter().collect();
        let ranked = project_cost_ranking(&refs);
        let codes: Vec<&str> = ranked.iter().map(|r| r.project_code.as_str()).collect();
        assert_eq!(codes, vec!["C30", "C25"]);
        assert_eq!(ranked[0].total_cost, 2000.0);
        assert_eq!(ranked[1].total_cost, 1500.5);
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let rows = vec![cost("B", 10.0), cost("A", 10.0), cost("C", 20.0)];
        let refs: Vec<&JoinedCostRow> = rows.iter().collect();
        let codes: Vec<String> = project_cost_ranking(&refs).into_iter().map(|r| r.project_code).collect();
        assert_eq!(codes, vec!["C", "B", "A"]);
    }

    #[test]
    fn order_ranking_groups_by_project_and_counterparty() {
        let rows = vec![
            record("C25", "Acme", Some("HUM"), 100.0, 80.0, 60.0),
            record("C25", "Acme", Some("HUM"), 50.0, 20.0, 10.0),
            record("C25", "Beta", Some("HUM"), 10.0, 5.0, 5.0),
            record("C30", "Acme", Some("HUM"), 400.0, 300.0, 200.0),
        ];
        let refs: Vec<&ProjectRecord> = rows.iter().collect();
        let ranked = project_order_ranking(&refs);
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].project_code, "C30");
        assert_eq!(ranked[1].project_code, "C25");
        assert_eq!(ranked[1].counterparty.as_deref(), Some("Acme"));
        assert_eq!(ranked[1].total_order, 150.0);
        assert_eq!(ranked[1].total_sales, 100.0);
        assert_eq!(ranked[1].total_collection, 75.0);
        assert_eq!(ranked[2].counterparty.as_deref(), Some("Beta"));
    }

    #[test]
    fn counterparty_sales_sorted_descending() {
        let rows = vec![
            record("C1", "Acme", None, 0.0, 10.0, 0.0),
            record("C2", "Beta", None, 0.0, 30.0, 0.0),
            record("C3", "Acme", None, 0.0, 15.0, 0.0),
        ];
        let refs: Vec<&ProjectRecord> = rows.iter().collect();
        let ranked = counterparty_sales_ranking(&refs);
        assert_eq!(ranked[0].counterparty.as_deref(), Some("Beta"));
        assert_eq!(ranked[1].total_sales, 25.0);
    }

    #[test]
    fn kpi_ratio_is_sum_then_divide() {
        let rows = vec![
            record("C1", "A", None, 0.0, 100.0, 50.0),
            record("C2", "A", None, 0.0, 300.0, 300.0),
            record("C2", "A", None, 0.0, 0.0, 100.0),
        ];
        let refs: Vec<&ProjectRecord> = rows.iter().collect();
        let kpi = compute_kpi(&refs);
        assert_eq!(kpi.project_count, 2);
        assert_eq!(kpi.sales, 400.0);
        assert_eq!(kpi.cost, 450.0);
        assert_eq!(kpi.profit, -50.0);
        assert_eq!(kpi.profit_ratio, -12.5);
        // Averaging row ratios would give (50 + 0 + 0) / 3.
        let averaged: f64 = rows.iter().map(|r| r.profit_ratio).sum::<f64>() / 3.0;
        assert_ne!(kpi.profit_ratio, averaged);
    }

    #[test]
    fn empty_set_kpi_is_zero() {
        assert_eq!(compute_kpi(&[]), Kpi::default());
    }

    #[test]
    fn breakdown_lists_one_project() {
        let rows = vec![cost("C25", 1.0), cost("C30", 2.0), cost("C25", 3.0)];
        let refs: Vec<&JoinedCostRow> = rows.iter().collect();
        let lines = cost_breakdown(&refs, "C25");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].cost_amount, 3.0);
        assert_eq!(lines[0].equipment_name.as_deref(), Some("C25-eq"));
    }

    #[test]
    fn recent_projects_need_a_company() {
        let rows = vec![
            record("C1", "A", Some("HUM"), 0.0, 0.0, 0.0),
            record("C2", "A", Some("HUM"), 0.0, 0.0, 0.0),
            record("C3", "A", None, 0.0, 0.0, 0.0),
            record("C4", "A", Some("HUM"), 0.0, 0.0, 0.0),
            record("C5", "A", Some("HUM"), 0.0, 0.0, 0.0),
            record("C6", "A", None, 0.0, 0.0, 0.0),
        ];
        let refs: Vec<&ProjectRecord> = rows.iter().collect();
        let codes: Vec<&str> = recent_projects(&refs, 3).iter().map(|r| r.project_code.as_str()).collect();
        assert_eq!(codes, vec!["C2", "C4", "C5"]);
    }
}
