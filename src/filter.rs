// Row selection ahead of aggregation. The reports never filter on their own.
use crate::types::{JoinedCostRow, ProjectRecord};
use serde::Deserialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Company,
    Counterparty,
    Country,
    ProjectCode,
    CostType,
}

/// Rows that can be filtered. `FIELDS` lists the columns a row type carries;
/// predicates on other columns do not apply to it.
pub trait Filterable {
    const FIELDS: &'static [Field];
    fn value(&self, field: Field) -> Option<&str>;
}

impl Filterable for ProjectRecord {
    const FIELDS: &'static [Field] = &[Field::Company, Field::Counterparty, Field::Country, Field::ProjectCode];

    fn value(&self, field: Field) -> Option<&str> {
        match field {
            Field::Company => self.company.as_deref(),
            Field::Counterparty => self.counterparty.as_deref(),
            Field::Country => self.country.as_deref(),
            Field::ProjectCode => Some(self.project_code.as_str()),
            Field::CostType => None,
        }
    }
}

impl Filterable for JoinedCostRow {
    const FIELDS: &'static [Field] = &[Field::Company, Field::Counterparty, Field::ProjectCode, Field::CostType];

    fn value(&self, field: Field) -> Option<&str> {
        match field {
            Field::Company => self.company.as_deref(),
            Field::Counterparty => self.counterparty.as_deref(),
            Field::ProjectCode => Some(self.cost.project_code.as_str()),
            Field::CostType => self.cost.cost_type.as_deref(),
            Field::Country => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RecordFilter {
    pub company: Option<String>,
    pub counterparty: Option<String>,
    pub country: Option<String>,
    pub project_code: Option<String>,
    pub cost_type: Option<String>,
    /// Case-insensitive substring of the project code.
    pub project_search: Option<String>,
}

impl RecordFilter {
    fn equalities(&self) -> [(Field, Option<&str>); 5] {
        [
            (Field::Company, self.company.as_deref()),
            (Field::Counterparty, self.counterparty.as_deref()),
            (Field::Country, self.country.as_deref()),
            (Field::ProjectCode, self.project_code.as_deref()),
            (Field::CostType, self.cost_type.as_deref()),
        ]
    }

    pub fn matches<T: Filterable>(&self, row: &T) -> bool {
        let equal = self
            .equalities()
            .into_iter()
            .filter(|(field, _)| T::FIELDS.contains(field))
            .all(|(field, wanted)| match wanted {
                Some(w) => row.value(field) == Some(w),
                None => true,
            });
        if !equal {
            return false;
        }
        match self.project_search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => row
                .value(Field::ProjectCode)
                .map(|code| code.to_lowercase().contains(&needle.to_lowercase()))
                .unwrap_or(false),
            _ => true,
        }
    }

    pub fn apply<'a, T: Filterable>(&self, rows: &'a [T]) -> Vec<&'a T> {
        rows.iter().filter(|r| self.matches(*r)).collect()
    }

    /// The filter used for KPIs on the project sheet from the cost view:
    /// the code search and cost type only narrow cost rows.
    pub fn for_cost_kpi(&self) -> RecordFilter {
        RecordFilter {
            company: self.company.clone(),
            counterparty: self.counterparty.clone(),
            project_code: self.project_code.clone(),
            ..RecordFilter::default()
        }
    }
}

/// Sorted distinct non-empty values of one field, for option lists.
pub fn distinct_values<T: Filterable>(rows: &[&T], field: Field) -> Vec<String> {
    rows.iter()
        .filter_map(|r| r.value(field))
        .filter(|v| !v.is_empty())
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
