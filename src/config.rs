// Report settings, read from a JSON file or falling back to the layout of
// the finance workbook the reports were built for.
use crate::error::{ReportError, Result};
use crate::filter::RecordFilter;
use crate::util::NumberMode;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "report_config.json";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ReportConfig {
    pub workbook_path: PathBuf,
    pub output_dir: PathBuf,
    pub preview_rows: usize,
    pub project_sheet: ProjectSheetConfig,
    pub cost_sheet: CostSheetConfig,
    pub filter: RecordFilter,
    /// Project shown in the cost breakdown; the top cost project when unset.
    pub detail_project: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ProjectSheetConfig {
    pub sheet: String,
    pub number_mode: NumberMode,
    pub project_code: String,
    pub company: String,
    pub counterparty: String,
    pub country: String,
    pub order_amount: String,
    pub sales_amount: String,
    pub cost_amount: String,
    pub collection_amount: String,
    pub delivery_date: String,
    pub description: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CostSheetConfig {
    pub sheet: String,
    pub number_mode: NumberMode,
    pub project_code: String,
    pub cost_type: String,
    pub stock_name: String,
    pub equipment_name: String,
    pub cost_amount: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            workbook_path: PathBuf::from("data/HUM_DATA2.xlsx"),
            output_dir: PathBuf::from("."),
            preview_rows: 5,
            project_sheet: ProjectSheetConfig::default(),
            cost_sheet: CostSheetConfig::default(),
            filter: RecordFilter::default(),
            detail_project: None,
        }
    }
}

impl Default for ProjectSheetConfig {
    fn default() -> Self {
        ProjectSheetConfig {
            sheet: "DIM_PROJELER1".to_string(),
            number_mode: NumberMode::SwapOnly,
            project_code: "ProjeKodu".to_string(),
            company: "ŞİRKET".to_string(),
            counterparty: "CARİ İSİM".to_string(),
            country: "ÜLKE ADI".to_string(),
            order_amount: "PROJE SİPARİŞ EURO TUTARLARI".to_string(),
            sales_amount: "PROJE SATIŞ EURO TUTARLARI".to_string(),
            cost_amount: "PROJE MALİYET EURO TUTARLARI".to_string(),
            collection_amount: "PROJELERDE GELEN EURO ÖDEMELERİ TUTARI".to_string(),
            delivery_date: "SİPARİŞ TESLİM TARİHİ".to_string(),
            description: "PROJE AÇIKLAMA".to_string(),
        }
    }
}

impl Default for CostSheetConfig {
    fn default() -> Self {
        CostSheetConfig {
            sheet: "ARPV_PROJE_MALIYET (2)".to_string(),
            number_mode: NumberMode::Strict,
            project_code: "ProjeKodu".to_string(),
            cost_type: "MALIYET_TIPI".to_string(),
            stock_name: "STOK_ADI".to_string(),
            equipment_name: "EKIPMAN_ADI".to_string(),
            cost_amount: "PROJELERİN EURO MALİYET TUTARLARI".to_string(),
        }
    }
}

impl ReportConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text)
            .map_err(|e| ReportError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Resolve the config the binary runs with: an explicit path must exist,
    /// the default file is optional.
    pub fn resolve(explicit: Option<&str>) -> Result<Self> {
        match explicit {
            Some(p) => Self::from_json_file(Path::new(p)),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_json_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_json_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"workbook_path": "book.xlsx", "cost_sheet": {{"number_mode": "swap_only"}}, "filter": {{"company": "HUM"}}}}"#
        )
        .unwrap();

        let cfg = ReportConfig::from_json_file(file.path()).unwrap();
        assert_eq!(cfg.workbook_path, PathBuf::from("book.xlsx"));
        assert_eq!(cfg.cost_sheet.number_mode, NumberMode::SwapOnly);
        assert_eq!(cfg.cost_sheet.sheet, "ARPV_PROJE_MALIYET (2)");
        assert_eq!(cfg.project_sheet.project_code, "ProjeKodu");
        assert_eq!(cfg.filter.company.as_deref(), Some("HUM"));
        assert_eq!(cfg.preview_rows, 5);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = ReportConfig::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, ReportError::Config(_)));
    }

    #[test]
    fn explicit_missing_file_fails() {
        assert!(ReportConfig::resolve(Some("/definitely/not/here.json")).is_err());
    }
}
