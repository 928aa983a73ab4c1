use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReportError>;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Workbook error: {source}")]
    Workbook {
        #[from]
        source: calamine::Error,
    },

    #[error("Sheet '{0}' not found in workbook")]
    SheetNotFound(String),

    #[error("Sheet '{0}' has no header row")]
    EmptySheet(String),

    #[error("Sheet '{sheet}' is missing column(s): {}", .columns.join(", "))]
    MissingColumns { sheet: String, columns: Vec<String> },

    #[error("Join is not many-to-one: project code '{project_code}' has {rows} dimension rows")]
    JoinCardinality { project_code: String, rows: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("CSV write error: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },

    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}
