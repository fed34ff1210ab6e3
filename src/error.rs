use thiserror::Error;

/// Structural problems with an input table. Raised before any row is read;
/// per-field problems never surface here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("Input table is missing required column(s): {}", .columns.join(", "))]
    MissingColumns { columns: Vec<String> },
}

impl NormalizeError {
    pub fn missing_columns(&self) -> &[String] {
        match self {
            NormalizeError::MissingColumns { columns } => columns,
        }
    }
}
