use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced to the presentation boundary. Nothing here is retried:
/// the source is a static local file.
#[derive(Debug, Error)]
pub enum StatsError {
    /// Unparseable date, missing column, or a record violating `end >= start`.
    #[error("data format error{}: column `{column}`: {message}", row_suffix(.row))]
    DataFormat {
        /// 1-based data row (header excluded), `None` for header-level problems.
        row: Option<usize>,
        column: String,
        message: String,
    },

    /// Empty history, or a tally that cannot produce a rate in [0, 100].
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed csv: {0}")]
    Csv(#[from] csv::Error),
}

fn row_suffix(row: &Option<usize>) -> String {
    match row {
        Some(r) => format!(" at row {}", r),
        None => String::new(),
    }
}

impl StatsError {
    pub fn data_format(row: Option<usize>, column: &str, message: impl Into<String>) -> Self {
        StatsError::DataFormat {
            row,
            column: column.to_string(),
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StatsError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for the `DataFormatError` half of the taxonomy (csv and io
    /// failures count as format failures at the boundary).
    pub fn is_data_format(&self) -> bool {
        !matches!(self, StatsError::InsufficientData(_))
    }
}

pub type Result<T> = std::result::Result<T, StatsError>;
