//! Error types shared by the loader, the chart renderer and the server.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DashError>;

#[derive(Error, Debug)]
pub enum DashError {
    #[error("Failed to open dataset '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed tab-separated input: {0}")]
    Csv(#[from] csv::Error),

    /// Names are listed in the order of [`crate::dataset::REQUIRED_COLUMNS`].
    #[error("The following columns are missing from the CSV: {}. Adjust the column names and try again.", format_missing(.0))]
    MissingColumns(Vec<String>),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Chart rendering failed: {0}")]
    Render(String),

    #[error("Serialisation error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP server error: {0}")]
    Server(String),

    #[error("Image format '{0}' is not available in this build")]
    UnsupportedFormat(String),
}

fn format_missing(columns: &[String]) -> String {
    let quoted: Vec<String> = columns.iter().map(|c| format!("'{}'", c)).collect();
    format!("[{}]", quoted.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message_lists_names_in_order() {
        let err = DashError::MissingColumns(vec!["Município".to_string(), "Unidade".to_string()]);
        let msg = err.to_string();
        assert!(msg.contains("['Município', 'Unidade']"), "got: {}", msg);
    }

    #[test]
    fn test_open_error_names_path() {
        let err = DashError::Open {
            path: PathBuf::from("data.csv"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.to_string().contains("data.csv"));
    }
}
