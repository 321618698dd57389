use std::path::PathBuf;

/// A broken board/animation invariant. These signal a bug upstream and are never folded into
/// an ordinary "ignored" outcome.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("column {column} is out of range (board has {cols} columns)")]
    ColumnOutOfRange { column: usize, cols: usize },

    #[error("row {row} is out of range (board has {rows} rows)")]
    RowOutOfRange { row: usize, rows: usize },

    #[error("cell at row {row}, column {column} is already occupied")]
    CellOccupied { row: usize, column: usize },

    #[error("stale landing row {row} for column {column}: lowest empty row is {expected}")]
    StaleLandingRow {
        row: usize,
        column: usize,
        expected: usize,
    },
}

/// Errors that can occur when loading or saving settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to write settings file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invariant_messages_name_the_cell() {
        let err = InvariantViolation::CellOccupied { row: 2, column: 5 };
        assert_eq!(err.to_string(), "cell at row 2, column 5 is already occupied");
    }

    #[test]
    fn settings_errors_include_the_path() {
        let err = SettingsError::Read {
            path: PathBuf::from("/tmp/settings.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("/tmp/settings.json"));
    }
}
