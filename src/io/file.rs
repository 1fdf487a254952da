use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::model::Dataset;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} is not a timeline dataset: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Load a dataset from a JSON file. The file is only read.
pub fn load_dataset(path: &Path) -> Result<Dataset, DatasetError> {
    let json = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset: Dataset = serde_json::from_str(&json).map_err(|source| DatasetError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let dangling = dataset
        .rows
        .iter()
        .flat_map(|row| row.tasks.iter())
        .filter(|id| !dataset.tasks.contains_key(id))
        .count();
    if dangling > 0 {
        tracing::warn!(path = %path.display(), dangling, "rows reference unknown tasks; they will not be drawn");
    }
    tracing::info!(
        path = %path.display(),
        rows = dataset.rows.len(),
        tasks = dataset.tasks.len(),
        "dataset loaded"
    );
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn sample_dataset_loads_back() {
        let dataset = Dataset::sample(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.json");
        std::fs::write(&path, serde_json::to_string_pretty(&dataset).unwrap()).unwrap();

        let loaded = load_dataset(&path).unwrap();
        assert_eq!(loaded, dataset);
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, r#"{ "rows": 3 }"#).unwrap();
        assert!(matches!(load_dataset(&path), Err(DatasetError::Parse { .. })));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_dataset(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, DatasetError::Io { .. }));
    }
}
