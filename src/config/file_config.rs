use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct FileConfig {
    // Source
    pub source: Option<String>,
    pub archive: Option<String>,
    pub archive_entry: Option<String>,
    pub work_dir: Option<String>,
    pub delimiter: Option<String>,
    pub encoding: Option<String>,

    // Output
    pub warehouse: Option<String>,
    pub summary_json: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("etl.toml");
        std::fs::write(
            &path,
            r#"
warehouse = "/data/fragrance.db"
delimiter = ","
"#,
        )
        .unwrap();

        let config = FileConfig::load(&path).unwrap();
        assert_eq!(config.warehouse.as_deref(), Some("/data/fragrance.db"));
        assert_eq!(config.delimiter.as_deref(), Some(","));
        assert!(config.source.is_none());
        assert!(config.encoding.is_none());
    }

    #[test]
    fn test_load_rejects_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("etl.toml");
        std::fs::write(&path, "warehouse = ").unwrap();
        let err = FileConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = FileConfig::load(Path::new("/nonexistent/etl.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
