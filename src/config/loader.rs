//! Configuration loading with defaults

use std::path::Path;

use chrono::FixedOffset;

use crate::errors::{CaseflowError, Result};
use crate::fs;
use crate::schemas::Config;

/// Load configuration from the workspace, falling back to defaults.
///
/// Fields missing from config.json take their default values. A config with
/// no known case tags or an impossible timezone offset is rejected.
///
/// # Arguments
/// * `root` - Path to the workspace root
pub fn load_config(root: &Path) -> Result<Config> {
    let config = fs::read_config(root)?;
    if config.case_tags.is_empty() {
        return Err(CaseflowError::ConfigError(
            "case_tags must list at least one tag".to_string(),
        ));
    }
    office_offset(&config)?;
    Ok(config)
}

/// Office timezone for "now" and end-of-day due dates
pub fn office_offset(config: &Config) -> Result<FixedOffset> {
    config.office_offset().ok_or_else(|| {
        CaseflowError::ConfigError(format!(
            "utc_offset_minutes out of range: {}",
            config.utc_offset_minutes
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_config_defaults() {
        let temp = TempDir::new().unwrap();
        std_fs::create_dir(temp.path().join(".caseflow")).unwrap();

        let config = load_config(temp.path()).unwrap();
        assert_eq!(config.schema_version, 1);
        assert_eq!(config.case_tags.len(), 6);
        assert_eq!(config.utc_offset_minutes, 0);
    }

    #[test]
    fn test_load_config_from_file() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(".caseflow");
        std_fs::create_dir(&dir).unwrap();

        let config_content = r#"{
            "utc_offset_minutes": 480
        }"#;
        std_fs::write(dir.join("config.json"), config_content).unwrap();

        let config = load_config(temp.path()).unwrap();
        assert_eq!(office_offset(&config).unwrap().local_minus_utc(), 8 * 3600);
        // Default for unspecified field
        assert_eq!(config.case_tags.first().map(String::as_str), Some("Case Intake"));
    }

    #[test]
    fn test_load_config_rejects_bad_offset() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(".caseflow");
        std_fs::create_dir(&dir).unwrap();
        std_fs::write(dir.join("config.json"), r#"{"utc_offset_minutes": 100000}"#).unwrap();

        let err = load_config(temp.path()).unwrap_err();
        assert_eq!(err.code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_load_config_rejects_empty_tags() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(".caseflow");
        std_fs::create_dir(&dir).unwrap();
        std_fs::write(dir.join("config.json"), r#"{"case_tags": []}"#).unwrap();

        assert!(load_config(temp.path()).is_err());
    }
}
