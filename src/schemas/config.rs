//! Config schema - Configuration for a caseflow workspace

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use super::case::DEFAULT_CASE_TAGS;

/// Main configuration for caseflow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Schema version for forward compatibility
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Known pipeline tags, first to last
    #[serde(default = "default_case_tags")]
    pub case_tags: Vec<String>,

    /// Office timezone, in minutes east of UTC. Due dates end at 23:59:59.999
    /// in this timezone.
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

fn default_schema_version() -> u32 {
    1
}

fn default_case_tags() -> Vec<String> {
    DEFAULT_CASE_TAGS.iter().map(|t| t.to_string()).collect()
}

impl Config {
    /// The configured office timezone, or None if the offset is out of range
    pub fn office_offset(&self) -> Option<FixedOffset> {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            schema_version: 1,
            case_tags: default_case_tags(),
            utc_offset_minutes: 0,
        }
    }
}
