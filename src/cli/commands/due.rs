//! Due command - preview a task due date

use std::path::Path;

use chrono::{DateTime, FixedOffset};

use crate::config::{load_config, office_offset};
use crate::domain::compute_due_date;
use crate::errors::{CaseflowError, Result};
use crate::fs::{find_workspace_root, resolve_cwd};
use crate::schemas::{Config, Priority};
use crate::workflow::{Clock, SystemClock};

pub async fn run(cwd: Option<&Path>, priority: Priority, from: Option<&str>) -> Result<()> {
    let due = due_date(cwd, priority, from)?;
    println!("{}", due.to_rfc3339());
    Ok(())
}

fn due_date(cwd: Option<&Path>, priority: Priority, from: Option<&str>) -> Result<DateTime<FixedOffset>> {
    let now = match from {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map_err(|e| CaseflowError::validation(format!("invalid --from {:?}: {}", raw, e)))?,
        None => {
            // Outside a workspace, fall back to the default office timezone
            let config = match find_workspace_root(&resolve_cwd(cwd)) {
                Ok(root) => load_config(&root)?,
                Err(_) => Config::default(),
            };
            SystemClock::new(office_offset(&config)?).now()
        }
    };
    Ok(compute_due_date(priority, &now))
}
