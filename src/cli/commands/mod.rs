//! CLI command implementations

pub mod case;
pub mod doc;
pub mod due;
pub mod init;
pub mod roles;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::config::{load_config, office_offset};
use crate::errors::{CaseflowError, Result};
use crate::fs::{find_workspace_root, resolve_cwd};
use crate::schemas::{Actor, Config};
use crate::store::{FileStore, UserStore};
use crate::workflow::{CaseWorkflow, DocumentWorkflow, SystemClock};

/// An opened workspace and the services bound to it
pub struct Workspace {
    pub root: PathBuf,
    pub config: Config,
    pub store: Arc<FileStore>,
}

impl Workspace {
    /// Locate the workspace above `cwd` and load its config
    pub fn open(cwd: Option<&Path>) -> Result<Self> {
        let root = find_workspace_root(&resolve_cwd(cwd))?;
        let config = load_config(&root)?;
        Ok(Workspace {
            store: Arc::new(FileStore::new(&root)),
            root,
            config,
        })
    }

    /// Look up the acting staff member in the roster
    pub async fn actor(&self, actor_id: Option<&str>) -> Result<Actor> {
        let actor_id = actor_id
            .ok_or_else(|| CaseflowError::validation("--actor <USER_ID> is required"))?;
        let roster = self.store.list_users().await?;
        roster
            .iter()
            .find(|u| u.user_id == actor_id)
            .map(Actor::from)
            .ok_or_else(|| CaseflowError::validation(format!("unknown staff member: {}", actor_id)))
    }

    pub fn clock(&self) -> Result<SystemClock> {
        Ok(SystemClock::new(office_offset(&self.config)?))
    }

    pub fn cases(&self) -> CaseWorkflow {
        CaseWorkflow::new(self.store.clone(), self.store.clone())
            .with_known_tags(self.config.case_tags.clone())
    }

    pub fn documents(&self) -> Result<DocumentWorkflow> {
        Ok(DocumentWorkflow::new(self.store.clone(), Arc::new(self.clock()?)))
    }
}

/// Print a record as pretty JSON
pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value)
        .map_err(|e| CaseflowError::InvalidJson(e.to_string()))?;
    println!("{}", out);
    Ok(())
}
