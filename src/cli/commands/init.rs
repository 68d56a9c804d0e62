//! Init command - Initialize a new caseflow workspace

use std::path::Path;

use crate::cli::parse_staff_entry;
use crate::errors::{CaseflowError, Result};
use crate::fs::{
    get_caseflow_dir, get_cases_dir, get_documents_dir, read_users, resolve_cwd, write_config,
    write_users,
};
use crate::schemas::{Config, StaffUser};

/// Create `.caseflow/` with a default config and an optional seeded roster
pub async fn run(cwd: Option<&Path>, force: bool, staff: &[String]) -> Result<()> {
    let root = resolve_cwd(cwd);
    let dir = get_caseflow_dir(&root);
    if dir.exists() && !force {
        return Err(CaseflowError::validation(format!(
            "{} already exists; use --force to reinitialize",
            dir.display()
        )));
    }

    let seeded = staff
        .iter()
        .map(|entry| {
            parse_staff_entry(entry)
                .map(|(id, role)| StaffUser::new(id.clone(), id, role))
                .map_err(CaseflowError::ValidationFailure)
        })
        .collect::<Result<Vec<_>>>()?;

    std::fs::create_dir_all(get_cases_dir(&root))?;
    std::fs::create_dir_all(get_documents_dir(&root))?;
    write_config(&root, &Config::default())?;

    let mut users = read_users(&root)?;
    for user in seeded {
        users.retain(|u| u.user_id != user.user_id);
        users.push(user);
    }
    write_users(&root, &users)?;

    tracing::info!(root = %root.display(), staff = users.len(), "workspace initialized");
    println!("Initialized caseflow workspace in {}", dir.display());
    Ok(())
}
