//! Path resolution utilities for caseflow
//!
//! Provides functions to locate the workspace root and construct paths
//! to the record files kept under `.caseflow/`.

use std::path::{Path, PathBuf};

use crate::errors::{CaseflowError, Result};

/// Name of the directory that marks a workspace root
pub const WORKSPACE_DIR: &str = ".caseflow";

/// Find the workspace root containing a .caseflow directory.
///
/// Walks up the directory tree from the starting directory.
///
/// # Errors
/// * `WorkspaceNotFound` - If no ancestor contains .caseflow
pub fn find_workspace_root(start_cwd: &Path) -> Result<PathBuf> {
    let mut current = start_cwd
        .canonicalize()
        .map_err(|e| CaseflowError::WorkspaceNotFound(format!("Cannot resolve path: {}", e)))?;

    loop {
        if current.join(WORKSPACE_DIR).is_dir() {
            return Ok(current);
        }

        match current.parent() {
            Some(parent) if parent != current => {
                current = parent.to_path_buf();
            }
            _ => {
                return Err(CaseflowError::WorkspaceNotFound(
                    "Could not find a .caseflow directory; run `caseflow init` first".to_string(),
                ));
            }
        }
    }
}

/// Resolve the current working directory, optionally using an override.
pub fn resolve_cwd(cwd_option: Option<&Path>) -> PathBuf {
    match cwd_option {
        Some(path) => path.to_path_buf(),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

/// Reject ids that would escape their directory when used as a file name.
pub fn validate_record_id(id: &str) -> Result<()> {
    let bad = id.is_empty()
        || id == "."
        || id == ".."
        || id.chars().any(|c| c == '/' || c == '\\' || c.is_control());
    if bad {
        return Err(CaseflowError::validation(format!("invalid record id: {:?}", id)));
    }
    Ok(())
}

/// Get the path to the .caseflow directory.
pub fn get_caseflow_dir(root: &Path) -> PathBuf {
    root.join(WORKSPACE_DIR)
}

/// Get the path to the config.json file.
pub fn get_config_path(root: &Path) -> PathBuf {
    get_caseflow_dir(root).join("config.json")
}

/// Get the path to the staff roster.
pub fn get_users_path(root: &Path) -> PathBuf {
    get_caseflow_dir(root).join("users.json")
}

pub fn get_cases_dir(root: &Path) -> PathBuf {
    get_caseflow_dir(root).join("cases")
}

pub fn get_case_path(root: &Path, case_id: &str) -> PathBuf {
    get_cases_dir(root).join(format!("{}.json", case_id))
}

pub fn get_documents_dir(root: &Path) -> PathBuf {
    get_caseflow_dir(root).join("documents")
}

pub fn get_document_path(root: &Path, doc_id: &str) -> PathBuf {
    get_documents_dir(root).join(format!("{}.json", doc_id))
}

/// Directory holding files turned in for one document.
pub fn get_uploads_dir(root: &Path, doc_id: &str) -> PathBuf {
    get_caseflow_dir(root).join("uploads").join(doc_id)
}
