//! File system utilities for caseflow
//!
//! Provides path resolution and JSON file operations for the `.caseflow/`
//! workspace used by the CLI.

mod json;
mod paths;

pub use json::{
    list_case_documents, read_case, read_config, read_document, read_json, read_users,
    remove_document, write_case, write_config, write_document, write_json, write_users,
};
pub use paths::{
    find_workspace_root, get_case_path, get_caseflow_dir, get_cases_dir, get_config_path,
    get_document_path, get_documents_dir, get_uploads_dir, get_users_path, resolve_cwd,
    validate_record_id, WORKSPACE_DIR,
};
