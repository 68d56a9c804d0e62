//! JSON file operations with schema validation
//!
//! Provides functions to read and write the workspace's JSON records.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::{CaseflowError, Result};
use crate::schemas::{Case, Config, Document, StaffUser};

use super::paths::{
    get_case_path, get_config_path, get_document_path, get_documents_dir, get_users_path,
    validate_record_id,
};

/// Read and deserialize a JSON file.
///
/// # Errors
/// * `FileNotFound` - If the file does not exist
/// * `InvalidJson` - If the file contains invalid JSON or does not match the schema
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CaseflowError::FileNotFound(format!("File not found: {}", path.display()))
        } else {
            CaseflowError::Io(e)
        }
    })?;

    serde_json::from_str(&content).map_err(|e| {
        CaseflowError::InvalidJson(format!("Invalid JSON in file {}: {}", path.display(), e))
    })
}

/// Write a value to a JSON file with pretty formatting.
///
/// Uses atomic write (write to temp file, then rename) to avoid partial writes.
pub fn write_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(data)
        .map_err(|e| CaseflowError::InvalidJson(e.to_string()))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("json.tmp");
    let mut file = fs::File::create(&temp_path)?;
    file.write_all(content.as_bytes())?;
    file.write_all(b"\n")?;
    file.sync_all()?;
    drop(file);

    fs::rename(&temp_path, path)?;

    Ok(())
}

/// Read the config.json file, or defaults if it doesn't exist.
pub fn read_config(root: &Path) -> Result<Config> {
    let path = get_config_path(root);
    if !path.exists() {
        return Ok(Config::default());
    }
    read_json(&path)
}

pub fn write_config(root: &Path, config: &Config) -> Result<()> {
    write_json(&get_config_path(root), config)
}

pub fn read_case(root: &Path, case_id: &str) -> Result<Case> {
    validate_record_id(case_id)?;
    read_json(&get_case_path(root, case_id))
}

pub fn write_case(root: &Path, case: &Case) -> Result<()> {
    validate_record_id(&case.case_id)?;
    write_json(&get_case_path(root, &case.case_id), case)
}

pub fn read_document(root: &Path, doc_id: &str) -> Result<Document> {
    validate_record_id(doc_id)?;
    read_json(&get_document_path(root, doc_id))
}

pub fn write_document(root: &Path, doc: &Document) -> Result<()> {
    validate_record_id(&doc.doc_id)?;
    write_json(&get_document_path(root, &doc.doc_id), doc)
}

pub fn remove_document(root: &Path, doc_id: &str) -> Result<()> {
    validate_record_id(doc_id)?;
    let path = get_document_path(root, doc_id);
    fs::remove_file(&path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CaseflowError::FileNotFound(format!("File not found: {}", path.display()))
        } else {
            CaseflowError::Io(e)
        }
    })
}

/// Read every document record belonging to `case_id`, ordered by id.
pub fn list_case_documents(root: &Path, case_id: &str) -> Result<Vec<Document>> {
    let dir = get_documents_dir(root);
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut docs = Vec::new();
    for entry in fs::read_dir(&dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let doc: Document = read_json(&path)?;
        if doc.case_id == case_id {
            docs.push(doc);
        }
    }
    docs.sort_by(|a, b| a.doc_id.cmp(&b.doc_id));
    Ok(docs)
}

/// Read the staff roster; a missing file is an empty roster.
pub fn read_users(root: &Path) -> Result<Vec<StaffUser>> {
    let path = get_users_path(root);
    if !path.exists() {
        return Ok(Vec::new());
    }
    read_json(&path)
}

pub fn write_users(root: &Path, users: &[StaffUser]) -> Result<()> {
    write_json(&get_users_path(root), &users)
}
