//! File-backed store
//!
//! Keeps records as JSON files under a workspace's `.caseflow/` directory.
//! Turned-in files are copied into `.caseflow/uploads/<doc_id>/`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::errors::{CaseflowError, Result};
use crate::fs;
use crate::schemas::{Case, CasePatch, Document, DocumentUpdate, StaffUser, UserRole};

use super::{CaseStore, DocumentStore, UserStore};

/// Store reading and writing the JSON records of one workspace
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store rooted at a workspace directory (the parent of `.caseflow`)
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FileStore { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Copy an uploaded file next to the document and return its path
    /// relative to the workspace root.
    fn store_upload(&self, doc_id: &str, file_name: &str, content: &[u8]) -> Result<String> {
        let name = Path::new(file_name)
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| CaseflowError::validation(format!("invalid file name: {}", file_name)))?;
        let dir = fs::get_uploads_dir(&self.root, doc_id);
        std::fs::create_dir_all(&dir)?;
        let target = dir.join(name);
        std::fs::write(&target, content)?;
        Ok(target
            .strip_prefix(&self.root)
            .unwrap_or(&target)
            .to_string_lossy()
            .into_owned())
    }
}

/// Report any backend error as a transport failure, keeping the detail
fn transport<T>(result: Result<T>) -> Result<T> {
    result.map_err(|e| match e {
        CaseflowError::TransportFailure(_) => e,
        other => CaseflowError::TransportFailure(other.to_string()),
    })
}

// ===== SYNCHRONOUS FILE OPERATIONS =====

impl FileStore {
    fn insert_case(&self, case: &Case) -> Result<Case> {
        fs::validate_record_id(&case.case_id)?;
        if fs::get_case_path(&self.root, &case.case_id).exists() {
            return Err(CaseflowError::validation(format!(
                "case {} already exists",
                case.case_id
            )));
        }
        fs::write_case(&self.root, case)?;
        Ok(case.clone())
    }

    fn patch_case(&self, case_id: &str, patch: &CasePatch) -> Result<Case> {
        let current = fs::read_case(&self.root, case_id)?;
        let next = patch.apply_to(current);
        fs::write_case(&self.root, &next)?;
        Ok(next)
    }

    fn insert_document(&self, doc: &Document) -> Result<Document> {
        fs::validate_record_id(&doc.doc_id)?;
        if fs::get_document_path(&self.root, &doc.doc_id).exists() {
            return Err(CaseflowError::validation(format!(
                "document {} already exists",
                doc.doc_id
            )));
        }
        fs::write_document(&self.root, doc)?;
        Ok(doc.clone())
    }

    fn patch_document(&self, doc_id: &str, update: &DocumentUpdate) -> Result<Document> {
        let current = fs::read_document(&self.root, doc_id)?;
        let next = match update {
            DocumentUpdate::Json(patch) => patch.apply_to(current),
            DocumentUpdate::Multipart(payload) => {
                let stored_as =
                    self.store_upload(doc_id, &payload.doc_file.file_name, &payload.doc_file.content)?;
                payload.apply_to(current, stored_as)
            }
        };
        fs::write_document(&self.root, &next)?;
        Ok(next)
    }

    fn set_user_role(&self, user_id: &str, role: UserRole) -> Result<()> {
        let mut users = fs::read_users(&self.root)?;
        let user = users
            .iter_mut()
            .find(|u| u.user_id == user_id)
            .ok_or_else(|| CaseflowError::FileNotFound(format!("user {}", user_id)))?;
        user.user_role = role;
        fs::write_users(&self.root, &users)
    }
}

#[async_trait]
impl CaseStore for FileStore {
    async fn create_case(&self, case: &Case) -> Result<Case> {
        transport(self.insert_case(case))
    }

    async fn get_case(&self, case_id: &str) -> Result<Case> {
        transport(fs::read_case(&self.root, case_id))
    }

    async fn update_case(&self, case_id: &str, patch: &CasePatch) -> Result<Case> {
        transport(self.patch_case(case_id, patch))
    }
}

#[async_trait]
impl DocumentStore for FileStore {
    async fn create_document(&self, doc: &Document) -> Result<Document> {
        transport(self.insert_document(doc))
    }

    async fn get_document(&self, doc_id: &str) -> Result<Document> {
        transport(fs::read_document(&self.root, doc_id))
    }

    async fn update_document(&self, doc_id: &str, update: &DocumentUpdate) -> Result<Document> {
        transport(self.patch_document(doc_id, update))
    }

    async fn list_documents(&self, case_id: &str) -> Result<Vec<Document>> {
        transport(fs::list_case_documents(&self.root, case_id))
    }

    async fn delete_document(&self, doc_id: &str) -> Result<()> {
        transport(fs::remove_document(&self.root, doc_id))
    }
}

#[async_trait]
impl UserStore for FileStore {
    async fn list_users(&self) -> Result<Vec<StaffUser>> {
        transport(fs::read_users(&self.root))
    }

    async fn update_user_role(&self, user_id: &str, role: UserRole) -> Result<()> {
        transport(self.set_user_role(user_id, role))
    }
}
