//! In-memory store
//!
//! Holds records in process memory. Failures can be injected to exercise the
//! rollback paths, and every call is counted so callers can assert that a
//! rejected transition never reached the backend.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::errors::{CaseflowError, Result};
use crate::schemas::{Case, CasePatch, Document, DocumentUpdate, StaffUser, UserRole};

use super::{CaseStore, DocumentStore, UserStore};

#[derive(Debug, Default)]
struct MemoryState {
    cases: BTreeMap<String, Case>,
    documents: BTreeMap<String, Document>,
    users: Vec<StaffUser>,
    fail_writes: bool,
    reads: usize,
    writes: usize,
}

/// Thread-safe in-memory implementation of every store trait
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // ===== SEEDING =====

    pub fn insert_case(&self, case: Case) {
        self.lock().cases.insert(case.case_id.clone(), case);
    }

    pub fn insert_document(&self, doc: Document) {
        self.lock().documents.insert(doc.doc_id.clone(), doc);
    }

    pub fn insert_user(&self, user: StaffUser) {
        let mut state = self.lock();
        state.users.retain(|u| u.user_id != user.user_id);
        state.users.push(user);
    }

    // ===== INSPECTION =====

    /// Stored copy of a case, bypassing call counting
    pub fn case(&self, case_id: &str) -> Option<Case> {
        self.lock().cases.get(case_id).cloned()
    }

    /// Stored copy of a document, bypassing call counting
    pub fn document(&self, doc_id: &str) -> Option<Document> {
        self.lock().documents.get(doc_id).cloned()
    }

    pub fn user(&self, user_id: &str) -> Option<StaffUser> {
        self.lock().users.iter().find(|u| u.user_id == user_id).cloned()
    }

    /// Make every subsequent write fail until reset
    pub fn set_fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    /// Number of write calls received, successful or not
    pub fn writes(&self) -> usize {
        self.lock().writes
    }

    /// Number of read calls received
    pub fn reads(&self) -> usize {
        self.lock().reads
    }

    /// Total calls received
    pub fn calls(&self) -> usize {
        let state = self.lock();
        state.reads + state.writes
    }

    fn begin_write(&self) -> Result<MutexGuard<'_, MemoryState>> {
        let mut state = self.lock();
        state.writes += 1;
        if state.fail_writes {
            return Err(CaseflowError::TransportFailure(
                "backend unavailable".to_string(),
            ));
        }
        Ok(state)
    }

    fn begin_read(&self) -> MutexGuard<'_, MemoryState> {
        let mut state = self.lock();
        state.reads += 1;
        state
    }
}

fn missing(kind: &str, id: &str) -> CaseflowError {
    CaseflowError::TransportFailure(format!("{} {} not found", kind, id))
}

#[async_trait]
impl CaseStore for MemoryStore {
    async fn create_case(&self, case: &Case) -> Result<Case> {
        let mut state = self.begin_write()?;
        if state.cases.contains_key(&case.case_id) {
            return Err(CaseflowError::TransportFailure(format!(
                "case {} already exists",
                case.case_id
            )));
        }
        state.cases.insert(case.case_id.clone(), case.clone());
        Ok(case.clone())
    }

    async fn get_case(&self, case_id: &str) -> Result<Case> {
        let state = self.begin_read();
        state.cases.get(case_id).cloned().ok_or_else(|| missing("case", case_id))
    }

    async fn update_case(&self, case_id: &str, patch: &CasePatch) -> Result<Case> {
        let mut state = self.begin_write()?;
        let current = state.cases.get(case_id).cloned().ok_or_else(|| missing("case", case_id))?;
        let next = patch.apply_to(current);
        state.cases.insert(case_id.to_string(), next.clone());
        Ok(next)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create_document(&self, doc: &Document) -> Result<Document> {
        let mut state = self.begin_write()?;
        if state.documents.contains_key(&doc.doc_id) {
            return Err(CaseflowError::TransportFailure(format!(
                "document {} already exists",
                doc.doc_id
            )));
        }
        state.documents.insert(doc.doc_id.clone(), doc.clone());
        Ok(doc.clone())
    }

    async fn get_document(&self, doc_id: &str) -> Result<Document> {
        let state = self.begin_read();
        state.documents.get(doc_id).cloned().ok_or_else(|| missing("document", doc_id))
    }

    async fn update_document(&self, doc_id: &str, update: &DocumentUpdate) -> Result<Document> {
        let mut state = self.begin_write()?;
        let current = state
            .documents
            .get(doc_id)
            .cloned()
            .ok_or_else(|| missing("document", doc_id))?;
        let next = match update {
            DocumentUpdate::Json(patch) => patch.apply_to(current),
            DocumentUpdate::Multipart(payload) => {
                let stored_as = payload.doc_file.file_name.clone();
                payload.apply_to(current, stored_as)
            }
        };
        state.documents.insert(doc_id.to_string(), next.clone());
        Ok(next)
    }

    async fn list_documents(&self, case_id: &str) -> Result<Vec<Document>> {
        let state = self.begin_read();
        Ok(state
            .documents
            .values()
            .filter(|d| d.case_id == case_id)
            .cloned()
            .collect())
    }

    async fn delete_document(&self, doc_id: &str) -> Result<()> {
        let mut state = self.begin_write()?;
        state
            .documents
            .remove(doc_id)
            .map(|_| ())
            .ok_or_else(|| missing("document", doc_id))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn list_users(&self) -> Result<Vec<StaffUser>> {
        Ok(self.begin_read().users.clone())
    }

    async fn update_user_role(&self, user_id: &str, role: UserRole) -> Result<()> {
        let mut state = self.begin_write()?;
        let user = state
            .users
            .iter_mut()
            .find(|u| u.user_id == user_id)
            .ok_or_else(|| missing("user", user_id))?;
        user.user_role = role;
        Ok(())
    }
}
