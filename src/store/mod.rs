//! Persistence contracts consumed by the workflow services
//!
//! The engine never talks to a backend directly; it goes through these
//! traits. Any error a store returns is reported to callers as a
//! `TransportFailure`.

mod file;
mod memory;

use async_trait::async_trait;

use crate::errors::Result;
use crate::schemas::{Case, CasePatch, Document, DocumentUpdate, StaffUser, UserRole};

pub use file::FileStore;
pub use memory::MemoryStore;

/// Case records
#[async_trait]
pub trait CaseStore: Send + Sync {
    /// Persist a newly opened case and return the stored record
    async fn create_case(&self, case: &Case) -> Result<Case>;

    async fn get_case(&self, case_id: &str) -> Result<Case>;

    /// Apply a partial update and return the stored record
    async fn update_case(&self, case_id: &str, patch: &CasePatch) -> Result<Case>;
}

/// Document and task records
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn create_document(&self, doc: &Document) -> Result<Document>;

    async fn get_document(&self, doc_id: &str) -> Result<Document>;

    /// Apply a JSON or multipart update and return the stored record
    async fn update_document(&self, doc_id: &str, update: &DocumentUpdate) -> Result<Document>;

    /// All documents attached to a case
    async fn list_documents(&self, case_id: &str) -> Result<Vec<Document>>;

    async fn delete_document(&self, doc_id: &str) -> Result<()>;
}

/// Staff roster
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn list_users(&self) -> Result<Vec<StaffUser>>;

    async fn update_user_role(&self, user_id: &str, role: UserRole) -> Result<()>;
}
