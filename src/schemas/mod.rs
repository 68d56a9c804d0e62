//! Schema types for caseflow
//!
//! Field names follow the records exchanged with the case management backend.

mod case;
mod config;
mod document;
mod patch;
mod user;

pub use case::{normalize_case_tags, Case, CaseStatus, Resolution, DEFAULT_CASE_TAGS};
pub use config::Config;
pub use document::{
    append_rejection, DocStatus, DocType, Document, NewDocument, Priority, UploadedFile,
};
pub use patch::{CasePatch, DocumentPatch, DocumentUpdate, TurnInPayload};
pub use user::{Actor, StaffUser, UserRole};
