//! caseflow - Case, document and task workflow for a small legal practice
//!
//! This library provides the core functionality for the caseflow CLI, including:
//! - Schema definitions for cases, documents, staff and config
//! - Domain logic for lifecycle states, permissions and due dates
//! - Workflow services that authorize, validate and persist transitions
//! - Store backends (in-memory and JSON files)
//! - File system utilities for reading/writing JSON

pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod fs;
pub mod schemas;
pub mod store;
pub mod workflow;

// Re-export commonly used types
pub use errors::{CaseflowError, Result};
pub use schemas::{Actor, Case, CaseStatus, Config, DocStatus, Document, Priority, UserRole};
pub use workflow::{BoardSet, CaseWorkflow, DocumentWorkflow, RoleBoard};
