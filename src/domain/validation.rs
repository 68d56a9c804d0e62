//! Validation rules for case and document transitions
//!
//! Every document status change, whether from a structured action or a kanban
//! move, goes through [`validate_document_transition`].

use crate::errors::{CaseflowError, Result};
use crate::schemas::{Actor, CaseStatus, DocStatus, DocType, Document, NewDocument};

use super::permissions::{authorize, Action, GateContext};
use super::states::{get_allowed_next_doc_statuses, next_case_status, CaseAction, DocAction};

/// Result of a validation check
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether the validation passed
    pub valid: bool,

    /// Reason for failure (if valid is false)
    pub reason: Option<String>,
}

impl ValidationResult {
    /// Create a successful validation result
    pub fn success() -> Self {
        ValidationResult {
            valid: true,
            reason: None,
        }
    }

    /// Create a failed validation result
    pub fn failure(reason: impl Into<String>) -> Self {
        ValidationResult {
            valid: false,
            reason: Some(reason.into()),
        }
    }

    /// Convert into a `ValidationFailure` error if the check failed
    pub fn into_result(self) -> Result<()> {
        if self.valid {
            return Ok(());
        }
        Err(CaseflowError::ValidationFailure(
            self.reason.unwrap_or_else(|| "validation failed".to_string()),
        ))
    }
}

// ===== CASES =====

/// Ids of documents that still keep a case from closing
pub fn blocking_documents(documents: &[Document]) -> Vec<String> {
    documents
        .iter()
        .filter(|d| d.doc_status.is_unresolved())
        .map(|d| d.doc_id.clone())
        .collect()
}

/// Fail with `BlockedByPendingWork` if any document is todo, in progress or
/// turned in but not yet approved
pub fn can_close_case(case_id: &str, documents: &[Document]) -> Result<()> {
    let blocking = blocking_documents(documents);
    if blocking.is_empty() {
        return Ok(());
    }
    Err(CaseflowError::BlockedByPendingWork {
        case_id: case_id.to_string(),
        blocking,
    })
}

/// Check that `action` is legal from `current`
pub fn validate_case_action(current: CaseStatus, action: CaseAction) -> ValidationResult {
    if next_case_status(current, action).is_some() {
        return ValidationResult::success();
    }
    ValidationResult::failure(format!("cannot {} a case that is {}", action, current))
}

pub fn validate_verdict(verdict: &str) -> ValidationResult {
    if verdict.trim().is_empty() {
        return ValidationResult::failure("a verdict is required to close a case");
    }
    ValidationResult::success()
}

// ===== DOCUMENTS =====

pub fn validate_rejection_reason(reason: &str) -> ValidationResult {
    if reason.trim().is_empty() {
        return ValidationResult::failure("a reason is required to reject a submission");
    }
    ValidationResult::success()
}

/// Validate entering the "done" state
pub fn can_enter_done(has_file: bool) -> ValidationResult {
    if !has_file {
        return ValidationResult::failure("a file must be attached before a task can be done");
    }
    ValidationResult::success()
}

/// Check the fields of a document about to be created
pub fn validate_new_document(new: &NewDocument) -> ValidationResult {
    if new.doc_id.trim().is_empty() {
        return ValidationResult::failure("document id is required");
    }
    if new.case_id.trim().is_empty() {
        return ValidationResult::failure("a document must belong to a case");
    }
    if new.doc_name.trim().is_empty() {
        return ValidationResult::failure("document name is required");
    }
    match new.doc_type {
        None => ValidationResult::failure("document type is required"),
        Some(DocType::Support) => ValidationResult::success(),
        Some(DocType::Task) => {
            if new.doc_prio_level.is_none() {
                return ValidationResult::failure("a task needs a priority");
            }
            if new.doc_tasked_to.as_deref().map_or(true, |t| t.trim().is_empty()) {
                return ValidationResult::failure("a task needs an assignee");
            }
            // A task's file is its submission; it only arrives through turn-in
            if new.doc_file.as_deref().is_some_and(|f| !f.trim().is_empty()) {
                return ValidationResult::failure(
                    "a task cannot start with a submitted file; attach material as a reference file",
                );
            }
            ValidationResult::success()
        }
    }
}

/// Authorize and validate a document status change.
///
/// Returns the status the document should move to, or None when the action is
/// a no-op (a reviewer viewing a task, any view of a support document, a view
/// of a task already started, a kanban drop onto the current column).
///
/// Checks run in order: permission, legality from the current status, then
/// preconditions of the target status.
pub fn validate_document_transition(
    actor: &Actor,
    doc: &Document,
    action: DocAction,
) -> Result<Option<DocStatus>> {
    let current = doc.doc_status;
    let permission = Action::for_document(action, current == DocStatus::Done);
    authorize(actor, permission, &GateContext::default())?;

    let target = match action {
        DocAction::AutoAdvance => {
            if actor.role.is_reviewer() || !doc.is_task() || current != DocStatus::Todo {
                return Ok(None);
            }
            DocStatus::InProgress
        }
        DocAction::TurnIn { .. } => {
            if !matches!(current, DocStatus::Todo | DocStatus::InProgress) {
                return Err(CaseflowError::validation(format!(
                    "only todo or in-progress work can be turned in (this one is {})",
                    current
                )));
            }
            DocStatus::Done
        }
        DocAction::Approve | DocAction::Reject => {
            if current != DocStatus::Done {
                return Err(CaseflowError::validation(format!(
                    "only turned-in work can be reviewed (this one is {})",
                    current
                )));
            }
            if action == DocAction::Approve {
                DocStatus::Approved
            } else {
                DocStatus::Todo
            }
        }
        DocAction::Move(target) => {
            if target == DocStatus::Approved {
                return Err(CaseflowError::validation(
                    "work can only be approved through review",
                ));
            }
            if target == current {
                return Ok(None);
            }
            target
        }
    };

    if !get_allowed_next_doc_statuses(current).contains(&target) {
        return Err(CaseflowError::validation(format!(
            "cannot move a document from {} to {}",
            current, target
        )));
    }

    if target == DocStatus::Done {
        let has_file = match action {
            DocAction::TurnIn { has_file } => has_file,
            _ => doc.has_file(),
        };
        can_enter_done(has_file).into_result()?;
    }

    Ok(Some(target))
}
