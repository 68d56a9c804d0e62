//! State transition logic
//!
//! Pure functions turning a requested transition into the update payload the
//! backend must persist. Nothing here mutates its inputs; the `apply_*`
//! functions preview the record that results from a successful write.

use chrono::{DateTime, FixedOffset};

use crate::errors::{CaseflowError, Result};
use crate::schemas::{
    append_rejection, Actor, Case, CasePatch, DocStatus, Document, DocumentPatch, DocumentUpdate,
    Priority, TurnInPayload, UploadedFile,
};

use super::scheduler::compute_due_date;
use super::states::{next_case_status, CaseAction, DocAction};
use super::validation::{
    validate_case_action, validate_document_transition, validate_rejection_reason,
    validate_verdict,
};

/// A requested case transition and its inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseRequest<'a> {
    Assign { lawyer_id: &'a str },
    Close { verdict: &'a str },
    Dismiss,
    Archive,
    Unarchive,
}

impl CaseRequest<'_> {
    pub fn action(&self) -> CaseAction {
        match self {
            CaseRequest::Assign { .. } => CaseAction::Assign,
            CaseRequest::Close { .. } => CaseAction::Close,
            CaseRequest::Dismiss => CaseAction::Dismiss,
            CaseRequest::Archive => CaseAction::Archive,
            CaseRequest::Unarchive => CaseAction::Unarchive,
        }
    }
}

/// A requested document transition and its inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocRequest<'a> {
    AutoAdvance,
    TurnIn { file: Option<&'a UploadedFile> },
    Approve,
    Reject { reason: &'a str },
    Move(DocStatus),
}

impl DocRequest<'_> {
    pub fn action(&self) -> DocAction {
        match self {
            DocRequest::AutoAdvance => DocAction::AutoAdvance,
            DocRequest::TurnIn { file } => DocAction::TurnIn {
                has_file: file.is_some_and(|f| !f.is_empty()),
            },
            DocRequest::Approve => DocAction::Approve,
            DocRequest::Reject { .. } => DocAction::Reject,
            DocRequest::Move(target) => DocAction::Move(*target),
        }
    }
}

/// Build the case patch for `request`, checking legality from the current
/// status and the request's own inputs.
pub fn plan_case_transition(
    case: &Case,
    request: &CaseRequest<'_>,
    actor_id: &str,
) -> Result<CasePatch> {
    let action = request.action();
    validate_case_action(case.case_status, action).into_result()?;
    let next_status = next_case_status(case.case_status, action)
        .ok_or_else(|| CaseflowError::validation(format!("cannot {} this case", action)))?;

    let mut patch = CasePatch::status(next_status, actor_id);
    match request {
        CaseRequest::Assign { lawyer_id } => {
            if lawyer_id.trim().is_empty() {
                return Err(CaseflowError::validation("a lawyer must be chosen"));
            }
            patch.user_id = Some(lawyer_id.to_string());
            patch.assigned_by = Some(actor_id.to_string());
        }
        CaseRequest::Close { verdict } => {
            validate_verdict(verdict).into_result()?;
            patch.case_verdict = Some(verdict.trim().to_string());
        }
        CaseRequest::Dismiss | CaseRequest::Archive | CaseRequest::Unarchive => {}
    }
    Ok(patch)
}

/// Preview the case a successful `request` would produce
pub fn apply_case_transition(case: &Case, request: &CaseRequest<'_>, actor_id: &str) -> Result<Case> {
    let patch = plan_case_transition(case, request, actor_id)?;
    Ok(patch.apply_to(case.clone()))
}

/// Build the document update for `request`, or None when it is a no-op.
///
/// Authorization and legality are decided by
/// [`validate_document_transition`] for every entry point.
pub fn plan_document_transition(
    actor: &Actor,
    doc: &Document,
    request: &DocRequest<'_>,
    now: DateTime<FixedOffset>,
) -> Result<Option<DocumentUpdate>> {
    let target = match validate_document_transition(actor, doc, request.action())? {
        Some(target) => target,
        None => return Ok(None),
    };

    let update = match request {
        DocRequest::TurnIn { file } => {
            let file = file
                .filter(|f| !f.is_empty())
                .ok_or_else(|| CaseflowError::validation("a file is required to turn in work"))?;
            DocumentUpdate::Multipart(TurnInPayload {
                doc_status: target,
                doc_file: file.clone(),
                doc_date_submitted: now,
                doc_last_updated_by: actor.user_id.clone(),
            })
        }
        DocRequest::Reject { reason } => {
            validate_rejection_reason(reason).into_result()?;
            let mut patch = DocumentPatch::status(target, &actor.user_id);
            patch.doc_tag = Some(append_rejection(doc.doc_tag.as_deref(), reason));
            DocumentUpdate::Json(patch)
        }
        DocRequest::AutoAdvance | DocRequest::Approve | DocRequest::Move(_) => {
            DocumentUpdate::Json(DocumentPatch::status(target, &actor.user_id))
        }
    };
    Ok(Some(update))
}

/// Build the patch that re-prioritizes a task, re-anchoring its due date to
/// `now`.
pub fn plan_priority_change(
    doc: &Document,
    priority: Priority,
    actor_id: &str,
    now: DateTime<FixedOffset>,
) -> Result<DocumentPatch> {
    if !doc.is_task() {
        return Err(CaseflowError::validation("only tasks have a priority"));
    }
    if doc.doc_status == DocStatus::Approved {
        return Err(CaseflowError::validation("approved work can no longer be changed"));
    }
    Ok(DocumentPatch {
        doc_status: None,
        doc_tag: None,
        doc_prio_level: Some(priority),
        doc_due_date: Some(compute_due_date(priority, &now)),
        doc_last_updated_by: actor_id.to_string(),
    })
}

/// Preview the document a successful `request` would produce. Submitted files
/// are recorded under their own name.
pub fn apply_document_transition(
    actor: &Actor,
    doc: &Document,
    request: &DocRequest<'_>,
    now: DateTime<FixedOffset>,
) -> Result<Document> {
    let next = match plan_document_transition(actor, doc, request, now)? {
        None => doc.clone(),
        Some(DocumentUpdate::Json(patch)) => patch.apply_to(doc.clone()),
        Some(DocumentUpdate::Multipart(payload)) => {
            let stored_as = payload.doc_file.file_name.clone();
            payload.apply_to(doc.clone(), stored_as)
        }
    };
    Ok(next)
}
