//! Case and document state machine definitions
//!
//! Cases: pending → processing → completed | dismissed → archived(..),
//! with unarchive returning to completed.
//!
//! Documents: todo → in_progress → done → approved, with done → todo on
//! rejection.

use crate::schemas::{CaseStatus, DocStatus, Resolution};

/// The canonical ordering of case states.
pub const CASE_STATES: &[CaseStatus] = &CaseStatus::ALL;

/// The canonical ordering of document states.
pub const DOCUMENT_STATES: &[DocStatus] = &[
    DocStatus::Todo,
    DocStatus::InProgress,
    DocStatus::Done,
    DocStatus::Approved,
];

/// Transitions a case can be asked to make
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaseAction {
    Assign,
    Close,
    Dismiss,
    Archive,
    Unarchive,
}

impl std::fmt::Display for CaseAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaseAction::Assign => write!(f, "assign"),
            CaseAction::Close => write!(f, "close"),
            CaseAction::Dismiss => write!(f, "dismiss"),
            CaseAction::Archive => write!(f, "archive"),
            CaseAction::Unarchive => write!(f, "unarchive"),
        }
    }
}

/// Transitions a document can be asked to make
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocAction {
    /// Opened by an assignee; todo becomes in_progress
    AutoAdvance,
    /// Submission of a file for review
    TurnIn { has_file: bool },
    Approve,
    Reject,
    /// Kanban drag-and-drop to a column
    Move(DocStatus),
}

impl std::fmt::Display for DocAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocAction::AutoAdvance => write!(f, "start"),
            DocAction::TurnIn { .. } => write!(f, "turn in"),
            DocAction::Approve => write!(f, "approve"),
            DocAction::Reject => write!(f, "reject"),
            DocAction::Move(target) => write!(f, "move to {}", target),
        }
    }
}

/// Status a case lands in after `action`, or None if the action is illegal
/// from `current`.
///
/// Unarchive always lands in completed, even for a case archived from
/// dismissed.
pub fn next_case_status(current: CaseStatus, action: CaseAction) -> Option<CaseStatus> {
    match (action, current) {
        (CaseAction::Assign, CaseStatus::Pending | CaseStatus::Processing) => {
            Some(CaseStatus::Processing)
        }
        (CaseAction::Close, CaseStatus::Processing) => Some(CaseStatus::Completed),
        (CaseAction::Dismiss, CaseStatus::Processing) => Some(CaseStatus::Dismissed),
        (CaseAction::Archive, CaseStatus::Completed) => {
            Some(CaseStatus::Archived(Resolution::Completed))
        }
        (CaseAction::Archive, CaseStatus::Dismissed) => {
            Some(CaseStatus::Archived(Resolution::Dismissed))
        }
        (CaseAction::Unarchive, CaseStatus::Archived(_)) => Some(CaseStatus::Completed),
        _ => None,
    }
}

/// Actions legal from the given case status.
pub fn get_allowed_case_actions(current: CaseStatus) -> Vec<CaseAction> {
    [
        CaseAction::Assign,
        CaseAction::Close,
        CaseAction::Dismiss,
        CaseAction::Archive,
        CaseAction::Unarchive,
    ]
    .into_iter()
    .filter(|&action| next_case_status(current, action).is_some())
    .collect()
}

/// Completed, dismissed and both archived variants.
pub fn is_resolved_case_status(status: CaseStatus) -> bool {
    matches!(
        status,
        CaseStatus::Completed | CaseStatus::Dismissed | CaseStatus::Archived(_)
    )
}

/// Statuses a document may move to from `current`, ignoring who asks and
/// whether a file is on record.
pub fn get_allowed_next_doc_statuses(current: DocStatus) -> Vec<DocStatus> {
    match current {
        DocStatus::Todo => vec![DocStatus::InProgress, DocStatus::Done],
        DocStatus::InProgress => vec![DocStatus::Todo, DocStatus::Done],
        DocStatus::Done => vec![DocStatus::Todo, DocStatus::InProgress, DocStatus::Approved],
        DocStatus::Approved => vec![],
    }
}

/// Approved documents never change status again.
pub fn is_terminal_doc_status(status: DocStatus) -> bool {
    status == DocStatus::Approved
}
