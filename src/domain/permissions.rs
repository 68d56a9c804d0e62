//! Role-based authorization for case and document actions
//!
//! A pure lookup consulted before any state is inspected or any write is
//! issued.

use crate::errors::{CaseflowError, Result};
use crate::schemas::{Actor, Case, UserRole};

use super::states::{CaseAction, DocAction};

/// Everything an actor can ask the engine to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    OpenCase,
    AssignCase,
    CloseCase,
    DismissCase,
    ArchiveCase,
    UnarchiveCase,
    CreateTask,
    CreateSupportDocument,
    /// Open a task; only Paralegal/Staff views advance it
    ViewDocument,
    TurnInDocument,
    ApproveDocument,
    RejectDocument,
    /// Kanban move that does not leave the done column
    MoveDocument,
    /// Kanban move of a turned-in document back to an earlier column
    ReviewMoveDocument,
    ChangePriority,
    DeleteDocument,
    ReclassifyRole,
}

impl Action {
    /// Human wording used in Forbidden messages
    pub fn describe(self) -> &'static str {
        match self {
            Action::OpenCase => "open a case",
            Action::AssignCase => "assign a case",
            Action::CloseCase => "close this case",
            Action::DismissCase => "dismiss this case",
            Action::ArchiveCase => "archive a case",
            Action::UnarchiveCase => "unarchive a case",
            Action::CreateTask => "create a task",
            Action::CreateSupportDocument => "add a document",
            Action::ViewDocument => "view this document",
            Action::TurnInDocument => "turn in this task",
            Action::ApproveDocument => "approve this document",
            Action::RejectDocument => "reject this document",
            Action::MoveDocument => "move this task",
            Action::ReviewMoveDocument => "send this submission back",
            Action::ChangePriority => "change the priority of this task",
            Action::DeleteDocument => "delete this document",
            Action::ReclassifyRole => "change staff roles",
        }
    }

    pub fn for_case(action: CaseAction) -> Self {
        match action {
            CaseAction::Assign => Action::AssignCase,
            CaseAction::Close => Action::CloseCase,
            CaseAction::Dismiss => Action::DismissCase,
            CaseAction::Archive => Action::ArchiveCase,
            CaseAction::Unarchive => Action::UnarchiveCase,
        }
    }

    /// Permission needed for a document action, given whether the document is
    /// currently turned in
    pub fn for_document(action: DocAction, currently_done: bool) -> Self {
        match action {
            DocAction::AutoAdvance => Action::ViewDocument,
            DocAction::TurnIn { .. } => Action::TurnInDocument,
            DocAction::Approve => Action::ApproveDocument,
            DocAction::Reject => Action::RejectDocument,
            DocAction::Move(_) if currently_done => Action::ReviewMoveDocument,
            DocAction::Move(_) => Action::MoveDocument,
        }
    }
}

/// Facts about the target that some rules depend on
#[derive(Debug, Clone, Copy, Default)]
pub struct GateContext<'a> {
    /// The case being acted on, for assignment-scoped rules
    pub case: Option<&'a Case>,
    /// Whether the role board currently has at least one Admin
    pub admins_exist: bool,
}

impl<'a> GateContext<'a> {
    pub fn for_case(case: &'a Case) -> Self {
        GateContext {
            case: Some(case),
            admins_exist: true,
        }
    }

    pub fn for_board(admins_exist: bool) -> Self {
        GateContext {
            case: None,
            admins_exist,
        }
    }
}

/// Whether `actor` may perform `action`
pub fn is_allowed(actor: &Actor, action: Action, ctx: &GateContext<'_>) -> bool {
    use UserRole::*;

    match action {
        Action::OpenCase
        | Action::CreateSupportDocument
        | Action::ViewDocument
        | Action::TurnInDocument
        | Action::MoveDocument => true,

        Action::CloseCase | Action::DismissCase => match actor.role {
            Admin => true,
            Lawyer => ctx.case.is_some_and(|c| c.is_assigned_to(&actor.user_id)),
            Paralegal | Staff => false,
        },

        Action::AssignCase | Action::ArchiveCase | Action::UnarchiveCase => actor.role == Admin,

        Action::CreateTask
        | Action::ApproveDocument
        | Action::RejectDocument
        | Action::ReviewMoveDocument
        | Action::ChangePriority
        | Action::DeleteDocument => actor.role.is_reviewer(),

        Action::ReclassifyRole => match actor.role {
            Admin => true,
            Lawyer => !ctx.admins_exist,
            Paralegal | Staff => false,
        },
    }
}

/// Fail with `Forbidden` unless `actor` may perform `action`
pub fn authorize(actor: &Actor, action: Action, ctx: &GateContext<'_>) -> Result<()> {
    if is_allowed(actor, action, ctx) {
        return Ok(());
    }
    tracing::warn!(
        actor = %actor.user_id,
        role = %actor.role,
        action = action.describe(),
        "permission denied"
    );
    Err(CaseflowError::Forbidden {
        action: action.describe().to_string(),
        role: actor.role.to_string(),
    })
}
