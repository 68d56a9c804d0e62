//! Domain logic for case and document workflows
//!
//! Everything here is pure: legality tables, authorization, validation and the
//! due-date scheduler. The async services in `workflow` sequence these checks
//! around calls to the persistence backend.

pub mod permissions;
mod scheduler;
mod states;
mod transitions;
mod validation;


pub use permissions::{authorize, is_allowed, Action, GateContext};
pub use scheduler::{compute_due_date, end_of_day};
pub use states::{
    get_allowed_case_actions, get_allowed_next_doc_statuses, is_resolved_case_status,
    is_terminal_doc_status, next_case_status, CaseAction, DocAction, CASE_STATES, DOCUMENT_STATES,
};
pub use transitions::{
    apply_case_transition, apply_document_transition, plan_case_transition,
    plan_document_transition, plan_priority_change, CaseRequest, DocRequest,
};
pub use validation::{
    blocking_documents, can_close_case, can_enter_done, validate_case_action,
    validate_document_transition, validate_new_document, validate_rejection_reason,
    validate_verdict, ValidationResult,
};
