//! Update payloads sent to the persistence backend

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::case::{Case, CaseStatus};
use super::document::{DocStatus, Document, Priority, UploadedFile};

/// Partial case record for a status change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CasePatch {
    pub case_status: CaseStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_verdict: Option<String>,

    /// New assignee, only sent on assignment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_by: Option<String>,

    pub last_updated_by: String,
}

impl CasePatch {
    pub fn status(case_status: CaseStatus, actor_id: &str) -> Self {
        CasePatch {
            case_status,
            case_verdict: None,
            user_id: None,
            assigned_by: None,
            last_updated_by: actor_id.to_string(),
        }
    }

    /// The record a backend would hold after applying this patch
    pub fn apply_to(&self, case: Case) -> Case {
        let mut next = case.with_status(self.case_status);
        if let Some(verdict) = &self.case_verdict {
            next.case_verdict = Some(verdict.clone());
        }
        if let Some(lawyer) = &self.user_id {
            next.user_id = Some(lawyer.clone());
        }
        if let Some(by) = &self.assigned_by {
            next.assigned_by = Some(by.clone());
        }
        next.with_last_updated_by(&self.last_updated_by)
    }
}

/// Partial document record sent as JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_status: Option<DocStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_tag: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_prio_level: Option<Priority>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_due_date: Option<DateTime<FixedOffset>>,

    pub doc_last_updated_by: String,
}

impl DocumentPatch {
    pub fn status(doc_status: DocStatus, actor_id: &str) -> Self {
        DocumentPatch {
            doc_status: Some(doc_status),
            doc_tag: None,
            doc_prio_level: None,
            doc_due_date: None,
            doc_last_updated_by: actor_id.to_string(),
        }
    }

    pub fn apply_to(&self, doc: Document) -> Document {
        let mut next = match self.doc_status {
            Some(status) => doc.with_status(status),
            None => doc,
        };
        if let Some(tag) = &self.doc_tag {
            next.doc_tag = Some(tag.clone());
        }
        if let Some(priority) = self.doc_prio_level {
            next.doc_prio_level = Some(priority);
        }
        if let Some(due) = self.doc_due_date {
            next.doc_due_date = Some(due);
        }
        next.with_last_updated_by(&self.doc_last_updated_by)
    }
}

/// Multipart turn-in submission
#[derive(Debug, Clone, PartialEq)]
pub struct TurnInPayload {
    pub doc_status: DocStatus,
    pub doc_file: UploadedFile,
    pub doc_date_submitted: DateTime<FixedOffset>,
    pub doc_last_updated_by: String,
}

impl TurnInPayload {
    /// Apply the submission, recording the file under `stored_as`
    pub fn apply_to(&self, doc: Document, stored_as: String) -> Document {
        doc.with_submission(stored_as, self.doc_date_submitted)
            .with_status(self.doc_status)
            .with_last_updated_by(&self.doc_last_updated_by)
    }
}

/// A document update in either of the two wire shapes
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentUpdate {
    Json(DocumentPatch),
    Multipart(TurnInPayload),
}
