//! Document schema - Support documents and assignable tasks attached to a case

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Kind of document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocType {
    /// Passive supporting material
    Support,
    /// Actionable work item with an assignee and a due date
    Task,
}

/// Review status of a document or task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocStatus {
    Todo,
    InProgress,
    /// Turned in, waiting for review
    Done,
    /// Accepted by a reviewer. Terminal.
    Approved,
}

impl DocStatus {
    /// Statuses that still block the owning case from closing
    pub fn is_unresolved(self) -> bool {
        matches!(self, DocStatus::Todo | DocStatus::InProgress | DocStatus::Done)
    }
}

impl std::fmt::Display for DocStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocStatus::Todo => write!(f, "todo"),
            DocStatus::InProgress => write!(f, "in_progress"),
            DocStatus::Done => write!(f, "done"),
            DocStatus::Approved => write!(f, "approved"),
        }
    }
}

impl std::str::FromStr for DocStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(DocStatus::Todo),
            "in_progress" => Ok(DocStatus::InProgress),
            "done" => Ok(DocStatus::Done),
            "approved" => Ok(DocStatus::Approved),
            _ => Err(format!("Unknown document status: {}", s)),
        }
    }
}

/// Task priority, which drives the due date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Mid,
    High,
}

impl Priority {
    /// Days from "now" until the task is due
    pub fn due_in_days(self) -> i64 {
        match self {
            Priority::Low => 14,
            Priority::Mid => 5,
            Priority::High => 2,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "Low"),
            Priority::Mid => write!(f, "Mid"),
            Priority::High => write!(f, "High"),
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "mid" => Ok(Priority::Mid),
            "high" => Ok(Priority::High),
            _ => Err(format!("Unknown priority: {}", s)),
        }
    }
}

/// A file handed in with a task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub file_name: String,
    pub content: Vec<u8>,
}

impl UploadedFile {
    pub fn new(file_name: impl Into<String>, content: Vec<u8>) -> Self {
        UploadedFile {
            file_name: file_name.into(),
            content,
        }
    }

    /// A file with no name or no bytes does not count as an attachment
    pub fn is_empty(&self) -> bool {
        self.file_name.trim().is_empty() || self.content.is_empty()
    }
}

/// A document attached to exactly one case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub doc_id: String,

    /// Owning case
    pub case_id: String,

    pub doc_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_description: Option<String>,

    pub doc_type: DocType,

    pub doc_status: DocStatus,

    /// Free-form annotations, including rejection reasons
    #[serde(default)]
    pub doc_tag: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_prio_level: Option<Priority>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_due_date: Option<DateTime<FixedOffset>>,

    /// Assignee
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_tasked_to: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_tasked_by: Option<String>,

    /// Reference material attached by whoever created the task
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub doc_reference_files: Vec<String>,

    /// Submitted file
    #[serde(default)]
    pub doc_file: Option<String>,

    #[serde(default)]
    pub doc_date_submitted: Option<DateTime<FixedOffset>>,

    #[serde(default)]
    pub doc_last_updated_by: Option<String>,

    /// ISO 8601 creation timestamp
    pub created_at: String,

    /// ISO 8601 last update timestamp
    pub updated_at: String,
}

impl Document {
    /// Create a new document or task of `doc_type` in `todo`
    pub fn new(doc_id: String, case_id: String, doc_name: String, doc_type: DocType) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Document {
            doc_id,
            case_id,
            doc_name,
            doc_description: None,
            doc_type,
            doc_status: DocStatus::Todo,
            doc_tag: None,
            doc_prio_level: None,
            doc_due_date: None,
            doc_tasked_to: None,
            doc_tasked_by: None,
            doc_reference_files: Vec::new(),
            doc_file: None,
            doc_date_submitted: None,
            doc_last_updated_by: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    // ===== IMMUTABLE BUILDER METHODS =====

    /// Return a new Document with the given status, updating the timestamp
    pub fn with_status(mut self, status: DocStatus) -> Self {
        self.doc_status = status;
        self.touch_returning()
    }

    /// Return a new Document carrying a submitted file
    pub fn with_submission(mut self, file: String, submitted_at: DateTime<FixedOffset>) -> Self {
        self.doc_file = Some(file);
        self.doc_date_submitted = Some(submitted_at);
        self.touch_returning()
    }

    pub fn with_schedule(mut self, priority: Priority, due: DateTime<FixedOffset>) -> Self {
        self.doc_prio_level = Some(priority);
        self.doc_due_date = Some(due);
        self.touch_returning()
    }

    /// Return a new Document with a rejection note appended to its tag
    pub fn with_rejection(mut self, reason: &str) -> Self {
        self.doc_tag = Some(append_rejection(self.doc_tag.as_deref(), reason));
        self.touch_returning()
    }

    pub fn with_last_updated_by(mut self, actor_id: &str) -> Self {
        self.doc_last_updated_by = Some(actor_id.to_string());
        self
    }

    fn touch_returning(mut self) -> Self {
        self.updated_at = chrono::Utc::now().to_rfc3339();
        self
    }

    // ===== QUERIES =====

    pub fn is_task(&self) -> bool {
        self.doc_type == DocType::Task
    }

    /// Whether a submitted file is on record
    pub fn has_file(&self) -> bool {
        self.doc_file.as_deref().is_some_and(|f| !f.trim().is_empty())
    }
}

/// Tag value after a rejection: `"Rejected: <reason>"`, appended to any
/// existing annotation.
pub fn append_rejection(existing: Option<&str>, reason: &str) -> String {
    let note = format!("Rejected: {}", reason.trim());
    match existing {
        Some(tag) if !tag.trim().is_empty() => format!("{}; {}", tag, note),
        _ => note,
    }
}

/// Fields supplied when a document or task is added to a case
#[derive(Debug, Clone, Default)]
pub struct NewDocument {
    pub doc_id: String,
    pub case_id: String,
    pub doc_name: String,
    pub doc_description: Option<String>,
    pub doc_type: Option<DocType>,
    pub doc_prio_level: Option<Priority>,
    pub doc_tasked_to: Option<String>,
    pub doc_reference_files: Vec<String>,
    pub doc_file: Option<String>,
}
