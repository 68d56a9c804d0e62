//! Case schema - A legal matter and its lifecycle status

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Default pipeline tags, in display order
pub const DEFAULT_CASE_TAGS: &[&str] = &[
    "Case Intake",
    "Case Assessment",
    "Case Preparation",
    "Pre-Trial",
    "Trial",
    "Case Closing",
];

/// Terminal outcome a case can be archived from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    Completed,
    Dismissed,
}

/// Lifecycle status of a case
///
/// Archived cases remember which terminal status preceded archival.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum CaseStatus {
    /// Created, no lawyer assigned yet
    Pending,
    /// Assigned and being worked
    Processing,
    /// Closed with a verdict
    Completed,
    /// Dismissed without a verdict
    Dismissed,
    /// Archived after reaching a terminal status
    Archived(Resolution),
}

impl CaseStatus {
    /// Every status, in lifecycle order
    pub const ALL: [CaseStatus; 6] = [
        CaseStatus::Pending,
        CaseStatus::Processing,
        CaseStatus::Completed,
        CaseStatus::Dismissed,
        CaseStatus::Archived(Resolution::Completed),
        CaseStatus::Archived(Resolution::Dismissed),
    ];

    pub fn is_archived(self) -> bool {
        matches!(self, CaseStatus::Archived(_))
    }

    /// The resolution this status represents, if it is a terminal one
    pub fn resolution(self) -> Option<Resolution> {
        match self {
            CaseStatus::Completed => Some(Resolution::Completed),
            CaseStatus::Dismissed => Some(Resolution::Dismissed),
            _ => None,
        }
    }
}

impl std::fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaseStatus::Pending => write!(f, "pending"),
            CaseStatus::Processing => write!(f, "processing"),
            CaseStatus::Completed => write!(f, "completed"),
            CaseStatus::Dismissed => write!(f, "dismissed"),
            CaseStatus::Archived(Resolution::Completed) => write!(f, "archived_completed"),
            CaseStatus::Archived(Resolution::Dismissed) => write!(f, "archived_dismissed"),
        }
    }
}

impl std::str::FromStr for CaseStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(CaseStatus::Pending),
            "processing" => Ok(CaseStatus::Processing),
            "completed" => Ok(CaseStatus::Completed),
            "dismissed" => Ok(CaseStatus::Dismissed),
            "archived_completed" => Ok(CaseStatus::Archived(Resolution::Completed)),
            "archived_dismissed" => Ok(CaseStatus::Archived(Resolution::Dismissed)),
            _ => Err(format!("Unknown case status: {}", s)),
        }
    }
}

impl From<CaseStatus> for String {
    fn from(status: CaseStatus) -> Self {
        status.to_string()
    }
}

impl TryFrom<String> for CaseStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A legal matter tracked from intake to closure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    /// Externally assigned identifier
    pub case_id: String,

    pub case_title: String,

    pub case_status: CaseStatus,

    /// Verdict recorded when the case is closed
    #[serde(default)]
    pub case_verdict: Option<String>,

    #[serde(default)]
    pub case_fee: Decimal,

    /// Outstanding amount; kept within [0, fee] by the payment side
    #[serde(default)]
    pub case_balance: Decimal,

    /// Display-only pipeline position. Stored values may be a JSON array or a
    /// JSON-encoded string holding one; anything else reads as empty.
    #[serde(default, deserialize_with = "lenient_tag_list")]
    pub case_tag_list: Vec<String>,

    /// Assigned lawyer (None = unassigned)
    #[serde(default)]
    pub user_id: Option<String>,

    #[serde(default)]
    pub assigned_by: Option<String>,

    #[serde(default)]
    pub last_updated_by: Option<String>,

    /// ISO 8601 creation timestamp
    pub created_at: String,

    /// ISO 8601 last update timestamp
    pub updated_at: String,
}

impl Case {
    /// Create a new pending case
    pub fn new(case_id: String, case_title: String) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Case {
            case_id,
            case_title,
            case_status: CaseStatus::Pending,
            case_verdict: None,
            case_fee: Decimal::ZERO,
            case_balance: Decimal::ZERO,
            case_tag_list: Vec::new(),
            user_id: None,
            assigned_by: None,
            last_updated_by: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    // ===== IMMUTABLE BUILDER METHODS =====

    /// Return a new Case with the given status, updating the timestamp
    pub fn with_status(mut self, status: CaseStatus) -> Self {
        self.case_status = status;
        self.touch_returning()
    }

    pub fn with_verdict(mut self, verdict: Option<String>) -> Self {
        self.case_verdict = verdict;
        self.touch_returning()
    }

    /// Return a new Case assigned to a lawyer
    pub fn with_assignment(mut self, lawyer_id: String, assigned_by: String) -> Self {
        self.user_id = Some(lawyer_id);
        self.assigned_by = Some(assigned_by);
        self.touch_returning()
    }

    pub fn with_fee(mut self, fee: Decimal, balance: Decimal) -> Self {
        self.case_fee = fee;
        self.case_balance = balance;
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.case_tag_list = tags;
        self
    }

    pub fn with_last_updated_by(mut self, actor_id: &str) -> Self {
        self.last_updated_by = Some(actor_id.to_string());
        self
    }

    fn touch_returning(mut self) -> Self {
        self.updated_at = chrono::Utc::now().to_rfc3339();
        self
    }

    // ===== DERIVED VALUES =====

    /// Remaining balance to display, if any is owed
    pub fn remaining_balance(&self) -> Option<Decimal> {
        if self.case_balance > Decimal::ZERO && self.case_balance <= self.case_fee {
            Some(self.case_balance)
        } else {
            None
        }
    }

    /// Tag list restricted to known tags, falling back to the first and last
    /// known tag
    pub fn display_tags(&self, known: &[String]) -> Vec<String> {
        normalize_case_tags(&self.case_tag_list, known)
    }

    /// Whether `user_id` is the lawyer assigned to this case
    pub fn is_assigned_to(&self, user_id: &str) -> bool {
        self.user_id.as_deref() == Some(user_id)
    }
}

/// Keep only known tags, in the order given. An empty result falls back to
/// the first and last known tag.
pub fn normalize_case_tags(tags: &[String], known: &[String]) -> Vec<String> {
    let kept: Vec<String> = tags
        .iter()
        .filter(|t| known.contains(t))
        .cloned()
        .collect();
    if !kept.is_empty() {
        return kept;
    }
    match (known.first(), known.last()) {
        (Some(first), Some(last)) if first != last => vec![first.clone(), last.clone()],
        (Some(first), _) => vec![first.clone()],
        _ => Vec::new(),
    }
}

fn lenient_tag_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(tags_from_value(&value))
}

fn tags_from_value(value: &serde_json::Value) -> Vec<String> {
    match value {
        serde_json::Value::Array(items) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        serde_json::Value::String(raw) => match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(inner @ serde_json::Value::Array(_)) => tags_from_value(&inner),
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}
