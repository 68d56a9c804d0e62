//! Case lifecycle service

use std::sync::Arc;

use crate::domain::{authorize, can_close_case, plan_case_transition, Action, CaseRequest, GateContext};
use crate::errors::{CaseflowError, Result};
use crate::schemas::{normalize_case_tags, Actor, Case, CasePatch, CaseStatus, DEFAULT_CASE_TAGS};
use crate::store::{CaseStore, DocumentStore};

use super::as_transport;

/// Drives cases through pending → processing → completed/dismissed → archived
pub struct CaseWorkflow {
    cases: Arc<dyn CaseStore>,
    documents: Arc<dyn DocumentStore>,
    known_tags: Vec<String>,
}

impl CaseWorkflow {
    pub fn new(cases: Arc<dyn CaseStore>, documents: Arc<dyn DocumentStore>) -> Self {
        CaseWorkflow {
            cases,
            documents,
            known_tags: DEFAULT_CASE_TAGS.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// Replace the pipeline tags new cases are normalized against
    pub fn with_known_tags(mut self, tags: Vec<String>) -> Self {
        self.known_tags = tags;
        self
    }

    /// Create a new pending case from `draft`
    pub async fn open(&self, draft: Case, actor: &Actor) -> Result<Case> {
        authorize(actor, Action::OpenCase, &GateContext::default())?;
        if draft.case_id.trim().is_empty() {
            return Err(CaseflowError::validation("case id is required"));
        }
        if draft.case_title.trim().is_empty() {
            return Err(CaseflowError::validation("case title is required"));
        }

        let tags = normalize_case_tags(&draft.case_tag_list, &self.known_tags);
        let case = draft
            .with_status(CaseStatus::Pending)
            .with_tags(tags)
            .with_last_updated_by(&actor.user_id);

        let created = self.cases.create_case(&case).await.map_err(|e| {
            tracing::warn!(case_id = %case.case_id, error = %e, "case could not be created");
            as_transport(e)
        })?;
        tracing::info!(case_id = %created.case_id, actor = %actor.user_id, "case opened");
        Ok(created)
    }

    /// Assign a lawyer; moves a pending case into processing
    pub async fn assign(&self, case: &mut Case, lawyer_id: &str, actor: &Actor) -> Result<()> {
        self.transition(case, CaseRequest::Assign { lawyer_id }, actor).await
    }

    /// Close a processing case with a verdict once every document is approved
    pub async fn close(&self, case: &mut Case, verdict: &str, actor: &Actor) -> Result<()> {
        self.transition(case, CaseRequest::Close { verdict }, actor).await
    }

    pub async fn dismiss(&self, case: &mut Case, actor: &Actor) -> Result<()> {
        self.transition(case, CaseRequest::Dismiss, actor).await
    }

    pub async fn archive(&self, case: &mut Case, actor: &Actor) -> Result<()> {
        self.transition(case, CaseRequest::Archive, actor).await
    }

    /// Restore an archived case. The result is always `Completed`, whichever
    /// resolution was archived.
    pub async fn unarchive(&self, case: &mut Case, actor: &Actor) -> Result<()> {
        self.transition(case, CaseRequest::Unarchive, actor).await
    }

    async fn transition(&self, case: &mut Case, request: CaseRequest<'_>, actor: &Actor) -> Result<()> {
        let action = request.action();
        authorize(actor, Action::for_case(action), &GateContext::for_case(case))?;

        let patch = plan_case_transition(case, &request, &actor.user_id).map_err(|e| {
            tracing::warn!(case_id = %case.case_id, %action, error = %e, "case transition rejected");
            e
        })?;

        if let CaseRequest::Close { .. } = request {
            let documents = self
                .documents
                .list_documents(&case.case_id)
                .await
                .map_err(as_transport)?;
            if let Err(e) = can_close_case(&case.case_id, &documents) {
                tracing::warn!(case_id = %case.case_id, error = %e, "case close blocked");
                return Err(e);
            }
        }

        self.commit(case, &patch).await
    }

    /// Persist `patch` and adopt the stored record. `case` is untouched if
    /// the write fails.
    async fn commit(&self, case: &mut Case, patch: &CasePatch) -> Result<()> {
        let stored = self
            .cases
            .update_case(&case.case_id, patch)
            .await
            .map_err(|e| {
                tracing::warn!(case_id = %case.case_id, error = %e, "case update failed");
                as_transport(e)
            })?;

        tracing::info!(
            case_id = %stored.case_id,
            from = %case.case_status,
            to = %stored.case_status,
            actor = %patch.last_updated_by,
            "case updated"
        );
        *case = stored;
        Ok(())
    }
}
