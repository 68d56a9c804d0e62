//! Document and task lifecycle service
//!
//! Structured actions (turn in, approve, reject) and kanban moves share one
//! legality check, so a drag can never reach a state the buttons cannot.

use std::sync::Arc;

use crate::domain::{
    authorize, compute_due_date, plan_document_transition, plan_priority_change,
    validate_new_document, Action, DocRequest, GateContext,
};
use crate::errors::{CaseflowError, Result};
use crate::schemas::{
    Actor, DocStatus, DocType, Document, DocumentUpdate, NewDocument, Priority, UploadedFile,
};
use crate::store::DocumentStore;

use super::{as_transport, Clock};

pub struct DocumentWorkflow {
    documents: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
}

impl DocumentWorkflow {
    pub fn new(documents: Arc<dyn DocumentStore>, clock: Arc<dyn Clock>) -> Self {
        DocumentWorkflow { documents, clock }
    }

    /// Add a support document or task to a case. Tasks get their due date
    /// from their priority at the moment of creation.
    pub async fn create(&self, new: NewDocument, actor: &Actor) -> Result<Document> {
        let permission = match new.doc_type {
            Some(DocType::Task) => Action::CreateTask,
            _ => Action::CreateSupportDocument,
        };
        authorize(actor, permission, &GateContext::default())?;
        validate_new_document(&new).into_result()?;

        let doc_type = new.doc_type.unwrap_or(DocType::Support);
        let mut doc = Document::new(new.doc_id, new.case_id, new.doc_name, doc_type)
            .with_last_updated_by(&actor.user_id);
        doc.doc_description = new.doc_description;
        doc.doc_reference_files = new.doc_reference_files;
        doc.doc_file = new.doc_file.filter(|f| !f.trim().is_empty());

        if doc_type == DocType::Task {
            let priority = new.doc_prio_level.unwrap_or(Priority::Mid);
            doc = doc.with_schedule(priority, compute_due_date(priority, &self.clock.now()));
            doc.doc_tasked_to = new.doc_tasked_to;
            doc.doc_tasked_by = Some(actor.user_id.clone());
        }

        let created = self.documents.create_document(&doc).await.map_err(|e| {
            tracing::warn!(doc_id = %doc.doc_id, error = %e, "document could not be created");
            as_transport(e)
        })?;
        tracing::info!(
            doc_id = %created.doc_id,
            case_id = %created.case_id,
            doc_type = ?created.doc_type,
            actor = %actor.user_id,
            "document created"
        );
        Ok(created)
    }

    /// Record that `actor` opened the document. A Paralegal or Staff opening
    /// a todo task starts it; every other view is a no-op. Returns whether
    /// the document changed.
    pub async fn auto_advance_on_view(&self, doc: &mut Document, actor: &Actor) -> Result<bool> {
        self.transition(doc, DocRequest::AutoAdvance, actor).await
    }

    /// Submit finished work. A non-empty file is required.
    pub async fn turn_in(
        &self,
        doc: &mut Document,
        file: Option<&UploadedFile>,
        actor: &Actor,
    ) -> Result<()> {
        self.transition(doc, DocRequest::TurnIn { file }, actor)
            .await
            .map(|_| ())
    }

    pub async fn approve(&self, doc: &mut Document, actor: &Actor) -> Result<()> {
        self.transition(doc, DocRequest::Approve, actor).await.map(|_| ())
    }

    /// Send a submission back to todo with a reason appended to its tag
    pub async fn reject(&self, doc: &mut Document, reason: &str, actor: &Actor) -> Result<()> {
        self.transition(doc, DocRequest::Reject { reason }, actor)
            .await
            .map(|_| ())
    }

    /// Kanban drag-and-drop. Returns false when dropped on its own column.
    pub async fn move_to(&self, doc: &mut Document, target: DocStatus, actor: &Actor) -> Result<bool> {
        self.transition(doc, DocRequest::Move(target), actor).await
    }

    /// Re-prioritize a task; its due date is recomputed from now
    pub async fn change_priority(
        &self,
        doc: &mut Document,
        priority: Priority,
        actor: &Actor,
    ) -> Result<()> {
        authorize(actor, Action::ChangePriority, &GateContext::default())?;
        let patch = plan_priority_change(doc, priority, &actor.user_id, self.clock.now())?;
        self.commit(doc, &DocumentUpdate::Json(patch)).await
    }

    /// Remove a document regardless of its status
    pub async fn delete(&self, doc: &Document, actor: &Actor) -> Result<()> {
        authorize(actor, Action::DeleteDocument, &GateContext::default())?;
        self.documents
            .delete_document(&doc.doc_id)
            .await
            .map_err(as_transport)?;
        tracing::info!(doc_id = %doc.doc_id, actor = %actor.user_id, "document deleted");
        Ok(())
    }

    async fn transition(&self, doc: &mut Document, request: DocRequest<'_>, actor: &Actor) -> Result<bool> {
        let planned = plan_document_transition(actor, doc, &request, self.clock.now());
        let update = match planned {
            Ok(Some(update)) => update,
            Ok(None) => {
                tracing::debug!(doc_id = %doc.doc_id, status = %doc.doc_status, "no transition");
                return Ok(false);
            }
            Err(e) => {
                if !matches!(e, CaseflowError::Forbidden { .. }) {
                    tracing::warn!(doc_id = %doc.doc_id, error = %e, "document transition rejected");
                }
                return Err(e);
            }
        };
        self.commit(doc, &update).await?;
        Ok(true)
    }

    /// Persist `update` and adopt the stored record. `doc` is untouched if
    /// the write fails.
    async fn commit(&self, doc: &mut Document, update: &DocumentUpdate) -> Result<()> {
        let stored = self
            .documents
            .update_document(&doc.doc_id, update)
            .await
            .map_err(|e| {
                tracing::warn!(doc_id = %doc.doc_id, error = %e, "document update failed");
                as_transport(e)
            })?;

        tracing::info!(
            doc_id = %stored.doc_id,
            from = %doc.doc_status,
            to = %stored.doc_status,
            "document updated"
        );
        *doc = stored;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::UserRole;
    use crate::store::MemoryStore;
    use crate::workflow::FixedClock;
    use chrono::DateTime;

    fn setup() -> (Arc<MemoryStore>, DocumentWorkflow) {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T08:00:00+00:00").unwrap(),
        ));
        (store.clone(), DocumentWorkflow::new(store, clock))
    }

    fn new_task() -> NewDocument {
        NewDocument {
            doc_id: "d1".into(),
            case_id: "7".into(),
            doc_name: "Draft complaint".into(),
            doc_type: Some(DocType::Task),
            doc_prio_level: Some(Priority::Mid),
            doc_tasked_to: Some("p1".into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_task_schedules_due_date() {
        let (_, workflow) = setup();
        let doc = workflow
            .create(new_task(), &Actor::new("l1", UserRole::Lawyer))
            .await
            .unwrap();

        assert_eq!(doc.doc_status, DocStatus::Todo);
        assert_eq!(doc.doc_tasked_by.as_deref(), Some("l1"));
        assert_eq!(
            doc.doc_due_date,
            Some(DateTime::parse_from_rfc3339("2025-01-06T23:59:59.999+00:00").unwrap())
        );
    }

    #[tokio::test]
    async fn test_staff_cannot_create_task_but_can_add_support() {
        let (store, workflow) = setup();
        let staff = Actor::new("s1", UserRole::Staff);

        let err = workflow.create(new_task(), &staff).await.unwrap_err();
        assert_eq!(err.code(), "FORBIDDEN");
        assert_eq!(store.calls(), 0);

        let support = NewDocument {
            doc_id: "d2".into(),
            case_id: "7".into(),
            doc_name: "Retainer".into(),
            doc_type: Some(DocType::Support),
            ..Default::default()
        };
        let doc = workflow.create(support, &staff).await.unwrap();
        assert!(doc.doc_due_date.is_none());
    }

    #[tokio::test]
    async fn test_task_without_assignee_fails() {
        let (store, workflow) = setup();
        let mut new = new_task();
        new.doc_tasked_to = None;
        let err = workflow.create(new, &Actor::new("a1", UserRole::Admin)).await.unwrap_err();
        assert_eq!(err.code(), "VALIDATION_FAILURE");
        assert_eq!(store.writes(), 0);
    }

    #[tokio::test]
    async fn test_kanban_drag_to_done_needs_file() {
        let (store, workflow) = setup();
        let mut doc = Document::new("d1".into(), "7".into(), "Brief".into(), DocType::Task)
            .with_status(DocStatus::InProgress);
        store.insert_document(doc.clone());

        let err = workflow
            .move_to(&mut doc, DocStatus::Done, &Actor::new("p1", UserRole::Paralegal))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "VALIDATION_FAILURE");
        assert_eq!(doc.doc_status, DocStatus::InProgress);
        assert_eq!(store.writes(), 0);
    }

    #[tokio::test]
    async fn test_kanban_same_column_is_noop() {
        let (store, workflow) = setup();
        let mut doc = Document::new("d1".into(), "7".into(), "Brief".into(), DocType::Task);
        store.insert_document(doc.clone());

        let moved = workflow
            .move_to(&mut doc, DocStatus::Todo, &Actor::new("p1", UserRole::Paralegal))
            .await
            .unwrap();
        assert!(!moved);
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_paralegal_cannot_drag_out_of_done() {
        let (store, workflow) = setup();
        let mut doc = Document::new("d1".into(), "7".into(), "Brief".into(), DocType::Task)
            .with_status(DocStatus::Done);
        store.insert_document(doc.clone());

        let err = workflow
            .move_to(&mut doc, DocStatus::Todo, &Actor::new("p1", UserRole::Paralegal))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "FORBIDDEN");
    }

    #[tokio::test]
    async fn test_change_priority_reanchors_due_date() {
        let (store, workflow) = setup();
        let mut doc = workflow
            .create(new_task(), &Actor::new("l1", UserRole::Lawyer))
            .await
            .unwrap();

        workflow
            .change_priority(&mut doc, Priority::High, &Actor::new("l1", UserRole::Lawyer))
            .await
            .unwrap();
        assert_eq!(doc.doc_prio_level, Some(Priority::High));
        assert_eq!(
            doc.doc_due_date,
            Some(DateTime::parse_from_rfc3339("2025-01-03T23:59:59.999+00:00").unwrap())
        );
        assert_eq!(store.document("d1").unwrap().doc_prio_level, Some(Priority::High));
    }

    #[tokio::test]
    async fn test_delete_requires_reviewer() {
        let (store, workflow) = setup();
        let doc = Document::new("d1".into(), "7".into(), "Brief".into(), DocType::Support)
            .with_status(DocStatus::Approved);
        store.insert_document(doc.clone());

        let err = workflow.delete(&doc, &Actor::new("s1", UserRole::Staff)).await.unwrap_err();
        assert_eq!(err.code(), "FORBIDDEN");

        workflow.delete(&doc, &Actor::new("l1", UserRole::Lawyer)).await.unwrap();
        assert!(store.document("d1").is_none());
    }
}
