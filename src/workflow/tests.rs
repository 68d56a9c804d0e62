//! Scenario tests across the workflow services

use std::sync::Arc;

use chrono::{DateTime, Duration};

use super::*;
use crate::schemas::{
    Actor, Case, CaseStatus, DocStatus, DocType, Document, NewDocument, Priority, Resolution,
    StaffUser, UploadedFile, UserRole,
};
use crate::store::MemoryStore;

struct Harness {
    store: Arc<MemoryStore>,
    clock: Arc<FixedClock>,
    cases: CaseWorkflow,
    documents: DocumentWorkflow,
}

fn harness() -> Harness {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(FixedClock::new(
        DateTime::parse_from_rfc3339("2025-01-01T08:00:00+00:00").unwrap(),
    ));
    Harness {
        cases: CaseWorkflow::new(store.clone(), store.clone()),
        documents: DocumentWorkflow::new(store.clone(), clock.clone()),
        store,
        clock,
    }
}

fn admin() -> Actor {
    Actor::new("a1", UserRole::Admin)
}

fn lawyer() -> Actor {
    Actor::new("l1", UserRole::Lawyer)
}

fn paralegal() -> Actor {
    Actor::new("p1", UserRole::Paralegal)
}

fn processing_case(store: &MemoryStore) -> Case {
    let case = Case::new("7".into(), "Doe v. Roe".into())
        .with_assignment("l1".into(), "a1".into())
        .with_status(CaseStatus::Processing);
    store.insert_case(case.clone());
    case
}

fn task(id: &str, status: DocStatus) -> Document {
    let mut doc = Document::new(id.into(), "7".into(), "Brief".into(), DocType::Task).with_status(status);
    if matches!(status, DocStatus::Done | DocStatus::Approved) {
        doc.doc_file = Some(format!("{}.pdf", id));
    }
    doc
}

fn pdf() -> UploadedFile {
    UploadedFile::new("brief.pdf", b"%PDF-1.7".to_vec())
}

// ===== CASES =====

#[tokio::test]
async fn test_case_seven_closes_after_last_approval() {
    let h = harness();
    let mut case = processing_case(&h.store);
    h.store.insert_document(task("d1", DocStatus::Approved));
    let mut pending = task("d2", DocStatus::Done);
    h.store.insert_document(pending.clone());

    let err = h.cases.close(&mut case, "Settled", &lawyer()).await.unwrap_err();
    assert_eq!(err.code(), "BLOCKED_BY_PENDING_WORK");
    assert!(err.to_string().contains("d2"));
    assert_eq!(case.case_status, CaseStatus::Processing);
    assert_eq!(h.store.case("7").unwrap().case_status, CaseStatus::Processing);

    h.documents.approve(&mut pending, &lawyer()).await.unwrap();
    assert_eq!(pending.doc_status, DocStatus::Approved);

    h.cases.close(&mut case, "Settled", &lawyer()).await.unwrap();
    assert_eq!(case.case_status, CaseStatus::Completed);
    assert_eq!(case.case_verdict.as_deref(), Some("Settled"));
    assert_eq!(case.last_updated_by.as_deref(), Some("l1"));
}

#[tokio::test]
async fn test_support_documents_also_block_close() {
    let h = harness();
    let mut case = processing_case(&h.store);
    h.store.insert_document(Document::new("s1".into(), "7".into(), "Retainer".into(), DocType::Support));

    let err = h.cases.close(&mut case, "Settled", &admin()).await.unwrap_err();
    assert_eq!(err.code(), "BLOCKED_BY_PENDING_WORK");
}

#[tokio::test]
async fn test_close_with_no_documents_succeeds() {
    let h = harness();
    let mut case = processing_case(&h.store);
    h.cases.close(&mut case, "Won", &admin()).await.unwrap();
    assert_eq!(case.case_status, CaseStatus::Completed);
}

#[tokio::test]
async fn test_unassigned_lawyer_cannot_close() {
    let h = harness();
    let mut case = processing_case(&h.store);
    let err = h
        .cases
        .close(&mut case, "Won", &Actor::new("l2", UserRole::Lawyer))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "FORBIDDEN");
    assert_eq!(h.store.calls(), 0);
}

#[tokio::test]
async fn test_archive_pending_fails_without_calls() {
    let h = harness();
    let mut case = Case::new("7".into(), "Doe v. Roe".into());
    h.store.insert_case(case.clone());
    let before = case.clone();

    let err = h.cases.archive(&mut case, &admin()).await.unwrap_err();
    assert_eq!(err.code(), "VALIDATION_FAILURE");
    assert_eq!(case, before);
    assert_eq!(h.store.calls(), 0);
}

#[tokio::test]
async fn test_lawyer_cannot_archive() {
    let h = harness();
    let mut case = processing_case(&h.store).with_status(CaseStatus::Completed);
    let err = h.cases.archive(&mut case, &lawyer()).await.unwrap_err();
    assert_eq!(err.code(), "FORBIDDEN");
}

#[tokio::test]
async fn test_unarchive_dismissed_restores_completed() {
    let h = harness();
    let mut case = Case::new("7".into(), "Doe v. Roe".into())
        .with_status(CaseStatus::Archived(Resolution::Dismissed));
    h.store.insert_case(case.clone());

    h.cases.unarchive(&mut case, &admin()).await.unwrap();
    assert_eq!(case.case_status, CaseStatus::Completed);
}

#[tokio::test]
async fn test_transport_failure_leaves_case_unchanged() {
    let h = harness();
    let mut case = processing_case(&h.store);
    let before = case.clone();
    h.store.set_fail_writes(true);

    let err = h.cases.dismiss(&mut case, &admin()).await.unwrap_err();
    assert_eq!(err.code(), "TRANSPORT_FAILURE");
    assert_eq!(case, before);
    assert_eq!(h.store.case("7").unwrap().case_status, CaseStatus::Processing);
}

// ===== DOCUMENTS =====

#[tokio::test]
async fn test_mid_task_due_date() {
    let h = harness();
    let new = NewDocument {
        doc_id: "d1".into(),
        case_id: "7".into(),
        doc_name: "Discovery requests".into(),
        doc_type: Some(DocType::Task),
        doc_prio_level: Some(Priority::Mid),
        doc_tasked_to: Some("p1".into()),
        ..Default::default()
    };
    let doc = h.documents.create(new, &lawyer()).await.unwrap();
    assert_eq!(
        doc.doc_due_date,
        Some(DateTime::parse_from_rfc3339("2025-01-06T23:59:59.999+00:00").unwrap())
    );
}

#[tokio::test]
async fn test_full_task_lifecycle() {
    let h = harness();
    let mut doc = task("d1", DocStatus::Todo);
    h.store.insert_document(doc.clone());

    assert!(h.documents.auto_advance_on_view(&mut doc, &paralegal()).await.unwrap());
    assert_eq!(doc.doc_status, DocStatus::InProgress);

    h.clock.advance(Duration::hours(3));
    h.documents.turn_in(&mut doc, Some(&pdf()), &paralegal()).await.unwrap();
    assert_eq!(doc.doc_status, DocStatus::Done);
    assert_eq!(doc.doc_file.as_deref(), Some("brief.pdf"));
    assert_eq!(
        doc.doc_date_submitted,
        Some(DateTime::parse_from_rfc3339("2025-01-01T11:00:00+00:00").unwrap())
    );
    assert_eq!(doc.doc_last_updated_by.as_deref(), Some("p1"));

    h.documents.reject(&mut doc, "missing exhibit", &lawyer()).await.unwrap();
    assert_eq!(doc.doc_status, DocStatus::Todo);
    assert_eq!(doc.doc_tag.as_deref(), Some("Rejected: missing exhibit"));
    assert_eq!(doc.doc_file.as_deref(), Some("brief.pdf"));

    // A previously attached file lets the card be dragged straight to done
    assert!(h.documents.move_to(&mut doc, DocStatus::Done, &paralegal()).await.unwrap());
    h.documents.approve(&mut doc, &admin()).await.unwrap();
    assert_eq!(h.store.document("d1").unwrap().doc_status, DocStatus::Approved);
}

#[tokio::test]
async fn test_auto_advance_is_idempotent() {
    let h = harness();
    let mut doc = task("d1", DocStatus::Todo);
    h.store.insert_document(doc.clone());

    assert!(h.documents.auto_advance_on_view(&mut doc, &paralegal()).await.unwrap());
    assert!(!h.documents.auto_advance_on_view(&mut doc, &paralegal()).await.unwrap());
    assert_eq!(h.store.writes(), 1);
}

#[tokio::test]
async fn test_reviewer_view_does_not_advance() {
    let h = harness();
    let mut doc = task("d1", DocStatus::Todo);
    h.store.insert_document(doc.clone());

    assert!(!h.documents.auto_advance_on_view(&mut doc, &lawyer()).await.unwrap());
    assert_eq!(doc.doc_status, DocStatus::Todo);
    assert_eq!(h.store.calls(), 0);
}

#[tokio::test]
async fn test_viewing_support_document_writes_nothing() {
    let h = harness();
    let mut doc = Document::new("s1".into(), "7".into(), "Retainer".into(), DocType::Support);
    h.store.insert_document(doc.clone());

    assert!(!h.documents.auto_advance_on_view(&mut doc, &paralegal()).await.unwrap());
    assert_eq!(doc.doc_status, DocStatus::Todo);
    assert_eq!(h.store.writes(), 0);
    assert_eq!(h.store.document("s1").unwrap().doc_status, DocStatus::Todo);
}

#[tokio::test]
async fn test_task_created_with_file_cannot_skip_turn_in() {
    let h = harness();
    let new = NewDocument {
        doc_id: "d1".into(),
        case_id: "7".into(),
        doc_name: "Answer".into(),
        doc_type: Some(DocType::Task),
        doc_prio_level: Some(Priority::Mid),
        doc_tasked_to: Some("p1".into()),
        doc_file: Some("template.pdf".into()),
        ..Default::default()
    };
    let err = h.documents.create(new.clone(), &lawyer()).await.unwrap_err();
    assert_eq!(err.code(), "VALIDATION_FAILURE");
    assert_eq!(h.store.writes(), 0);

    // Without the file the task starts empty, so a drag to done is refused
    let mut doc = h
        .documents
        .create(
            NewDocument {
                doc_file: None,
                doc_reference_files: vec!["template.pdf".into()],
                ..new
            },
            &lawyer(),
        )
        .await
        .unwrap();
    let err = h.documents.move_to(&mut doc, DocStatus::Done, &paralegal()).await.unwrap_err();
    assert_eq!(err.code(), "VALIDATION_FAILURE");
    assert!(doc.doc_file.is_none());
    assert!(doc.doc_date_submitted.is_none());
}

#[tokio::test]
async fn test_turn_in_without_file_fails() {
    let h = harness();
    let mut doc = task("d1", DocStatus::InProgress);
    h.store.insert_document(doc.clone());

    let err = h.documents.turn_in(&mut doc, None, &paralegal()).await.unwrap_err();
    assert_eq!(err.code(), "VALIDATION_FAILURE");
    assert_eq!(doc.doc_status, DocStatus::InProgress);
    assert_eq!(h.store.writes(), 0);
}

#[tokio::test]
async fn test_approve_todo_fails() {
    let h = harness();
    let mut doc = task("d1", DocStatus::Todo);
    h.store.insert_document(doc.clone());

    let err = h.documents.approve(&mut doc, &lawyer()).await.unwrap_err();
    assert_eq!(err.code(), "VALIDATION_FAILURE");
    assert_eq!(doc.doc_status, DocStatus::Todo);
}

#[tokio::test]
async fn test_paralegal_cannot_approve() {
    let h = harness();
    let mut doc = task("d1", DocStatus::Done);
    h.store.insert_document(doc.clone());

    let err = h.documents.approve(&mut doc, &paralegal()).await.unwrap_err();
    assert_eq!(err.code(), "FORBIDDEN");
    assert_eq!(h.store.calls(), 0);
}

#[tokio::test]
async fn test_nothing_leaves_approved() {
    let h = harness();
    let mut doc = task("d1", DocStatus::Approved);
    h.store.insert_document(doc.clone());

    let err = h.documents.move_to(&mut doc, DocStatus::Todo, &admin()).await.unwrap_err();
    assert_eq!(err.code(), "VALIDATION_FAILURE");
    let err = h.documents.move_to(&mut doc, DocStatus::Approved, &admin()).await.unwrap_err();
    assert_eq!(err.code(), "VALIDATION_FAILURE");
    assert_eq!(h.store.writes(), 0);
}

#[tokio::test]
async fn test_transport_failure_leaves_document_unchanged() {
    let h = harness();
    let mut doc = task("d1", DocStatus::InProgress);
    h.store.insert_document(doc.clone());
    let before = doc.clone();
    h.store.set_fail_writes(true);

    let err = h.documents.turn_in(&mut doc, Some(&pdf()), &paralegal()).await.unwrap_err();
    assert_eq!(err.code(), "TRANSPORT_FAILURE");
    assert_eq!(doc, before);
}

#[tokio::test]
async fn test_approve_reject_race_last_write_wins() {
    let h = harness();
    let original = task("d1", DocStatus::Done);
    h.store.insert_document(original.clone());

    // Two reviewers act on the same stale copy
    let mut seen_by_admin = original.clone();
    let mut seen_by_lawyer = original.clone();

    h.documents.approve(&mut seen_by_admin, &admin()).await.unwrap();
    h.documents
        .reject(&mut seen_by_lawyer, "wrong venue", &lawyer())
        .await
        .unwrap();

    let stored = h.store.document("d1").unwrap();
    assert_eq!(stored.doc_status, DocStatus::Todo);
    assert_eq!(stored.doc_tag.as_deref(), Some("Rejected: wrong venue"));
    assert_eq!(seen_by_admin.doc_status, DocStatus::Approved);
}

#[tokio::test]
async fn test_concurrent_updates_on_distinct_documents() {
    let h = Arc::new(harness());
    for id in ["d1", "d2", "d3", "d4"] {
        h.store.insert_document(task(id, DocStatus::Done));
    }

    let mut handles = Vec::new();
    for id in ["d1", "d2", "d3", "d4"] {
        let h = h.clone();
        handles.push(tokio::spawn(async move {
            let mut doc = task(id, DocStatus::Done);
            h.documents.approve(&mut doc, &admin()).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    for id in ["d1", "d2", "d3", "d4"] {
        assert_eq!(h.store.document(id).unwrap().doc_status, DocStatus::Approved);
    }
}

// ===== ROLE BOARD =====

fn roster(admins: &[&str], lawyers: &[&str]) -> Vec<StaffUser> {
    admins
        .iter()
        .map(|id| StaffUser::new(*id, *id, UserRole::Admin))
        .chain(lawyers.iter().map(|id| StaffUser::new(*id, *id, UserRole::Lawyer)))
        .collect()
}

fn board_with(users: &[StaffUser]) -> (Arc<MemoryStore>, RoleBoard) {
    let store = Arc::new(MemoryStore::new());
    for user in users {
        store.insert_user(user.clone());
    }
    (store.clone(), RoleBoard::from_roster(users, store))
}

#[tokio::test]
async fn test_last_admin_cannot_be_demoted() {
    let (store, mut board) = board_with(&roster(&["a1"], &["l1"]));

    let err = board
        .reclassify("a1", BoardSet::Admins, BoardSet::Lawyers, &admin())
        .await
        .unwrap_err();
    assert_eq!(err.code(), "LAST_ADMIN_VIOLATION");
    assert_eq!(board.admins().len(), 1);
    assert_eq!(store.writes(), 0);
}

#[tokio::test]
async fn test_demote_one_of_two_admins() {
    let (store, mut board) = board_with(&roster(&["a1", "a2"], &[]));

    board
        .reclassify("a2", BoardSet::Admins, BoardSet::Lawyers, &admin())
        .await
        .unwrap();
    assert_eq!(board.admins().len(), 1);
    assert_eq!(board.admins()[0].user_id, "a1");
    assert_eq!(board.lawyers()[0].user_id, "a2");
    assert_eq!(board.lawyers()[0].user_role, UserRole::Lawyer);
    assert_eq!(store.user("a2").unwrap().user_role, UserRole::Lawyer);
}

#[tokio::test]
async fn test_bootstrap_promotion_then_forbidden() {
    let (_, mut board) = board_with(&roster(&[], &["l1", "l2"]));

    // No Admin yet: a Lawyer may promote a peer
    board
        .reclassify("l1", BoardSet::Lawyers, BoardSet::Admins, &Actor::new("l2", UserRole::Lawyer))
        .await
        .unwrap();
    assert_eq!(board.admins().len(), 1);

    // An Admin now exists, so the Lawyer exception is gone
    let err = board
        .reclassify("l1", BoardSet::Admins, BoardSet::Lawyers, &Actor::new("l2", UserRole::Lawyer))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "FORBIDDEN");
    assert_eq!(board.admins().len(), 1);
}

#[tokio::test]
async fn test_role_update_failure_leaves_board_unchanged() {
    let (store, mut board) = board_with(&roster(&["a1"], &["l1"]));
    store.set_fail_writes(true);

    let err = board
        .reclassify("l1", BoardSet::Lawyers, BoardSet::Admins, &admin())
        .await
        .unwrap_err();
    assert_eq!(err.code(), "TRANSPORT_FAILURE");
    assert_eq!(board.admins().len(), 1);
    assert_eq!(board.lawyers().len(), 1);
}

#[tokio::test]
async fn test_staff_cannot_reclassify_even_without_admins() {
    let (store, mut board) = board_with(&roster(&[], &["l1"]));
    let err = board
        .reclassify("l1", BoardSet::Lawyers, BoardSet::Admins, &Actor::new("s1", UserRole::Staff))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "FORBIDDEN");
    assert_eq!(store.calls(), 0);
}
