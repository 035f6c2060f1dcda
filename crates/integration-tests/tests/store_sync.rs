//! Store synchronization tests against the stub upstream API.
//!
//! Each store mirrors the server's returned representations verbatim:
//! listings land in server order, creations are appended under their
//! server-assigned ids, and mutations replace exactly the matching record.

use secrecy::SecretString;

use tutorhub_core::{AssignmentStatus, Role, SubjectId, UserId};
use tutorhub_integration_tests::StubApi;
use tutorhub_portal::api::{ApiClient, NewAssignment, NewComment, SubjectPayload, UploadedFile};
use tutorhub_portal::store::{
    AssignmentStore, CommentStore, StoreError, SubjectStore,
};

struct Harness {
    stub: StubApi,
    api: ApiClient,
    student: UserId,
    tutor: UserId,
    admin: UserId,
    subject: SubjectId,
}

impl Harness {
    async fn new() -> Self {
        let stub = StubApi::new();
        let student = stub.seed_user("Sam Student", "sam@example.com", Role::Student);
        let tutor = stub.seed_user("Tina Tutor", "tina@example.com", Role::Tutor);
        let admin = stub.seed_user("Ada Admin", "ada@example.com", Role::Admin);
        let subject = stub.seed_subject("Algebra");

        let base_url = stub.spawn().await;
        let api = ApiClient::new(base_url).expect("api client");

        Self {
            stub,
            api,
            student,
            tutor,
            admin,
            subject,
        }
    }

    fn token(&self, user: UserId) -> SecretString {
        SecretString::from(StubApi::token_for(user))
    }
}

#[tokio::test]
async fn test_fetch_mirrors_server_listing_in_order() {
    let h = Harness::new().await;
    let first = h.stub.seed_assignment("Algebra HW", h.student, h.subject);
    let second = h.stub.seed_assignment("Geometry HW", h.student, h.subject);

    let store = AssignmentStore::new();
    let fetched = store
        .fetch_all(&h.api, &h.token(h.student))
        .await
        .expect("fetch");

    assert_eq!(fetched.len(), 2);
    assert_eq!(fetched[0].id, first);
    assert_eq!(fetched[1].id, second);

    let snapshot = store.snapshot().await;
    assert_eq!(snapshot.assignments, fetched);
    assert!(!snapshot.phase.loading);
    assert!(snapshot.phase.error.is_none());
}

#[tokio::test]
async fn test_listing_is_scoped_to_the_session() {
    let h = Harness::new().await;
    h.stub.seed_assignment("Algebra HW", h.student, h.subject);

    // The tutor has nothing assigned yet, so their listing is empty.
    let store = AssignmentStore::new();
    let fetched = store
        .fetch_all(&h.api, &h.token(h.tutor))
        .await
        .expect("fetch");
    assert!(fetched.is_empty());
}

#[tokio::test]
async fn test_create_appends_under_server_id() {
    let h = Harness::new().await;
    let store = AssignmentStore::new();
    store
        .fetch_all(&h.api, &h.token(h.student))
        .await
        .expect("fetch");

    let created = store
        .create(
            &h.api,
            &h.token(h.student),
            NewAssignment {
                title: "Algebra HW".to_owned(),
                description: None,
                submission_text: Some("See attached".to_owned()),
                subject_id: h.subject,
                file: None,
            },
        )
        .await
        .expect("create");

    assert_eq!(created.status, AssignmentStatus::Submitted);
    assert_eq!(created.student_id, h.student);

    // Appended locally under the server id, and present server-side.
    let snapshot = store.snapshot().await;
    assert_eq!(snapshot.assignments.len(), 1);
    assert_eq!(snapshot.assignments[0].id, created.id);
    assert!(h.stub.assignment(created.id).is_some());
}

#[tokio::test]
async fn test_assign_tutor_replaces_exactly_one_record() {
    let h = Harness::new().await;
    let target = h.stub.seed_assignment("Algebra HW", h.student, h.subject);
    let other = h.stub.seed_assignment("Geometry HW", h.student, h.subject);

    let store = AssignmentStore::new();
    let admin_token = h.token(h.admin);
    store.fetch_all(&h.api, &admin_token).await.expect("fetch");

    let updated = store
        .assign_tutor(&h.api, &admin_token, target, h.tutor)
        .await
        .expect("assign");

    assert_eq!(updated.status, AssignmentStatus::Assigned);
    assert_eq!(updated.tutor_id, Some(h.tutor));
    assert!(updated.tutor_reference_consistent());

    let snapshot = store.snapshot().await;
    let assigned = snapshot
        .assignments
        .iter()
        .find(|a| a.id == target)
        .expect("target present");
    let untouched = snapshot
        .assignments
        .iter()
        .find(|a| a.id == other)
        .expect("other present");
    assert_eq!(assigned.status, AssignmentStatus::Assigned);
    assert_eq!(untouched.status, AssignmentStatus::Submitted);
    assert!(untouched.tutor_id.is_none());
}

#[tokio::test]
async fn test_status_update_applies_server_representation() {
    let h = Harness::new().await;
    let id = h.stub.seed_assignment("Algebra HW", h.student, h.subject);

    let store = AssignmentStore::new();
    let admin_token = h.token(h.admin);
    store
        .assign_tutor(&h.api, &admin_token, id, h.tutor)
        .await
        .expect("assign");

    let tutor_token = h.token(h.tutor);
    let updated = store
        .update_status(
            &h.api,
            &tutor_token,
            id,
            AssignmentStatus::InProgress,
            Some("Started the review".to_owned()),
        )
        .await
        .expect("update");

    assert_eq!(updated.status, AssignmentStatus::InProgress);
    assert_eq!(updated.description.as_deref(), Some("Started the review"));

    let snapshot = store.snapshot().await;
    assert_eq!(snapshot.current.as_ref().map(|a| a.status), Some(AssignmentStatus::InProgress));
}

#[tokio::test]
async fn test_solution_upload_replaces_exactly_the_matching_record() {
    let h = Harness::new().await;
    let target = h.stub.seed_assignment("Algebra HW", h.student, h.subject);
    let other = h.stub.seed_assignment("Geometry HW", h.student, h.subject);

    let store = AssignmentStore::new();
    let admin_token = h.token(h.admin);
    store.fetch_all(&h.api, &admin_token).await.expect("fetch");
    store
        .assign_tutor(&h.api, &admin_token, target, h.tutor)
        .await
        .expect("assign");

    let updated = store
        .upload_solution(
            &h.api,
            &h.token(h.tutor),
            target,
            UploadedFile {
                filename: "worked-answers.pdf".to_owned(),
                content_type: "application/pdf".to_owned(),
                bytes: b"step by step".to_vec(),
            },
        )
        .await
        .expect("upload");

    // The server-supplied path lands verbatim; the status is whatever the
    // server returned, not something recomputed locally.
    assert_eq!(
        updated.solution_file_path,
        Some(format!("solutions/{target}/worked-answers.pdf"))
    );
    assert_eq!(updated.status, AssignmentStatus::Assigned);

    let snapshot = store.snapshot().await;
    assert_eq!(snapshot.current, Some(updated.clone()));
    let replaced = snapshot
        .assignments
        .iter()
        .find(|a| a.id == target)
        .expect("target present");
    assert_eq!(replaced.solution_file_path, updated.solution_file_path);
    let untouched = snapshot
        .assignments
        .iter()
        .find(|a| a.id == other)
        .expect("other present");
    assert!(untouched.solution_file_path.is_none());
}

#[tokio::test]
async fn test_skipping_a_lifecycle_stage_is_rejected() {
    let h = Harness::new().await;
    let id = h.stub.seed_assignment("Algebra HW", h.student, h.subject);

    let store = AssignmentStore::new();
    let result = store
        .update_status(&h.api, &h.token(h.tutor), id, AssignmentStatus::Completed, None)
        .await;

    assert!(matches!(result, Err(StoreError::Api(_))));
    // The rejected mutation leaves both sides untouched.
    assert_eq!(
        h.stub.assignment(id).map(|a| a.status),
        Some(AssignmentStatus::Submitted)
    );
    let snapshot = store.snapshot().await;
    assert!(snapshot.assignments.is_empty());
    assert!(snapshot.phase.error.is_some());
}

#[tokio::test]
async fn test_refetch_is_idempotent() {
    let h = Harness::new().await;
    h.stub.seed_assignment("Algebra HW", h.student, h.subject);

    let store = AssignmentStore::new();
    let token = h.token(h.student);
    let first = store.fetch_all(&h.api, &token).await.expect("fetch");
    let second = store.fetch_all(&h.api, &token).await.expect("refetch");

    assert_eq!(first, second);
    assert_eq!(store.snapshot().await.assignments, second);
}

#[tokio::test]
async fn test_subject_crud_mirrors_server() {
    let h = Harness::new().await;
    let store = SubjectStore::new();
    let token = h.token(h.admin);
    store.fetch_all(&h.api, &token).await.expect("fetch");

    let created = store
        .create(
            &h.api,
            &token,
            SubjectPayload {
                name: "Physics".to_owned(),
                description: Some("Mechanics and waves".to_owned()),
            },
        )
        .await
        .expect("create");

    let updated = store
        .update(
            &h.api,
            &token,
            created.id,
            SubjectPayload {
                name: "Physics I".to_owned(),
                description: None,
            },
        )
        .await
        .expect("update");
    assert_eq!(updated.name, "Physics I");

    // Exactly the matching record was replaced.
    let snapshot = store.snapshot().await;
    assert_eq!(snapshot.subjects.len(), 2);
    assert!(snapshot.subjects.iter().any(|s| s.name == "Algebra"));
    assert!(snapshot.subjects.iter().any(|s| s.name == "Physics I"));

    store.delete(&h.api, &token, created.id).await.expect("delete");
    let snapshot = store.snapshot().await;
    assert_eq!(snapshot.subjects.len(), 1);
    assert!(h.stub.subjects().iter().all(|s| s.id != created.id));
}

#[tokio::test]
async fn test_rejected_subject_update_leaves_state_untouched() {
    let h = Harness::new().await;
    let store = SubjectStore::new();
    let token = h.token(h.admin);
    store.fetch_all(&h.api, &token).await.expect("fetch");
    let before = store.snapshot().await.subjects;

    let result = store
        .update(
            &h.api,
            &token,
            SubjectId::new(999),
            SubjectPayload {
                name: "Ghost".to_owned(),
                description: None,
            },
        )
        .await;

    match result {
        Err(StoreError::Api(message)) => {
            assert!(message.contains("Subject with ID 999 not found"));
        }
        other => panic!("expected api error, got {other:?}"),
    }

    let snapshot = store.snapshot().await;
    assert_eq!(snapshot.subjects, before);
    assert!(snapshot.phase.error.is_some());
}

#[tokio::test]
async fn test_comment_thread_fetch_and_append() {
    let h = Harness::new().await;
    let id = h.stub.seed_assignment("Algebra HW", h.student, h.subject);

    let store = CommentStore::new();
    let token = h.token(h.student);
    let thread = store
        .fetch_for_assignment(&h.api, &token, id)
        .await
        .expect("fetch");
    assert!(thread.is_empty());

    let created = store
        .create(
            &h.api,
            &token,
            NewComment {
                text: "When is this due?".to_owned(),
                assignment_id: id,
            },
        )
        .await
        .expect("create");

    assert_eq!(created.assignment_id, id);
    assert_eq!(created.user.name, "Sam Student");

    let snapshot = store.snapshot().await;
    assert_eq!(snapshot.comments.len(), 1);
    assert_eq!(snapshot.comments[0].text, "When is this due?");
}
