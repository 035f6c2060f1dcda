//! End-to-end portal flows over HTTP.
//!
//! Serves the full portal router (session layer included) against the stub
//! upstream API and drives it with a cookie-keeping HTTP client, the way a
//! browser would.

use std::net::Ipv4Addr;

use reqwest::{Client, StatusCode, redirect};
use url::Url;

use tutorhub_core::{AssignmentStatus, Role};
use tutorhub_integration_tests::{StubApi, TEST_PASSWORD};
use tutorhub_portal::config::PortalConfig;
use tutorhub_portal::state::AppState;

struct Portal {
    stub: StubApi,
    base: Url,
    client: Client,
}

impl Portal {
    async fn spawn() -> Self {
        let stub = StubApi::new();
        stub.seed_user("Sam Student", "sam@example.com", Role::Student);
        stub.seed_user("Tina Tutor", "tina@example.com", Role::Tutor);
        stub.seed_user("Ada Admin", "ada@example.com", Role::Admin);
        stub.seed_subject("Algebra");

        let api_base_url = stub.spawn().await;
        let config = PortalConfig {
            api_base_url,
            host: Ipv4Addr::LOCALHOST.into(),
            port: 0,
            base_url: "http://localhost:3000".to_owned(),
            max_upload_bytes: 10 * 1024 * 1024,
        };
        let state = AppState::new(config).expect("portal state");
        let app = tutorhub_portal::build_router(state);

        let listener = tokio::net::TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
            .await
            .expect("bind portal listener");
        let addr = listener.local_addr().expect("portal address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve portal");
        });

        let client = Client::builder()
            .cookie_store(true)
            .redirect(redirect::Policy::none())
            .build()
            .expect("http client");

        Self {
            stub,
            base: Url::parse(&format!("http://{addr}")).expect("portal url"),
            client,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base.as_str().trim_end_matches('/'), path)
    }

    async fn login(&self, email: &str) {
        let resp = self
            .client
            .post(self.url("/auth/login"))
            .form(&[("email", email), ("password", TEST_PASSWORD)])
            .send()
            .await
            .expect("login request");
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/dashboard");
    }
}

fn location(resp: &reqwest::Response) -> &str {
    resp.headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_unauthenticated_navigation_redirects_to_login() {
    let portal = Portal::spawn().await;

    for path in ["/dashboard", "/assignments", "/admin/users", "/tutor/assignments"] {
        let resp = portal
            .client
            .get(portal.url(path))
            .send()
            .await
            .expect("request");
        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "path {path}");
        assert_eq!(location(&resp), "/auth/login", "path {path}");
    }
}

#[tokio::test]
async fn test_bad_credentials_bounce_back_to_login() {
    let portal = Portal::spawn().await;

    let resp = portal
        .client
        .post(portal.url("/auth/login"))
        .form(&[("email", "sam@example.com"), ("password", "wrong")])
        .send()
        .await
        .expect("login request");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/auth/login?error=credentials");
}

#[tokio::test]
async fn test_registration_validation_rejects_before_dispatch() {
    let portal = Portal::spawn().await;

    // Mismatched confirmation.
    let resp = portal
        .client
        .post(portal.url("/auth/register"))
        .form(&[
            ("name", "Nora New"),
            ("email", "nora@example.com"),
            ("password", "longenough"),
            ("password_confirm", "different1"),
            ("role", "student"),
        ])
        .send()
        .await
        .expect("register");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/auth/register?error=password_mismatch");

    // Malformed email.
    let resp = portal
        .client
        .post(portal.url("/auth/register"))
        .form(&[
            ("name", "Nora New"),
            ("email", "not-an-email"),
            ("password", "longenough"),
            ("password_confirm", "longenough"),
            ("role", "student"),
        ])
        .send()
        .await
        .expect("register");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/auth/register?error=invalid_email");

    // Self-registration offers student and tutor only.
    let resp = portal
        .client
        .post(portal.url("/auth/register"))
        .form(&[
            ("name", "Nora New"),
            ("email", "nora@example.com"),
            ("password", "longenough"),
            ("password_confirm", "longenough"),
            ("role", "admin"),
        ])
        .send()
        .await
        .expect("register");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/auth/register?error=invalid_role");

    // None of the rejected submissions reached the upstream API.
    assert_eq!(portal.stub.hits("register"), 0);
}

#[tokio::test]
async fn test_registration_then_first_login() {
    let portal = Portal::spawn().await;

    let resp = portal
        .client
        .post(portal.url("/auth/register"))
        .form(&[
            ("name", "Nora New"),
            ("email", "nora@example.com"),
            ("password", TEST_PASSWORD),
            ("password_confirm", TEST_PASSWORD),
            ("role", "student"),
        ])
        .send()
        .await
        .expect("register");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/auth/login?success=registered");
    assert_eq!(portal.stub.hits("register"), 1);
    assert!(
        portal
            .stub
            .users()
            .iter()
            .any(|u| u.email.as_str() == "nora@example.com")
    );

    portal.login("nora@example.com").await;
}

#[tokio::test]
async fn test_login_renders_dashboard_with_role_navigation() {
    let portal = Portal::spawn().await;
    portal.login("sam@example.com").await;

    let resp = portal
        .client
        .get(portal.url("/dashboard"))
        .send()
        .await
        .expect("dashboard");
    assert_eq!(resp.status(), StatusCode::OK);

    let body = resp.text().await.expect("body");
    assert!(body.contains("Sam Student"));
    assert!(body.contains("Submit Assignment"));
    // No admin navigation for a student session.
    assert!(!body.contains("Manage Users"));
}

#[tokio::test]
async fn test_capability_gate_bounces_students_off_admin_pages() {
    let portal = Portal::spawn().await;
    portal.login("sam@example.com").await;

    for path in ["/admin", "/admin/users", "/admin/subjects", "/tutor/assignments"] {
        let resp = portal
            .client
            .get(portal.url(path))
            .send()
            .await
            .expect("request");
        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "path {path}");
        assert_eq!(location(&resp), "/dashboard", "path {path}");
    }
}

#[tokio::test]
async fn test_logout_tears_the_session_down() {
    let portal = Portal::spawn().await;
    portal.login("sam@example.com").await;

    let resp = portal
        .client
        .post(portal.url("/auth/logout"))
        .send()
        .await
        .expect("logout");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/auth/login");
    assert_eq!(portal.stub.hits("logout"), 1);

    // The old cookie no longer opens anything.
    let resp = portal
        .client
        .get(portal.url("/dashboard"))
        .send()
        .await
        .expect("dashboard after logout");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/auth/login");
}

#[tokio::test]
async fn test_student_submits_an_assignment_with_attachment() {
    let portal = Portal::spawn().await;
    portal.login("sam@example.com").await;

    let file = reqwest::multipart::Part::bytes(b"solution draft".to_vec())
        .file_name("hw.pdf")
        .mime_str("application/pdf")
        .expect("part");
    let form = reqwest::multipart::Form::new()
        .text("title", "Algebra HW")
        .text("subject_id", "1")
        .text("submission_text", "See attached")
        .part("file", file);

    let resp = portal
        .client
        .post(portal.url("/assignments/submit"))
        .multipart(form)
        .send()
        .await
        .expect("submit");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let detail_path = location(&resp).to_owned();
    assert!(detail_path.starts_with("/assignments/"));

    // Created server-side with the submitted fields.
    let created = portal
        .stub
        .assignment(tutorhub_core::AssignmentId::new(1))
        .expect("assignment exists");
    assert_eq!(created.title, "Algebra HW");
    assert_eq!(created.status, AssignmentStatus::Submitted);
    assert!(created.file_path.as_deref().is_some_and(|p| p.ends_with("hw.pdf")));

    // The detail page renders it, comment thread included.
    let resp = portal
        .client
        .get(portal.url(&detail_path))
        .send()
        .await
        .expect("detail");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("body");
    assert!(body.contains("Algebra HW"));
    assert!(body.contains("No comments yet."));
}

#[tokio::test]
async fn test_submission_over_the_upload_ceiling_is_rejected() {
    let portal = Portal::spawn().await;
    portal.login("sam@example.com").await;

    let oversized = vec![0_u8; 10 * 1024 * 1024 + 1];
    let file = reqwest::multipart::Part::bytes(oversized)
        .file_name("huge.bin")
        .mime_str("application/octet-stream")
        .expect("part");
    let form = reqwest::multipart::Form::new()
        .text("title", "Too big")
        .text("subject_id", "1")
        .part("file", file);

    let resp = portal
        .client
        .post(portal.url("/assignments/submit"))
        .multipart(form)
        .send()
        .await
        .expect("submit");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Nothing reached the upstream API.
    assert_eq!(portal.stub.hits("create_assignment"), 0);
}

#[tokio::test]
async fn test_admin_assigns_a_tutor_and_tutor_reviews() {
    let portal = Portal::spawn().await;
    let student = tutorhub_core::UserId::new(1);
    let subject = tutorhub_core::SubjectId::new(1);
    let id = portal.stub.seed_assignment("Algebra HW", student, subject);

    portal.login("ada@example.com").await;

    // Tutor 2 is Tina.
    let resp = portal
        .client
        .post(portal.url(&format!("/admin/assignments/{id}/assign")))
        .form(&[("tutor_id", "2")])
        .send()
        .await
        .expect("assign");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let assigned = portal.stub.assignment(id).expect("assignment");
    assert_eq!(assigned.status, AssignmentStatus::Assigned);
    assert_eq!(assigned.tutor.as_ref().map(|t| t.name.as_str()), Some("Tina Tutor"));

    // Fresh browser for the tutor session.
    let tutor_portal = Portal {
        stub: portal.stub.clone(),
        base: portal.base.clone(),
        client: Client::builder()
            .cookie_store(true)
            .redirect(redirect::Policy::none())
            .build()
            .expect("http client"),
    };
    tutor_portal.login("tina@example.com").await;

    let resp = tutor_portal
        .client
        .post(tutor_portal.url(&format!("/tutor/assignments/{id}/status")))
        .form(&[("status", "in_progress"), ("description", "Working on it")])
        .send()
        .await
        .expect("status update");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let updated = portal.stub.assignment(id).expect("assignment");
    assert_eq!(updated.status, AssignmentStatus::InProgress);
    assert_eq!(updated.description.as_deref(), Some("Working on it"));
}

#[tokio::test]
async fn test_tutor_uploads_a_solution_file() {
    let portal = Portal::spawn().await;
    let student = tutorhub_core::UserId::new(1);
    let subject = tutorhub_core::SubjectId::new(1);
    let id = portal.stub.seed_assignment("Algebra HW", student, subject);

    portal.login("tina@example.com").await;

    let file = reqwest::multipart::Part::bytes(b"step by step".to_vec())
        .file_name("worked-answers.pdf")
        .mime_str("application/pdf")
        .expect("part");
    let form = reqwest::multipart::Form::new().part("file", file);

    let resp = portal
        .client
        .post(portal.url(&format!("/tutor/assignments/{id}/solution")))
        .multipart(form)
        .send()
        .await
        .expect("upload");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), format!("/tutor/assignments/{id}"));
    assert_eq!(portal.stub.hits("upload_solution"), 1);

    let updated = portal.stub.assignment(id).expect("assignment");
    assert!(
        updated
            .solution_file_path
            .as_deref()
            .is_some_and(|p| p.ends_with("worked-answers.pdf"))
    );
}
