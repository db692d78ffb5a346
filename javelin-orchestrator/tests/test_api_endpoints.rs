//! Integration tests for API endpoints

mod common;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{Value, json};
use uuid::Uuid;

use common::fakes::FakeHost;
use common::helpers::{assert_error, assert_success};
use common::{LEGACY_APP, harness, wait_for_terminal};

fn server() -> (TestServer, common::Harness) {
    let h = harness(FakeHost::new(LEGACY_APP));
    let server = TestServer::new(h.router()).unwrap();
    (server, h)
}

fn start_body() -> Value {
    json!({
        "source_repo_url": "https://github.com/acme/legacy-app",
        "source_java_version": "8",
        "target_java_version": "17",
        "token": "ghp_test",
        "conversion_types": ["java_version", "junit_4_to_5"],
    })
}

#[tokio::test]
async fn test_health_endpoint() {
    let (server, _h) = server();
    let response = server.get("/health").await;
    assert_success(&response);
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["active_jobs"], 0);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let (server, _h) = server();
    let response = server
        .get("/")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("req-42"),
        )
        .await;
    assert_success(&response);
    assert_eq!(response.header("x-request-id"), "req-42");
    let body: Value = response.json();
    assert_eq!(body["docs"], "/docs");
}

#[tokio::test]
async fn test_start_returns_pending_job() {
    let (server, h) = server();
    let response = server.post("/api/migration/start").json(&start_body()).await;
    assert_success(&response);

    let body: Value = response.json();
    assert_eq!(body["status"], "pending");
    assert_eq!(body["progress_percent"], 0);
    assert_eq!(body["conversion_types"], json!(["java_version", "junit_4_to_5"]));
    assert!(body.get("token").is_none());

    let id: Uuid = body["job_id"].as_str().unwrap().parse().unwrap();
    wait_for_terminal(&h.orchestrator, id).await;

    let job: Value = server.get(&format!("/api/migration/{}", id)).await.json();
    assert_eq!(job["status"], "completed");
    assert_eq!(job["progress_percent"], 100);

    let logs: Value = server.get(&format!("/api/migration/{}/logs", id)).await.json();
    assert_eq!(logs["job_id"], id.to_string());
    assert!(!logs["logs"].as_array().unwrap().is_empty());

    let all: Value = server.get("/api/migrations").await.json();
    assert_eq!(all.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_invalid_requests_are_rejected() {
    let (server, h) = server();

    let mut body = start_body();
    body["conversion_types"] = json!(["cobol_to_java"]);
    let response = server.post("/api/migration/start").json(&body).await;
    assert_error(&response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR");

    let mut body = start_body();
    body["source_repo_url"] = json!("git@github.com:acme/legacy-app.git");
    let response = server.post("/api/migration/start").json(&body).await;
    assert_error(&response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR");

    assert!(h.orchestrator.list_jobs().is_empty());
}

#[tokio::test]
async fn test_unknown_job_is_not_found() {
    let (server, _h) = server();
    let id = Uuid::new_v4();
    for path in ["", "/logs", "/report", "/jmeter"] {
        let response = server.get(&format!("/api/migration/{}{}", id, path)).await;
        assert_error(&response, StatusCode::NOT_FOUND, "NOT_FOUND");
    }
    let response = server.post(&format!("/api/migration/{}/cancel", id)).await;
    assert_error(&response, StatusCode::NOT_FOUND, "NOT_FOUND");
}

#[tokio::test]
async fn test_cancel_finished_job_conflicts() {
    let (server, h) = server();
    let body: Value = server.post("/api/migration/start").json(&start_body()).await.json();
    let id: Uuid = body["job_id"].as_str().unwrap().parse().unwrap();
    wait_for_terminal(&h.orchestrator, id).await;

    let response = server.post(&format!("/api/migration/{}/cancel", id)).await;
    assert_error(&response, StatusCode::CONFLICT, "CONFLICT");
}

#[tokio::test]
async fn test_report_downloads() {
    let (server, h) = server();
    let body: Value = server.post("/api/migration/start").json(&start_body()).await.json();
    let id: Uuid = body["job_id"].as_str().unwrap().parse().unwrap();
    wait_for_terminal(&h.orchestrator, id).await;

    let report = server.get(&format!("/api/migration/{}/report", id)).await;
    assert_success(&report);
    assert!(
        report
            .header("content-type")
            .to_str()
            .unwrap()
            .starts_with("text/html")
    );
    assert_eq!(
        report.header("content-disposition"),
        format!("attachment; filename=migration-report-{}.html", id).as_str()
    );
    assert!(report.text().contains("COMPLETED"));

    let plan = server.get(&format!("/api/migration/{}/jmeter", id)).await;
    assert_success(&plan);
    assert_eq!(plan.header("content-type"), "application/xml");
    assert_eq!(
        plan.header("content-disposition"),
        format!("attachment; filename=migration-test-{}.jmx", id).as_str()
    );
    assert!(plan.text().contains("<jmeterTestPlan"));
}

#[tokio::test]
async fn test_catalogs() {
    let (server, _h) = server();

    let conversions: Value = server.get("/api/conversion-types").await.json();
    assert!(
        conversions
            .as_array()
            .unwrap()
            .iter()
            .any(|c| c["id"] == "javax_to_jakarta")
    );

    let versions: Value = server.get("/api/java-versions").await.json();
    assert!(!versions["source_versions"].as_array().unwrap().is_empty());
    assert_eq!(versions["source_versions"], versions["target_versions"]);

    let recipes = server.get("/api/openrewrite/recipes").await;
    assert_success(&recipes);
    assert!(!recipes.json::<Value>().as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_preview_reports_changes_without_creating_a_job() {
    let (server, h) = server();
    let response = server.post("/api/migration/preview").json(&start_body()).await;
    assert_success(&response);

    let body: Value = response.json();
    assert_eq!(body["repository"], "https://github.com/acme/legacy-app");
    assert_eq!(body["target_version"], "17");
    assert_eq!(body["summary"]["files_to_modify"], 1);
    let diffs = body["file_diffs"].as_array().unwrap();
    assert_eq!(diffs[0]["file_path"], "src/main/java/com/acme/App.java");
    assert!(diffs[0]["diff"].as_str().unwrap().contains("+import jakarta.servlet"));

    assert!(h.orchestrator.list_jobs().is_empty());
    assert!(h.host.published().is_empty());
    assert_eq!(h.host.live_checkouts(), 0);
}

#[tokio::test]
async fn test_openapi_document_lists_migration_routes() {
    let (server, _h) = server();
    let doc: Value = server.get("/api-docs/openapi.json").await.json();
    assert!(doc["paths"].get("/api/migration/start").is_some());
    assert!(doc["paths"].get("/api/migration/{id}/jmeter").is_some());
}
