use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use actix_web::{
    http::{header, StatusCode},
    test, web, App,
};
use async_trait::async_trait;
use secrecy::SecretString;
use tokio::sync::RwLock;

use papercheck_server::{
    app_state::{AppState, Collaborators},
    config::{Config, PipelineLimits},
    errors::{AppError, AppResult},
    handlers,
    middleware::RequestIdMiddleware,
    models::domain::{RepositoryHit, ReportKind, ReportRecord, WebSearchHit},
    repositories::ReportRepository,
    services::{
        model_service::{GenerationRequest, GenerativeModel},
        pdf_renderer::LopdfRenderer,
        repository_search_service::CodeRepositorySearch,
        web_search_service::WebSearch,
    },
};

const BOUNDARY: &str = "integration-boundary";
const PDF: &[u8] = b"%PDF-1.4\n%%EOF\n";

/// Answers each kind of model call with a fixed script.
struct ScriptedModel {
    verdict: &'static str,
    calls: AtomicUsize,
}

impl ScriptedModel {
    fn new(verdict: &'static str) -> Self {
        Self {
            verdict,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl GenerativeModel for ScriptedModel {
    async fn generate(&self, request: GenerationRequest) -> AppResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let instruction = request.instruction_text();

        let answer = match request.attachment_count() {
            2 => "# Algorithms Question Paper\n\n## Section A\n1. Define a heap. (2)\n2. Prove that merge sort is O(n log n). (10)",
            1 => "Dijkstra's algorithm computes shortest paths in weighted graphs.",
            _ if instruction.contains("File names:") => "Algorithms",
            _ if instruction.starts_with("Generate ") => "dijkstra shortest path\nweighted graph algorithms\npriority queue",
            _ => self.verdict,
        };
        Ok(answer.to_string())
    }
}

struct CountingWebSearch {
    calls: AtomicUsize,
}

#[async_trait]
impl WebSearch for CountingWebSearch {
    async fn search(&self, query: &str, _limit: usize) -> AppResult<Vec<WebSearchHit>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![WebSearchHit {
            title: format!("Article on {}", query),
            snippet: "Dijkstra's algorithm finds shortest paths.".to_string(),
            link: "https://en.wikipedia.org/wiki/Dijkstra%27s_algorithm".to_string(),
            position: Some(1),
        }])
    }
}

struct CountingRepositorySearch {
    calls: AtomicUsize,
    fail: bool,
}

#[async_trait]
impl CodeRepositorySearch for CountingRepositorySearch {
    async fn search(&self, _query: &str, _limit: usize) -> AppResult<Vec<RepositoryHit>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(AppError::UpstreamError("API rate limit exceeded".to_string()));
        }
        Ok(vec![RepositoryHit {
            name: "pathfinding".to_string(),
            url: "https://github.com/evenfurther/pathfinding".to_string(),
            owner: "evenfurther".to_string(),
            description: "Pathfinding, flow, and graph algorithms".to_string(),
            stars: Some(900),
        }])
    }
}

#[derive(Default)]
struct InMemoryReportRepository {
    records: RwLock<Vec<ReportRecord>>,
    fail: bool,
}

#[async_trait]
impl ReportRepository for InMemoryReportRepository {
    async fn insert(&self, record: ReportRecord) -> AppResult<()> {
        if self.fail {
            return Err(AppError::DatabaseError("not primary".to_string()));
        }
        self.records.write().await.push(record);
        Ok(())
    }
}

struct Harness {
    model: Arc<ScriptedModel>,
    web: Arc<CountingWebSearch>,
    repositories: Arc<CountingRepositorySearch>,
    reports: Arc<InMemoryReportRepository>,
}

impl Harness {
    fn new(verdict: &'static str) -> Self {
        Self {
            model: Arc::new(ScriptedModel::new(verdict)),
            web: Arc::new(CountingWebSearch {
                calls: AtomicUsize::new(0),
            }),
            repositories: Arc::new(CountingRepositorySearch {
                calls: AtomicUsize::new(0),
                fail: false,
            }),
            reports: Arc::new(InMemoryReportRepository::default()),
        }
    }

    fn state(&self) -> web::Data<Arc<AppState>> {
        let collaborators = Collaborators {
            model: self.model.clone(),
            web: self.web.clone(),
            repositories: self.repositories.clone(),
            renderer: Arc::new(LopdfRenderer::new()),
            reports: Some(self.reports.clone() as Arc<dyn ReportRepository>),
        };
        web::Data::new(Arc::new(AppState::from_collaborators(
            test_config(),
            collaborators,
            None,
        )))
    }
}

fn test_config() -> Config {
    Config {
        web_server_host: "127.0.0.1".to_string(),
        web_server_port: 0,
        cors_allowed_origin: "http://localhost:3000".to_string(),
        llm_api_key: SecretString::from("unused".to_string()),
        llm_api_base: "http://127.0.0.1:9/v1".to_string(),
        llm_model: "test-model".to_string(),
        serper_api_key: SecretString::from("unused".to_string()),
        serper_endpoint: "http://127.0.0.1:9/search".to_string(),
        github_token: None,
        mongo_conn_string: None,
        mongo_db_name: "papercheck-test".to_string(),
        reports_collection: "reports".to_string(),
        archive_enabled: true,
        limits: PipelineLimits::default(),
    }
}

fn file_part(name: &str, file_name: &str) -> Vec<u8> {
    let mut part = format!(
        "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/pdf\r\n\r\n",
        BOUNDARY, name, file_name
    )
    .into_bytes();
    part.extend_from_slice(PDF);
    part.extend_from_slice(b"\r\n");
    part
}

fn text_part(name: &str, value: &str) -> Vec<u8> {
    format!(
        "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
        BOUNDARY, name, value
    )
    .into_bytes()
}

fn multipart_request(uri: &str, parts: Vec<Vec<u8>>) -> test::TestRequest {
    let mut body: Vec<u8> = parts.concat();
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    test::TestRequest::post()
        .uri(uri)
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        ))
        .set_payload(body)
}

macro_rules! app {
    ($harness:expr) => {
        test::init_service(
            App::new()
                .app_data($harness.state())
                .wrap(RequestIdMiddleware)
                .configure(handlers::configure),
        )
        .await
    };
}

#[actix_web::test]
async fn plagiarism_check_end_to_end() {
    let harness = Harness::new(
        r#"Here you go:
```json
{
  "overallSimilarity": 64,
  "sources": [
    {
      "text": "Dijkstra's algorithm computes shortest paths",
      "source": "Wikipedia",
      "similarity": 64,
      "url": "https://en.wikipedia.org/wiki/Dijkstra%27s_algorithm"
    }
  ]
}
```"#,
    );
    let app = app!(harness);

    let req = multipart_request(
        "/api/check-plagiarism",
        vec![
            file_part("document", "report.pdf"),
            text_part("customPrompt", "Graph theory coursework"),
        ],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["overallSimilarity"], 64.0);
    assert_eq!(body["sources"][0]["source"], "Wikipedia");

    // extraction, query generation, analysis
    assert_eq!(harness.model.calls.load(Ordering::SeqCst), 3);
    assert_eq!(harness.web.calls.load(Ordering::SeqCst), 2);
    assert_eq!(harness.repositories.calls.load(Ordering::SeqCst), 1);

    let records = harness.reports.records.read().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].kind, ReportKind::Plagiarism);
    assert_eq!(records[0].goal.as_deref(), Some("Graph theory coursework"));
    assert_eq!(records[0].overall_similarity, Some(64.0));
}

#[actix_web::test]
async fn malformed_verdict_and_failed_repository_search_still_answer() {
    let mut harness = Harness::new("I am unable to produce JSON today.");
    harness.repositories = Arc::new(CountingRepositorySearch {
        calls: AtomicUsize::new(0),
        fail: true,
    });
    let app = app!(harness);

    let req = multipart_request(
        "/api/check-plagiarism",
        vec![file_part("document", "report.pdf")],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;

    // Two web candidates survive; the repository leg contributed nothing.
    assert_eq!(body["overallSimilarity"], 50.0);
    let sources = body["sources"].as_array().unwrap();
    assert_eq!(sources.len(), 2);
    assert_eq!(sources[0]["similarity"], 50.0);
    assert_eq!(sources[1]["similarity"], 40.0);
    assert_eq!(sources[0]["source"], "Article on dijkstra shortest path");
}

#[actix_web::test]
async fn question_paper_end_to_end() {
    let harness = Harness::new("unused");
    let app = app!(harness);

    let req = multipart_request(
        "/api/generate-question-paper",
        vec![
            file_part("pyq", "algo-2023.pdf"),
            file_part("syllabus", "algo-syllabus.pdf"),
        ],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/pdf"
    );
    assert_eq!(
        resp.headers().get(header::CONTENT_DISPOSITION).unwrap(),
        "attachment; filename=\"algorithms_question_paper.pdf\""
    );

    let body = test::read_body(resp).await;
    assert!(body.starts_with(b"%PDF-"));

    // paper and title; no search collaborator is involved
    assert_eq!(harness.model.calls.load(Ordering::SeqCst), 2);
    assert_eq!(harness.web.calls.load(Ordering::SeqCst), 0);

    let records = harness.reports.records.read().await;
    assert_eq!(records[0].kind, ReportKind::QuestionPaper);
    assert_eq!(records[0].participants, vec!["algo-2023.pdf", "algo-syllabus.pdf"]);
}

#[actix_web::test]
async fn invalid_uploads_never_reach_collaborators() {
    let harness = Harness::new("unused");
    let app = app!(harness);

    let three_files = multipart_request(
        "/api/generate-question-paper",
        vec![
            file_part("pyq", "a.pdf"),
            file_part("syllabus", "b.pdf"),
            file_part("notes", "c.pdf"),
        ],
    )
    .to_request();
    let resp = test::call_service(&app, three_files).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let no_file = multipart_request(
        "/api/check-plagiarism",
        vec![text_part("customPrompt", "check this")],
    )
    .to_request();
    let resp = test::call_service(&app, no_file).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 400);

    assert_eq!(harness.model.calls.load(Ordering::SeqCst), 0);
    assert_eq!(harness.web.calls.load(Ordering::SeqCst), 0);
    assert!(harness.reports.records.read().await.is_empty());
}

#[actix_web::test]
async fn archive_failure_does_not_change_response() {
    let mut harness = Harness::new(r#"{"overallSimilarity": 5, "sources": []}"#);
    harness.reports = Arc::new(InMemoryReportRepository {
        records: RwLock::new(Vec::new()),
        fail: true,
    });
    let app = app!(harness);

    let req = multipart_request(
        "/api/check-plagiarism",
        vec![file_part("document", "report.pdf")],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body, serde_json::json!({ "overallSimilarity": 5.0, "sources": [] }));
}

#[actix_web::test]
async fn health_endpoints_respond() {
    let harness = Harness::new("unused");
    let app = app!(harness);

    for uri in ["/health", "/health/live", "/health/ready"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK, "{}", uri);
    }
}
