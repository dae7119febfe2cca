pub mod health;

use anyhow::{bail, Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::analysis::handlers;
use crate::config::Config;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        .route("/api/analyze", post(handlers::handle_analyze))
        .route("/api/analyze/text", post(handlers::handle_analyze_text))
        .layer(body_limit)
        .with_state(state)
}

/// CORS restricted to the configured origins, with credentials.
/// A `*` entry is rejected: browsers refuse wildcard origins on credentialed requests.
pub fn build_cors(config: &Config) -> Result<CorsLayer> {
    let origins = config
        .cors_allowed_origins
        .iter()
        .map(|origin| {
            if origin == "*" {
                bail!("Invalid CORS origin '*': list explicit origins in CORS_ALLOWED_ORIGINS");
            }
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS origin: {origin}"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
        .allow_credentials(true))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::analysis::fallback::FallbackAnalyzer;
    use crate::analysis::orchestrator::MatchOrchestrator;
    use crate::analysis::primary::PrimaryAnalyzer;
    use crate::analysis::similarity::testing::{bag_of_words_engine, failing_engine};
    use crate::analysis::similarity::SimilarityEngine;
    use crate::document::testing::build_docx;

    const BOUNDARY: &str = "X-RESUME-MATCHER-BOUNDARY";

    fn test_config() -> Config {
        Config {
            gemini_api_key: None,
            gemini_model: "gemini-1.5-flash".to_string(),
            embedding_model: "bag-of-words".to_string(),
            port: 0,
            rust_log: "info".to_string(),
            cors_allowed_origins: vec!["http://localhost:5173".to_string()],
            llm_timeout_secs: 5,
            llm_max_attempts: 1,
            max_upload_bytes: 1024 * 1024,
        }
    }

    fn app_with(engine: SimilarityEngine) -> Router {
        let orchestrator = MatchOrchestrator::new(
            PrimaryAnalyzer::new(None),
            FallbackAnalyzer::new(Arc::new(engine)),
        );
        build_router(AppState {
            config: test_config(),
            orchestrator: Arc::new(orchestrator),
        })
    }

    fn app() -> Router {
        app_with(bag_of_words_engine())
    }

    enum Part<'a> {
        File { name: &'a str, filename: &'a str, bytes: &'a [u8] },
        Text { name: &'a str, value: &'a str },
    }

    fn multipart_request(parts: &[Part]) -> Request<Body> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                Part::File { name, filename, bytes } => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                             Content-Type: application/octet-stream\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(bytes);
                }
                Part::Text { name, value } => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}")
                            .as_bytes(),
                    );
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/analyze")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn json_request(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn resume_docx() -> Vec<u8> {
        build_docx(
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Data analyst with 2 years experience in Python and SQL.</w:t></w:r></w:p>
  </w:body>
</w:document>"#,
        )
    }

    #[tokio::test]
    async fn test_root_and_health() {
        let (status, body) =
            send(app(), Request::get("/").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Resume-JD Matcher API is running");

        let (status, body) =
            send(app(), Request::get("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "resume-matcher-api");
    }

    #[tokio::test]
    async fn test_analyze_docx_upload() {
        let docx = resume_docx();
        let request = multipart_request(&[
            Part::File { name: "resume", filename: "cv.docx", bytes: &docx },
            Part::Text { name: "job_description", value: "Python, SQL and AWS. 3+ years." },
        ]);
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK, "body: {body}");
        assert_eq!(body["missing_skills"], json!(["aws"]));
        assert_eq!(body["matched_skills"], json!(["python", "sql"]));
        assert_eq!(body["analyzer"], "heuristic");
        assert!(body["score"].as_u64().unwrap() <= 100);
    }

    #[tokio::test]
    async fn test_missing_file_is_rejected_first() {
        let request = multipart_request(&[Part::Text { name: "job_description", value: "" }]);
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "No file uploaded");
    }

    #[tokio::test]
    async fn test_blank_job_description_is_rejected() {
        let docx = resume_docx();
        let request = multipart_request(&[
            Part::File { name: "resume", filename: "cv.docx", bytes: &docx },
            Part::Text { name: "job_description", value: "   " },
        ]);
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Job description is required");
    }

    #[tokio::test]
    async fn test_unsupported_format_is_bad_request() {
        let request = multipart_request(&[
            Part::File { name: "resume", filename: "cv.txt", bytes: b"Python developer" },
            Part::Text { name: "job_description", value: "Python developer" },
        ]);
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"]["message"],
            "Unsupported file format. Please upload PDF or DOCX."
        );
    }

    #[tokio::test]
    async fn test_document_without_text_is_rejected() {
        let empty = build_docx(
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p/></w:body></w:document>"#,
        );
        let request = multipart_request(&[
            Part::File { name: "resume", filename: "cv.docx", bytes: &empty },
            Part::Text { name: "job_description", value: "Python developer" },
        ]);
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_analyze_text_endpoint() {
        let request = json_request(
            "/api/analyze/text",
            json!({
                "resume_text": "Fresher with an internship in React and Node.js",
                "job_description": "0-1 years, fresher welcome. React required."
            }),
        );
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK, "body: {body}");
        assert_eq!(body["matched_skills"], json!(["react"]));
        assert!(body["suggestions"]
            .as_array()
            .unwrap()
            .iter()
            .any(|s| s == "### Experience & Role Fit"));
    }

    #[tokio::test]
    async fn test_embedding_failure_is_server_error() {
        let request = json_request(
            "/api/analyze/text",
            json!({ "resume_text": "Python", "job_description": "Python" }),
        );
        let (status, body) = send(app_with(failing_engine()), request).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "EMBEDDING_MODEL_ERROR");
    }

    #[tokio::test]
    async fn test_upload_over_configured_limit_is_payload_too_large() {
        // Above the 1 MiB test limit, below axum's built-in 2 MB default.
        let big = vec![b'a'; 1536 * 1024];
        let request = multipart_request(&[
            Part::File { name: "resume", filename: "cv.docx", bytes: &big },
            Part::Text { name: "job_description", value: "Python" },
        ]);
        let (status, _) = send(app(), request).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_upload_under_limit_reaches_extraction() {
        let small = vec![b'a'; 512 * 1024];
        let request = multipart_request(&[
            Part::File { name: "resume", filename: "cv.docx", bytes: &small },
            Part::Text { name: "job_description", value: "Python" },
        ]);
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "DOCUMENT_ERROR");
    }

    #[test]
    fn test_cors_rejects_invalid_origin() {
        let mut config = test_config();
        assert!(build_cors(&config).is_ok());
        config.cors_allowed_origins = vec!["bad\norigin".to_string()];
        assert!(build_cors(&config).is_err());

        config.cors_allowed_origins = vec!["http://localhost:5173".to_string(), "*".to_string()];
        let err = build_cors(&config).unwrap_err();
        assert!(err.to_string().contains("CORS_ALLOWED_ORIGINS"));
    }
}
