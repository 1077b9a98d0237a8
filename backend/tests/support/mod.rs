//! Shared fixtures for integration tests: a throwaway content root laid out
//! like the real site, plus request helpers for the router.
#![allow(dead_code)]

use axum::body::{to_bytes, Body, Bytes};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use promptdocs_backend::infrastructure::config::{AppConfig, EnvOverrides, FileConfig};
use promptdocs_backend::interface::{router, AppState};
use promptdocs_backend::runtime::build_app;
use std::path::PathBuf;
use tempfile::TempDir;
use tower::util::ServiceExt;

// ---------------------------------------------------------------------------
// ContentFixture
// ---------------------------------------------------------------------------

pub struct ContentFixture {
    /// Dropping this removes the content tree.
    pub temp: TempDir,
    pub config: AppConfig,
}

impl ContentFixture {
    pub fn new() -> Self {
        Self::with_site_url("")
    }

    pub fn with_site_url(site_url: &str) -> Self {
        let temp = tempfile::tempdir().expect("tempdir");
        let overrides = EnvOverrides {
            site_url: Some(site_url.to_string()),
            ..EnvOverrides::default()
        };
        let config = AppConfig::from_inputs(
            FileConfig::default(),
            overrides,
            temp.path().to_path_buf(),
        );
        Self { temp, config }
    }

    /// Write `content` at `relative` under the content root.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        self.write_bytes(relative, content.as_bytes())
    }

    /// Raw bytes, for content that is not valid UTF-8.
    pub fn write_bytes(&self, relative: &str, bytes: &[u8]) -> PathBuf {
        let path = self.config.content_root.join(relative);
        std::fs::create_dir_all(path.parent().expect("parent")).expect("create dirs");
        std::fs::write(&path, bytes).expect("write fixture bytes");
        path
    }

    pub fn skill(&self, slug: &str, skill_md: &str) -> &Self {
        self.write(&format!("skills/{slug}/SKILL.md"), skill_md);
        self
    }

    pub fn skill_reference(&self, slug: &str, relative: &str, content: &str) -> &Self {
        self.write(&format!("skills/{slug}/references/{relative}"), content);
        self
    }

    pub fn prompt(&self, relative: &str, content: &str) -> &Self {
        self.write(&format!("content/docs/{relative}"), content);
        self
    }

    pub fn state(&self) -> AppState {
        build_app(&self.config).expect("build app")
    }

    pub fn app(&self) -> Router {
        router(self.state())
    }
}

/// The skill used throughout the end-to-end scenarios.
pub const EXAMPLE_SKILL_MD: &str = "---\nname: example\ndescription: Does X\n---\n# Example\nDoes X\n";

pub fn example_with_references() -> ContentFixture {
    let fixture = ContentFixture::new();
    fixture
        .skill("example", EXAMPLE_SKILL_MD)
        .skill_reference("example", "a.md", "Hello")
        .skill_reference("example", "b/c.md", "World");
    fixture
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn text(&self) -> String {
        String::from_utf8(self.body.to_vec()).expect("utf-8 body")
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("json body")
    }

    pub fn header(&self, name: &str) -> &str {
        self.headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
    }
}

pub async fn send_get(app: &Router, uri: &str, accept: Option<&str>) -> TestResponse {
    let mut request = Request::builder().method("GET").uri(uri);
    if let Some(accept) = accept {
        request = request.header("accept", accept);
    }
    let response = app
        .clone()
        .oneshot(request.body(Body::empty()).expect("request"))
        .await
        .expect("response");

    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    TestResponse {
        status,
        headers,
        body,
    }
}
