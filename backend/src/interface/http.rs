use crate::application::corpus::{render_full_corpus, render_index};
use crate::application::catalog_service::distinct_categories;
use crate::application::{Archive, CatalogService, DownloadService};
use crate::domain::content::{Collection, ContentDocument, ContentMeta, UnitId};
use crate::domain::markdown::{escape_html, render_markdown};
use crate::domain::negotiation::{DocumentBody, ResponseFormat};
use crate::domain::AppError;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;

const MARKDOWN_CONTENT_TYPE: &str = "text/markdown; charset=utf-8";
const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";
const ZIP_CONTENT_TYPE: &str = "application/zip";

#[derive(Clone)]
pub struct AppState {
    pub prompts: CatalogService,
    pub skills: CatalogService,
    pub downloads: DownloadService,
    /// Prefix for absolute links in `/llms*.txt`, without trailing slash.
    pub site_url: String,
}

impl AppState {
    pub fn new(
        prompts: CatalogService,
        skills: CatalogService,
        downloads: DownloadService,
        site_url: impl Into<String>,
    ) -> Self {
        Self {
            prompts,
            skills,
            downloads,
            site_url: site_url.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub now: String,
}

#[derive(Debug, Serialize)]
pub struct PromptListResponse {
    pub total: usize,
    pub categories: Vec<String>,
    pub prompts: Vec<ContentMeta>,
}

#[derive(Debug, Serialize)]
pub struct SkillListResponse {
    pub total: usize,
    pub skills: Vec<ContentMeta>,
}

#[derive(Debug, Serialize)]
pub struct SkillContentListResponse {
    pub total: usize,
    pub skills: Vec<ContentDocument>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/prompts", get(list_prompts))
        .route("/api/prompts/*path", get(get_prompt))
        .route("/llms.txt", get(llms_index))
        .route("/llms-full.txt", get(llms_full))
        .route("/api/skills", get(list_skills))
        .route("/api/skills/full", get(list_skills_with_content))
        .route("/api/skills/download-all", get(download_all_skills))
        .route("/api/skills/:slug", get(get_skill))
        .route("/api/skills/:slug/download", get(download_skill))
        .route("/skills/:slug", get(view_skill))
        .with_state(state)
}

impl IntoResponse for DocumentBody {
    fn into_response(self) -> Response {
        match self {
            Self::Markdown(text) => {
                ([(header::CONTENT_TYPE, MARKDOWN_CONTENT_TYPE)], text).into_response()
            }
            Self::Json(value) => Json(value).into_response(),
        }
    }
}

impl IntoResponse for Archive {
    fn into_response(self) -> Response {
        let disposition = format!("attachment; filename=\"{}\"", self.file_name);
        (
            [
                (header::CONTENT_TYPE, ZIP_CONTENT_TYPE.to_string()),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            self.bytes,
        )
            .into_response()
    }
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        now: Utc::now().to_rfc3339(),
    })
}

fn requested_format(headers: &HeaderMap) -> ResponseFormat {
    ResponseFormat::from_accept(
        headers
            .get(header::ACCEPT)
            .and_then(|value| value.to_str().ok()),
    )
}

async fn list_prompts(State(state): State<AppState>) -> Result<Json<PromptListResponse>, AppError> {
    let prompts = state.prompts.list_metadata().await?;
    tracing::debug!(count = prompts.len(), "api list prompts");
    Ok(Json(PromptListResponse {
        total: prompts.len(),
        categories: distinct_categories(&prompts),
        prompts,
    }))
}

async fn get_prompt(
    Path(path): Path<String>,
    headers: HeaderMap,
    State(state): State<AppState>,
) -> Result<DocumentBody, AppError> {
    let format = requested_format(&headers);
    let not_found = || AppError::unit_not_found(Collection::Prompts, path.trim_matches('/'));
    let id = UnitId::from_path(&path).ok_or_else(not_found)?;
    let document = state.prompts.get(&id).await?.ok_or_else(not_found)?;
    tracing::debug!(prompt = %id, ?format, "api get prompt");
    Ok(DocumentBody::select(format, document))
}

async fn llms_index(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let prompts = state.prompts.list_metadata().await?;
    let body = render_index(&prompts, &state.site_url);
    Ok(([(header::CONTENT_TYPE, MARKDOWN_CONTENT_TYPE)], body))
}

async fn llms_full(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let documents = state.prompts.list_with_content().await?;
    tracing::debug!(count = documents.len(), "api full prompt corpus");
    let body = render_full_corpus(&documents, &state.site_url);
    Ok(([(header::CONTENT_TYPE, TEXT_CONTENT_TYPE)], body))
}

async fn list_skills(State(state): State<AppState>) -> Result<Json<SkillListResponse>, AppError> {
    let skills = state.skills.list_metadata().await?;
    tracing::debug!(count = skills.len(), "api list skills");
    Ok(Json(SkillListResponse {
        total: skills.len(),
        skills,
    }))
}

async fn list_skills_with_content(
    State(state): State<AppState>,
) -> Result<Json<SkillContentListResponse>, AppError> {
    let skills = state.skills.list_with_content().await?;
    tracing::debug!(count = skills.len(), "api list skills with content");
    Ok(Json(SkillContentListResponse {
        total: skills.len(),
        skills,
    }))
}

async fn get_skill(
    Path(slug): Path<String>,
    headers: HeaderMap,
    State(state): State<AppState>,
) -> Result<DocumentBody, AppError> {
    let format = requested_format(&headers);
    let document = state
        .skills
        .get(&UnitId::flat(slug.as_str()))
        .await?
        .ok_or_else(|| AppError::unit_not_found(Collection::Skills, &slug))?;
    tracing::debug!(slug = %slug, ?format, "api get skill");
    Ok(DocumentBody::select(format, document))
}

async fn download_skill(
    Path(slug): Path<String>,
    State(state): State<AppState>,
) -> Result<Archive, AppError> {
    state
        .downloads
        .skill_archive(&slug)
        .await?
        .ok_or_else(|| AppError::unit_not_found(Collection::Skills, &slug))
}

async fn download_all_skills(State(state): State<AppState>) -> Result<Archive, AppError> {
    state
        .downloads
        .all_skills_archive()
        .await?
        .ok_or_else(|| AppError::not_found("No skill archives found: all-skills"))
}

async fn view_skill(
    Path(slug): Path<String>,
    State(state): State<AppState>,
) -> Result<Html<String>, AppError> {
    let document = state
        .skills
        .get(&UnitId::flat(slug.as_str()))
        .await?
        .ok_or_else(|| AppError::unit_not_found(Collection::Skills, &slug))?;
    Ok(Html(skill_page(&document)))
}

fn skill_page(document: &ContentDocument) -> String {
    format!(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n<main class=\"skill\">\n{}\n</main>\n</body>\n</html>\n",
        escape_html(&document.meta.title),
        render_markdown(&document.content)
    )
}
