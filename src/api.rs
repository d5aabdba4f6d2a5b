use crate::catalog::{self, Book};
use crate::error::SummaryError;
use crate::keypoint::{self, KeyPoint};
use crate::render::{Display, MARKDOWN_CONTENT_TYPE};
use crate::session::{SessionState, SessionStore};
use crate::summarize::{SummaryRequest, Summarizer};
use axum::{
    extract::{Json as JsonPayload, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const SESSION_HEADER: &str = "x-session-id";
const MAX_SESSION_ID_LEN: usize = 128;

#[derive(Clone)]
pub struct AppState {
    pub summarizer: Summarizer,
    pub sessions: Arc<SessionStore>,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        // catalog
        .route("/api/canons", get(list_canons))
        .route("/api/canons/:key/books", get(list_books))
        .route("/api/canons/:key/books/:book/chapters", get(chapter_range))
        // summaries
        .route("/api/summary", post(create_summary))
        .route("/api/summary/export", get(export_summary))
        // session
        .route("/api/session", get(get_session).delete(clear_session))
        // offline panel
        .route("/api/translations", get(list_translations))
        .route("/api/keypoint", post(create_key_point))
        .with_state(Arc::new(state))
}

fn session_id(headers: &HeaderMap) -> Result<String, ApiError> {
    let id = headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .unwrap_or_default();
    if id.is_empty() {
        return Err(ApiError::bad_request("missing_session", "x-session-id header is required"));
    }
    if id.len() > MAX_SESSION_ID_LEN {
        return Err(ApiError::bad_request("invalid_session", "x-session-id is too long"));
    }
    Ok(id.to_string())
}

// -------------------------------------------------------------------
// Catalog

async fn list_canons() -> Json<CanonsResponse> {
    let canons = catalog::CANONS
        .iter()
        .map(|c| CanonSummary { key: c.key, name: c.name })
        .collect();
    Json(CanonsResponse {
        canons,
        default: DefaultSelection {
            canon: catalog::DEFAULT_CANON,
            books: catalog::books_of(catalog::lookup_canon(catalog::DEFAULT_CANON)),
            book: catalog::DEFAULT_BOOK,
            chapter: catalog::DEFAULT_CHAPTER,
        },
    })
}

async fn list_books(Path(key): Path<String>) -> Result<Json<BooksResponse>, ApiError> {
    let canon = catalog::find_canon(&key)?;
    Ok(Json(BooksResponse { canon: canon.key, books: canon.books }))
}

async fn chapter_range(
    Path((key, book)): Path<(String, String)>,
) -> Result<Json<ChapterRangeResponse>, ApiError> {
    let canon = catalog::find_canon(&key)?;
    let range = catalog::chapter_range(canon, &book)?;
    Ok(Json(ChapterRangeResponse { first: *range.start(), last: *range.end() }))
}

// -------------------------------------------------------------------
// Summaries

async fn create_summary(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    JsonPayload(payload): JsonPayload<SummaryPayload>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let sid = session_id(&headers)?;
    let request = SummaryRequest::resolve(
        &payload.canon,
        &payload.book,
        payload.chapter,
        payload.search.as_deref().unwrap_or_default(),
        payload.focus.as_deref().unwrap_or_default(),
        payload.length.as_deref().unwrap_or_default(),
    )?;

    let ticket = match state.sessions.begin(&sid).await {
        Ok(ticket) => ticket,
        Err(e) => {
            tracing::warn!(session = %sid, "rejected submit while a summary is in flight");
            return Err(e.into());
        }
    };

    tracing::info!(reference = %request.reference, length = %request.length, "summary requested");
    // Runs detached so a dropped connection can't leave the session stuck busy.
    let job = {
        let state = state.clone();
        let request = request.clone();
        let sid = sid.clone();
        tokio::spawn(async move {
            let outcome = state.summarizer.summarize(&request).await;
            state.sessions.finish(&sid, ticket, &outcome).await;
            outcome
        })
    };
    let outcome = match job.await {
        Ok(outcome) => outcome,
        Err(e) => {
            let outcome = Err(SummaryError::Provider(format!("summary task failed: {e}")));
            state.sessions.finish(&sid, ticket, &outcome).await;
            outcome
        }
    };

    let summary = outcome.map_err(|e| {
        if e.is_completion_failure() {
            tracing::warn!(reference = %request.reference, error = %e, "summary failed");
        }
        ApiError::from(e)
    })?;

    Ok(Json(SummaryResponse {
        reference: request.reference,
        display: summary.display,
        markdown: summary.markdown,
        file_name: summary.file_name,
    }))
}

async fn export_summary(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let session = state.sessions.snapshot(&session_id(&headers)?).await;
    let (Some(markdown), Some(file_name)) = (session.markdown, session.file_name) else {
        return Err(ApiError::not_found("no_summary", "Nothing to download yet. Get a summary first."));
    };
    Ok((
        [
            (header::CONTENT_TYPE, MARKDOWN_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{file_name}\"")),
        ],
        markdown,
    ))
}

// -------------------------------------------------------------------
// Session

async fn get_session(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<SessionState>, ApiError> {
    Ok(Json(state.sessions.snapshot(&session_id(&headers)?).await))
}

async fn clear_session(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    state.sessions.clear(&session_id(&headers)?).await;
    Ok(StatusCode::NO_CONTENT)
}

// -------------------------------------------------------------------
// Offline key point

async fn list_translations() -> Json<TranslationsResponse> {
    Json(TranslationsResponse { translations: keypoint::TRANSLATIONS })
}

async fn create_key_point(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    JsonPayload(payload): JsonPayload<KeyPointPayload>,
) -> Result<Json<KeyPointResponse>, ApiError> {
    let sid = session_id(&headers)?;
    let key_point = keypoint::key_point(&payload.text)?;
    let show_word_count = payload.show_word_count.unwrap_or(false);
    let word_count = show_word_count.then(|| keypoint::word_count(&payload.text));

    let stored = key_point.clone();
    let translation = payload.translation.clone();
    state
        .sessions
        .update(&sid, move |s| {
            s.key_point = Some(stored);
            s.translation = translation;
            s.show_word_count = show_word_count;
        })
        .await;

    Ok(Json(KeyPointResponse {
        display: key_point.display(),
        key_point,
        word_count,
        translation: payload.translation,
    }))
}

// -------------------------------------------------------------------
// DTOs

#[derive(Serialize)]
struct CanonSummary {
    key: &'static str,
    name: &'static str,
}

#[derive(Serialize)]
struct DefaultSelection {
    canon: &'static str,
    books: Vec<&'static str>,
    book: &'static str,
    chapter: u32,
}

#[derive(Serialize)]
struct CanonsResponse {
    canons: Vec<CanonSummary>,
    default: DefaultSelection,
}

#[derive(Serialize)]
struct BooksResponse {
    canon: &'static str,
    books: &'static [Book],
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct ChapterRangeResponse {
    first: u32,
    last: u32,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct SummaryPayload {
    canon: String,
    book: String,
    chapter: u32,
    search: Option<String>,
    focus: Option<String>,
    length: Option<String>,
}

#[derive(Serialize)]
struct SummaryResponse {
    reference: String,
    display: Display,
    markdown: String,
    file_name: String,
}

#[derive(Serialize)]
struct TranslationsResponse {
    translations: &'static [&'static str],
}

#[derive(Deserialize)]
struct KeyPointPayload {
    text: String,
    translation: Option<String>,
    show_word_count: Option<bool>,
}

#[derive(Serialize)]
struct KeyPointResponse {
    key_point: KeyPoint,
    display: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    word_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    translation: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    code: &'a str,
    message: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self { status, code, message: message.into() }
    }
    fn bad_request(code: &'static str, msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, code, msg)
    }
    fn not_found(code: &'static str, msg: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, code, msg)
    }
}

impl From<SummaryError> for ApiError {
    fn from(e: SummaryError) -> Self {
        let (status, code) = match &e {
            SummaryError::Provider(_) => (StatusCode::BAD_GATEWAY, "provider_error"),
            SummaryError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, "timeout"),
            SummaryError::Parse(_) => (StatusCode::BAD_GATEWAY, "parse_error"),
            SummaryError::NotFound { kind: "canon", .. } => (StatusCode::NOT_FOUND, "canon_not_found"),
            SummaryError::NotFound { .. } => (StatusCode::NOT_FOUND, "book_not_found"),
            SummaryError::ChapterOutOfRange { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "chapter_out_of_range")
            }
            SummaryError::EmptyInput => (StatusCode::UNPROCESSABLE_ENTITY, "empty_input"),
            SummaryError::Busy => (StatusCode::CONFLICT, "busy"),
        };
        Self::new(status, code, e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let body = Json(ErrorBody { code: self.code, message: self.message });
        (self.status, body).into_response()
    }
}
