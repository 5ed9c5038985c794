use axum::{extract::{Query, State}, http::{HeaderMap, StatusCode}, routing::{get, post}, Json, Router};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use stemdex_core::{BuildReport, Engine, IndexError, Language, SearchHit};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

fn default_language() -> Language { Language::English }

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default = "default_language")]
    pub language: Language,
    pub k: Option<usize>,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub language: Language,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Deserialize)]
pub struct LanguageParams {
    #[serde(default = "default_language")]
    pub language: Language,
}

#[derive(Deserialize)]
pub struct BuildRequest {
    #[serde(default = "default_language")]
    pub language: Language,
    pub docs: PathBuf,
    pub stop_words: PathBuf,
}

/// Outcome of the most recent finished build of one engine.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LastBuild {
    pub finished_at: Option<String>,
    pub report: Option<BuildReport>,
    pub error: Option<String>,
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub language: Language,
    pub running: bool,
    pub current: Option<String>,
    pub documents: usize,
    pub terms: usize,
    pub last: LastBuild,
}

#[derive(Clone)]
pub struct AppState {
    pub english: Arc<Engine>,
    pub romanian: Arc<Engine>,
    pub last_builds: Arc<RwLock<HashMap<Language, LastBuild>>>,
    pub admin_token: Option<String>,
}

impl AppState {
    /// One independent engine per supported language.
    pub fn new(admin_token: Option<String>) -> Self {
        Self {
            english: observed_engine(Language::English),
            romanian: observed_engine(Language::Romanian),
            last_builds: Arc::default(),
            admin_token,
        }
    }

    pub fn engine(&self, language: Language) -> Arc<Engine> {
        match language {
            Language::English => Arc::clone(&self.english),
            Language::Romanian => Arc::clone(&self.romanian),
        }
    }

    /// Claim the engine, then run the build on the blocking pool; the outcome
    /// lands in `last_builds`. Fails with `BuildInProgress` without spawning.
    pub fn spawn_build(
        &self,
        language: Language,
        docs: PathBuf,
        stop_words: PathBuf,
    ) -> Result<tokio::task::JoinHandle<()>, IndexError> {
        let ticket = self.engine(language).reserve()?;
        let last_builds = Arc::clone(&self.last_builds);
        Ok(tokio::task::spawn_blocking(move || {
            let (report, error) = match ticket.build_dir(&docs, &stop_words) {
                Ok(report) => (Some(report), None),
                Err(e) => {
                    tracing::error!(%language, error = %e, "index build failed");
                    (None, Some(e.to_string()))
                }
            };
            let finished_at = time::OffsetDateTime::now_utc()
                .format(&time::format_description::well_known::Rfc3339)
                .ok();
            last_builds.write().insert(language, LastBuild { finished_at, report, error });
        }))
    }
}

fn observed_engine(language: Language) -> Arc<Engine> {
    let engine = Arc::new(Engine::new(language));
    engine.on_progress(Arc::new(move |doc: &str| {
        tracing::debug!(%language, doc, "indexing");
    }));
    engine
}

pub fn build_app(app_state: AppState) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/index", post(index_handler))
        .route("/index/status", get(status_handler))
        .route("/index/cancel", post(cancel_handler))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<SearchResponse> {
    let start = std::time::Instant::now();
    let mut results = state.engine(params.language).search(&params.q);
    let total_hits = results.len();
    if let Some(k) = params.k {
        results.truncate(k.max(1));
    }
    Json(SearchResponse {
        query: params.q,
        language: params.language,
        took_s: start.elapsed().as_secs_f64(),
        total_hits,
        results,
    })
}

async fn index_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<BuildRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), (StatusCode, String)> {
    authorize(&state, &headers)?;
    if !req.docs.is_dir() {
        return Err((StatusCode::BAD_REQUEST, format!("{} is not a directory", req.docs.display())));
    }
    let language = req.language;
    tracing::info!(%language, docs = %req.docs.display(), "starting index build");
    state
        .spawn_build(language, req.docs, req.stop_words)
        .map_err(|_| (StatusCode::CONFLICT, format!("{language} index build already running")))?;
    Ok((StatusCode::ACCEPTED, Json(serde_json::json!({ "status": "started", "language": language }))))
}

async fn status_handler(State(state): State<AppState>, Query(params): Query<LanguageParams>) -> Json<StatusResponse> {
    let engine = state.engine(params.language);
    let snapshot = engine.snapshot();
    let last = state.last_builds.read().get(&params.language).cloned().unwrap_or_default();
    Json(StatusResponse {
        language: params.language,
        running: engine.is_building(),
        current: engine.currently_processing(),
        documents: snapshot.documents().len(),
        terms: snapshot.index().num_terms(),
        last,
    })
}

async fn cancel_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<LanguageParams>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    authorize(&state, &headers)?;
    let engine = state.engine(params.language);
    let running = engine.is_building();
    engine.request_cancel();
    Ok(Json(serde_json::json!({ "language": params.language, "cancel_requested": running })))
}

/// Build and cancel are open unless ADMIN_TOKEN is configured.
fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), (StatusCode, String)> {
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Ok(()),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "invalid admin token".into()))
    }
}
