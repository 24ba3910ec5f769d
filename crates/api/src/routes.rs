use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use extract::{InferenceGateway, OCR_INSTRUCTION};
use intake::UploadedImage;
use serde::Serialize;
use session::{Notice, SessionId, SessionStore};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};
use view::ViewInputs;

use crate::cookie::{session_id_from, set_cookie_value};
use crate::metrics::{Metrics, MetricsSnapshot, TimedOperation};

pub struct AppState {
    pub gateway: InferenceGateway,
    pub sessions: SessionStore,
    pub metrics: Arc<Metrics>,
    pub logo: Option<String>,
}

#[derive(Serialize)]
struct HealthResponse {
    backend: String,
    model: String,
    timeout_secs: u64,
}

pub fn router(state: Arc<AppState>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/upload", post(upload_image))
        .route("/extract", post(extract_text))
        .route("/clear", post(clear_result))
        .route("/health", get(health_check))
        .route("/stats", get(get_stats))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Attach the session cookie to a fresh session's first response.
fn with_session(mut response: Response, id: SessionId, created: bool) -> Response {
    if created {
        if let Some(value) = set_cookie_value(&id) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }
    response
}

fn back_to_page(id: SessionId, created: bool) -> Response {
    with_session(Redirect::to("/").into_response(), id, created)
}

async fn index(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let (id, handle, created) = state.sessions.resolve(session_id_from(&headers));

    let page = {
        let mut session = handle.lock().await;
        let notice = session.take_notice();
        let inputs = ViewInputs {
            image: session.image(),
            notice: notice.as_ref(),
            model: state.gateway.model(),
            logo: state.logo.as_deref(),
        };
        view::render_page(session.state(), &inputs)
    };

    with_session(Html(page).into_response(), id, created)
}

async fn upload_image(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Response, StatusCode> {
    let (id, handle, created) = state.sessions.resolve(session_id_from(&headers));

    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        warn!(session = %id, error = %e, "Malformed upload");
        e.status()
    })? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await.map_err(|e| {
            warn!(session = %id, error = %e, "Failed to read upload");
            e.status()
        })?;
        upload = Some((file_name, data));
        break;
    }

    let mut session = handle.lock().await;
    match upload {
        // Browsers submit an empty part when the picker is cleared
        Some((name, data)) if name.is_empty() && data.is_empty() => session.deselect_image(),
        None => session.deselect_image(),
        Some((name, data)) => match UploadedImage::accept(name, data) {
            Ok(image) => {
                info!(
                    session = %id,
                    file = %image.file_name(),
                    bytes = image.bytes().len(),
                    fingerprint = %image.fingerprint(),
                    "Image selected"
                );
                state.metrics.record_upload(true);
                session.select_image(image);
            }
            Err(e) => {
                warn!(session = %id, error = %e, "Upload rejected");
                state.metrics.record_upload(false);
                session.deselect_image();
                session.notify(Notice::Warning(format!("Upload rejected: {}", e)));
            }
        },
    }
    drop(session);

    Ok(back_to_page(id, created))
}

async fn extract_text(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, StatusCode> {
    let (id, handle, created) = state.sessions.resolve(session_id_from(&headers));

    let image_bytes = {
        let mut session = handle.lock().await;
        let Some(image_bytes) = session.image().map(|image| image.bytes().clone()) else {
            debug!(session = %id, "Extract requested with no image selected");
            return Ok(back_to_page(id, created));
        };
        if !session.begin_extraction() {
            debug!(session = %id, "Extract requested while another is running");
            session.notify(Notice::Warning(
                "An extraction is already running for this image.".to_string(),
            ));
            return Ok(back_to_page(id, created));
        }
        image_bytes
    };

    // Runs to completion even if the client goes away, so the slot is
    // always released. The session lock is not held during the call.
    let task = {
        let gateway = state.gateway.clone();
        let metrics = state.metrics.clone();
        let handle = handle.clone();
        tokio::spawn(async move {
            let timer = TimedOperation::start();
            let outcome = gateway.extract(&image_bytes, OCR_INSTRUCTION).await;
            metrics.record_extract(timer.elapsed(), outcome.is_ok());

            let mut session = handle.lock().await;
            if let Err(e) = session.state_mut().apply(outcome) {
                session.notify(Notice::Error(format!("Error processing image: {}", e)));
            }
            session.finish_extraction();
        })
    };

    if let Err(e) = task.await {
        error!(session = %id, error = %e, "Extraction task aborted");
        handle.lock().await.finish_extraction();
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    Ok(back_to_page(id, created))
}

async fn clear_result(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let (id, handle, created) = state.sessions.resolve(session_id_from(&headers));

    handle.lock().await.state_mut().clear();
    state.metrics.record_clear();
    debug!(session = %id, "Result cleared");

    back_to_page(id, created)
}

async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let backend = match state.gateway.health().await {
        Ok(()) => "ok".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Json(HealthResponse {
        backend,
        model: state.gateway.model().to_string(),
        timeout_secs: state.gateway.timeout().as_secs(),
    })
}

async fn get_stats(State(state): State<Arc<AppState>>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot(state.sessions.len()))
}
