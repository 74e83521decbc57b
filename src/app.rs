use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

use crate::carrier::{carrier_names, classify};
use crate::config::ServerConfig;
use crate::extractor::extract;
use crate::grid::CellGrid;
use crate::record::{ShipmentRecord, Status};
use crate::sample::{sample_filename_today, sample_workbook};
use crate::source::{Notice, NoticeLevel, load_default, records_from_upload};
use crate::triage::{
    CarrierCount, CarrierFilter, EditForm, Editor, Event, FieldError, TriageError, TriageState,
    ViewQuery,
};

/// Uploads larger than this are rejected before parsing.
const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

pub struct AppState {
    triage: Mutex<TriageState>,
    default_path: PathBuf,
}

impl AppState {
    pub fn new(triage: TriageState, default_path: PathBuf) -> Self {
        AppState {
            triage: Mutex::new(triage),
            default_path,
        }
    }

    fn lock(&self) -> MutexGuard<'_, TriageState> {
        self.triage.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply one event and swap the result in.
    fn transition(&self, event: Event) -> Result<Snapshot, TriageError> {
        let mut triage = self.lock();
        let next = triage.apply(event)?;
        *triage = next;
        Ok(Snapshot::from(&*triage))
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot::from(&*self.lock())
    }
}

/// What the page needs to render the current view.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub records: Vec<ShipmentRecord>,
    pub total: usize,
    pub stats: Vec<CarrierCount>,
    pub query: ViewQuery,
    pub query_label: String,
    pub editor: Option<Editor>,
}

impl From<&TriageState> for Snapshot {
    fn from(state: &TriageState) -> Self {
        Snapshot {
            records: state.visible_records().into_iter().cloned().collect(),
            total: state.records().len(),
            stats: state.carrier_stats(),
            query: state.query().clone(),
            query_label: state.query().label(),
            editor: state.editor().cloned(),
        }
    }
}

#[derive(Serialize)]
struct ApiResponse {
    notice: Option<Notice>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<FieldError>,
    state: Option<Snapshot>,
}

impl ApiResponse {
    fn ok(state: Snapshot) -> Self {
        ApiResponse {
            notice: None,
            errors: Vec::new(),
            state: Some(state),
        }
    }

    fn with_notice(state: Snapshot, notice: Notice) -> Self {
        ApiResponse {
            notice: Some(notice),
            errors: Vec::new(),
            state: Some(state),
        }
    }

    fn failure(level: NoticeLevel, message: impl Into<String>) -> Self {
        ApiResponse {
            notice: Some(Notice::new(level, message)),
            errors: Vec::new(),
            state: None,
        }
    }
}

#[derive(Deserialize)]
struct SearchRequest {
    #[serde(default)]
    query: String,
}

#[derive(Deserialize)]
struct FilterRequest {
    carrier: CarrierFilter,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClassifyResponse {
    tracking_number: String,
    company: String,
}

#[derive(Serialize)]
struct Catalog {
    carriers: Vec<&'static str>,
    statuses: Vec<StatusOption>,
}

#[derive(Serialize)]
struct StatusOption {
    value: Status,
    label: &'static str,
}

/// Build the router over an already-initialised state
pub fn router(state: Arc<AppState>, public_dir: PathBuf) -> Router {
    Router::new()
        .route("/", get(serve_page))
        .route("/api/catalog", get(get_catalog))
        .route("/api/records", get(get_records))
        .route("/api/upload", post(upload_workbook))
        .route("/api/reload", post(reload_default))
        .route("/api/search", post(search_records))
        .route("/api/filter", post(filter_records))
        .route("/api/records/:key/edit", post(open_editor))
        .route("/api/editor/close", post(close_editor))
        .route("/api/editor/save", post(save_editor))
        .route("/api/classify/:token", get(classify_token))
        .route("/api/extract", post(extract_grid))
        .route("/api/sample", get(download_sample))
        .nest_service("/public", ServeDir::new(public_dir))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

/// Load the default data and serve until the process is stopped
pub async fn run(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let default_path = config.default_file_path();
    let (records, outcome) = load_default(&default_path);
    log::info!("{}", outcome.notice().message);

    let state = Arc::new(AppState::new(TriageState::new(records), default_path));
    let app = router(state, config.public_dir.clone());

    let listener = TcpListener::bind(&config.bind).await?;
    log::info!("Listening on http://{}", config.bind);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn serve_page() -> Html<&'static str> {
    Html(include_str!("./static/index.html"))
}

async fn get_catalog() -> Json<Catalog> {
    Json(Catalog {
        carriers: carrier_names(),
        statuses: Status::ALL
            .into_iter()
            .map(|value| StatusOption {
                value,
                label: value.label(),
            })
            .collect(),
    })
}

async fn get_records(State(state): State<Arc<AppState>>) -> Json<Snapshot> {
    Json(state.snapshot())
}

fn upload_failed(message: String) -> Response {
    log::error!("Failed to parse uploaded file: {}", message);
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::failure(
            NoticeLevel::Error,
            "Failed to parse the file; make sure it is an .xls or .xlsx workbook",
        )),
    )
        .into_response()
}

async fn upload_workbook(State(state): State<Arc<AppState>>, mut multipart: Multipart) -> Response {
    let mut file_data = None;

    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                if field.name() != Some("file") {
                    continue;
                }
                match field.bytes().await {
                    Ok(bytes) => file_data = Some(bytes),
                    Err(e) => return upload_failed(e.to_string()),
                }
            }
            Ok(None) => break,
            Err(e) => return upload_failed(e.to_string()),
        }
    }

    let Some(bytes) = file_data else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::failure(NoticeLevel::Error, "No file data received")),
        )
            .into_response();
    };

    // Parse before touching the shared state so a bad file changes nothing
    match records_from_upload(&bytes) {
        Ok((records, outcome)) => {
            log::info!("Uploaded workbook yielded {} shipment records", records.len());
            match state.transition(Event::Replace(records)) {
                Ok(snapshot) => Json(ApiResponse::with_notice(snapshot, outcome.notice())).into_response(),
                Err(e) => triage_error(e),
            }
        }
        Err(e) => upload_failed(e.to_string()),
    }
}

async fn reload_default(State(state): State<Arc<AppState>>) -> Response {
    let (records, outcome) = load_default(&state.default_path);

    match state.transition(Event::Replace(records)) {
        Ok(snapshot) => Json(ApiResponse::with_notice(snapshot, outcome.notice())).into_response(),
        Err(e) => triage_error(e),
    }
}

async fn search_records(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SearchRequest>,
) -> Response {
    respond(state.transition(Event::Search(payload.query)))
}

async fn filter_records(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<FilterRequest>,
) -> Response {
    respond(state.transition(Event::FilterCarrier(payload.carrier)))
}

async fn open_editor(Path(key): Path<u64>, State(state): State<Arc<AppState>>) -> Response {
    respond(state.transition(Event::OpenEditor(key)))
}

async fn close_editor(State(state): State<Arc<AppState>>) -> Response {
    respond(state.transition(Event::CloseEditor))
}

async fn save_editor(State(state): State<Arc<AppState>>, Json(form): Json<EditForm>) -> Response {
    match state.transition(Event::Save(form)) {
        Ok(snapshot) => Json(ApiResponse::with_notice(
            snapshot,
            Notice::new(NoticeLevel::Success, "Saved"),
        ))
        .into_response(),
        Err(e) => triage_error(e),
    }
}

async fn classify_token(Path(token): Path<String>) -> Json<ClassifyResponse> {
    Json(ClassifyResponse {
        company: classify(&token),
        tracking_number: token,
    })
}

// Preview extraction of a posted grid without touching the current records
async fn extract_grid(Json(grid): Json<CellGrid>) -> Json<Vec<ShipmentRecord>> {
    Json(extract(&grid))
}

async fn download_sample() -> Response {
    match sample_workbook() {
        Ok(bytes) => {
            let filename = sample_filename_today();
            let disposition = format!(
                "attachment; filename=\"sample.xlsx\"; filename*=UTF-8''{}",
                urlencoding::encode(&filename)
            );
            (
                [
                    (
                        header::CONTENT_TYPE,
                        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
                            .to_string(),
                    ),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                bytes,
            )
                .into_response()
        }
        Err(e) => {
            log::error!("Failed to generate sample workbook: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::failure(
                    NoticeLevel::Error,
                    "Failed to generate the sample file",
                )),
            )
                .into_response()
        }
    }
}

fn respond(result: Result<Snapshot, TriageError>) -> Response {
    match result {
        Ok(snapshot) => Json(ApiResponse::ok(snapshot)).into_response(),
        Err(e) => triage_error(e),
    }
}

fn triage_error(error: TriageError) -> Response {
    match error {
        TriageError::Invalid(errors) => {
            log::debug!("Edit rejected: {} invalid fields", errors.len());
            let body = ApiResponse {
                notice: Some(Notice::new(NoticeLevel::Error, error_message(&errors))),
                errors,
                state: None,
            };
            (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
        }
        TriageError::UnknownKey(_) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::failure(NoticeLevel::Error, error.to_string())),
        )
            .into_response(),
        TriageError::EditorClosed => (
            StatusCode::CONFLICT,
            Json(ApiResponse::failure(NoticeLevel::Error, error.to_string())),
        )
            .into_response(),
    }
}

fn error_message(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
