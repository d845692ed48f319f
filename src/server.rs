// Expense Tracker - REST API with Axum
//
// Stateless: every request carries its credentials in the x-username /
// x-password headers and runs one full controller pass.

use crate::aggregate::Summary;
use crate::auth::{Credentials, StaticCredentials};
use crate::code_examples::Language;
use crate::controller::{Page, Request, Screen, Submission, ViewController, Visualization};
use crate::currency::Currency;
use crate::db::ExpenseRecord;
use crate::error::TrackerError;
use crate::export::EXPORT_FILE_NAME;
use crate::form::ExpenseForm;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, warn};

pub const USERNAME_HEADER: &str = "x-username";
pub const PASSWORD_HEADER: &str = "x-password";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    controller: Arc<ViewController<StaticCredentials>>,
    currency: Currency,
}

impl AppState {
    pub fn new(controller: ViewController<StaticCredentials>, currency: Currency) -> Self {
        Self {
            controller: Arc::new(controller),
            currency,
        }
    }
}

/// API Response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub enum ApiError {
    Tracker(TrackerError),
    NotFound(String),
    BadBody(String),
    Internal(String),
}

impl From<TrackerError> for ApiError {
    fn from(e: TrackerError) -> Self {
        ApiError::Tracker(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Tracker(TrackerError::AuthFailure) => {
                (StatusCode::UNAUTHORIZED, TrackerError::AuthFailure.to_string())
            }
            ApiError::Tracker(e @ TrackerError::Validation(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
            }
            ApiError::Tracker(e) => {
                error!(error = %e, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::BadBody(message) => (StatusCode::UNPROCESSABLE_ENTITY, message),
            ApiError::Internal(message) => {
                error!(%message, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };

        (status, Json(ApiResponse::<()>::err(message))).into_response()
    }
}

type ApiResult<T> = std::result::Result<T, ApiError>;

fn unexpected(screen: &Screen, wanted: Page) -> ApiError {
    ApiError::Internal(format!(
        "expected the {} page, controller rendered {}",
        wanted.title(),
        screen.page().title()
    ))
}

// ============================================================================
// Request / response shapes
// ============================================================================

/// `?currency=EUR` on any GET. Label only.
#[derive(Debug, Default, Deserialize)]
pub struct DisplayQuery {
    currency: Option<Currency>,
}

#[derive(Serialize)]
struct DashboardResponse {
    currency: Currency,
    recent: Vec<ExpenseRecord>,
}

#[derive(Serialize)]
struct ExpensesResponse {
    currency: Currency,
    count: usize,
    records: Vec<ExpenseRecord>,
}

#[derive(Serialize)]
struct VisualizeResponse {
    currency: Currency,
    #[serde(skip_serializing_if = "Option::is_none")]
    notice: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_spending: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<Summary>,
}

#[derive(Serialize)]
struct CodeExampleResponse {
    language: Language,
    snippet: &'static str,
}

fn credentials(headers: &HeaderMap) -> Credentials {
    let field = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    };
    Credentials::new(field(USERNAME_HEADER), field(PASSWORD_HEADER))
}

impl AppState {
    fn request(&self, headers: &HeaderMap, page: Page, query: &DisplayQuery) -> Request {
        Request::new(credentials(headers), page)
            .with_currency(query.currency.unwrap_or(self.currency))
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/dashboard - The five most recent expenses
async fn dashboard(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<DisplayQuery>,
) -> ApiResult<Json<ApiResponse<DashboardResponse>>> {
    let request = state.request(&headers, Page::Dashboard, &query);
    match state.controller.handle(&request)? {
        Screen::Dashboard {
            currency, recent, ..
        } => Ok(Json(ApiResponse::ok(DashboardResponse { currency, recent }))),
        other => Err(unexpected(&other, Page::Dashboard)),
    }
}

/// POST /api/expenses - Add one expense
///
/// The body is only decoded once the credentials pass.
async fn add_expense(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: std::result::Result<Json<ExpenseForm>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ApiResponse<ExpenseRecord>>)> {
    state.controller.admit(&credentials(&headers))?;
    let Json(form) = body.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "malformed expense body");
        ApiError::BadBody(rejection.body_text())
    })?;

    let request = state
        .request(&headers, Page::AddExpense, &DisplayQuery::default())
        .with_submission(form);

    match state.controller.handle(&request)? {
        Screen::AddExpense {
            submission: Some(Submission::Added(record)),
            ..
        } => Ok((StatusCode::CREATED, Json(ApiResponse::ok(record)))),
        Screen::AddExpense {
            submission: Some(Submission::Rejected(e)),
            ..
        } => {
            warn!(error = %e, "rejected expense submission");
            Err(TrackerError::Validation(e).into())
        }
        other => Err(unexpected(&other, Page::AddExpense)),
    }
}

/// GET /api/expenses - The full table
async fn list_expenses(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<DisplayQuery>,
) -> ApiResult<Json<ApiResponse<ExpensesResponse>>> {
    let request = state.request(&headers, Page::ViewExpenses, &query);
    match state.controller.handle(&request)? {
        Screen::ViewExpenses {
            currency, records, ..
        } => Ok(Json(ApiResponse::ok(ExpensesResponse {
            currency,
            count: records.len(),
            records,
        }))),
        other => Err(unexpected(&other, Page::ViewExpenses)),
    }
}

/// GET /api/expenses/export - Download Expenses as CSV
async fn export_expenses(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let request = state.request(&headers, Page::ViewExpenses, &DisplayQuery::default());
    match state.controller.handle(&request)? {
        Screen::ViewExpenses {
            export: Some(csv), ..
        } => Ok((
            [
                (header::CONTENT_TYPE, "text/csv".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME),
                ),
            ],
            csv,
        )
            .into_response()),
        Screen::ViewExpenses { export: None, .. } => {
            Err(ApiError::NotFound("No expenses to export".to_string()))
        }
        other => Err(unexpected(&other, Page::ViewExpenses)),
    }
}

/// GET /api/visualize - Expense analysis
async fn visualize(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<DisplayQuery>,
) -> ApiResult<Json<ApiResponse<VisualizeResponse>>> {
    let request = state.request(&headers, Page::Visualize, &query);
    match state.controller.handle(&request)? {
        Screen::Visualize {
            currency,
            visualization,
        } => {
            let response = match visualization {
                Visualization::Empty { notice } => VisualizeResponse {
                    currency,
                    notice: Some(notice),
                    total_spending: None,
                    summary: None,
                },
                Visualization::Charts(summary) => VisualizeResponse {
                    currency,
                    notice: None,
                    total_spending: Some(currency.format(summary.total)),
                    summary: Some(summary),
                },
            };
            Ok(Json(ApiResponse::ok(response)))
        }
        other => Err(unexpected(&other, Page::Visualize)),
    }
}

/// GET /api/code-examples/:language - Static reference snippets
async fn code_example(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(language): Path<String>,
) -> ApiResult<Json<ApiResponse<CodeExampleResponse>>> {
    let language: Language = language.parse().map_err(ApiError::NotFound)?;
    let request = state
        .request(&headers, Page::CodeExamples, &DisplayQuery::default())
        .with_language(language);

    match state.controller.handle(&request)? {
        Screen::CodeExamples { language, snippet } => {
            Ok(Json(ApiResponse::ok(CodeExampleResponse { language, snippet })))
        }
        other => Err(unexpected(&other, Page::CodeExamples)),
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/dashboard", get(dashboard))
        .route("/expenses", get(list_expenses).post(add_expense))
        .route("/expenses/export", get(export_expenses))
        .route("/visualize", get(visualize))
        .route("/code-examples/:language", get(code_example))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}
