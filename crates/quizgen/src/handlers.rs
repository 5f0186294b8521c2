use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::catalog::{Subject, SubjectCatalog};
use crate::error::QuizError;
use crate::pipeline::{DEFAULT_NUM_QUESTIONS, GeneratorConfig, ObjectiveTest};
use crate::subjective::DEFAULT_SUBJECTIVE_QUESTIONS;
use crate::synth::QuestionRecord;
use crate::toolkit::Toolkit;

pub const MAX_QUESTIONS: usize = 50;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<SubjectCatalog>,
    pub toolkit: Toolkit,
    pub config: GeneratorConfig,
    pub max_questions: usize,
}

#[derive(Deserialize)]
pub struct CountQuery {
    pub num_questions: Option<usize>,
}

#[derive(Deserialize)]
pub struct CorpusRequest {
    pub text: String,
    pub num_questions: Option<usize>,
}

#[derive(Serialize)]
pub struct SubjectsResponse {
    subjects: Vec<String>,
}

#[derive(Serialize)]
pub struct ObjectiveResponse {
    subject: Option<String>,
    questions: Vec<String>,
    answers: Vec<String>,
    options: Vec<Vec<String>>,
}

impl ObjectiveResponse {
    fn new(subject: Option<String>, records: Vec<QuestionRecord>) -> Self {
        let mut response = Self {
            subject,
            questions: Vec::with_capacity(records.len()),
            answers: Vec::with_capacity(records.len()),
            options: Vec::with_capacity(records.len()),
        };
        for record in records {
            response.questions.push(record.question);
            response.answers.push(record.answer);
            response.options.push(record.similar);
        }
        response
    }
}

#[derive(Serialize)]
pub struct SubjectiveResponse {
    subject: String,
    questions: Vec<String>,
    answers: Vec<String>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/v1/subjects", get(subjects))
        .route("/v1/subjects/{subject}/objective", get(subject_objective))
        .route("/v1/subjects/{subject}/subjective", get(subject_subjective))
        .route("/v1/objective", post(adhoc_objective))
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    "ok"
}

async fn subjects(State(state): State<AppState>) -> Json<SubjectsResponse> {
    let subjects = state
        .catalog
        .names()
        .into_iter()
        .map(str::to_string)
        .collect();
    Json(SubjectsResponse { subjects })
}

async fn subject_objective(
    State(state): State<AppState>,
    Path(subject): Path<String>,
    Query(params): Query<CountQuery>,
) -> Result<Json<ObjectiveResponse>, ApiError> {
    let n = question_count(params.num_questions, DEFAULT_NUM_QUESTIONS, state.max_questions)?;
    let found = lookup(&state.catalog, &subject)?;
    let records = blocking(move || found.objective.generate_detailed(n)).await??;
    Ok(Json(ObjectiveResponse::new(Some(subject), records)))
}

async fn subject_subjective(
    State(state): State<AppState>,
    Path(subject): Path<String>,
    Query(params): Query<CountQuery>,
) -> Result<Json<SubjectiveResponse>, ApiError> {
    let n = question_count(
        params.num_questions,
        DEFAULT_SUBJECTIVE_QUESTIONS,
        state.max_questions,
    )?;
    let found = lookup(&state.catalog, &subject)?;
    let (questions, answers) = blocking(move || found.subjective.generate_test(n)).await??;
    Ok(Json(SubjectiveResponse {
        subject,
        questions,
        answers,
    }))
}

async fn adhoc_objective(
    State(state): State<AppState>,
    Json(body): Json<CorpusRequest>,
) -> Result<Json<ObjectiveResponse>, ApiError> {
    let n = question_count(body.num_questions, DEFAULT_NUM_QUESTIONS, state.max_questions)?;
    let toolkit = state.toolkit.clone();
    let config = state.config;
    let records = blocking(move || {
        ObjectiveTest::new(body.text, &toolkit, &config).generate_detailed(n)
    })
    .await??;
    Ok(Json(ObjectiveResponse::new(None, records)))
}

/// Extraction tags whole corpora; keep it off the async workers.
async fn blocking<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await.map_err(|err| {
        error!(error = %err, "question generation task failed");
        ApiError::Internal
    })
}

fn question_count(requested: Option<usize>, default: usize, max: usize) -> Result<usize, ApiError> {
    let n = requested.unwrap_or(default);
    if n > max {
        return Err(ApiError::bad_request(format!(
            "num_questions must be at most {max}"
        )));
    }
    Ok(n)
}

fn lookup(catalog: &SubjectCatalog, name: &str) -> Result<Arc<Subject>, ApiError> {
    catalog
        .get(name)
        .ok_or_else(|| ApiError::NotFound(format!("unknown subject: {name}")))
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Unprocessable(#[from] QuizError),
    #[error("internal server error")]
    Internal,
}

impl ApiError {
    fn bad_request<T: Into<String>>(msg: T) -> Self {
        ApiError::BadRequest(msg.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => {
                let body = Json(ErrorResponse { error: msg });
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            ApiError::NotFound(msg) => {
                let body = Json(ErrorResponse { error: msg });
                (StatusCode::NOT_FOUND, body).into_response()
            }
            ApiError::Unprocessable(err) => {
                let body = Json(ErrorResponse {
                    error: err.to_string(),
                });
                (StatusCode::UNPROCESSABLE_ENTITY, body).into_response()
            }
            ApiError::Internal => {
                let body = Json(json!({ "error": "internal server error" }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}
