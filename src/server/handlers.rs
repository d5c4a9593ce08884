use super::types::{
    AnalyzeJobRequest, AnalyzeJobResponse, ErrorResponse, GenerateResponse, HistoryItem,
};
use crate::{
    Error, Result,
    agent::ResumePipeline,
    ats,
    history::{GenerationRecord, HistoryStorage, Identity, IdentityResolver},
    profile::{CandidateProfile, FormFields, download_filename},
};
use axum::{
    Form,
    extract::{
        Path, State,
        rejection::{FormRejection, JsonRejection},
    },
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header},
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct AppState {
    pub history: Arc<HistoryStorage>,
    pub pipeline: Arc<ResumePipeline>,
    pub identity: Arc<dyn IdentityResolver>,
    pub session_header: HeaderName,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

const NO_RESUME_MESSAGE: &str = "No resume found. Please generate a resume first.";

fn error_body(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Maps an error to the message shown to the caller. Internal details stay in
/// the logs.
pub fn error_response(err: &Error) -> ApiError {
    match err {
        Error::Validation(msg) => {
            warn!("Rejected request: {}", msg);
            error_body(StatusCode::BAD_REQUEST, msg.clone())
        }
        Error::NotFound(msg) => {
            warn!("Not found: {}", msg);
            error_body(StatusCode::NOT_FOUND, msg.clone())
        }
        Error::Generation { stage, message } => {
            error!("Resume generation failed at {} step: {}", stage, message);
            error_body(
                StatusCode::BAD_GATEWAY,
                format!("Error generating resume: {message}"),
            )
        }
        other => {
            error!("Internal error: {}", other);
            error_body(
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal server error occurred",
            )
        }
    }
}

/// Echoes an anonymous session id so the caller can come back for results.
fn with_session(state: &AppState, identity: &Identity, response: impl IntoResponse) -> Response {
    let mut response = response.into_response();
    if let Some(session_id) = identity.session_id() {
        if let Ok(value) = HeaderValue::from_str(session_id) {
            response
                .headers_mut()
                .insert(state.session_header.clone(), value);
        }
    }
    response
}

fn respond<T: IntoResponse>(state: &AppState, identity: &Identity, result: Result<T>) -> Response {
    match result {
        Ok(body) => with_session(state, identity, body),
        Err(e) => with_session(state, identity, error_response(&e)),
    }
}

/// Real-time job description feedback. Never touches the LLM.
pub async fn analyze_job(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: std::result::Result<Json<AnalyzeJobRequest>, JsonRejection>,
) -> Response {
    let identity = state.identity.resolve(&headers);

    let result = match payload {
        Ok(Json(request)) => analyze(request.job_description.as_deref().unwrap_or_default()),
        Err(rejection) => {
            warn!("Malformed analysis request: {}", rejection);
            Err(Error::validation(rejection.body_text()))
        }
    };

    respond(&state, &identity, result.map(Json))
}

fn analyze(job_description: &str) -> Result<AnalyzeJobResponse> {
    let analysis = ats::analyze_job_description(job_description)?;
    let estimated_score = ats::estimated_score(&analysis);

    info!(
        "Analyzed job description: {} keywords, score {}",
        analysis.estimated_keywords(),
        estimated_score
    );

    Ok(AnalyzeJobResponse {
        success: true,
        estimated_keywords: analysis.estimated_keywords(),
        estimated_score,
        analysis,
        suggestions: ats::SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
    })
}

pub async fn generate_resume(
    State(state): State<AppState>,
    headers: HeaderMap,
    form: std::result::Result<Form<Vec<(String, String)>>, FormRejection>,
) -> Response {
    let identity = state.identity.resolve(&headers);

    let result = match form {
        Ok(Form(pairs)) => generate_for(&state, &identity, FormFields::from(pairs)).await,
        Err(rejection) => Err(Error::validation(rejection.body_text())),
    };

    respond(&state, &identity, result.map(Json))
}

async fn generate_for(
    state: &AppState,
    identity: &Identity,
    form: FormFields,
) -> Result<GenerateResponse> {
    let profile = CandidateProfile::from_form(&form)?;
    let analysis = ats::analyze_job_description(&profile.job_description)?;

    info!(
        "Generating resume for '{}' targeting '{}'",
        profile.full_name, profile.target_position
    );

    let resume_text = state.pipeline.run(&profile).await?;

    let record = GenerationRecord::new(identity.owner_key(), &profile, resume_text, analysis)?;
    let id = record.id.clone();
    let resume_text = record.generated_resume.clone();
    let estimated_score = record.estimated_ats_score;
    let keywords_matched = record.keywords_matched;
    state.history.save(record).await?;

    info!(
        "Stored generation {} (score {}, {} keywords matched)",
        id, estimated_score, keywords_matched
    );

    Ok(GenerateResponse {
        id,
        session_id: identity.session_id().map(str::to_string),
        resume_text,
        estimated_score,
        keywords_matched,
    })
}

pub async fn latest_result(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let identity = state.identity.resolve(&headers);
    let result = state
        .history
        .latest(&identity.owner_key())
        .await
        .and_then(|record| record.ok_or_else(|| Error::not_found(NO_RESUME_MESSAGE)));

    respond(&state, &identity, result.map(Json))
}

pub async fn get_result(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let identity = state.identity.resolve(&headers);
    let result = state.history.get(&identity.owner_key(), &id).await;

    respond(&state, &identity, result.map(Json))
}

pub async fn download_resume(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let identity = state.identity.resolve(&headers);
    let result = state
        .history
        .get(&identity.owner_key(), &id)
        .await
        .and_then(attachment);

    respond(&state, &identity, result)
}

fn attachment(record: GenerationRecord) -> Result<Response> {
    let filename = download_filename(&record.full_name);
    let disposition = HeaderValue::from_bytes(
        format!("attachment; filename=\"{filename}\"").as_bytes(),
    )
    .map_err(|e| Error::internal(format!("Invalid Content-Disposition header: {e}")))?;

    Ok((
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/plain; charset=utf-8"),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        record.generated_resume,
    )
        .into_response())
}

pub async fn list_history(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let identity = state.identity.resolve(&headers);
    let result = state
        .history
        .list(&identity.owner_key())
        .await
        .map(|records| records.into_iter().map(HistoryItem::from).collect::<Vec<_>>());

    respond(&state, &identity, result.map(Json))
}
