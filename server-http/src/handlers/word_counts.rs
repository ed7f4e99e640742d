use crate::api::{QueuedResponse, WordCountsResponse};
use crate::error::ApiError;
use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use bulletin::Job;
use tracing::info;

/// POST /word_counts - Queue a recount and return without waiting for it
pub async fn request_word_counts(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<QueuedResponse>), ApiError> {
    state.jobs.enqueue(Job::CountWords)?;
    info!("WORD_COUNTS: recount queued");
    Ok((StatusCode::ACCEPTED, Json(QueuedResponse { queued: true })))
}

/// GET /word_counts - Latest published counts; 404 until a run lands or after it expires
pub async fn get_word_counts(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<WordCountsResponse>), ApiError> {
    match state.word_counts.read().await? {
        Some(counts) => Ok((
            StatusCode::OK,
            Json(WordCountsResponse {
                found: true,
                counts: Some(counts),
            }),
        )),
        None => Ok((
            StatusCode::NOT_FOUND,
            Json(WordCountsResponse {
                found: false,
                counts: None,
            }),
        )),
    }
}
