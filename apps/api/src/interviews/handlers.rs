use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::gateway::{
    get_feedback_by_interview_id, get_interview_by_id, get_interviews_by_user_id,
    get_latest_interviews,
};
use crate::interviews::agent::{interviewer_agent, InterviewerAgent};
use crate::models::{Feedback, Interview};
use crate::state::AppState;
use crate::techstack::{tech_icons, TechIcon};

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: String,
}

#[derive(Deserialize)]
pub struct LatestQuery {
    pub user_id: String,
    pub limit: Option<usize>,
}

/// An interview plus the icons for its tech stack, resolved at response time.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewDetailResponse {
    #[serde(flatten)]
    pub interview: Interview,
    pub tech_icons: Vec<TechIcon>,
}

/// GET /api/v1/interviews
pub async fn handle_list_user_interviews(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<Interview>>, AppError> {
    let interviews = get_interviews_by_user_id(state.store.as_ref(), &params.user_id).await?;
    Ok(Json(interviews))
}

/// GET /api/v1/interviews/latest
pub async fn handle_latest_interviews(
    State(state): State<AppState>,
    Query(params): Query<LatestQuery>,
) -> Result<Json<Vec<Interview>>, AppError> {
    if params.limit == Some(0) {
        return Err(AppError::Validation("limit must be at least 1".to_string()));
    }
    let interviews =
        get_latest_interviews(state.store.as_ref(), &params.user_id, params.limit).await?;
    Ok(Json(interviews))
}

/// GET /api/v1/interviews/:id
pub async fn handle_get_interview(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<InterviewDetailResponse>, AppError> {
    let interview = find_interview(&state, &id).await?;
    let tech_icons = tech_icons(&interview.techstack);
    Ok(Json(InterviewDetailResponse {
        interview,
        tech_icons,
    }))
}

/// GET /api/v1/interviews/:id/feedback
pub async fn handle_get_feedback(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Feedback>, AppError> {
    let feedback = get_feedback_by_interview_id(state.store.as_ref(), &id, &params.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No feedback for interview {id}")))?;
    Ok(Json(feedback))
}

/// GET /api/v1/interviews/:id/agent
pub async fn handle_get_agent(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<InterviewerAgent>, AppError> {
    let interview = find_interview(&state, &id).await?;
    Ok(Json(interviewer_agent(&interview)))
}

async fn find_interview(state: &AppState, id: &str) -> Result<Interview, AppError> {
    get_interview_by_id(state.store.as_ref(), id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Interview {id} not found")))
}
