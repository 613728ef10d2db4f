use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::warn;

use crate::feedback::generator::{create_feedback, CreateFeedbackRequest, CreateFeedbackResult};
use crate::state::AppState;

/// POST /api/v1/feedback
/// Always 200: failure is reported as `{"success": false}`, including an undecodable body.
pub async fn handle_create_feedback(
    State(state): State<AppState>,
    body: Result<Json<CreateFeedbackRequest>, JsonRejection>,
) -> Json<CreateFeedbackResult> {
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => {
            warn!("Rejected feedback request body: {}", rejection.body_text());
            return Json(CreateFeedbackResult::failed());
        }
    };

    Json(create_feedback(state.model.as_ref(), state.store.as_ref(), req).await)
}
