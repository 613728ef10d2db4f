pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::feedback::handlers as feedback;
use crate::interviews::handlers as interviews;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Feedback API
        .route("/api/v1/feedback", post(feedback::handle_create_feedback))
        // Interview API
        .route(
            "/api/v1/interviews",
            get(interviews::handle_list_user_interviews),
        )
        .route(
            "/api/v1/interviews/latest",
            get(interviews::handle_latest_interviews),
        )
        .route("/api/v1/interviews/:id", get(interviews::handle_get_interview))
        .route(
            "/api/v1/interviews/:id/feedback",
            get(interviews::handle_get_feedback),
        )
        .route(
            "/api/v1/interviews/:id/agent",
            get(interviews::handle_get_agent),
        )
        .with_state(state)
}
