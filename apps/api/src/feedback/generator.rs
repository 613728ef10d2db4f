//! Feedback generation: turns an interview transcript into a stored evaluation.
//!
//! Flow: format transcript → build prompt → schema-constrained model call →
//!       validate against FEEDBACK_SCHEMA → assemble record → upsert.
//!
//! Every failure collapses to `{success: false}` for the caller. The cause is
//! only logged. No retries: a failed run is re-initiated by the caller.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

use crate::feedback::prompts::{build_feedback_prompt, FEEDBACK_SYSTEM};
use crate::feedback::schema::{
    parse_generated_feedback, GeneratedFeedback, ParseFeedbackError, FEEDBACK_JSON_SCHEMA,
};
use crate::gateway::{upsert_feedback, UpsertTarget};
use crate::llm_client::{LlmError, StructuredModel};
use crate::models::{FeedbackRecord, TranscriptTurn};
use crate::store::{DocumentStore, StoreError};

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeedbackRequest {
    pub interview_id: String,
    pub user_id: String,
    pub transcript: Vec<TranscriptTurn>,
    /// Present when re-evaluating: the existing feedback document is overwritten.
    #[serde(default)]
    pub feedback_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeedbackResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback_id: Option<String>,
}

impl CreateFeedbackResult {
    fn stored(feedback_id: String) -> Self {
        Self {
            success: true,
            feedback_id: Some(feedback_id),
        }
    }

    pub(crate) fn failed() -> Self {
        Self {
            success: false,
            feedback_id: None,
        }
    }
}

/// Internal failure kinds. Logged, never returned to callers.
#[derive(Debug, Error)]
enum FeedbackError {
    #[error("model call failed: {0}")]
    Model(#[from] LlmError),

    #[error("model output rejected: {0}")]
    Invalid(#[from] ParseFeedbackError),

    #[error("storage failed: {0}")]
    Store(#[from] StoreError),
}

impl FeedbackError {
    fn kind(&self) -> &'static str {
        match self {
            FeedbackError::Model(_) => "model",
            FeedbackError::Invalid(_) => "validation",
            FeedbackError::Store(_) => "store",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Generation pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Generates feedback for a transcript and stores it.
///
/// An empty transcript still goes to the model.
pub async fn create_feedback(
    model: &dyn StructuredModel,
    store: &dyn DocumentStore,
    request: CreateFeedbackRequest,
) -> CreateFeedbackResult {
    let interview_id = request.interview_id.clone();
    let user_id = request.user_id.clone();

    match generate_and_store(model, store, request).await {
        Ok(feedback_id) => CreateFeedbackResult::stored(feedback_id),
        Err(e) => {
            error!(
                kind = e.kind(),
                "Error saving feedback for interview {interview_id} / user {user_id}: {e}"
            );
            CreateFeedbackResult::failed()
        }
    }
}

async fn generate_and_store(
    model: &dyn StructuredModel,
    store: &dyn DocumentStore,
    request: CreateFeedbackRequest,
) -> Result<String, FeedbackError> {
    info!(
        "Generating feedback for interview {} ({} transcript turns)",
        request.interview_id,
        request.transcript.len()
    );

    let prompt = build_feedback_prompt(&request.transcript);
    let raw = model
        .generate_object(&prompt, FEEDBACK_SYSTEM, &FEEDBACK_JSON_SCHEMA)
        .await?;
    let generated = parse_generated_feedback(raw)?;

    info!(
        "Feedback generated: total_score={} for interview {}",
        generated.total_score, request.interview_id
    );

    let record = assemble_record(
        request.interview_id,
        request.user_id,
        generated,
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    );

    let target = UpsertTarget::from_optional_id(request.feedback_id);
    Ok(upsert_feedback(store, &record, target).await?)
}

fn assemble_record(
    interview_id: String,
    user_id: String,
    generated: GeneratedFeedback,
    created_at: String,
) -> FeedbackRecord {
    FeedbackRecord {
        interview_id,
        user_id,
        total_score: generated.total_score,
        category_scores: generated.category_scores,
        detailed_feedback: generated.detailed_feedback,
        strengths: generated.strengths,
        areas_for_improvement: generated.areas_for_improvement,
        final_assessment: generated.final_assessment,
        created_at,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::schema::fixtures::valid_feedback_json;
    use crate::gateway::get_feedback_by_interview_id;
    use crate::llm_client::testing::StubModel;
    use crate::models::{Category, TranscriptRole, FEEDBACK_COLLECTION};
    use crate::store::{Document, MemoryDocumentStore, Query};
    use async_trait::async_trait;
    use serde_json::Value;

    fn three_turn_transcript() -> Vec<TranscriptTurn> {
        vec![
            TranscriptTurn {
                role: TranscriptRole::Assistant,
                content: "How would you scale a read-heavy service?".to_string(),
            },
            TranscriptTurn {
                role: TranscriptRole::User,
                content: "Add a cache and read replicas.".to_string(),
            },
            TranscriptTurn {
                role: TranscriptRole::Assistant,
                content: "Thanks, that's all for today.".to_string(),
            },
        ]
    }

    fn request(feedback_id: Option<&str>) -> CreateFeedbackRequest {
        CreateFeedbackRequest {
            interview_id: "iv-1".to_string(),
            user_id: "u1".to_string(),
            transcript: three_turn_transcript(),
            feedback_id: feedback_id.map(str::to_string),
        }
    }

    async fn feedback_count(store: &MemoryDocumentStore) -> usize {
        store
            .query(FEEDBACK_COLLECTION, &Query::new())
            .await
            .unwrap()
            .len()
    }

    /// A store that refuses every operation.
    struct BrokenStore;

    #[async_trait]
    impl DocumentStore for BrokenStore {
        async fn get(&self, _: &str, _: &str) -> Result<Option<Document>, StoreError> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }

        async fn query(&self, _: &str, _: &Query) -> Result<Vec<Document>, StoreError> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }

        async fn set(&self, _: &str, _: &str, _: Value) -> Result<(), StoreError> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }
    }

    #[tokio::test]
    async fn test_end_to_end_stores_generated_feedback() {
        let model = StubModel::returning(valid_feedback_json(72.0));
        let store = MemoryDocumentStore::new();

        let result = create_feedback(&model, &store, request(None)).await;
        assert!(result.success);
        let feedback_id = result.feedback_id.expect("feedback id on success");

        let stored = get_feedback_by_interview_id(&store, "iv-1", "u1")
            .await
            .unwrap()
            .expect("feedback stored");
        assert_eq!(stored.id, feedback_id);
        assert_eq!(stored.record.total_score, 72.0);
        assert_eq!(stored.record.category_scores[0].name, Category::CommunicationSkills);
        assert_eq!(stored.record.detailed_feedback.len(), 1);
        assert!(!stored.record.created_at.is_empty());
    }

    #[tokio::test]
    async fn test_prompt_contains_formatted_transcript() {
        let model = StubModel::returning(valid_feedback_json(50.0));
        let store = MemoryDocumentStore::new();

        create_feedback(&model, &store, request(None)).await;

        let prompts = model.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("- user: Add a cache and read replicas.\n"));
    }

    #[tokio::test]
    async fn test_existing_feedback_id_is_overwritten() {
        let store = MemoryDocumentStore::new();

        let first = create_feedback(
            &StubModel::returning(valid_feedback_json(40.0)),
            &store,
            request(Some("fb-7")),
        )
        .await;
        let second = create_feedback(
            &StubModel::returning(valid_feedback_json(90.0)),
            &store,
            request(Some("fb-7")),
        )
        .await;

        assert_eq!(first.feedback_id.as_deref(), Some("fb-7"));
        assert_eq!(second.feedback_id.as_deref(), Some("fb-7"));
        assert_eq!(feedback_count(&store).await, 1);

        let stored = get_feedback_by_interview_id(&store, "iv-1", "u1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.record.total_score, 90.0);
    }

    #[tokio::test]
    async fn test_invalid_model_output_is_not_persisted() {
        let mut bad = valid_feedback_json(72.0);
        bad["detailedFeedback"][0]
            .as_object_mut()
            .unwrap()
            .remove("userAnswer");
        let model = StubModel::returning(bad);
        let store = MemoryDocumentStore::new();

        let result = create_feedback(&model, &store, request(None)).await;

        assert_eq!(result, CreateFeedbackResult::failed());
        assert_eq!(feedback_count(&store).await, 0);
    }

    #[tokio::test]
    async fn test_wrong_category_order_is_not_persisted() {
        let mut bad = valid_feedback_json(72.0);
        bad["categoryScores"].as_array_mut().unwrap().swap(3, 4);
        let store = MemoryDocumentStore::new();

        let result = create_feedback(&StubModel::returning(bad), &store, request(None)).await;

        assert!(!result.success);
        assert_eq!(feedback_count(&store).await, 0);
    }

    #[tokio::test]
    async fn test_model_failure_collapses_to_failure() {
        let store = MemoryDocumentStore::new();
        let result = create_feedback(&StubModel::failing(), &store, request(None)).await;
        assert_eq!(result, CreateFeedbackResult::failed());
        assert_eq!(feedback_count(&store).await, 0);
    }

    #[tokio::test]
    async fn test_store_failure_collapses_to_failure() {
        let model = StubModel::returning(valid_feedback_json(72.0));
        let result = create_feedback(&model, &BrokenStore, request(None)).await;
        assert_eq!(result, CreateFeedbackResult::failed());
        assert_eq!(model.call_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_transcript_still_calls_model() {
        let model = StubModel::returning(valid_feedback_json(5.0));
        let store = MemoryDocumentStore::new();
        let mut req = request(None);
        req.transcript.clear();

        let result = create_feedback(&model, &store, req).await;

        assert!(result.success);
        assert_eq!(model.call_count(), 1);
    }

    #[test]
    fn test_result_serialization() {
        let ok = serde_json::to_value(CreateFeedbackResult::stored("fb-1".to_string())).unwrap();
        assert_eq!(ok, serde_json::json!({"success": true, "feedbackId": "fb-1"}));

        let failed = serde_json::to_value(CreateFeedbackResult::failed()).unwrap();
        assert_eq!(failed, serde_json::json!({"success": false}));
    }

    #[test]
    fn test_request_deserialization() {
        let req: CreateFeedbackRequest = serde_json::from_value(serde_json::json!({
            "interviewId": "iv-3",
            "userId": "u9",
            "transcript": [{"role": "user", "content": "Hello"}]
        }))
        .unwrap();
        assert_eq!(req.interview_id, "iv-3");
        assert!(req.feedback_id.is_none());
        assert_eq!(req.transcript[0].role, TranscriptRole::User);
    }
}
