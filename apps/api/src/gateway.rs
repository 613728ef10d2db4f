//! Persistence gateway: every read and write of interviews and feedback.
//!
//! Not-found is `Ok(None)` / an empty list. Store failures come back as an
//! opaque `StoreError`; callers cannot tell an unreachable store from a bad query.

use tracing::{info, warn};

use crate::models::{
    Feedback, FeedbackRecord, Interview, FEEDBACK_COLLECTION, INTERVIEWS_COLLECTION,
};
use crate::store::{Document, DocumentStore, Query, StoreError};

pub const DEFAULT_LATEST_LIMIT: usize = 20;

/// Where an upsert writes: a freshly allocated document, or an existing id
/// that is overwritten (or created) in full.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertTarget {
    Create,
    UpdateExisting(String),
}

impl UpsertTarget {
    /// An absent or blank id means create.
    pub fn from_optional_id(id: Option<String>) -> Self {
        match id {
            Some(id) if !id.trim().is_empty() => UpsertTarget::UpdateExisting(id),
            _ => UpsertTarget::Create,
        }
    }
}

/// Writes a feedback record and returns the id it was stored under.
/// Overwrites replace the whole document; no field merging.
pub async fn upsert_feedback(
    store: &dyn DocumentStore,
    record: &FeedbackRecord,
    target: UpsertTarget,
) -> Result<String, StoreError> {
    let id = match target {
        UpsertTarget::Create => store.new_id(),
        UpsertTarget::UpdateExisting(id) => id,
    };

    store
        .set(FEEDBACK_COLLECTION, &id, serde_json::to_value(record)?)
        .await?;

    info!(
        "Stored feedback {id} for interview {} / user {}",
        record.interview_id, record.user_id
    );
    Ok(id)
}

pub async fn get_interview_by_id(
    store: &dyn DocumentStore,
    id: &str,
) -> Result<Option<Interview>, StoreError> {
    store
        .get(INTERVIEWS_COLLECTION, id)
        .await?
        .map(Interview::from_document)
        .transpose()
}

/// First feedback matching both ids. Duplicates are not prevented here.
pub async fn get_feedback_by_interview_id(
    store: &dyn DocumentStore,
    interview_id: &str,
    user_id: &str,
) -> Result<Option<Feedback>, StoreError> {
    let query = Query::new()
        .where_eq("interviewId", interview_id)
        .where_eq("userId", user_id)
        .limit(1);

    store
        .query(FEEDBACK_COLLECTION, &query)
        .await?
        .into_iter()
        .next()
        .map(Feedback::from_document)
        .transpose()
}

/// Finalized interviews owned by anyone except `user_id`, newest first.
pub async fn get_latest_interviews(
    store: &dyn DocumentStore,
    user_id: &str,
    limit: Option<usize>,
) -> Result<Vec<Interview>, StoreError> {
    let query = Query::new()
        .where_eq("finalized", true)
        .where_ne("userId", user_id)
        .order_desc("createdAt")
        .limit(limit.unwrap_or(DEFAULT_LATEST_LIMIT));

    let docs = store.query(INTERVIEWS_COLLECTION, &query).await?;
    Ok(decode_interviews(docs))
}

/// Every interview owned by `user_id`, finalized or not, newest first.
pub async fn get_interviews_by_user_id(
    store: &dyn DocumentStore,
    user_id: &str,
) -> Result<Vec<Interview>, StoreError> {
    let query = Query::new()
        .where_eq("userId", user_id)
        .order_desc("createdAt");

    let docs = store.query(INTERVIEWS_COLLECTION, &query).await?;
    Ok(decode_interviews(docs))
}

/// Malformed interview documents are skipped so one bad record cannot hide the rest.
fn decode_interviews(docs: Vec<Document>) -> Vec<Interview> {
    docs.into_iter()
        .filter_map(|doc| {
            let id = doc.id.clone();
            match Interview::from_document(doc) {
                Ok(interview) => Some(interview),
                Err(e) => {
                    warn!("Skipping undecodable interview {id}: {e}");
                    None
                }
            }
        })
        .collect()
}


#[cfg(test)]
mod tests {
    use super::fixtures::seed_interview;
    use super::*;
    use crate::models::{Category, CategoryScore};
    use crate::store::MemoryDocumentStore;

    fn record(interview_id: &str, user_id: &str, total_score: f64, assessment: &str) -> FeedbackRecord {
        FeedbackRecord {
            interview_id: interview_id.to_string(),
            user_id: user_id.to_string(),
            total_score,
            category_scores: Category::ALL.map(|name| CategoryScore {
                name,
                score: total_score,
                comment: "noted".to_string(),
            }),
            detailed_feedback: vec![],
            strengths: vec!["Structured answers".to_string()],
            areas_for_improvement: vec![],
            final_assessment: assessment.to_string(),
            created_at: "2026-06-01T12:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn test_upsert_target_from_optional_id() {
        assert_eq!(UpsertTarget::from_optional_id(None), UpsertTarget::Create);
        assert_eq!(
            UpsertTarget::from_optional_id(Some("  ".to_string())),
            UpsertTarget::Create
        );
        assert_eq!(
            UpsertTarget::from_optional_id(Some("fb-9".to_string())),
            UpsertTarget::UpdateExisting("fb-9".to_string())
        );
    }

    #[tokio::test]
    async fn test_create_allocates_new_ids() {
        let store = MemoryDocumentStore::new();
        let first = upsert_feedback(&store, &record("iv-1", "u1", 50.0, "a"), UpsertTarget::Create)
            .await
            .unwrap();
        let second = upsert_feedback(&store, &record("iv-2", "u1", 60.0, "b"), UpsertTarget::Create)
            .await
            .unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_update_existing_uses_given_id_even_when_absent() {
        let store = MemoryDocumentStore::new();
        let id = upsert_feedback(
            &store,
            &record("iv-1", "u1", 40.0, "first"),
            UpsertTarget::UpdateExisting("fb-fixed".to_string()),
        )
        .await
        .unwrap();
        assert_eq!(id, "fb-fixed");
        assert!(store.get(FEEDBACK_COLLECTION, "fb-fixed").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_second_upsert_overwrites_entirely() {
        let store = MemoryDocumentStore::new();
        let target = UpsertTarget::UpdateExisting("fb-1".to_string());

        let mut first = record("iv-1", "u1", 40.0, "first pass");
        first.areas_for_improvement = vec!["Be concise".to_string()];
        upsert_feedback(&store, &first, target.clone()).await.unwrap();

        let second = record("iv-1", "u1", 85.0, "second pass");
        upsert_feedback(&store, &second, target).await.unwrap();

        let stored = get_feedback_by_interview_id(&store, "iv-1", "u1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.id, "fb-1");
        assert_eq!(stored.record, second);
        assert!(stored.record.areas_for_improvement.is_empty());
    }

    #[tokio::test]
    async fn test_feedback_lookup_without_match_is_none() {
        let store = MemoryDocumentStore::new();
        upsert_feedback(&store, &record("iv-1", "u1", 70.0, "x"), UpsertTarget::Create)
            .await
            .unwrap();

        assert!(get_feedback_by_interview_id(&store, "iv-1", "u2")
            .await
            .unwrap()
            .is_none());
        assert!(get_feedback_by_interview_id(&store, "iv-2", "u1")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_get_interview_by_id() {
        let store = MemoryDocumentStore::new();
        seed_interview(&store, "iv-1", "u1", true, "2026-01-01T00:00:00.000Z").await;

        let interview = get_interview_by_id(&store, "iv-1").await.unwrap().unwrap();
        assert_eq!(interview.id, "iv-1");
        assert_eq!(interview.user_id, "u1");
        assert!(get_interview_by_id(&store, "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_latest_interviews_excludes_own_and_unfinalized() {
        let store = MemoryDocumentStore::new();
        for (i, day) in ["01", "02", "03", "04", "05"].iter().enumerate() {
            seed_interview(
                &store,
                &format!("other-{i}"),
                &format!("user-{i}"),
                true,
                &format!("2026-02-{day}T09:00:00.000Z"),
            )
            .await;
        }
        seed_interview(&store, "draft", "user-B", false, "2026-02-20T09:00:00.000Z").await;
        seed_interview(&store, "mine", "user-A", true, "2026-02-21T09:00:00.000Z").await;

        let latest = get_latest_interviews(&store, "user-A", Some(2)).await.unwrap();

        let ids: Vec<&str> = latest.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["other-4", "other-3"]);
        assert!(latest.iter().all(|i| i.finalized && i.user_id != "user-A"));
    }

    #[tokio::test]
    async fn test_latest_interviews_default_limit() {
        let store = MemoryDocumentStore::new();
        for i in 0..25 {
            seed_interview(
                &store,
                &format!("iv-{i:02}"),
                "someone",
                true,
                &format!("2026-03-01T00:00:{i:02}.000Z"),
            )
            .await;
        }

        let latest = get_latest_interviews(&store, "viewer", None).await.unwrap();
        assert_eq!(latest.len(), DEFAULT_LATEST_LIMIT);
        assert_eq!(latest[0].id, "iv-24");
    }

    #[tokio::test]
    async fn test_interviews_by_user_include_unfinalized_newest_first() {
        let store = MemoryDocumentStore::new();
        seed_interview(&store, "old", "u1", true, "2026-01-01T00:00:00.000Z").await;
        seed_interview(&store, "new", "u1", false, "2026-01-09T00:00:00.000Z").await;
        seed_interview(&store, "theirs", "u2", true, "2026-01-05T00:00:00.000Z").await;

        let mine = get_interviews_by_user_id(&store, "u1").await.unwrap();
        let ids: Vec<&str> = mine.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old"]);
    }

    #[tokio::test]
    async fn test_undecodable_interview_does_not_hide_the_rest() {
        let store = MemoryDocumentStore::new();
        seed_interview(&store, "good", "u2", true, "2026-01-01T00:00:00.000Z").await;
        store
            .set(
                INTERVIEWS_COLLECTION,
                "broken",
                serde_json::json!({
                    "userId": "u2",
                    "finalized": true,
                    "questions": 7,
                    "createdAt": "2026-01-02T00:00:00.000Z"
                }),
            )
            .await
            .unwrap();

        let latest = get_latest_interviews(&store, "u1", None).await.unwrap();
        let ids: Vec<&str> = latest.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["good"]);

        let owned = get_interviews_by_user_id(&store, "u2").await.unwrap();
        assert_eq!(owned.len(), 1);
    }
}
