use serde::{Deserialize, Serialize};

use crate::store::{Document, StoreError};

pub const INTERVIEWS_COLLECTION: &str = "interviews";

/// A mock interview: the role, its tech stack as typed by the user, and the
/// generated questions. Only finalized interviews are shown to other users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interview {
    /// Document id; not part of the stored body.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub role: String,
    /// Category tag, e.g. "technical", "behavioral", "mixed".
    #[serde(rename = "type", default)]
    pub interview_type: String,
    /// Raw skill names. Resolved to icons at response time, never normalized in storage.
    #[serde(default)]
    pub techstack: Vec<String>,
    #[serde(default)]
    pub questions: Vec<String>,
    pub user_id: String,
    #[serde(default)]
    pub finalized: bool,
    pub created_at: String,
}

impl Interview {
    pub fn from_document(doc: Document) -> Result<Self, StoreError> {
        let mut interview: Interview = serde_json::from_value(doc.data)?;
        interview.id = doc.id;
        Ok(interview)
    }
}
