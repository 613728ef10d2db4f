use std::fmt;

use serde::{Deserialize, Serialize};

use crate::store::{Document, StoreError};

pub const FEEDBACK_COLLECTION: &str = "feedback";

/// The fixed evaluation dimensions, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Communication Skills")]
    CommunicationSkills,
    #[serde(rename = "Technical Knowledge")]
    TechnicalKnowledge,
    #[serde(rename = "Problem Solving")]
    ProblemSolving,
    #[serde(rename = "Critical Thinking")]
    CriticalThinking,
    #[serde(rename = "Confidence and Clarity")]
    ConfidenceAndClarity,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::CommunicationSkills,
        Category::TechnicalKnowledge,
        Category::ProblemSolving,
        Category::CriticalThinking,
        Category::ConfidenceAndClarity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::CommunicationSkills => "Communication Skills",
            Category::TechnicalKnowledge => "Technical Knowledge",
            Category::ProblemSolving => "Problem Solving",
            Category::CriticalThinking => "Critical Thinking",
            Category::ConfidenceAndClarity => "Confidence and Clarity",
        }
    }

    /// What the evaluator looks at for this dimension.
    pub fn description(&self) -> &'static str {
        match self {
            Category::CommunicationSkills => {
                "Clarity, articulation, and logical structure of responses."
            }
            Category::TechnicalKnowledge => {
                "Depth and accuracy of technical concepts relevant to the role."
            }
            Category::ProblemSolving => {
                "Ability to understand problems, reason through them, and propose solutions."
            }
            Category::CriticalThinking => {
                "Ability to think independently, challenge assumptions, and offer well-reasoned insights."
            }
            Category::ConfidenceAndClarity => {
                "Demonstrated self-assurance, engagement, and overall clarity when responding."
            }
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub name: Category,
    pub score: f64,
    pub comment: String,
}

/// Evaluation of one interview question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionFeedback {
    pub question: String,
    pub user_answer: String,
    pub feedback: String,
    pub example_response: String,
}

/// Who spoke a transcript turn. Roles the voice agent invents are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TranscriptRole {
    User,
    Assistant,
    System,
    Other(String),
}

impl TranscriptRole {
    pub fn as_str(&self) -> &str {
        match self {
            TranscriptRole::User => "user",
            TranscriptRole::Assistant => "assistant",
            TranscriptRole::System => "system",
            TranscriptRole::Other(role) => role,
        }
    }
}

impl From<String> for TranscriptRole {
    fn from(role: String) -> Self {
        match role.as_str() {
            "user" => TranscriptRole::User,
            "assistant" => TranscriptRole::Assistant,
            "system" => TranscriptRole::System,
            _ => TranscriptRole::Other(role),
        }
    }
}

impl From<TranscriptRole> for String {
    fn from(role: TranscriptRole) -> Self {
        match role {
            TranscriptRole::Other(role) => role,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for TranscriptRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptTurn {
    pub role: TranscriptRole,
    pub content: String,
}

/// The persisted body of a feedback document.
///
/// `category_scores` is a fixed-size array: exactly the five categories, in `Category::ALL` order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    pub interview_id: String,
    pub user_id: String,
    pub total_score: f64,
    pub category_scores: [CategoryScore; 5],
    pub detailed_feedback: Vec<QuestionFeedback>,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub final_assessment: String,
    pub created_at: String,
}

/// A stored feedback document with its id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub id: String,
    #[serde(flatten)]
    pub record: FeedbackRecord,
}

impl Feedback {
    pub fn from_document(doc: Document) -> Result<Self, StoreError> {
        Ok(Feedback {
            record: serde_json::from_value(doc.data)?,
            id: doc.id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_category_serializes_as_display_name() {
        for category in Category::ALL {
            assert_eq!(
                serde_json::to_value(category).unwrap(),
                json!(category.as_str())
            );
        }
    }

    #[test]
    fn test_transcript_turn_roles_are_lowercase() {
        let turn: TranscriptTurn =
            serde_json::from_value(json!({"role": "assistant", "content": "Hello"})).unwrap();
        assert_eq!(turn.role, TranscriptRole::Assistant);
        assert_eq!(turn.role.to_string(), "assistant");
    }

    #[test]
    fn test_unlisted_role_is_kept_verbatim() {
        let turn: TranscriptTurn =
            serde_json::from_value(json!({"role": "bot", "content": "hi"})).unwrap();
        assert_eq!(turn.role, TranscriptRole::Other("bot".to_string()));
        assert_eq!(turn.role.to_string(), "bot");
        assert_eq!(serde_json::to_value(&turn).unwrap()["role"], "bot");
    }

    #[test]
    fn test_feedback_json_is_flat_with_id() {
        let scores = Category::ALL.map(|name| CategoryScore {
            name,
            score: 60.0,
            comment: "ok".to_string(),
        });
        let feedback = Feedback {
            id: "fb-1".to_string(),
            record: FeedbackRecord {
                interview_id: "iv-1".to_string(),
                user_id: "u1".to_string(),
                total_score: 61.0,
                category_scores: scores,
                detailed_feedback: vec![],
                strengths: vec![],
                areas_for_improvement: vec![],
                final_assessment: "Solid".to_string(),
                created_at: "2026-05-01T10:00:00.000Z".to_string(),
            },
        };
        let json = serde_json::to_value(&feedback).unwrap();
        assert_eq!(json["id"], "fb-1");
        assert_eq!(json["totalScore"], 61.0);
        assert_eq!(json["categoryScores"][4]["name"], "Confidence and Clarity");
    }
}
