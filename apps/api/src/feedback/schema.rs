//! Feedback schema: one declarative description of a generated evaluation.
//!
//! The same `SchemaNode` tree is rendered to JSON Schema for the model request
//! and walked to validate whatever the model returns. Nothing the model sends is
//! decoded into `GeneratedFeedback` until it has passed `validate`.

use once_cell::sync::Lazy;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::models::{Category, CategoryScore, QuestionFeedback};

#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    /// All listed fields are required. Unknown keys are ignored.
    Object(Vec<Field>),
    Array(Box<SchemaNode>),
    /// Fixed-length array with a schema per position.
    Tuple(Vec<SchemaNode>),
    String,
    Number,
    /// A string that must equal this exact value.
    Literal(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub node: SchemaNode,
    pub description: Option<&'static str>,
}

fn field(name: &'static str, node: SchemaNode) -> Field {
    Field {
        name,
        node,
        description: None,
    }
}

fn described(name: &'static str, node: SchemaNode, description: &'static str) -> Field {
    Field {
        name,
        node,
        description: Some(description),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("schema violation at {path}: {reason}")]
pub struct SchemaViolation {
    pub path: String,
    pub reason: String,
}

impl SchemaViolation {
    fn new(path: &str, reason: impl Into<String>) -> Self {
        Self {
            path: if path.is_empty() {
                "$".to_string()
            } else {
                path.to_string()
            },
            reason: reason.into(),
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn child_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}.{name}")
    }
}

impl SchemaNode {
    /// Renders this node as a JSON Schema (draft-07 style tuples).
    pub fn to_json_schema(&self) -> Value {
        match self {
            SchemaNode::Object(fields) => {
                let mut properties = Map::new();
                for f in fields {
                    let mut schema = f.node.to_json_schema();
                    if let (Some(description), Value::Object(obj)) = (f.description, &mut schema) {
                        obj.insert("description".to_string(), json!(description));
                    }
                    properties.insert(f.name.to_string(), schema);
                }
                let required: Vec<&str> = fields.iter().map(|f| f.name).collect();
                json!({
                    "type": "object",
                    "properties": properties,
                    "required": required,
                })
            }
            SchemaNode::Array(item) => json!({
                "type": "array",
                "items": item.to_json_schema(),
            }),
            SchemaNode::Tuple(items) => json!({
                "type": "array",
                "items": items.iter().map(SchemaNode::to_json_schema).collect::<Vec<_>>(),
                "minItems": items.len(),
                "maxItems": items.len(),
            }),
            SchemaNode::String => json!({ "type": "string" }),
            SchemaNode::Number => json!({ "type": "number" }),
            SchemaNode::Literal(value) => json!({ "type": "string", "const": value }),
        }
    }

    /// Checks `value` against this node, reporting the first violation found.
    pub fn validate(&self, value: &Value) -> Result<(), SchemaViolation> {
        self.validate_at(value, "")
    }

    fn validate_at(&self, value: &Value, path: &str) -> Result<(), SchemaViolation> {
        match self {
            SchemaNode::Object(fields) => {
                let obj = value.as_object().ok_or_else(|| {
                    SchemaViolation::new(path, format!("expected object, got {}", type_name(value)))
                })?;
                for f in fields {
                    let field_path = child_path(path, f.name);
                    let child = obj
                        .get(f.name)
                        .ok_or_else(|| SchemaViolation::new(&field_path, "required field is missing"))?;
                    f.node.validate_at(child, &field_path)?;
                }
                Ok(())
            }
            SchemaNode::Array(item) => {
                let items = value.as_array().ok_or_else(|| {
                    SchemaViolation::new(path, format!("expected array, got {}", type_name(value)))
                })?;
                for (i, element) in items.iter().enumerate() {
                    item.validate_at(element, &format!("{path}[{i}]"))?;
                }
                Ok(())
            }
            SchemaNode::Tuple(nodes) => {
                let items = value.as_array().ok_or_else(|| {
                    SchemaViolation::new(path, format!("expected array, got {}", type_name(value)))
                })?;
                if items.len() != nodes.len() {
                    return Err(SchemaViolation::new(
                        path,
                        format!("expected exactly {} items, got {}", nodes.len(), items.len()),
                    ));
                }
                for (i, (node, element)) in nodes.iter().zip(items).enumerate() {
                    node.validate_at(element, &format!("{path}[{i}]"))?;
                }
                Ok(())
            }
            SchemaNode::String => match value {
                Value::String(_) => Ok(()),
                other => Err(SchemaViolation::new(
                    path,
                    format!("expected string, got {}", type_name(other)),
                )),
            },
            SchemaNode::Number => match value {
                Value::Number(_) => Ok(()),
                other => Err(SchemaViolation::new(
                    path,
                    format!("expected number, got {}", type_name(other)),
                )),
            },
            SchemaNode::Literal(expected) => match value.as_str() {
                Some(actual) if actual == *expected => Ok(()),
                _ => Err(SchemaViolation::new(
                    path,
                    format!("expected \"{expected}\", got {value}"),
                )),
            },
        }
    }
}

fn category_score_schema(category: Category) -> SchemaNode {
    SchemaNode::Object(vec![
        field("name", SchemaNode::Literal(category.as_str())),
        field("score", SchemaNode::Number),
        field("comment", SchemaNode::String),
    ])
}

fn question_feedback_schema() -> SchemaNode {
    SchemaNode::Object(vec![
        described(
            "question",
            SchemaNode::String,
            "The specific question that was asked to the candidate.",
        ),
        described(
            "userAnswer",
            SchemaNode::String,
            "The candidate's exact, transcribed answer to the question.",
        ),
        described(
            "feedback",
            SchemaNode::String,
            "Constructive feedback and grading on the candidate's answer.",
        ),
        described(
            "exampleResponse",
            SchemaNode::String,
            "A well-crafted, ideal example of how the candidate could have answered.",
        ),
    ])
}

fn feedback_schema() -> SchemaNode {
    SchemaNode::Object(vec![
        field("totalScore", SchemaNode::Number),
        field(
            "categoryScores",
            SchemaNode::Tuple(Category::ALL.into_iter().map(category_score_schema).collect()),
        ),
        described(
            "detailedFeedback",
            SchemaNode::Array(Box::new(question_feedback_schema())),
            "An array containing detailed feedback for each individual question asked.",
        ),
        field("strengths", SchemaNode::Array(Box::new(SchemaNode::String))),
        field(
            "areasForImprovement",
            SchemaNode::Array(Box::new(SchemaNode::String)),
        ),
        field("finalAssessment", SchemaNode::String),
    ])
}

/// The feedback contract, built once.
pub static FEEDBACK_SCHEMA: Lazy<SchemaNode> = Lazy::new(feedback_schema);

/// JSON Schema rendering of `FEEDBACK_SCHEMA`, sent with each generation request.
pub static FEEDBACK_JSON_SCHEMA: Lazy<Value> = Lazy::new(|| FEEDBACK_SCHEMA.to_json_schema());

/// A model evaluation that has passed `FEEDBACK_SCHEMA`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedFeedback {
    pub total_score: f64,
    pub category_scores: [CategoryScore; 5],
    pub detailed_feedback: Vec<QuestionFeedback>,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub final_assessment: String,
}

#[derive(Debug, Error)]
pub enum ParseFeedbackError {
    #[error(transparent)]
    Schema(#[from] SchemaViolation),

    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Validates a raw model object against `FEEDBACK_SCHEMA`, then decodes it.
pub fn parse_generated_feedback(value: Value) -> Result<GeneratedFeedback, ParseFeedbackError> {
    FEEDBACK_SCHEMA.validate(&value)?;
    Ok(serde_json::from_value(value)?)
}
