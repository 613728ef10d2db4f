pub mod feedback;
pub mod interview;

pub use feedback::{
    Category, CategoryScore, Feedback, FeedbackRecord, QuestionFeedback, TranscriptRole,
    TranscriptTurn, FEEDBACK_COLLECTION,
};
pub use interview::{Interview, INTERVIEWS_COLLECTION};
