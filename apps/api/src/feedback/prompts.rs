// All prompt text for interview feedback generation.

use crate::models::{Category, TranscriptTurn};

/// System prompt for feedback generation.
pub const FEEDBACK_SYSTEM: &str = "You are a professional interviewer evaluating a mock interview. \
    Provide thorough, objective feedback based strictly on the evaluation criteria provided, \
    without making assumptions beyond the transcript and the candidate's answers.";

/// Scoring bands shared by every category and the total score.
pub const SCORING_RUBRIC: &str = "\
- **0-10:** Completely off-topic or no response; no evidence of understanding.
- **11-20:** Fundamentally flawed; critical concepts are missing or incorrect.
- **21-30:** Major gaps; only minimal relevant content, serious misunderstandings.
- **31-40:** Approaches relevance but with significant errors or omissions.
- **41-50:** Basic competence; some correct points but clear weaknesses.
- **51-60:** Fair performance; adequate understanding with noticeable inconsistencies.
- **61-70:** Good performance; solid understanding but lacking depth in places.
- **71-80:** Very good; clear, accurate responses with minor lapses.
- **81-90:** Excellent; thorough, well-reasoned, and articulate with strong examples.
- **91-100:** Outstanding; exemplary insight, depth, and clarity exceeding expectations.";

/// Feedback prompt template.
/// Replace: {transcript}, {rubric}, {dimensions}
pub const FEEDBACK_PROMPT_TEMPLATE: &str = r#"You are an experienced AI interviewer evaluating a candidate's mock interview.
Follow the instructions below carefully to ensure objective and accurate scoring.

Instructions:
- Be thorough, objective, and critical, but also fair. Do not inflate scores, but recognize and reward strong, well-supported responses appropriately. High scores should reflect excellence, not perfection.
- Only evaluate based on the transcript provided. Do not assume or infer missing information.
- Evaluate strictly according to the listed categories. Do not add or remove categories.
- Provide a score from 0 to 100 for each category, with a brief explanation (1-2 sentences) for each score.
- Use the full scoring range appropriately; low scores should be given if performance is weak.

Transcript:
{transcript}
Use the following rubric:
{rubric}

Evaluate the candidate on the following categories, in this order:

{dimensions}

For every question asked, report the exact question, the candidate's verbatim answer, your feedback, and an example of an ideal answer.
Be specific in your feedback, highlighting both strengths and areas for improvement for each category."#;

/// One line per turn: `- {role}: {content}`.
pub fn format_transcript(transcript: &[TranscriptTurn]) -> String {
    transcript
        .iter()
        .map(|turn| format!("- {}: {}\n", turn.role, turn.content))
        .collect()
}

/// Numbered category list, generated from `Category::ALL` so the prompt and schema agree.
pub fn format_dimensions() -> String {
    Category::ALL
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{}. **{}**: {}", i + 1, c.as_str(), c.description()))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_feedback_prompt(transcript: &[TranscriptTurn]) -> String {
    FEEDBACK_PROMPT_TEMPLATE
        .replace("{rubric}", SCORING_RUBRIC)
        .replace("{dimensions}", &format_dimensions())
        .replace("{transcript}", &format_transcript(transcript))
}
