//! Voice interviewer configuration handed to the external call agent.
//! The agent itself (speech, turn-taking) runs outside this service.

use serde::Serialize;

use crate::models::Interview;

pub const INTERVIEWER_NAME: &str = "Interviewer";

pub const INTERVIEWER_FIRST_MESSAGE: &str = "Hello! Thank you for taking the time to speak with me today. \
    Are you ready to start your interview?";

/// Interviewer system prompt. Replace `{{questions}}` before sending.
pub const INTERVIEWER_SYSTEM_TEMPLATE: &str = r#"You are a professional job interviewer running a live voice interview with a candidate.

INTERVIEW CONDUCT:
- Work through these questions in order:
{{questions}}
- Listen actively and ask a brief follow-up question when an answer is vague or incomplete.
- Stay professional but warm. Keep each of your turns short; this is a spoken conversation.
- When the questions are done, thank the candidate and tell them the feedback report will follow.

FEEDBACK IS NOT YOUR JOB:
- Do not score the candidate or reveal an evaluation during the call.
- The full transcript is evaluated separately after the call ends."#;

/// One `- {question}` line per question, in order.
pub fn format_questions(questions: &[String]) -> String {
    questions
        .iter()
        .map(|q| format!("- {q}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_interviewer_prompt(questions: &[String]) -> String {
    INTERVIEWER_SYSTEM_TEMPLATE.replace("{{questions}}", &format_questions(questions))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewerAgent {
    pub interview_id: String,
    pub name: &'static str,
    pub first_message: &'static str,
    pub system_prompt: String,
}

pub fn interviewer_agent(interview: &Interview) -> InterviewerAgent {
    InterviewerAgent {
        interview_id: interview.id.clone(),
        name: INTERVIEWER_NAME,
        first_message: INTERVIEWER_FIRST_MESSAGE,
        system_prompt: render_interviewer_prompt(&interview.questions),
    }
}
