// Interview read API and the voice interviewer configuration.

pub mod agent;
pub mod handlers;
