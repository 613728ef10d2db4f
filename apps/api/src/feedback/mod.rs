// Interview feedback: schema contract, prompts, and the generation pipeline.
// All model calls go through llm_client; all writes go through gateway.

pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod schema;
