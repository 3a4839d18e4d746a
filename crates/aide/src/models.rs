//! These models represent the objects passed between the chat UI, the assistant and the LLM
//!
//! - chat turns make up the in-memory conversation history of a session
//! - intents are what a model response is interpreted into: a reply or a tool request
//! - navigation targets are what a tool request is dispatched into for the UI to act on
pub mod chat;
pub mod intent;
pub mod navigation;
