//! Use cases (application services)

pub mod chat_session;
pub mod handoff;
pub mod review_application;
pub mod run_chat;
