//! Core domain concepts shared across all subdomains.
//!
//! - [`id::IdGenerator`]: locally-unique chat turn identifiers
//! - [`user_text::UserText`]: validated, trimmed user input
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod id;
pub mod user_text;
