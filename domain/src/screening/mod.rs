//! Screening results.
//!
//! - [`decision::ScreeningDecision`]: decision vocabulary of the chat protocol
//! - [`outcome::ScreeningOutcome`]: what the results view receives

pub mod decision;
pub mod outcome;
