//! Applicant profile, job postings and account requests.

pub mod entities;
