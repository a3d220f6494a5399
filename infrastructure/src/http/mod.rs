//! HTTP adapter for the screening REST API.

mod client;

pub use client::{HttpScreeningApi, filename_from_disposition};
