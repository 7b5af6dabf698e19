//! Job ingest service library.
//!
//! Receives job postings scraped in the browser and upserts them into a pair
//! of Notion databases: one for companies, one for job applications.

pub mod config;
pub mod constants;
pub mod content;
pub mod matching;
pub mod model;
pub mod notion;
pub mod organization;
pub mod posting;
pub mod reconcile;
pub mod session;
pub mod web;
