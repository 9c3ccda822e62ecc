//! GPA Calculator API Library
//!
//! Fetches a student's enrollments and final grades from a Brightspace/D2L
//! LMS, averages them into SGPA/CGPA figures, and renders the result as a web
//! page or JSON.
//!
//! # Modules
//!
//! - `api`: HTTP-facing components.
//! - `core`: Aggregation and the fetch-and-compute cycle.
//! - `integrations`: LMS client and wire models.
//! - `api_docs`: OpenAPI document.
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `grades`: Percentage parsing and grade point aggregation.
//! - `handlers`: HTTP request handlers.
//! - `lms_client`: LMS REST client.
//! - `lms_models`: LMS response payloads.
//! - `models`: Domain and API models.
//! - `pipeline`: Fetch-and-compute cycle.
//! - `presenter`: HTML rendering.
//! - `server`: Router assembly.

pub mod api;
pub mod core;
pub mod integrations;

// Re-export primary modules for shared use in tests and other binaries
pub mod api_docs;
pub mod config;
pub mod errors;
pub mod grades;
pub mod handlers;
pub mod lms_client;
pub mod lms_models;
pub mod models;
pub mod pipeline;
pub mod presenter;
pub mod server;
