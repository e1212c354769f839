//! GCP API interaction module
//!
//! Core functionality for talking to Google Cloud Platform APIs:
//! authentication, HTTP client, URL building, and project enumeration.
//!
//! # Module Structure
//!
//! - [`auth`] - GCP authentication using Application Default Credentials
//! - [`client`] - Main GCP client and per-service URL builders
//! - [`http`] - HTTP utilities and the typed [`http::ApiError`]
//! - [`projects`] - Project listing and filtering

pub mod auth;
pub mod client;
pub mod http;
pub mod projects;
