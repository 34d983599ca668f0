//! # Paroki API Server Library
//!
//! HTTP layer of the parish portal: the public website, the member area and
//! the administration panel.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `forms`: Multipart form reading and upload validation
//! - `middleware`: Authentication guards and security headers
//! - `routes`: Route handlers
//! - `view`: Page envelopes consumed by the frontend

pub mod app;
pub mod config;
pub mod error;
pub mod forms;
pub mod middleware;
pub mod routes;
pub mod view;
