//! # Paroki Shared Library
//!
//! This crate contains the data layer and domain helpers used by the parish
//! portal API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and their CRUD operations
//! - `db`: Connection pooling and migrations
//! - `auth`: Passwords, JWT tokens, authentication context and authorization
//! - `pagination`: Page requests and paginated result envelopes
//! - `calendar`: Parish timezone, "today", schedule filters and report ranges
//! - `media`: Stored image path normalization and public URL resolution
//! - `storage`: Public file disk for uploaded images and PDFs
//! - `report`: Report documents with HTML and PDF renderers
//! - `sitemap`: Static XML sitemap

pub mod auth;
pub mod calendar;
pub mod db;
pub mod media;
pub mod models;
pub mod pagination;
pub mod report;
pub mod sitemap;
pub mod storage;

/// Current version of the shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
