//! Common test utilities for integration tests
//!
//! This module provides shared infrastructure for integration tests:
//! - Test database setup (migrations applied on connect)
//! - A throwaway storage directory per context
//! - Seeded community, member and administrator
//! - JWT token generation
//! - Request helpers driving the router with `oneshot`
//!
//! Requires `DATABASE_URL` to point at a disposable PostgreSQL database.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use paroki_api::app::{build_router, AppState};
use paroki_api::config::Config;
use paroki_shared::auth::jwt::issue_token_pair;
use paroki_shared::auth::password::hash_password;
use paroki_shared::models::community::{Community, CommunityInput};
use paroki_shared::models::user::{CreateUser, Role, User};
use paroki_shared::storage::LocalDisk;
use sqlx::PgPool;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_PASSWORD: &str = "Rahasia123";
const TEST_SECRET: &str = "integration-test-secret-at-least-32-bytes";

/// Test context containing all necessary resources
pub struct TestContext {
    /// Removed when the context drops, even if the test panics
    _storage: TempDir,

    pub db: PgPool,
    pub app: axum::Router,
    pub config: Config,
    pub storage_root: PathBuf,
    pub assets_root: PathBuf,
    pub community: Community,
    pub member: User,
    pub admin: User,
    pub member_token: String,
    pub admin_token: String,
}

impl TestContext {
    /// Creates a new test context with its own community and accounts
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let database_url = std::env::var("DATABASE_URL")?;

        let storage = TempDir::new()?;
        let storage_root = storage.path().join("public");
        let assets_root = storage.path().join("assets");
        let root = storage_root.to_string_lossy().to_string();
        let assets = assets_root.to_string_lossy().to_string();

        let config = Config::from_lookup(|key| match key {
            "DATABASE_URL" => Some(database_url.clone()),
            "JWT_SECRET" => Some(TEST_SECRET.to_string()),
            "STORAGE_ROOT" => Some(root.clone()),
            "ASSETS_ROOT" => Some(assets.clone()),
            "MAX_PDF_BYTES" => Some("65536".to_string()),
            _ => None,
        })?;

        let db = PgPool::connect(&config.database.url).await?;

        // Path relative to Cargo.toml, not this file
        sqlx::migrate!("../migrations").run(&db).await?;

        let disk = LocalDisk::new(storage_root.clone());
        disk.ensure_root().await?;

        let community = Community::create(
            &db,
            CommunityInput {
                name: format!("Lingkungan Uji {}", Uuid::new_v4()),
                description: None,
            },
        )
        .await?;

        let member = create_user(&db, community.id, Role::Umat).await?;
        let admin = create_user(&db, community.id, Role::Admin).await?;

        let member_token = issue_token_pair(member.id, member.role, &config.jwt.secret)?.access_token;
        let admin_token = issue_token_pair(admin.id, admin.role, &config.jwt.secret)?.access_token;

        let state = AppState::new(db.clone(), config.clone(), Arc::new(disk));
        let app = build_router(state);

        Ok(TestContext {
            _storage: storage,
            db,
            app,
            config,
            storage_root,
            assets_root,
            community,
            member,
            admin,
            member_token,
            admin_token,
        })
    }

    /// Adds another member to the seeded community and returns its token
    pub async fn second_member(&self) -> anyhow::Result<(User, String)> {
        let user = create_user(&self.db, self.community.id, Role::Umat).await?;
        let token = issue_token_pair(user.id, user.role, &self.config.jwt.secret)?.access_token;
        Ok((user, token))
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post_json(&self, uri: &str, token: Option<&str>, body: serde_json::Value) -> Response<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap()).await
    }

    /// Posts a multipart form built from `parts`
    pub async fn post_multipart(&self, uri: &str, token: &str, parts: &[Part<'_>]) -> Response<Body> {
        let (content_type, body) = multipart_body(parts);
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    /// Removes the seeded accounts and community
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM users WHERE community_id = $1")
            .bind(self.community.id)
            .execute(&self.db)
            .await?;
        Community::delete(&self.db, self.community.id).await?;
        Ok(())
    }
}

async fn create_user(db: &PgPool, community_id: Uuid, role: Role) -> anyhow::Result<User> {
    let user = User::create(
        db,
        CreateUser {
            name: format!("{} Uji", role.label()),
            email: format!("test-{}@example.com", Uuid::new_v4()),
            password_hash: hash_password(TEST_PASSWORD)?,
            role,
            community_id,
            address: None,
            birth_date: None,
            gender: None,
            phone: None,
        },
    )
    .await?;
    Ok(user)
}

/// One multipart field
pub enum Part<'a> {
    Text { name: &'a str, value: &'a str },
    File { name: &'a str, file_name: &'a str, content_type: &'a str, bytes: &'a [u8] },
}

const BOUNDARY: &str = "paroki-test-boundary";

fn multipart_body(parts: &[Part<'_>]) -> (String, Vec<u8>) {
    let mut body = Vec::new();

    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n", name, value).as_bytes(),
                );
            }
            Part::File { name, file_name, content_type, bytes } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                        name, file_name, content_type
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
                body.extend_from_slice(b"\r\n");
            }
        }
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    (format!("multipart/form-data; boundary={}", BOUNDARY), body)
}

/// Minimal document accepted by the PDF upload check
pub fn sample_pdf() -> Vec<u8> {
    b"%PDF-1.4\n1 0 obj << /Type /Catalog >> endobj\ntrailer << /Root 1 0 R >>\n%%EOF\n".to_vec()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).unwrap()
}

/// Panics with the response body when the status is unexpected
pub async fn expect_status(response: Response<Body>, expected: StatusCode) -> Response<Body> {
    let status = response.status();
    if status != expected {
        let body = body_bytes(response).await;
        panic!(
            "Expected {}, got {}: {}",
            expected,
            status,
            String::from_utf8_lossy(&body)
        );
    }
    response
}
