/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use paroki_api::{app::{build_router, AppState}, config::Config};
/// use paroki_shared::storage::LocalDisk;
/// use sqlx::PgPool;
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let disk = Arc::new(LocalDisk::new(config.storage.root.clone()));
/// let app = build_router(AppState::new(pool, config, disk));
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    middleware::{
        auth::{require_admin, require_user},
        security::SecurityHeadersLayer,
    },
};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{delete, get, patch, post, put},
    Router,
};
use chrono::NaiveDate;
use paroki_shared::media::{classify_image_path, MediaUrls};
use paroki_shared::storage::{FileStore, ACTIVITIES_DIR, ANNOUNCEMENTS_DIR, CHURCH_OFFICIALS_DIR};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Disk directories served under `/storage`
const PUBLIC_IMAGE_DIRS: [&str; 3] = [ANNOUNCEMENTS_DIR, ACTIVITIES_DIR, CHURCH_OFFICIALS_DIR];

/// Shared application state, cloned per request
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<Config>,

    /// Public disk for images and member documents
    pub storage: Arc<dyn FileStore>,

    pub media: MediaUrls,
}

impl AppState {
    pub fn new(db: PgPool, config: Config, storage: Arc<dyn FileStore>) -> Self {
        let media = config.media_urls();
        Self {
            db,
            config: Arc::new(config),
            storage,
            media,
        }
    }

    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }

    /// Calendar date in the parish timezone
    pub fn today(&self) -> NaiveDate {
        self.config.app.timezone.today()
    }

    /// Parish name for report headers
    pub fn organisation(&self) -> &str {
        &self.config.app.name
    }

    /// Public URL for a stored image column
    ///
    /// Disk paths are checked for existence; a failed check counts as missing.
    pub async fn image_url(&self, path: Option<&str>) -> String {
        let source = classify_image_path(path);

        let exists = match source.disk_path() {
            Some(disk_path) => match self.storage.exists(disk_path).await {
                Ok(found) => found,
                Err(e) => {
                    tracing::warn!(path = disk_path, error = %e, "Image existence check failed");
                    false
                }
            },
            None => false,
        };

        self.media.url_for(&source, exists)
    }
}

/// Builds the complete router
///
/// ```text
/// /health, /sitemap.xml, /storage/*          public
/// /, /announcements, /activities, ...        public pages
/// /auth/{register,login,refresh}             public
/// /member/...                                Bearer, active account
/// /admin/...                                 Bearer, admin role
/// ```
pub fn build_router(state: AppState) -> Router {
    use crate::routes::{admin, auth, health, member, public};

    let public_routes = Router::new()
        .route("/", get(public::landing::landing))
        .route("/announcements", get(public::announcements::index))
        .route("/announcements/:id", get(public::announcements::show))
        .route("/activities", get(public::activities::index))
        .route("/worship-schedules", get(public::worship_schedules::index))
        .route("/church-officials", get(public::church_officials::index))
        .route("/feedback", post(public::feedback::submit))
        .route("/sitemap.xml", get(public::sitemap::sitemap));

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh));

    let member_routes = Router::new()
        .route("/dashboard", get(member::dashboard::dashboard))
        .route(
            "/settings/profile",
            get(member::settings::show_profile).put(member::settings::update_profile),
        )
        .route("/settings/password", put(member::settings::update_password))
        .route(
            "/documents",
            get(member::documents::index).post(member::documents::upload),
        )
        .route("/documents/:id", delete(member::documents::destroy))
        .route("/documents/:id/view", get(member::documents::view))
        .route("/documents/:id/download", get(member::documents::download))
        .layer(from_fn_with_state(state.clone(), require_user));

    let admin_routes = Router::new()
        .route("/dashboard", get(admin::dashboard::dashboard))
        .route("/users", get(admin::users::index).post(admin::users::store))
        .route("/users/export", get(admin::users::export_roster))
        .route(
            "/users/:id",
            get(admin::users::show)
                .put(admin::users::update)
                .delete(admin::users::destroy),
        )
        .route("/users/:id/status", patch(admin::users::toggle_status))
        .route("/users/:id/export", get(admin::users::export_card))
        .route(
            "/communities",
            get(admin::communities::index).post(admin::communities::store),
        )
        .route(
            "/communities/:id",
            put(admin::communities::update).delete(admin::communities::destroy),
        )
        .route(
            "/announcements",
            get(admin::announcements::index).post(admin::announcements::store),
        )
        .route(
            "/announcements/:id",
            get(admin::announcements::show)
                .put(admin::announcements::update)
                .delete(admin::announcements::destroy),
        )
        .route(
            "/announcements/:id/publish",
            patch(admin::announcements::toggle_publish),
        )
        .route(
            "/activities",
            get(admin::activities::index).post(admin::activities::store),
        )
        .route(
            "/activities/:id",
            put(admin::activities::update).delete(admin::activities::destroy),
        )
        .route("/reports/activities", get(admin::reports::activities))
        .route(
            "/worship-schedules",
            get(admin::worship_schedules::index).post(admin::worship_schedules::store),
        )
        .route(
            "/worship-schedules/export",
            get(admin::worship_schedules::export),
        )
        .route(
            "/worship-schedules/:id",
            put(admin::worship_schedules::update).delete(admin::worship_schedules::destroy),
        )
        .route(
            "/church-officials",
            get(admin::church_officials::index).post(admin::church_officials::store),
        )
        .route(
            "/church-officials/:id",
            put(admin::church_officials::update).delete(admin::church_officials::destroy),
        )
        .route("/feedback", get(admin::feedback::index))
        .route("/feedback/:id", delete(admin::feedback::destroy))
        .route("/feedback/:id/read", patch(admin::feedback::mark_read))
        .route(
            "/finances",
            get(admin::finances::index).post(admin::finances::store),
        )
        .route(
            "/finances/:id",
            put(admin::finances::update).delete(admin::finances::destroy),
        )
        .layer(from_fn_with_state(state.clone(), require_admin))
        .layer(from_fn_with_state(state.clone(), require_user));

    let cors = if state.config.api.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([
                header::AUTHORIZATION,
                header::CONTENT_TYPE,
                header::HeaderName::from_static("x-inertia"),
                header::HeaderName::from_static("x-inertia-version"),
            ])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    let storage = &state.config.storage;

    // Only image directories are public; member documents go through
    // the ownership-checked document routes.
    let public_files = PUBLIC_IMAGE_DIRS.iter().fold(Router::<AppState>::new(), |router, dir| {
        router.nest_service(&format!("/storage/{}", dir), ServeDir::new(storage.root.join(dir)))
    });

    Router::new()
        .route("/health", get(health::health_check))
        .merge(public_routes)
        .nest("/auth", auth_routes)
        .nest("/member", member_routes)
        .nest("/admin", admin_routes)
        .merge(public_files)
        .nest_service("/assets", ServeDir::new(storage.assets_root.clone()))
        .layer(DefaultBodyLimit::max(state.config.body_limit()))
        .layer(CompressionLayer::new())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}
