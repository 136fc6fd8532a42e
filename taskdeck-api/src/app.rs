/// Application state and router builder
///
/// Defines the shared application state, the bearer-token authentication
/// layer, and the router wiring every endpoint to its handler.
///
/// # Route map
///
/// ```text
/// GET    /health                 public
/// POST   /users                  public   signup
/// POST   /users/login            public
/// GET    /users/:id/avatar       public
/// POST   /users/logout           bearer
/// POST   /users/logoutAll        bearer
/// GET    /users                  bearer
/// GET    /users/me               bearer
/// PATCH  /users/me               bearer
/// DELETE /users/me               bearer
/// POST   /users/me/avatar        bearer
/// DELETE /users/me/avatar        bearer
/// POST   /tasks                  bearer
/// GET    /tasks                  bearer   ?completed&limit&skip&sortBy
/// GET    /tasks/:id              bearer
/// PATCH  /tasks/:id              bearer
/// DELETE /tasks/:id              bearer
/// ```
use crate::{config::Config, error::ApiError, routes};
use axum::{
    extract::Request,
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use taskdeck_shared::{
    auth::token,
    email::Mailer,
    models::{session::SessionToken, user::User},
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Best-effort mail client
    pub mailer: Mailer,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        let mailer = Mailer::new(config.mail.clone());
        Self {
            db,
            config: Arc::new(config),
            mailer,
        }
    }

    /// Secret used to sign and validate session tokens
    pub fn token_secret(&self) -> &str {
        &self.config.token_secret
    }
}

/// The authenticated caller, injected into request extensions by
/// [`bearer_auth_layer`].
///
/// Carries the presented token too, so `POST /users/logout` can revoke
/// exactly the session in use.
#[derive(Clone)]
pub struct CurrentUser {
    pub user: User,
    pub token: String,
}

/// Builds the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    // Public routes (no auth)
    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/users", post(routes::users::signup))
        .route("/users/login", post(routes::users::login))
        .route("/users/:id/avatar", get(routes::users::get_avatar));

    // Everything else requires a valid bearer token
    let protected_routes = Router::new()
        .route("/users", get(routes::users::list_users))
        .route("/users/logout", post(routes::users::logout))
        .route("/users/logoutAll", post(routes::users::logout_all))
        .route(
            "/users/me",
            get(routes::users::get_me)
                .patch(routes::users::update_me)
                .delete(routes::users::delete_me),
        )
        .route(
            "/users/me/avatar",
            post(routes::users::upload_avatar).delete(routes::users::delete_avatar),
        )
        .route(
            "/tasks",
            post(routes::tasks::create_task).get(routes::tasks::list_tasks),
        )
        .route(
            "/tasks/:id",
            get(routes::tasks::get_task)
                .patch(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            bearer_auth_layer,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bearer-token authentication middleware.
///
/// Validates the token signature and expiry, requires the token to be in the
/// user's stored session list (so logout takes effect immediately), loads
/// the user, and injects [`CurrentUser`] into request extensions.
///
/// Every failure mode answers with the same generic 401.
async fn bearer_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let unauthorized = || ApiError::Unauthorized("Please authenticate".to_string());

    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(unauthorized)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(unauthorized)?
        .to_string();

    let claims =
        token::validate_session_token(&token, state.token_secret()).map_err(|_| unauthorized())?;

    let active = SessionToken::exists(&state.db, claims.sub, &token).await?;
    if !active {
        return Err(unauthorized());
    }

    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(unauthorized)?;

    req.extensions_mut().insert(CurrentUser {
        user,
        token: token.to_string(),
    });

    Ok(next.run(req).await)
}
