/// Common test utilities for integration tests
///
/// Shared infrastructure for driving the real router end-to-end:
/// - Test database setup (expects `DATABASE_URL` to point at a disposable
///   Postgres; migrations run on startup)
/// - Router construction with a fixed token secret and mail disabled
/// - Request/response helpers
use axum::body::Body;
use axum::http::{Request, Response};
use taskdeck_api::app::{build_router, AppState};
use taskdeck_api::config::{ApiConfig, Config};
use taskdeck_shared::db::pool::{create_pool, run_migrations, DatabaseConfig};
use uuid::Uuid;

pub const TEST_TOKEN_SECRET: &str = "integration-test-secret-at-least-32-bytes";

/// Test context containing the router and direct database access
pub struct TestContext {
    pub db: sqlx::PgPool,
    pub app: axum::Router,
}

impl TestContext {
    /// Creates a new test context against the `DATABASE_URL` database.
    pub async fn new() -> anyhow::Result<Self> {
        let url = std::env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set for integration tests"))?;

        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            database: DatabaseConfig {
                url,
                ..DatabaseConfig::default()
            },
            token_secret: TEST_TOKEN_SECRET.to_string(),
            mail: None,
        };

        let db = create_pool(&config.database).await?;
        run_migrations(&db).await?;

        let state = AppState::new(db.clone(), config);
        let app = build_router(state);

        Ok(TestContext { db, app })
    }

    /// Sends a request through the router.
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        use tower::Service as _;
        self.app.clone().call(request).await.unwrap()
    }

    /// Signs up a fresh user through the API and returns `(user_id, token,
    /// email)`. The email is unique per call so tests never collide.
    pub async fn signup_user(&self, name: &str, password: &str) -> (Uuid, String, String) {
        let email = format!("test-{}@example.com", Uuid::new_v4());

        let response = self
            .send(json_request(
                "POST",
                "/users",
                serde_json::json!({ "name": name, "email": email, "password": password }),
            ))
            .await;
        assert_eq!(response.status(), 201, "signup failed");

        let body = body_json(response).await;
        let user_id = Uuid::parse_str(body["user"]["id"].as_str().unwrap()).unwrap();
        let token = body["token"].as_str().unwrap().to_string();
        (user_id, token, email)
    }

    /// Creates a task for a user through the API, returning its id.
    pub async fn create_task(&self, token: &str, description: &str, completed: bool) -> Uuid {
        let response = self
            .send(authed_json_request(
                "POST",
                "/tasks",
                token,
                serde_json::json!({ "description": description, "completed": completed }),
            ))
            .await;
        assert_eq!(response.status(), 201, "task creation failed");

        let body = body_json(response).await;
        Uuid::parse_str(body["id"].as_str().unwrap()).unwrap()
    }
}

/// Builds a JSON request without authentication.
pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Builds a JSON request with a bearer token.
pub fn authed_json_request(
    method: &str,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Builds a bodyless request with a bearer token.
pub fn authed_request(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

/// Reads a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Builds a multipart upload of a single `avatar` field.
pub fn avatar_upload_request(token: &str, filename: &str, bytes: &[u8]) -> Request<Body> {
    let boundary = "taskdeck-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"avatar\"; filename=\"{}\"\r\n",
            filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

    Request::builder()
        .method("POST")
        .uri("/users/me/avatar")
        .header("authorization", format!("Bearer {}", token))
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Encodes a small PNG for avatar tests.
pub fn sample_png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 64])
    });
    let mut out = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}
