/// User endpoints: signup, sessions, profile, avatar
///
/// # Endpoints
///
/// - `POST /users` - sign up (public)
/// - `POST /users/login` - login (public)
/// - `POST /users/logout` - revoke the session in use
/// - `POST /users/logoutAll` - revoke every session
/// - `GET /users` - list all users
/// - `GET /users/me` / `PATCH /users/me` / `DELETE /users/me` - own profile
/// - `POST /users/me/avatar` / `DELETE /users/me/avatar` - own avatar
/// - `GET /users/:id/avatar` - fetch any user's avatar as PNG (public)
use crate::{
    app::{AppState, CurrentUser},
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::json;
use taskdeck_shared::{
    auth::password,
    avatar,
    models::{
        session::SessionToken,
        user::{CreateUser, PublicUser, UpdateUser, User},
        validate_update_keys,
    },
};
use uuid::Uuid;
use validator::{Validate, ValidateEmail};

/// Signup request
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    /// Display name
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password (strength checked separately)
    pub password: String,

    /// Optional age
    #[validate(range(min = 0, message = "Age must be non-negative"))]
    pub age: Option<i32>,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Fields accepted by `PATCH /users/me` (after key whitelisting)
#[derive(Debug, Deserialize)]
struct UpdateMeBody {
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    age: Option<i32>,
}

const USER_UPDATE_FIELDS: [&str; 4] = ["name", "email", "password", "age"];

/// Sign up a new user
///
/// Creates the account, issues the first session token, and fires the
/// welcome email without waiting on it.
///
/// # Errors
///
/// - `400 Bad Request`: validation failed or email already in use
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> ApiResult<impl IntoResponse> {
    req.validate().map_err(ApiError::from_validation)?;

    password::validate_password_strength(&req.password).map_err(|message| {
        ApiError::Validation(vec![ValidationErrorDetail {
            field: "password".to_string(),
            message,
        }])
    })?;

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            name: req.name,
            email: req.email,
            password_hash,
            age: req.age,
        },
    )
    .await?;

    let token = SessionToken::issue(&state.db, user.id, state.token_secret()).await?;

    spawn_welcome_email(&state, &user);

    Ok((
        StatusCode::CREATED,
        Json(json!({ "user": user.public(), "token": token })),
    ))
}

/// Login
///
/// # Errors
///
/// - `400 Bad Request`: one generic message for both an unknown email and a
///   wrong password, so callers cannot enumerate accounts
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let invalid = || ApiError::BadRequest("Unable to login".to_string());

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(invalid)?;

    if !password::verify_password(&req.password, &user.password_hash)? {
        return Err(invalid());
    }

    let token = SessionToken::issue(&state.db, user.id, state.token_secret()).await?;

    Ok(Json(json!({ "user": user.public(), "token": token })))
}

/// Revoke the session token used for this request; other sessions stay
/// valid.
pub async fn logout(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<StatusCode> {
    SessionToken::revoke(&state.db, current.user.id, &current.token).await?;
    Ok(StatusCode::OK)
}

/// Revoke every session token for the caller.
pub async fn logout_all(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<StatusCode> {
    SessionToken::revoke_all(&state.db, current.user.id).await?;
    Ok(StatusCode::OK)
}

/// List all users.
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<PublicUser>>> {
    let users = User::list_all(&state.db).await?;
    Ok(Json(users.iter().map(User::public).collect()))
}

/// The caller's own profile.
pub async fn get_me(Extension(current): Extension<CurrentUser>) -> Json<PublicUser> {
    Json(current.user.public())
}

/// Partial profile update
///
/// Only `name`, `email`, `password`, and `age` are mutable. One unknown
/// field in the body rejects the whole request before anything is applied.
pub async fn update_me(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(body): Json<serde_json::Value>,
) -> ApiResult<Json<PublicUser>> {
    let map = body
        .as_object()
        .ok_or_else(|| ApiError::BadRequest("Expected a JSON object".to_string()))?;

    validate_update_keys(map, &USER_UPDATE_FIELDS).map_err(ApiError::BadRequest)?;

    let fields: UpdateMeBody = serde_json::from_value(body.clone())
        .map_err(|e| ApiError::BadRequest(format!("Invalid update body: {}", e)))?;

    if let Some(email) = &fields.email {
        if !email.validate_email() {
            return Err(ApiError::Validation(vec![ValidationErrorDetail {
                field: "email".to_string(),
                message: "Invalid email format".to_string(),
            }]));
        }
    }

    if let Some(age) = fields.age {
        if age < 0 {
            return Err(ApiError::Validation(vec![ValidationErrorDetail {
                field: "age".to_string(),
                message: "Age must be non-negative".to_string(),
            }]));
        }
    }

    let password_hash = match &fields.password {
        Some(new_password) => {
            password::validate_password_strength(new_password).map_err(|message| {
                ApiError::Validation(vec![ValidationErrorDetail {
                    field: "password".to_string(),
                    message,
                }])
            })?;
            Some(password::hash_password(new_password)?)
        }
        None => None,
    };

    let user = User::update(
        &state.db,
        current.user.id,
        UpdateUser {
            name: fields.name,
            email: fields.email,
            password_hash,
            age: fields.age,
        },
    )
    .await?;

    Ok(Json(user.public()))
}

/// Delete the caller's account
///
/// Session tokens go with the account; tasks are left behind. The
/// cancellation email is fire-and-forget.
pub async fn delete_me(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Json<PublicUser>> {
    let deleted = User::delete(&state.db, current.user.id).await?;
    if !deleted {
        return Err(ApiError::NotFound);
    }

    spawn_cancellation_email(&state, &current.user);

    Ok(Json(current.user.public()))
}

/// Upload an avatar
///
/// Multipart field `avatar`, at most 1 MB, jpeg/jpg/png. The image is
/// re-encoded to a 250x250 PNG before storage.
///
/// # Errors
///
/// - `400 Bad Request`: missing field, bad extension, oversized, or
///   undecodable image
pub async fn upload_avatar(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    mut multipart: Multipart,
) -> ApiResult<StatusCode> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid upload: {}", e)))?
    {
        if field.name() == Some("avatar") {
            let filename = field.file_name().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Invalid upload: {}", e)))?;
            upload = Some((filename, bytes.to_vec()));
            break;
        }
    }

    let (filename, bytes) =
        upload.ok_or_else(|| ApiError::BadRequest("Missing avatar field".to_string()))?;

    let png = avatar::process_avatar(&filename, &bytes)?;

    User::set_avatar(&state.db, current.user.id, &png).await?;

    Ok(StatusCode::OK)
}

/// Remove the caller's avatar.
pub async fn delete_avatar(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<StatusCode> {
    User::clear_avatar(&state.db, current.user.id).await?;
    Ok(StatusCode::OK)
}

/// Fetch any user's avatar as PNG (public)
///
/// # Errors
///
/// - `404 Not Found`: unknown id, undecodable id, or no stored avatar
pub async fn get_avatar(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    // An undecodable id is indistinguishable from an unknown one
    let id = Uuid::parse_str(&id).map_err(|_| ApiError::NotFound)?;

    let png = User::get_avatar(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}

fn spawn_welcome_email(state: &AppState, user: &User) {
    let mailer = state.mailer.clone();
    let email = user.email.clone();
    let name = user.name.clone();
    tokio::spawn(async move {
        if let Err(e) = mailer.send_welcome(&email, &name).await {
            tracing::warn!(error = %e, "welcome email failed");
        }
    });
}

fn spawn_cancellation_email(state: &AppState, user: &User) {
    let mailer = state.mailer.clone();
    let email = user.email.clone();
    let name = user.name.clone();
    tokio::spawn(async move {
        if let Err(e) = mailer.send_cancellation(&email, &name).await {
            tracing::warn!(error = %e, "cancellation email failed");
        }
    });
}
