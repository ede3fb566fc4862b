//! Request handlers.
//!
//! Response bodies mirror the contracts the original front end scripts
//! expect: "success" / "failed to login" for login, "true"/"false" for the
//! moderation endpoints, and `<name>#<error>` for account creation.

use axum::extract::{Form, Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::error;

use auth_adapters::{SessionCookie, SESSION_COOKIE_NAME};
use domains::{DomainError, Entry, User};
use services::filter_posts;

use crate::state::AppState;

/// Domain failures that escape a handler. Validation and authorization
/// failures the front end renders in-band are matched out by the handlers
/// themselves; what remains is storage trouble.
pub(crate) struct ApiError(DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            DomainError::Storage(err) => {
                error!(%err, "storage failure while handling a request");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
            DomainError::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            DomainError::Validation(message) => {
                (StatusCode::BAD_REQUEST, message).into_response()
            }
        }
    }
}

fn session_cookie_value(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';')
        .map(str::trim)
        .find_map(|pair| {
            pair.strip_prefix(SESSION_COOKIE_NAME)
                .and_then(|rest| rest.strip_prefix('='))
        })
        .map(str::to_string)
}

async fn current_user(state: &AppState, headers: &HeaderMap) -> Result<Option<User>, ApiError> {
    match session_cookie_value(headers) {
        Some(value) => Ok(state.sessions.authenticate(&value).await?),
        None => Ok(None),
    }
}

fn session_set_cookie(cookie: &SessionCookie) -> String {
    format!(
        "{}={}; Expires={}; Path=/",
        SESSION_COOKIE_NAME,
        cookie.value,
        cookie.expires.format("%a, %d %b %Y %H:%M:%S GMT")
    )
}

/// The authenticated user as exposed to clients. The stored record also
/// carries the password digest and session token, which must never leave
/// the server.
#[derive(Serialize)]
pub(crate) struct SessionUser {
    username: String,
    admin: bool,
}

impl From<User> for SessionUser {
    fn from(user: User) -> Self {
        SessionUser {
            username: user.username,
            admin: user.is_admin,
        }
    }
}

// --- authentication ---------------------------------------------------------

#[derive(Deserialize)]
pub(crate) struct LoginForm {
    username: String,
    password: String,
}

pub(crate) async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, ApiError> {
    if state
        .directory
        .authenticate(&form.username, &form.password)
        .await?
    {
        let cookie = state.sessions.login(&form.username).await?;
        Ok((
            [(header::SET_COOKIE, session_set_cookie(&cookie))],
            "success",
        )
            .into_response())
    } else {
        Ok("failed to login".into_response())
    }
}

pub(crate) async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    if let Some(value) = session_cookie_value(&headers) {
        state.sessions.logout(&value).await?;
    }
    Ok(Redirect::to("/").into_response())
}

// --- posts ------------------------------------------------------------------

#[derive(Deserialize)]
pub(crate) struct IndexParams {
    search: Option<String>,
    index: Option<usize>,
}

#[derive(Serialize)]
pub(crate) struct IndexResponse {
    previews: Vec<Entry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    search: Option<String>,
    more: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<SessionUser>,
}

/// The index listing: newest first, windowed by `posts_per_page` unless a
/// keyword search narrows it down.
pub(crate) async fn index(
    State(state): State<AppState>,
    Query(params): Query<IndexParams>,
    headers: HeaderMap,
) -> Result<Json<IndexResponse>, ApiError> {
    let user = current_user(&state, &headers).await?.map(SessionUser::from);
    let entries = state.content.list_posts().await?;

    let response = match params.search.as_deref().filter(|s| !s.is_empty()) {
        Some(keyword) => IndexResponse {
            previews: filter_posts(&entries, keyword),
            search: Some(keyword.to_string()),
            more: false,
            index: None,
            user,
        },
        None => {
            let start = params.index.unwrap_or(0).min(entries.len());
            let end = (start + state.posts_per_page).min(entries.len());
            let more = end < entries.len();
            IndexResponse {
                previews: entries[start..end].to_vec(),
                search: None,
                more,
                index: more.then_some(end),
                user,
            }
        }
    };
    Ok(Json(response))
}

pub(crate) async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    match state.content.get_post(&id).await? {
        Some(entry) => Ok(Json(entry).into_response()),
        None => Ok(StatusCode::NOT_FOUND.into_response()),
    }
}

#[derive(Deserialize)]
pub(crate) struct PostForm {
    #[serde(default)]
    title: String,
    text: String,
    /// Whitespace-separated keywords.
    #[serde(default)]
    tags: String,
}

fn split_tags(tags: &str) -> Vec<String> {
    tags.split_whitespace().map(String::from).collect()
}

/// Returns the new post's id as its body, "0" when nothing was created.
pub(crate) async fn create_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<PostForm>,
) -> Result<String, ApiError> {
    let user = current_user(&state, &headers).await?;
    let id = state
        .content
        .create_post(user.as_ref(), &form.title, &form.text, split_tags(&form.tags))
        .await?;
    Ok(id.to_string())
}

pub(crate) async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Form(form): Form<PostForm>,
) -> Result<String, ApiError> {
    let user = current_user(&state, &headers).await?;
    let updated = state
        .content
        .update_post(user.as_ref(), &id, &form.title, &form.text, split_tags(&form.tags))
        .await?;
    Ok(updated.to_string())
}

pub(crate) async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<String, ApiError> {
    let user = current_user(&state, &headers).await?;
    let deleted = state.content.delete_post(user.as_ref(), &id).await?;
    Ok(deleted.to_string())
}

// --- comments ---------------------------------------------------------------

#[derive(Deserialize)]
pub(crate) struct CommentForm {
    #[serde(default)]
    text: String,
    /// Display name; empty means "Anonymous".
    #[serde(default)]
    name: String,
}

pub(crate) async fn add_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<CommentForm>,
) -> Result<StatusCode, ApiError> {
    state.content.add_comment(&id, &form.text, &form.name).await?;
    Ok(StatusCode::OK)
}

#[derive(Deserialize)]
pub(crate) struct VerifyForm {
    #[serde(rename = "postId")]
    post_id: String,
    #[serde(rename = "commentId")]
    comment_id: String,
}

pub(crate) async fn verify_comment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<VerifyForm>,
) -> Result<String, ApiError> {
    let user = current_user(&state, &headers).await?;
    let verified = state
        .content
        .verify_comment(user.as_ref(), &form.post_id, &form.comment_id)
        .await?;
    Ok(verified.to_string())
}

// --- accounts ---------------------------------------------------------------

#[derive(Deserialize)]
pub(crate) struct AccountForm {
    name: String,
    password: String,
    #[serde(rename = "password-confirmation")]
    password_confirmation: String,
    /// Checkbox value: "on" when the new account should be an admin.
    #[serde(default)]
    admin: String,
}

/// Body contract: `<username>#` on success, `#<error message>` otherwise.
pub(crate) async fn create_account(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<AccountForm>,
) -> Result<String, ApiError> {
    let user = current_user(&state, &headers).await?;
    let created = state
        .directory
        .create_account(
            &form.name,
            &form.password,
            &form.password_confirmation,
            form.admin == "on",
            user.as_ref(),
        )
        .await;
    match created {
        Ok(name) => Ok(format!("{name}#")),
        Err(DomainError::Validation(message)) => Ok(format!("#{message}")),
        Err(DomainError::Unauthorized) => Ok("#Something went wrong.".to_string()),
        Err(err) => Err(err.into()),
    }
}

#[derive(Deserialize)]
pub(crate) struct PasswordForm {
    password: String,
    #[serde(rename = "password-confirmation")]
    password_confirmation: String,
}

/// Body contract: empty on success, the error message otherwise.
pub(crate) async fn change_password(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<PasswordForm>,
) -> Result<String, ApiError> {
    let Some(user) = current_user(&state, &headers).await? else {
        return Ok("Something went wrong.\n".to_string());
    };
    let changed = state
        .directory
        .change_password(&user, &form.password, &form.password_confirmation)
        .await;
    match changed {
        Ok(()) => Ok(String::new()),
        Err(DomainError::Validation(message)) => Ok(message),
        Err(err) => Err(err.into()),
    }
}
