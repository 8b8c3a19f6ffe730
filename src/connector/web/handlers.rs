use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::{Form, Json};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, warn};

use crate::application::{SendOutcome, SessionHandle, CLEARED_NOTICE, EMPTY_INPUT_WARNING};
use crate::connector::api::Container;
use crate::domain::{ChatModel, ChatSession, DomainError, ErrorDetail, Message};

use super::page::{render_page, Notice, PageView};
use super::session_cookie::{session_cookie, session_id_from_headers};

#[derive(Clone)]
pub struct WebState {
    pub container: Arc<Container>,
}

/// [`DomainError`] mapped onto an HTTP status with a JSON body.
pub struct WebError(DomainError);

impl From<DomainError> for WebError {
    fn from(e: DomainError) -> Self {
        Self(e)
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            DomainError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            DomainError::NotFound(_) => StatusCode::NOT_FOUND,
            e if e.is_upstream() => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

/// Form posted by both the Send and Clear Chat buttons.
#[derive(Debug, Deserialize)]
pub struct ChatForm {
    #[serde(default)]
    pub app_name: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct SendRequest {
    pub message: String,
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TranscriptResponse {
    pub session_id: String,
    pub title: String,
    pub model: ChatModel,
    /// Unix seconds.
    pub created_at: i64,
    pub messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
pub struct SendResponse {
    pub reply: Option<String>,
    pub error: Option<ErrorDetail>,
    #[serde(flatten)]
    pub transcript: TranscriptResponse,
}

async fn open_session(
    state: &WebState,
    headers: &HeaderMap,
) -> Result<(SessionHandle, bool), DomainError> {
    let id = session_id_from_headers(headers);
    state
        .container
        .open_session_use_case()
        .execute(id.as_deref())
        .await
}

/// Attach the session cookie when the session was created by this request.
fn with_session_cookie(response: impl IntoResponse, session_id: &str, created: bool) -> Response {
    let mut response = response.into_response();
    if created {
        match HeaderValue::from_str(&session_cookie(session_id)) {
            Ok(value) => {
                response.headers_mut().insert(header::SET_COOKIE, value);
            }
            Err(e) => warn!("Could not encode session cookie: {}", e),
        }
    }
    response
}

fn render_session(state: &WebState, session: &ChatSession, notices: &[Notice]) -> Html<String> {
    let banner = state.container.credential_warning();
    Html(render_page(&PageView {
        title: session.title(),
        model: session.model(),
        transcript: session.conversation().list_visible(),
        banner: banner.as_deref(),
        notices,
    }))
}

fn transcript_of(session: &ChatSession) -> TranscriptResponse {
    TranscriptResponse {
        session_id: session.id().to_string(),
        title: session.title().to_string(),
        model: session.model(),
        created_at: session.created_at(),
        messages: session
            .conversation()
            .list_visible()
            .into_iter()
            .cloned()
            .collect(),
    }
}

/// Apply the title and model fields of a posted form. Returns a warning for
/// an unrecognized model id; the previous selection is kept in that case.
fn apply_selection(session: &mut ChatSession, form: &ChatForm) -> Option<Notice> {
    session.set_title(&form.app_name);
    if form.model.trim().is_empty() {
        return None;
    }
    match form.model.parse::<ChatModel>() {
        Ok(model) => {
            session.select_model(model);
            None
        }
        Err(e) => Some(Notice::Warning(e.to_string())),
    }
}

pub async fn index(State(state): State<WebState>, headers: HeaderMap) -> Result<Response, WebError> {
    let (handle, created) = open_session(&state, &headers).await?;
    let session = handle.lock().await;
    let page = render_session(&state, &session, &[]);
    Ok(with_session_cookie(page, session.id(), created))
}

pub async fn send_form(
    State(state): State<WebState>,
    headers: HeaderMap,
    Form(form): Form<ChatForm>,
) -> Result<Response, WebError> {
    let (handle, created) = open_session(&state, &headers).await?;
    let mut session = handle.lock().await;

    let mut notices: Vec<Notice> = apply_selection(&mut session, &form).into_iter().collect();
    let model = session.model();
    match state
        .container
        .send_message_use_case()
        .execute(session.conversation_mut(), model, &form.message)
        .await
    {
        Ok(SendOutcome::Replied(_)) => {}
        Ok(SendOutcome::Failed(detail)) => notices.push(Notice::Error(detail.transcript_text())),
        Err(e) if e.is_invalid_input() => {
            notices.push(Notice::Warning(EMPTY_INPUT_WARNING.to_string()))
        }
        Err(e) => return Err(e.into()),
    }

    let page = render_session(&state, &session, &notices);
    Ok(with_session_cookie(page, session.id(), created))
}

pub async fn clear_form(
    State(state): State<WebState>,
    headers: HeaderMap,
    Form(form): Form<ChatForm>,
) -> Result<Response, WebError> {
    let (handle, created) = open_session(&state, &headers).await?;
    let mut session = handle.lock().await;

    let mut notices: Vec<Notice> = apply_selection(&mut session, &form).into_iter().collect();
    state
        .container
        .clear_conversation_use_case()
        .execute(session.conversation_mut());
    notices.push(Notice::Success(CLEARED_NOTICE.to_string()));

    let page = render_session(&state, &session, &notices);
    Ok(with_session_cookie(page, session.id(), created))
}

pub async fn api_models(State(state): State<WebState>) -> Json<serde_json::Value> {
    Json(json!({
        "models": ChatModel::ALL,
        "default": state.container.default_model(),
    }))
}

pub async fn api_messages(
    State(state): State<WebState>,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    let (handle, created) = open_session(&state, &headers).await?;
    let session = handle.lock().await;
    Ok(with_session_cookie(
        Json(transcript_of(&session)),
        session.id(),
        created,
    ))
}

pub async fn api_send(
    State(state): State<WebState>,
    headers: HeaderMap,
    Json(request): Json<SendRequest>,
) -> Result<Response, WebError> {
    let (handle, created) = open_session(&state, &headers).await?;
    let mut session = handle.lock().await;

    if let Some(name) = request.model.as_deref() {
        session.select_model(name.parse()?);
    }
    let model = session.model();
    let outcome = state
        .container
        .send_message_use_case()
        .execute(session.conversation_mut(), model, &request.message)
        .await?;

    let (reply, error) = match outcome {
        SendOutcome::Replied(reply) => (Some(reply), None),
        SendOutcome::Failed(detail) => (None, Some(detail)),
    };
    let body = SendResponse {
        reply,
        error,
        transcript: transcript_of(&session),
    };
    Ok(with_session_cookie(Json(body), session.id(), created))
}

pub async fn api_clear(
    State(state): State<WebState>,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    let (handle, created) = open_session(&state, &headers).await?;
    let mut session = handle.lock().await;
    state
        .container
        .clear_conversation_use_case()
        .execute(session.conversation_mut());
    Ok(with_session_cookie(
        Json(transcript_of(&session)),
        session.id(),
        created,
    ))
}

pub async fn health(State(state): State<WebState>) -> Result<Json<serde_json::Value>, WebError> {
    let sessions = state.container.session_repository().count().await?;
    Ok(Json(json!({ "status": "ok", "sessions": sessions })))
}
