use axum::{
    Json,
    body::{Body, Bytes},
    extract::State,
    http::{HeaderMap, HeaderValue, header},
    response::{IntoResponse, Response},
};

use crate::{
    error::AppError,
    message::{ChatRequest, ChatResponse, Role},
    services::{profile::ProfileContext, prompt, shortcut},
    state::SharedState,
};

pub async fn chat_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let api_key = state
        .config
        .api_key
        .as_deref()
        .ok_or(AppError::MissingConfig("GROQ_API_KEY"))?;

    let payload: ChatRequest =
        serde_json::from_slice(&body).map_err(|e| AppError::InvalidRequest(e.to_string()))?;

    let ctx = match bearer_token(&headers) {
        Some(token) => load_profile(&state, token).await,
        None => None,
    };

    let latest = payload
        .messages
        .iter()
        .rev()
        .find(|m| m.role == Role::User)
        .map(|m| m.content.as_str())
        .unwrap_or_default();

    if let Some(content) = shortcut::resolve(latest, ctx.as_ref()) {
        let intent = shortcut::detect_intent(latest).map(|i| i.as_str()).unwrap_or_default();
        tracing::info!(intent, "answered from records");
        return Ok(Json(ChatResponse { content }).into_response());
    }

    let messages = prompt::augment(&payload.messages, ctx.as_ref().map(|c| &c.profile));
    let upstream = state.upstream.stream(api_key, &messages).await?;

    Ok(relay(upstream))
}

/// Pipes the upstream body through untouched, keeping its status and
/// content type.
fn relay(upstream: reqwest::Response) -> Response {
    let status = upstream.status();
    let content_type = upstream
        .headers()
        .get(header::CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("text/event-stream"));

    let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
    *response.status_mut() = status;
    response.headers_mut().insert(header::CONTENT_TYPE, content_type);
    response
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let raw = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = raw.strip_prefix("Bearer ").unwrap_or(raw).trim();
    (!token.is_empty()).then_some(token)
}

async fn load_profile(state: &SharedState, token: &str) -> Option<ProfileContext> {
    match state.profiles.load(token).await {
        Ok(ctx) => ctx,
        Err(e) => {
            tracing::warn!(error = %e, "could not resolve caller profile");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers), Some("abc.def"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);
    }
}
