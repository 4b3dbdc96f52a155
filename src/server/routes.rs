use axum::Json;
use axum::extract::multipart::Multipart;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::error::{ApiError, ErrorResponse};
use crate::history::store::{HistoryRecord, StoreError};
use crate::notify::dispatch::RawSend;
use crate::uploads::public_url;

use super::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    #[serde(rename = "pusherConfigured")]
    pub pusher_configured: bool,
}

#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    #[serde(rename = "instanceId", skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SendResponse {
    pub success: bool,
    #[serde(rename = "publishId")]
    pub publish_id: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: chrono::Utc::now(),
        pusher_configured: state.dispatcher.is_configured(),
    })
}

/// Only the public instance id crosses this boundary; the secret key never
/// leaves the process.
pub async fn config(State(state): State<AppState>) -> Json<ConfigResponse> {
    Json(ConfigResponse {
        instance_id: state.instance_id.clone(),
    })
}

pub async fn send(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    if let Some(limiter) = state.rate_limiter.as_ref()
        && !limiter.check(client_key(&headers)).await
    {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(ErrorResponse {
                error: "too many requests, please try again later".to_string(),
            }),
        )
            .into_response();
    }

    let (raw, uploaded) = match read_send_form(&state, &headers, multipart).await {
        Ok(parts) => parts,
        Err(err) => return err.into_response(),
    };

    match state.dispatcher.send(raw, uploaded).await {
        Ok(receipt) => Json(SendResponse {
            success: true,
            publish_id: receipt.publish_id,
        })
        .into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn history(State(state): State<AppState>) -> Json<Vec<HistoryRecord>> {
    Json(state.history.list().await)
}

pub async fn delete_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    match state.history.remove(&id).await {
        Ok(()) => Ok(Json(DeleteResponse { success: true })),
        Err(StoreError::NotFound) => Err(ApiError::NotFound),
        Err(err) => Err(ApiError::Internal(err.to_string())),
    }
}

/// Pulls the form fields and the optional image file out of the multipart
/// body. The uploaded file, when present, is stored immediately and its
/// public URL returned so it can outrank any `image` URL field.
async fn read_send_form(
    state: &AppState,
    headers: &HeaderMap,
    mut multipart: Multipart,
) -> Result<(RawSend, Option<String>), ApiError> {
    let mut raw = RawSend::default();
    let mut uploaded = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::Upload(format!("invalid multipart form: {err}")))?
    {
        match field.name() {
            Some("title") => raw.title = read_text(field).await?,
            Some("body") => raw.body = read_text(field).await?,
            Some("interest") => raw.interest = read_text(field).await?,
            Some("image") => raw.image = read_text(field).await?,
            Some("imageFile") => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|err| ApiError::Upload(format!("failed to read upload: {err}")))?;
                if data.is_empty() {
                    continue;
                }
                let stored = state
                    .uploads
                    .store_image(file_name.as_deref(), content_type.as_deref(), data)
                    .await?;
                uploaded = Some(public_url(
                    request_scheme(headers),
                    request_host(headers),
                    &stored.file_name,
                ));
            }
            _ => {}
        }
    }

    Ok((raw, uploaded))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|err| ApiError::Upload(format!("invalid multipart form: {err}")))
}

/// Rate-limit key for the request: the first `x-forwarded-for` hop, or a
/// shared key when no proxy header is present.
fn client_key(headers: &HeaderMap) -> &str {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or("direct")
}

fn request_scheme(headers: &HeaderMap) -> &str {
    headers
        .get("x-forwarded-proto")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("http")
}

fn request_host(headers: &HeaderMap) -> &str {
    headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("localhost")
}
