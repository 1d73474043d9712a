//! Custom Axum extractors

use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::request::Parts;
use axum::Form;
use serde::Deserialize;
use serde_json::Value;

use super::error::ApiError;
use crate::models::ItemId;

/// Extract an item id from the path.
///
/// The leading integer of the segment is used (`12abc` targets 12). A
/// segment with no leading integer is rejected as not found, the same
/// answer the store gives for an id with no row.
pub struct ValidItemId(pub ItemId);

impl<S> FromRequestParts<S> for ValidItemId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::item_not_found(""))?;

        match ItemId::parse(&raw) {
            Some(id) => Ok(Self(id)),
            None => {
                tracing::debug!(id = %raw, "item id has no leading integer");
                Err(ApiError::item_not_found(raw))
            }
        }
    }
}

/// Fields accepted in an add/edit body
#[derive(Debug, Default, Deserialize)]
pub struct TitlePayload {
    #[serde(default)]
    pub title: Option<String>,
}

impl TitlePayload {
    /// Title from a decoded JSON body.
    ///
    /// Only objects carry a title; arrays carry none. Scalars other than
    /// strings are stored as their text (`5` -> "5", `true` -> "true").
    fn from_json(body: Value) -> Result<Self, ApiError> {
        match body {
            Value::Object(mut fields) => Ok(Self {
                title: fields.remove("title").and_then(title_text),
            }),
            Value::Array(_) => Ok(Self::default()),
            _ => Err(ApiError::BadRequest {
                message: "JSON body must be an object".to_string(),
            }),
        }
    }
}

/// Text form of a JSON title; null stays NULL.
fn title_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Array(items) => Some(array_literal(&items)),
        other => Some(other.to_string()),
    }
}

/// Postgres array literal, e.g. `["a", 1, null]` -> `{"a","1",NULL}`.
fn array_literal(items: &[Value]) -> String {
    let elements: Vec<String> = items
        .iter()
        .map(|item| match item {
            Value::Null => "NULL".to_string(),
            Value::Array(nested) => array_literal(nested),
            Value::String(s) => quote_element(s),
            other => quote_element(&other.to_string()),
        })
        .collect();
    format!("{{{}}}", elements.join(","))
}

fn quote_element(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Title body in JSON or urlencoded form.
///
/// Bodies with any other content type, and empty JSON bodies, carry no title.
pub struct ItemBody(pub TitlePayload);

enum BodyKind {
    Json,
    Form,
    Other,
}

fn body_kind(req: &Request) -> BodyKind {
    let mime = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|v| v.trim().to_ascii_lowercase())
        .unwrap_or_default();

    if mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
    {
        BodyKind::Json
    } else if mime == "application/x-www-form-urlencoded" {
        BodyKind::Form
    } else {
        BodyKind::Other
    }
}

impl<S> FromRequest<S> for ItemBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match body_kind(&req) {
            BodyKind::Json => {
                // Oversized bodies keep their 413
                let bytes = Bytes::from_request(req, state)
                    .await
                    .map_err(|e| ApiError::rejected(e.status(), e.body_text()))?;

                if bytes.iter().all(u8::is_ascii_whitespace) {
                    return Ok(Self(TitlePayload::default()));
                }

                let body: Value =
                    serde_json::from_slice(&bytes).map_err(|e| ApiError::BadRequest {
                        message: format!("invalid JSON body: {}", e),
                    })?;
                Ok(Self(TitlePayload::from_json(body)?))
            }
            BodyKind::Form => {
                let Form(payload) = Form::<TitlePayload>::from_request(req, state)
                    .await
                    .map_err(|e| ApiError::rejected(e.status(), e.body_text()))?;
                Ok(Self(payload))
            }
            BodyKind::Other => Ok(Self(TitlePayload::default())),
        }
    }
}
