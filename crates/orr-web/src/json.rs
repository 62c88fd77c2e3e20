//! JSON request bodies whose rejections use the same JSON error envelope
//! as every other failure.
//!
//! Shape problems inside a well-formed document (a missing field, a value
//! outside a choice list, a string where a number belongs) become field
//! errors under the failing path. Broken syntax answers 400 and a missing
//! or foreign content type answers 415.

use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::{HeaderMap, header};
use axum::response::{IntoResponse, Response};
use orr_core::errors::ValidationErrors;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::error::Category;

use crate::error::WebError;

/// Drop-in replacement for [`axum::Json`] with [`WebError`] rejections.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !is_json(req.headers()) {
            return Err(WebError::UnsupportedMediaType);
        }
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| WebError::Malformed(rejection.body_text()))?;
        decode(&bytes).map(Json)
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    let Some(value) = headers.get(header::CONTENT_TYPE) else {
        return false;
    };
    let Ok(value) = value.to_str() else {
        return false;
    };
    let essence = value.split(';').next().unwrap_or_default().trim();
    let Some((kind, subtype)) = essence.split_once('/') else {
        return false;
    };
    kind.eq_ignore_ascii_case("application")
        && (subtype.eq_ignore_ascii_case("json")
            || subtype.to_ascii_lowercase().ends_with("+json"))
}

/// Deserialize `bytes`, classifying failures for the client.
pub(crate) fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, WebError> {
    let mut de = serde_json::Deserializer::from_slice(bytes);
    let value = serde_path_to_error::deserialize(&mut de).map_err(|err| {
        let path = err.path().to_string();
        let inner = err.into_inner();
        match inner.classify() {
            Category::Data => WebError::Validation(field_errors(&path, &inner)),
            Category::Syntax | Category::Eof | Category::Io => {
                WebError::Malformed(without_position(&inner.to_string()).to_string())
            }
        }
    })?;
    de.end()
        .map_err(|err| WebError::Malformed(without_position(&err.to_string()).to_string()))?;
    Ok(value)
}

fn field_errors(path: &str, err: &serde_json::Error) -> ValidationErrors {
    let text = err.to_string();
    let message = without_position(&text);

    if let Some(field) = backticked(message, "missing field ") {
        let key = if path == "." {
            field.to_string()
        } else {
            format!("{path}.{field}")
        };
        return ValidationErrors::single(&key, "This field is required.");
    }

    let key = if path == "." {
        ValidationErrors::NON_FIELD
    } else {
        path
    };
    match backticked(message, "unknown variant ") {
        Some(value) => ValidationErrors::single(
            key,
            format!("Select a valid choice. {value} is not one of the available choices."),
        ),
        None => ValidationErrors::single(key, message),
    }
}

/// serde_json appends "at line L column C"; clients get the bare message.
fn without_position(message: &str) -> &str {
    message
        .rfind(" at line ")
        .map_or(message, |index| &message[..index])
}

/// The text between the backticks that follow `prefix`.
fn backticked<'a>(message: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = message.strip_prefix(prefix)?.strip_prefix('`')?;
    rest.split_once('`').map(|(inner, _)| inner)
}
