//! Request body validation.
//!
//! Each schema is a plain function from a JSON body to either a sanitized,
//! typed value or the full list of problems found. Unknown fields are
//! dropped because the sanitized value only carries what the schema names.
//! Handlers receive validated bodies through the [`Validated`] extractor, so
//! an invalid request is answered with `400 { "errors": [..] }` before any
//! handler code runs.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

/// Sanitized body of a create request.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateDeck {
    pub title: String,
}

/// Sanitized body of a delete request.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteDeck {
    pub id: Uuid,
}

/// A named request schema.
pub trait Schema: Sized {
    const NAME: &'static str;

    fn validate(body: &Value) -> Result<Self, Vec<String>>;
}

impl Schema for CreateDeck {
    const NAME: &'static str = "create";

    fn validate(body: &Value) -> Result<Self, Vec<String>> {
        validate_create(body)
    }
}

impl Schema for DeleteDeck {
    const NAME: &'static str = "delete";

    fn validate(body: &Value) -> Result<Self, Vec<String>> {
        validate_delete(body)
    }
}

/// `title` must be a non-empty string.
pub fn validate_create(body: &Value) -> Result<CreateDeck, Vec<String>> {
    let fields = as_object(body)?;
    let mut errors = Vec::new();

    let title = required_string(fields, "title", &mut errors);

    match title {
        Some(title) if errors.is_empty() => Ok(CreateDeck { title }),
        _ => Err(errors),
    }
}

/// `_id` must be a non-empty string holding a GUID.
pub fn validate_delete(body: &Value) -> Result<DeleteDeck, Vec<String>> {
    let fields = as_object(body)?;
    let mut errors = Vec::new();

    let id = required_string(fields, "_id", &mut errors).and_then(|raw| match Uuid::parse_str(&raw) {
        Ok(id) => Some(id),
        Err(_) => {
            errors.push(r#""_id" must be a valid GUID"#.to_string());
            None
        }
    });

    match id {
        Some(id) if errors.is_empty() => Ok(DeleteDeck { id }),
        _ => Err(errors),
    }
}

fn as_object(body: &Value) -> Result<&Map<String, Value>, Vec<String>> {
    body.as_object()
        .ok_or_else(|| vec![r#""value" must be of type object"#.to_string()])
}

fn required_string(fields: &Map<String, Value>, key: &str, errors: &mut Vec<String>) -> Option<String> {
    match fields.get(key) {
        None | Some(Value::Null) => {
            errors.push(format!(r#""{key}" is required"#));
            None
        }
        Some(Value::String(s)) if s.is_empty() => {
            errors.push(format!(r#""{key}" is not allowed to be empty"#));
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.push(format!(r#""{key}" must be a string"#));
            None
        }
    }
}

/// Rejection sent when a body fails its schema.
#[derive(Debug, Serialize)]
pub struct ValidationRejection {
    pub errors: Vec<String>,
}

impl IntoResponse for ValidationRejection {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(self)).into_response()
    }
}

/// Extractor yielding a body that passed schema `T`.
#[derive(Debug)]
pub struct Validated<T>(pub T);

impl<S, T> FromRequest<S> for Validated<T>
where
    S: Send + Sync,
    T: Schema + Send,
{
    type Rejection = ValidationRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ValidationRejection { errors: vec![e.body_text()] })?;

        // A missing body validates like an empty object
        let body = if bytes.iter().all(u8::is_ascii_whitespace) {
            Value::Object(Map::new())
        } else {
            serde_json::from_slice(&bytes).map_err(|e| ValidationRejection {
                errors: vec![format!("Invalid JSON body: {e}")],
            })?
        };

        T::validate(&body).map(Validated).map_err(|errors| {
            tracing::debug!(schema = T::NAME, ?errors, "Request body failed validation");
            ValidationRejection { errors }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_accepts_title_and_strips_unknown_fields() {
        let value = validate_create(&json!({ "title": "Spanish Verbs", "owner": "me" })).unwrap();
        assert_eq!(value, CreateDeck { title: "Spanish Verbs".into() });
    }

    #[test]
    fn create_rejects_missing_empty_and_non_string_titles() {
        assert_eq!(validate_create(&json!({})).unwrap_err(), vec![r#""title" is required"#]);
        assert_eq!(
            validate_create(&json!({ "title": "" })).unwrap_err(),
            vec![r#""title" is not allowed to be empty"#]
        );
        assert_eq!(
            validate_create(&json!({ "title": 42 })).unwrap_err(),
            vec![r#""title" must be a string"#]
        );
    }

    #[test]
    fn non_object_bodies_are_rejected() {
        assert_eq!(
            validate_create(&json!(["title"])).unwrap_err(),
            vec![r#""value" must be of type object"#]
        );
    }

    #[test]
    fn delete_requires_a_guid() {
        let id = Uuid::new_v4();
        assert_eq!(
            validate_delete(&json!({ "_id": id.to_string() })).unwrap(),
            DeleteDeck { id }
        );
        assert_eq!(validate_delete(&json!({})).unwrap_err(), vec![r#""_id" is required"#]);
        assert_eq!(
            validate_delete(&json!({ "_id": "abc" })).unwrap_err(),
            vec![r#""_id" must be a valid GUID"#]
        );
        assert_eq!(
            validate_delete(&json!({ "_id": null })).unwrap_err(),
            vec![r#""_id" is required"#]
        );
    }
}
