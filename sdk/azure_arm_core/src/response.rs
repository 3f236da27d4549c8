//! Response handling.
//!
//! An [`ArmResponse`] pairs the raw HTTP response with the [`Operation`] that
//! produced it. Consuming it checks the status against the operation's
//! accepted set and decodes the body. The body is always read to the end,
//! whatever the outcome.

use serde::de::DeserializeOwned;

use crate::error::{ArmError, ArmResult};
use crate::models::ErrorResponse;
use crate::request::Operation;

/// Maximum length for error messages to prevent sensitive data leaks.
const MAX_ERROR_MESSAGE_LEN: usize = 1000;

/// A response received for a prepared request, not yet validated.
#[derive(Debug)]
pub struct ArmResponse {
    operation: Operation,
    response: reqwest::Response,
}

impl ArmResponse {
    pub(crate) fn new(operation: Operation, response: reqwest::Response) -> Self {
        Self {
            operation,
            response,
        }
    }

    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    /// Raw HTTP status, before validation.
    pub fn status_code(&self) -> u16 {
        self.response.status().as_u16()
    }

    /// Validate the status and decode the JSON body into `T`.
    pub async fn json<T: DeserializeOwned>(self) -> ArmResult<T> {
        let operation = self.operation;
        let (status, body) = self.accepted_body().await?;
        decode(&operation, status, &body)
    }

    /// Like [`json`](Self::json), but an empty body yields `None`.
    ///
    /// For operations that may answer `202 Accepted` or `204 No Content`
    /// without a payload.
    pub async fn json_optional<T: DeserializeOwned>(self) -> ArmResult<Option<T>> {
        let operation = self.operation;
        let (status, body) = self.accepted_body().await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        decode(&operation, status, &body).map(Some)
    }

    /// Validate the status only, discarding the body.
    pub async fn status(self) -> ArmResult<u16> {
        let (status, _) = self.accepted_body().await?;
        Ok(status)
    }

    async fn accepted_body(self) -> ArmResult<(u16, bytes::Bytes)> {
        let operation = self.operation;
        let status = self.response.status().as_u16();
        let body = self
            .response
            .bytes()
            .await
            .map_err(|e| ArmError::transport(operation.name, e))?;

        if operation.accepts(status) {
            tracing::debug!(operation = operation.name, status, "response accepted");
            Ok((status, body))
        } else {
            tracing::debug!(operation = operation.name, status, "response rejected");
            Err(rejection(&operation, status, &body))
        }
    }
}

fn decode<T: DeserializeOwned>(operation: &Operation, status: u16, body: &[u8]) -> ArmResult<T> {
    serde_json::from_slice(body).map_err(|e| {
        ArmError::response(
            operation.name,
            status,
            None,
            truncate_message(&format!(
                "failed to deserialize response body: {e}; body: {}",
                String::from_utf8_lossy(body)
            )),
        )
    })
}

/// Build the error for a status outside the accepted set.
///
/// ARM reports failures as `{"error": {"code": .., "message": ..}}`; when
/// that envelope is present its code and message are used, otherwise the
/// raw body.
fn rejection(operation: &Operation, status: u16, body: &[u8]) -> ArmError {
    let text = String::from_utf8_lossy(body);
    if let Ok(envelope) = serde_json::from_slice::<ErrorResponse>(body) {
        if let Some(detail) = envelope.error {
            return ArmError::response(
                operation.name,
                status,
                detail.code,
                truncate_message(detail.message.as_deref().unwrap_or(&text)),
            );
        }
    }
    ArmError::response(operation.name, status, None, truncate_message(&text))
}

/// Sanitize error messages by removing bearer tokens.
///
/// Request echoes in error bodies sometimes include the `Authorization`
/// header; this keeps such tokens out of logs.
pub(crate) fn sanitize_error_message(msg: &str) -> String {
    let mut result = msg.to_string();

    let mut search_start = 0;
    while search_start < result.len() {
        let Some(relative_pos) = result[search_start..].find("Bearer ") else {
            break;
        };
        let token_start = search_start + relative_pos + 7;
        if token_start >= result.len() {
            break;
        }
        if result[token_start..].starts_with("[REDACTED]") {
            search_start = token_start + 10;
            continue;
        }

        let token_end = result[token_start..]
            .find(|c: char| c.is_whitespace() || c == '"' || c == '\'' || c == ',')
            .map(|pos| token_start + pos)
            .unwrap_or(result.len());

        if token_end > token_start {
            result.replace_range(token_start..token_end, "[REDACTED]");
            search_start = token_start + 10;
        } else {
            search_start = token_start;
        }
    }

    result
}

/// Sanitize, then truncate a message exceeding [`MAX_ERROR_MESSAGE_LEN`].
pub(crate) fn truncate_message(msg: &str) -> String {
    let sanitized = sanitize_error_message(msg);

    if sanitized.len() > MAX_ERROR_MESSAGE_LEN {
        let mut cut = MAX_ERROR_MESSAGE_LEN;
        while !sanitized.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}... (truncated)", &sanitized[..cut])
    } else {
        sanitized
    }
}
