/// Centralized helpers for WebSocket and HTTP error responses.
///
/// Every error frame has the same shape, `{"action":"Error","data":{code,message,context}}`,
/// so clients can handle lobby, game and rule errors in one place.
use actix_web::{HttpResponse, http::StatusCode};
use serde_json::{Value, json};

use crate::game::ActionError;

/// Formats a WebSocket error message as a JSON string.
///
/// # Arguments
/// - `code`: Stable error code (e.g. "NOT_YOUR_TURN").
/// - `message`: Human-readable error message.
/// - `context`: Optional context (e.g. player_id, room_id).
pub fn ws_error_message(code: &str, message: &str, context: Option<Value>) -> String {
    json!({
        "action": "Error",
        "data": {
            "code": code,
            "message": message,
            "context": context.unwrap_or(Value::Null),
        }
    })
    .to_string()
}

/// Error frame for a rule rejection from the engine.
pub fn ws_action_error_message(err: &ActionError, context: Option<Value>) -> String {
    ws_error_message(err.code(), &err.to_string(), context)
}

/// Returns a WebSocket message for session kicked (unicity violation).
pub fn ws_session_kicked_message(context: Option<Value>) -> String {
    ws_error_message(
        "SESSION_KICKED",
        "You have been disconnected because another session has connected with your player id.",
        context,
    )
}

/// Returns an HTTP error response with a JSON body.
pub fn http_error_response(code: &str, message: &str, context: Option<&str>, status: StatusCode) -> HttpResponse {
    let body = json!({
        "error": {
            "code": code,
            "message": message,
            "context": context.unwrap_or(""),
        }
    });
    HttpResponse::build(status)
        .content_type("application/json")
        .body(body.to_string())
}
