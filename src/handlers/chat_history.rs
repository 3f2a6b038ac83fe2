use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error};

use crate::config::non_empty;
use crate::error::AdventError;
use crate::router::AdventState;

/// Number of trailing messages returned to the client.
pub const HISTORY_WINDOW: usize = 5;

#[derive(Debug, Deserialize)]
pub struct ChatHistoryQuery {
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ChatHistoryResponse {
    pub messages: Vec<Value>,
}

/// GET /api/chat-history?sessionId=<id>
pub async fn chat_history_handler(
    State(state): State<AdventState>,
    Query(query): Query<ChatHistoryQuery>,
) -> Result<Json<ChatHistoryResponse>, AdventError> {
    let session_id =
        non_empty(query.session_id.as_deref()).ok_or(AdventError::MissingSessionId)?;

    let messages = load_history(&state, session_id)
        .await
        .inspect_err(|e| error!(session_id, error = %e, "failed to load chat history"))?;

    debug!(session_id, returned = messages.len(), "chat history served");
    Ok(Json(ChatHistoryResponse { messages }))
}

/// OPTIONS /api/chat-history
pub async fn chat_history_preflight() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

async fn load_history(state: &AdventState, session_id: &str) -> Result<Vec<Value>, AdventError> {
    let Some(raw) = state.kv.get(session_id).await? else {
        return Ok(Vec::new());
    };
    let history = match serde_json::from_str::<Value>(&raw)? {
        Value::Array(items) => items,
        _ => return Err(AdventError::MalformedHistory),
    };
    Ok(recent_messages(history, HISTORY_WINDOW))
}

/// The last `limit` items of `history`, in their stored order.
pub fn recent_messages<T>(mut history: Vec<T>, limit: usize) -> Vec<T> {
    let start = history.len().saturating_sub(limit);
    history.drain(..start);
    history
}
