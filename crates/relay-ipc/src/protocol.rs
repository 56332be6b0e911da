//! IPC protocol definitions.
//!
//! Uses a JSON-RPC-like protocol over Unix domain sockets: one JSON object per
//! line in each direction.

use crate::error::{IpcError, IpcResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// IPC method types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    // Lifecycle
    Health,
    Shutdown,

    // Chat
    #[serde(rename = "chat.send")]
    ChatSend,
    #[serde(rename = "chat.pull")]
    ChatPull,
}

/// IPC request message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    /// Request ID for correlation.
    pub id: String,
    /// Method to invoke.
    pub method: Method,
    /// Method parameters (optional).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
}

impl Request {
    /// Create a new request with auto-generated ID.
    pub fn new(method: Method) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            method,
            params: None,
        }
    }

    /// Create a new request with parameters.
    pub fn with_params(method: Method, params: serde_json::Value) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            method,
            params: Some(params),
        }
    }

    /// Decode the parameters into a typed struct.
    ///
    /// A missing `params` field decodes as JSON `null`.
    pub fn parse_params<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.params.clone().unwrap_or(serde_json::Value::Null))
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// IPC response message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    /// Request ID for correlation.
    pub id: String,
    /// Result data (if successful).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    /// Error information (if failed).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

/// Error information in a response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Error code.
    pub code: i32,
    /// Error message.
    pub message: String,
    /// Additional error data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl Response {
    /// Create a successful response.
    pub fn success(id: &str, result: serde_json::Value) -> Self {
        Self {
            id: id.to_string(),
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: &str, code: i32, message: &str) -> Self {
        Self {
            id: id.to_string(),
            result: None,
            error: Some(ErrorInfo {
                code,
                message: message.to_string(),
                data: None,
            }),
        }
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Check if the response is successful.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Turn the response into its typed result, or the remote error.
    pub fn into_result<T: DeserializeOwned>(self) -> IpcResult<T> {
        if let Some(error) = self.error {
            return Err(IpcError::Remote {
                code: error.code,
                message: error.message,
            });
        }
        match self.result {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Err(IpcError::Protocol(format!(
                "response {} has neither result nor error",
                self.id
            ))),
        }
    }
}

/// Parameters of `chat.send`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendParams {
    pub chat: String,
    pub sender: String,
    pub text: String,
}

/// Parameters of `chat.pull`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullParams {
    pub chat: String,
    #[serde(default)]
    pub cursor: i64,
    pub limit: i32,
    #[serde(default)]
    pub reverse: bool,
}

/// Result of `chat.send`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendReply {
    pub code: i32,
    pub msg: String,
}

impl SendReply {
    pub fn ok() -> Self {
        Self {
            code: 0,
            msg: "success".to_string(),
        }
    }
}

/// One message in a `chat.pull` result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMessage {
    pub chat: String,
    pub text: String,
    pub sender: String,
    pub send_time: i64,
}

/// Result of `chat.pull`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullReply {
    pub code: i32,
    pub msg: String,
    pub messages: Vec<WireMessage>,
    pub has_more: bool,
    pub next_cursor: i64,
}

// Standard error codes
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
    pub const FORBIDDEN: i32 = -32004;
    pub const STORAGE_FAILURE: i32 = -32005;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let request = Request::new(Method::Health);
        let json = request.to_json().unwrap();

        assert!(json.contains("\"method\":\"health\""));
        assert!(json.contains("\"id\":"));
        assert!(!json.contains("\"params\""));
    }

    #[test]
    fn test_all_methods_serialize() {
        let methods = [
            (Method::Health, "health"),
            (Method::Shutdown, "shutdown"),
            (Method::ChatSend, "chat.send"),
            (Method::ChatPull, "chat.pull"),
        ];

        for (method, expected_name) in methods {
            let json = Request::new(method).to_json().unwrap();
            assert!(
                json.contains(&format!("\"method\":\"{}\"", expected_name)),
                "Method {:?} should serialize to {}",
                method,
                expected_name
            );
        }
    }

    #[test]
    fn test_request_from_json_invalid() {
        assert!(Request::from_json("not json").is_err());
        assert!(Request::from_json(r#"{"id":"123"}"#).is_err());
        assert!(Request::from_json(r#"{"id":"123","method":"chat.delete"}"#).is_err());
    }

    #[test]
    fn test_pull_params_defaults() {
        let request = Request::from_json(
            r#"{"id":"1","method":"chat.pull","params":{"chat":"a:b","limit":5}}"#,
        )
        .unwrap();
        let params: PullParams = request.parse_params().unwrap();

        assert_eq!(params.chat, "a:b");
        assert_eq!(params.cursor, 0);
        assert_eq!(params.limit, 5);
        assert!(!params.reverse);
    }

    #[test]
    fn test_pull_params_require_limit() {
        let request = Request::with_params(Method::ChatPull, serde_json::json!({"chat": "a:b"}));
        assert!(request.parse_params::<PullParams>().is_err());
    }

    #[test]
    fn test_send_params_missing() {
        let request = Request::new(Method::ChatSend);
        assert!(request.parse_params::<SendParams>().is_err());
    }

    #[test]
    fn test_pull_reply_uses_camel_case() {
        let reply = PullReply {
            code: 0,
            msg: "success".to_string(),
            messages: vec![WireMessage {
                chat: "Bob:alice".to_string(),
                text: "hi".to_string(),
                sender: "alice".to_string(),
                send_time: 17,
            }],
            has_more: true,
            next_cursor: 4,
        };
        let json = serde_json::to_value(&reply).unwrap();

        assert_eq!(json["hasMore"], true);
        assert_eq!(json["nextCursor"], 4);
        assert_eq!(json["messages"][0]["sendTime"], 17);
        assert_eq!(json["messages"][0]["chat"], "Bob:alice");
    }

    #[test]
    fn test_response_error() {
        let response = Response::error("123", error_codes::FORBIDDEN, "not a member");
        let json = response.to_json().unwrap();

        assert!(json.contains("\"id\":\"123\""));
        assert!(json.contains("\"code\":-32004"));
        assert!(!json.contains("\"result\""));
        assert!(!response.is_success());
    }

    #[test]
    fn test_into_result() {
        let ok = Response::success("1", serde_json::to_value(SendReply::ok()).unwrap());
        assert_eq!(ok.into_result::<SendReply>().unwrap(), SendReply::ok());

        let err = Response::error("2", error_codes::STORAGE_FAILURE, "down");
        match err.into_result::<SendReply>() {
            Err(IpcError::Remote { code, message }) => {
                assert_eq!(code, error_codes::STORAGE_FAILURE);
                assert_eq!(message, "down");
            }
            other => panic!("unexpected: {other:?}"),
        }

        let empty = Response {
            id: "3".to_string(),
            result: None,
            error: None,
        };
        assert!(matches!(
            empty.into_result::<SendReply>(),
            Err(IpcError::Protocol(_))
        ));
    }
}
