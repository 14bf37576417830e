use serde::{Deserialize, Serialize};
use serde_json::{from_str, from_value, Value};

/// Text the server itself uses when it finishes sorting
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Playlist sorted successfully";

/// Body returned by `/sort_playlist/<id>`. Any JSON is accepted; fields of the wrong type are
/// kept as raw values and only a string `"success"` status counts as a success.
#[derive(Debug, Default, Deserialize)]
pub struct SortResponse {
    #[serde(default)]
    pub status: Option<Value>,
    #[serde(default)]
    pub message: Option<Value>,
    /// Upstream error payload the server forwards on failure
    #[serde(default)]
    pub response: Option<Value>,
}

impl SortResponse {
    /// Fails only if the body is not JSON at all. JSON that is not an object reads as an empty
    /// response.
    pub fn parse(body: &str) -> Result<Self, serde_json::Error> {
        match from_str(body)? {
            value @ Value::Object(_) => Ok(from_value(value).unwrap_or_default()),
            _ => Ok(Self::default()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(&self.status, Some(Value::String(s)) if s == "success")
    }
}

fn text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Decoded result of one sort request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOutcome {
    Success {
        message: String,
    },
    /// Anything other than `"success"`. The fields are kept for the logs only.
    Failure {
        status: String,
        detail: Option<String>,
    },
}

impl From<SortResponse> for SortOutcome {
    fn from(res: SortResponse) -> Self {
        if res.is_success() {
            return SortOutcome::Success {
                message: res
                    .message
                    .map(text)
                    .unwrap_or_else(|| DEFAULT_SUCCESS_MESSAGE.to_string()),
            };
        }
        let detail = match (res.message.map(text), res.response) {
            (Some(m), Some(r)) => Some(format!("{m} ({r})")),
            (Some(m), None) => Some(m),
            (None, Some(r)) => Some(r.to_string()),
            (None, None) => None,
        };
        SortOutcome::Failure {
            status: res.status.map(text).unwrap_or_else(|| "(missing)".to_string()),
            detail,
        }
    }
}

/// What a request task reports back. Transport errors are flattened into a string so that the
/// reply can travel through the action channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortReply {
    Sorted(SortOutcome),
    Unreachable(String),
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn decode(body: &str) -> SortOutcome {
        SortResponse::parse(body).unwrap().into()
    }

    #[test]
    fn test_success_message_is_kept_verbatim() {
        assert_eq!(
            decode(r#"{"status":"success","message":"Sorted 42 tracks"}"#),
            SortOutcome::Success {
                message: "Sorted 42 tracks".to_string()
            }
        );
    }

    #[test]
    fn test_success_without_message() {
        assert_eq!(
            decode(r#"{"status":"success"}"#),
            SortOutcome::Success {
                message: DEFAULT_SUCCESS_MESSAGE.to_string()
            }
        );
    }

    #[test]
    fn test_other_status_is_failure() {
        assert_eq!(
            decode(r#"{"status":"error"}"#),
            SortOutcome::Failure {
                status: "error".to_string(),
                detail: None
            }
        );
        // Status comparison is exact
        assert!(matches!(
            decode(r#"{"status":"Success","message":"nope"}"#),
            SortOutcome::Failure { .. }
        ));
    }

    #[test]
    fn test_failure_keeps_server_detail() {
        let outcome = decode(
            r#"{"status":"error","message":"Failed to clear playlist","response":{"error":{"status":401}}}"#,
        );
        assert_eq!(
            outcome,
            SortOutcome::Failure {
                status: "error".to_string(),
                detail: Some(r#"Failed to clear playlist ({"error":{"status":401}})"#.to_string())
            }
        );
    }

    #[test]
    fn test_odd_status_is_failure() {
        assert_eq!(
            decode(r#"{"status":500,"message":"boom"}"#),
            SortOutcome::Failure {
                status: "500".to_string(),
                detail: Some("boom".to_string())
            }
        );
        assert_eq!(
            decode(r#"{"status":null}"#),
            SortOutcome::Failure {
                status: "(missing)".to_string(),
                detail: None
            }
        );
        assert_eq!(
            decode(r#"{"message":"hi"}"#),
            SortOutcome::Failure {
                status: "(missing)".to_string(),
                detail: Some("hi".to_string())
            }
        );
        assert!(matches!(decode("[1, 2]"), SortOutcome::Failure { .. }));
        assert!(matches!(decode("\"success\""), SortOutcome::Failure { .. }));
    }

    #[test]
    fn test_success_with_odd_message() {
        assert_eq!(
            decode(r#"{"status":"success","message":42}"#),
            SortOutcome::Success {
                message: "42".to_string()
            }
        );
    }

    #[test]
    fn test_only_non_json_fails_to_decode() {
        assert!(SortResponse::parse("<html>Internal Server Error</html>").is_err());
        assert!(SortResponse::parse("").is_err());
        assert!(SortResponse::parse("{}").is_ok());
    }
}
