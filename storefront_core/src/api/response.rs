use serde_json::Value;

/// What the server told us, once we've made sense of the response. Every
/// endpoint answers with the same envelope, `{"success": bool, "message"?:
/// string}`, but we don't control the server, so it's read leniently:
/// anything that isn't exactly that shape is a rejection without a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The server said `success: true`.
    Accepted,

    /// Anything else, with the server's message if it gave a usable one.
    Rejected(Option<String>),
}

impl Outcome {
    /// Interpret a response body. Never fails: bodies that aren't JSON, or
    /// are JSON of the wrong shape, are rejections.
    pub fn from_body(body: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(body) {
            Ok(value) => Self::from_value(&value),
            Err(err) => {
                tracing::debug!(?err, "response body was not JSON");
                Self::Rejected(None)
            }
        }
    }

    /// Interpret an already-parsed response body.
    pub fn from_value(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            tracing::debug!("response body was not a JSON object");
            return Self::Rejected(None);
        };

        if object.get("success").and_then(Value::as_bool) == Some(true) {
            return Self::Accepted;
        }

        Self::Rejected(
            object
                .get("message")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|message| !message.is_empty())
                .map(str::to_owned),
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_true_is_accepted() {
        assert_eq!(
            Outcome::from_body(br#"{"success": true, "user": {"id": 1}}"#),
            Outcome::Accepted
        );
    }

    #[test]
    fn failure_carries_message() {
        assert_eq!(
            Outcome::from_value(&json!({"success": false, "message": "X"})),
            Outcome::Rejected(Some("X".to_string()))
        );
    }

    #[test]
    fn stringly_success_is_not_success() {
        assert_eq!(
            Outcome::from_value(&json!({"success": "true"})),
            Outcome::Rejected(None)
        );
    }

    #[test]
    fn missing_success_is_rejected() {
        assert_eq!(
            Outcome::from_value(&json!({"message": "who knows"})),
            Outcome::Rejected(Some("who knows".to_string()))
        );
    }

    #[test]
    fn blank_or_non_string_messages_are_dropped() {
        assert_eq!(
            Outcome::from_value(&json!({"success": false, "message": "  "})),
            Outcome::Rejected(None)
        );
        assert_eq!(
            Outcome::from_value(&json!({"success": false, "message": 42})),
            Outcome::Rejected(None)
        );
    }

    #[test]
    fn non_json_is_rejected() {
        assert_eq!(
            Outcome::from_body(b"<html>Bad Gateway</html>"),
            Outcome::Rejected(None)
        );
        assert_eq!(Outcome::from_body(b"[true]"), Outcome::Rejected(None));
    }
}
