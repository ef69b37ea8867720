//! Wire messages exchanged with the worker.
//!
//! Every message is one JSON object on its own line. Outbound messages carry a `type` tag:
//!
//! ```text
//! {"type":"ping","id":1}
//! {"type":"request","id":2,"command":"autocomplete","file":"a.py",...}
//! {"type":"notification","id":3,"remove":false,"filename":"a.py","diff":"+ x\n"}
//! ```
//!
//! Responses echo the id and, for requests, the command.

use crate::command::Command;
use codeintel_core::Token;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A message sent to the worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Message {
    /// Liveness check; answered with a response carrying only the id.
    Ping {
        /// Message id.
        id: u64,
    },
    /// A command the worker answers with a [`Response`].
    Request {
        /// Message id.
        id: u64,
        /// Command to run.
        command: Command,
        /// File the request is about.
        file: String,
        /// Words the completion source should prefer.
        expected_keywords: Vec<String>,
        /// Word under the cursor.
        current_word: String,
        /// Language of `file`.
        language: String,
    },
    /// File create, update or removal.
    Notification {
        /// Message id.
        id: u64,
        /// Whether the file is being removed.
        remove: bool,
        /// File name.
        filename: String,
        /// Line diff from the previously sent text (empty on removal).
        diff: String,
    },
}

impl Message {
    /// Message id.
    pub fn id(&self) -> u64 {
        match self {
            Message::Ping { id }
            | Message::Request { id, .. }
            | Message::Notification { id, .. } => *id,
        }
    }

    /// Build a request message from `params`.
    pub fn request(id: u64, command: Command, params: RequestParams) -> Self {
        Message::Request {
            id,
            command,
            file: params.file,
            expected_keywords: params.expected_keywords,
            current_word: params.current_word,
            language: params.language,
        }
    }

    /// Build a file notification.
    pub fn notification(id: u64, filename: &str, diff: String, remove: bool) -> Self {
        Message::Notification {
            id,
            remove,
            filename: filename.to_string(),
            diff,
        }
    }
}

/// Parameters of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestParams {
    /// File the request is about.
    pub file: String,
    /// Words the completion source should prefer.
    pub expected_keywords: Vec<String>,
    /// Word under the cursor.
    pub current_word: String,
    /// Language of `file`.
    pub language: String,
}

impl RequestParams {
    /// Parameters for `file` with default keywords, an empty current word and language `Text`.
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            expected_keywords: vec![String::new()],
            current_word: String::new(),
            language: "Text".to_string(),
        }
    }

    /// Replace the expected keywords.
    pub fn with_expected_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expected_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Set the word under the cursor.
    pub fn with_current_word(mut self, word: impl Into<String>) -> Self {
        self.current_word = word.into();
        self
    }

    /// Set the language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}

/// A message received from the worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Id of the message being answered.
    pub id: u64,
    /// Command of the answered request; absent for pings and notifications.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Command result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
}

impl Response {
    /// Decode `result` as highlight tokens. A missing result yields no tokens.
    pub fn tokens(&self) -> Result<Vec<Token>, serde_json::Error> {
        match &self.result {
            Some(result) => Vec::<Token>::deserialize(result),
            None => Ok(Vec::new()),
        }
    }

    /// Decode `result` as a list of strings (completions, replacements).
    pub fn strings(&self) -> Result<Vec<String>, serde_json::Error> {
        match &self.result {
            Some(result) => Vec::<String>::deserialize(result),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codeintel_core::Category;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_outbound_wire_format() {
        let ping = serde_json::to_value(Message::Ping { id: 1 }).unwrap();
        assert_eq!(ping, json!({"type": "ping", "id": 1}));

        let request = Message::request(
            2,
            Command::Autocomplete,
            RequestParams::new("a.py").with_current_word("pri"),
        );
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "type": "request",
                "id": 2,
                "command": "autocomplete",
                "file": "a.py",
                "expected_keywords": [""],
                "current_word": "pri",
                "language": "Text",
            })
        );

        let removal = Message::notification(3, "a.py", String::new(), true);
        assert_eq!(
            serde_json::to_value(&removal).unwrap(),
            json!({"type": "notification", "id": 3, "remove": true, "filename": "a.py", "diff": ""})
        );
    }

    #[test]
    fn test_response_fields_are_optional() {
        let pong: Response = serde_json::from_str(r#"{"id": 4}"#).unwrap();
        assert_eq!(pong.command, None);
        assert_eq!(pong.tokens().unwrap(), Vec::new());

        let extra: Response =
            serde_json::from_str(r#"{"id": 5, "command": "highlight", "elapsed": 0.2}"#).unwrap();
        assert_eq!(extra.command.as_deref(), Some("highlight"));
    }

    #[test]
    fn test_response_tokens() {
        let response: Response = serde_json::from_value(json!({
            "id": 7,
            "command": "highlight",
            "result": [[[1, 0], 3, "Keyword"], [[2, 4], 5, "Hidden_Char"]],
        }))
        .unwrap();
        assert_eq!(
            response.tokens().unwrap(),
            vec![
                Token::new(1, 0, 3, Category::Keyword),
                Token::new(2, 4, 5, Category::HiddenChar),
            ]
        );
        assert!(response.strings().is_err());
    }
}
