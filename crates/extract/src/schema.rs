use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
    /// Base64-encoded images
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub message: ChatMessage,
    #[serde(default)]
    pub total_duration: Option<u64>,
    #[serde(default)]
    pub eval_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let request = ChatRequest {
            model: "gemma3:12b".to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: "read this".to_string(),
                images: vec!["AAAA".to_string()],
            }],
            stream: false,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gemma3:12b");
        assert_eq!(json["stream"], false);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["images"][0], "AAAA");
    }

    #[test]
    fn test_response_parses_with_extra_fields() {
        let body = r##"{
            "model": "gemma3:12b",
            "created_at": "2025-03-14T10:00:00Z",
            "message": {"role": "assistant", "content": "# HELLO"},
            "done": true,
            "total_duration": 1500000000,
            "eval_count": 12
        }"##;

        let response: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.message.content, "# HELLO");
        assert!(response.message.images.is_empty());
        assert_eq!(response.eval_count, Some(12));
    }
}
