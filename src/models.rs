use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone)]
pub struct Message {
  pub role: String,
  pub content: String,
}

impl Message {
  pub fn system(content: &str) -> Self {
    Self {
      role: "system".to_string(),
      content: content.to_string(),
    }
  }

  pub fn user(content: &str) -> Self {
    Self {
      role: "user".to_string(),
      content: content.to_string(),
    }
  }

  pub fn assistant(content: &str) -> Self {
    Self {
      role: "assistant".to_string(),
      content: content.to_string(),
    }
  }
}

// Loose decode of the upstream completion body. Every field is optional;
// an absent reply resolves to None, never to a decode failure.
#[derive(Serialize, Deserialize, Clone, Default)]
pub struct ChatCompletion {
  #[serde(default)]
  pub choices: Vec<Choice>,
}

#[derive(Serialize, Deserialize, Clone, Default)]
pub struct Choice {
  #[serde(default)]
  pub message: Option<ReplyMessage>,
}

#[derive(Serialize, Deserialize, Clone, Default)]
pub struct ReplyMessage {
  #[serde(default)]
  pub role: String,
  #[serde(default)]
  pub content: Option<String>,
}

impl ChatCompletion {
  pub fn reply_text(&self) -> Option<&str> {
    self.choices.first()?.message.as_ref()?.content.as_deref()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn reply_text_reads_nested_content() {
    let completion: ChatCompletion = serde_json::from_value(json!({
      "id": "chatcmpl-123",
      "object": "chat.completion",
      "choices": [
        { "index": 0, "message": { "role": "assistant", "content": "Hello there" }, "finish_reason": "stop" }
      ],
      "usage": { "total_tokens": 12 }
    }))
    .expect("completion should decode");

    assert_eq!(completion.reply_text(), Some("Hello there"));
  }

  #[test]
  fn reply_text_is_none_without_choices() {
    let completion: ChatCompletion =
      serde_json::from_value(json!({ "id": "chatcmpl-123" })).expect("completion should decode");

    assert_eq!(completion.reply_text(), None);
  }

  #[test]
  fn reply_text_is_none_for_null_content() {
    let completion: ChatCompletion = serde_json::from_value(json!({
      "choices": [ { "message": { "role": "assistant", "content": null } } ]
    }))
    .expect("completion should decode");

    assert_eq!(completion.reply_text(), None);
  }

  #[test]
  fn reply_text_is_none_for_empty_choice() {
    let completion: ChatCompletion = serde_json::from_value(json!({
      "choices": [ {} ]
    }))
    .expect("completion should decode");

    assert_eq!(completion.reply_text(), None);
  }
}
