use anyhow::Result;
use async_trait::async_trait;
use log::error;
use uuid::Uuid;

use crate::models::{ChatCompletion, Message};

pub const SYSTEM_PROMPT: &str =
  "You are a helpful Roblox developer assistant. Provide clear Lua code and placement instructions.";
pub const GREETING: &str = "Hi! Describe the mechanic you are working on.";
pub const DEFAULT_TITLE: &str = "New chat";

const NO_REPLY_FALLBACK: &str = "No response from the model.";
const CONNECTION_ERROR: &str = "There was an error connecting to the server.";

#[async_trait]
pub trait Relay: Send + Sync {
  async fn relay_chat(&self, messages: &[Message]) -> Result<ChatCompletion>;
}

pub struct HttpRelay {
  base_url: String,
  http: reqwest::Client,
}

impl HttpRelay {
  pub fn new(base_url: &str) -> Self {
    Self {
      base_url: base_url.trim_end_matches('/').to_string(),
      http: reqwest::Client::new(),
    }
  }
}

#[async_trait]
impl Relay for HttpRelay {
  async fn relay_chat(&self, messages: &[Message]) -> Result<ChatCompletion> {
    let resp = self
      .http
      .post(format!("{}/api/chat", self.base_url))
      .json(&serde_json::json!({ "messages": messages }))
      .send()
      .await?;

    // Decode whatever came back regardless of status: an error body without
    // choices lands on the fallback reply, a non-JSON body on the error path.
    Ok(resp.json::<ChatCompletion>().await?)
  }
}

pub struct Conversation {
  pub id: Uuid,
  pub title: String,
  pub messages: Vec<Message>,
}

impl Conversation {
  pub fn new() -> Self {
    Self {
      id: Uuid::new_v4(),
      title: DEFAULT_TITLE.to_string(),
      messages: vec![Message::system(SYSTEM_PROMPT)],
    }
  }

  pub fn preview(&self) -> String {
    let last = self.messages.last().map(|m| m.content.as_str()).unwrap_or("");
    last.chars().take(60).collect()
  }

  pub fn visible_messages(&self) -> impl Iterator<Item = &Message> {
    self.messages.iter().filter(|m| m.role != "system")
  }
}

pub struct ChatClient {
  relay: Box<dyn Relay>,
  conversations: Vec<Conversation>,
  active: usize,
  busy: bool,
}

impl ChatClient {
  pub fn new(relay: Box<dyn Relay>) -> Self {
    let mut first = Conversation::new();
    first.messages.push(Message::assistant(GREETING));
    Self {
      relay,
      conversations: vec![first],
      active: 0,
      busy: false,
    }
  }

  pub fn conversations(&self) -> &[Conversation] {
    &self.conversations
  }

  pub fn active(&self) -> &Conversation {
    &self.conversations[self.active]
  }

  pub fn is_busy(&self) -> bool {
    self.busy
  }

  pub fn new_conversation(&mut self) -> Uuid {
    let conversation = Conversation::new();
    let id = conversation.id;
    self.conversations.insert(0, conversation);
    self.active = 0;
    id
  }

  pub fn select_conversation(&mut self, id: Uuid) -> bool {
    match self.conversations.iter().position(|c| c.id == id) {
      Some(idx) => {
        self.active = idx;
        true
      }
      None => false,
    }
  }

  // The user message is appended before the relay call goes out; the reply
  // (or a fixed fallback) is always appended afterwards. Failures are
  // absorbed into the transcript, never propagated.
  pub async fn send(&mut self, text: &str) -> bool {
    let text = text.trim();
    if text.is_empty() || self.busy {
      return false;
    }

    self.busy = true;
    let conversation = &mut self.conversations[self.active];
    conversation.messages.push(Message::user(text));
    let messages = conversation.messages.clone();

    let reply = match self.relay.relay_chat(&messages).await {
      Ok(completion) => completion.reply_text().unwrap_or(NO_REPLY_FALLBACK).to_string(),
      Err(err) => {
        error!("relay call failed: {}", err);
        CONNECTION_ERROR.to_string()
      }
    };

    self.conversations[self.active].messages.push(Message::assistant(&reply));
    self.busy = false;
    true
  }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Segment {
  Prose(String),
  Code(String),
}

// Positional split on the fence delimiter: odd parts are code, even parts
// prose. An unterminated fence still yields a trailing code segment.
pub fn split_segments(text: &str) -> Vec<Segment> {
  text
    .split("```")
    .enumerate()
    .map(|(idx, part)| {
      if idx % 2 == 1 {
        Segment::Code(part.to_string())
      } else {
        Segment::Prose(part.to_string())
      }
    })
    .collect()
}
