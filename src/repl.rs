use std::io::{self, Write};

use anyhow::Result;

use crate::chat::{split_segments, ChatClient, Conversation, HttpRelay, Segment};
use crate::models::Message;

const RULE: &str = "----------------------------------------";

pub async fn run(server: &str) -> Result<()> {
  let relay = HttpRelay::new(server);
  let mut client = ChatClient::new(Box::new(relay));

  println!("devchat — type a message, or /new, /list, /open <n>, /quit");
  render_transcript(client.active());

  loop {
    print!("> ");
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
      break;
    }
    let line = line.trim();

    match line {
      "" => continue,
      "/quit" | "/exit" => break,
      "/new" => {
        client.new_conversation();
        println!("Started a new chat.");
      }
      "/list" => {
        let active_id = client.active().id;
        for (idx, conversation) in client.conversations().iter().enumerate() {
          let marker = if conversation.id == active_id { "*" } else { " " };
          println!("{} {}. {} — {}", marker, idx + 1, conversation.title, conversation.preview());
        }
      }
      _ if line.starts_with("/open") => {
        match parse_open_index(line, client.conversations().len()) {
          Some(idx) => {
            let id = client.conversations()[idx].id;
            client.select_conversation(id);
            render_transcript(client.active());
          }
          None => println!("Usage: /open <n> (see /list)"),
        }
      }
      _ if line.starts_with('/') => {
        println!("Unknown command: {}", line);
      }
      _ => {
        if client.is_busy() {
          continue;
        }
        println!("...");
        if client.send(line).await {
          if let Some(reply) = client.active().messages.last() {
            render_message(reply);
          }
        }
      }
    }
  }

  Ok(())
}

fn parse_open_index(line: &str, len: usize) -> Option<usize> {
  let n: usize = line.strip_prefix("/open")?.trim().parse().ok()?;
  if n >= 1 && n <= len {
    Some(n - 1)
  } else {
    None
  }
}

fn render_transcript(conversation: &Conversation) {
  println!("{}", RULE);
  println!("{}", conversation.title);
  for message in conversation.visible_messages() {
    render_message(message);
  }
}

fn render_message(message: &Message) {
  let label = if message.role == "user" { "You" } else { "AI" };
  println!("{}:", label);
  for segment in split_segments(&message.content) {
    match segment {
      Segment::Prose(text) => {
        if !text.trim().is_empty() {
          println!("{}", text.trim_end());
        }
      }
      Segment::Code(code) => {
        println!("{}", RULE);
        println!("{}", code.trim_matches('\n'));
        println!("{}", RULE);
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn open_index_accepts_valid_range() {
    assert_eq!(parse_open_index("/open 1", 3), Some(0));
    assert_eq!(parse_open_index("/open 3", 3), Some(2));
  }

  #[test]
  fn open_index_rejects_out_of_range() {
    assert_eq!(parse_open_index("/open 0", 3), None);
    assert_eq!(parse_open_index("/open 4", 3), None);
    assert_eq!(parse_open_index("/open x", 3), None);
    assert_eq!(parse_open_index("/open", 3), None);
  }
}
