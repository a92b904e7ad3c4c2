use std::env;

// No Debug derive: api_key must never end up in formatted output.
#[derive(Clone)]
pub struct AppConfig {
  pub api_key: Option<String>,
  pub api_base: String,
  pub model: String,
  pub max_tokens: u32,
  pub temperature: f64,
  pub port: u16,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      api_key: None,
      api_base: "https://api.openai.com".to_string(),
      model: "gpt-4o-mini".to_string(),
      max_tokens: 1200,
      temperature: 0.2,
      port: 3001,
    }
  }
}

impl AppConfig {
  pub fn from_env() -> Self {
    let mut config = AppConfig::default();
    if let Some(key) = non_empty_var("OPENAI_API_KEY") {
      config.api_key = Some(key);
    }
    if let Some(base) = non_empty_var("OPENAI_API_BASE") {
      config.api_base = base;
    }
    if let Some(model) = non_empty_var("OPENAI_MODEL") {
      config.model = model;
    }
    if let Some(port) = non_empty_var("PORT").and_then(|p| p.parse().ok()) {
      config.port = port;
    }
    config
  }
}

fn non_empty_var(name: &str) -> Option<String> {
  match env::var(name) {
    Ok(value) if !value.trim().is_empty() => Some(value),
    _ => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_has_no_credential() {
    let config = AppConfig::default();
    assert!(config.api_key.is_none());
  }

  #[test]
  fn default_model_parameters() {
    let config = AppConfig::default();
    assert_eq!(config.api_base, "https://api.openai.com");
    assert_eq!(config.model, "gpt-4o-mini");
    assert_eq!(config.max_tokens, 1200);
    assert_eq!(config.temperature, 0.2);
    assert_eq!(config.port, 3001);
  }
}
