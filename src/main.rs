mod chat;
mod config;
mod models;
mod repl;
mod router;

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::{info, warn};

use config::AppConfig;
use router::{run_router, RouterState};

#[derive(Parser)]
#[command(name = "devchat", version, about = "Chat relay and terminal client for a Roblox development assistant")]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Run the relay server holding the upstream credential
  Serve {
    #[arg(long)]
    port: Option<u16>,
  },
  /// Chat from the terminal against a running relay
  Chat {
    #[arg(long, default_value = "http://127.0.0.1:3001")]
    server: String,
  },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  dotenv::dotenv().ok();
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

  let cli = Cli::parse();
  match cli.command {
    Commands::Serve { port } => {
      let mut config = AppConfig::from_env();
      if let Some(port) = port {
        config.port = port;
      }
      if config.api_key.is_none() {
        warn!("Missing OPENAI_API_KEY in environment. Add it to .env file.");
      }

      let addr = format!("0.0.0.0:{}", config.port);
      let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
      info!("Relay listening on {}", addr);
      run_router(listener, RouterState::new(config)).await
    }
    Commands::Chat { server } => repl::run(&server).await,
  }
}
