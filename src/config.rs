// src/config.rs
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;

/// Command-line arguments, each also readable from the environment.
#[derive(Parser, Debug, Clone)]
#[command(name = "music-chat-backend")]
#[command(about = "Chat, music search and recommendation HTTP backend")]
#[command(version)]
pub struct Config {
    /// Address to bind the HTTP server to
    #[arg(long, default_value = "0.0.0.0", env = "BIND_ADDR")]
    pub bind_addr: IpAddr,

    /// Port to listen on
    #[arg(short, long, default_value_t = 3000, env = "PORT")]
    pub port: u16,

    /// Database connection string
    #[arg(long, default_value = "sqlite://music.db?mode=rwc", env = "DATABASE_URL")]
    pub database_url: String,

    /// Session signing secret
    #[arg(long, env = "SESSION_SECRET", hide_env_values = true)]
    pub session_secret: Option<String>,

    /// External chat service; the built-in keyword responder is used when unset
    #[arg(long, env = "CHAT_SERVICE_URL")]
    pub chat_service_url: Option<String>,

    /// JSON array of tracks loaded into an empty catalog at startup
    #[arg(long, env = "CATALOG_SEED")]
    pub catalog_seed: Option<PathBuf>,

    /// Directory served for paths no route matches
    #[arg(long, default_value = "public", env = "STATIC_DIR")]
    pub static_dir: PathBuf,
}

impl Config {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}
