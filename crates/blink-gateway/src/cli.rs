use blink_generator::BASE62_ALPHABET;
use blink_telemetry::LogFormat;
use clap::{Parser, ValueEnum};
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;

pub const LISTEN_ADDR_ENV: &str = "BLINK_LISTEN_ADDR";
pub const DSN_ENV: &str = "BLINK_DSN";
pub const BASE_URL_ENV: &str = "BLINK_BASE_URL";
pub const CODE_LENGTH_ENV: &str = "BLINK_CODE_LENGTH";
pub const CODE_ALPHABET_ENV: &str = "BLINK_CODE_ALPHABET";
pub const MAX_ATTEMPTS_ENV: &str = "BLINK_MAX_ATTEMPTS";
pub const PG_MAX_CONNECTIONS_ENV: &str = "BLINK_PG_MAX_CONNECTIONS";
pub const REQUEST_TIMEOUT_ENV: &str = "BLINK_REQUEST_TIMEOUT_SECS";
pub const LOG_FORMAT_ENV: &str = "BLINK_LOG_FORMAT";
pub const OTLP_ENDPOINT_ENV: &str = "BLINK_OTLP_ENDPOINT";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
pub const MEMORY_DSN: &str = "memory";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    #[value(name = "text")]
    Text,
    #[value(name = "json")]
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Text => LogFormat::Text,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

/// Storage backend selected by the DSN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    InMemory,
    Postgres(String),
}

impl Display for StorageBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::InMemory => write!(f, "in-memory"),
            StorageBackend::Postgres(_) => write!(f, "postgres"),
        }
    }
}

fn parse_dsn(dsn: &str) -> Result<StorageBackend, String> {
    if dsn == MEMORY_DSN {
        Ok(StorageBackend::InMemory)
    } else if dsn.starts_with("postgres://") || dsn.starts_with("postgresql://") {
        Ok(StorageBackend::Postgres(dsn.to_string()))
    } else {
        Err(format!(
            "unknown storage dsn; expected '{MEMORY_DSN}' or a postgres:// url"
        ))
    }
}

/// Stamped by the release build, e.g. `BLINK_BUILD_COMMIT=$(git rev-parse --short HEAD)`.
pub const BUILD_COMMIT: &str = match option_env!("BLINK_BUILD_COMMIT") {
    Some(commit) => commit,
    None => "unknown",
};
pub const BUILD_TIME: &str = match option_env!("BLINK_BUILD_TIME") {
    Some(time) => time,
    None => "unknown",
};

#[derive(Debug, Parser)]
#[command(name = "gateway", version, about = "Blink URL shortener HTTP gateway")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// `memory` or a `postgres://` connection string.
    #[arg(
        long,
        env = DSN_ENV,
        default_value = MEMORY_DSN,
        value_parser = parse_dsn,
        hide_env_values = true
    )]
    pub dsn: StorageBackend,

    /// Public base URL used to build returned links. Defaults to `http://<listen-addr>`.
    #[arg(long, env = BASE_URL_ENV)]
    pub base_url: Option<String>,

    #[arg(long, env = CODE_LENGTH_ENV, default_value_t = blink_generator::random::DEFAULT_LENGTH)]
    pub code_length: usize,

    #[arg(long, env = CODE_ALPHABET_ENV, default_value = BASE62_ALPHABET)]
    pub code_alphabet: String,

    #[arg(long, env = MAX_ATTEMPTS_ENV, default_value_t = blink_shortener::DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: usize,

    #[arg(
        long,
        env = PG_MAX_CONNECTIONS_ENV,
        default_value_t = blink_storage::postgres::DEFAULT_MAX_CONNECTIONS
    )]
    pub max_connections: u32,

    #[arg(long, env = REQUEST_TIMEOUT_ENV, default_value_t = 10)]
    pub request_timeout_secs: u64,

    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormatArg::Text)]
    pub log_format: LogFormatArg,

    #[arg(long, env = OTLP_ENDPOINT_ENV)]
    pub otlp_endpoint: Option<String>,
}

impl CLI {
    pub fn base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| format!("http://{}", self.listen_addr))
    }
}
