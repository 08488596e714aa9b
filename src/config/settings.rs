//! Typed configuration sections deserialized by [`super::AppConfig::load`].

use serde::Deserialize;

/// Top-level configuration, matching `spec.md` §6's recognized option list
/// plus an `extractor` section the subprocess wire contract requires.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HTTP bind address.
    pub http: HttpSettings,
    /// Relational store connection settings.
    pub postgres: PostgresSettings,
    /// Graph store connection settings.
    pub graph: GraphSettings,
    /// Embedder provider settings.
    pub embedding: EmbeddingSettings,
    /// Extractor subprocess settings.
    pub extractor: ExtractorSettings,
    /// Developer-scope authentication settings.
    pub auth: AuthConfig,
    /// Structured logging settings.
    pub logger: LoggerSettings,
}

/// `http.{host,port}`.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpSettings {
    /// Bind host, e.g. `0.0.0.0`.
    pub host: String,
    /// Bind port.
    pub port: u16,
}

/// `postgres.{host,port,user,password,database,max_open_connections}`.
#[derive(Debug, Clone, Deserialize)]
pub struct PostgresSettings {
    /// Database host.
    pub host: String,
    /// Database port.
    pub port: u16,
    /// Connection user.
    pub user: String,
    /// Connection password.
    pub password: String,
    /// Target database name.
    pub database: String,
    /// Maximum size of the r2d2 connection pool.
    pub max_open_connections: u32,
}

impl PostgresSettings {
    /// Renders a libpq connection string for `diesel::r2d2::ConnectionManager`.
    #[must_use]
    pub fn connection_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.database
        )
    }
}

/// `graph.{uri,username,password,database}`.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphSettings {
    /// Bolt connection URI.
    pub uri: String,
    /// Authentication username.
    pub username: String,
    /// Authentication password.
    pub password: String,
    /// Target database name.
    pub database: String,
}

/// `embedding.provider` — which wire binding the configured embedder uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProvider {
    /// An HTTP embedding service reachable on the local network.
    Local,
    /// The OpenAI embeddings API.
    Openai,
    /// The in-process deterministic mock, for tests and offline runs.
    Mock,
}

/// `embedding.{provider,model,dimension}`.
#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingSettings {
    /// Which embedder binding to construct.
    pub provider: EmbeddingProvider,
    /// Model identifier sent in the wire request.
    pub model: String,
    /// Expected embedding vector length; mismatches are fatal (`spec.md` §6).
    pub dimension: usize,
    /// HTTP endpoint for `provider = "local"` or `provider = "openai"`.
    #[serde(default)]
    pub endpoint: Option<String>,
}

/// Extractor subprocess invocation settings. Not named in `spec.md` §6's
/// configuration list, but required to construct `SubprocessExtractor`.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractorSettings {
    /// Path to the extractor executable.
    pub program: String,
    /// Arguments passed to the extractor on every invocation.
    #[serde(default)]
    pub args: Vec<String>,
    /// Per-call timeout, in seconds.
    pub timeout_secs: u64,
}

/// `auth.cluster_api_key`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Shared secret developer-scope requests must present.
    pub cluster_api_key: String,
}

/// `logger.level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Verbose diagnostic output.
    Debug,
    /// Default operational level.
    Info,
    /// Recoverable anomalies.
    Warn,
    /// Failures requiring attention.
    Error,
}

/// `logger.format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Structured JSON, for production log aggregation.
    Json,
    /// Human-readable, for local development.
    Dev,
}

/// `logger.{level,format}`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggerSettings {
    /// Minimum level emitted.
    pub level: LogLevel,
    /// Output encoding.
    pub format: LogFormat,
}
