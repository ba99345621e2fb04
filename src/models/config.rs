use serde::Deserialize;

/// Configuration options of the encyclopedia server.
///
/// Loaded from `config/default.yaml`, an optional `config/{APP_ENV}.yaml`
/// overlay and `APP_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind the HTTP server to.
    pub address: String,
    /// TCP port to listen on.
    pub port: u16,
    /// Path of the SQLite database file.
    pub database_url: String,
    /// Key used to sign session and flash-message cookies. Must be at least
    /// 64 bytes long.
    pub secret_key: String,
    /// Glob pattern of the Tera templates.
    pub templates_dir: String,
    /// Directory served under `/assets`.
    pub static_dir: String,
}
