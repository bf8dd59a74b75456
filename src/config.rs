use std::env;

/// Browser-like identification header; some playlist hosts reject unknown clients
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub port: u16,

    // PostgreSQL (in-memory store when unset)
    pub database_url: Option<String>,
    pub db_max_connections: u32,

    // Aggregation
    pub user_agent: String,
    pub insert_batch_size: usize,
    pub refresh_interval_secs: Option<u64>,

    // Static snapshot
    pub snapshot_output_path: String,

    // Source manager
    pub source_manager_password: Option<String>,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            // Server
            port: env::var("PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse()
                .unwrap_or(3001),

            // PostgreSQL
            database_url: env::var("DATABASE_URL").ok().filter(|v| !v.is_empty()),
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),

            // Aggregation
            user_agent: env::var("USER_AGENT").unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string()),
            insert_batch_size: env::var("INSERT_BATCH_SIZE")
                .unwrap_or_else(|_| "500".to_string())
                .parse()
                .unwrap_or(500),
            refresh_interval_secs: env::var("REFRESH_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|secs| *secs > 0),

            // Static snapshot
            snapshot_output_path: env::var("SNAPSHOT_OUTPUT_PATH")
                .unwrap_or_else(|_| "public/aggregated.m3u".to_string()),

            // Source manager
            source_manager_password: env::var("SOURCE_MANAGER_PASSWORD")
                .ok()
                .filter(|v| !v.is_empty()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3001,
            database_url: None,
            db_max_connections: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            insert_batch_size: 500,
            refresh_interval_secs: None,
            snapshot_output_path: "public/aggregated.m3u".to_string(),
            source_manager_password: None,
        }
    }
}
