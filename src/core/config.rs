use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub storage: StorageConfig,
    pub gacha: GachaConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
}

/// Which backend holds the food collection
#[derive(Debug, Clone)]
pub enum StorageConfig {
    Postgres(DatabaseConfig),
    /// Process-local store, contents are lost on restart
    Memory,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

/// Timing of the reveal sequence
#[derive(Debug, Clone)]
pub struct GachaConfig {
    /// Delay between two in-progress draws
    pub tick_interval: Duration,
    /// Number of in-progress draws before the final pick
    pub max_ticks: u32,
    /// Offsets (relative to the commit) of each celebration burst
    pub burst_offsets: Vec<Duration>,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            storage: StorageConfig::from_env()?,
            gacha: GachaConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

impl AppConfig {
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 1024 * 1024; // 1MB

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_request_body_size = env::var("MAX_REQUEST_BODY_SIZE")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_REQUEST_BODY_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| "MAX_REQUEST_BODY_SIZE must be a valid number".to_string())?;

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            max_request_body_size,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl StorageConfig {
    pub fn from_env() -> Result<Self, String> {
        let backend = env::var("STORAGE_BACKEND").unwrap_or_else(|_| "postgres".to_string());

        match backend.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageConfig::Postgres(DatabaseConfig::from_env()?)),
            "memory" => Ok(StorageConfig::Memory),
            other => Err(format!(
                "STORAGE_BACKEND must be 'postgres' or 'memory', got '{}'",
                other
            )),
        }
    }
}

impl DatabaseConfig {
    const DEFAULT_MAX_CONNECTIONS: u32 = 5;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MAX_CONNECTIONS must be a valid number".to_string())?;

        let min_connections = env::var("DB_MIN_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MIN_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MIN_CONNECTIONS must be a valid number".to_string())?;

        let acquire_timeout_secs = env::var("DB_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_ACQUIRE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_ACQUIRE_TIMEOUT_SECS must be a valid number".to_string())?;

        let idle_timeout_secs = env::var("DB_IDLE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_IDLE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_IDLE_TIMEOUT_SECS must be a valid number".to_string())?;

        let max_lifetime_secs = env::var("DB_MAX_LIFETIME_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_LIFETIME_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_MAX_LIFETIME_SECS must be a valid number".to_string())?;

        Ok(Self {
            url,
            max_connections,
            min_connections,
            acquire_timeout_secs,
            idle_timeout_secs,
            max_lifetime_secs,
        })
    }
}

impl GachaConfig {
    const DEFAULT_TICK_INTERVAL_MS: u64 = 80;
    const DEFAULT_MAX_TICKS: u32 = 15;
    const DEFAULT_BURST_OFFSETS_MS: &'static str = "0,250,500";

    pub fn from_env() -> Result<Self, String> {
        let tick_interval_ms = env::var("GACHA_TICK_INTERVAL_MS")
            .unwrap_or_else(|_| Self::DEFAULT_TICK_INTERVAL_MS.to_string())
            .parse::<u64>()
            .map_err(|_| "GACHA_TICK_INTERVAL_MS must be a valid number".to_string())?;

        if tick_interval_ms == 0 {
            return Err("GACHA_TICK_INTERVAL_MS must be greater than 0".to_string());
        }

        let max_ticks = env::var("GACHA_MAX_TICKS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_TICKS.to_string())
            .parse::<u32>()
            .map_err(|_| "GACHA_MAX_TICKS must be a valid number".to_string())?;

        if max_ticks == 0 {
            return Err("GACHA_MAX_TICKS must be greater than 0".to_string());
        }

        let burst_offsets = parse_offsets(
            &env::var("GACHA_BURST_OFFSETS_MS")
                .unwrap_or_else(|_| Self::DEFAULT_BURST_OFFSETS_MS.to_string()),
        )?;

        Ok(Self {
            tick_interval: Duration::from_millis(tick_interval_ms),
            max_ticks,
            burst_offsets,
        })
    }
}

impl Default for GachaConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(Self::DEFAULT_TICK_INTERVAL_MS),
            max_ticks: Self::DEFAULT_MAX_TICKS,
            burst_offsets: vec![
                Duration::ZERO,
                Duration::from_millis(250),
                Duration::from_millis(500),
            ],
        }
    }
}

/// Parse a comma-separated list of millisecond offsets, earliest first
fn parse_offsets(raw: &str) -> Result<Vec<Duration>, String> {
    let mut offsets = raw
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| format!("Invalid burst offset '{}' in GACHA_BURST_OFFSETS_MS", s))
        })
        .collect::<Result<Vec<_>, String>>()?;

    offsets.sort();
    Ok(offsets)
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Gacha Makan API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "API documentation for Gacha Makan".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}
