use clookit_storage::StorageConfig;
use clookit_worker::queue::DEFAULT_CONCURRENCY;

/// Server configuration loaded from environment variables.
///
/// Bind/timeout values have development defaults; everything pointing at an
/// external service is required and missing values are a fatal startup
/// error.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Concurrent-fetch ceiling for the download queue (default: `2`).
    pub download_concurrency: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                                        |
    /// |------------------------|------------------------------------------------|
    /// | `HOST`                 | `0.0.0.0`                                      |
    /// | `PORT`                 | `3000`                                         |
    /// | `CORS_ORIGINS`         | `http://localhost:5173,http://localhost:3000`  |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                                           |
    /// | `DOWNLOAD_CONCURRENCY` | `2`                                            |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173,http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let download_concurrency: usize = std::env::var("DOWNLOAD_CONCURRENCY")
            .unwrap_or_else(|_| DEFAULT_CONCURRENCY.to_string())
            .parse()
            .expect("DOWNLOAD_CONCURRENCY must be a positive integer");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            download_concurrency,
        }
    }
}

/// Connection settings for the three external services.
///
/// Every variable here is required; startup fails fast when one is missing.
#[derive(Debug, Clone)]
pub struct ServicesConfig {
    /// Identity service base URL.
    pub identity_url: String,
    /// Server-side service key for the identity service.
    pub identity_service_key: String,
    /// Object storage connection settings.
    pub storage: StorageConfig,
    /// Inference provider base URL.
    pub inference_url: String,
    /// Inference provider API token.
    pub inference_token: String,
    /// Model version identifier to run.
    pub inference_model_version: String,
}

impl ServicesConfig {
    /// Load from environment variables; every value is required.
    ///
    /// Required: `IDENTITY_URL`, `IDENTITY_SERVICE_KEY`, `STORAGE_ENDPOINT`,
    /// `STORAGE_REGION`, `STORAGE_ACCESS_KEY`, `STORAGE_SECRET_KEY`,
    /// `STORAGE_BUCKET`, `INFERENCE_URL`, `INFERENCE_TOKEN`,
    /// `INFERENCE_MODEL_VERSION`.
    pub fn from_env() -> Self {
        Self {
            identity_url: require("IDENTITY_URL"),
            identity_service_key: require("IDENTITY_SERVICE_KEY"),
            storage: StorageConfig {
                endpoint: require("STORAGE_ENDPOINT"),
                region: require("STORAGE_REGION"),
                access_key: require("STORAGE_ACCESS_KEY"),
                secret_key: require("STORAGE_SECRET_KEY"),
                bucket: require("STORAGE_BUCKET"),
            },
            inference_url: require("INFERENCE_URL"),
            inference_token: require("INFERENCE_TOKEN"),
            inference_model_version: require("INFERENCE_MODEL_VERSION"),
        }
    }
}

fn require(name: &str) -> String {
    std::env::var(name)
        .unwrap_or_else(|_| panic!("Missing required environment variable: {name}"))
}
