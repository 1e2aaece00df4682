use crate::error::SemSearchError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// SemSearch application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Company catalog CSV path
    pub data_path: PathBuf,

    /// Vector index file path
    pub index_path: PathBuf,

    /// Ollama API base URL
    pub ollama_base_url: String,

    /// Embedding model name
    pub embedding_model: String,

    /// Default result limit for search
    pub default_limit: usize,

    /// Server bind address
    pub server_host: String,

    /// Server port
    pub server_port: u16,

    /// Log directory
    pub log_dir: PathBuf,

    /// Log level
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("./data/companies.csv"),
            index_path: PathBuf::from("./data/vector_index.json"),
            ollama_base_url: "http://localhost:11434".to_string(),
            embedding_model: "nomic-embed-text".to_string(),
            default_limit: 10,
            server_host: "0.0.0.0".to_string(),
            server_port: 8000,
            log_dir: PathBuf::from("./data/log"),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and .env file
    pub fn from_env() -> Result<Self, SemSearchError> {
        // Load .env file (ignore if not exists)
        let _ = dotenv::dotenv();

        let config = Self {
            data_path: Self::get_env_path("DATA_PATH")
                .unwrap_or_else(|| PathBuf::from("./data/companies.csv")),
            index_path: Self::get_env_path("INDEX_PATH")
                .unwrap_or_else(|| PathBuf::from("./data/vector_index.json")),
            ollama_base_url: std::env::var("OLLAMA_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:11434".to_string()),
            embedding_model: std::env::var("EMBEDDING_MODEL")
                .unwrap_or_else(|_| "nomic-embed-text".to_string()),
            default_limit: std::env::var("DEFAULT_LIMIT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            server_host: std::env::var("SERVER_HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: std::env::var("SERVER_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8000),
            log_dir: Self::get_env_path("LOG_DIR")
                .unwrap_or_else(|| PathBuf::from("./data/log")),
            log_level: std::env::var("LOG_LEVEL")
                .unwrap_or_else(|_| "info".to_string()),
        };

        // Ensure required directories exist
        config.ensure_directories()?;

        Ok(config)
    }

    /// Get PathBuf from environment variable
    fn get_env_path(key: &str) -> Option<PathBuf> {
        std::env::var(key).ok().map(PathBuf::from)
    }

    /// Ensure required directories exist, create if not
    pub fn ensure_directories(&self) -> Result<(), SemSearchError> {
        let mut dirs = vec![self.log_dir.clone()];
        if let Some(parent) = self.index_path.parent() {
            dirs.push(parent.to_path_buf());
        }

        for dir in dirs {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                std::fs::create_dir_all(&dir).map_err(|e| {
                    SemSearchError::config(format!(
                        "Failed to create directory {}: {}",
                        dir.display(),
                        e
                    ))
                })?;
            }
        }

        Ok(())
    }

    /// Get server bind address (host:port)
    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), SemSearchError> {
        // Validate embedding model name
        if self.embedding_model.is_empty() {
            return Err(SemSearchError::config(
                "Embedding model name cannot be empty",
            ));
        }

        // Validate Ollama URL
        if !self.ollama_base_url.starts_with("http://")
            && !self.ollama_base_url.starts_with("https://")
        {
            return Err(SemSearchError::config(
                "Ollama base URL must start with http:// or https://",
            ));
        }

        // Validate result limit
        if self.default_limit == 0 {
            return Err(SemSearchError::config("Default result limit cannot be 0"));
        }

        // Validate port range
        if self.server_port == 0 {
            return Err(SemSearchError::config("Server port cannot be 0"));
        }

        Ok(())
    }
}
