//! Application settings loaded via OrthoConfig.
//!
//! Values come from `WANDERLUST_*` environment variables, matching command
//! line flags, or a configuration file discovered by OrthoConfig.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use wanderlust::inbound::http::state::DEFAULT_MAX_UPLOAD_BYTES;

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_UPLOAD_FOLDER: &str = "WanderLust_DEV";

/// Origins always allowed to call the API from a browser.
pub const DEV_ORIGINS: [&str; 2] = ["http://localhost:5173", "http://localhost:3000"];

/// Server settings.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(prefix = "WANDERLUST")]
pub struct AppConfig {
    /// Interface to bind.
    pub host: Option<IpAddr>,
    /// TCP port to bind.
    pub port: Option<u16>,
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Directory holding uploaded images.
    pub upload_dir: Option<PathBuf>,
    /// Sub-folder recorded in stored image filenames.
    pub upload_folder: Option<String>,
    /// Origin used to build public image URLs.
    pub public_base_url: Option<String>,
    /// Largest accepted image upload in bytes.
    pub max_upload_bytes: Option<usize>,
    /// Browser origin of the deployed frontend.
    pub frontend_url: Option<String>,
}

impl AppConfig {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(
            self.host.unwrap_or(DEFAULT_HOST),
            self.port.unwrap_or(DEFAULT_PORT),
        )
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
            .max(1)
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.upload_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR))
    }

    pub fn upload_folder(&self) -> &str {
        self.upload_folder
            .as_deref()
            .unwrap_or(DEFAULT_UPLOAD_FOLDER)
    }

    /// Public origin for image URLs; defaults to `http://localhost:<port>`.
    pub fn public_base_url(&self) -> String {
        self.public_base_url
            .as_deref()
            .map(|url| url.trim_end_matches('/').to_owned())
            .unwrap_or_else(|| format!("http://localhost:{}", self.port.unwrap_or(DEFAULT_PORT)))
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes.unwrap_or(DEFAULT_MAX_UPLOAD_BYTES)
    }

    /// Development origins plus the configured frontend, without duplicates.
    pub fn allowed_origins(&self) -> Vec<String> {
        let mut origins: Vec<String> = DEV_ORIGINS.iter().map(|&origin| origin.to_owned()).collect();
        let frontend = self
            .frontend_url
            .as_deref()
            .map(|url| url.trim().trim_end_matches('/'))
            .filter(|url| !url.is_empty());
        if let Some(frontend) = frontend {
            if !origins.iter().any(|origin| origin == frontend) {
                origins.push(frontend.to_owned());
            }
        }
        origins
    }
}
