//! Process configuration.
//!
//! Layers, later wins: built-in defaults, an optional file (format picked by
//! extension), then `SPARETRACK__SECTION__KEY` environment variables.

use std::path::Path;

use serde::Deserialize;

use sparetrack_observability::LogSettings;

pub use config::ConfigError;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub peers: PeerSettings,
    pub auth: AuthSettings,
    pub gateway: GatewaySettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
        }
    }
}

/// No `url` means the process keeps its table in memory.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub url: Option<String>,
    pub max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PeerSettings {
    pub category_url: String,
    pub supplier_url: String,
    pub part_url: String,
    pub timeout_ms: u64,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Default for PeerSettings {
    fn default() -> Self {
        Self {
            category_url: "http://localhost:8082".to_string(),
            supplier_url: "http://localhost:8081".to_string(),
            part_url: "http://localhost:8083".to_string(),
            timeout_ms: 5000,
            username: None,
            password: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    pub enabled: bool,
    pub protected_prefixes: Vec<String>,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            protected_prefixes: vec!["/api".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceSettings {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GatewaySettings {
    pub services: Vec<ServiceSettings>,
    pub docs_path: String,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        let services = [
            "category-service",
            "supplier-service",
            "part-service",
            "inventory-service",
            "gateway-service",
        ]
        .into_iter()
        .map(|name| ServiceSettings {
            name: name.to_string(),
            url: format!("http://{name}"),
        })
        .collect();

        Self {
            services,
            docs_path: "/v3/api-docs".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from defaults, `path` (if given) and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        builder
            .add_source(
                config::Environment::with_prefix("SPARETRACK")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("auth.protected_prefixes")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Parse settings from TOML text on top of the defaults (no environment).
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(text, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}
