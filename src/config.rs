use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::SyncResult;
use crate::service::SpecialUnits;

const CONFIG_FILE: &str = "shoplist-sync";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub mealie: RemoteConfig,
    pub grocy: RemoteConfig,
    pub http: HttpConfig,
    pub units: UnitsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
}

impl std::fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

/// Locale-specific unit names with special meaning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitsConfig {
    pub any_amount: Vec<String>,
    pub single_piece: Vec<String>,
}

impl UnitsConfig {
    pub fn special_units(&self) -> SpecialUnits {
        SpecialUnits::new(self.any_amount.iter().cloned(), self.single_piece.iter().cloned())
    }
}

pub const DEFAULT_ANY_AMOUNT_UNITS: [&str; 7] = [
    "Prise",
    "Schuss",
    "Spritzer",
    "Portion",
    "Scheibe",
    "Esslöffel",
    "Teelöffel",
];

pub const DEFAULT_SINGLE_PIECE_UNITS: [&str; 2] = ["Kopf", "Bund"];

impl AppConfig {
    /// Load defaults, then `shoplist-sync.toml` if present, then environment variables.
    ///
    /// Recognised variables: `SERVER_HOST`, `SERVER_PORT`, `MEALIE_BASE_URL`,
    /// `MEALIE_API_KEY`, `GROCY_BASE_URL`, `GROCY_API_KEY`, `HTTP_TIMEOUT_SECS`.
    pub fn load() -> SyncResult<Self> {
        let env = |key: &str| std::env::var(key).ok();

        let config = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 9193)?
            .set_default("mealie.base_url", "http://localhost:9000/api")?
            .set_default("grocy.base_url", "http://localhost:9283/api")?
            .set_default("http.timeout_secs", 30)?
            .set_default("http.connect_timeout_secs", 10)?
            .set_default("units.any_amount", DEFAULT_ANY_AMOUNT_UNITS.to_vec())?
            .set_default("units.single_piece", DEFAULT_SINGLE_PIECE_UNITS.to_vec())?
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix("SHOPLIST").separator("__"))
            .set_override_option("server.host", env("SERVER_HOST"))?
            .set_override_option("server.port", env("SERVER_PORT"))?
            .set_override_option("mealie.base_url", env("MEALIE_BASE_URL"))?
            .set_override_option("mealie.api_key", env("MEALIE_API_KEY"))?
            .set_override_option("grocy.base_url", env("GROCY_BASE_URL"))?
            .set_override_option("grocy.api_key", env("GROCY_API_KEY"))?
            .set_override_option("http.timeout_secs", env("HTTP_TIMEOUT_SECS"))?
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
