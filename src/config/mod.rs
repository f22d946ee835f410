use serde::Deserialize;
use config::{Config, ConfigError, Environment, File};

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Public URL of this server, used to build the gateway callback URLs.
    pub base_url: String,
    /// Where the gateway redirects land after success/fail/cancel.
    pub frontend_url: String,
    pub uploads_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GatewayConfig {
    #[serde(default)]
    pub store_id: String,
    #[serde(default)]
    pub store_password: String,
    pub session_api: String,
    pub validation_api: String,
    pub currency: String,
    pub product_name: String,
    pub product_category: String,
    pub product_profile: String,
}

pub const SANDBOX_SESSION_API: &str = "https://sandbox.sslcommerz.com/gwprocess/v4/api.php";
pub const SANDBOX_VALIDATION_API: &str =
    "https://sandbox.sslcommerz.com/validator/api/validationserverAPI.php";

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            store_id: String::new(),
            store_password: String::new(),
            session_api: SANDBOX_SESSION_API.to_string(),
            validation_api: SANDBOX_VALIDATION_API.to_string(),
            currency: "USD".to_string(),
            product_name: "PlayPicker Package".to_string(),
            product_category: "subscription".to_string(),
            product_profile: "general".to_string(),
        }
    }
}

impl GatewayConfig {
    pub fn has_credentials(&self) -> bool {
        !self.store_id.is_empty() && !self.store_password.is_empty()
    }
}

impl ServerConfig {
    /// Absolute URL of a payment callback route, e.g. `success` or `ipn`.
    pub fn payment_callback_url(&self, action: &str) -> String {
        format!("{}/api/v1/payment/{}", self.base_url.trim_end_matches('/'), action)
    }

    /// Frontend page the browser is sent to after a gateway redirect.
    pub fn frontend_payment_url(&self, page: &str, query: &[(&str, &str)]) -> String {
        let base = format!("{}/payment/{}", self.frontend_url.trim_end_matches('/'), page);
        if query.is_empty() {
            return base;
        }
        let query = query
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", base, query)
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let defaults = GatewayConfig::default();

        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.base_url", "http://localhost:8080")?
            .set_default("server.frontend_url", "http://localhost:3000")?
            .set_default("server.uploads_dir", "uploads")?
            .set_default("database.url", "sqlite://playpicker.db?mode=rwc")?
            .set_default("database.max_connections", 10)?
            .set_default("gateway.session_api", defaults.session_api)?
            .set_default("gateway.validation_api", defaults.validation_api)?
            .set_default("gateway.currency", defaults.currency)?
            .set_default("gateway.product_name", defaults.product_name)?
            .set_default("gateway.product_category", defaults.product_category)?
            .set_default("gateway.product_profile", defaults.product_profile)?

            // Add config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))

            // Environment variables, e.g. PLAYPICKER__GATEWAY__STORE_ID
            .add_source(Environment::with_prefix("PLAYPICKER").separator("__"))

            .build()?;

        config.try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                base_url: "http://localhost:8080".to_string(),
                frontend_url: "http://localhost:3000".to_string(),
                uploads_dir: "uploads".to_string(),
            },
            database: DatabaseConfig {
                url: "sqlite://playpicker.db?mode=rwc".to_string(),
                max_connections: 10,
            },
            gateway: GatewayConfig::default(),
        }
    }
}
