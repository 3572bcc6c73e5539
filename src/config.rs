use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::info;
use validator::Validate;

/// Default values for configuration
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const DEFAULT_PORT: u16 = 8080;
const CONFIG_DIR: &str = "config";
const DEFAULT_PROCESSOR: &str = "storefront";
const DEFAULT_CONTACT_PLACEHOLDER: &str = "Storefront Customer";

/// Application configuration structure with validation
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Server host address
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Application environment
    pub environment: String,

    /// Logging level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,

    /// Processor tag stamped on every invoice and contact sent to the
    /// billing API
    #[validate(length(min = 1, message = "Processor tag is required"))]
    #[serde(default = "default_processor")]
    pub processor: String,

    /// Deliver (email) each invoice to the contact right after creation
    #[serde(default)]
    pub autosend_receipts: bool,

    /// Placeholder used when an order carries no billing first name
    #[serde(default = "default_contact_placeholder")]
    pub default_contact_name: String,

    /// Admin order-detail URL; the order id is appended as `?id=<uuid>`
    /// and sent to the billing API as a back-link
    #[validate(length(min = 1, message = "orders_admin_url is required"))]
    #[serde(default = "default_orders_admin_url")]
    pub orders_admin_url: String,

    /// Status page the resend endpoint redirects to
    #[serde(default = "default_resend_status_url")]
    pub resend_status_url: String,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_processor() -> String {
    DEFAULT_PROCESSOR.to_string()
}

fn default_contact_placeholder() -> String {
    DEFAULT_CONTACT_PLACEHOLDER.to_string()
}

fn default_orders_admin_url() -> String {
    "http://localhost:8080/admin/orders".to_string()
}

fn default_resend_status_url() -> String {
    "/admin/orders".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: default_port(),
            environment: DEFAULT_ENV.to_string(),
            log_level: default_log_level(),
            log_json: false,
            processor: default_processor(),
            autosend_receipts: false,
            default_contact_name: default_contact_placeholder(),
            orders_admin_url: default_orders_admin_url(),
            resend_status_url: default_resend_status_url(),
        }
    }
}

impl AppConfig {
    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    /// Back-link URL for one order, stored on the invoice as custom metadata.
    pub fn order_backlink(&self, order_id: uuid::Uuid) -> String {
        format!("{}?id={}", self.orders_admin_url, order_id)
    }
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("Configuration loading failed: {0}")]
    Load(#[from] ConfigError),

    #[error("Configuration validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Loads configuration from defaults, an optional `config/{env}.toml` file,
/// and `APP__`-prefixed environment variables (in increasing precedence).
pub fn load_config() -> Result<AppConfig, AppConfigError> {
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| DEFAULT_ENV.to_string());
    info!("Loading configuration for environment: {}", run_env);

    if !Path::new(CONFIG_DIR).exists() {
        info!(
            "Config directory '{}' not found; relying on built-in defaults and environment variables",
            CONFIG_DIR
        );
    }

    let builder = Config::builder()
        .set_default("host", "0.0.0.0")?
        .set_default("port", DEFAULT_PORT as i64)?
        .set_default("environment", DEFAULT_ENV)?
        .set_default("log_level", DEFAULT_LOG_LEVEL)?
        .set_default("log_json", false)?
        .set_default("processor", DEFAULT_PROCESSOR)?
        .set_default("autosend_receipts", false)?
        .set_default("default_contact_name", DEFAULT_CONTACT_PLACEHOLDER)?
        .set_default("orders_admin_url", default_orders_admin_url())?
        .set_default("resend_status_url", default_resend_status_url())?
        .add_source(File::with_name(&format!("{}/{}", CONFIG_DIR, run_env)).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"));

    let config: AppConfig = builder.build()?.try_deserialize()?;
    config.validate()?;

    Ok(config)
}

/// Initializes the tracing subscriber. `RUST_LOG` overrides the configured
/// level when set and non-empty.
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let default_directive = format!("invoice_sync={},tower_http=debug", level);
    let filter_directive = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    let filter = EnvFilter::try_new(filter_directive)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    if json {
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init();
    } else {
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .try_init();
    }
}
