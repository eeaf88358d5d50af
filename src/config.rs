use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub services: ServicesConfig,
    #[serde(default)]
    pub timeouts: TimeoutsConfig,
    #[serde(default)]
    pub deployment: DeploymentConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins; empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

/// Base URLs of the collaborator services
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicesConfig {
    pub product: String,
    pub content: String,
    pub theme: String,
    pub integration: String,
    pub deployment: String,
    pub notification: String,
}

/// Per-call timeouts in seconds for collaborator requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutsConfig {
    #[serde(default = "default_product_timeout")]
    pub product_secs: u64,
    #[serde(default = "default_content_timeout")]
    pub content_secs: u64,
    #[serde(default = "default_theme_timeout")]
    pub theme_secs: u64,
    #[serde(default = "default_integration_timeout")]
    pub integration_secs: u64,
    #[serde(default = "default_deploy_timeout")]
    pub deploy_secs: u64,
    #[serde(default = "default_status_timeout")]
    pub status_secs: u64,
    #[serde(default = "default_notification_timeout")]
    pub notification_secs: u64,
}

fn default_product_timeout() -> u64 {
    30
}

fn default_content_timeout() -> u64 {
    30
}

fn default_theme_timeout() -> u64 {
    10
}

fn default_integration_timeout() -> u64 {
    10
}

fn default_deploy_timeout() -> u64 {
    60
}

fn default_status_timeout() -> u64 {
    10
}

fn default_notification_timeout() -> u64 {
    30
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            product_secs: default_product_timeout(),
            content_secs: default_content_timeout(),
            theme_secs: default_theme_timeout(),
            integration_secs: default_integration_timeout(),
            deploy_secs: default_deploy_timeout(),
            status_secs: default_status_timeout(),
            notification_secs: default_notification_timeout(),
        }
    }
}

impl TimeoutsConfig {
    pub fn product(&self) -> Duration {
        Duration::from_secs(self.product_secs)
    }

    pub fn content(&self) -> Duration {
        Duration::from_secs(self.content_secs)
    }

    pub fn theme(&self) -> Duration {
        Duration::from_secs(self.theme_secs)
    }

    pub fn integration(&self) -> Duration {
        Duration::from_secs(self.integration_secs)
    }

    pub fn deploy(&self) -> Duration {
        Duration::from_secs(self.deploy_secs)
    }

    pub fn status(&self) -> Duration {
        Duration::from_secs(self.status_secs)
    }

    pub fn notification(&self) -> Duration {
        Duration::from_secs(self.notification_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentConfig {
    /// Nominal time in seconds for a deployment to reach completion (default: 120)
    #[serde(default = "default_nominal_duration")]
    pub nominal_duration_secs: u64,
    /// Domain that store URLs are minted under
    #[serde(default = "default_store_domain")]
    pub store_domain: String,
}

fn default_nominal_duration() -> u64 {
    120 // 2 minutes
}

fn default_store_domain() -> String {
    "nextbasket.com".to_string()
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            nominal_duration_secs: default_nominal_duration(),
            store_domain: default_store_domain(),
        }
    }
}

impl DeploymentConfig {
    pub fn nominal_duration(&self) -> Duration {
        Duration::from_secs(self.nominal_duration_secs.max(1))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Fire `deployment_started` when a deployment is created
    #[serde(default)]
    pub on_deployment_started: bool,
    /// Fire `launch` when a deployment completes, unless the launch settings opt out
    #[serde(default = "default_true")]
    pub on_launch: bool,
    /// Forward notifications to the notification collaborator
    #[serde(default = "default_true")]
    pub backend_enabled: bool,
    #[serde(default)]
    pub webhooks: Vec<WebhookConfig>,
}

fn default_true() -> bool {
    true
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            on_deployment_started: false,
            on_launch: true,
            backend_enabled: true,
            webhooks: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub url: String,
    /// "bearer" or "basic"; anything else sends no credentials
    #[serde(default)]
    pub auth_type: Option<String>,
    #[serde(default)]
    pub token_env: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password_env: Option<String>,
    /// Notification types to forward; empty or absent forwards all
    #[serde(default)]
    pub events: Option<Vec<String>>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Write logs to a file in `dir` instead of stderr
    #[serde(default)]
    pub to_file: bool,

    #[serde(default = "default_log_dir")]
    pub dir: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            to_file: false,
            dir: default_log_dir(),
        }
    }
}

impl Config {
    /// Config file picked up from the working directory when present
    pub fn local_config_path() -> PathBuf {
        PathBuf::from("store-wizard.toml")
    }

    pub fn load(config_path: Option<&str>) -> Result<Self> {
        // Start with embedded defaults so the service runs without config files
        let defaults = Config::default();
        let defaults_json =
            serde_json::to_string(&defaults).context("Failed to serialize default config")?;

        let mut builder = config::Config::builder().add_source(config::File::from_str(
            &defaults_json,
            config::FileFormat::Json,
        ));

        let local_config = Self::local_config_path();
        if local_config.exists() {
            builder = builder.add_source(config::File::from(local_config));
        }

        // User config in ~/.config/store-wizard/ (optional global overrides)
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("store-wizard").join("config.toml");
            if user_config.exists() {
                builder = builder.add_source(config::File::from(user_config));
            }
        }

        // Explicit config file (CLI override)
        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path));
        }

        // Environment variables with STORE_WIZARD_ prefix
        builder = builder.add_source(
            config::Environment::with_prefix("STORE_WIZARD")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to load configuration")?;
        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Get absolute path to logs directory
    pub fn logs_path(&self) -> PathBuf {
        let path = PathBuf::from(&self.logging.dir);
        if path.is_absolute() {
            path
        } else {
            std::env::current_dir().unwrap_or_default().join(path)
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 9020,
                cors_origins: Vec::new(),
            },
            services: ServicesConfig {
                product: "http://store-wizard-llm-service:9021".to_string(),
                content: "http://store-wizard-content-service:9022".to_string(),
                theme: "http://store-wizard-theme-service:9023".to_string(),
                integration: "http://store-wizard-integration-service:9024".to_string(),
                deployment: "http://store-wizard-integration-service:9024".to_string(),
                notification: "http://store-wizard-integration-service:9024".to_string(),
            },
            timeouts: TimeoutsConfig::default(),
            deployment: DeploymentConfig::default(),
            notifications: NotificationsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
