//! Environment-variable configuration: defaults first, then env overrides,
//! then a mode-dependent validation pass.

use std::env;
use std::time::Duration;

use alert_common::AlertError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Development,
    Production,
}

#[derive(Debug, Clone)]
pub struct TeamsConfig {
    pub team_id: String,
    pub feed1_channel_id: String,
    pub feed2_channel_id: String,
    pub forward_webhook_url: String,
    pub incident_webhook_url: String,
}

#[derive(Debug, Clone)]
pub struct GraphAppConfig {
    pub app_id: String,
    pub app_password: String,
    pub tenant_id: String,
}

#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone)]
pub struct PollerConfig {
    pub interval: Duration,
    pub page_size: u32,
}

#[derive(Debug, Clone)]
pub struct DedupConfig {
    pub max_size: usize,
    pub cleanup_size: usize,
}

/// Root application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mode: RunMode,
    pub teams: TeamsConfig,
    pub graph: GraphAppConfig,
    pub http: HttpConfig,
    pub poller: PollerConfig,
    pub dedup: DedupConfig,
    pub notifier_tls_verify: bool,
    pub log_format: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            mode: RunMode::Development,
            teams: TeamsConfig {
                team_id: String::new(),
                feed1_channel_id: String::new(),
                feed2_channel_id: String::new(),
                forward_webhook_url: String::new(),
                incident_webhook_url: String::new(),
            },
            graph: GraphAppConfig {
                app_id: String::new(),
                app_password: String::new(),
                tenant_id: String::new(),
            },
            http: HttpConfig {
                port: 8080,
                host: "0.0.0.0".to_string(),
            },
            poller: PollerConfig {
                interval: Duration::from_secs(10),
                page_size: 10,
            },
            dedup: DedupConfig {
                max_size: 1000,
                cleanup_size: 500,
            },
            notifier_tls_verify: false,
            log_format: "text".to_string(),
        }
    }
}

/// Loads configuration from environment variables, defaults first.
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn new() -> Self {
        ConfigLoader
    }

    pub fn load(&self) -> Result<AppConfig, AlertError> {
        let mut config = AppConfig::default();
        self.apply_env_overrides(&mut config);
        self.validate(&config)?;
        Ok(config)
    }

    fn apply_env_overrides(&self, config: &mut AppConfig) {
        if let Ok(val) = env::var("ENV") {
            config.mode = match val.as_str() {
                "production" => RunMode::Production,
                _ => RunMode::Development,
            };
        }

        if let Ok(val) = env::var("TEAMS_TEAM_ID") {
            config.teams.team_id = val;
        }
        if let Ok(val) = env::var("TEAMS_FEED1_CHANNEL_ID") {
            config.teams.feed1_channel_id = val;
        }
        if let Ok(val) = env::var("TEAMS_FEED2_CHANNEL_ID") {
            config.teams.feed2_channel_id = val;
        }
        if let Ok(val) = env::var("TEAMS_FORWARD_WEBHOOK_URL") {
            config.teams.forward_webhook_url = val;
        }
        if let Ok(val) = env::var("TEAMS_INCIDENT_WEBHOOK_URL") {
            config.teams.incident_webhook_url = val;
        }

        if let Ok(val) = env::var("MICROSOFT_APP_ID") {
            config.graph.app_id = val;
        }
        if let Ok(val) = env::var("MICROSOFT_APP_PASSWORD") {
            config.graph.app_password = val;
        }
        if let Ok(val) = env::var("MICROSOFT_TENANT_ID") {
            config.graph.tenant_id = val;
        }

        if let Ok(val) = env::var("HTTP_PORT") {
            if let Ok(port) = val.parse() {
                config.http.port = port;
            }
        }
        if let Ok(val) = env::var("HTTP_HOST") {
            config.http.host = val;
        }

        if let Ok(val) = env::var("POLL_INTERVAL_SECONDS") {
            if let Ok(secs) = val.parse() {
                config.poller.interval = Duration::from_secs(secs);
            }
        }
        if let Ok(val) = env::var("POLL_PAGE_SIZE") {
            if let Ok(size) = val.parse() {
                config.poller.page_size = size;
            }
        }

        if let Ok(val) = env::var("DEDUP_MAX_SIZE") {
            if let Ok(size) = val.parse() {
                config.dedup.max_size = size;
            }
        }
        if let Ok(val) = env::var("DEDUP_CLEANUP_SIZE") {
            if let Ok(size) = val.parse() {
                config.dedup.cleanup_size = size;
            }
        }

        if let Ok(val) = env::var("NOTIFIER_TLS_VERIFY") {
            config.notifier_tls_verify = val.parse().unwrap_or(false);
        }

        if let Ok(val) = env::var("LOG_FORMAT") {
            config.log_format = val;
        }
    }

    /// In production, the eight domain variables must all be non-empty.
    /// Development tolerates missing webhook URLs (the bootstrap wires a
    /// no-op notifier in that case) but still requires Graph credentials
    /// and channel identifiers to be present, since there is no meaningful
    /// dev-mode stand-in for "poll nothing."
    fn validate(&self, config: &AppConfig) -> Result<(), AlertError> {
        if config.mode != RunMode::Production {
            return Ok(());
        }

        let required = [
            ("TEAMS_TEAM_ID", &config.teams.team_id),
            ("TEAMS_FEED1_CHANNEL_ID", &config.teams.feed1_channel_id),
            ("TEAMS_FEED2_CHANNEL_ID", &config.teams.feed2_channel_id),
            ("TEAMS_FORWARD_WEBHOOK_URL", &config.teams.forward_webhook_url),
            ("TEAMS_INCIDENT_WEBHOOK_URL", &config.teams.incident_webhook_url),
            ("MICROSOFT_APP_ID", &config.graph.app_id),
            ("MICROSOFT_APP_PASSWORD", &config.graph.app_password),
            ("MICROSOFT_TENANT_ID", &config.graph.tenant_id),
        ];

        for (name, value) in required {
            if value.is_empty() {
                tracing::error!(variable = name, "required configuration missing in production mode");
                return Err(AlertError::ConfigurationMissing(name.to_string()));
            }
        }

        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
