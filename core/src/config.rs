//! Client configuration.

use std::time::Duration;

use crate::error::ConfigError;

pub const ENV_HOST: &str = "HYBRID_SDK_HOST";
pub const ENV_PORT: &str = "HYBRID_SDK_PORT";
pub const ENV_SCHEME: &str = "HYBRID_SDK_SCHEME";
pub const ENV_CONTEXT_PATH: &str = "HYBRID_SDK_CONTEXT_PATH";

/// Where the API lives and how long calls may take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub scheme: String,
    pub host: String,
    pub port: u16,
    /// Path prefix in front of `/v1`, e.g. `/zstack`. May be empty.
    pub context_path: String,
    /// Upper bound on how long a long-poll call waits for its job.
    pub default_timeout: Duration,
    pub default_polling_interval: Duration,
    /// Per HTTP exchange.
    pub read_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            scheme: "http".to_string(),
            host: "localhost".to_string(),
            port: 8080,
            context_path: "/zstack".to_string(),
            default_timeout: Duration::from_secs(3 * 60 * 60),
            default_polling_interval: Duration::from_secs(1),
            read_timeout: Duration::from_secs(15),
        }
    }
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: Self::default(),
        }
    }

    /// Defaults overridden by any `HYBRID_SDK_*` variables that are set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut builder = Self::builder();
        if let Some(host) = lookup(ENV_HOST) {
            builder = builder.host(host);
        }
        if let Some(port) = lookup(ENV_PORT) {
            let parsed = port.parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                key: ENV_PORT,
                value: port.clone(),
                reason: e.to_string(),
            })?;
            builder = builder.port(parsed);
        }
        if let Some(scheme) = lookup(ENV_SCHEME) {
            if scheme != "http" && scheme != "https" {
                return Err(ConfigError::InvalidValue {
                    key: ENV_SCHEME,
                    value: scheme,
                    reason: "expected http or https".to_string(),
                });
            }
            builder = builder.scheme(scheme);
        }
        if let Some(path) = lookup(ENV_CONTEXT_PATH) {
            builder = builder.context_path(path);
        }
        Ok(builder.build())
    }

    /// `{scheme}://{host}:{port}{context_path}/v1`
    pub fn base_url(&self) -> String {
        format!(
            "{}://{}:{}{}/v1",
            self.scheme, self.host, self.port, self.context_path
        )
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
        self.config.scheme = scheme.into();
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    pub fn context_path(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        let trimmed = path.trim_matches('/');
        self.config.context_path = if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{trimmed}")
        };
        self
    }

    pub fn default_timeout(mut self, timeout: Duration) -> Self {
        self.config.default_timeout = timeout;
        self
    }

    pub fn default_polling_interval(mut self, interval: Duration) -> Self {
        self.config.default_polling_interval = interval;
        self
    }

    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.config.read_timeout = timeout;
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}
