//! Client configuration.

use std::time::Duration;
use tracing::warn;

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://shorttags.com";

/// Default request timeout, covering the whole request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connect timeout.
pub const DEFAULT_OPEN_TIMEOUT: Duration = Duration::from_secs(10);

/// Environment name that keeps auto-enabled tracking switched on.
pub const PRODUCTION_ENVIRONMENT: &str = "production";

/// Tri-state tracking switch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Enabled {
    /// Always send.
    On,
    /// Never send; every call returns a skipped result.
    Off,
    /// Send unless an injected environment name other than `production` is set.
    #[default]
    Auto,
}

impl From<bool> for Enabled {
    fn from(on: bool) -> Self {
        if on {
            Enabled::On
        } else {
            Enabled::Off
        }
    }
}

/// Shorttags client configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub(crate) api_key: String,
    pub(crate) site_id: String,
    pub(crate) base_url: String,
    pub(crate) timeout: Duration,
    pub(crate) open_timeout: Duration,
    pub(crate) enabled: Enabled,
    pub(crate) environment: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            site_id: String::new(),
            base_url: DEFAULT_BASE_URL.into(),
            timeout: DEFAULT_TIMEOUT,
            open_timeout: DEFAULT_OPEN_TIMEOUT,
            enabled: Enabled::Auto,
            environment: None,
        }
    }
}

impl Config {
    /// Get the API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Get the site ID.
    pub fn site_id(&self) -> &str {
        &self.site_id
    }

    /// Get the API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the request timeout (a deadline for the whole request).
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Get the connect timeout.
    pub fn open_timeout(&self) -> Duration {
        self.open_timeout
    }

    /// Get the injected host environment name, if any.
    pub fn environment(&self) -> Option<&str> {
        self.environment.as_deref()
    }

    /// True when both the API key and the site ID are set.
    pub fn valid(&self) -> bool {
        !self.api_key.is_empty() && !self.site_id.is_empty()
    }

    /// Whether metrics should actually be sent.
    ///
    /// An explicit switch wins. In auto mode tracking is on, unless a host
    /// environment name was injected, in which case only `production` sends.
    pub fn enabled(&self) -> bool {
        match self.enabled {
            Enabled::On => true,
            Enabled::Off => false,
            Enabled::Auto => self
                .environment
                .as_deref()
                .map_or(true, |env| env == PRODUCTION_ENVIRONMENT),
        }
    }

    /// Metrics ingestion endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}/api/notify/{}", self.base_url, self.site_id)
    }

    /// Accumulator ingestion endpoint.
    pub fn accumulator_endpoint(&self) -> String {
        format!("{}/accumulators", self.endpoint())
    }
}

/// Builder for the Shorttags client.
#[derive(Debug)]
pub struct ShorttagsBuilder {
    api_key: String,
    site_id: String,
    base_url: Option<String>,
    timeout: Option<Duration>,
    open_timeout: Option<Duration>,
    enabled: Enabled,
    environment: Option<String>,
}

impl ShorttagsBuilder {
    /// Create a new builder with the given credentials.
    pub fn new(api_key: impl Into<String>, site_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            site_id: site_id.into(),
            base_url: None,
            timeout: None,
            open_timeout: None,
            enabled: Enabled::Auto,
            environment: None,
        }
    }

    /// Create a builder from `SHORTTAGS_*` process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Create a builder from an arbitrary variable lookup.
    ///
    /// Recognised variables: `SHORTTAGS_API_KEY`, `SHORTTAGS_SITE_ID`,
    /// `SHORTTAGS_BASE_URL`, `SHORTTAGS_TIMEOUT`, `SHORTTAGS_OPEN_TIMEOUT`
    /// (whole seconds), `SHORTTAGS_ENABLED` and `SHORTTAGS_ENV`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::new(
            lookup("SHORTTAGS_API_KEY").unwrap_or_default(),
            lookup("SHORTTAGS_SITE_ID").unwrap_or_default(),
        );

        builder.base_url = lookup("SHORTTAGS_BASE_URL").filter(|url| !url.is_empty());
        builder.timeout = seconds_var(&lookup, "SHORTTAGS_TIMEOUT");
        builder.open_timeout = seconds_var(&lookup, "SHORTTAGS_OPEN_TIMEOUT");
        builder.enabled = lookup("SHORTTAGS_ENABLED")
            .map(|raw| parse_enabled(&raw))
            .unwrap_or_default();
        builder.environment = lookup("SHORTTAGS_ENV").filter(|env| !env.is_empty());
        builder
    }

    /// Set the API base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout, a deadline for the whole request including connect.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connect timeout.
    pub fn open_timeout(mut self, timeout: Duration) -> Self {
        self.open_timeout = Some(timeout);
        self
    }

    /// Force tracking on or off instead of resolving it automatically.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled.into();
        self
    }

    /// Inject the host environment name used by auto mode.
    pub fn environment(mut self, env: impl Into<String>) -> Self {
        self.environment = Some(env.into());
        self
    }

    /// Build the configuration.
    ///
    /// Missing credentials are not rejected here; sending fails instead.
    pub fn build_config(self) -> Config {
        Config {
            api_key: self.api_key,
            site_id: self.site_id,
            base_url: self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.into()),
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            open_timeout: self.open_timeout.unwrap_or(DEFAULT_OPEN_TIMEOUT),
            enabled: self.enabled,
            environment: self.environment,
        }
    }
}

fn parse_enabled(raw: &str) -> Enabled {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Enabled::On,
        "0" | "false" | "no" | "off" => Enabled::Off,
        _ => Enabled::Auto,
    }
}

fn seconds_var<F>(lookup: &F, name: &str) -> Option<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(name)?;
    match raw.trim().parse::<u64>() {
        Ok(secs) => Some(Duration::from_secs(secs)),
        Err(_) => {
            warn!(variable = name, value = %raw, "ignoring invalid timeout");
            None
        }
    }
}
